use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position2D {
    pub x: f64,
    pub y: f64,
}

/// Velocity in units per second, or a normalised movement intent.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector2D {
    pub x: f64,
    pub y: f64,
}

impl Position2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Position2D) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Bearing in radians from `self` towards `other`.
    pub fn angle_to(&self, other: &Position2D) -> f64 {
        (other.y - self.y).atan2(other.x - self.x)
    }

    /// Point on a circle of `radius` around `self`.
    pub fn on_circle(&self, angle: f64, radius: f64) -> Position2D {
        Position2D {
            x: self.x + angle.cos() * radius,
            y: self.y + angle.sin() * radius,
        }
    }

    pub fn advanced(&self, velocity: Vector2D, dt_ms: u64) -> Position2D {
        let dt = dt_ms as f64 / 1000.0;
        Position2D {
            x: self.x + velocity.x * dt,
            y: self.y + velocity.y * dt,
        }
    }

    pub fn lerp(&self, to: &Position2D, t: f64) -> Position2D {
        let t = t.clamp(0.0, 1.0);
        Position2D {
            x: self.x + (to.x - self.x) * t,
            y: self.y + (to.y - self.y) * t,
        }
    }
}

impl Vector2D {
    pub const ZERO: Vector2D = Vector2D { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn from_angle(angle: f64, speed: f64) -> Self {
        Self {
            x: angle.cos() * speed,
            y: angle.sin() * speed,
        }
    }

    pub fn length(&self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Clamp every axis to [-1, 1]; non-finite components become 0.
    pub fn clamped_unit_axes(&self) -> Vector2D {
        let clamp = |v: f64| if v.is_finite() { v.clamp(-1.0, 1.0) } else { 0.0 };
        Vector2D {
            x: clamp(self.x),
            y: clamp(self.y),
        }
    }

    pub fn scaled(&self, factor: f64) -> Vector2D {
        Vector2D {
            x: self.x * factor,
            y: self.y * factor,
        }
    }
}

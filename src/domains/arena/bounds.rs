use super::types::Position2D;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Horizontal margin kept free when picking random seat or corner positions.
pub const PLACEMENT_PADDING: f64 = 100.0;
/// Extra vertical margin on top of `PLACEMENT_PADDING` for random seat positions.
pub const PLACEMENT_VERTICAL_EXTRA: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArenaBounds {
    pub width: f64,
    pub height: f64,
}

impl ArenaBounds {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Position2D {
        Position2D::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn contains(&self, position: &Position2D) -> bool {
        position.x >= 0.0 && position.x <= self.width && position.y >= 0.0 && position.y <= self.height
    }

    pub fn clamp(&self, position: Position2D) -> Position2D {
        Position2D::new(position.x.clamp(0.0, self.width), position.y.clamp(0.0, self.height))
    }

    /// Random interior point used for seat relocation. Degenerates to the
    /// centre on an axis when the arena is too small for the padding.
    pub fn random_interior<R: Rng + ?Sized>(&self, rng: &mut R) -> Position2D {
        let center = self.center();
        let x = Self::sample(rng, PLACEMENT_PADDING, self.width - PLACEMENT_PADDING, center.x);
        let y = Self::sample(
            rng,
            PLACEMENT_PADDING + PLACEMENT_VERTICAL_EXTRA,
            self.height - PLACEMENT_PADDING - PLACEMENT_VERTICAL_EXTRA,
            center.y,
        );
        Position2D::new(x, y)
    }

    /// The four corners pulled in by the placement padding.
    pub fn padded_corners(&self) -> [Position2D; 4] {
        let left = PLACEMENT_PADDING.min(self.width / 2.0);
        let right = (self.width - PLACEMENT_PADDING).max(self.width / 2.0);
        let top = PLACEMENT_PADDING.min(self.height / 2.0);
        let bottom = (self.height - PLACEMENT_PADDING).max(self.height / 2.0);
        [
            Position2D::new(left, top),
            Position2D::new(right, top),
            Position2D::new(left, bottom),
            Position2D::new(right, bottom),
        ]
    }

    fn sample<R: Rng + ?Sized>(rng: &mut R, low: f64, high: f64, fallback: f64) -> f64 {
        if high > low {
            rng.gen_range(low..=high)
        } else {
            fallback
        }
    }
}

impl Default for ArenaBounds {
    fn default() -> Self {
        Self::new(1024.0, 768.0)
    }
}

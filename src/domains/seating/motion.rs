use crate::domains::arena::{ArenaBounds, Position2D};
use rand::Rng;

pub const WANDER_MIN_MS: u64 = 2_000;
pub const WANDER_MAX_MS: u64 = 4_000;
pub const RANDOMIZE_EASE_MS: u64 = 500;
/// Fade-out time before a teleporting seat jumps; fade-in takes the same time.
pub const TELEPORT_FADE_MS: u64 = 100;

/// Per-seat motion state. Every variant is a countdown advanced by the tick
/// clock, so dropping the pool drops every pending motion with it.
#[derive(Debug, Clone, PartialEq)]
pub enum SeatMotion {
    Idle,
    /// Continuous wandering: linear glide, re-targets when the leg completes.
    Wandering {
        from: Position2D,
        to: Position2D,
        elapsed_ms: u64,
        duration_ms: u64,
    },
    /// One-off relocation with quadratic ease-out.
    Easing {
        from: Position2D,
        to: Position2D,
        elapsed_ms: u64,
        duration_ms: u64,
    },
    /// Fade out, jump to `to`, fade back in.
    Teleporting { to: Position2D, elapsed_ms: u64 },
}

/// What a motion step did to its seat.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionStep {
    pub position: Position2D,
    pub visible: bool,
}

impl SeatMotion {
    pub fn wander_from<R: Rng + ?Sized>(from: Position2D, arena: &ArenaBounds, rng: &mut R) -> Self {
        SeatMotion::Wandering {
            from,
            to: arena.random_interior(rng),
            elapsed_ms: 0,
            duration_ms: rng.gen_range(WANDER_MIN_MS..=WANDER_MAX_MS),
        }
    }

    pub fn ease_to(from: Position2D, to: Position2D) -> Self {
        SeatMotion::Easing {
            from,
            to,
            elapsed_ms: 0,
            duration_ms: RANDOMIZE_EASE_MS,
        }
    }

    pub fn teleport_to(to: Position2D) -> Self {
        SeatMotion::Teleporting { to, elapsed_ms: 0 }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, SeatMotion::Idle)
    }

    /// Advance by `dt_ms` from `current`. Wandering legs chain forever;
    /// the other motions fall back to `Idle` once finished.
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        current: Position2D,
        dt_ms: u64,
        arena: &ArenaBounds,
        rng: &mut R,
    ) -> MotionStep {
        match self {
            SeatMotion::Idle => MotionStep {
                position: current,
                visible: true,
            },
            SeatMotion::Wandering {
                from,
                to,
                elapsed_ms,
                duration_ms,
            } => {
                *elapsed_ms += dt_ms;
                let t = *elapsed_ms as f64 / (*duration_ms).max(1) as f64;
                let position = from.lerp(to, t);
                if *elapsed_ms >= *duration_ms {
                    *self = SeatMotion::wander_from(position, arena, rng);
                }
                MotionStep {
                    position,
                    visible: true,
                }
            }
            SeatMotion::Easing {
                from,
                to,
                elapsed_ms,
                duration_ms,
            } => {
                *elapsed_ms += dt_ms;
                let t = (*elapsed_ms as f64 / (*duration_ms).max(1) as f64).min(1.0);
                let eased = 1.0 - (1.0 - t) * (1.0 - t);
                let position = from.lerp(to, eased);
                if *elapsed_ms >= *duration_ms {
                    *self = SeatMotion::Idle;
                }
                MotionStep {
                    position,
                    visible: true,
                }
            }
            SeatMotion::Teleporting { to, elapsed_ms } => {
                *elapsed_ms += dt_ms;
                let target = *to;
                if *elapsed_ms < TELEPORT_FADE_MS {
                    MotionStep {
                        position: current,
                        visible: false,
                    }
                } else if *elapsed_ms < TELEPORT_FADE_MS * 2 {
                    MotionStep {
                        position: target,
                        visible: false,
                    }
                } else {
                    *self = SeatMotion::Idle;
                    MotionStep {
                        position: target,
                        visible: true,
                    }
                }
            }
        }
    }

    /// Where the seat ends up once a one-off motion completes.
    /// Wandering has no end, so it stops where it is.
    pub fn settle(&mut self, current: Position2D) -> Position2D {
        let resting = match self {
            SeatMotion::Easing { to, .. } | SeatMotion::Teleporting { to, .. } => *to,
            SeatMotion::Idle | SeatMotion::Wandering { .. } => current,
        };
        *self = SeatMotion::Idle;
        resting
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn easing_reaches_target_and_goes_idle() {
        let arena = ArenaBounds::default();
        let mut rng = StdRng::seed_from_u64(5);
        let from = Position2D::new(0.0, 0.0);
        let to = Position2D::new(100.0, 0.0);
        let mut motion = SeatMotion::ease_to(from, to);
        let mut position = from;
        for _ in 0..32 {
            position = motion.advance(position, 16, &arena, &mut rng).position;
        }
        assert_eq!(position, to);
        assert!(motion.is_idle());
    }

    #[test]
    fn teleport_hides_then_jumps() {
        let arena = ArenaBounds::default();
        let mut rng = StdRng::seed_from_u64(5);
        let start = Position2D::new(1.0, 1.0);
        let to = Position2D::new(300.0, 300.0);
        let mut motion = SeatMotion::teleport_to(to);
        let step = motion.advance(start, 16, &arena, &mut rng);
        assert_eq!(step.position, start);
        assert!(!step.visible);
        let step = motion.advance(step.position, 96, &arena, &mut rng);
        assert_eq!(step.position, to);
        let step = motion.advance(step.position, 100, &arena, &mut rng);
        assert!(step.visible);
        assert!(motion.is_idle());
    }

    #[test]
    fn wandering_keeps_retargeting() {
        let arena = ArenaBounds::default();
        let mut rng = StdRng::seed_from_u64(11);
        let mut motion = SeatMotion::wander_from(arena.center(), &arena, &mut rng);
        let mut position = arena.center();
        for _ in 0..1_000 {
            position = motion.advance(position, 16, &arena, &mut rng).position;
            assert!(matches!(motion, SeatMotion::Wandering { .. }));
        }
        assert!(arena.contains(&position));
    }
}

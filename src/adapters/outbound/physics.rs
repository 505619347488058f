use crate::domains::arena::{ArenaBounds, Position2D};
use crate::domains::round::{Contact, MotionResolver, ResolvedMotion};
use crate::domains::seating::SeatBody;

/// Collision radius of an agent body.
pub const AGENT_RADIUS: f64 = 23.0;
/// Collision radius of a seat body.
pub const SEAT_RADIUS: f64 = 20.0;

fn touching(position: &Position2D, seat: &SeatBody) -> bool {
    position.distance_to(&seat.position) < AGENT_RADIUS + SEAT_RADIUS
}

fn decoy_contacts(position: &Position2D, seats: &[SeatBody]) -> Vec<Contact> {
    seats
        .iter()
        .filter(|seat| seat.decoy && touching(position, seat))
        .map(|seat| Contact {
            seat_id: seat.seat_id,
            decoy: true,
        })
        .collect()
}

/// Arena walls plus solid seats. Agents slide off real seats and pass
/// through decoys, which reveals them.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArcadePhysics;

impl ArcadePhysics {
    fn push_out(from: &Position2D, position: Position2D, seat: &SeatBody) -> Position2D {
        let min_distance = AGENT_RADIUS + SEAT_RADIUS;
        let dx = position.x - seat.position.x;
        let dy = position.y - seat.position.y;
        let distance = (dx * dx + dy * dy).sqrt();
        if distance >= min_distance {
            return position;
        }
        // Dead centre: push back the way the agent came, or along +x.
        let (nx, ny) = if distance > f64::EPSILON {
            (dx / distance, dy / distance)
        } else {
            let back_x = from.x - seat.position.x;
            let back_y = from.y - seat.position.y;
            let back = (back_x * back_x + back_y * back_y).sqrt();
            if back > f64::EPSILON {
                (back_x / back, back_y / back)
            } else {
                (1.0, 0.0)
            }
        };
        Position2D::new(
            seat.position.x + nx * min_distance,
            seat.position.y + ny * min_distance,
        )
    }
}

impl MotionResolver for ArcadePhysics {
    fn resolve(
        &self,
        from: Position2D,
        desired: Position2D,
        seats: &[SeatBody],
        arena: &ArenaBounds,
    ) -> ResolvedMotion {
        let mut position = arena.clamp(desired);
        let mut contacts = Vec::new();
        for seat in seats.iter().filter(|s| s.blocking) {
            if touching(&position, seat) {
                position = Self::push_out(&from, position, seat);
                contacts.push(Contact {
                    seat_id: seat.seat_id,
                    decoy: false,
                });
            }
        }
        position = arena.clamp(position);
        contacts.extend(decoy_contacts(&position, seats));
        ResolvedMotion { position, contacts }
    }
}

/// Walls only. Seats never block, which keeps headless runs predictable.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenFloorPhysics;

impl MotionResolver for OpenFloorPhysics {
    fn resolve(
        &self,
        _from: Position2D,
        desired: Position2D,
        seats: &[SeatBody],
        arena: &ArenaBounds,
    ) -> ResolvedMotion {
        let position = arena.clamp(desired);
        ResolvedMotion {
            contacts: decoy_contacts(&position, seats),
            position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::SeatId;

    fn body(id: usize, x: f64, y: f64, decoy: bool) -> SeatBody {
        SeatBody {
            seat_id: SeatId(id),
            position: Position2D::new(x, y),
            blocking: !decoy,
            decoy,
        }
    }

    #[test]
    fn agents_are_kept_inside_the_arena() {
        let arena = ArenaBounds::new(100.0, 100.0);
        let resolved = OpenFloorPhysics.resolve(
            Position2D::new(50.0, 50.0),
            Position2D::new(150.0, -20.0),
            &[],
            &arena,
        );
        assert_eq!(resolved.position, Position2D::new(100.0, 0.0));
    }

    #[test]
    fn real_seats_push_agents_out() {
        let arena = ArenaBounds::default();
        let seat = body(0, 500.0, 400.0, false);
        let resolved = ArcadePhysics.resolve(
            Position2D::new(450.0, 400.0),
            Position2D::new(490.0, 400.0),
            &[seat],
            &arena,
        );
        let gap = resolved.position.distance_to(&seat.position);
        assert!((gap - (AGENT_RADIUS + SEAT_RADIUS)).abs() < 1e-9);
        assert_eq!(resolved.contacts, vec![Contact { seat_id: SeatId(0), decoy: false }]);
    }

    #[test]
    fn decoys_are_passable_but_reported() {
        let arena = ArenaBounds::default();
        let decoy = body(1, 500.0, 400.0, true);
        let desired = Position2D::new(495.0, 400.0);
        for resolver in [&ArcadePhysics as &dyn MotionResolver, &OpenFloorPhysics] {
            let resolved = resolver.resolve(Position2D::new(450.0, 400.0), desired, &[decoy], &arena);
            assert_eq!(resolved.position, desired);
            assert_eq!(resolved.contacts, vec![Contact { seat_id: SeatId(1), decoy: true }]);
        }
    }
}

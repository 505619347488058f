use super::mechanic::{Mechanic, MechanicKind};
use super::motion::SeatMotion;
use super::seat::{OccupyOutcome, Seat};
use crate::common::{AgentId, DomainError, DomainResult, SeatId};
use crate::domains::arena::{ArenaBounds, Position2D};
use ordered_float::OrderedFloat;
use rand::Rng;
use std::f64::consts::TAU;

/// Radius of the ring seats are laid out on.
pub const SEAT_RING_RADIUS: f64 = 200.0;

/// What the physics collaborator needs to know about a seat each tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeatBody {
    pub seat_id: SeatId,
    pub position: Position2D,
    pub blocking: bool,
    pub decoy: bool,
}

/// Owns the seats of one round.
///
/// All mutation of occupancy goes through [`SeatPool::occupy`]. The game runs
/// in a single-threaded tick, so "first caller in evaluation order wins" needs
/// no locking; a concurrent port would need a compare-and-swap on the occupant.
#[derive(Debug, Clone)]
pub struct SeatPool {
    mechanic: Mechanic,
    arena: ArenaBounds,
    seats: Vec<Seat>,
    motions: Vec<SeatMotion>,
    occupiable: usize,
}

impl SeatPool {
    /// Lay out `seat_count` occupiable seats (plus the mechanic's decoys) evenly
    /// on a ring around the arena centre. Decoy slots are spread around the ring.
    pub fn configure(mechanic: Mechanic, seat_count: usize, arena: ArenaBounds) -> DomainResult<Self> {
        if seat_count == 0 {
            return Err(DomainError::InvalidCommand {
                reason: "a round needs at least one seat".to_string(),
            });
        }
        let decoys = mechanic.kind.decoy_count();
        let total = mechanic.physical_seat_count(seat_count);
        let decoy_slots: Vec<usize> = (0..decoys).map(|k| (2 * k + 1) * total / (2 * decoys)).collect();

        let center = arena.center();
        let seats: Vec<Seat> = (0..total)
            .map(|i| {
                let angle = i as f64 / total as f64 * TAU;
                Seat::new(SeatId(i), center.on_circle(angle, SEAT_RING_RADIUS), decoy_slots.contains(&i))
            })
            .collect();

        Ok(Self {
            mechanic,
            arena,
            motions: vec![SeatMotion::Idle; seats.len()],
            seats,
            occupiable: seat_count,
        })
    }

    pub fn mechanic(&self) -> Mechanic {
        self.mechanic
    }

    pub fn arena(&self) -> ArenaBounds {
        self.arena
    }

    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    pub fn seat(&self, id: SeatId) -> Option<&Seat> {
        self.seats.get(id.0)
    }

    /// Seats that can ever be occupied this round.
    pub fn occupiable_count(&self) -> usize {
        self.occupiable
    }

    pub fn decoy_count(&self) -> usize {
        self.seats.iter().filter(|s| s.is_decoy()).count()
    }

    pub fn occupied_count(&self) -> usize {
        self.seats.iter().filter(|s| s.is_occupied()).count()
    }

    /// Make every real seat claimable. One-off relocations still in flight are
    /// snapped to their destination first so nobody sits on a moving seat.
    pub fn activate_all(&mut self) {
        for (seat, motion) in self.seats.iter_mut().zip(self.motions.iter_mut()) {
            let resting = motion.settle(seat.position());
            seat.set_position(resting);
            seat.set_visible(true);
            seat.activate();
        }
    }

    pub fn available_seats(&self) -> impl Iterator<Item = &Seat> {
        self.seats.iter().filter(|s| s.is_available())
    }

    /// Nearest available seat; equal distances go to the seat met first.
    pub fn nearest_available(&self, from: &Position2D) -> Option<(SeatId, f64)> {
        self.available_seats()
            .map(|s| (s.id(), from.distance_to(&s.position())))
            .min_by_key(|(id, distance)| (OrderedFloat(*distance), *id))
    }

    /// The single serialisation point for claims. Repeating a call, losing a
    /// race, or hitting an inactive seat leaves state untouched; a decoy only
    /// flips its cosmetic `revealed` flag.
    pub fn occupy(&mut self, seat: SeatId, agent: AgentId) -> OccupyOutcome {
        match self.seats.get_mut(seat.0) {
            Some(s) => s.occupy(agent),
            None => OccupyOutcome::UnknownSeat,
        }
    }

    /// Contact with a decoy. Returns true the first time it is revealed.
    pub fn reveal_decoy(&mut self, seat: SeatId) -> bool {
        self.seats.get_mut(seat.0).map(|s| s.reveal()).unwrap_or(false)
    }

    /// Kick off the mechanic's active-phase motion.
    pub fn start_active_motion<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if !self.mechanic.kind.has_continuous_motion() {
            return;
        }
        for (seat, motion) in self.seats.iter().zip(self.motions.iter_mut()) {
            *motion = SeatMotion::wander_from(seat.position(), &self.arena, rng);
        }
    }

    /// Freeze every seat where it currently is.
    pub fn stop_motion(&mut self) {
        for motion in self.motions.iter_mut() {
            *motion = SeatMotion::Idle;
        }
    }

    /// Reconfigure seats the moment the music stops.
    pub fn reconfigure_for_scramble<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        match self.mechanic.kind {
            MechanicKind::Static => {}
            MechanicKind::Decoy => self.stop_motion(),
            MechanicKind::Moving => {
                self.stop_motion();
                for motion in self.motions.iter_mut() {
                    *motion = SeatMotion::teleport_to(self.arena.random_interior(rng));
                }
            }
            MechanicKind::Randomized => {
                for (seat, motion) in self.seats.iter().zip(self.motions.iter_mut()) {
                    *motion = SeatMotion::ease_to(seat.position(), self.arena.random_interior(rng));
                }
            }
            MechanicKind::Teleporting => {
                for motion in self.motions.iter_mut() {
                    *motion = SeatMotion::teleport_to(self.arena.random_interior(rng));
                }
            }
        }
    }

    /// Advance every seat's motion by one tick.
    pub fn advance<R: Rng + ?Sized>(&mut self, dt_ms: u64, rng: &mut R) {
        for (seat, motion) in self.seats.iter_mut().zip(self.motions.iter_mut()) {
            if motion.is_idle() {
                continue;
            }
            let step = motion.advance(seat.position(), dt_ms, &self.arena, rng);
            seat.set_position(step.position);
            seat.set_visible(step.visible);
        }
    }

    pub fn is_settled(&self) -> bool {
        self.motions.iter().all(|m| m.is_idle())
    }

    pub fn bodies(&self) -> Vec<SeatBody> {
        self.seats
            .iter()
            .map(|s| SeatBody {
                seat_id: s.id(),
                position: s.position(),
                blocking: s.is_blocking(),
                decoy: s.is_decoy(),
            })
            .collect()
    }

    #[cfg(test)]
    pub(crate) fn place_for_test(&mut self, seat: SeatId, position: Position2D) {
        if let Some(s) = self.seats.get_mut(seat.0) {
            s.set_position(position);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn static_pool(seats: usize) -> SeatPool {
        SeatPool::configure(MechanicKind::Static.mechanic(), seats, ArenaBounds::default()).unwrap()
    }

    #[test]
    fn seats_start_inactive_on_the_ring() {
        let pool = static_pool(5);
        let center = ArenaBounds::default().center();
        assert_eq!(pool.seats().len(), 5);
        for seat in pool.seats() {
            assert!(!seat.is_active());
            assert!((seat.position().distance_to(&center) - SEAT_RING_RADIUS).abs() < 1e-9);
        }
        assert_eq!(pool.available_seats().count(), 0);
    }

    #[test]
    fn zero_seats_is_rejected() {
        assert!(SeatPool::configure(Mechanic::base(), 0, ArenaBounds::default()).is_err());
    }

    #[test]
    fn decoy_pool_has_three_interleaved_decoys() {
        let pool = SeatPool::configure(MechanicKind::Decoy.mechanic(), 5, ArenaBounds::default()).unwrap();
        assert_eq!(pool.seats().len(), 8);
        assert_eq!(pool.decoy_count(), 3);
        assert_eq!(pool.occupiable_count(), 5);
        let slots: Vec<usize> = pool.seats().iter().filter(|s| s.is_decoy()).map(|s| s.id().0).collect();
        assert_eq!(slots, vec![1, 4, 6]);
    }

    #[test]
    fn activate_all_skips_decoys() {
        let mut pool = SeatPool::configure(MechanicKind::Decoy.mechanic(), 2, ArenaBounds::default()).unwrap();
        pool.activate_all();
        assert_eq!(pool.available_seats().count(), 2);
        assert!(pool.seats().iter().filter(|s| s.is_decoy()).all(|s| !s.is_active()));
    }

    #[test]
    fn occupy_is_idempotent() {
        let mut pool = static_pool(3);
        pool.activate_all();
        assert_eq!(pool.occupy(SeatId(0), AgentId(1)), OccupyOutcome::Claimed);
        let before: Vec<_> = pool.seats().iter().map(|s| (s.occupant(), s.is_active())).collect();
        assert_eq!(pool.occupy(SeatId(0), AgentId(1)), OccupyOutcome::AlreadyHeld);
        let after: Vec<_> = pool.seats().iter().map(|s| (s.occupant(), s.is_active())).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn second_claimant_in_the_same_tick_loses() {
        let mut pool = static_pool(1);
        pool.activate_all();
        assert_eq!(pool.occupy(SeatId(0), AgentId(4)), OccupyOutcome::Claimed);
        assert_eq!(pool.occupy(SeatId(0), AgentId(2)), OccupyOutcome::TakenBy(AgentId(4)));
        assert_eq!(pool.seat(SeatId(0)).unwrap().occupant(), Some(AgentId(4)));
    }

    #[test]
    fn inactive_seat_cannot_be_claimed() {
        let mut pool = static_pool(2);
        assert_eq!(pool.occupy(SeatId(1), AgentId(0)), OccupyOutcome::Inactive);
        assert!(!pool.seat(SeatId(1)).unwrap().is_occupied());
    }

    #[test]
    fn decoy_is_never_occupied_only_revealed() {
        let mut pool = SeatPool::configure(MechanicKind::Decoy.mechanic(), 5, ArenaBounds::default()).unwrap();
        pool.activate_all();
        let decoy = pool.seats().iter().find(|s| s.is_decoy()).unwrap().id();
        for agent in 0..4 {
            let outcome = pool.occupy(decoy, AgentId(agent));
            assert_eq!(
                outcome,
                OccupyOutcome::Decoy {
                    newly_revealed: agent == 0
                }
            );
        }
        let seat = pool.seat(decoy).unwrap();
        assert!(!seat.is_occupied());
        assert!(seat.is_revealed());
    }

    #[test]
    fn nearest_available_prefers_first_on_tie() {
        let mut pool = static_pool(4);
        pool.activate_all();
        let p = Position2D::new(0.0, 0.0);
        pool.place_for_test(SeatId(1), Position2D::new(10.0, 0.0));
        pool.place_for_test(SeatId(3), Position2D::new(0.0, 10.0));
        assert_eq!(pool.nearest_available(&p).map(|(id, _)| id), Some(SeatId(1)));
        pool.occupy(SeatId(1), AgentId(9));
        assert_eq!(pool.nearest_available(&p).map(|(id, _)| id), Some(SeatId(3)));
    }

    #[test]
    fn randomized_seats_settle_when_activated() {
        let mut rng = StdRng::seed_from_u64(21);
        let mut pool = SeatPool::configure(MechanicKind::Randomized.mechanic(), 4, ArenaBounds::default()).unwrap();
        pool.reconfigure_for_scramble(&mut rng);
        assert!(!pool.is_settled());
        pool.advance(16, &mut rng);
        pool.activate_all();
        assert!(pool.is_settled());
        assert_eq!(pool.available_seats().count(), 4);
    }

    #[test]
    fn moving_seats_stop_wandering_and_relocate_on_scramble() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut pool = SeatPool::configure(MechanicKind::Moving.mechanic(), 3, ArenaBounds::default()).unwrap();
        pool.start_active_motion(&mut rng);
        for _ in 0..30 {
            pool.advance(16, &mut rng);
        }
        let at_stop: Vec<_> = pool.seats().iter().map(|s| s.position()).collect();

        pool.reconfigure_for_scramble(&mut rng);
        pool.advance(16, &mut rng);
        assert!(pool.seats().iter().all(|s| !s.is_visible()));
        for _ in 0..12 {
            pool.advance(16, &mut rng);
        }
        assert!(pool.is_settled());
        let relocated: Vec<_> = pool.seats().iter().map(|s| s.position()).collect();
        assert!(at_stop.iter().zip(&relocated).all(|(a, b)| a != b));
        assert!(relocated.iter().all(|p| pool.arena().contains(p)));

        pool.advance(16, &mut rng);
        let later: Vec<_> = pool.seats().iter().map(|s| s.position()).collect();
        assert_eq!(relocated, later);
    }
}

use crate::common::{AgentId, SeatId};
use crate::domains::arena::{ArenaBounds, Position2D, Vector2D};
use crate::domains::seating::{OccupyOutcome, SeatPool};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgentKind {
    Human,
    Autonomous,
}

/// The part of the round an agent can observe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Music playing, nobody may sit.
    Active,
    /// Music stopped, seats become claimable.
    Scramble,
}

/// State every participant carries regardless of who steers it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentState {
    pub id: AgentId,
    pub name: String,
    pub kind: AgentKind,
    pub position: Position2D,
    pub velocity: Vector2D,
    seat: Option<SeatId>,
    eliminated: bool,
}

impl AgentState {
    pub fn new(id: AgentId, name: impl Into<String>, kind: AgentKind, position: Position2D) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            position,
            velocity: Vector2D::ZERO,
            seat: None,
            eliminated: false,
        }
    }

    pub fn is_seated(&self) -> bool {
        self.seat.is_some()
    }

    pub fn seat(&self) -> Option<SeatId> {
        self.seat
    }

    pub fn is_eliminated(&self) -> bool {
        self.eliminated
    }

    /// Still in the game and not yet sitting.
    pub fn is_seeking(&self) -> bool {
        !self.eliminated && self.seat.is_none()
    }

    pub fn is_human(&self) -> bool {
        self.kind == AgentKind::Human
    }

    /// Survivors carry identity into the next round; per-round flags reset.
    pub fn reset_for_round(&mut self, position: Position2D) {
        self.position = position;
        self.velocity = Vector2D::ZERO;
        self.seat = None;
    }

    pub(crate) fn sit(&mut self, seat: SeatId, position: Position2D) {
        self.seat = Some(seat);
        self.position = position;
        self.velocity = Vector2D::ZERO;
    }

    pub(crate) fn eliminate(&mut self) {
        self.eliminated = true;
        self.velocity = Vector2D::ZERO;
    }
}

/// Everything an agent may look at while deciding.
pub struct DecisionContext<'a> {
    pub phase: Phase,
    pub pool: &'a SeatPool,
    pub arena: ArenaBounds,
    pub dt_ms: u64,
    /// Intent captured by the input collaborator this tick. Only the human reads it.
    pub input: Option<Vector2D>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatAttempt {
    Seated(SeatId),
    /// Nearest free seat is outside the pickup radius.
    OutOfReach,
    NoSeatAvailable,
    /// Seat went to a rival in the same tick; retried on the next one.
    LostRace,
    /// Agent is not seeking right now.
    Idle,
}

/// Capability shared by human and autonomous participants.
pub trait Agent: Send + fmt::Debug {
    fn state(&self) -> &AgentState;
    fn state_mut(&mut self) -> &mut AgentState;

    /// Distance within which the agent sits on the nearest free seat.
    fn pickup_radius(&self) -> f64;

    /// Reset per-round behaviour. Called after the agent was placed for the round.
    fn begin_round(&mut self, arena: &ArenaBounds, rng: &mut dyn RngCore);

    /// Produce this tick's velocity.
    fn decide(&mut self, ctx: &DecisionContext<'_>, rng: &mut dyn RngCore) -> Vector2D;

    /// Sit on the nearest available seat if it is close enough.
    fn try_seat(&mut self, pool: &mut SeatPool) -> SeatAttempt {
        let radius = self.pickup_radius();
        claim_nearest(self.state_mut(), pool, radius)
    }
}

/// Nearest-available-seat search followed by the pool's claim call.
pub fn claim_nearest(state: &mut AgentState, pool: &mut SeatPool, pickup_radius: f64) -> SeatAttempt {
    if !state.is_seeking() {
        return SeatAttempt::Idle;
    }
    let Some((seat_id, distance)) = pool.nearest_available(&state.position) else {
        return SeatAttempt::NoSeatAvailable;
    };
    if distance >= pickup_radius {
        return SeatAttempt::OutOfReach;
    }
    match pool.occupy(seat_id, state.id) {
        OccupyOutcome::Claimed | OccupyOutcome::AlreadyHeld => {
            let position = pool.seat(seat_id).map(|s| s.position()).unwrap_or(state.position);
            state.sit(seat_id, position);
            SeatAttempt::Seated(seat_id)
        }
        _ => SeatAttempt::LostRace,
    }
}

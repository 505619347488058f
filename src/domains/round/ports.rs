use crate::common::SeatId;
use crate::domains::agents::{AgentState, Phase};
use crate::domains::arena::{ArenaBounds, Position2D, Vector2D};
use crate::domains::seating::{SeatBody, SeatPool};

/// Read-only view handed to the input collaborator each tick.
pub struct ArenaView<'a> {
    pub phase: Option<Phase>,
    pub human: Option<&'a AgentState>,
    pub pool: Option<&'a SeatPool>,
    pub arena: ArenaBounds,
}

/// Port for the human's movement intent (keyboard, touch joystick, scripts).
pub trait InputSource: Send {
    /// `None` means no intent this tick and is treated as standing still.
    fn poll(&mut self, view: &ArenaView<'_>) -> Option<Vector2D>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub seat_id: SeatId,
    pub decoy: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedMotion {
    pub position: Position2D,
    pub contacts: Vec<Contact>,
}

/// Port for the physics collaborator: turns a desired move into an actual one
/// and reports which seats the agent touched on the way.
pub trait MotionResolver: Send + Sync {
    fn resolve(
        &self,
        from: Position2D,
        desired: Position2D,
        seats: &[SeatBody],
        arena: &ArenaBounds,
    ) -> ResolvedMotion;
}

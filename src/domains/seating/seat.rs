use crate::common::{AgentId, SeatId};
use crate::domains::arena::Position2D;
use serde::{Deserialize, Serialize};

/// A single occupiable slot.
///
/// Invariants kept by [`super::SeatPool`]: a decoy is never occupied,
/// `occupied` implies `active`, and a seat has at most one occupant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Seat {
    id: SeatId,
    position: Position2D,
    active: bool,
    occupant: Option<AgentId>,
    is_decoy: bool,
    revealed: bool,
    /// False while a teleport fade hides the seat.
    visible: bool,
}

/// Result of a claim attempt. None of these are errors: losing a race is normal play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OccupyOutcome {
    Claimed,
    /// Same agent already holds the seat, nothing changed.
    AlreadyHeld,
    TakenBy(AgentId),
    Inactive,
    /// The seat is a decoy; `newly_revealed` is true the first time.
    Decoy { newly_revealed: bool },
    UnknownSeat,
}

impl OccupyOutcome {
    pub fn is_claimed(&self) -> bool {
        matches!(self, OccupyOutcome::Claimed | OccupyOutcome::AlreadyHeld)
    }
}

impl Seat {
    pub(crate) fn new(id: SeatId, position: Position2D, is_decoy: bool) -> Self {
        Self {
            id,
            position,
            active: false,
            occupant: None,
            is_decoy,
            revealed: false,
            visible: true,
        }
    }

    pub fn id(&self) -> SeatId {
        self.id
    }

    pub fn position(&self) -> Position2D {
        self.position
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }

    pub fn occupant(&self) -> Option<AgentId> {
        self.occupant
    }

    pub fn is_decoy(&self) -> bool {
        self.is_decoy
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Real seats are solid for the physics collaborator, decoys only overlap.
    pub fn is_blocking(&self) -> bool {
        !self.is_decoy
    }

    pub fn is_available(&self) -> bool {
        !self.is_decoy && self.active && self.occupant.is_none()
    }

    pub(crate) fn set_position(&mut self, position: Position2D) {
        self.position = position;
    }

    pub(crate) fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub(crate) fn activate(&mut self) {
        if !self.is_decoy {
            self.active = true;
        }
    }

    pub(crate) fn occupy(&mut self, agent: AgentId) -> OccupyOutcome {
        if self.is_decoy {
            return OccupyOutcome::Decoy {
                newly_revealed: self.reveal(),
            };
        }
        match self.occupant {
            Some(holder) if holder == agent => OccupyOutcome::AlreadyHeld,
            Some(holder) => OccupyOutcome::TakenBy(holder),
            None if !self.active => OccupyOutcome::Inactive,
            None => {
                self.occupant = Some(agent);
                OccupyOutcome::Claimed
            }
        }
    }

    /// Marks a decoy as revealed. Returns true only on the first reveal.
    pub(crate) fn reveal(&mut self) -> bool {
        if !self.is_decoy || self.revealed {
            return false;
        }
        self.revealed = true;
        true
    }
}

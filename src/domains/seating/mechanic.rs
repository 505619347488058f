use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Non-occupiable seats added by the decoy mechanic.
pub const DECOY_COUNT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MechanicKind {
    Static,
    Randomized,
    Moving,
    Teleporting,
    Decoy,
}

/// Immutable rule set for one round.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Mechanic {
    pub kind: MechanicKind,
    pub name: &'static str,
    /// How long the music plays.
    pub active_phase_ms: u64,
    /// Wait between music stop and seats becoming claimable.
    pub activation_delay_ms: u64,
}

pub const MECHANICS: [Mechanic; 5] = [
    Mechanic {
        kind: MechanicKind::Static,
        name: "Normal",
        active_phase_ms: 15_000,
        activation_delay_ms: 0,
    },
    Mechanic {
        kind: MechanicKind::Randomized,
        name: "Random Chairs",
        active_phase_ms: 12_000,
        activation_delay_ms: 500,
    },
    Mechanic {
        kind: MechanicKind::Moving,
        name: "Moving Chairs",
        active_phase_ms: 10_000,
        activation_delay_ms: 300,
    },
    Mechanic {
        kind: MechanicKind::Teleporting,
        name: "Teleport",
        active_phase_ms: 8_000,
        activation_delay_ms: 300,
    },
    Mechanic {
        kind: MechanicKind::Decoy,
        name: "Fake Chairs",
        active_phase_ms: 6_000,
        activation_delay_ms: 0,
    },
];

impl MechanicKind {
    pub fn mechanic(self) -> Mechanic {
        MECHANICS
            .iter()
            .copied()
            .find(|m| m.kind == self)
            .unwrap_or(MECHANICS[0])
    }

    pub fn decoy_count(self) -> usize {
        match self {
            MechanicKind::Decoy => DECOY_COUNT,
            _ => 0,
        }
    }

    /// Seats wander during the active phase.
    pub fn has_continuous_motion(self) -> bool {
        matches!(self, MechanicKind::Moving | MechanicKind::Decoy)
    }
}

impl Mechanic {
    pub fn base() -> Mechanic {
        MECHANICS[0]
    }

    /// Round 1 always plays the base mechanic, later rounds draw uniformly from the rest.
    pub fn pick_for_round<R: Rng + ?Sized>(round_index: u32, rng: &mut R) -> Mechanic {
        if round_index <= 1 {
            return Self::base();
        }
        MECHANICS[1..].choose(rng).copied().unwrap_or_else(Self::base)
    }

    /// Physical seats laid out for `seat_count` occupiable ones.
    pub fn physical_seat_count(&self, seat_count: usize) -> usize {
        seat_count + self.kind.decoy_count()
    }
}

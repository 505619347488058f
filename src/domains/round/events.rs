use crate::common::{AgentId, DomainEvent, SeatId};
use crate::domains::seating::MechanicKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOutcome {
    /// The human is the last agent standing.
    Won,
    /// The human was eliminated.
    Lost,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum GameEvent {
    GameStarted {
        game_id: String,
        population: usize,
        timestamp: DateTime<Utc>,
    },
    RoundStarted {
        game_id: String,
        round_index: u32,
        mechanic: MechanicKind,
        population: usize,
        seat_count: usize,
        decoy_count: usize,
        timestamp: DateTime<Utc>,
    },
    MusicStopped {
        game_id: String,
        round_index: u32,
        timestamp: DateTime<Utc>,
    },
    SeatsActivated {
        game_id: String,
        round_index: u32,
        timestamp: DateTime<Utc>,
    },
    SeatClaimed {
        game_id: String,
        round_index: u32,
        seat_id: SeatId,
        agent_id: AgentId,
        timestamp: DateTime<Utc>,
    },
    DecoyRevealed {
        game_id: String,
        round_index: u32,
        seat_id: SeatId,
        agent_id: AgentId,
        timestamp: DateTime<Utc>,
    },
    AgentEliminated {
        game_id: String,
        round_index: u32,
        agent_id: AgentId,
        agent_name: String,
        human: bool,
        timestamp: DateTime<Utc>,
    },
    GameEnded {
        game_id: String,
        outcome: GameOutcome,
        rounds_played: u32,
        timestamp: DateTime<Utc>,
    },
}

impl GameEvent {
    pub fn round_index(&self) -> Option<u32> {
        match self {
            GameEvent::RoundStarted { round_index, .. }
            | GameEvent::MusicStopped { round_index, .. }
            | GameEvent::SeatsActivated { round_index, .. }
            | GameEvent::SeatClaimed { round_index, .. }
            | GameEvent::DecoyRevealed { round_index, .. }
            | GameEvent::AgentEliminated { round_index, .. } => Some(*round_index),
            GameEvent::GameStarted { .. } | GameEvent::GameEnded { .. } => None,
        }
    }
}

impl DomainEvent for GameEvent {
    fn event_type(&self) -> &'static str {
        match self {
            GameEvent::GameStarted { .. } => "GameStarted",
            GameEvent::RoundStarted { .. } => "RoundStarted",
            GameEvent::MusicStopped { .. } => "MusicStopped",
            GameEvent::SeatsActivated { .. } => "SeatsActivated",
            GameEvent::SeatClaimed { .. } => "SeatClaimed",
            GameEvent::DecoyRevealed { .. } => "DecoyRevealed",
            GameEvent::AgentEliminated { .. } => "AgentEliminated",
            GameEvent::GameEnded { .. } => "GameEnded",
        }
    }

    fn aggregate_id(&self) -> &str {
        match self {
            GameEvent::GameStarted { game_id, .. } => game_id,
            GameEvent::RoundStarted { game_id, .. } => game_id,
            GameEvent::MusicStopped { game_id, .. } => game_id,
            GameEvent::SeatsActivated { game_id, .. } => game_id,
            GameEvent::SeatClaimed { game_id, .. } => game_id,
            GameEvent::DecoyRevealed { game_id, .. } => game_id,
            GameEvent::AgentEliminated { game_id, .. } => game_id,
            GameEvent::GameEnded { game_id, .. } => game_id,
        }
    }

    fn event_version(&self) -> u64 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            GameEvent::GameStarted { timestamp, .. } => *timestamp,
            GameEvent::RoundStarted { timestamp, .. } => *timestamp,
            GameEvent::MusicStopped { timestamp, .. } => *timestamp,
            GameEvent::SeatsActivated { timestamp, .. } => *timestamp,
            GameEvent::SeatClaimed { timestamp, .. } => *timestamp,
            GameEvent::DecoyRevealed { timestamp, .. } => *timestamp,
            GameEvent::AgentEliminated { timestamp, .. } => *timestamp,
            GameEvent::GameEnded { timestamp, .. } => *timestamp,
        }
    }
}

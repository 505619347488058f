use super::aggregate::{RoundController, RoundState};
use super::events::{GameEvent, GameOutcome};
use crate::common::{AgentId, SeatId};
use crate::domains::arena::Position2D;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeatView {
    pub id: SeatId,
    pub position: Position2D,
    pub active: bool,
    pub occupied: bool,
    pub decoy: bool,
    pub revealed: bool,
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentView {
    pub id: AgentId,
    pub name: String,
    pub human: bool,
    pub position: Position2D,
    pub seated: bool,
    pub eliminated: bool,
}

/// Read-only picture of one tick, built for a renderer or HUD.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub round_index: Option<u32>,
    pub mechanic_name: Option<String>,
    pub state: RoundState,
    /// Whole seconds of music left, rounded up. Only while the music plays.
    pub countdown_secs: Option<u64>,
    pub seats: Vec<SeatView>,
    pub agents: Vec<AgentView>,
    pub status_line: String,
    pub outcome: Option<GameOutcome>,
}

impl FrameSnapshot {
    pub fn capture(controller: &RoundController) -> Self {
        let round = controller.round();
        let seats = controller
            .pool()
            .map(|pool| {
                pool.seats()
                    .iter()
                    .map(|seat| SeatView {
                        id: seat.id(),
                        position: seat.position(),
                        active: seat.is_active(),
                        occupied: seat.is_occupied(),
                        decoy: seat.is_decoy(),
                        revealed: seat.is_revealed(),
                        visible: seat.is_visible(),
                    })
                    .collect()
            })
            .unwrap_or_default();
        let agents = controller
            .agents()
            .map(|agent| AgentView {
                id: agent.id,
                name: agent.name.clone(),
                human: agent.is_human(),
                position: agent.position,
                seated: agent.is_seated(),
                eliminated: agent.is_eliminated(),
            })
            .collect();
        let countdown_secs = match controller.state() {
            RoundState::ActivePhase => controller.music_remaining_ms().map(|ms| ms.div_ceil(1_000)),
            _ => None,
        };

        Self {
            round_index: round.map(|r| r.index),
            mechanic_name: round.map(|r| r.mechanic.name.to_string()),
            state: controller.state(),
            countdown_secs,
            seats,
            agents,
            status_line: Self::status_line(controller),
            outcome: controller.outcome(),
        }
    }

    fn status_line(controller: &RoundController) -> String {
        let human_seated = controller.human().map(|h| h.is_seated()).unwrap_or(false);
        match controller.state() {
            RoundState::Initializing | RoundState::NextRound => "Get ready...".to_string(),
            RoundState::ActivePhase => match controller.round() {
                Some(round) => format!("Round {}: {} - music is playing", round.index, round.mechanic.name),
                None => "Music is playing".to_string(),
            },
            RoundState::ScramblePhase if human_seated => "You got a seat!".to_string(),
            RoundState::ScramblePhase => "Music stopped! Find a seat!".to_string(),
            RoundState::Resolving => match controller.eliminations().last().and_then(|id| controller.agent(*id)) {
                Some(agent) if agent.is_human() => "You were eliminated!".to_string(),
                Some(agent) => format!("{} is out!", agent.name),
                None => "Counting seats...".to_string(),
            },
            RoundState::GameOver => match controller.outcome() {
                Some(GameOutcome::Won) => "You win!".to_string(),
                Some(GameOutcome::Lost) => "Game over".to_string(),
                None => "Game over".to_string(),
            },
        }
    }
}

/// Running summary of one game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSummaryProjection {
    pub game_id: String,
    pub starting_population: usize,
    pub rounds_started: u32,
    pub rounds_played: u32,
    pub elimination_order: Vec<AgentId>,
    pub decoys_revealed: usize,
    pub outcome: Option<GameOutcome>,
    pub started_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
}

impl GameSummaryProjection {
    pub fn new(game_id: String, starting_population: usize, started_at: DateTime<Utc>) -> Self {
        Self {
            game_id,
            starting_population,
            rounds_started: 0,
            rounds_played: 0,
            elimination_order: Vec::new(),
            decoys_revealed: 0,
            outcome: None,
            started_at,
            last_activity: started_at,
        }
    }

    pub fn apply_event(&mut self, event: &GameEvent) {
        match event {
            GameEvent::RoundStarted { timestamp, .. } => {
                self.rounds_started += 1;
                self.last_activity = *timestamp;
            }
            GameEvent::DecoyRevealed { timestamp, .. } => {
                self.decoys_revealed += 1;
                self.last_activity = *timestamp;
            }
            GameEvent::AgentEliminated { agent_id, timestamp, .. } => {
                self.rounds_played += 1;
                self.elimination_order.push(*agent_id);
                self.last_activity = *timestamp;
            }
            GameEvent::GameEnded { outcome, timestamp, .. } => {
                self.outcome = Some(*outcome);
                self.last_activity = *timestamp;
            }
            _ => {}
        }
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }
}

/// Per-agent cues for the presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentCueProjection {
    pub agent_id: AgentId,
    pub seated_in_round: Option<u32>,
    pub seats_claimed: u32,
    pub decoys_touched: u32,
    pub eliminated_in_round: Option<u32>,
    pub name: Option<String>,
}

impl AgentCueProjection {
    pub fn new(agent_id: AgentId) -> Self {
        Self {
            agent_id,
            seated_in_round: None,
            seats_claimed: 0,
            decoys_touched: 0,
            eliminated_in_round: None,
            name: None,
        }
    }

    pub fn is_seated(&self, round_index: u32) -> bool {
        self.seated_in_round == Some(round_index)
    }

    pub fn is_eliminated(&self) -> bool {
        self.eliminated_in_round.is_some()
    }

    pub fn apply_event(&mut self, event: &GameEvent) {
        match event {
            GameEvent::SeatClaimed {
                agent_id, round_index, ..
            } if *agent_id == self.agent_id => {
                self.seated_in_round = Some(*round_index);
                self.seats_claimed += 1;
            }
            GameEvent::DecoyRevealed { agent_id, .. } if *agent_id == self.agent_id => {
                self.decoys_touched += 1;
            }
            GameEvent::AgentEliminated {
                agent_id,
                round_index,
                agent_name,
                ..
            } if *agent_id == self.agent_id => {
                self.eliminated_in_round = Some(*round_index);
                self.name = Some(agent_name.clone());
            }
            GameEvent::RoundStarted { .. } => {
                self.seated_in_round = None;
            }
            _ => {}
        }
    }
}

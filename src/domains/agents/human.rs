use super::agent::{Agent, AgentKind, AgentState, DecisionContext};
use crate::common::AgentId;
use crate::domains::arena::{ArenaBounds, Position2D, Vector2D};
use rand::RngCore;

pub const HUMAN_SPEED: f64 = 200.0;
pub const HUMAN_PICKUP_RADIUS: f64 = 100.0;
/// Joystick noise below this on both axes is ignored.
pub const INPUT_DEAD_ZONE: f64 = 0.1;

/// Participant steered by captured input. No reaction delay and no
/// stuck handling: the player's own reflexes stand in for both.
#[derive(Debug, Clone)]
pub struct HumanAgent {
    state: AgentState,
    speed: f64,
}

impl HumanAgent {
    pub fn new(id: AgentId, name: impl Into<String>, position: Position2D) -> Self {
        Self {
            state: AgentState::new(id, name, AgentKind::Human, position),
            speed: HUMAN_SPEED,
        }
    }
}

impl Agent for HumanAgent {
    fn state(&self) -> &AgentState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut AgentState {
        &mut self.state
    }

    fn pickup_radius(&self) -> f64 {
        HUMAN_PICKUP_RADIUS
    }

    fn begin_round(&mut self, _arena: &ArenaBounds, _rng: &mut dyn RngCore) {}

    fn decide(&mut self, ctx: &DecisionContext<'_>, _rng: &mut dyn RngCore) -> Vector2D {
        if !self.state.is_seeking() {
            return Vector2D::ZERO;
        }
        match ctx.input {
            Some(intent) => {
                let intent = intent.clamped_unit_axes();
                if intent.x.abs() > INPUT_DEAD_ZONE || intent.y.abs() > INPUT_DEAD_ZONE {
                    intent.scaled(self.speed)
                } else {
                    Vector2D::ZERO
                }
            }
            None => Vector2D::ZERO,
        }
    }
}

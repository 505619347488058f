use crate::domains::agents::Phase;
use crate::domains::arena::{Position2D, Vector2D};
use crate::domains::round::{ArenaView, InputSource};
use std::collections::VecDeque;

/// The human never moves.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInput;

impl InputSource for NoInput {
    fn poll(&mut self, _view: &ArenaView<'_>) -> Option<Vector2D> {
        None
    }
}

/// Replays a fixed list of per-tick intents, then reports nothing.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    script: VecDeque<Option<Vector2D>>,
}

impl ScriptedInput {
    pub fn new(script: impl IntoIterator<Item = Option<Vector2D>>) -> Self {
        Self {
            script: script.into_iter().collect(),
        }
    }

    /// The same intent for `ticks` ticks.
    pub fn hold(intent: Vector2D, ticks: usize) -> Self {
        Self::new(std::iter::repeat(Some(intent)).take(ticks))
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self, _view: &ArenaView<'_>) -> Option<Vector2D> {
        self.script.pop_front().flatten()
    }
}

/// Plays the human like a bot without reflex delay: circles the centre while
/// the music plays and heads for the nearest free seat once it stops.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutopilotInput;

impl AutopilotInput {
    fn toward(from: &Position2D, to: &Position2D) -> Option<Vector2D> {
        let dx = to.x - from.x;
        let dy = to.y - from.y;
        let length = (dx * dx + dy * dy).sqrt();
        (length > f64::EPSILON).then(|| Vector2D::new(dx / length, dy / length))
    }
}

impl InputSource for AutopilotInput {
    fn poll(&mut self, view: &ArenaView<'_>) -> Option<Vector2D> {
        let human = view.human?;
        if human.is_seated() {
            return None;
        }
        match view.phase? {
            Phase::Active => {
                // Tangent to the circle around the centre, counter-clockwise.
                let radial = Self::toward(&view.arena.center(), &human.position)?;
                Some(Vector2D::new(-radial.y, radial.x))
            }
            Phase::Scramble => {
                let pool = view.pool?;
                let (seat_id, _) = pool.nearest_available(&human.position)?;
                let seat = pool.seat(seat_id)?;
                Self::toward(&human.position, &seat.position())
            }
        }
    }
}

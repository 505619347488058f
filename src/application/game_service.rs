use crate::common::{AgentId, AggregateRoot, ApplicationResult};
use crate::domains::logger::DynLogger;
use crate::domains::round::{
    FrameSnapshot, GameEventPublisher, GameOutcome, InputSource, MotionResolver, RoundController, RoundSettings,
    RoundState,
};
use serde::Serialize;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use uuid::Uuid;

/// Result of a finished (or abandoned) run.
#[derive(Debug, Clone, Serialize)]
pub struct GameReport {
    pub game_id: String,
    pub outcome: Option<GameOutcome>,
    pub rounds_played: u32,
    pub elimination_order: Vec<(AgentId, String)>,
    pub ticks: u64,
}

/// Drives one game: polls input, ticks the controller and forwards what
/// happened to the event actor.
pub struct GameService {
    controller: RoundController,
    input: Box<dyn InputSource>,
    publisher: Option<GameEventPublisher>,
    logger: DynLogger,
    ticks: u64,
}

impl GameService {
    pub fn new(
        controller: RoundController,
        input: Box<dyn InputSource>,
        publisher: Option<GameEventPublisher>,
        logger: DynLogger,
    ) -> Self {
        Self {
            controller,
            input,
            publisher,
            logger,
            ticks: 0,
        }
    }

    /// Build the controller for a fresh game and wrap it.
    pub fn start(
        settings: RoundSettings,
        physics: Box<dyn MotionResolver>,
        input: Box<dyn InputSource>,
        publisher: Option<GameEventPublisher>,
        logger: DynLogger,
    ) -> ApplicationResult<Self> {
        let game_id = format!("game-{}", Uuid::new_v4());
        let controller = RoundController::new(game_id, settings, physics, logger.clone())?;
        Ok(Self::new(controller, input, publisher, logger))
    }

    pub fn controller(&self) -> &RoundController {
        &self.controller
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot::capture(&self.controller)
    }

    /// One fixed tick, then forward the drained events.
    pub async fn step(&mut self) -> ApplicationResult<RoundState> {
        let intent = {
            let view = self.controller.arena_view();
            self.input.poll(&view)
        };
        let state = match self.controller.tick(intent) {
            Ok(state) => state,
            Err(e) => {
                self.logger.error(&format!("game loop aborted: {}", e));
                self.flush().await?;
                return Err(e.into());
            }
        };
        self.ticks += 1;
        self.flush().await?;
        Ok(state)
    }

    /// Step as fast as possible until the game ends or `max_ticks` is hit.
    pub async fn run_headless(&mut self, max_ticks: u64) -> ApplicationResult<GameReport> {
        while !self.controller.is_over() && self.ticks < max_ticks {
            self.step().await?;
        }
        self.finish(max_ticks)
    }

    /// Step once per tick length of wall time.
    pub async fn run_realtime(&mut self, max_ticks: u64) -> ApplicationResult<GameReport> {
        let mut clock = interval(Duration::from_millis(self.controller.settings().tick_ms));
        clock.set_missed_tick_behavior(MissedTickBehavior::Delay);
        while !self.controller.is_over() && self.ticks < max_ticks {
            clock.tick().await;
            self.step().await?;
        }
        self.finish(max_ticks)
    }

    pub fn report(&self) -> GameReport {
        GameReport {
            game_id: self.controller.id().to_string(),
            outcome: self.controller.outcome(),
            rounds_played: self.controller.resolutions(),
            elimination_order: self
                .controller
                .eliminations()
                .iter()
                .map(|id| {
                    let name = self
                        .controller
                        .agent(*id)
                        .map(|a| a.name.clone())
                        .unwrap_or_else(|| id.to_string());
                    (*id, name)
                })
                .collect(),
            ticks: self.ticks,
        }
    }

    fn finish(&self, max_ticks: u64) -> ApplicationResult<GameReport> {
        if !self.controller.is_over() {
            self.logger
                .warn(&format!("stopped after {} ticks without a winner", max_ticks));
        }
        Ok(self.report())
    }

    async fn flush(&mut self) -> ApplicationResult<()> {
        let events = self.controller.take_uncommitted_events();
        let Some(publisher) = self.publisher.as_ref() else {
            return Ok(());
        };
        for event in events {
            publisher.publish(event).await?;
        }
        Ok(())
    }
}

use super::elimination::{EliminationResolver, UnseatedAgent};
use super::events::{GameEvent, GameOutcome};
use super::ports::{ArenaView, MotionResolver};
use super::timers::{PhaseTimers, TimerKind};
use crate::common::{AgentId, AggregateRoot, DomainError, DomainResult};
use crate::domains::agents::{
    Agent, AgentState, AutonomousAgent, DecisionContext, Difficulty, HumanAgent, Phase, SeatAttempt,
};
use crate::domains::arena::{ArenaBounds, Vector2D};
use crate::domains::logger::DynLogger;
use crate::domains::seating::{Mechanic, MechanicKind, SeatPool};
use chrono::Utc;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Radius of the ring agents are placed on at round start.
pub const SPAWN_RING_RADIUS: f64 = 280.0;
pub const DEFAULT_TICK_MS: u64 = 16;
pub const SCRAMBLE_WINDOW_MS: u64 = 6_000;
pub const INTERMISSION_MS: u64 = 2_000;
/// Shorter pause before the game ends on the human's elimination.
pub const DEFEAT_DELAY_MS: u64 = 1_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundState {
    Initializing,
    ActivePhase,
    ScramblePhase,
    Resolving,
    NextRound,
    GameOver,
}

/// How each round's mechanic is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "mechanic", rename_all = "snake_case")]
pub enum MechanicSchedule {
    /// Round 1 is static, later rounds are drawn at random.
    Standard,
    /// Every round uses the same mechanic.
    Fixed(MechanicKind),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoundSettings {
    pub population: usize,
    pub arena: ArenaBounds,
    pub tick_ms: u64,
    pub scramble_window_ms: u64,
    /// Pause after a bot is eliminated.
    pub intermission_ms: u64,
    /// Pause after the human is eliminated.
    pub defeat_delay_ms: u64,
    pub difficulty: Difficulty,
    pub schedule: MechanicSchedule,
    pub rng_seed: Option<u64>,
    pub human_name: String,
}

impl Default for RoundSettings {
    fn default() -> Self {
        Self {
            population: 6,
            arena: ArenaBounds::default(),
            tick_ms: DEFAULT_TICK_MS,
            scramble_window_ms: SCRAMBLE_WINDOW_MS,
            intermission_ms: INTERMISSION_MS,
            defeat_delay_ms: DEFEAT_DELAY_MS,
            difficulty: Difficulty::Hard,
            schedule: MechanicSchedule::Standard,
            rng_seed: None,
            human_name: "You".to_string(),
        }
    }
}

/// The round currently being played. Replaced wholesale at every round start.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Round {
    pub index: u32,
    pub mechanic: Mechanic,
    pub population: usize,
    /// Occupiable seats, always `population - 1`.
    pub seat_count: usize,
}

/// Drives the game one fixed tick at a time:
/// `Initializing -> ActivePhase -> ScramblePhase -> Resolving -> NextRound | GameOver`.
///
/// Owns the agents, the seat pool and every timer. Timers are cancelled on
/// each state exit, and the pool is rebuilt at each round start, so nothing
/// from a finished round can touch the next one.
pub struct RoundController {
    id: String,
    settings: RoundSettings,
    state: RoundState,
    round: Option<Round>,
    next_round_index: u32,
    population: usize,
    agents: Vec<Box<dyn Agent>>,
    pool: Option<SeatPool>,
    timers: PhaseTimers,
    rng: StdRng,
    physics: Box<dyn MotionResolver>,
    logger: DynLogger,
    pending_outcome: Option<GameOutcome>,
    outcome: Option<GameOutcome>,
    eliminations: Vec<AgentId>,
    resolutions: u32,
    version: u64,
    uncommitted_events: Vec<GameEvent>,
}

impl RoundController {
    pub fn new(
        id: String,
        settings: RoundSettings,
        physics: Box<dyn MotionResolver>,
        logger: DynLogger,
    ) -> DomainResult<Self> {
        if settings.population < 2 {
            return Err(DomainError::InvalidCommand {
                reason: format!("population must be at least 2, got {}", settings.population),
            });
        }
        if settings.tick_ms == 0 {
            return Err(DomainError::InvalidCommand {
                reason: "tick length must be positive".to_string(),
            });
        }

        let rng = match settings.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let center = settings.arena.center();
        let profile = settings.difficulty.profile();
        let mut agents: Vec<Box<dyn Agent>> = Vec::with_capacity(settings.population);
        agents.push(Box::new(HumanAgent::new(AgentId(0), settings.human_name.clone(), center)));
        for i in 1..settings.population {
            agents.push(Box::new(AutonomousAgent::new(AgentId(i), format!("Bot {}", i), center, profile)));
        }

        let mut controller = Self {
            id,
            population: settings.population,
            settings,
            state: RoundState::Initializing,
            round: None,
            next_round_index: 1,
            agents,
            pool: None,
            timers: PhaseTimers::new(),
            rng,
            physics,
            logger,
            pending_outcome: None,
            outcome: None,
            eliminations: Vec::new(),
            resolutions: 0,
            version: 0,
            uncommitted_events: Vec::new(),
        };

        let event = GameEvent::GameStarted {
            game_id: controller.id.clone(),
            population: controller.population,
            timestamp: Utc::now(),
        };
        controller.record(event)?;
        Ok(controller)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn settings(&self) -> &RoundSettings {
        &self.settings
    }

    pub fn state(&self) -> RoundState {
        self.state
    }

    pub fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    pub fn population(&self) -> usize {
        self.population
    }

    pub fn pool(&self) -> Option<&SeatPool> {
        self.pool.as_ref()
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    pub fn is_over(&self) -> bool {
        self.state == RoundState::GameOver
    }

    /// Eliminated agents in the order they left.
    pub fn eliminations(&self) -> &[AgentId] {
        &self.eliminations
    }

    pub fn resolutions(&self) -> u32 {
        self.resolutions
    }

    pub fn agents(&self) -> impl Iterator<Item = &AgentState> {
        self.agents.iter().map(|a| a.state())
    }

    pub fn live_agents(&self) -> impl Iterator<Item = &AgentState> {
        self.agents().filter(|a| !a.is_eliminated())
    }

    pub fn agent(&self, id: AgentId) -> Option<&AgentState> {
        self.agents().find(|a| a.id == id)
    }

    pub fn human(&self) -> Option<&AgentState> {
        self.agents().find(|a| a.is_human())
    }

    /// Phase as agents see it, `None` outside the two playing states.
    pub fn phase(&self) -> Option<Phase> {
        match self.state {
            RoundState::ActivePhase => Some(Phase::Active),
            RoundState::ScramblePhase => Some(Phase::Scramble),
            _ => None,
        }
    }

    pub fn music_remaining_ms(&self) -> Option<u64> {
        self.timers.remaining_ms(TimerKind::MusicStop)
    }

    pub fn arena_view(&self) -> ArenaView<'_> {
        ArenaView {
            phase: self.phase(),
            human: self.human().filter(|h| !h.is_eliminated()),
            pool: self.pool.as_ref(),
            arena: self.settings.arena,
        }
    }

    /// Run one fixed tick. `input` is the human's captured intent, if any.
    pub fn tick(&mut self, input: Option<Vector2D>) -> DomainResult<RoundState> {
        match self.state {
            RoundState::GameOver => return Ok(self.state),
            RoundState::Initializing => {
                self.start_round()?;
                return Ok(self.state);
            }
            RoundState::NextRound => {
                self.state = RoundState::Initializing;
                self.start_round()?;
                return Ok(self.state);
            }
            RoundState::ActivePhase | RoundState::ScramblePhase | RoundState::Resolving => {}
        }

        let dt = self.settings.tick_ms;
        if let Some(pool) = self.pool.as_mut() {
            pool.advance(dt, &mut self.rng);
        }

        let mut fired = self.timers.advance(dt);
        while !fired.is_empty() {
            for kind in fired {
                self.on_timer(kind)?;
            }
            fired = self.timers.take_due();
        }

        if let Some(phase) = self.phase() {
            self.step_agents(phase, dt, input)?;
        }
        self.pin_seated_agents()?;
        Ok(self.state)
    }

    /// Cancel every timer of the state being left.
    fn exit_state(&mut self) {
        self.timers.cancel_all();
    }

    fn start_round(&mut self) -> DomainResult<()> {
        self.exit_state();

        let live = self.agents.iter().filter(|a| !a.state().is_eliminated()).count();
        if live != self.population || live == 0 {
            return Err(DomainError::invariant(format!(
                "population {} does not match {} live agents",
                self.population, live
            )));
        }

        let index = self.next_round_index;
        let mechanic = match self.settings.schedule {
            MechanicSchedule::Standard => Mechanic::pick_for_round(index, &mut self.rng),
            MechanicSchedule::Fixed(kind) => kind.mechanic(),
        };
        let seat_count = self.population - 1;
        let arena = self.settings.arena;

        // Dropping the previous pool drops its seats and motion state with it.
        let mut pool = SeatPool::configure(mechanic, seat_count, arena)?;

        let center = arena.center();
        let population = self.population;
        for (slot, agent) in self
            .agents
            .iter_mut()
            .filter(|a| !a.state().is_eliminated())
            .enumerate()
        {
            let angle = slot as f64 / population as f64 * TAU;
            agent.state_mut().reset_for_round(center.on_circle(angle, SPAWN_RING_RADIUS));
            agent.begin_round(&arena, &mut self.rng);
        }

        pool.start_active_motion(&mut self.rng);
        let decoy_count = pool.decoy_count();
        self.pool = Some(pool);
        self.round = Some(Round {
            index,
            mechanic,
            population,
            seat_count,
        });
        self.timers.schedule(TimerKind::MusicStop, mechanic.active_phase_ms);
        self.state = RoundState::ActivePhase;

        self.logger.info(&format!(
            "round {} started: {} ({} agents, {} seats, {} decoys)",
            index, mechanic.name, population, seat_count, decoy_count
        ));
        self.record(GameEvent::RoundStarted {
            game_id: self.id.clone(),
            round_index: index,
            mechanic: mechanic.kind,
            population,
            seat_count,
            decoy_count,
            timestamp: Utc::now(),
        })
    }

    fn on_timer(&mut self, kind: TimerKind) -> DomainResult<()> {
        match (kind, self.state) {
            (TimerKind::MusicStop, RoundState::ActivePhase) => self.stop_music(),
            (TimerKind::ActivateSeats, RoundState::ScramblePhase) => {
                if let Some(pool) = self.pool.as_mut() {
                    pool.activate_all();
                }
                let round_index = self.current_round_index();
                self.record(GameEvent::SeatsActivated {
                    game_id: self.id.clone(),
                    round_index,
                    timestamp: Utc::now(),
                })
            }
            (TimerKind::ResolveRound, RoundState::ScramblePhase) => {
                self.exit_state();
                self.state = RoundState::Resolving;
                self.resolve_round()
            }
            (TimerKind::Intermission, RoundState::Resolving) => {
                self.exit_state();
                self.finish_resolution()
            }
            // A timer outliving its state is ignored.
            _ => Ok(()),
        }
    }

    fn stop_music(&mut self) -> DomainResult<()> {
        self.exit_state();
        self.state = RoundState::ScramblePhase;

        let Some(round) = self.round else {
            return Err(DomainError::invariant("music stopped without a round"));
        };
        if let Some(pool) = self.pool.as_mut() {
            pool.reconfigure_for_scramble(&mut self.rng);
        }
        if round.mechanic.kind == MechanicKind::Teleporting {
            let corners = self.settings.arena.padded_corners();
            for agent in self.agents.iter_mut().filter(|a| a.state().is_seeking()) {
                if let Some(corner) = corners.choose(&mut self.rng) {
                    let state = agent.state_mut();
                    state.position = *corner;
                    state.velocity = Vector2D::ZERO;
                }
            }
        }

        self.timers
            .schedule(TimerKind::ActivateSeats, round.mechanic.activation_delay_ms);
        self.timers
            .schedule(TimerKind::ResolveRound, self.settings.scramble_window_ms);

        self.logger.info(&format!("round {}: music stopped", round.index));
        self.record(GameEvent::MusicStopped {
            game_id: self.id.clone(),
            round_index: round.index,
            timestamp: Utc::now(),
        })
    }

    fn step_agents(&mut self, phase: Phase, dt: u64, input: Option<Vector2D>) -> DomainResult<()> {
        let round_index = self.current_round_index();
        let arena = self.settings.arena;
        let Self {
            agents,
            pool,
            rng,
            physics,
            logger,
            id,
            ..
        } = self;
        let Some(pool) = pool.as_mut() else {
            return Err(DomainError::invariant("agents stepped without a seat pool"));
        };

        let bodies = pool.bodies();
        let mut events = Vec::new();
        for agent in agents.iter_mut() {
            if !agent.state().is_seeking() {
                continue;
            }
            let ctx = DecisionContext {
                phase,
                pool: &*pool,
                arena,
                dt_ms: dt,
                input: if agent.state().is_human() { input } else { None },
            };
            let velocity = agent.decide(&ctx, rng);

            let state = agent.state_mut();
            state.velocity = velocity;
            let desired = state.position.advanced(velocity, dt);
            let resolved = physics.resolve(state.position, desired, &bodies, &arena);
            state.position = resolved.position;
            let agent_id = state.id;

            for contact in resolved.contacts.iter().filter(|c| c.decoy) {
                if pool.reveal_decoy(contact.seat_id) {
                    logger.debug(&format!("{} revealed decoy {}", agent_id, contact.seat_id));
                    events.push(GameEvent::DecoyRevealed {
                        game_id: id.clone(),
                        round_index,
                        seat_id: contact.seat_id,
                        agent_id,
                        timestamp: Utc::now(),
                    });
                }
            }

            if phase == Phase::Scramble {
                if let SeatAttempt::Seated(seat_id) = agent.try_seat(pool) {
                    logger.debug(&format!("{} sat on {}", agent_id, seat_id));
                    events.push(GameEvent::SeatClaimed {
                        game_id: id.clone(),
                        round_index,
                        seat_id,
                        agent_id,
                        timestamp: Utc::now(),
                    });
                }
            }
        }

        for event in events {
            self.record(event)?;
        }
        Ok(())
    }

    /// A seated agent sits exactly where its seat is.
    fn pin_seated_agents(&mut self) -> DomainResult<()> {
        let Some(pool) = self.pool.as_ref() else {
            return Ok(());
        };
        for agent in self.agents.iter_mut().filter(|a| !a.state().is_eliminated()) {
            let Some(seat_id) = agent.state().seat() else {
                continue;
            };
            let seat = pool.seat(seat_id).ok_or(DomainError::SeatNotFound { id: seat_id.0 })?;
            agent.state_mut().position = seat.position();
        }
        Ok(())
    }

    fn resolve_round(&mut self) -> DomainResult<()> {
        let round_index = self.current_round_index();
        let unseated: Vec<UnseatedAgent> = self
            .live_agents()
            .filter(|a| !a.is_seated())
            .map(|a| UnseatedAgent {
                id: a.id,
                position: a.position,
            })
            .collect();
        let seat_positions: Vec<_> = self
            .pool
            .as_ref()
            .map(|p| p.seats().iter().map(|s| s.position()).collect())
            .unwrap_or_default();

        let elimination = EliminationResolver::resolve(&unseated, &seat_positions)?;
        if unseated.len() > 1 {
            self.logger.warn(&format!(
                "round {}: {} agents unseated, eliminating the one furthest from a seat",
                round_index,
                unseated.len()
            ));
        }

        let (name, human) = {
            let agent = self
                .agents
                .iter_mut()
                .find(|a| a.state().id == elimination.agent_id)
                .ok_or(DomainError::AgentNotFound {
                    id: elimination.agent_id.0,
                })?;
            agent.state_mut().eliminate();
            (agent.state().name.clone(), agent.state().is_human())
        };

        if self.population <= 1 {
            return Err(DomainError::invariant("elimination would leave no agents"));
        }
        self.population -= 1;
        self.resolutions += 1;
        self.next_round_index = round_index + 1;
        self.pending_outcome = if human {
            Some(GameOutcome::Lost)
        } else if self.population == 1 {
            Some(GameOutcome::Won)
        } else {
            None
        };

        self.logger.info(&format!("round {}: {} eliminated", round_index, name));
        self.record(GameEvent::AgentEliminated {
            game_id: self.id.clone(),
            round_index,
            agent_id: elimination.agent_id,
            agent_name: name,
            human,
            timestamp: Utc::now(),
        })?;

        let pause_ms = if human {
            self.settings.defeat_delay_ms
        } else {
            self.settings.intermission_ms
        };
        if pause_ms == 0 {
            self.finish_resolution()
        } else {
            self.timers.schedule(TimerKind::Intermission, pause_ms);
            Ok(())
        }
    }

    fn finish_resolution(&mut self) -> DomainResult<()> {
        match self.pending_outcome.take() {
            Some(outcome) => {
                self.state = RoundState::GameOver;
                for agent in self.agents.iter_mut() {
                    agent.state_mut().velocity = Vector2D::ZERO;
                }
                self.logger.info(&format!("game over: {:?} after {} rounds", outcome, self.resolutions));
                self.record(GameEvent::GameEnded {
                    game_id: self.id.clone(),
                    outcome,
                    rounds_played: self.resolutions,
                    timestamp: Utc::now(),
                })
            }
            None => {
                self.state = RoundState::NextRound;
                Ok(())
            }
        }
    }

    fn current_round_index(&self) -> u32 {
        self.round.map(|r| r.index).unwrap_or(self.next_round_index)
    }
}

impl AggregateRoot for RoundController {
    type Event = GameEvent;

    fn aggregate_id(&self) -> &str {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }

    fn apply(&mut self, event: &Self::Event) -> DomainResult<()> {
        match event {
            GameEvent::AgentEliminated { agent_id, .. } => {
                self.eliminations.push(*agent_id);
            }
            GameEvent::GameEnded { outcome, .. } => {
                self.outcome = Some(*outcome);
            }
            _ => {}
        }
        self.version += 1;
        Ok(())
    }

    fn uncommitted_events(&self) -> &[Self::Event] {
        &self.uncommitted_events
    }

    fn mark_events_as_committed(&mut self) {
        self.uncommitted_events.clear();
    }

    fn add_event(&mut self, event: Self::Event) {
        self.uncommitted_events.push(event);
    }
}

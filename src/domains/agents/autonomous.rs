use super::agent::{claim_nearest, Agent, AgentKind, AgentState, DecisionContext, Phase, SeatAttempt};
use crate::common::{AgentId, SeatId};
use crate::domains::arena::{ArenaBounds, Position2D, Vector2D};
use crate::domains::seating::SeatPool;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;

pub const ORBIT_RADIUS: f64 = 200.0;
/// Radians the loitering target advances per tick.
pub const ORBIT_STEP: f64 = 0.02;
pub const AUTONOMOUS_PICKUP_RADIUS: f64 = 80.0;
/// Per-tick displacement below which the agent counts as not moving.
pub const STUCK_DISPLACEMENT: f64 = 1.0;
pub const STUCK_THRESHOLD_MS: u64 = 200;
pub const ESCAPE_DURATION_MS: u64 = 1_500;
pub const ESCAPE_REROLL_MS: u64 = 100;
pub const ESCAPE_SPEED_FACTOR: f64 = 1.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// Speed and reflexes of an autonomous agent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkillProfile {
    pub base_speed: f64,
    pub reaction_min_ms: u64,
    pub reaction_max_ms: u64,
}

impl Difficulty {
    pub fn profile(self) -> SkillProfile {
        match self {
            Difficulty::Easy => SkillProfile {
                base_speed: 150.0,
                reaction_min_ms: 500,
                reaction_max_ms: 1_000,
            },
            Difficulty::Medium => SkillProfile {
                base_speed: 200.0,
                reaction_min_ms: 200,
                reaction_max_ms: 500,
            },
            Difficulty::Hard => SkillProfile {
                base_speed: 250.0,
                reaction_min_ms: 0,
                reaction_max_ms: 150,
            },
        }
    }
}

impl SkillProfile {
    pub fn draw_reaction_delay<R: Rng + ?Sized>(&self, rng: &mut R) -> u64 {
        let (low, high) = if self.reaction_min_ms <= self.reaction_max_ms {
            (self.reaction_min_ms, self.reaction_max_ms)
        } else {
            (self.reaction_max_ms, self.reaction_min_ms)
        };
        rng.gen_range(low..=high)
    }
}

#[derive(Debug, Clone, Default)]
struct StuckTracker {
    last_position: Option<Position2D>,
    stuck_ms: u64,
}

#[derive(Debug, Clone)]
struct EscapeMode {
    remaining_ms: u64,
    reroll_in_ms: u64,
    heading: f64,
}

/// Participant driven by the loiter / react / pursue / escape policy.
#[derive(Debug, Clone)]
pub struct AutonomousAgent {
    state: AgentState,
    skill: SkillProfile,
    orbit_angle: f64,
    reaction_remaining_ms: u64,
    stuck: StuckTracker,
    escape: Option<EscapeMode>,
    target: Option<SeatId>,
}

impl AutonomousAgent {
    pub fn new(id: AgentId, name: impl Into<String>, position: Position2D, skill: SkillProfile) -> Self {
        Self {
            state: AgentState::new(id, name, AgentKind::Autonomous, position),
            skill,
            orbit_angle: 0.0,
            reaction_remaining_ms: 0,
            stuck: StuckTracker::default(),
            escape: None,
            target: None,
        }
    }

    pub fn skill(&self) -> SkillProfile {
        self.skill
    }

    pub fn reaction_remaining_ms(&self) -> u64 {
        self.reaction_remaining_ms
    }

    pub fn is_escaping(&self) -> bool {
        self.escape.is_some()
    }

    pub fn stuck_ms(&self) -> u64 {
        self.stuck.stuck_ms
    }

    pub fn target(&self) -> Option<SeatId> {
        self.target
    }

    fn orbit(&mut self, arena: &ArenaBounds) -> Vector2D {
        self.orbit_angle += ORBIT_STEP;
        let waypoint = arena.center().on_circle(self.orbit_angle, ORBIT_RADIUS);
        Vector2D::from_angle(self.state.position.angle_to(&waypoint), self.skill.base_speed)
    }

    fn scramble(&mut self, ctx: &DecisionContext<'_>, rng: &mut dyn RngCore) -> Vector2D {
        if self.reaction_remaining_ms > 0 {
            self.reaction_remaining_ms = self.reaction_remaining_ms.saturating_sub(ctx.dt_ms);
            return Vector2D::ZERO;
        }

        // Re-evaluated every tick, so a lost race simply retargets.
        let Some((seat_id, _)) = ctx.pool.nearest_available(&self.state.position) else {
            self.target = None;
            return Vector2D::ZERO;
        };
        let Some(seat_position) = ctx.pool.seat(seat_id).map(|s| s.position()) else {
            self.target = None;
            return Vector2D::ZERO;
        };
        self.target = Some(seat_id);

        self.track_progress(ctx.dt_ms);

        let bearing = self.state.position.angle_to(&seat_position);
        if let Some(escape) = self.escape.as_mut() {
            if escape.reroll_in_ms == 0 {
                escape.heading = bearing + rng.gen_range(-FRAC_PI_2..=FRAC_PI_2);
                escape.reroll_in_ms = ESCAPE_REROLL_MS;
            }
            escape.reroll_in_ms = escape.reroll_in_ms.saturating_sub(ctx.dt_ms);
            escape.remaining_ms = escape.remaining_ms.saturating_sub(ctx.dt_ms);
            let velocity = Vector2D::from_angle(escape.heading, self.skill.base_speed * ESCAPE_SPEED_FACTOR);
            if escape.remaining_ms == 0 {
                self.escape = None;
            }
            return velocity;
        }

        Vector2D::from_angle(bearing, self.skill.base_speed)
    }

    /// Stuck detection pauses while escaping so escape mode always ends on time.
    fn track_progress(&mut self, dt_ms: u64) {
        let position = self.state.position;
        if self.escape.is_none() {
            if let Some(last) = self.stuck.last_position {
                if position.distance_to(&last) < STUCK_DISPLACEMENT {
                    self.stuck.stuck_ms += dt_ms;
                    if self.stuck.stuck_ms > STUCK_THRESHOLD_MS {
                        self.escape = Some(EscapeMode {
                            remaining_ms: ESCAPE_DURATION_MS,
                            reroll_in_ms: 0,
                            heading: 0.0,
                        });
                        self.stuck = StuckTracker::default();
                    }
                } else {
                    self.stuck.stuck_ms = 0;
                }
            }
        }
        self.stuck.last_position = Some(position);
    }
}

impl Agent for AutonomousAgent {
    fn state(&self) -> &AgentState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut AgentState {
        &mut self.state
    }

    fn pickup_radius(&self) -> f64 {
        AUTONOMOUS_PICKUP_RADIUS
    }

    fn begin_round(&mut self, arena: &ArenaBounds, rng: &mut dyn RngCore) {
        self.orbit_angle = arena.center().angle_to(&self.state.position);
        self.reaction_remaining_ms = self.skill.draw_reaction_delay(rng);
        self.stuck = StuckTracker::default();
        self.escape = None;
        self.target = None;
    }

    fn decide(&mut self, ctx: &DecisionContext<'_>, rng: &mut dyn RngCore) -> Vector2D {
        if !self.state.is_seeking() {
            return Vector2D::ZERO;
        }
        match ctx.phase {
            Phase::Active => self.orbit(&ctx.arena),
            Phase::Scramble => self.scramble(ctx, rng),
        }
    }

    fn try_seat(&mut self, pool: &mut SeatPool) -> SeatAttempt {
        if self.reaction_remaining_ms > 0 {
            return SeatAttempt::Idle;
        }
        claim_nearest(&mut self.state, pool, AUTONOMOUS_PICKUP_RADIUS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::seating::{Mechanic, SeatPool};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const TICK: u64 = 16;

    fn hard_agent_at(position: Position2D) -> AutonomousAgent {
        AutonomousAgent::new(AgentId(1), "Bot 1", position, Difficulty::Hard.profile())
    }

    fn active_pool(arena: ArenaBounds) -> SeatPool {
        let mut pool = SeatPool::configure(Mechanic::base(), 3, arena).unwrap();
        pool.activate_all();
        pool
    }

    fn ctx<'a>(phase: Phase, pool: &'a SeatPool, arena: ArenaBounds) -> DecisionContext<'a> {
        DecisionContext {
            phase,
            pool,
            arena,
            dt_ms: TICK,
            input: None,
        }
    }

    #[test]
    fn reaction_delay_is_drawn_from_the_difficulty_range() {
        let mut rng = StdRng::seed_from_u64(12);
        for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
            let profile = difficulty.profile();
            for _ in 0..50 {
                let delay = profile.draw_reaction_delay(&mut rng);
                assert!(delay >= profile.reaction_min_ms && delay <= profile.reaction_max_ms);
            }
        }
    }

    #[test]
    fn loiters_at_base_speed_during_active_phase() {
        let arena = ArenaBounds::default();
        let pool = active_pool(arena);
        let mut rng = StdRng::seed_from_u64(1);
        let mut agent = hard_agent_at(arena.center().on_circle(0.0, 280.0));
        agent.begin_round(&arena, &mut rng);
        let v = agent.decide(&ctx(Phase::Active, &pool, arena), &mut rng);
        assert!((v.length() - 250.0).abs() < 1e-6);
    }

    #[test]
    fn holds_still_during_reaction_delay() {
        let arena = ArenaBounds::default();
        let pool = active_pool(arena);
        let mut rng = StdRng::seed_from_u64(1);
        let skill = SkillProfile {
            base_speed: 200.0,
            reaction_min_ms: 100,
            reaction_max_ms: 100,
        };
        let mut agent = AutonomousAgent::new(AgentId(2), "Bot 2", arena.center(), skill);
        agent.begin_round(&arena, &mut rng);
        let scramble = ctx(Phase::Scramble, &pool, arena);
        let mut stood_still = 0;
        while agent.reaction_remaining_ms() > 0 {
            assert_eq!(agent.decide(&scramble, &mut rng), Vector2D::ZERO);
            stood_still += 1;
        }
        assert_eq!(stood_still, 7);
        assert!(agent.decide(&scramble, &mut rng).length() > 0.0);
    }

    #[test]
    fn pursues_the_nearest_available_seat() {
        let arena = ArenaBounds::default();
        let pool = active_pool(arena);
        let mut rng = StdRng::seed_from_u64(4);
        let seat = pool.seats()[0].position();
        let start = Position2D::new(seat.x + 150.0, seat.y);
        let mut agent = hard_agent_at(start);
        agent.reaction_remaining_ms = 0;
        let v = agent.decide(&ctx(Phase::Scramble, &pool, arena), &mut rng);
        assert_eq!(agent.target(), Some(SeatId(0)));
        assert!(v.x < 0.0);
        assert!(v.y.abs() < 1e-9);
    }

    #[test]
    fn holds_position_when_no_seat_is_available() {
        let arena = ArenaBounds::default();
        let pool = SeatPool::configure(Mechanic::base(), 3, arena).unwrap();
        let mut rng = StdRng::seed_from_u64(4);
        let mut agent = hard_agent_at(arena.center());
        let v = agent.decide(&ctx(Phase::Scramble, &pool, arena), &mut rng);
        assert_eq!(v, Vector2D::ZERO);
        assert_eq!(agent.target(), None);
    }

    #[test]
    fn wedged_agent_escapes_and_then_gives_up_escaping() {
        let arena = ArenaBounds::default();
        let pool = active_pool(arena);
        let mut rng = StdRng::seed_from_u64(77);
        let mut agent = hard_agent_at(Position2D::new(50.0, 50.0));
        let scramble = ctx(Phase::Scramble, &pool, arena);

        // First tick only records the starting point.
        agent.decide(&scramble, &mut rng);
        let mut stagnant_ms = 0;
        while !agent.is_escaping() {
            agent.decide(&scramble, &mut rng);
            stagnant_ms += TICK;
            assert!(stagnant_ms <= STUCK_THRESHOLD_MS + TICK);
        }
        assert!(stagnant_ms > STUCK_THRESHOLD_MS);
        assert_eq!(agent.stuck_ms(), 0);

        // Never moves, yet escape ends after its fixed duration.
        let mut escaping_ms = TICK;
        while agent.is_escaping() {
            let v = agent.decide(&scramble, &mut rng);
            assert!((v.length() - 250.0 * ESCAPE_SPEED_FACTOR).abs() < 1e-6);
            escaping_ms += TICK;
            assert!(escaping_ms <= ESCAPE_DURATION_MS + TICK);
        }
        assert!(escaping_ms >= ESCAPE_DURATION_MS);
    }

    #[test]
    fn escape_headings_stay_within_ninety_degrees_of_target() {
        let arena = ArenaBounds::default();
        let pool = active_pool(arena);
        let mut rng = StdRng::seed_from_u64(5);
        let mut agent = hard_agent_at(Position2D::new(50.0, 50.0));
        let scramble = ctx(Phase::Scramble, &pool, arena);
        for _ in 0..14 {
            agent.decide(&scramble, &mut rng);
        }
        assert!(agent.is_escaping());
        let target = pool.seat(agent.target().unwrap()).unwrap().position();
        let bearing = agent.state().position.angle_to(&target);
        for _ in 0..40 {
            let v = agent.decide(&scramble, &mut rng);
            let heading = v.y.atan2(v.x);
            let mut delta = (heading - bearing).abs() % std::f64::consts::TAU;
            if delta > std::f64::consts::PI {
                delta = std::f64::consts::TAU - delta;
            }
            assert!(delta <= FRAC_PI_2 + 1e-9);
        }
    }

    #[test]
    fn claims_within_pickup_radius() {
        let arena = ArenaBounds::default();
        let mut pool = active_pool(arena);
        let seat = pool.seats()[1].position();
        let mut agent = hard_agent_at(Position2D::new(seat.x + 79.0, seat.y));
        assert_eq!(agent.try_seat(&mut pool), SeatAttempt::Seated(SeatId(1)));
        assert!(agent.state().is_seated());
        assert_eq!(agent.state().position, seat);
        assert_eq!(agent.try_seat(&mut pool), SeatAttempt::Idle);
    }
}

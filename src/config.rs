use crate::domains::agents::Difficulty;
use crate::domains::arena::ArenaBounds;
use crate::domains::round::{
    MechanicSchedule, RoundSettings, DEFAULT_TICK_MS, DEFEAT_DELAY_MS, INTERMISSION_MS, SCRAMBLE_WINDOW_MS,
};
use crate::domains::seating::MechanicKind;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variables prefixed with this override file values,
/// e.g. `MUSICAL_CHAIRS__GAME__POPULATION=4`.
pub const ENV_PREFIX: &str = "MUSICAL_CHAIRS";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub game: GameSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    pub population: usize,
    pub arena_width: f64,
    pub arena_height: f64,
    pub tick_ms: u64,
    pub scramble_window_ms: u64,
    pub intermission_ms: u64,
    /// Pause before game over when the human is out.
    pub defeat_delay_ms: u64,
    pub difficulty: Difficulty,
    /// Entropy seeded when absent.
    pub rng_seed: Option<u64>,
    /// Play every round with this mechanic instead of the standard rotation.
    pub fixed_mechanic: Option<MechanicKind>,
    /// Pace ticks against the wall clock instead of running flat out.
    pub realtime: bool,
    /// Headless safety stop.
    pub max_ticks: u64,
    pub human_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Level for the file logger (`error`, `warn`, `info`, `debug`, `trace`).
    pub level: String,
    /// fast_log file appender target. Console only when absent.
    pub file: Option<String>,
    /// Route domain log lines through a background task.
    pub buffered: bool,
    pub buffer_capacity: usize,
    /// Echo per-tick debug lines on the console logger.
    pub verbose: bool,
}

impl Default for GameSettings {
    fn default() -> Self {
        let arena = ArenaBounds::default();
        Self {
            population: 6,
            arena_width: arena.width,
            arena_height: arena.height,
            tick_ms: DEFAULT_TICK_MS,
            scramble_window_ms: SCRAMBLE_WINDOW_MS,
            intermission_ms: INTERMISSION_MS,
            defeat_delay_ms: DEFEAT_DELAY_MS,
            difficulty: Difficulty::Hard,
            rng_seed: None,
            fixed_mechanic: None,
            realtime: false,
            max_ticks: 200_000,
            human_name: "You".to_string(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            buffered: false,
            buffer_capacity: 1024,
            verbose: false,
        }
    }
}

impl Config {
    /// Read a TOML file, no environment layering.
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading {}", path.display()))?;
        let config: Config = toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// The optional file, then `MUSICAL_CHAIRS__*` variables. Missing keys keep their defaults.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }
        let config: Config = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("layering configuration sources")?
            .try_deserialize()
            .context("decoding configuration")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let game = &self.game;
        if game.population < 2 {
            bail!("game.population must be at least 2, got {}", game.population);
        }
        if !(game.arena_width > 0.0 && game.arena_height > 0.0) {
            bail!(
                "arena must have positive size, got {}x{}",
                game.arena_width,
                game.arena_height
            );
        }
        if game.tick_ms == 0 {
            bail!("game.tick_ms must be positive");
        }
        Ok(())
    }
}

impl From<&GameSettings> for RoundSettings {
    fn from(game: &GameSettings) -> Self {
        Self {
            population: game.population,
            arena: ArenaBounds::new(game.arena_width, game.arena_height),
            tick_ms: game.tick_ms,
            scramble_window_ms: game.scramble_window_ms,
            intermission_ms: game.intermission_ms,
            defeat_delay_ms: game.defeat_delay_ms,
            difficulty: game.difficulty,
            schedule: game
                .fixed_mechanic
                .map_or(MechanicSchedule::Standard, MechanicSchedule::Fixed),
            rng_seed: game.rng_seed,
            human_name: game.human_name.clone(),
        }
    }
}

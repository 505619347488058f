use musical_chairs::adapters::inbound::{AutopilotInput, InMemoryEventStore};
use musical_chairs::adapters::outbound::{
    init_buffered_logger, init_combined_logger, init_console_logger, init_verbose_console_logger, ArcadePhysics,
};
use musical_chairs::application::GameService;
use musical_chairs::domains::logger::DynLogger;
use musical_chairs::domains::round::{GameEventPublisher, GameOutcome, RoundSettings};
use musical_chairs::Config;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config_path = std::env::args().nth(1).unwrap_or_else(|| "config.toml".to_string());
    let config = Config::load(Some(config_path.as_str()))?;
    info!(
        "Starting musical chairs: {} players, difficulty {:?}, seed {:?}",
        config.game.population, config.game.difficulty, config.game.rng_seed
    );

    let logger = build_logger(&config);

    let event_store = Arc::new(InMemoryEventStore::new());
    let (publisher, mut actor) = GameEventPublisher::channel(event_store.clone(), 1024);
    let projections = actor.projections();
    let actor_task = tokio::spawn(async move { actor.run().await });

    let mut service = GameService::start(
        RoundSettings::from(&config.game),
        Box::new(ArcadePhysics),
        Box::new(AutopilotInput),
        Some(publisher),
        logger,
    )?;

    let run = if config.game.realtime {
        service.run_realtime(config.game.max_ticks).await
    } else {
        service.run_headless(config.game.max_ticks).await
    };
    let report = match run {
        Ok(report) => report,
        Err(e) => {
            error!("Game aborted: {}", e);
            return Err(e.into());
        }
    };

    // Closing the channel lets the actor drain and stop.
    drop(service);
    if let Err(e) = actor_task.await {
        error!("Event actor panicked: {}", e);
    }

    match report.outcome {
        Some(GameOutcome::Won) => println!("You won after {} rounds!", report.rounds_played),
        Some(GameOutcome::Lost) => println!("You were eliminated in round {}.", report.rounds_played),
        None => println!("No result after {} ticks.", report.ticks),
    }
    for (place, (_, name)) in report.elimination_order.iter().enumerate() {
        println!("  out #{}: {}", place + 1, name);
    }

    let journal_len = event_store.stream_len(&report.game_id).await;
    let summary = projections.read().await.summaries.get(&report.game_id).cloned();
    if let Some(summary) = summary {
        info!(
            "Journal holds {} events; {} rounds started, {} decoys revealed",
            journal_len, summary.rounds_started, summary.decoys_revealed
        );
    }

    Ok(())
}

fn build_logger(config: &Config) -> DynLogger {
    let logging = &config.logging;
    let base = match &logging.file {
        Some(path) => init_combined_logger(path, &logging.level, logging.verbose),
        None if logging.verbose => init_verbose_console_logger(),
        None => init_console_logger(),
    };
    if logging.buffered {
        init_buffered_logger(base, logging.buffer_capacity)
    } else {
        base
    }
}

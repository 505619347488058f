use musical_chairs::adapters::inbound::{AutopilotInput, InMemoryEventStore, NoInput, ScriptedInput};
use musical_chairs::adapters::outbound::{init_noop_logger, ArcadePhysics, OpenFloorPhysics};
use musical_chairs::application::GameService;
use musical_chairs::common::{AgentId, EventStore};
use musical_chairs::domains::arena::Vector2D;
use musical_chairs::domains::round::*;
use musical_chairs::domains::seating::MechanicKind;
use std::sync::Arc;

fn quick_settings(schedule: MechanicSchedule, seed: u64) -> RoundSettings {
    RoundSettings {
        schedule,
        intermission_ms: 0,
        rng_seed: Some(seed),
        ..RoundSettings::default()
    }
}

#[tokio::test]
async fn test_headless_game_journals_every_event() {
    let event_store = Arc::new(InMemoryEventStore::new());
    let (publisher, mut actor) = GameEventPublisher::channel(event_store.clone(), 256);
    let projections = actor.projections();
    let actor_task = tokio::spawn(async move { actor.run().await });

    let mut service = GameService::start(
        quick_settings(MechanicSchedule::Fixed(MechanicKind::Static), 3),
        Box::new(OpenFloorPhysics),
        Box::new(NoInput),
        Some(publisher),
        init_noop_logger(),
    )
    .unwrap();
    let report = service.run_headless(50_000).await.unwrap();
    drop(service);
    actor_task.await.unwrap();

    assert_eq!(report.outcome, Some(GameOutcome::Won));
    assert_eq!(report.rounds_played, 5);
    assert_eq!(report.elimination_order.len(), 5);

    let journal = event_store.load_events(&report.game_id, 0).await.unwrap();
    assert_eq!(journal.first().map(|e| e.event_type.as_str()), Some("GameStarted"));
    assert_eq!(journal.last().map(|e| e.event_type.as_str()), Some("GameEnded"));
    assert!(journal.iter().enumerate().all(|(i, e)| e.sequence == i as u64));
    let decoded: GameEvent = journal[0].decode().unwrap();
    assert!(matches!(decoded, GameEvent::GameStarted { population: 6, .. }));

    let store = projections.read().await;
    let summary = store.summaries.get(&report.game_id).unwrap();
    let order: Vec<AgentId> = report.elimination_order.iter().map(|(id, _)| *id).collect();
    assert_eq!(summary.elimination_order, order);
    assert_eq!(summary.rounds_started, 5);
    assert_eq!(summary.outcome, Some(GameOutcome::Won));

    let cues = store.cues_for(&report.game_id);
    assert_eq!(cues.len(), 6);
    assert!(!cues[0].is_eliminated());
    assert_eq!(cues[0].seats_claimed, 5);
    assert_eq!(cues.iter().filter(|c| c.is_eliminated()).count(), 5);
}

#[tokio::test]
async fn test_scripted_human_runs_off_and_loses() {
    let script = ScriptedInput::hold(Vector2D::new(-1.0, 0.0), 2_000);
    let mut service = GameService::start(
        quick_settings(MechanicSchedule::Fixed(MechanicKind::Static), 9),
        Box::new(OpenFloorPhysics),
        Box::new(script),
        None,
        init_noop_logger(),
    )
    .unwrap();

    let report = service.run_headless(50_000).await.unwrap();
    assert_eq!(report.outcome, Some(GameOutcome::Lost));
    assert_eq!(report.rounds_played, 1);
    assert_eq!(report.elimination_order[0].0, AgentId(0));
    assert_eq!(service.snapshot().status_line, "Game over");
}

#[tokio::test]
async fn test_autopilot_game_finishes_within_five_rounds() {
    let mut service = GameService::start(
        quick_settings(MechanicSchedule::Standard, 21),
        Box::new(ArcadePhysics),
        Box::new(AutopilotInput),
        None,
        init_noop_logger(),
    )
    .unwrap();

    let report = service.run_headless(50_000).await.unwrap();
    assert!(report.outcome.is_some());
    assert!(report.rounds_played >= 1 && report.rounds_played <= 5);
    assert!(service.controller().is_over());
}

#[tokio::test]
async fn test_headless_run_stops_at_the_tick_cap() {
    let mut service = GameService::start(
        quick_settings(MechanicSchedule::Standard, 1),
        Box::new(OpenFloorPhysics),
        Box::new(NoInput),
        None,
        init_noop_logger(),
    )
    .unwrap();

    let report = service.run_headless(10).await.unwrap();
    assert_eq!(report.ticks, 10);
    assert_eq!(report.outcome, None);
    assert_eq!(service.controller().state(), RoundState::ActivePhase);
}

#[tokio::test(start_paused = true)]
async fn test_realtime_run_paces_ticks() {
    let mut service = GameService::start(
        quick_settings(MechanicSchedule::Fixed(MechanicKind::Static), 3),
        Box::new(OpenFloorPhysics),
        Box::new(NoInput),
        None,
        init_noop_logger(),
    )
    .unwrap();

    let started = tokio::time::Instant::now();
    let report = service.run_realtime(20).await.unwrap();
    assert_eq!(report.ticks, 20);
    // The first interval tick completes immediately.
    assert!(started.elapsed() >= std::time::Duration::from_millis(19 * 16));
}

#[tokio::test]
async fn test_publishing_without_an_actor_fails() {
    let event_store = Arc::new(InMemoryEventStore::new());
    let (publisher, actor) = GameEventPublisher::channel(event_store, 4);
    drop(actor);

    let mut service = GameService::start(
        quick_settings(MechanicSchedule::Standard, 1),
        Box::new(OpenFloorPhysics),
        Box::new(NoInput),
        Some(publisher),
        init_noop_logger(),
    )
    .unwrap();
    let result = service.step().await;
    assert!(matches!(result, Err(musical_chairs::common::ApplicationError::Channel(_))));
}

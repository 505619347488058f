use super::events::GameEvent;
use super::projections::{AgentCueProjection, GameSummaryProjection};
use crate::common::{AgentId, ApplicationError, ApplicationResult, DomainEvent, EventEnvelope, EventMetadata, EventStore};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

pub const AGGREGATE_TYPE: &str = "RoundController";

/// Actor that journals game events and keeps the read models current
pub struct GameEventActor {
    event_store: Arc<dyn EventStore + Send + Sync>,
    projection_store: Arc<RwLock<GameProjectionStore>>,
    event_receiver: mpsc::Receiver<GameEvent>,
    next_sequence: HashMap<String, u64>,
    correlation_id: Uuid,
}

impl GameEventActor {
    pub fn new(
        event_store: Arc<dyn EventStore + Send + Sync>,
        event_receiver: mpsc::Receiver<GameEvent>,
    ) -> Self {
        Self {
            event_store,
            projection_store: Arc::new(RwLock::new(GameProjectionStore::new())),
            event_receiver,
            next_sequence: HashMap::new(),
            correlation_id: Uuid::new_v4(),
        }
    }

    /// Shared handle to the read models, usable after the actor was moved into a task.
    pub fn projections(&self) -> Arc<RwLock<GameProjectionStore>> {
        Arc::clone(&self.projection_store)
    }

    /// Drain the channel until every publisher is dropped.
    pub async fn run(&mut self) {
        while let Some(event) = self.event_receiver.recv().await {
            if let Err(e) = self.handle_event(event).await {
                tracing::error!("Failed to handle game event: {}", e);
            }
        }
        tracing::debug!("game event channel closed");
    }

    async fn handle_event(&mut self, event: GameEvent) -> ApplicationResult<()> {
        let metadata = EventMetadata {
            correlation_id: Some(self.correlation_id),
            round_index: event.round_index(),
            source: "GameEventActor".to_string(),
        };

        let sequence = self
            .next_sequence
            .get(event.aggregate_id())
            .copied()
            .unwrap_or(0);
        let envelope = EventEnvelope::new(&event, AGGREGATE_TYPE, sequence, metadata)
            .map_err(|e| ApplicationError::EventStore(format!("Failed to create event envelope: {}", e)))?;

        self.event_store
            .append_events(event.aggregate_id(), sequence, vec![envelope])
            .await
            .map_err(ApplicationError::EventStore)?;
        self.next_sequence
            .insert(event.aggregate_id().to_string(), sequence + 1);

        self.update_projections(&event).await;

        tracing::debug!("Handled game event: {}", event.event_type());
        Ok(())
    }

    async fn update_projections(&self, event: &GameEvent) {
        let mut store = self.projection_store.write().await;
        store.apply_event(event);
    }
}

/// In-memory read models for every game seen by the actor
#[derive(Debug, Default)]
pub struct GameProjectionStore {
    pub summaries: HashMap<String, GameSummaryProjection>,
    pub cues: HashMap<(String, AgentId), AgentCueProjection>,
}

impl GameProjectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply_event(&mut self, event: &GameEvent) {
        if let GameEvent::GameStarted {
            game_id,
            population,
            timestamp,
        } = event
        {
            let summary = GameSummaryProjection::new(game_id.clone(), *population, *timestamp);
            self.summaries.insert(game_id.clone(), summary);
            for i in 0..*population {
                self.cues
                    .insert((game_id.clone(), AgentId(i)), AgentCueProjection::new(AgentId(i)));
            }
        }

        if let Some(summary) = self.summaries.get_mut(event.aggregate_id()) {
            summary.apply_event(event);
        }

        let game_id = event.aggregate_id();
        for ((cue_game, _), cue) in self.cues.iter_mut() {
            if cue_game == game_id {
                cue.apply_event(event);
            }
        }
    }

    /// Cues of one game ordered by agent id.
    pub fn cues_for(&self, game_id: &str) -> Vec<AgentCueProjection> {
        let mut cues: Vec<_> = self
            .cues
            .iter()
            .filter(|((cue_game, _), _)| cue_game == game_id)
            .map(|(_, cue)| cue.clone())
            .collect();
        cues.sort_by_key(|cue| cue.agent_id);
        cues
    }
}

/// Sending side of the actor channel.
#[derive(Clone)]
pub struct GameEventPublisher {
    sender: mpsc::Sender<GameEvent>,
}

impl GameEventPublisher {
    pub fn new(sender: mpsc::Sender<GameEvent>) -> Self {
        Self { sender }
    }

    /// Actor plus publisher wired through a bounded channel.
    pub fn channel(
        event_store: Arc<dyn EventStore + Send + Sync>,
        capacity: usize,
    ) -> (Self, GameEventActor) {
        let (sender, receiver) = mpsc::channel(capacity);
        (Self::new(sender), GameEventActor::new(event_store, receiver))
    }

    pub async fn publish(&self, event: GameEvent) -> ApplicationResult<()> {
        self.sender
            .send(event)
            .await
            .map_err(|e| ApplicationError::Channel(format!("game event actor is gone: {}", e)))
    }
}

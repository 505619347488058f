use crate::common::{EventEnvelope, EventStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Process-lifetime journal, one ordered stream per game.
#[derive(Debug, Default)]
pub struct InMemoryEventStore {
    streams: RwLock<HashMap<String, Vec<EventEnvelope>>>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn stream_len(&self, game_id: &str) -> usize {
        self.streams.read().await.get(game_id).map(Vec::len).unwrap_or(0)
    }

    pub async fn game_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.streams.read().await.keys().cloned().collect();
        ids.sort();
        ids
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn append_events(
        &self,
        aggregate_id: &str,
        expected_version: u64,
        events: Vec<EventEnvelope>,
    ) -> Result<(), String> {
        let mut streams = self.streams.write().await;
        let stream = streams.entry(aggregate_id.to_string()).or_default();

        let current = stream.len() as u64;
        if current != expected_version {
            return Err(format!(
                "journal for {} is at {}, append expected {}",
                aggregate_id, current, expected_version
            ));
        }
        if let Some(bad) = events
            .iter()
            .enumerate()
            .find(|(offset, e)| e.sequence != current + *offset as u64)
        {
            return Err(format!(
                "event {} carries sequence {} where {} was expected",
                bad.1.event_type,
                bad.1.sequence,
                current + bad.0 as u64
            ));
        }

        stream.extend(events);
        Ok(())
    }

    async fn load_events(&self, aggregate_id: &str, from_version: u64) -> Result<Vec<EventEnvelope>, String> {
        let streams = self.streams.read().await;
        Ok(streams
            .get(aggregate_id)
            .map(|stream| stream.iter().skip(from_version as usize).cloned().collect())
            .unwrap_or_default())
    }

    async fn load_events_by_type(
        &self,
        event_type: &str,
        from_timestamp: Option<DateTime<Utc>>,
    ) -> Result<Vec<EventEnvelope>, String> {
        let streams = self.streams.read().await;
        let mut matching: Vec<EventEnvelope> = streams
            .values()
            .flatten()
            .filter(|e| e.event_type == event_type)
            .filter(|e| from_timestamp.map_or(true, |from| e.occurred_at >= from))
            .cloned()
            .collect();
        matching.sort_by(|a, b| {
            a.occurred_at
                .cmp(&b.occurred_at)
                .then_with(|| a.sequence.cmp(&b.sequence))
        });
        Ok(matching)
    }
}

use chrono::Utc;
use musical_chairs::adapters::inbound::InMemoryEventStore;
use musical_chairs::common::{EventEnvelope, EventMetadata, EventStore};
use musical_chairs::domains::round::{GameEvent, AGGREGATE_TYPE};

fn envelope(game_id: &str, sequence: u64, round_index: u32) -> EventEnvelope {
    let event = GameEvent::MusicStopped {
        game_id: game_id.to_string(),
        round_index,
        timestamp: Utc::now(),
    };
    let metadata = EventMetadata {
        correlation_id: None,
        round_index: Some(round_index),
        source: "adapter_tests".to_string(),
    };
    EventEnvelope::new(&event, AGGREGATE_TYPE, sequence, metadata).unwrap()
}

#[tokio::test]
async fn test_in_memory_store_keeps_streams_apart() {
    let store = InMemoryEventStore::new();
    store
        .append_events("game-a", 0, vec![envelope("game-a", 0, 1), envelope("game-a", 1, 2)])
        .await
        .unwrap();
    store.append_events("game-b", 0, vec![envelope("game-b", 0, 1)]).await.unwrap();

    assert_eq!(store.stream_len("game-a").await, 2);
    assert_eq!(store.stream_len("game-b").await, 1);
    assert_eq!(store.game_ids().await, vec!["game-a".to_string(), "game-b".to_string()]);

    let tail = store.load_events("game-a", 1).await.unwrap();
    assert_eq!(tail.len(), 1);
    assert_eq!(tail[0].metadata.round_index, Some(2));

    let stops = store.load_events_by_type("MusicStopped", None).await.unwrap();
    assert_eq!(stops.len(), 3);
}

#[tokio::test]
async fn test_in_memory_store_rejects_out_of_order_appends() {
    let store = InMemoryEventStore::new();
    store.append_events("game-a", 0, vec![envelope("game-a", 0, 1)]).await.unwrap();

    assert!(store.append_events("game-a", 0, vec![envelope("game-a", 0, 1)]).await.is_err());
    assert!(store.append_events("game-a", 1, vec![envelope("game-a", 5, 1)]).await.is_err());
    assert_eq!(store.stream_len("game-a").await, 1);
    assert!(store.load_events("game-z", 0).await.unwrap().is_empty());
}

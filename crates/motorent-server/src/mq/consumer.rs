use motorent_core::RegisteredMotorcycle;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info};

use crate::error::Result;
use crate::storage::RegisteredMotorcycleRepository;

/// Drains registration events into the registration store. Runs until
/// every publisher handle has been dropped.
pub async fn registration_consumer_loop(
    mut receiver: mpsc::Receiver<RegisteredMotorcycle>,
    repository: Arc<dyn RegisteredMotorcycleRepository>,
) {
    info!("Starting registration consumer loop");

    while let Some(event) = receiver.recv().await {
        let plate_number = event.plate_number.clone();
        if let Err(e) = repository.add(&event).await {
            error!(
                "Failed to ingest registered motorcycle {}: {}",
                plate_number, e
            );
        }
    }

    info!("Registration consumer loop stopped");
}

/// Polls the registration store until the plate shows up or the
/// attempts run out. Lets callers observe the asynchronous ingestion
/// without racing it.
pub async fn await_registration(
    repository: &dyn RegisteredMotorcycleRepository,
    plate_number: &str,
    attempts: u32,
    interval: Duration,
) -> Result<Option<RegisteredMotorcycle>> {
    for _ in 0..attempts {
        if let Some(registration) = repository.find_by_plate(plate_number).await? {
            return Ok(Some(registration));
        }
        tokio::time::sleep(interval).await;
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mq::publisher::{ChannelEventPublisher, EventPublisher};
    use crate::storage::InMemoryStore;

    fn event(plate: &str) -> RegisteredMotorcycle {
        RegisteredMotorcycle {
            identifier: "MOTO-1".to_string(),
            year: 2024,
            model: "Sport 300".to_string(),
            plate_number: plate.to_string(),
        }
    }

    #[tokio::test]
    async fn test_consumer_persists_published_events() {
        let store = Arc::new(InMemoryStore::new());
        let (publisher, receiver) = ChannelEventPublisher::channel(8);
        let handle = tokio::spawn(registration_consumer_loop(receiver, store.clone()));

        publisher.publish(event("ABC-1234")).await.unwrap();

        let found = await_registration(
            store.as_ref(),
            "ABC-1234",
            20,
            Duration::from_millis(10),
        )
        .await
        .unwrap();
        assert_eq!(found.unwrap().plate_number, "ABC-1234");

        drop(publisher);
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_loop_exits_when_publishers_drop() {
        let store = Arc::new(InMemoryStore::new());
        let (publisher, receiver) = ChannelEventPublisher::channel(8);
        let handle = tokio::spawn(registration_consumer_loop(receiver, store));

        drop(publisher);

        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_await_registration_gives_up_after_the_attempts() {
        let store = InMemoryStore::new();

        let found = await_registration(&store, "ZZZ-0000", 3, Duration::from_millis(1))
            .await
            .unwrap();

        assert!(found.is_none());
    }
}

use async_trait::async_trait;
use motorent_core::RegisteredMotorcycle;
use tokio::sync::mpsc;

use crate::error::{MotorentError, Result};

/// Outbound side of the registration event channel.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: RegisteredMotorcycle) -> Result<()>;
}

/// Publisher backed by a bounded in-process channel. The receiving half
/// is handed to the consumer loop at server startup.
pub struct ChannelEventPublisher {
    sender: mpsc::Sender<RegisteredMotorcycle>,
}

impl ChannelEventPublisher {
    pub fn new(sender: mpsc::Sender<RegisteredMotorcycle>) -> Self {
        Self { sender }
    }

    /// Builds the publisher together with its receiving half.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<RegisteredMotorcycle>) {
        let (sender, receiver) = mpsc::channel(capacity);
        (Self::new(sender), receiver)
    }
}

#[async_trait]
impl EventPublisher for ChannelEventPublisher {
    async fn publish(&self, event: RegisteredMotorcycle) -> Result<()> {
        self.sender
            .send(event)
            .await
            .map_err(|e| MotorentError::EventPublish {
                source: Box::new(e),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(plate: &str) -> RegisteredMotorcycle {
        RegisteredMotorcycle {
            identifier: "MOTO-1".to_string(),
            year: 2024,
            model: "Sport 300".to_string(),
            plate_number: plate.to_string(),
        }
    }

    #[tokio::test]
    async fn test_published_events_arrive_in_order() {
        let (publisher, mut receiver) = ChannelEventPublisher::channel(8);

        publisher.publish(event("AAA-0001")).await.unwrap();
        publisher.publish(event("AAA-0002")).await.unwrap();

        assert_eq!(receiver.recv().await.unwrap().plate_number, "AAA-0001");
        assert_eq!(receiver.recv().await.unwrap().plate_number, "AAA-0002");
    }

    #[tokio::test]
    async fn test_publish_fails_once_the_consumer_is_gone() {
        let (publisher, receiver) = ChannelEventPublisher::channel(8);
        drop(receiver);

        let result = publisher.publish(event("AAA-0001")).await;

        assert!(matches!(result, Err(MotorentError::EventPublish { .. })));
    }
}

pub mod consumer;
pub mod publisher;

pub use consumer::{await_registration, registration_consumer_loop};
pub use publisher::{ChannelEventPublisher, EventPublisher};

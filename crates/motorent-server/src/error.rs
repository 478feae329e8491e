use thiserror::Error;

#[derive(Debug, Error)]
pub enum MotorentError {
    #[error("Database error during {operation}")]
    DatabaseError {
        operation: String,
        #[source]
        source: Box<sqlx::Error>,
    },

    #[error("Unique constraint {constraint} rejected the value")]
    Duplicate { constraint: String },

    #[error("Motorcycle not found: {id}")]
    MotorcycleNotFound { id: String },

    #[error("Deliverer not found: {id}")]
    DelivererNotFound { id: String },

    #[error("Rental not found: {id}")]
    RentalNotFound { id: String },

    #[error("Object storage error: {0}")]
    ObjectStorage(String),

    #[error("Failed to publish registration event")]
    EventPublish {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

pub type Result<T> = std::result::Result<T, MotorentError>;

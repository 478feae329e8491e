pub mod deliverers;
pub mod memory;
pub mod motorcycles;
pub mod registrations;
pub mod rentals;

pub use deliverers::{DelivererRepository, SqlDelivererRepository};
pub use memory::InMemoryStore;
pub use motorcycles::{MotorcycleRepository, SqlMotorcycleRepository};
pub use registrations::{RegisteredMotorcycleRepository, SqlRegisteredMotorcycleRepository};
pub use rentals::{RentalRepository, SqlRentalRepository};

use motorent_core::{AuditStamps, Trackable};
use sqlx::postgres::PgRow;
use sqlx::Row;

use crate::error::MotorentError;

const UNIQUE_VIOLATION: &str = "23505";

/// Copy of `entity` with creation stamps filled in by `actor`.
pub(crate) fn stamped_for_insert<T: Trackable + Clone>(entity: &T, actor: &str) -> T {
    let mut stamped = entity.clone();
    stamped.mark_created(actor);
    stamped
}

/// Copy of `entity` with update stamps filled in by `actor`.
pub(crate) fn stamped_for_update<T: Trackable + Clone>(entity: &T, actor: &str) -> T {
    let mut stamped = entity.clone();
    stamped.mark_updated(actor);
    stamped
}

/// Database faults become `DatabaseError`; unique-index violations are
/// separated out so callers can answer them with a business message.
pub(crate) fn map_write_error(operation: &str, e: sqlx::Error) -> MotorentError {
    if let sqlx::Error::Database(ref db) = e {
        if db.code().as_deref() == Some(UNIQUE_VIOLATION) {
            return MotorentError::Duplicate {
                constraint: db.constraint().unwrap_or("unique").to_string(),
            };
        }
    }
    MotorentError::DatabaseError {
        operation: operation.to_string(),
        source: Box::new(e),
    }
}

pub(crate) fn map_read_error(operation: &str, e: sqlx::Error) -> MotorentError {
    MotorentError::DatabaseError {
        operation: operation.to_string(),
        source: Box::new(e),
    }
}

pub(crate) fn audit_stamps_from_row(r: &PgRow) -> AuditStamps {
    AuditStamps {
        created_at: r.get("created_at"),
        created_by: r.get("created_by"),
        updated_at: r.get("updated_at"),
        updated_by: r.get("updated_by"),
        is_deleted: r.get("is_deleted"),
        deleted_at: r.get("deleted_at"),
        deleted_by: r.get("deleted_by"),
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Audit columns shared by every soft-deletable record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditStamps {
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_at: Option<DateTime<Utc>>,
    pub updated_by: Option<String>,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub deleted_by: Option<String>,
}

impl AuditStamps {
    /// Fresh stamps for a record that has not been persisted yet.
    /// `created_by` is filled in by the store on insert.
    pub fn new() -> Self {
        Self {
            created_at: Utc::now(),
            created_by: String::new(),
            updated_at: None,
            updated_by: None,
            is_deleted: false,
            deleted_at: None,
            deleted_by: None,
        }
    }
}

impl Default for AuditStamps {
    fn default() -> Self {
        Self::new()
    }
}

/// Gives stores uniform access to audit stamps. Stores stamp records
/// on insert, update and soft delete; rows are never removed.
pub trait Trackable {
    fn stamps(&self) -> &AuditStamps;

    fn stamps_mut(&mut self) -> &mut AuditStamps;

    fn mark_created(&mut self, by: &str) {
        let stamps = self.stamps_mut();
        stamps.created_at = Utc::now();
        stamps.created_by = by.to_string();
    }

    fn mark_updated(&mut self, by: &str) {
        let stamps = self.stamps_mut();
        stamps.updated_at = Some(Utc::now());
        stamps.updated_by = Some(by.to_string());
    }

    fn mark_deleted(&mut self, by: &str) {
        let stamps = self.stamps_mut();
        stamps.is_deleted = true;
        stamps.deleted_at = Some(Utc::now());
        stamps.deleted_by = Some(by.to_string());
    }

    fn is_deleted(&self) -> bool {
        self.stamps().is_deleted
    }
}

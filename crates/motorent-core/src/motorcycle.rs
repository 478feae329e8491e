use serde::{Deserialize, Serialize};

use crate::trackable::{AuditStamps, Trackable};
use crate::types::MotorcycleId;

/// A motorcycle in the rental fleet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Motorcycle {
    pub id: MotorcycleId,
    pub identifier: String,
    pub year: i32,
    pub model: String,
    pub plate_number: String,
    pub stamps: AuditStamps,
}

impl Motorcycle {
    pub fn create(identifier: String, year: i32, model: String, plate_number: String) -> Self {
        Self {
            id: MotorcycleId::new(),
            identifier,
            year,
            model,
            plate_number,
            stamps: AuditStamps::new(),
        }
    }

    /// The plate number is the only mutable attribute after creation.
    pub fn update_plate_number(&mut self, plate_number: String) {
        self.plate_number = plate_number;
    }
}

impl Trackable for Motorcycle {
    fn stamps(&self) -> &AuditStamps {
        &self.stamps
    }

    fn stamps_mut(&mut self) -> &mut AuditStamps {
        &mut self.stamps
    }
}

use serde::{Deserialize, Serialize};

use crate::motorcycle::Motorcycle;

/// Model year whose registrations are announced on the event channel.
pub const REGISTRATION_YEAR: i32 = 2024;

/// Snapshot published when a motorcycle of the announced model year
/// joins the fleet. Carries plain attributes, not the fleet record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisteredMotorcycle {
    pub identifier: String,
    pub year: i32,
    pub model: String,
    pub plate_number: String,
}

impl RegisteredMotorcycle {
    pub fn from_motorcycle(motorcycle: &Motorcycle) -> Self {
        Self {
            identifier: motorcycle.identifier.clone(),
            year: motorcycle.year,
            model: motorcycle.model.clone(),
            plate_number: motorcycle.plate_number.clone(),
        }
    }
}

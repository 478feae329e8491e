//! Lifecycle services. Each operation returns a `ResultResponse`
//! envelope: business-rule failures carry a specific message, faults
//! from the infrastructure are logged and collapsed into a generic
//! one. The only exception is the registration publish step in
//! motorcycle creation, which propagates its failure to the caller.

pub mod deliverers;
pub mod motorcycles;
pub mod rentals;

pub use deliverers::DelivererService;
pub use motorcycles::MotorcycleService;
pub use rentals::{RentalDetails, RentalService};

use motorent_core::ResultResponse;
use tracing::error;

use crate::error::MotorentError;

pub const UNEXPECTED_ERROR: &str = "An unexpected error occurred.";

pub const MOTORCYCLE_NOT_FOUND: &str = "Motorcycle not found.";
pub const DELIVERER_NOT_FOUND: &str = "Deliverer not found.";
pub const RENTAL_NOT_FOUND: &str = "Rental not found.";
pub const PLAN_NOT_FOUND: &str = "Plan not found.";

pub const PLATE_NOT_UNIQUE: &str = "The plate number must be unique.";
pub const MOTORCYCLE_HAS_RENTAL: &str = "Motorcycle has rental record.";
pub const MOTORCYCLE_UPDATED: &str = "Motorcycle updated successfully.";

pub const BUSINESS_TAX_ID_NOT_UNIQUE: &str = "The business tax id must be unique.";
pub const LICENSE_NUMBER_NOT_UNIQUE: &str = "The driver license number must be unique.";
pub const IMAGE_EXTENSION_INVALID: &str = "The image extension is not valid.";

pub const LICENSE_CATEGORY_REQUIRED: &str = "Deliverer must have a driver license type A.";
pub const START_DATE_IN_PAST: &str = "The start date must be today or a future date.";
pub const RETURN_BEFORE_START: &str = "Return date cannot be before the rental start date.";
pub const ACTUAL_RETURN_BEFORE_START: &str =
    "Actual return date cannot be before the rental start date.";

/// Logs the fault with the operation it broke and hands the caller the
/// generic envelope. The message never carries the fault itself.
pub(crate) fn unexpected_failure<T>(operation: &str, error: &MotorentError) -> ResultResponse<T> {
    error!("An error occurred during {}: {}", operation, error);
    ResultResponse::failure(UNEXPECTED_ERROR)
}

/// The full set of lifecycle services wired against one backend.
pub struct Services {
    pub motorcycles: MotorcycleService,
    pub deliverers: DelivererService,
    pub rentals: RentalService,
}

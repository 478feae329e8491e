pub mod commands;
pub mod deliverer;
pub mod image;
pub mod messages;
pub mod motorcycle;
pub mod plans;
pub mod pricing;
pub mod rental;
pub mod result;
pub mod trackable;
pub mod types;

pub use deliverer::Deliverer;
pub use messages::{RegisteredMotorcycle, REGISTRATION_YEAR};
pub use motorcycle::Motorcycle;
pub use plans::{RentalPlan, RentalPlanCatalog};
pub use pricing::RentalPriceCalculator;
pub use rental::{Rental, RentalWithRelated};
pub use result::{PagedResult, ResultResponse};
pub use trackable::{AuditStamps, Trackable};
pub use types::{DelivererId, DriverLicenseType, MotorcycleId, RentalId};

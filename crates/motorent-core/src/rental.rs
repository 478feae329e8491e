use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::deliverer::Deliverer;
use crate::motorcycle::Motorcycle;
use crate::trackable::{AuditStamps, Trackable};
use crate::types::{DelivererId, MotorcycleId, RentalId};

/// An active or concluded motorcycle rental
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rental {
    pub id: RentalId,
    /// Plan length in days; doubles as the catalog key.
    pub plan_days: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub estimating_ending_date: NaiveDate,
    pub deliverer_id: DelivererId,
    pub motorcycle_id: MotorcycleId,
    pub return_date: Option<NaiveDate>,
    pub stamps: AuditStamps,
}

impl Rental {
    /// A rental always starts the day after it is created. The requested
    /// start date only drives validation and the planned end date, which
    /// the caller computes before constructing the rental.
    pub fn create(
        plan_days: i32,
        end_date: NaiveDate,
        estimating_ending_date: NaiveDate,
        deliverer_id: DelivererId,
        motorcycle_id: MotorcycleId,
    ) -> Self {
        Self {
            id: RentalId::new(),
            plan_days,
            start_date: Utc::now().date_naive() + Duration::days(1),
            end_date,
            estimating_ending_date,
            deliverer_id,
            motorcycle_id,
            return_date: None,
            stamps: AuditStamps::new(),
        }
    }

    pub fn set_return_date(&mut self, return_date: NaiveDate) {
        self.return_date = Some(return_date);
    }
}

impl Trackable for Rental {
    fn stamps(&self) -> &AuditStamps {
        &self.stamps
    }

    fn stamps_mut(&mut self) -> &mut AuditStamps {
        &mut self.stamps
    }
}

/// Rental joined with the motorcycle and deliverer it references
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentalWithRelated {
    pub rental: Rental,
    pub motorcycle: Motorcycle,
    pub deliverer: Deliverer,
}

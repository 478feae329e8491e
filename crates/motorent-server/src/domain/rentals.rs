use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use motorent_core::commands::CreateRentalCommand;
use motorent_core::{
    DelivererId, MotorcycleId, Rental, RentalId, RentalPlanCatalog, RentalPriceCalculator,
    ResultResponse,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::domain::{
    unexpected_failure, ACTUAL_RETURN_BEFORE_START, DELIVERER_NOT_FOUND, LICENSE_CATEGORY_REQUIRED,
    MOTORCYCLE_NOT_FOUND, PLAN_NOT_FOUND, RENTAL_NOT_FOUND, RETURN_BEFORE_START,
    START_DATE_IN_PAST, UNEXPECTED_ERROR,
};
use crate::error::Result;
use crate::storage::{DelivererRepository, MotorcycleRepository, RentalRepository};

/// Read model for a single rental, priced with its plan's daily rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentalDetails {
    pub rental_id: RentalId,
    pub daily_rate: Decimal,
    pub deliverer_id: DelivererId,
    pub motorcycle_id: MotorcycleId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub estimating_ending_date: NaiveDate,
}

/// Rental lifecycle: opening a rental against a plan and recording the
/// return. Pricing comes from the injected catalog and the calculator.
pub struct RentalService {
    rental_repository: Arc<dyn RentalRepository>,
    motorcycle_repository: Arc<dyn MotorcycleRepository>,
    deliverer_repository: Arc<dyn DelivererRepository>,
    catalog: Arc<RentalPlanCatalog>,
    calculator: RentalPriceCalculator,
}

impl RentalService {
    pub fn new(
        rental_repository: Arc<dyn RentalRepository>,
        motorcycle_repository: Arc<dyn MotorcycleRepository>,
        deliverer_repository: Arc<dyn DelivererRepository>,
        catalog: Arc<RentalPlanCatalog>,
    ) -> Self {
        Self {
            rental_repository,
            motorcycle_repository,
            deliverer_repository,
            catalog,
            calculator: RentalPriceCalculator::new(),
        }
    }

    /// Opens a rental. The start date may lie at most one day in the
    /// past; the rental itself always starts tomorrow.
    pub async fn create_rental(&self, command: CreateRentalCommand) -> Result<ResultResponse<bool>> {
        let Some(plan) = self.catalog.plan(command.plan_days) else {
            warn!("Plan not found for {} days", command.plan_days);
            return Ok(ResultResponse::failure(PLAN_NOT_FOUND));
        };

        let today = Utc::now().date_naive();
        if command.start_date < today - Duration::days(1) {
            warn!(
                "Invalid start date: {}. It must be today or a future date.",
                command.start_date
            );
            return Ok(ResultResponse::failure(START_DATE_IN_PAST));
        }

        let end_date = command.start_date + Duration::days(plan.days as i64);

        let motorcycle = match self
            .motorcycle_repository
            .find_by_id(&command.motorcycle_id)
            .await
        {
            Ok(motorcycle) => motorcycle,
            Err(e) => return Ok(unexpected_failure("rental creation", &e)),
        };
        let Some(motorcycle) = motorcycle else {
            warn!("Motorcycle not found for ID: {}", command.motorcycle_id);
            return Ok(ResultResponse::failure(MOTORCYCLE_NOT_FOUND));
        };

        let deliverer = match self
            .deliverer_repository
            .find_by_id(&command.deliverer_id)
            .await
        {
            Ok(deliverer) => deliverer,
            Err(e) => return Ok(unexpected_failure("rental creation", &e)),
        };
        let Some(deliverer) = deliverer else {
            warn!("Deliverer not found for ID: {}", command.deliverer_id);
            return Ok(ResultResponse::failure(DELIVERER_NOT_FOUND));
        };

        if !deliverer.driver_license_type.includes_category_a() {
            warn!(
                "Deliverer {} has license type {} and cannot rent",
                deliverer.id, deliverer.driver_license_type
            );
            return Ok(ResultResponse::failure(LICENSE_CATEGORY_REQUIRED));
        }

        let rental = Rental::create(
            plan.days,
            end_date,
            command.estimating_ending_date,
            deliverer.id,
            motorcycle.id,
        );
        if let Err(e) = self.rental_repository.add(&rental).await {
            return Ok(unexpected_failure("rental creation", &e));
        }

        info!(
            "Added rental for motorcycle {} by deliverer {}",
            motorcycle.id, deliverer.id
        );
        Ok(ResultResponse::success(true))
    }

    /// Records the return date and answers with the priced total. The
    /// date may be overwritten by a later call; there is no closed
    /// state beyond the recorded date itself.
    pub async fn record_return(
        &self,
        rental_id: &RentalId,
        return_date: NaiveDate,
    ) -> Result<ResultResponse<String>> {
        info!("Updating rental {}", rental_id);

        let with_related = match self.rental_repository.find_by_id_with_related(rental_id).await {
            Ok(found) => found,
            Err(e) => return Ok(unexpected_failure("rental return", &e)),
        };
        let Some(with_related) = with_related else {
            warn!("Rental not found for ID: {}", rental_id);
            return Ok(ResultResponse::failure(RENTAL_NOT_FOUND));
        };
        let mut rental = with_related.rental;

        if return_date < rental.start_date {
            warn!(
                "Return date: {} cannot be before the rental start date: {}.",
                return_date, rental.start_date
            );
            return Ok(ResultResponse::failure(RETURN_BEFORE_START));
        }

        let Some(plan) = self.catalog.plan(rental.plan_days) else {
            warn!("Plan not found for {} days", rental.plan_days);
            return Ok(ResultResponse::failure(PLAN_NOT_FOUND));
        };

        let total =
            self.calculator
                .calculate_total(rental.end_date, return_date, plan.daily_rate, plan.days);

        rental.set_return_date(return_date);
        if let Err(e) = self.rental_repository.update(&rental).await {
            return Ok(unexpected_failure("rental return", &e));
        }

        info!("Updated rental {}. Total price: {}", rental.id, total);
        Ok(ResultResponse::success(format!(
            "Return date informed successfully and the total price for rental is {}",
            total
        )))
    }

    /// Prices a hypothetical return without touching the rental.
    pub async fn price_quote(
        &self,
        rental_id: &RentalId,
        actual_return_date: NaiveDate,
    ) -> Result<ResultResponse<Decimal>> {
        info!("Calculating total rental price for rental {}", rental_id);

        let rental = match self.rental_repository.find_by_id(rental_id).await {
            Ok(rental) => rental,
            Err(e) => return Ok(unexpected_failure("rental pricing", &e)),
        };
        let Some(rental) = rental else {
            warn!("Rental not found for ID: {}", rental_id);
            return Ok(ResultResponse::failure(RENTAL_NOT_FOUND));
        };

        if actual_return_date < rental.start_date {
            warn!(
                "Actual return date: {} cannot be before the rental start date: {}.",
                actual_return_date, rental.start_date
            );
            return Ok(ResultResponse::failure(ACTUAL_RETURN_BEFORE_START));
        }

        let Some(plan) = self.catalog.plan(rental.plan_days) else {
            warn!("Plan not found for {} days", rental.plan_days);
            return Ok(ResultResponse::failure(PLAN_NOT_FOUND));
        };

        let total = self.calculator.calculate_total(
            rental.end_date,
            actual_return_date,
            plan.daily_rate,
            plan.days,
        );

        info!("Calculated total rental price for rental {}: {}", rental_id, total);
        Ok(ResultResponse::success(total))
    }

    pub async fn rental_details(&self, rental_id: &RentalId) -> Result<ResultResponse<RentalDetails>> {
        info!("Retrieving rental {}", rental_id);

        let with_related = match self.rental_repository.find_by_id_with_related(rental_id).await {
            Ok(found) => found,
            Err(e) => return Ok(unexpected_failure("rental lookup", &e)),
        };
        let Some(with_related) = with_related else {
            warn!("Rental not found for ID: {}", rental_id);
            return Ok(ResultResponse::failure(RENTAL_NOT_FOUND));
        };
        let rental = with_related.rental;

        // The plan was validated at creation; a miss here means the
        // stored row is corrupt.
        let Some(plan) = self.catalog.plan(rental.plan_days) else {
            error!(
                "Plan not found for {} days on rental {}",
                rental.plan_days, rental.id
            );
            return Ok(ResultResponse::failure(UNEXPECTED_ERROR));
        };

        Ok(ResultResponse::success(RentalDetails {
            rental_id: rental.id,
            daily_rate: plan.daily_rate,
            deliverer_id: rental.deliverer_id,
            motorcycle_id: rental.motorcycle_id,
            start_date: rental.start_date,
            end_date: rental.end_date,
            estimating_ending_date: rental.estimating_ending_date,
        }))
    }
}

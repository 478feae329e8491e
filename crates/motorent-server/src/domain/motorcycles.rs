use std::sync::Arc;

use motorent_core::commands::CreateMotorcycleCommand;
use motorent_core::{
    Motorcycle, MotorcycleId, PagedResult, RegisteredMotorcycle, ResultResponse, REGISTRATION_YEAR,
};
use tracing::{error, info, warn};

use crate::domain::{
    unexpected_failure, MOTORCYCLE_HAS_RENTAL, MOTORCYCLE_NOT_FOUND, MOTORCYCLE_UPDATED,
    PLATE_NOT_UNIQUE,
};
use crate::error::{MotorentError, Result};
use crate::mq::EventPublisher;
use crate::storage::{MotorcycleRepository, RentalRepository};

/// Fleet lifecycle: registration, plate changes, listing and removal.
/// Registrations of the announced model year are published to the
/// event channel after the row is persisted.
pub struct MotorcycleService {
    motorcycle_repository: Arc<dyn MotorcycleRepository>,
    rental_repository: Arc<dyn RentalRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl MotorcycleService {
    pub fn new(
        motorcycle_repository: Arc<dyn MotorcycleRepository>,
        rental_repository: Arc<dyn RentalRepository>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            motorcycle_repository,
            rental_repository,
            event_publisher,
        }
    }

    /// Adds a motorcycle to the fleet. A publish failure on the
    /// registration event is returned as a hard error even though the
    /// motorcycle is already persisted at that point.
    pub async fn create_motorcycle(
        &self,
        command: CreateMotorcycleCommand,
    ) -> Result<ResultResponse<bool>> {
        let existing = match self
            .motorcycle_repository
            .find_by_plate(&command.plate_number, false)
            .await
        {
            Ok(existing) => existing,
            Err(e) => return Ok(unexpected_failure("motorcycle creation", &e)),
        };
        if existing.is_some() {
            warn!(
                "Attempted to add motorcycle with duplicate plate number: {}",
                command.plate_number
            );
            return Ok(ResultResponse::failure(PLATE_NOT_UNIQUE));
        }

        let motorcycle = Motorcycle::create(
            command.identifier,
            command.year,
            command.model,
            command.plate_number,
        );

        if let Err(e) = self.motorcycle_repository.add(&motorcycle).await {
            return Ok(match e {
                MotorentError::Duplicate { .. } => {
                    warn!(
                        "Attempted to add motorcycle with duplicate plate number: {}",
                        motorcycle.plate_number
                    );
                    ResultResponse::failure(PLATE_NOT_UNIQUE)
                }
                e => unexpected_failure("motorcycle creation", &e),
            });
        }

        if motorcycle.year == REGISTRATION_YEAR {
            let message = RegisteredMotorcycle::from_motorcycle(&motorcycle);
            let payload = serde_json::to_string(&message).unwrap_or_default();
            if let Err(e) = self.event_publisher.publish(message).await {
                error!(
                    "Error publishing registration event for motorcycle {}: {}",
                    motorcycle.plate_number, e
                );
                return Err(e);
            }
            info!("Published registration event: {}", payload);
        }

        Ok(ResultResponse::success(true))
    }

    /// Soft-deletes a motorcycle unless any rental, open or closed,
    /// references it.
    pub async fn delete_motorcycle(&self, id: &MotorcycleId) -> Result<ResultResponse<bool>> {
        let motorcycle = match self.motorcycle_repository.find_by_id(id).await {
            Ok(motorcycle) => motorcycle,
            Err(e) => return Ok(unexpected_failure("motorcycle deletion", &e)),
        };
        let Some(motorcycle) = motorcycle else {
            warn!("Attempted to delete a motorcycle that was not found: {}", id);
            return Ok(ResultResponse::failure(MOTORCYCLE_NOT_FOUND));
        };

        let rentals = match self
            .rental_repository
            .find_by_motorcycle_id(&motorcycle.id)
            .await
        {
            Ok(rentals) => rentals,
            Err(e) => return Ok(unexpected_failure("motorcycle deletion", &e)),
        };
        if !rentals.is_empty() {
            warn!(
                "Cannot delete motorcycle {} because it has a rental record.",
                motorcycle.id
            );
            return Ok(ResultResponse::failure(MOTORCYCLE_HAS_RENTAL));
        }

        if let Err(e) = self.motorcycle_repository.delete(&motorcycle.id).await {
            return Ok(unexpected_failure("motorcycle deletion", &e));
        }

        info!("Deleted motorcycle {}", motorcycle.id);
        Ok(ResultResponse::success(true))
    }

    /// Changes the plate, the only field that can move after creation.
    pub async fn update_plate_number(
        &self,
        id: &MotorcycleId,
        plate_number: String,
    ) -> Result<ResultResponse<String>> {
        info!("Updating motorcycle {}", id);

        let motorcycle = match self.motorcycle_repository.find_by_id(id).await {
            Ok(motorcycle) => motorcycle,
            Err(e) => return Ok(unexpected_failure("motorcycle update", &e)),
        };
        let Some(mut motorcycle) = motorcycle else {
            warn!("Motorcycle not found for ID: {}", id);
            return Ok(ResultResponse::failure(MOTORCYCLE_NOT_FOUND));
        };

        motorcycle.update_plate_number(plate_number);
        if let Err(e) = self.motorcycle_repository.update(&motorcycle).await {
            return Ok(match e {
                MotorentError::Duplicate { .. } => {
                    warn!(
                        "Attempted to move motorcycle {} to a plate number already in use",
                        motorcycle.id
                    );
                    ResultResponse::failure(PLATE_NOT_UNIQUE)
                }
                e => unexpected_failure("motorcycle update", &e),
            });
        }

        info!("Updated motorcycle {}", motorcycle.id);
        Ok(ResultResponse::success(MOTORCYCLE_UPDATED.to_string()))
    }

    pub async fn list_motorcycles(
        &self,
        page_number: i32,
        page_size: i32,
    ) -> Result<ResultResponse<PagedResult<Motorcycle>>> {
        info!(
            "Retrieving motorcycles for page {} with size {}",
            page_number, page_size
        );

        let page = match self
            .motorcycle_repository
            .list_page(page_number, page_size)
            .await
        {
            Ok(page) => page,
            Err(e) => return Ok(unexpected_failure("motorcycle listing", &e)),
        };

        info!("Retrieved {} motorcycles", page.items.len());
        Ok(ResultResponse::success(page))
    }

    pub async fn find_by_plate(&self, plate_number: &str) -> Result<ResultResponse<Motorcycle>> {
        let motorcycle = match self
            .motorcycle_repository
            .find_by_plate(plate_number, false)
            .await
        {
            Ok(motorcycle) => motorcycle,
            Err(e) => return Ok(unexpected_failure("motorcycle lookup", &e)),
        };

        match motorcycle {
            Some(motorcycle) => Ok(ResultResponse::success(motorcycle)),
            None => {
                warn!("Motorcycle not found for plate number: {}", plate_number);
                Ok(ResultResponse::failure(MOTORCYCLE_NOT_FOUND))
            }
        }
    }
}

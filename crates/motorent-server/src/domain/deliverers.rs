use std::sync::Arc;

use motorent_core::commands::{self, CreateDelivererCommand};
use motorent_core::{image, Deliverer, DelivererId, DriverLicenseType, ResultResponse};
use tracing::{info, warn};

use crate::domain::{
    unexpected_failure, BUSINESS_TAX_ID_NOT_UNIQUE, DELIVERER_NOT_FOUND, IMAGE_EXTENSION_INVALID,
    LICENSE_NUMBER_NOT_UNIQUE,
};
use crate::error::{MotorentError, Result};
use crate::media::ObjectStorage;
use crate::storage::DelivererRepository;

/// Courier lifecycle: registration with document uniqueness checks and
/// license image handling. The image step runs after the deliverer row
/// is persisted, so a rejected image leaves the deliverer in place
/// without a license image key.
pub struct DelivererService {
    deliverer_repository: Arc<dyn DelivererRepository>,
    object_storage: Arc<dyn ObjectStorage>,
}

impl DelivererService {
    pub fn new(
        deliverer_repository: Arc<dyn DelivererRepository>,
        object_storage: Arc<dyn ObjectStorage>,
    ) -> Self {
        Self {
            deliverer_repository,
            object_storage,
        }
    }

    pub async fn create_deliverer(
        &self,
        command: CreateDelivererCommand,
    ) -> Result<ResultResponse<bool>> {
        let CreateDelivererCommand {
            identifier,
            name,
            business_tax_id,
            date_of_birth,
            driver_license_number,
            driver_license_type,
            driver_license_image_base64,
        } = command;

        let Some(license_type) = DriverLicenseType::from_code(driver_license_type) else {
            warn!(
                "Rejected deliverer with out-of-range license type code: {}",
                driver_license_type
            );
            return Ok(ResultResponse::failure(commands::DRIVER_LICENSE_TYPE_RANGE));
        };

        let mut deliverer = Deliverer::create(
            identifier,
            name,
            business_tax_id,
            date_of_birth,
            driver_license_number,
            license_type,
        );

        info!(
            "Creating deliverer with business tax id: {}",
            deliverer.business_tax_id
        );

        let existing_tax_id = match self
            .deliverer_repository
            .find_by_business_tax_id(&deliverer.business_tax_id)
            .await
        {
            Ok(existing) => existing,
            Err(e) => return Ok(unexpected_failure("deliverer creation", &e)),
        };
        if existing_tax_id.is_some() {
            warn!(
                "Business tax id already exists: {}",
                deliverer.business_tax_id
            );
            return Ok(ResultResponse::failure(BUSINESS_TAX_ID_NOT_UNIQUE));
        }

        let existing_license = match self
            .deliverer_repository
            .find_by_driver_license_number(&deliverer.driver_license_number)
            .await
        {
            Ok(existing) => existing,
            Err(e) => return Ok(unexpected_failure("deliverer creation", &e)),
        };
        if existing_license.is_some() {
            warn!(
                "Driver license number already exists: {}",
                deliverer.driver_license_number
            );
            return Ok(ResultResponse::failure(LICENSE_NUMBER_NOT_UNIQUE));
        }

        if let Err(e) = self.deliverer_repository.add(&deliverer).await {
            return Ok(match e {
                MotorentError::Duplicate { ref constraint } => {
                    warn!("Deliverer document collision on {}", constraint);
                    if constraint.contains("business_tax_id") {
                        ResultResponse::failure(BUSINESS_TAX_ID_NOT_UNIQUE)
                    } else {
                        ResultResponse::failure(LICENSE_NUMBER_NOT_UNIQUE)
                    }
                }
                e => unexpected_failure("deliverer creation", &e),
            });
        }

        if let Some(image) = driver_license_image_base64.filter(|s| !s.is_empty()) {
            if !image::is_recognized_image_format(&image) {
                warn!("Invalid image payload for driver license image.");
                return Ok(ResultResponse::failure(IMAGE_EXTENSION_INVALID));
            }

            let key = match self
                .object_storage
                .upload(&deliverer.id.to_string(), &image)
                .await
            {
                Ok(key) => key,
                Err(e) => return Ok(unexpected_failure("driver license image upload", &e)),
            };

            deliverer.set_driver_license_image_key(key.clone());
            if let Err(e) = self.deliverer_repository.update(&deliverer).await {
                return Ok(unexpected_failure("deliverer creation", &e));
            }

            info!("Uploaded driver license image with key: {}", key);
        }

        Ok(ResultResponse::success(true))
    }

    /// Attaches a license image to an existing deliverer, replacing any
    /// previous key.
    pub async fn attach_driver_license_image(
        &self,
        deliverer_id: &DelivererId,
        image_base64: &str,
    ) -> Result<ResultResponse<bool>> {
        let deliverer = match self.deliverer_repository.find_by_id(deliverer_id).await {
            Ok(deliverer) => deliverer,
            Err(e) => return Ok(unexpected_failure("driver license update", &e)),
        };
        let Some(mut deliverer) = deliverer else {
            warn!("Deliverer not found for ID: {}", deliverer_id);
            return Ok(ResultResponse::failure(DELIVERER_NOT_FOUND));
        };

        if !image::is_recognized_image_format(image_base64) {
            warn!("Invalid image payload for driver license image.");
            return Ok(ResultResponse::failure(IMAGE_EXTENSION_INVALID));
        }

        let key = match self
            .object_storage
            .upload(&deliverer.id.to_string(), image_base64)
            .await
        {
            Ok(key) => key,
            Err(e) => return Ok(unexpected_failure("driver license image upload", &e)),
        };

        deliverer.set_driver_license_image_key(key);
        if let Err(e) = self.deliverer_repository.update(&deliverer).await {
            return Ok(unexpected_failure("driver license update", &e));
        }

        info!("Updated driver license for deliverer {}", deliverer_id);
        Ok(ResultResponse::success(true))
    }
}

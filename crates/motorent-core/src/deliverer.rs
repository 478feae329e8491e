use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::trackable::{AuditStamps, Trackable};
use crate::types::{DelivererId, DriverLicenseType};

/// A registered deliverer allowed to rent motorcycles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deliverer {
    pub id: DelivererId,
    pub identifier: String,
    pub name: String,
    pub business_tax_id: String,
    pub date_of_birth: NaiveDate,
    pub driver_license_number: String,
    pub driver_license_type: DriverLicenseType,
    /// Object key of the stored license image, if one was uploaded.
    pub driver_license_image_key: Option<String>,
    pub stamps: AuditStamps,
}

impl Deliverer {
    pub fn create(
        identifier: String,
        name: String,
        business_tax_id: String,
        date_of_birth: NaiveDate,
        driver_license_number: String,
        driver_license_type: DriverLicenseType,
    ) -> Self {
        Self {
            id: DelivererId::new(),
            identifier,
            name,
            business_tax_id,
            date_of_birth,
            driver_license_number,
            driver_license_type,
            driver_license_image_key: None,
            stamps: AuditStamps::new(),
        }
    }

    pub fn set_driver_license_image_key(&mut self, key: String) {
        self.driver_license_image_key = Some(key);
    }
}

impl Trackable for Deliverer {
    fn stamps(&self) -> &AuditStamps {
        &self.stamps
    }

    fn stamps_mut(&mut self) -> &mut AuditStamps {
        &mut self.stamps
    }
}

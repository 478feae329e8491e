use chrono::{Datelike, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{DelivererId, MotorcycleId};

/// Validation message for a driver license type code outside 1..=3.
/// Shared with the deliverer service, which re-checks the code before
/// converting it.
pub const DRIVER_LICENSE_TYPE_RANGE: &str = "Driver License Type must be between 1 and 3.";

const MINIMUM_DELIVERER_AGE: i32 = 18;
const MAX_NAME_LENGTH: usize = 50;

/// Request to add a motorcycle to the fleet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMotorcycleCommand {
    pub identifier: String,
    pub year: i32,
    pub model: String,
    pub plate_number: String,
}

impl CreateMotorcycleCommand {
    /// Messages for every violated rule, in rule order. Empty means valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        check_required_text(&self.identifier, "Identifier", &mut errors);

        let current_year = Utc::now().year();
        if self.year < 1900 || self.year > current_year {
            errors.push(format!("Year must be between 1900 and {}.", current_year));
        }

        check_required_text(&self.model, "Model", &mut errors);

        if self.plate_number.trim().is_empty() {
            errors.push("Plate Number is required.".to_string());
        } else if !is_valid_plate_number(&self.plate_number) {
            errors.push(
                "Plate Number must contain only uppercase letters, digits, or hyphens.".to_string(),
            );
        }

        errors
    }
}

/// Request to register a deliverer. The license type arrives as its
/// numeric code so that an out-of-range value is reportable instead of
/// unrepresentable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDelivererCommand {
    pub identifier: String,
    pub name: String,
    pub business_tax_id: String,
    pub date_of_birth: NaiveDate,
    pub driver_license_number: String,
    pub driver_license_type: i16,
    pub driver_license_image_base64: Option<String>,
}

impl CreateDelivererCommand {
    /// Messages for every violated rule, in rule order. Empty means valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        check_required_text(&self.identifier, "Identifier", &mut errors);
        check_required_text(&self.name, "Name", &mut errors);

        if self.business_tax_id.trim().is_empty() {
            errors.push("Business Tax ID is required.".to_string());
        } else if !is_exact_digits(&self.business_tax_id, 14) {
            errors.push("Business Tax ID must be exactly 14 digits.".to_string());
        }

        if !meets_minimum_age(self.date_of_birth, Utc::now().date_naive()) {
            errors.push("The deliverer must be at least 18 years old.".to_string());
        }

        if self.driver_license_number.trim().is_empty() {
            errors.push("Driver License Number is required.".to_string());
        } else if !is_exact_digits(&self.driver_license_number, 9) {
            errors.push(
                "Driver License Number must be exactly 9 digits and contain only numbers."
                    .to_string(),
            );
        }

        if !(1..=3).contains(&self.driver_license_type) {
            errors.push(DRIVER_LICENSE_TYPE_RANGE.to_string());
        }

        errors
    }
}

/// Request to open a rental. No standalone validation: the plan, the
/// start date window and the referenced parties are all checked against
/// repository state by the rental service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRentalCommand {
    pub plan_days: i32,
    pub deliverer_id: DelivererId,
    pub motorcycle_id: MotorcycleId,
    pub start_date: NaiveDate,
    pub estimating_ending_date: NaiveDate,
}

/// Age at `today`, counting a birthday not yet reached this year.
pub fn meets_minimum_age(date_of_birth: NaiveDate, today: NaiveDate) -> bool {
    let mut age = today.year() - date_of_birth.year();
    if age < 0 {
        return false;
    }
    let anniversary = today
        .checked_sub_months(Months::new(age as u32 * 12))
        .unwrap_or(today);
    if date_of_birth > anniversary {
        age -= 1;
    }
    age >= MINIMUM_DELIVERER_AGE
}

fn check_required_text(value: &str, label: &str, errors: &mut Vec<String>) {
    if value.trim().is_empty() {
        errors.push(format!("{} is required.", label));
    } else if value.chars().count() > MAX_NAME_LENGTH {
        errors.push(format!(
            "{} must be between 1 and {} characters.",
            label, MAX_NAME_LENGTH
        ));
    }
}

fn is_exact_digits(value: &str, expected_len: usize) -> bool {
    value.chars().count() == expected_len && value.chars().all(|c| c.is_ascii_digit())
}

fn is_valid_plate_number(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '-')
}

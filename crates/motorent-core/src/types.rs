use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Motorcycle identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MotorcycleId(Uuid);

impl MotorcycleId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for MotorcycleId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MotorcycleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MotorcycleId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Deliverer identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DelivererId(Uuid);

impl DelivererId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for DelivererId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DelivererId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DelivererId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Rental identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RentalId(Uuid);

impl RentalId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for RentalId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RentalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RentalId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Driver license categories, stored by their numeric code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DriverLicenseType {
    A,
    B,
    Ab,
}

impl DriverLicenseType {
    pub fn from_code(code: i16) -> Option<Self> {
        match code {
            1 => Some(DriverLicenseType::A),
            2 => Some(DriverLicenseType::B),
            3 => Some(DriverLicenseType::Ab),
            _ => None,
        }
    }

    pub fn code(&self) -> i16 {
        match self {
            DriverLicenseType::A => 1,
            DriverLicenseType::B => 2,
            DriverLicenseType::Ab => 3,
        }
    }

    /// Category A covers motorcycles; AB includes it.
    pub fn includes_category_a(&self) -> bool {
        matches!(self, DriverLicenseType::A | DriverLicenseType::Ab)
    }
}

impl fmt::Display for DriverLicenseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriverLicenseType::A => write!(f, "A"),
            DriverLicenseType::B => write!(f, "B"),
            DriverLicenseType::Ab => write!(f, "AB"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display_and_parse_round_trip() {
        let id = RentalId::new();
        let parsed = RentalId::from_str(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_id_from_uuid_preserves_value() {
        let raw = Uuid::new_v4();
        assert_eq!(MotorcycleId::from_uuid(raw).as_uuid(), raw);
        assert_eq!(DelivererId::from_uuid(raw).as_uuid(), raw);
    }

    #[test]
    fn test_license_type_codes() {
        assert_eq!(DriverLicenseType::from_code(1), Some(DriverLicenseType::A));
        assert_eq!(DriverLicenseType::from_code(2), Some(DriverLicenseType::B));
        assert_eq!(DriverLicenseType::from_code(3), Some(DriverLicenseType::Ab));
        assert_eq!(DriverLicenseType::from_code(0), None);
        assert_eq!(DriverLicenseType::from_code(4), None);

        for code in 1..=3 {
            let license = DriverLicenseType::from_code(code).unwrap();
            assert_eq!(license.code(), code);
        }
    }

    #[test]
    fn test_license_type_category_a_coverage() {
        assert!(DriverLicenseType::A.includes_category_a());
        assert!(DriverLicenseType::Ab.includes_category_a());
        assert!(!DriverLicenseType::B.includes_category_a());
    }

    #[test]
    fn test_license_type_display() {
        assert_eq!(DriverLicenseType::A.to_string(), "A");
        assert_eq!(DriverLicenseType::B.to_string(), "B");
        assert_eq!(DriverLicenseType::Ab.to_string(), "AB");
    }
}

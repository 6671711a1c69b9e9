use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// The kind of client behind a push-channel connection.
///
/// Only `merchant` connections are eligible for order pushes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Merchant,
    Customer,
    Admin,
}

impl EntityType {
    /// The string form stored in the `connections.entity_type` column.
    pub fn as_str(self) -> &'static str {
        match self {
            EntityType::Merchant => "merchant",
            EntityType::Customer => "customer",
            EntityType::Admin => "admin",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "merchant" => Ok(EntityType::Merchant),
            "customer" => Ok(EntityType::Customer),
            "admin" => Ok(EntityType::Admin),
            other => Err(CoreError::Validation(format!(
                "unknown entity type: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_type_round_trips_through_str() {
        for et in [EntityType::Merchant, EntityType::Customer, EntityType::Admin] {
            assert_eq!(et.as_str().parse::<EntityType>().unwrap(), et);
        }
    }

    #[test]
    fn unknown_entity_type_is_rejected() {
        assert!("robot".parse::<EntityType>().is_err());
    }
}

#[cfg(feature = "sea-orm")]
use sea_orm::prelude::StringLen;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of port call recorded against a voyage.
///
/// When the `sea-orm` feature is enabled, this enum can be used directly in SeaORM entities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::None)")
)]
#[serde(rename_all = "PascalCase")]
pub enum VoyageEventType {
    /// The vessel left the port.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "Depart"))]
    Depart,
    /// The vessel reached the port.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "Arrive"))]
    Arrive,
}

impl VoyageEventType {
    pub const ALL: &'static [VoyageEventType] = &[Self::Depart, Self::Arrive];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Depart => "Depart",
            Self::Arrive => "Arrive",
        }
    }
}

impl fmt::Display for VoyageEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error when parsing an invalid event type string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEventTypeError {
    invalid: String,
}

impl fmt::Display for ParseEventTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid voyage event type '{}'. Valid values: {}",
            self.invalid,
            VoyageEventType::ALL
                .iter()
                .map(|t| t.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

impl std::error::Error for ParseEventTypeError {}

impl FromStr for VoyageEventType {
    type Err = ParseEventTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Depart" => Ok(Self::Depart),
            "Arrive" => Ok(Self::Arrive),
            _ => Err(ParseEventTypeError {
                invalid: s.to_string(),
            }),
        }
    }
}

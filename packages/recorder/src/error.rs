use std::fmt;

use common::ValidationError;
use config::ConfigError;
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Kind of record an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Country,
    Location,
    Operator,
    Port,
    VesselType,
    Vessel,
    RegistrationHistory,
    Voyage,
    VoyageEvent,
    Sighting,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Country => "country",
            Self::Location => "location",
            Self::Operator => "operator",
            Self::Port => "port",
            Self::VesselType => "vessel type",
            Self::Vessel => "vessel",
            Self::RegistrationHistory => "registration history",
            Self::Voyage => "voyage",
            Self::VoyageEvent => "voyage event",
            Self::Sighting => "sighting",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input field that failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    CountryCode,
    PortCode,
    VesselIdentifier,
    YearBuilt,
    Draught,
    Length,
    Beam,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::CountryCode => "country code",
            Self::PortCode => "port code",
            Self::VesselIdentifier => "vessel identifier",
            Self::YearBuilt => "year built",
            Self::Draught => "draught",
            Self::Length => "length",
            Self::Beam => "beam",
        })
    }
}

#[derive(Debug, Error)]
pub enum RecorderError {
    #[error("{entity} with ID {id} not found")]
    NotFound { entity: EntityKind, id: i32 },

    #[error("{entity} '{key}' already exists")]
    Exists { entity: EntityKind, key: String },

    #[error("{entity} with ID {id} is still referenced by other records")]
    InUse { entity: EntityKind, id: i32 },

    #[error("invalid {field}: {source}")]
    InvalidFormat {
        field: Field,
        source: ValidationError,
    },

    #[error("invalid {field}: {source}")]
    InvalidRange {
        field: Field,
        source: ValidationError,
    },

    #[error("invalid MMSI: {0}")]
    InvalidMmsi(#[source] ValidationError),

    #[error("database error: {0}")]
    Database(#[from] DbErr),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl RecorderError {
    /// Map a failed insert or update, turning a unique-constraint violation
    /// raised by storage into [`RecorderError::Exists`].
    pub(crate) fn on_write(err: DbErr, entity: EntityKind, key: impl Into<String>) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => Self::Exists {
                entity,
                key: key.into(),
            },
            _ => Self::Database(err),
        }
    }

    /// Map a failed delete, turning a foreign-key violation raised by storage
    /// into [`RecorderError::InUse`].
    pub(crate) fn on_remove(err: DbErr, entity: EntityKind, id: i32) -> Self {
        match err.sql_err() {
            Some(SqlErr::ForeignKeyConstraintViolation(_)) => Self::InUse { entity, id },
            _ => Self::Database(err),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_exists(&self) -> bool {
        matches!(self, Self::Exists { .. })
    }

    pub fn is_in_use(&self) -> bool {
        matches!(self, Self::InUse { .. })
    }
}

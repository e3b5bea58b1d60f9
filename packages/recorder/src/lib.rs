//! Maritime sighting and voyage recorder.
//!
//! Managers in [`manager`] own the lifecycle of every entity: input
//! normalization and validation, natural-key uniqueness, paging, the
//! one-active-registration-per-vessel rule and voyage cascade deletion.

pub mod config;
pub mod database;
pub mod entity;
pub mod error;
pub mod manager;

pub use common::VoyageEventType;
pub use error::{EntityKind, Field, RecorderError};
pub use manager::Recorder;

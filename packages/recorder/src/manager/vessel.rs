use std::collections::HashMap;

use chrono::{Datelike, Utc};
use common::ValidationError;
use common::clean_code;
use common::validation::{
    validate_alphanumeric, validate_decimal_range, validate_integer_range, validate_numeric,
};
use sea_orm::sea_query::IntoCondition;
use sea_orm::*;
use serde::Serialize;
use tracing::{debug, instrument};

use super::registration::{RegistrationDetails, with_lookups};
use super::{Record, Store};
use crate::entity::{registration_history, vessel};
use crate::error::{EntityKind, Field, RecorderError};

pub const EARLIEST_YEAR_BUILT: i32 = 1900;
pub const MINIMUM_DRAUGHT: f64 = 2.0;
pub const MINIMUM_LENGTH: i32 = 5;
pub const MINIMUM_BEAM: i32 = 2;

impl Record for vessel::Entity {
    const KIND: EntityKind = EntityKind::Vessel;

    fn id_column() -> vessel::Column {
        vessel::Column::Id
    }

    fn id_of(model: &vessel::Model) -> i32 {
        model.id
    }

    fn sort_keys() -> Vec<(vessel::Column, Order)> {
        vec![(vessel::Column::Identifier, Order::Asc)]
    }
}

/// Descriptive fields of a vessel, used for both add and update.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NewVessel {
    /// IMO number when `is_imo`, otherwise any alphanumeric identifier.
    pub identifier: String,
    pub is_imo: bool,
    pub built: Option<i32>,
    pub draught: Option<f64>,
    pub length: Option<i32>,
    pub beam: Option<i32>,
}

/// A vessel and its registrations, oldest first.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct VesselDetails {
    pub vessel: vessel::Model,
    pub registrations: Vec<RegistrationDetails>,
}

impl VesselDetails {
    pub fn active_registration(&self) -> Option<&RegistrationDetails> {
        self.registrations.iter().find(|r| r.registration.is_active)
    }
}

fn out_of_range(field: Field) -> impl FnOnce(ValidationError) -> RecorderError {
    move |source| RecorderError::InvalidRange { field, source }
}

/// Clean the identifier and check every field; returns the clean identifier.
fn normalize(input: &NewVessel) -> Result<String, RecorderError> {
    let identifier = clean_code(&input.identifier);
    let format = if input.is_imo {
        validate_numeric(&identifier, 7, 7)
    } else {
        validate_alphanumeric(&identifier, 1, 20)
    };
    format.map_err(|source| RecorderError::InvalidFormat {
        field: Field::VesselIdentifier,
        source,
    })?;

    validate_integer_range(input.built, EARLIEST_YEAR_BUILT, Utc::now().year(), true)
        .map_err(out_of_range(Field::YearBuilt))?;
    validate_decimal_range(input.draught, MINIMUM_DRAUGHT, f64::MAX, true)
        .map_err(out_of_range(Field::Draught))?;
    validate_integer_range(input.length, MINIMUM_LENGTH, i32::MAX, true)
        .map_err(out_of_range(Field::Length))?;
    validate_integer_range(input.beam, MINIMUM_BEAM, i32::MAX, true)
        .map_err(out_of_range(Field::Beam))?;

    Ok(identifier)
}

/// Attach registration histories to a page of vessels.
async fn with_registrations<C: ConnectionTrait>(
    conn: &C,
    vessels: Vec<vessel::Model>,
) -> Result<Vec<VesselDetails>, DbErr> {
    if vessels.is_empty() {
        return Ok(vec![]);
    }

    let ids: Vec<i32> = vessels.iter().map(|v| v.id).collect();
    let rows = super::ordered::<registration_history::Entity, _>(
        registration_history::Entity::find()
            .filter(registration_history::Column::VesselId.is_in(ids)),
    )
    .all(conn)
    .await?;

    let mut by_vessel: HashMap<i32, Vec<RegistrationDetails>> = HashMap::new();
    for details in with_lookups(conn, rows).await? {
        by_vessel
            .entry(details.registration.vessel_id)
            .or_default()
            .push(details);
    }

    Ok(vessels
        .into_iter()
        .map(|vessel| VesselDetails {
            registrations: by_vessel.remove(&vessel.id).unwrap_or_default(),
            vessel,
        })
        .collect())
}

/// Vessels with the given ids and their registrations, keyed by id.
pub(crate) async fn vessels_by_ids<C: ConnectionTrait>(
    conn: &C,
    ids: impl IntoIterator<Item = i32>,
) -> Result<HashMap<i32, VesselDetails>, DbErr> {
    let vessels = Store::<C, vessel::Entity>::new(conn).by_ids(ids).await?;
    Ok(with_registrations(conn, vessels.into_values().collect())
        .await?
        .into_iter()
        .map(|details| (details.vessel.id, details))
        .collect())
}

pub struct VesselManager<'a, C> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait + TransactionTrait> VesselManager<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    pub async fn get_one(
        &self,
        filter: impl IntoCondition,
    ) -> Result<Option<VesselDetails>, RecorderError> {
        Ok(self.list(filter, 1, 1).await?.into_iter().next())
    }

    pub async fn list(
        &self,
        filter: impl IntoCondition,
        page: u64,
        size: u64,
    ) -> Result<Vec<VesselDetails>, RecorderError> {
        let vessels = Store::<C, vessel::Entity>::new(self.conn)
            .list(filter, page, size)
            .await?;
        Ok(with_registrations(self.conn, vessels).await?)
    }

    #[instrument(skip(self))]
    pub async fn add(&self, input: NewVessel) -> Result<VesselDetails, RecorderError> {
        let identifier = normalize(&input)?;
        debug!(%identifier, "Adding vessel");

        let store = Store::<C, vessel::Entity>::new(self.conn);
        store
            .ensure_unique(
                vessel::Column::Identifier.eq(identifier.as_str()),
                &identifier,
                None,
            )
            .await?;

        let model = vessel::ActiveModel {
            identifier: Set(identifier.clone()),
            is_imo: Set(input.is_imo),
            built: Set(input.built),
            draught: Set(input.draught),
            length: Set(input.length),
            beam: Set(input.beam),
            ..Default::default()
        };
        let vessel = store.insert(model, &identifier).await?;

        debug!(id = vessel.id, "Added vessel");
        Ok(VesselDetails {
            vessel,
            registrations: vec![],
        })
    }

    /// Return the vessel with this identifier, adding it first if necessary.
    pub async fn add_if_not_exists(
        &self,
        input: NewVessel,
    ) -> Result<VesselDetails, RecorderError> {
        let key = clean_code(&input.identifier);
        match self
            .get_one(vessel::Column::Identifier.eq(key.as_str()))
            .await?
        {
            Some(existing) => Ok(existing),
            None => self.add(input).await,
        }
    }

    #[instrument(skip(self))]
    pub async fn update(&self, id: i32, input: NewVessel) -> Result<VesselDetails, RecorderError> {
        let txn = self.conn.begin().await?;
        let store = Store::<_, vessel::Entity>::new(&txn);
        let existing = store.require(id).await?;

        let identifier = normalize(&input)?;
        debug!(%identifier, "Updating vessel");
        store
            .ensure_unique(
                vessel::Column::Identifier.eq(identifier.as_str()),
                &identifier,
                Some(id),
            )
            .await?;

        let mut active: vessel::ActiveModel = existing.into();
        active.identifier = Set(identifier.clone());
        active.is_imo = Set(input.is_imo);
        active.built = Set(input.built);
        active.draught = Set(input.draught);
        active.length = Set(input.length);
        active.beam = Set(input.beam);
        let vessel = store.update(active, &identifier).await?;

        let mut details = with_registrations(&txn, vec![vessel]).await?;
        txn.commit().await?;

        debug!("Updated vessel");
        details
            .pop()
            .ok_or_else(|| DbErr::RecordNotFound("vessel".into()).into())
    }

    /// Delete a vessel. Vessels with registration history, voyages or
    /// sightings are kept and the delete fails with `InUse`.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), RecorderError> {
        debug!("Deleting vessel");
        Store::<C, vessel::Entity>::new(self.conn).remove(id).await?;
        debug!("Deleted vessel");
        Ok(())
    }
}

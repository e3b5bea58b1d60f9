//! Vessel registration history.
//!
//! Each vessel has at most one active registration. Adding a registration
//! makes it the active one and retires every other active row for the same
//! vessel in the same transaction, with the vessel row locked so concurrent
//! registrations of one vessel are applied one after another.

use chrono::{SubsecRound, Utc};
use common::clean_code;
use common::validation::validate_numeric;
use sea_orm::sea_query::IntoCondition;
use sea_orm::*;
use serde::Serialize;
use tracing::{debug, instrument};

use super::{Record, Store};
use crate::entity::{country, operator, registration_history, vessel, vessel_type};
use crate::error::{EntityKind, RecorderError};

impl Record for registration_history::Entity {
    const KIND: EntityKind = EntityKind::RegistrationHistory;

    fn id_column() -> registration_history::Column {
        registration_history::Column::Id
    }

    fn id_of(model: &registration_history::Model) -> i32 {
        model.id
    }

    fn sort_keys() -> Vec<(registration_history::Column, Order)> {
        vec![
            (registration_history::Column::VesselId, Order::Asc),
            (registration_history::Column::Date, Order::Asc),
        ]
    }
}

/// Fields of a registration to add.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NewRegistration {
    pub vessel_id: i32,
    pub vessel_type_id: i32,
    pub flag_id: i32,
    pub operator_id: i32,
    pub name: String,
    pub callsign: String,
    /// Nine digit Maritime Mobile Service Identity.
    pub mmsi: String,
    pub tonnage: Option<i32>,
    pub passengers: Option<i32>,
    pub crew: Option<i32>,
    pub decks: Option<i32>,
    pub cabins: Option<i32>,
}

/// A registration with its flag, vessel type and operator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RegistrationDetails {
    pub registration: registration_history::Model,
    pub flag: Option<country::Model>,
    pub vessel_type: Option<vessel_type::Model>,
    pub operator: Option<operator::Model>,
}

/// Attach lookups to a batch of registrations with one query per lookup table.
pub(crate) async fn with_lookups<C: ConnectionTrait>(
    conn: &C,
    registrations: Vec<registration_history::Model>,
) -> Result<Vec<RegistrationDetails>, DbErr> {
    if registrations.is_empty() {
        return Ok(vec![]);
    }

    let flags = Store::<C, country::Entity>::new(conn)
        .by_ids(registrations.iter().map(|r| r.flag_id))
        .await?;
    let vessel_types = Store::<C, vessel_type::Entity>::new(conn)
        .by_ids(registrations.iter().map(|r| r.vessel_type_id))
        .await?;
    let operators = Store::<C, operator::Entity>::new(conn)
        .by_ids(registrations.iter().map(|r| r.operator_id))
        .await?;

    Ok(registrations
        .into_iter()
        .map(|registration| RegistrationDetails {
            flag: flags.get(&registration.flag_id).cloned(),
            vessel_type: vessel_types.get(&registration.vessel_type_id).cloned(),
            operator: operators.get(&registration.operator_id).cloned(),
            registration,
        })
        .collect())
}

pub struct RegistrationManager<'a, C> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait + TransactionTrait> RegistrationManager<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    pub async fn get_one(
        &self,
        filter: impl IntoCondition,
    ) -> Result<Option<RegistrationDetails>, RecorderError> {
        Ok(self.list(filter, 1, 1).await?.into_iter().next())
    }

    pub async fn list(
        &self,
        filter: impl IntoCondition,
        page: u64,
        size: u64,
    ) -> Result<Vec<RegistrationDetails>, RecorderError> {
        let rows = Store::<C, registration_history::Entity>::new(self.conn)
            .list(filter, page, size)
            .await?;
        Ok(with_lookups(self.conn, rows).await?)
    }

    /// The vessel's active registration, if it has one.
    pub async fn active_for(
        &self,
        vessel_id: i32,
    ) -> Result<Option<RegistrationDetails>, RecorderError> {
        self.get_one(
            Condition::all()
                .add(registration_history::Column::VesselId.eq(vessel_id))
                .add(registration_history::Column::IsActive.eq(true)),
        )
        .await
    }

    /// Record a new active registration and retire the vessel's previous one.
    #[instrument(skip(self, registration), fields(vessel_id = registration.vessel_id))]
    pub async fn add(
        &self,
        registration: NewRegistration,
    ) -> Result<RegistrationDetails, RecorderError> {
        let callsign = clean_code(&registration.callsign);
        let mmsi = clean_code(&registration.mmsi);
        debug!(
            vessel_type_id = registration.vessel_type_id,
            flag_id = registration.flag_id,
            operator_id = registration.operator_id,
            name = %registration.name,
            %callsign,
            %mmsi,
            "Adding registration"
        );
        validate_numeric(&mmsi, 9, 9).map_err(RecorderError::InvalidMmsi)?;

        let txn = self.conn.begin().await?;
        Store::<_, vessel::Entity>::new(&txn)
            .require_for_update(registration.vessel_id)
            .await?;

        let store = Store::<_, registration_history::Entity>::new(&txn);
        let model = registration_history::ActiveModel {
            vessel_id: Set(registration.vessel_id),
            vessel_type_id: Set(registration.vessel_type_id),
            flag_id: Set(registration.flag_id),
            operator_id: Set(registration.operator_id),
            name: Set(registration.name),
            callsign: Set(callsign),
            mmsi: Set(mmsi.clone()),
            tonnage: Set(registration.tonnage),
            passengers: Set(registration.passengers),
            crew: Set(registration.crew),
            decks: Set(registration.decks),
            cabins: Set(registration.cabins),
            date: Set(Utc::now().trunc_subsecs(6)),
            is_active: Set(true),
            ..Default::default()
        };
        let added = store.insert(model, &mmsi).await?;

        let previous = registration_history::Entity::find()
            .filter(registration_history::Column::VesselId.eq(added.vessel_id))
            .filter(registration_history::Column::Id.ne(added.id))
            .filter(registration_history::Column::IsActive.eq(true))
            .all(&txn)
            .await?;
        let deactivated = previous.len();
        for row in previous {
            let mut active: registration_history::ActiveModel = row.into();
            active.is_active = Set(false);
            active.update(&txn).await?;
        }

        let details = with_lookups(&txn, vec![added]).await?;
        txn.commit().await?;

        debug!(deactivated, "Added registration");
        details
            .into_iter()
            .next()
            .ok_or_else(|| DbErr::RecordNotFound("registration_history".into()).into())
    }

    /// Mark one registration inactive. No other registration is activated.
    #[instrument(skip(self))]
    pub async fn deactivate(&self, id: i32) -> Result<(), RecorderError> {
        let txn = self.conn.begin().await?;
        let store = Store::<_, registration_history::Entity>::new(&txn);
        let existing = store.require(id).await?;
        debug!(vessel_id = existing.vessel_id, "Deactivating registration");

        let mut active: registration_history::ActiveModel = existing.into();
        active.is_active = Set(false);
        active.update(&txn).await?;
        txn.commit().await?;

        debug!("Deactivated registration");
        Ok(())
    }
}

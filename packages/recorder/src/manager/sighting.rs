use chrono::{DateTime, SubsecRound, Utc};
use sea_orm::sea_query::IntoCondition;
use sea_orm::*;
use serde::Serialize;
use tracing::{debug, instrument};

use super::vessel::{VesselDetails, vessels_by_ids};
use super::{Record, Store};
use crate::entity::{location, sighting, voyage};
use crate::error::{EntityKind, RecorderError};

impl Record for sighting::Entity {
    const KIND: EntityKind = EntityKind::Sighting;

    fn id_column() -> sighting::Column {
        sighting::Column::Id
    }

    fn id_of(model: &sighting::Model) -> i32 {
        model.id
    }

    fn sort_keys() -> Vec<(sighting::Column, Order)> {
        vec![(sighting::Column::Date, Order::Asc)]
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SightingDetails {
    pub sighting: sighting::Model,
    pub location: Option<location::Model>,
    pub vessel: Option<VesselDetails>,
    pub voyage: Option<voyage::Model>,
}

async fn with_details<C: ConnectionTrait>(
    conn: &C,
    rows: Vec<(sighting::Model, Option<location::Model>)>,
) -> Result<Vec<SightingDetails>, DbErr> {
    if rows.is_empty() {
        return Ok(vec![]);
    }

    let vessels = vessels_by_ids(conn, rows.iter().map(|(s, _)| s.vessel_id)).await?;
    let voyages = Store::<C, voyage::Entity>::new(conn)
        .by_ids(rows.iter().filter_map(|(s, _)| s.voyage_id))
        .await?;

    Ok(rows
        .into_iter()
        .map(|(sighting, location)| SightingDetails {
            vessel: vessels.get(&sighting.vessel_id).cloned(),
            voyage: sighting.voyage_id.and_then(|id| voyages.get(&id).cloned()),
            location,
            sighting,
        })
        .collect())
}

async fn load_details<C: ConnectionTrait>(
    conn: &C,
    sighting: sighting::Model,
) -> Result<SightingDetails, RecorderError> {
    let location = Store::<C, location::Entity>::new(conn)
        .find(sighting.location_id)
        .await?;
    let mut details = with_details(conn, vec![(sighting, location)]).await?;
    details
        .pop()
        .ok_or_else(|| DbErr::RecordNotFound("sighting".into()).into())
}

pub struct SightingManager<'a, C> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait + TransactionTrait> SightingManager<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    pub async fn get_one(
        &self,
        filter: impl IntoCondition,
    ) -> Result<Option<SightingDetails>, RecorderError> {
        Ok(self.list(filter, 1, 1).await?.into_iter().next())
    }

    pub async fn list(
        &self,
        filter: impl IntoCondition,
        page: u64,
        size: u64,
    ) -> Result<Vec<SightingDetails>, RecorderError> {
        let rows = Store::<C, sighting::Entity>::new(self.conn)
            .list_with::<location::Entity>(filter, page, size)
            .await?;
        Ok(with_details(self.conn, rows).await?)
    }

    /// The latest sighting matching `filter`.
    pub async fn get_most_recent(
        &self,
        filter: impl IntoCondition,
    ) -> Result<Option<SightingDetails>, RecorderError> {
        let latest = sighting::Entity::find()
            .filter(filter)
            .order_by_desc(sighting::Column::Date)
            .order_by_desc(sighting::Column::Id)
            .one(self.conn)
            .await?;

        match latest {
            Some(sighting) => Ok(Some(load_details(self.conn, sighting).await?)),
            None => Ok(None),
        }
    }

    #[instrument(skip(self))]
    pub async fn add(
        &self,
        location_id: i32,
        voyage_id: Option<i32>,
        vessel_id: i32,
        date: DateTime<Utc>,
        is_my_voyage: bool,
    ) -> Result<SightingDetails, RecorderError> {
        debug!("Adding sighting");

        let model = sighting::ActiveModel {
            location_id: Set(location_id),
            voyage_id: Set(voyage_id),
            vessel_id: Set(vessel_id),
            date: Set(date.trunc_subsecs(6)),
            is_my_voyage: Set(is_my_voyage),
            ..Default::default()
        };
        let sighting = Store::<C, sighting::Entity>::new(self.conn)
            .insert(model, &format!("vessel {vessel_id} on {date}"))
            .await?;
        let details = load_details(self.conn, sighting).await?;

        debug!(id = details.sighting.id, "Added sighting");
        Ok(details)
    }

    #[instrument(skip(self))]
    pub async fn update(
        &self,
        id: i32,
        location_id: i32,
        voyage_id: Option<i32>,
        vessel_id: i32,
        date: DateTime<Utc>,
        is_my_voyage: bool,
    ) -> Result<SightingDetails, RecorderError> {
        let txn = self.conn.begin().await?;
        let store = Store::<_, sighting::Entity>::new(&txn);
        let existing = store.require(id).await?;
        debug!("Updating sighting");

        let mut active: sighting::ActiveModel = existing.into();
        active.location_id = Set(location_id);
        active.voyage_id = Set(voyage_id);
        active.vessel_id = Set(vessel_id);
        active.date = Set(date.trunc_subsecs(6));
        active.is_my_voyage = Set(is_my_voyage);
        let sighting = store
            .update(active, &format!("vessel {vessel_id} on {date}"))
            .await?;
        let details = load_details(&txn, sighting).await?;
        txn.commit().await?;

        debug!("Updated sighting");
        Ok(details)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), RecorderError> {
        debug!("Deleting sighting");
        Store::<C, sighting::Entity>::new(self.conn).remove(id).await?;
        debug!("Deleted sighting");
        Ok(())
    }
}

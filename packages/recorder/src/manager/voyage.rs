use common::clean_code;
use sea_orm::sea_query::IntoCondition;
use sea_orm::*;
use serde::Serialize;
use tracing::{debug, instrument};

use super::vessel::{VesselDetails, vessels_by_ids};
use super::voyage_event::{VoyageEventDetails, events_for};
use super::{Record, Store, page_window};
use crate::entity::{operator, voyage, voyage_event};
use crate::error::{EntityKind, RecorderError};

impl Record for voyage::Entity {
    const KIND: EntityKind = EntityKind::Voyage;

    fn id_column() -> voyage::Column {
        voyage::Column::Id
    }

    fn id_of(model: &voyage::Model) -> i32 {
        model.id
    }

    fn sort_keys() -> Vec<(voyage::Column, Order)> {
        vec![(voyage::Column::Number, Order::Asc)]
    }
}

/// A voyage with its operator, vessel and events in date order.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct VoyageDetails {
    pub voyage: voyage::Model,
    pub operator: Option<operator::Model>,
    pub vessel: Option<VesselDetails>,
    pub events: Vec<VoyageEventDetails>,
}

pub struct VoyageManager<'a, C> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait + TransactionTrait> VoyageManager<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    pub async fn get_one(
        &self,
        filter: impl IntoCondition,
    ) -> Result<Option<VoyageDetails>, RecorderError> {
        Ok(self.list(filter, 1, 1).await?.into_iter().next())
    }

    /// Voyages ordered by operator name, then voyage number.
    pub async fn list(
        &self,
        filter: impl IntoCondition,
        page: u64,
        size: u64,
    ) -> Result<Vec<VoyageDetails>, RecorderError> {
        let query = voyage::Entity::find()
            .filter(filter)
            .find_also_related(operator::Entity)
            .order_by_asc(operator::Column::Name)
            .order_by_asc(voyage::Column::Number)
            .order_by_asc(voyage::Column::Id);
        let rows = page_window(query, page, size).all(self.conn).await?;

        Ok(with_details(self.conn, rows).await?)
    }

    #[instrument(skip(self))]
    pub async fn add(
        &self,
        operator_id: i32,
        vessel_id: i32,
        number: &str,
    ) -> Result<VoyageDetails, RecorderError> {
        let number = clean_code(number);
        debug!(%number, "Adding voyage");

        let model = voyage::ActiveModel {
            operator_id: Set(operator_id),
            vessel_id: Set(vessel_id),
            number: Set(number.clone()),
            ..Default::default()
        };
        let voyage = Store::<C, voyage::Entity>::new(self.conn)
            .insert(model, &number)
            .await?;
        let details = load_details(self.conn, voyage).await?;

        debug!(id = details.voyage.id, "Added voyage");
        Ok(details)
    }

    #[instrument(skip(self))]
    pub async fn update(
        &self,
        id: i32,
        operator_id: i32,
        vessel_id: i32,
        number: &str,
    ) -> Result<VoyageDetails, RecorderError> {
        let txn = self.conn.begin().await?;
        let store = Store::<_, voyage::Entity>::new(&txn);
        let existing = store.require(id).await?;

        let number = clean_code(number);
        debug!(%number, "Updating voyage");

        let mut active: voyage::ActiveModel = existing.into();
        active.operator_id = Set(operator_id);
        active.vessel_id = Set(vessel_id);
        active.number = Set(number.clone());
        let voyage = store.update(active, &number).await?;
        let details = load_details(&txn, voyage).await?;
        txn.commit().await?;

        debug!("Updated voyage");
        Ok(details)
    }

    /// Delete a voyage and all of its events as one unit.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), RecorderError> {
        debug!("Deleting voyage");
        let txn = self.conn.begin().await?;
        let store = Store::<_, voyage::Entity>::new(&txn);
        store.require(id).await?;

        let events = voyage_event::Entity::delete_many()
            .filter(voyage_event::Column::VoyageId.eq(id))
            .exec(&txn)
            .await?
            .rows_affected;
        store.remove(id).await?;
        txn.commit().await?;

        debug!(events, "Deleted voyage");
        Ok(())
    }
}

/// Attach vessels and events to voyages already joined with their operator.
async fn with_details<C: ConnectionTrait>(
    conn: &C,
    rows: Vec<(voyage::Model, Option<operator::Model>)>,
) -> Result<Vec<VoyageDetails>, DbErr> {
    if rows.is_empty() {
        return Ok(vec![]);
    }

    let vessels = vessels_by_ids(conn, rows.iter().map(|(v, _)| v.vessel_id)).await?;
    let mut events = events_for(conn, rows.iter().map(|(v, _)| v.id).collect()).await?;

    Ok(rows
        .into_iter()
        .map(|(voyage, operator)| VoyageDetails {
            vessel: vessels.get(&voyage.vessel_id).cloned(),
            events: events.remove(&voyage.id).unwrap_or_default(),
            operator,
            voyage,
        })
        .collect())
}

async fn load_details<C: ConnectionTrait>(
    conn: &C,
    voyage: voyage::Model,
) -> Result<VoyageDetails, RecorderError> {
    let operator = Store::<C, operator::Entity>::new(conn)
        .find(voyage.operator_id)
        .await?;
    let mut details = with_details(conn, vec![(voyage, operator)]).await?;
    details
        .pop()
        .ok_or_else(|| DbErr::RecordNotFound("voyage".into()).into())
}

use std::collections::HashMap;

use chrono::{DateTime, SubsecRound, Utc};
use common::VoyageEventType;
use sea_orm::sea_query::IntoCondition;
use sea_orm::*;
use serde::Serialize;
use tracing::{debug, instrument};

use super::{Record, Store, ordered};
use crate::entity::{port, voyage_event};
use crate::error::{EntityKind, RecorderError};

impl Record for voyage_event::Entity {
    const KIND: EntityKind = EntityKind::VoyageEvent;

    fn id_column() -> voyage_event::Column {
        voyage_event::Column::Id
    }

    fn id_of(model: &voyage_event::Model) -> i32 {
        model.id
    }

    fn sort_keys() -> Vec<(voyage_event::Column, Order)> {
        vec![
            (voyage_event::Column::VoyageId, Order::Asc),
            (voyage_event::Column::Date, Order::Asc),
            (voyage_event::Column::EventType, Order::Asc),
        ]
    }
}

/// A voyage event with the port it happened at.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct VoyageEventDetails {
    pub event: voyage_event::Model,
    pub port: Option<port::Model>,
}

/// Condition matching the event's natural key. Dates compare exactly.
fn natural_key(
    voyage_id: i32,
    port_id: i32,
    event_type: VoyageEventType,
    date: DateTime<Utc>,
) -> Condition {
    Condition::all()
        .add(voyage_event::Column::VoyageId.eq(voyage_id))
        .add(voyage_event::Column::PortId.eq(port_id))
        .add(voyage_event::Column::EventType.eq(event_type))
        .add(voyage_event::Column::Date.eq(date))
}

fn describe(
    voyage_id: i32,
    port_id: i32,
    event_type: VoyageEventType,
    date: DateTime<Utc>,
) -> String {
    format!(
        "{event_type} at port {port_id} on {} for voyage {voyage_id}",
        date.to_rfc3339()
    )
}

/// Events of the given voyages with their ports, grouped by voyage.
pub(crate) async fn events_for<C: ConnectionTrait>(
    conn: &C,
    voyage_ids: Vec<i32>,
) -> Result<HashMap<i32, Vec<VoyageEventDetails>>, DbErr> {
    if voyage_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = ordered::<voyage_event::Entity, _>(
        voyage_event::Entity::find()
            .filter(voyage_event::Column::VoyageId.is_in(voyage_ids))
            .find_also_related(port::Entity),
    )
    .all(conn)
    .await?;

    let mut events: HashMap<i32, Vec<VoyageEventDetails>> = HashMap::new();
    for (event, port) in rows {
        events
            .entry(event.voyage_id)
            .or_default()
            .push(VoyageEventDetails { event, port });
    }
    Ok(events)
}

pub struct VoyageEventManager<'a, C> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait + TransactionTrait> VoyageEventManager<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    pub async fn get_one(
        &self,
        filter: impl IntoCondition,
    ) -> Result<Option<VoyageEventDetails>, RecorderError> {
        Ok(self.list(filter, 1, 1).await?.into_iter().next())
    }

    pub async fn list(
        &self,
        filter: impl IntoCondition,
        page: u64,
        size: u64,
    ) -> Result<Vec<VoyageEventDetails>, RecorderError> {
        let rows = Store::<C, voyage_event::Entity>::new(self.conn)
            .list_with::<port::Entity>(filter, page, size)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(event, port)| VoyageEventDetails { event, port })
            .collect())
    }

    #[instrument(skip(self))]
    pub async fn add(
        &self,
        voyage_id: i32,
        event_type: VoyageEventType,
        port_id: i32,
        date: DateTime<Utc>,
    ) -> Result<VoyageEventDetails, RecorderError> {
        let date = date.trunc_subsecs(6);
        let key = describe(voyage_id, port_id, event_type, date);
        debug!(%key, "Adding voyage event");

        let store = Store::<C, voyage_event::Entity>::new(self.conn);
        store
            .ensure_unique(natural_key(voyage_id, port_id, event_type, date), &key, None)
            .await?;

        let model = voyage_event::ActiveModel {
            voyage_id: Set(voyage_id),
            port_id: Set(port_id),
            event_type: Set(event_type),
            date: Set(date),
            ..Default::default()
        };
        let event = store.insert(model, &key).await?;
        let port = Store::<C, port::Entity>::new(self.conn)
            .find(event.port_id)
            .await?;

        debug!(id = event.id, "Added voyage event");
        Ok(VoyageEventDetails { event, port })
    }

    /// Return the matching event, adding it first if necessary.
    pub async fn add_if_not_exists(
        &self,
        voyage_id: i32,
        event_type: VoyageEventType,
        port_id: i32,
        date: DateTime<Utc>,
    ) -> Result<VoyageEventDetails, RecorderError> {
        let key = natural_key(voyage_id, port_id, event_type, date.trunc_subsecs(6));
        match self.get_one(key).await? {
            Some(existing) => Ok(existing),
            None => self.add(voyage_id, event_type, port_id, date).await,
        }
    }

    /// Replace every field of an event, including the voyage it belongs to.
    #[instrument(skip(self))]
    pub async fn update(
        &self,
        id: i32,
        voyage_id: i32,
        event_type: VoyageEventType,
        port_id: i32,
        date: DateTime<Utc>,
    ) -> Result<VoyageEventDetails, RecorderError> {
        let txn = self.conn.begin().await?;
        let store = Store::<_, voyage_event::Entity>::new(&txn);
        let existing = store.require(id).await?;

        let date = date.trunc_subsecs(6);
        let key = describe(voyage_id, port_id, event_type, date);
        debug!(%key, "Updating voyage event");
        store
            .ensure_unique(natural_key(voyage_id, port_id, event_type, date), &key, Some(id))
            .await?;

        let mut active: voyage_event::ActiveModel = existing.into();
        active.voyage_id = Set(voyage_id);
        active.event_type = Set(event_type);
        active.port_id = Set(port_id);
        active.date = Set(date);
        let event = store.update(active, &key).await?;
        let port = Store::<_, port::Entity>::new(&txn)
            .find(event.port_id)
            .await?;
        txn.commit().await?;

        debug!("Updated voyage event");
        Ok(VoyageEventDetails { event, port })
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), RecorderError> {
        debug!("Deleting voyage event");
        Store::<C, voyage_event::Entity>::new(self.conn)
            .remove(id)
            .await?;
        debug!("Deleted voyage event");
        Ok(())
    }
}

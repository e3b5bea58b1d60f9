//! Reference entities identified by a single title-cased name.

use std::marker::PhantomData;

use common::title_case;
use sea_orm::sea_query::IntoCondition;
use sea_orm::*;
use tracing::{debug, instrument};

use super::{Record, Store};
use crate::entity::{location, operator, vessel_type};
use crate::error::{EntityKind, RecorderError};

/// A [`Record`] whose natural key is one unique `name` column.
pub trait NamedRecord: Record {
    type Active: ActiveModelTrait<Entity = Self>
        + ActiveModelBehavior
        + From<Self::Model>
        + Send
        + 'static;

    fn name_column() -> Self::Column;
}

macro_rules! named_record {
    ($module:ident, $kind:expr) => {
        impl Record for $module::Entity {
            const KIND: EntityKind = $kind;

            fn id_column() -> $module::Column {
                $module::Column::Id
            }

            fn id_of(model: &$module::Model) -> i32 {
                model.id
            }

            fn sort_keys() -> Vec<($module::Column, Order)> {
                vec![($module::Column::Name, Order::Asc)]
            }
        }

        impl NamedRecord for $module::Entity {
            type Active = $module::ActiveModel;

            fn name_column() -> $module::Column {
                $module::Column::Name
            }
        }
    };
}

named_record!(location, EntityKind::Location);
named_record!(operator, EntityKind::Operator);
named_record!(vessel_type, EntityKind::VesselType);

pub type LocationManager<'a, C> = NamedManager<'a, C, location::Entity>;
pub type OperatorManager<'a, C> = NamedManager<'a, C, operator::Entity>;
pub type VesselTypeManager<'a, C> = NamedManager<'a, C, vessel_type::Entity>;

/// Lifecycle of a [`NamedRecord`]: names are title-cased and unique.
pub struct NamedManager<'a, C, E> {
    conn: &'a C,
    entity: PhantomData<E>,
}

impl<'a, C, E> NamedManager<'a, C, E>
where
    C: ConnectionTrait + TransactionTrait,
    E: NamedRecord,
    E::Model: IntoActiveModel<E::Active>,
{
    pub fn new(conn: &'a C) -> Self {
        Self {
            conn,
            entity: PhantomData,
        }
    }

    pub async fn get_one(
        &self,
        filter: impl IntoCondition,
    ) -> Result<Option<E::Model>, RecorderError> {
        Ok(Store::<C, E>::new(self.conn).get_one(filter).await?)
    }

    pub async fn list(
        &self,
        filter: impl IntoCondition,
        page: u64,
        size: u64,
    ) -> Result<Vec<E::Model>, RecorderError> {
        Ok(Store::<C, E>::new(self.conn).list(filter, page, size).await?)
    }

    #[instrument(skip(self), fields(entity = %E::KIND))]
    pub async fn add(&self, name: &str) -> Result<E::Model, RecorderError> {
        let name = title_case(name);
        debug!(%name, "Adding {}", E::KIND);

        let store = Store::<C, E>::new(self.conn);
        store
            .ensure_unique(E::name_column().eq(name.as_str()), &name, None)
            .await?;

        let mut active = <E::Active as ActiveModelBehavior>::new();
        active.set(E::name_column(), name.clone().into());
        let model = store.insert(active, &name).await?;

        debug!(id = E::id_of(&model), "Added {}", E::KIND);
        Ok(model)
    }

    /// Return the row with this name, adding it first if necessary.
    pub async fn add_if_not_exists(&self, name: &str) -> Result<E::Model, RecorderError> {
        let key = title_case(name);
        match self.get_one(E::name_column().eq(key.as_str())).await? {
            Some(existing) => Ok(existing),
            None => self.add(name).await,
        }
    }

    #[instrument(skip(self), fields(entity = %E::KIND))]
    pub async fn update(&self, id: i32, name: &str) -> Result<E::Model, RecorderError> {
        let txn = self.conn.begin().await?;
        let store = Store::<_, E>::new(&txn);
        let existing = store.require(id).await?;

        let name = title_case(name);
        debug!(%name, "Updating {}", E::KIND);
        store
            .ensure_unique(E::name_column().eq(name.as_str()), &name, Some(id))
            .await?;

        let mut active: E::Active = existing.into();
        active.set(E::name_column(), name.clone().into());
        let model = store.update(active, &name).await?;
        txn.commit().await?;

        debug!("Updated {}", E::KIND);
        Ok(model)
    }

    #[instrument(skip(self), fields(entity = %E::KIND))]
    pub async fn delete(&self, id: i32) -> Result<(), RecorderError> {
        debug!("Deleting {}", E::KIND);
        Store::<C, E>::new(self.conn).remove(id).await?;
        debug!("Deleted {}", E::KIND);
        Ok(())
    }
}

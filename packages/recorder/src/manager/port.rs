use common::validation::validate_alphanumeric;
use common::{clean, clean_code};
use sea_orm::sea_query::IntoCondition;
use sea_orm::*;
use serde::Serialize;
use tracing::{debug, instrument};

use super::{Record, Store};
use crate::entity::{country, port};
use crate::error::{EntityKind, Field, RecorderError};

impl Record for port::Entity {
    const KIND: EntityKind = EntityKind::Port;

    fn id_column() -> port::Column {
        port::Column::Id
    }

    fn id_of(model: &port::Model) -> i32 {
        model.id
    }

    fn sort_keys() -> Vec<(port::Column, Order)> {
        vec![(port::Column::Name, Order::Asc)]
    }
}

/// A port together with the country it belongs to.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PortDetails {
    pub port: port::Model,
    pub country: Option<country::Model>,
}

/// UN/LOCODEs are five alphanumeric characters: country, then location.
fn normalize_code(code: &str) -> Result<String, RecorderError> {
    let code = clean_code(code);
    validate_alphanumeric(&code, 5, 5).map_err(|source| RecorderError::InvalidFormat {
        field: Field::PortCode,
        source,
    })?;
    Ok(code)
}

pub struct PortManager<'a, C> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait + TransactionTrait> PortManager<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    pub async fn get_one(
        &self,
        filter: impl IntoCondition,
    ) -> Result<Option<PortDetails>, RecorderError> {
        Ok(self.list(filter, 1, 1).await?.into_iter().next())
    }

    pub async fn list(
        &self,
        filter: impl IntoCondition,
        page: u64,
        size: u64,
    ) -> Result<Vec<PortDetails>, RecorderError> {
        let rows = Store::<C, port::Entity>::new(self.conn)
            .list_with::<country::Entity>(filter, page, size)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(port, country)| PortDetails { port, country })
            .collect())
    }

    #[instrument(skip(self))]
    pub async fn add(
        &self,
        country_id: i32,
        code: &str,
        name: &str,
    ) -> Result<PortDetails, RecorderError> {
        let code = normalize_code(code)?;
        let name = clean(name);
        debug!(%code, %name, "Adding port");

        let store = Store::<C, port::Entity>::new(self.conn);
        store
            .ensure_unique(port::Column::Code.eq(code.as_str()), &code, None)
            .await?;

        let model = port::ActiveModel {
            country_id: Set(country_id),
            code: Set(code.clone()),
            name: Set(name),
            ..Default::default()
        };
        let port = store.insert(model, &code).await?;
        let country = Store::<C, country::Entity>::new(self.conn)
            .find(port.country_id)
            .await?;

        debug!(id = port.id, "Added port");
        Ok(PortDetails { port, country })
    }

    /// Return the port with this code, adding it first if necessary.
    pub async fn add_if_not_exists(
        &self,
        country_id: i32,
        code: &str,
        name: &str,
    ) -> Result<PortDetails, RecorderError> {
        let key = clean_code(code);
        match self.get_one(port::Column::Code.eq(key.as_str())).await? {
            Some(existing) => Ok(existing),
            None => self.add(country_id, code, name).await,
        }
    }

    #[instrument(skip(self))]
    pub async fn update(
        &self,
        id: i32,
        country_id: i32,
        code: &str,
        name: &str,
    ) -> Result<PortDetails, RecorderError> {
        let txn = self.conn.begin().await?;
        let store = Store::<_, port::Entity>::new(&txn);
        let existing = store.require(id).await?;

        let code = normalize_code(code)?;
        let name = clean(name);
        debug!(%code, %name, "Updating port");
        store
            .ensure_unique(port::Column::Code.eq(code.as_str()), &code, Some(id))
            .await?;

        let mut active: port::ActiveModel = existing.into();
        active.country_id = Set(country_id);
        active.code = Set(code.clone());
        active.name = Set(name);
        let port = store.update(active, &code).await?;
        let country = Store::<_, country::Entity>::new(&txn)
            .find(port.country_id)
            .await?;
        txn.commit().await?;

        debug!("Updated port");
        Ok(PortDetails { port, country })
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), RecorderError> {
        debug!("Deleting port");
        Store::<C, port::Entity>::new(self.conn).remove(id).await?;
        debug!("Deleted port");
        Ok(())
    }
}

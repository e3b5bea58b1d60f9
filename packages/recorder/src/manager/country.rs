use common::validation::validate_alpha;
use common::{clean, clean_code};
use sea_orm::sea_query::IntoCondition;
use sea_orm::*;
use tracing::{debug, instrument};

use super::{Record, Store};
use crate::entity::country;
use crate::error::{EntityKind, Field, RecorderError};

impl Record for country::Entity {
    const KIND: EntityKind = EntityKind::Country;

    fn id_column() -> country::Column {
        country::Column::Id
    }

    fn id_of(model: &country::Model) -> i32 {
        model.id
    }

    fn sort_keys() -> Vec<(country::Column, Order)> {
        vec![(country::Column::Name, Order::Asc)]
    }
}

/// Clean the code and name, then check the code is two letters.
fn normalize(code: &str, name: &str) -> Result<(String, String), RecorderError> {
    let code = clean_code(code);
    validate_alpha(&code, 2, 2).map_err(|source| RecorderError::InvalidFormat {
        field: Field::CountryCode,
        source,
    })?;
    Ok((code, clean(name)))
}

pub struct CountryManager<'a, C> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait + TransactionTrait> CountryManager<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    pub async fn get_one(
        &self,
        filter: impl IntoCondition,
    ) -> Result<Option<country::Model>, RecorderError> {
        Ok(Store::<C, country::Entity>::new(self.conn).get_one(filter).await?)
    }

    pub async fn list(
        &self,
        filter: impl IntoCondition,
        page: u64,
        size: u64,
    ) -> Result<Vec<country::Model>, RecorderError> {
        Ok(Store::<C, country::Entity>::new(self.conn)
            .list(filter, page, size)
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn add(&self, code: &str, name: &str) -> Result<country::Model, RecorderError> {
        let (code, name) = normalize(code, name)?;
        debug!(%code, %name, "Adding country");

        let store = Store::<C, country::Entity>::new(self.conn);
        store
            .ensure_unique(country::Column::Code.eq(code.as_str()), &code, None)
            .await?;
        store
            .ensure_unique(country::Column::Name.eq(name.as_str()), &name, None)
            .await?;

        let model = country::ActiveModel {
            code: Set(code.clone()),
            name: Set(name),
            ..Default::default()
        };
        let country = store.insert(model, &code).await?;

        debug!(id = country.id, "Added country");
        Ok(country)
    }

    /// Return the country with this code, adding it first if necessary.
    pub async fn add_if_not_exists(
        &self,
        code: &str,
        name: &str,
    ) -> Result<country::Model, RecorderError> {
        let key = clean_code(code);
        match self.get_one(country::Column::Code.eq(key.as_str())).await? {
            Some(existing) => Ok(existing),
            None => self.add(code, name).await,
        }
    }

    #[instrument(skip(self))]
    pub async fn update(
        &self,
        id: i32,
        code: &str,
        name: &str,
    ) -> Result<country::Model, RecorderError> {
        let txn = self.conn.begin().await?;
        let store = Store::<_, country::Entity>::new(&txn);
        let existing = store.require(id).await?;

        let (code, name) = normalize(code, name)?;
        debug!(%code, %name, "Updating country");
        store
            .ensure_unique(country::Column::Code.eq(code.as_str()), &code, Some(id))
            .await?;
        store
            .ensure_unique(country::Column::Name.eq(name.as_str()), &name, Some(id))
            .await?;

        let mut active: country::ActiveModel = existing.into();
        active.code = Set(code.clone());
        active.name = Set(name);
        let country = store.update(active, &code).await?;
        txn.commit().await?;

        debug!("Updated country");
        Ok(country)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), RecorderError> {
        debug!("Deleting country");
        Store::<C, country::Entity>::new(self.conn).remove(id).await?;
        debug!("Deleted country");
        Ok(())
    }
}

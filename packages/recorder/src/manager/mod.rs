//! Lifecycle managers for every recorded entity.
//!
//! The shared get/list/add/update/delete plumbing lives in [`Store`], which is
//! parameterized by a [`Record`] strategy implemented once per entity. The
//! per-entity managers layer normalization, validation and any extra
//! behaviour (registration versioning, voyage cascade) on top of it.

mod country;
mod named;
mod port;
mod registration;
mod sighting;
mod vessel;
mod voyage;
mod voyage_event;

use std::collections::HashMap;
use std::marker::PhantomData;

use sea_orm::sea_query::{IntoCondition, LockType};
use sea_orm::*;

use crate::error::{EntityKind, RecorderError};

pub use country::CountryManager;
pub use named::{LocationManager, NamedManager, NamedRecord, OperatorManager, VesselTypeManager};
pub use port::{PortDetails, PortManager};
pub use registration::{NewRegistration, RegistrationDetails, RegistrationManager};
pub use sighting::{SightingDetails, SightingManager};
pub use vessel::{NewVessel, VesselDetails, VesselManager};
pub use voyage::{VoyageDetails, VoyageManager};
pub use voyage_event::{VoyageEventDetails, VoyageEventManager};

/// Largest row count or offset storage accepts (a signed 64-bit integer).
const MAX_ROWS: u64 = i64::MAX as u64;

/// Per-entity strategy consumed by [`Store`].
pub trait Record: EntityTrait {
    const KIND: EntityKind;

    /// Surrogate key column.
    fn id_column() -> Self::Column;

    fn id_of(model: &Self::Model) -> i32;

    /// Default listing order. The surrogate key is always appended as the
    /// final tie-break.
    fn sort_keys() -> Vec<(Self::Column, Order)>;
}

/// Restrict a query to page `page` (1-based) of `size` rows.
///
/// Page 0 is treated as page 1. A size beyond what storage can represent is
/// clamped to the largest limit it accepts, which means "all remaining rows".
pub(crate) fn page_window<Q: QuerySelect>(query: Q, page: u64, size: u64) -> Q {
    let offset = Ord::min(page.saturating_sub(1).saturating_mul(size), MAX_ROWS);
    query.offset(offset).limit(Ord::min(size, MAX_ROWS))
}

/// Apply the entity's sort keys followed by the surrogate key.
pub(crate) fn ordered<E: Record, Q: QueryOrder>(mut query: Q) -> Q {
    for (column, order) in E::sort_keys() {
        query = query.order_by(column, order);
    }
    query.order_by_asc(E::id_column())
}

/// Generic table access shared by all managers.
pub struct Store<'a, C, E> {
    conn: &'a C,
    entity: PhantomData<E>,
}

impl<'a, C: ConnectionTrait, E: Record> Store<'a, C, E> {
    pub fn new(conn: &'a C) -> Self {
        Self {
            conn,
            entity: PhantomData,
        }
    }

    /// One page of the rows matching `filter`, in the entity's listing order.
    pub async fn list(
        &self,
        filter: impl IntoCondition,
        page: u64,
        size: u64,
    ) -> Result<Vec<E::Model>, DbErr> {
        let query = ordered::<E, _>(E::find().filter(filter));
        page_window(query, page, size).all(self.conn).await
    }

    /// First row of `list(filter, 1, 1)`.
    pub async fn get_one(&self, filter: impl IntoCondition) -> Result<Option<E::Model>, DbErr> {
        Ok(self.list(filter, 1, 1).await?.into_iter().next())
    }

    /// Like [`Store::list`], with the row `R` each result refers to attached.
    pub async fn list_with<R>(
        &self,
        filter: impl IntoCondition,
        page: u64,
        size: u64,
    ) -> Result<Vec<(E::Model, Option<R::Model>)>, DbErr>
    where
        R: EntityTrait,
        E: Related<R>,
    {
        let query = ordered::<E, _>(E::find().filter(filter).find_also_related(R::default()));
        page_window(query, page, size).all(self.conn).await
    }

    pub async fn find(&self, id: i32) -> Result<Option<E::Model>, DbErr> {
        E::find()
            .filter(E::id_column().eq(id))
            .one(self.conn)
            .await
    }

    /// Rows with the given ids, keyed by id. Missing ids are skipped.
    pub async fn by_ids(
        &self,
        ids: impl IntoIterator<Item = i32>,
    ) -> Result<HashMap<i32, E::Model>, DbErr> {
        let ids: Vec<i32> = ids.into_iter().collect();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        Ok(E::find()
            .filter(E::id_column().is_in(ids))
            .all(self.conn)
            .await?
            .into_iter()
            .map(|m| (E::id_of(&m), m))
            .collect())
    }

    pub async fn require(&self, id: i32) -> Result<E::Model, RecorderError> {
        self.find(id).await?.ok_or(RecorderError::NotFound {
            entity: E::KIND,
            id,
        })
    }

    /// Fetch a row with a FOR UPDATE lock. Only meaningful inside a transaction.
    pub async fn require_for_update(&self, id: i32) -> Result<E::Model, RecorderError> {
        E::find()
            .filter(E::id_column().eq(id))
            .lock(LockType::Update)
            .one(self.conn)
            .await?
            .ok_or(RecorderError::NotFound {
                entity: E::KIND,
                id,
            })
    }

    /// Fail with [`RecorderError::Exists`] if any row other than `exclude`
    /// matches the natural-key condition `key`.
    pub async fn ensure_unique(
        &self,
        key: impl IntoCondition,
        display: &str,
        exclude: Option<i32>,
    ) -> Result<(), RecorderError> {
        let mut query = E::find().filter(key);
        if let Some(id) = exclude {
            query = query.filter(E::id_column().ne(id));
        }

        if query.one(self.conn).await?.is_some() {
            return Err(RecorderError::Exists {
                entity: E::KIND,
                key: display.to_string(),
            });
        }
        Ok(())
    }

    pub async fn insert<A>(&self, active: A, key: &str) -> Result<E::Model, RecorderError>
    where
        A: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send + 'static,
        E::Model: IntoActiveModel<A>,
    {
        active
            .insert(self.conn)
            .await
            .map_err(|e| RecorderError::on_write(e, E::KIND, key))
    }

    pub async fn update<A>(&self, active: A, key: &str) -> Result<E::Model, RecorderError>
    where
        A: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send + 'static,
        E::Model: IntoActiveModel<A>,
    {
        active
            .update(self.conn)
            .await
            .map_err(|e| RecorderError::on_write(e, E::KIND, key))
    }

    /// Delete the row with the given id. Rows still referenced by other
    /// records are rejected with [`RecorderError::InUse`].
    pub async fn remove(&self, id: i32) -> Result<(), RecorderError> {
        let result = E::delete_many()
            .filter(E::id_column().eq(id))
            .exec(self.conn)
            .await
            .map_err(|e| RecorderError::on_remove(e, E::KIND, id))?;

        if result.rows_affected == 0 {
            return Err(RecorderError::NotFound {
                entity: E::KIND,
                id,
            });
        }
        Ok(())
    }
}

/// Entry point handing out a manager per entity over one shared connection.
#[derive(Clone)]
pub struct Recorder {
    db: DatabaseConnection,
}

impl Recorder {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    pub fn countries(&self) -> CountryManager<'_, DatabaseConnection> {
        CountryManager::new(&self.db)
    }

    pub fn locations(&self) -> LocationManager<'_, DatabaseConnection> {
        LocationManager::new(&self.db)
    }

    pub fn operators(&self) -> OperatorManager<'_, DatabaseConnection> {
        OperatorManager::new(&self.db)
    }

    pub fn vessel_types(&self) -> VesselTypeManager<'_, DatabaseConnection> {
        VesselTypeManager::new(&self.db)
    }

    pub fn ports(&self) -> PortManager<'_, DatabaseConnection> {
        PortManager::new(&self.db)
    }

    pub fn vessels(&self) -> VesselManager<'_, DatabaseConnection> {
        VesselManager::new(&self.db)
    }

    pub fn registrations(&self) -> RegistrationManager<'_, DatabaseConnection> {
        RegistrationManager::new(&self.db)
    }

    pub fn voyages(&self) -> VoyageManager<'_, DatabaseConnection> {
        VoyageManager::new(&self.db)
    }

    pub fn voyage_events(&self) -> VoyageEventManager<'_, DatabaseConnection> {
        VoyageEventManager::new(&self.db)
    }

    pub fn sightings(&self) -> SightingManager<'_, DatabaseConnection> {
        SightingManager::new(&self.db)
    }
}

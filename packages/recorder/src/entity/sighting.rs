use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sighting")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub location_id: i32,
    #[sea_orm(belongs_to, from = "location_id", to = "id")]
    pub location: HasOne<super::location::Entity>,

    /// NULL when the sighting is not tied to a known voyage.
    pub voyage_id: Option<i32>,
    #[sea_orm(belongs_to, from = "voyage_id", to = "id")]
    pub voyage: HasOne<super::voyage::Entity>,

    pub vessel_id: i32,
    #[sea_orm(belongs_to, from = "vessel_id", to = "id")]
    pub vessel: HasOne<super::vessel::Entity>,

    pub date: DateTimeUtc,
    pub is_my_voyage: bool,
}

impl ActiveModelBehavior for ActiveModel {}

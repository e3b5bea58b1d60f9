use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One registration of a vessel. At most one row per vessel is active.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "registration_history")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub vessel_id: i32,
    #[sea_orm(belongs_to, from = "vessel_id", to = "id")]
    pub vessel: HasOne<super::vessel::Entity>,

    pub vessel_type_id: i32,
    #[sea_orm(belongs_to, from = "vessel_type_id", to = "id")]
    pub vessel_type: HasOne<super::vessel_type::Entity>,

    pub flag_id: i32,
    #[sea_orm(belongs_to, from = "flag_id", to = "id")]
    pub flag: HasOne<super::country::Entity>,

    pub operator_id: i32,
    #[sea_orm(belongs_to, from = "operator_id", to = "id")]
    pub operator: HasOne<super::operator::Entity>,

    pub name: String,
    pub callsign: String,
    pub mmsi: String,

    pub tonnage: Option<i32>,
    pub passengers: Option<i32>,
    pub crew: Option<i32>,
    pub decks: Option<i32>,
    pub cabins: Option<i32>,

    pub date: DateTimeUtc,
    pub is_active: bool,
}

impl ActiveModelBehavior for ActiveModel {}

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "vessel")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// IMO number when `is_imo`, otherwise some other unique identifier.
    #[sea_orm(unique)]
    pub identifier: String,
    pub is_imo: bool,

    pub built: Option<i32>,  // year
    pub draught: Option<f64>, // in metres
    pub length: Option<i32>, // in metres
    pub beam: Option<i32>,   // in metres

    #[sea_orm(has_many)]
    pub registrations: HasMany<super::registration_history::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}

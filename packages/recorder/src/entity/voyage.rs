use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "voyage")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub operator_id: i32,
    #[sea_orm(belongs_to, from = "operator_id", to = "id")]
    pub operator: HasOne<super::operator::Entity>,

    pub vessel_id: i32,
    #[sea_orm(belongs_to, from = "vessel_id", to = "id")]
    pub vessel: HasOne<super::vessel::Entity>,

    /// Not unique: operators may reuse voyage numbers.
    pub number: String,

    #[sea_orm(has_many)]
    pub events: HasMany<super::voyage_event::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}

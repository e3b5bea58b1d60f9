use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "port")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub country_id: i32,
    #[sea_orm(belongs_to, from = "country_id", to = "id")]
    pub country: HasOne<super::country::Entity>,

    /// UN/LOCODE, e.g. "GBSOU".
    #[sea_orm(unique)]
    pub code: String,
    pub name: String,
}

impl ActiveModelBehavior for ActiveModel {}

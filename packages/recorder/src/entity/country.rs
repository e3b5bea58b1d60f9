use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "country")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// ISO 3166-1 alpha-2 code, e.g. "GB".
    #[sea_orm(unique)]
    pub code: String,
    #[sea_orm(unique)]
    pub name: String,

    #[sea_orm(has_many)]
    pub ports: HasMany<super::port::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}

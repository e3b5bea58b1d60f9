use common::VoyageEventType;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "voyage_event")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique_key = "voyage_port_event_date")]
    pub voyage_id: i32,
    #[sea_orm(belongs_to, from = "voyage_id", to = "id")]
    pub voyage: HasOne<super::voyage::Entity>,

    #[sea_orm(unique_key = "voyage_port_event_date")]
    pub port_id: i32,
    #[sea_orm(belongs_to, from = "port_id", to = "id")]
    pub port: HasOne<super::port::Entity>,

    #[sea_orm(unique_key = "voyage_port_event_date")]
    pub event_type: VoyageEventType,
    #[sea_orm(unique_key = "voyage_port_event_date")]
    pub date: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}

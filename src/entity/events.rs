//! 活动实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "events")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    pub search_key: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub start_time: i64,
    pub end_time: i64,
    pub class_id: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::classes::Entity",
        from = "Column::ClassId",
        to = "super::classes::Column::Id"
    )]
    Class,
}

impl Related<super::classes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Class.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_event(self) -> crate::models::events::entities::Event {
        use chrono::{DateTime, Utc};

        crate::models::events::entities::Event {
            id: self.id,
            title: self.title,
            description: self.description,
            start_time: DateTime::<Utc>::from_timestamp(self.start_time, 0).unwrap_or_default(),
            end_time: DateTime::<Utc>::from_timestamp(self.end_time, 0).unwrap_or_default(),
            class_id: self.class_id,
        }
    }
}

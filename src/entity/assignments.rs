//! 作业实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "assignments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    pub search_key: String,
    pub start_date: i64,
    pub due_date: i64,
    pub lesson_id: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::lessons::Entity",
        from = "Column::LessonId",
        to = "super::lessons::Column::Id"
    )]
    Lesson,
    #[sea_orm(has_many = "super::results::Entity")]
    Results,
}

impl Related<super::lessons::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Lesson.def()
    }
}

impl Related<super::results::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Results.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_assignment(self) -> crate::models::assignments::entities::Assignment {
        use chrono::{DateTime, Utc};

        crate::models::assignments::entities::Assignment {
            id: self.id,
            title: self.title,
            start_date: DateTime::<Utc>::from_timestamp(self.start_date, 0).unwrap_or_default(),
            due_date: DateTime::<Utc>::from_timestamp(self.due_date, 0).unwrap_or_default(),
            lesson_id: self.lesson_id,
        }
    }
}

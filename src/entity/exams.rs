//! 考试实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "exams")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    pub search_key: String,
    pub start_time: i64,
    pub end_time: i64,
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
    pub fn into_exam(self) -> crate::models::exams::entities::Exam {
        use chrono::{DateTime, Utc};

        crate::models::exams::entities::Exam {
            id: self.id,
            title: self.title,
            start_time: DateTime::<Utc>::from_timestamp(self.start_time, 0).unwrap_or_default(),
            end_time: DateTime::<Utc>::from_timestamp(self.end_time, 0).unwrap_or_default(),
            lesson_id: self.lesson_id,
        }
    }
}

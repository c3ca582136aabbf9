//! 考勤实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "attendances")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub date: i64,
    pub present: bool,
    pub student_id: String,
    pub lesson_id: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::students::Entity",
        from = "Column::StudentId",
        to = "super::students::Column::Id"
    )]
    Student,
    #[sea_orm(
        belongs_to = "super::lessons::Entity",
        from = "Column::LessonId",
        to = "super::lessons::Column::Id"
    )]
    Lesson,
}

impl Related<super::students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::lessons::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Lesson.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_attendance(self) -> crate::models::attendance::entities::Attendance {
        use chrono::{DateTime, Utc};

        crate::models::attendance::entities::Attendance {
            id: self.id,
            date: DateTime::<Utc>::from_timestamp(self.date, 0).unwrap_or_default(),
            present: self.present,
            student_id: self.student_id,
            lesson_id: self.lesson_id,
        }
    }
}

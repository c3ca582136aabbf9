//! 课程实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "lessons")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub search_key: String,
    pub day: String,
    pub start_time: i64,
    pub end_time: i64,
    pub subject_id: i64,
    pub class_id: i64,
    pub teacher_id: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::subjects::Entity",
        from = "Column::SubjectId",
        to = "super::subjects::Column::Id"
    )]
    Subject,
    #[sea_orm(
        belongs_to = "super::classes::Entity",
        from = "Column::ClassId",
        to = "super::classes::Column::Id"
    )]
    Class,
    #[sea_orm(
        belongs_to = "super::teachers::Entity",
        from = "Column::TeacherId",
        to = "super::teachers::Column::Id"
    )]
    Teacher,
    #[sea_orm(has_many = "super::exams::Entity")]
    Exams,
    #[sea_orm(has_many = "super::assignments::Entity")]
    Assignments,
    #[sea_orm(has_many = "super::attendances::Entity")]
    Attendances,
}

impl Related<super::subjects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subject.def()
    }
}

impl Related<super::classes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Class.def()
    }
}

impl Related<super::teachers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Teacher.def()
    }
}

impl Related<super::exams::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Exams.def()
    }
}

impl Related<super::assignments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignments.def()
    }
}

impl Related<super::attendances::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attendances.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_lesson(self) -> crate::models::lessons::entities::Lesson {
        use crate::models::lessons::entities::Lesson;
        use chrono::{DateTime, Utc};

        Lesson {
            id: self.id,
            name: self.name,
            day: self.day.parse().unwrap_or_default(),
            start_time: DateTime::<Utc>::from_timestamp(self.start_time, 0).unwrap_or_default(),
            end_time: DateTime::<Utc>::from_timestamp(self.end_time, 0).unwrap_or_default(),
            subject_id: self.subject_id,
            class_id: self.class_id,
            teacher_id: self.teacher_id,
        }
    }
}

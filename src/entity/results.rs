//! 成绩实体
//!
//! exam_id 与 assignment_id 有且仅有一个非空。

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "results")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub score: i32,
    pub exam_id: Option<i64>,
    pub assignment_id: Option<i64>,
    pub student_id: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::exams::Entity",
        from = "Column::ExamId",
        to = "super::exams::Column::Id"
    )]
    Exam,
    #[sea_orm(
        belongs_to = "super::assignments::Entity",
        from = "Column::AssignmentId",
        to = "super::assignments::Column::Id"
    )]
    Assignment,
    #[sea_orm(
        belongs_to = "super::students::Entity",
        from = "Column::StudentId",
        to = "super::students::Column::Id"
    )]
    Student,
}

impl Related<super::exams::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Exam.def()
    }
}

impl Related<super::assignments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignment.def()
    }
}

impl Related<super::students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_result(self) -> crate::models::results::entities::ExamResult {
        crate::models::results::entities::ExamResult {
            id: self.id,
            score: self.score,
            exam_id: self.exam_id,
            assignment_id: self.assignment_id,
            student_id: self.student_id,
        }
    }
}

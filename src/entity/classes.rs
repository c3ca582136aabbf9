//! 班级实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "classes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub name: String,
    #[sea_orm(unique)]
    pub search_key: String,
    pub capacity: i32,
    pub supervisor_id: Option<String>,
    pub grade_id: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::teachers::Entity",
        from = "Column::SupervisorId",
        to = "super::teachers::Column::Id"
    )]
    Supervisor,
    #[sea_orm(
        belongs_to = "super::grades::Entity",
        from = "Column::GradeId",
        to = "super::grades::Column::Id"
    )]
    Grade,
    #[sea_orm(has_many = "super::students::Entity")]
    Students,
    #[sea_orm(has_many = "super::lessons::Entity")]
    Lessons,
}

impl Related<super::teachers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Supervisor.def()
    }
}

impl Related<super::grades::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Grade.def()
    }
}

impl Related<super::students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Students.def()
    }
}

impl Related<super::lessons::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Lessons.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_class(self) -> crate::models::classes::entities::Class {
        crate::models::classes::entities::Class {
            id: self.id,
            name: self.name,
            capacity: self.capacity,
            supervisor_id: self.supervisor_id,
            grade_id: self.grade_id,
        }
    }
}

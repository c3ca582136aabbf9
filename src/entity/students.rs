//! 学生实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "students")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub username: String,
    pub name: String,
    pub surname: String,
    pub search_key: String,
    #[sea_orm(unique)]
    pub email: Option<String>,
    #[sea_orm(unique)]
    pub phone: Option<String>,
    pub address: String,
    pub img: Option<String>,
    pub blood_type: String,
    pub sex: String,
    pub birthday: i64,
    pub parent_id: String,
    pub class_id: i64,
    pub grade_id: i64,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::parents::Entity",
        from = "Column::ParentId",
        to = "super::parents::Column::Id"
    )]
    Parent,
    #[sea_orm(
        belongs_to = "super::classes::Entity",
        from = "Column::ClassId",
        to = "super::classes::Column::Id"
    )]
    Class,
    #[sea_orm(
        belongs_to = "super::grades::Entity",
        from = "Column::GradeId",
        to = "super::grades::Column::Id"
    )]
    Grade,
    #[sea_orm(has_many = "super::results::Entity")]
    Results,
    #[sea_orm(has_many = "super::attendances::Entity")]
    Attendances,
}

impl Related<super::parents::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Parent.def()
    }
}

impl Related<super::classes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Class.def()
    }
}

impl Related<super::grades::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Grade.def()
    }
}

impl Related<super::results::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Results.def()
    }
}

impl Related<super::attendances::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attendances.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_student(self) -> crate::models::students::entities::Student {
        use crate::models::students::entities::Student;
        use chrono::{DateTime, Utc};

        Student {
            id: self.id,
            username: self.username,
            name: self.name,
            surname: self.surname,
            email: self.email,
            phone: self.phone,
            address: self.address,
            img: self.img,
            blood_type: self.blood_type,
            sex: self.sex.parse().unwrap_or_default(),
            birthday: DateTime::<Utc>::from_timestamp(self.birthday, 0).unwrap_or_default(),
            parent_id: self.parent_id,
            class_id: self.class_id,
            grade_id: self.grade_id,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.surname)
    }
}

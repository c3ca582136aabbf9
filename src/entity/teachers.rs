//! 教师实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "teachers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub username: String,
    pub name: String,
    pub surname: String,
    /// 小写折叠后的检索键
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
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::lessons::Entity")]
    Lessons,
    #[sea_orm(has_many = "super::classes::Entity")]
    Classes,
    #[sea_orm(has_many = "super::teacher_subjects::Entity")]
    TeacherSubjects,
}

impl Related<super::lessons::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Lessons.def()
    }
}

impl Related<super::classes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Classes.def()
    }
}

impl Related<super::subjects::Entity> for Entity {
    fn to() -> RelationDef {
        super::teacher_subjects::Relation::Subject.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::teacher_subjects::Relation::Teacher.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_teacher(self) -> crate::models::teachers::entities::Teacher {
        use crate::models::teachers::entities::Teacher;
        use chrono::{DateTime, Utc};

        Teacher {
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
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.surname)
    }
}

//! 学生存储操作

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseTransaction, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Select, Set,
};

use super::listing::{Listing, index_by};
use super::{PersonKeys, SeaOrmStorage, person_conflict, read_err, to_timestamp, write_err};
use crate::entity::prelude::*;
use crate::entity::{classes, grades, lessons, students};
use crate::errors::Result;
use crate::models::students::{
    entities::Student,
    requests::StudentInput,
    responses::{StudentDetail, StudentRow},
};
use crate::storage::{PersonClaim, UniqueField};

pub(crate) struct StudentListing;

#[async_trait]
impl Listing for StudentListing {
    type Entity = Students;
    type Row = StudentRow;
    const WHAT: &'static str = "学生";

    fn order(select: Select<Students>) -> Select<Students> {
        select
            .order_by_asc(students::Column::Name)
            .order_by_asc(students::Column::Id)
    }

    async fn project(txn: &DatabaseTransaction, models: Vec<StudentModel>) -> Result<Vec<StudentRow>> {
        let class_ids = models.iter().map(|m| m.class_id).collect();
        let grade_ids = models.iter().map(|m| m.grade_id).collect();
        let classes = index_by::<Classes, _, _, _>(txn, classes::Column::Id, class_ids, |c| c.id).await?;
        let grades = index_by::<Grades, _, _, _>(txn, grades::Column::Id, grade_ids, |g| g.id).await?;

        Ok(models
            .into_iter()
            .map(|m| StudentRow {
                class_name: classes.get(&m.class_id).map(|c| c.name.clone()).unwrap_or_default(),
                grade_level: grades.get(&m.grade_id).map(|g| g.level),
                id: m.id,
                username: m.username,
                name: m.name,
                surname: m.surname,
                phone: m.phone,
                address: m.address,
                img: m.img,
            })
            .collect())
    }
}

impl SeaOrmStorage {
    /// 学生详情（附班级、家长、年级和班级课程数）
    pub async fn get_student_detail_impl(
        &self,
        id: &str,
        scope: Condition,
    ) -> Result<Option<StudentDetail>> {
        let Some(model) = Students::find_by_id(id)
            .filter(scope)
            .one(&self.db)
            .await
            .map_err(|e| read_err("查询学生失败", e))?
        else {
            return Ok(None);
        };

        let class = Classes::find_by_id(model.class_id)
            .one(&self.db)
            .await
            .map_err(|e| read_err("查询班级失败", e))?;
        let parent = Parents::find_by_id(model.parent_id.clone())
            .one(&self.db)
            .await
            .map_err(|e| read_err("查询家长失败", e))?;
        let grade = Grades::find_by_id(model.grade_id)
            .one(&self.db)
            .await
            .map_err(|e| read_err("查询年级失败", e))?;
        let lesson_count = Lessons::find()
            .filter(lessons::Column::ClassId.eq(model.class_id))
            .count(&self.db)
            .await
            .map_err(|e| read_err("统计班级课程失败", e))?;

        Ok(Some(StudentDetail {
            class_name: class.map(|c| c.name).unwrap_or_default(),
            parent_name: parent.map(|p| format!("{} {}", p.name, p.surname)).unwrap_or_default(),
            grade_level: grade.map(|g| g.level),
            lesson_count: lesson_count as i64,
            student: model.into_student(),
        }))
    }

    pub async fn find_student_conflict_impl(
        &self,
        claim: PersonClaim<'_>,
        exclude_id: Option<&str>,
    ) -> Result<Option<UniqueField>> {
        let keys = PersonKeys {
            id: students::Column::Id,
            username: students::Column::Username,
            email: students::Column::Email,
            phone: students::Column::Phone,
        };
        person_conflict::<Students>(&self.db, keys, claim, exclude_id).await
    }

    /// 创建学生
    pub async fn create_student_impl(&self, id: String, input: StudentInput) -> Result<Student> {
        let model = StudentActiveModel {
            id: Set(id),
            username: Set(input.profile.username()),
            name: Set(input.profile.name.trim().to_string()),
            surname: Set(input.profile.surname.trim().to_string()),
            search_key: Set(input.profile.search_key()),
            email: Set(input.profile.email()),
            phone: Set(input.profile.phone()),
            address: Set(input.profile.address.trim().to_string()),
            img: Set(input.img),
            blood_type: Set(input.blood_type.trim().to_string()),
            sex: Set(input.sex.to_string()),
            birthday: Set(to_timestamp(input.birthday)),
            parent_id: Set(input.parent_id.trim().to_string()),
            class_id: Set(input.class_id),
            grade_id: Set(input.grade_id),
            created_at: Set(chrono::Utc::now().timestamp()),
        }
        .insert(&self.db)
        .await
        .map_err(|e| write_err("创建学生失败", e))?;

        Ok(model.into_student())
    }

    /// 更新学生
    pub async fn update_student_impl(
        &self,
        id: &str,
        input: StudentInput,
    ) -> Result<Option<Student>> {
        let Some(existing) = Students::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| read_err("查询学生失败", e))?
        else {
            return Ok(None);
        };

        let mut model: StudentActiveModel = existing.into();
        model.username = Set(input.profile.username());
        model.name = Set(input.profile.name.trim().to_string());
        model.surname = Set(input.profile.surname.trim().to_string());
        model.search_key = Set(input.profile.search_key());
        model.email = Set(input.profile.email());
        model.phone = Set(input.profile.phone());
        model.address = Set(input.profile.address.trim().to_string());
        model.img = Set(input.img);
        model.blood_type = Set(input.blood_type.trim().to_string());
        model.sex = Set(input.sex.to_string());
        model.birthday = Set(to_timestamp(input.birthday));
        model.parent_id = Set(input.parent_id.trim().to_string());
        model.class_id = Set(input.class_id);
        model.grade_id = Set(input.grade_id);

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| write_err("更新学生失败", e))?;

        Ok(Some(updated.into_student()))
    }

    /// 删除学生，成绩与考勤随之级联删除
    pub async fn delete_student_impl(&self, id: &str) -> Result<bool> {
        let result = Students::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| write_err("删除学生失败", e))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{insert_student, memory_storage, seed_school};
    use crate::filters::{
        self,
        test_support::{admin, parent, student, teacher},
    };
    use crate::models::students::requests::{StudentInput, StudentListParams};
    use crate::models::users::entities::{Sex, Viewer};
    use crate::models::users::requests::ProfileInput;
    use crate::storage::Storage;

    fn input(parent_id: &str, class_id: i64, grade_id: i64) -> StudentInput {
        StudentInput {
            id: None,
            profile: ProfileInput {
                username: "new_kid".to_string(),
                name: "Nora".to_string(),
                surname: "Kid".to_string(),
                email: Some("  ".to_string()),
                phone: None,
                address: "4 Elm St".to_string(),
            },
            img: None,
            blood_type: "AB".to_string(),
            sex: Sex::Female,
            birthday: chrono::DateTime::from_timestamp(1_000_000_000, 0).unwrap(),
            parent_id: parent_id.to_string(),
            class_id,
            grade_id,
        }
    }

    async fn visible_ids(storage: &super::SeaOrmStorage, viewer: &Viewer) -> Vec<String> {
        let cond = filters::student_condition(viewer, &StudentListParams::default());
        storage
            .list_students(cond, 1, 50)
            .await
            .unwrap()
            .items
            .into_iter()
            .map(|s| s.id)
            .collect()
    }

    #[tokio::test]
    async fn test_role_scope() {
        let storage = memory_storage().await;
        let school = seed_school(&storage.db).await;
        // student_1 的同班同学
        insert_student(&storage.db, "student_3", "Tim", "parent_2", school.class_a, school.grade).await;

        assert_eq!(visible_ids(&storage, &admin()).await.len(), 3);
        assert_eq!(visible_ids(&storage, &teacher()).await, vec!["student_1", "student_3"]);
        assert_eq!(visible_ids(&storage, &student()).await, vec!["student_1", "student_3"]);
        assert_eq!(visible_ids(&storage, &parent()).await, vec!["student_1"]);
    }

    #[tokio::test]
    async fn test_row_projection() {
        let storage = memory_storage().await;
        seed_school(&storage.db).await;

        let page = storage
            .list_students(filters::student_condition(&admin(), &StudentListParams::default()), 1, 10)
            .await
            .unwrap();
        let sam = &page.items[0];
        assert_eq!(sam.class_name, "1A");
        assert_eq!(sam.grade_level, Some(1));
    }

    #[tokio::test]
    async fn test_detail_respects_scope() {
        let storage = memory_storage().await;
        seed_school(&storage.db).await;

        let own = filters::student_condition(&parent(), &StudentListParams::default());
        let detail = storage
            .get_student_detail("student_1", own.clone())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(detail.class_name, "1A");
        assert_eq!(detail.parent_name, "Paula Parent");
        assert_eq!(detail.lesson_count, 1);

        assert!(storage.get_student_detail("student_2", own).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_in_scope() {
        let storage = memory_storage().await;
        seed_school(&storage.db).await;

        let scope = || filters::student_condition(&teacher(), &StudentListParams::default());
        assert!(storage.student_in_scope("student_1", scope()).await.unwrap());
        assert!(!storage.student_in_scope("student_2", scope()).await.unwrap());
    }

    #[tokio::test]
    async fn test_create_update_delete() {
        let storage = memory_storage().await;
        let school = seed_school(&storage.db).await;

        let created = storage
            .create_student("kid_1".to_string(), input("parent_1", school.class_b, school.grade))
            .await
            .unwrap();
        assert_eq!(created.email, None);
        assert_eq!(created.class_id, school.class_b);

        let updated = storage
            .update_student("kid_1", input("parent_2", school.class_a, school.grade))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.parent_id, "parent_2");
        assert_eq!(updated.class_id, school.class_a);

        assert!(storage.delete_student("kid_1").await.unwrap());
        assert!(!storage.delete_student("kid_1").await.unwrap());
    }

    #[tokio::test]
    async fn test_missing_class_is_rejected_by_foreign_key() {
        let storage = memory_storage().await;
        let school = seed_school(&storage.db).await;

        let result = storage
            .create_student("kid_2".to_string(), input("parent_1", 9_999, school.grade))
            .await;
        assert!(result.is_err());
    }
}

//! 班级存储操作

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Select, Set,
};

use super::listing::{Listing, index_by};
use super::{SeaOrmStorage, read_err, write_err};
use crate::entity::prelude::*;
use crate::entity::{classes, grades, students, teachers};
use crate::errors::Result;
use crate::utils::search_key;
use crate::models::classes::{entities::Class, requests::ClassInput, responses::ClassRow};

pub(crate) struct ClassListing;

#[async_trait]
impl Listing for ClassListing {
    type Entity = Classes;
    type Row = ClassRow;
    const WHAT: &'static str = "班级";

    fn order(select: Select<Classes>) -> Select<Classes> {
        select
            .order_by_asc(classes::Column::Name)
            .order_by_asc(classes::Column::Id)
    }

    async fn project(txn: &DatabaseTransaction, models: Vec<ClassModel>) -> Result<Vec<ClassRow>> {
        let grade_ids = models.iter().map(|m| m.grade_id).collect();
        let supervisor_ids = models.iter().filter_map(|m| m.supervisor_id.clone()).collect();
        let grades = index_by::<Grades, _, _, _>(txn, grades::Column::Id, grade_ids, |g| g.id).await?;
        let supervisors =
            index_by::<Teachers, _, _, _>(txn, teachers::Column::Id, supervisor_ids, |t| t.id.clone())
                .await?;

        Ok(models
            .into_iter()
            .map(|m| ClassRow {
                grade_level: grades.get(&m.grade_id).map(|g| g.level),
                supervisor_name: m
                    .supervisor_id
                    .as_ref()
                    .and_then(|id| supervisors.get(id))
                    .map(|t| t.full_name()),
                id: m.id,
                name: m.name,
                capacity: m.capacity,
                supervisor_id: m.supervisor_id,
            })
            .collect())
    }
}

impl SeaOrmStorage {
    /// 班级名称是否已被其他班级使用（按检索键比较，不区分大小写）
    pub async fn class_name_taken_impl(&self, name: &str, exclude_id: Option<i64>) -> Result<bool> {
        let mut select = Classes::find().filter(classes::Column::SearchKey.eq(search_key(&[name])));
        if let Some(id) = exclude_id {
            select = select.filter(classes::Column::Id.ne(id));
        }

        let count = select
            .count(&self.db)
            .await
            .map_err(|e| read_err("检查班级名称失败", e))?;
        Ok(count > 0)
    }

    /// 班级是否已满员，`exclude_student` 为正在更新的学生（不计入人数）
    pub async fn class_is_full_impl(
        &self,
        id: i64,
        exclude_student: Option<&str>,
    ) -> Result<bool> {
        let Some(class) = Classes::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| read_err("查询班级失败", e))?
        else {
            return Ok(false);
        };

        let mut select = Students::find().filter(students::Column::ClassId.eq(id));
        if let Some(student_id) = exclude_student {
            select = select.filter(students::Column::Id.ne(student_id));
        }
        let enrolled = select
            .count(&self.db)
            .await
            .map_err(|e| read_err("统计班级人数失败", e))?;
        Ok(enrolled >= class.capacity.max(0) as u64)
    }

    /// 创建班级
    pub async fn create_class_impl(&self, input: ClassInput) -> Result<Class> {
        let model = ClassActiveModel {
            name: Set(input.name.trim().to_string()),
            search_key: Set(search_key(&[input.name.as_str()])),
            capacity: Set(input.capacity),
            supervisor_id: Set(input.supervisor_id()),
            grade_id: Set(input.grade_id),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| write_err("创建班级失败", e))?;

        Ok(model.into_class())
    }

    /// 更新班级
    pub async fn update_class_impl(&self, id: i64, input: ClassInput) -> Result<Option<Class>> {
        let Some(existing) = Classes::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| read_err("查询班级失败", e))?
        else {
            return Ok(None);
        };

        let mut model: ClassActiveModel = existing.into();
        model.name = Set(input.name.trim().to_string());
        model.search_key = Set(search_key(&[input.name.as_str()]));
        model.capacity = Set(input.capacity);
        model.supervisor_id = Set(input.supervisor_id());
        model.grade_id = Set(input.grade_id);

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| write_err("更新班级失败", e))?;

        Ok(Some(updated.into_class()))
    }

    /// 删除班级；仍有学生或课程时被外键拒绝
    pub async fn delete_class_impl(&self, id: i64) -> Result<bool> {
        let result = Classes::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| write_err("删除班级失败", e))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{insert_class, insert_student, memory_storage, seed_school};
    use crate::filters::{
        self,
        test_support::{admin, parent, student, teacher},
    };
    use crate::models::classes::requests::{ClassInput, ClassListParams};
    use crate::models::users::entities::Viewer;
    use crate::storage::Storage;

    fn input(name: &str, grade_id: i64) -> ClassInput {
        ClassInput {
            name: name.to_string(),
            capacity: 25,
            grade_id,
            supervisor_id: Some("teacher_2".to_string()),
        }
    }

    async fn visible_names(storage: &super::SeaOrmStorage, viewer: &Viewer) -> Vec<String> {
        let cond = filters::class_condition(viewer, &ClassListParams::default());
        storage
            .list_classes(cond, 1, 50)
            .await
            .unwrap()
            .items
            .into_iter()
            .map(|c| c.name)
            .collect()
    }

    #[tokio::test]
    async fn test_role_scope() {
        let storage = memory_storage().await;
        let school = seed_school(&storage.db).await;
        // teacher_1 只担任班主任、不授课的班级
        insert_class(&storage.db, "3C", school.grade, Some("teacher_1")).await;

        assert_eq!(visible_names(&storage, &admin()).await, vec!["1A", "2B", "3C"]);
        assert_eq!(visible_names(&storage, &teacher()).await, vec!["1A", "3C"]);
        assert_eq!(visible_names(&storage, &student()).await, vec!["1A"]);
        assert_eq!(visible_names(&storage, &parent()).await, vec!["1A"]);
    }

    #[tokio::test]
    async fn test_row_projection() {
        let storage = memory_storage().await;
        seed_school(&storage.db).await;

        let page = storage
            .list_classes(filters::class_condition(&admin(), &ClassListParams::default()), 1, 10)
            .await
            .unwrap();
        let first = &page.items[0];
        assert_eq!(first.grade_level, Some(1));
        assert_eq!(first.supervisor_name.as_deref(), Some("Ada Lovelace"));
    }

    #[tokio::test]
    async fn test_rename_to_own_name_is_allowed() {
        let storage = memory_storage().await;
        let school = seed_school(&storage.db).await;

        assert!(!storage.class_name_taken("1a", Some(school.class_a)).await.unwrap());
        assert!(storage.class_name_taken("2b", Some(school.class_a)).await.unwrap());
        assert!(storage.class_name_taken("2B", None).await.unwrap());

        let renamed = storage
            .update_class(school.class_a, input("1A", school.grade))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(renamed.supervisor_id.as_deref(), Some("teacher_2"));
    }

    #[tokio::test]
    async fn test_create_and_delete() {
        let storage = memory_storage().await;
        let school = seed_school(&storage.db).await;

        let created = storage.create_class(input("4D", school.grade)).await.unwrap();
        assert!(storage.class_exists(created.id).await.unwrap());
        assert!(storage.delete_class(created.id).await.unwrap());
        assert!(!storage.delete_class(created.id).await.unwrap());
        assert!(storage.update_class(created.id, input("4D", school.grade)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_class_with_students_cannot_be_deleted() {
        let storage = memory_storage().await;
        let school = seed_school(&storage.db).await;

        assert!(storage.delete_class(school.class_a).await.is_err());
    }

    #[tokio::test]
    async fn test_class_capacity() {
        let storage = memory_storage().await;
        let school = seed_school(&storage.db).await;

        let mut small = input("5E", school.grade);
        small.capacity = 1;
        let class = storage.create_class(small).await.unwrap();
        assert!(!storage.class_is_full(class.id, None).await.unwrap());

        insert_student(&storage.db, "student_9", "Nia", "parent_1", class.id, school.grade).await;
        assert!(storage.class_is_full(class.id, None).await.unwrap());
        assert!(!storage.class_is_full(class.id, Some("student_9")).await.unwrap());
        assert!(!storage.class_is_full(9_999, None).await.unwrap());
    }
}

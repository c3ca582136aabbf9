//! 科目存储操作

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Select, Set, TransactionTrait,
};

use super::listing::{Listing, group_names};
use super::{SeaOrmStorage, read_err, write_err};
use crate::entity::prelude::*;
use crate::entity::{subjects, teacher_subjects, teachers};
use crate::errors::Result;
use crate::utils::search_key;
use crate::models::{
    subjects::{entities::Subject, requests::SubjectInput, responses::SubjectRow},
    users::entities::NamedRef,
};

pub(crate) struct SubjectListing;

#[async_trait]
impl Listing for SubjectListing {
    type Entity = Subjects;
    type Row = SubjectRow;
    const WHAT: &'static str = "科目";

    fn order(select: Select<Subjects>) -> Select<Subjects> {
        select
            .order_by_asc(subjects::Column::Name)
            .order_by_asc(subjects::Column::Id)
    }

    async fn project(txn: &DatabaseTransaction, models: Vec<SubjectModel>) -> Result<Vec<SubjectRow>> {
        if models.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<i64> = models.iter().map(|m| m.id).collect();

        let links = TeacherSubjects::find()
            .filter(teacher_subjects::Column::SubjectId.is_in(ids))
            .find_also_related(Teachers)
            .order_by_asc(teachers::Column::Name)
            .all(txn)
            .await
            .map_err(|e| read_err("查询科目教师失败", e))?;
        let mut names = group_names(
            links
                .into_iter()
                .filter_map(|(link, teacher)| teacher.map(|t| (link.subject_id, t.full_name()))),
        );

        Ok(models
            .into_iter()
            .map(|m| SubjectRow {
                teachers: names.remove(&m.id).unwrap_or_default(),
                id: m.id,
                name: m.name,
            })
            .collect())
    }
}

async fn replace_teachers(txn: &DatabaseTransaction, subject_id: i64, teachers: &[String]) -> Result<()> {
    TeacherSubjects::delete_many()
        .filter(teacher_subjects::Column::SubjectId.eq(subject_id))
        .exec(txn)
        .await
        .map_err(|e| write_err("清除科目教师失败", e))?;

    let mut teacher_ids: Vec<&str> = teachers.iter().map(|t| t.trim()).collect();
    teacher_ids.sort_unstable();
    teacher_ids.dedup();
    if teacher_ids.is_empty() {
        return Ok(());
    }

    let links = teacher_ids.into_iter().map(|teacher_id| TeacherSubjectActiveModel {
        teacher_id: Set(teacher_id.to_string()),
        subject_id: Set(subject_id),
    });
    TeacherSubjects::insert_many(links)
        .exec_without_returning(txn)
        .await
        .map_err(|e| write_err("保存科目教师失败", e))?;
    Ok(())
}

impl SeaOrmStorage {
    /// 按名称排序的科目名单
    pub async fn list_subject_names_impl(&self) -> Result<Vec<NamedRef<i64>>> {
        let models = SubjectListing::order(Subjects::find())
            .all(&self.db)
            .await
            .map_err(|e| read_err("查询科目名单失败", e))?;

        Ok(models
            .into_iter()
            .map(|m| NamedRef {
                id: m.id,
                name: m.name,
            })
            .collect())
    }

    pub async fn subjects_exist_impl(&self, ids: &[i64]) -> Result<bool> {
        let mut unique = ids.to_vec();
        unique.sort_unstable();
        unique.dedup();
        if unique.is_empty() {
            return Ok(true);
        }

        let found = Subjects::find()
            .filter(subjects::Column::Id.is_in(unique.clone()))
            .count(&self.db)
            .await
            .map_err(|e| read_err("查询科目失败", e))?;
        Ok(found == unique.len() as u64)
    }

    /// 科目名称是否已被使用（按检索键比较，不区分大小写，可排除自身）
    pub async fn subject_name_taken_impl(&self, name: &str, exclude_id: Option<i64>) -> Result<bool> {
        let mut select = Subjects::find().filter(subjects::Column::SearchKey.eq(search_key(&[name])));
        if let Some(id) = exclude_id {
            select = select.filter(subjects::Column::Id.ne(id));
        }

        let count = select
            .count(&self.db)
            .await
            .map_err(|e| read_err("检查科目名称失败", e))?;
        Ok(count > 0)
    }

    /// 创建科目并关联教师
    pub async fn create_subject_impl(&self, input: SubjectInput) -> Result<Subject> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| write_err("开启事务失败", e))?;

        let model = SubjectActiveModel {
            name: Set(input.name()),
            search_key: Set(search_key(&[input.name.as_str()])),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| write_err("创建科目失败", e))?;

        replace_teachers(&txn, model.id, &input.teachers).await?;

        txn.commit()
            .await
            .map_err(|e| write_err("提交事务失败", e))?;
        Ok(model.into_subject())
    }

    /// 更新科目名称并整体替换任课教师
    pub async fn update_subject_impl(&self, id: i64, input: SubjectInput) -> Result<Option<Subject>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| write_err("开启事务失败", e))?;

        let Some(existing) = Subjects::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| read_err("查询科目失败", e))?
        else {
            return Ok(None);
        };

        let mut model: SubjectActiveModel = existing.into();
        model.name = Set(input.name());
        model.search_key = Set(search_key(&[input.name.as_str()]));
        let updated = model
            .update(&txn)
            .await
            .map_err(|e| write_err("更新科目失败", e))?;

        replace_teachers(&txn, id, &input.teachers).await?;

        txn.commit()
            .await
            .map_err(|e| write_err("提交事务失败", e))?;
        Ok(Some(updated.into_subject()))
    }

    /// 删除科目；仍有课程使用时被外键拒绝
    pub async fn delete_subject_impl(&self, id: i64) -> Result<bool> {
        let result = Subjects::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| write_err("删除科目失败", e))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{insert_subject, memory_storage, seed_school};
    use crate::filters::{self, test_support::student};
    use crate::models::PaginationQuery;
    use crate::models::subjects::requests::{SubjectInput, SubjectListParams};
    use crate::storage::Storage;

    fn input(name: &str, teachers: &[&str]) -> SubjectInput {
        SubjectInput {
            name: name.to_string(),
            teachers: teachers.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn test_list_is_open_catalog_with_teacher_names() {
        let storage = memory_storage().await;
        seed_school(&storage.db).await;

        let page = storage
            .list_subjects(filters::subject_condition(&student(), &SubjectListParams::default()), 1, 10)
            .await
            .unwrap();
        let names: Vec<_> = page.items.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Art", "Math"]);
        assert_eq!(page.items[1].teachers, vec!["Ada Lovelace"]);
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive() {
        let storage = memory_storage().await;
        seed_school(&storage.db).await;
        insert_subject(&storage.db, "Mathematics II", &[]).await;

        let params = SubjectListParams {
            search: Some("MATH".to_string()),
            ..Default::default()
        };
        let page = storage
            .list_subjects(filters::subject_condition(&student(), &params), 1, 10)
            .await
            .unwrap();
        assert_eq!(page.pagination.total, 2);
    }

    #[tokio::test]
    async fn test_search_folds_non_ascii() {
        let storage = memory_storage().await;
        seed_school(&storage.db).await;
        insert_subject(&storage.db, "Éducation civique", &[]).await;

        let params = SubjectListParams {
            search: Some("éDU".to_string()),
            ..Default::default()
        };
        let page = storage
            .list_subjects(filters::subject_condition(&student(), &params), 1, 10)
            .await
            .unwrap();
        let names: Vec<_> = page.items.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Éducation civique"]);
    }

    #[tokio::test]
    async fn test_huge_page_returns_no_rows() {
        let storage = memory_storage().await;
        seed_school(&storage.db).await;

        let query: PaginationQuery =
            serde_json::from_str(r#"{"page":"9223372036854775807"}"#).unwrap();
        let page = storage
            .list_subjects(
                filters::subject_condition(&student(), &SubjectListParams::default()),
                query.page(),
                10,
            )
            .await
            .unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.pagination.total, 2);
        assert!(!page.pagination.has_next);

        let page = storage
            .list_subjects(
                filters::subject_condition(&student(), &SubjectListParams::default()),
                u64::MAX,
                u64::MAX,
            )
            .await
            .unwrap();
        assert!(page.items.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_name_check_ignores_case() {
        let storage = memory_storage().await;
        let school = seed_school(&storage.db).await;

        assert!(storage.subject_name_taken(" math ", None).await.unwrap());
        assert!(!storage.subject_name_taken("MATH", Some(school.math)).await.unwrap());
        assert!(!storage.subject_name_taken("Biology", None).await.unwrap());

        insert_subject(&storage.db, "Éducation", &[]).await;
        assert!(storage.subject_name_taken("éDUCATION", None).await.unwrap());
    }

    #[tokio::test]
    async fn test_create_update_delete() {
        let storage = memory_storage().await;
        seed_school(&storage.db).await;

        let created = storage
            .create_subject(input("  Biology ", &["teacher_1", "teacher_2", "teacher_1"]))
            .await
            .unwrap();
        assert_eq!(created.name, "Biology");

        let updated = storage
            .update_subject(created.id, input("Biology", &["teacher_2"]))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.id, created.id);

        let names = storage.list_subject_names().await.unwrap();
        assert_eq!(names.first().map(|n| n.name.as_str()), Some("Art"));
        assert_eq!(names.len(), 3);

        assert!(storage.delete_subject(created.id).await.unwrap());
        assert!(!storage.delete_subject(created.id).await.unwrap());
        assert!(storage.update_subject(created.id, input("X", &["teacher_1"])).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_subjects_exist() {
        let storage = memory_storage().await;
        let school = seed_school(&storage.db).await;

        assert!(storage.subjects_exist(&[school.math, school.art]).await.unwrap());
        assert!(!storage.subjects_exist(&[school.math, 9_999]).await.unwrap());
    }
}

//! 考试存储操作

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DatabaseTransaction, EntityTrait, QueryOrder, Select, Set};

use super::lessons::{LessonNames, lessons_by_id};
use super::listing::Listing;
use super::{SeaOrmStorage, from_timestamp, read_err, to_timestamp, write_err};
use crate::entity::exams;
use crate::entity::prelude::*;
use crate::errors::Result;
use crate::utils::search_key;
use crate::models::exams::{entities::Exam, requests::ExamInput, responses::ExamRow};

pub(crate) struct ExamListing;

#[async_trait]
impl Listing for ExamListing {
    type Entity = Exams;
    type Row = ExamRow;
    const WHAT: &'static str = "考试";

    fn order(select: Select<Exams>) -> Select<Exams> {
        select
            .order_by_asc(exams::Column::StartTime)
            .order_by_asc(exams::Column::Id)
    }

    async fn project(txn: &DatabaseTransaction, models: Vec<ExamModel>) -> Result<Vec<ExamRow>> {
        let lessons = lessons_by_id(txn, models.iter().map(|m| m.lesson_id).collect()).await?;
        let lesson_models: Vec<LessonModel> = lessons.values().cloned().collect();
        let names = LessonNames::load(txn, &lesson_models).await?;

        Ok(models
            .into_iter()
            .map(|m| {
                let lesson = lessons.get(&m.lesson_id);
                ExamRow {
                    subject_name: lesson.map(|l| names.subject(l)).unwrap_or_default(),
                    class_name: lesson.map(|l| names.class(l)).unwrap_or_default(),
                    teacher_name: lesson.map(|l| names.teacher(l)).unwrap_or_default(),
                    id: m.id,
                    title: m.title,
                    start_time: from_timestamp(m.start_time),
                }
            })
            .collect())
    }
}

impl SeaOrmStorage {
    pub async fn create_exam_impl(&self, input: ExamInput) -> Result<Exam> {
        let model = ExamActiveModel {
            title: Set(input.title.trim().to_string()),
            search_key: Set(search_key(&[input.title.as_str()])),
            start_time: Set(to_timestamp(input.start_time)),
            end_time: Set(to_timestamp(input.end_time)),
            lesson_id: Set(input.lesson_id),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| write_err("创建考试失败", e))?;

        Ok(model.into_exam())
    }

    pub async fn update_exam_impl(&self, id: i64, input: ExamInput) -> Result<Option<Exam>> {
        let Some(existing) = Exams::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| read_err("查询考试失败", e))?
        else {
            return Ok(None);
        };

        let mut model: ExamActiveModel = existing.into();
        model.title = Set(input.title.trim().to_string());
        model.search_key = Set(search_key(&[input.title.as_str()]));
        model.start_time = Set(to_timestamp(input.start_time));
        model.end_time = Set(to_timestamp(input.end_time));
        model.lesson_id = Set(input.lesson_id);

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| write_err("更新考试失败", e))?;
        Ok(Some(updated.into_exam()))
    }

    pub async fn delete_exam_impl(&self, id: i64) -> Result<bool> {
        let result = Exams::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| write_err("删除考试失败", e))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{MONDAY_8AM, memory_storage, seed_school};
    use crate::filters::{
        self,
        test_support::{admin, parent, student, teacher},
    };
    use crate::models::exams::requests::{ExamInput, ExamListParams};
    use crate::models::users::entities::Viewer;
    use crate::storage::Storage;

    async fn titles(storage: &super::SeaOrmStorage, viewer: &Viewer, params: &ExamListParams) -> Vec<String> {
        storage
            .list_exams(filters::exam_condition(viewer, params), 1, 50)
            .await
            .unwrap()
            .items
            .into_iter()
            .map(|e| e.title)
            .collect()
    }

    #[tokio::test]
    async fn test_role_scope() {
        let storage = memory_storage().await;
        seed_school(&storage.db).await;
        let all = ExamListParams::default();

        assert_eq!(titles(&storage, &admin(), &all).await.len(), 2);
        assert_eq!(titles(&storage, &teacher(), &all).await, vec!["Algebra quiz"]);
        assert_eq!(titles(&storage, &student(), &all).await, vec!["Algebra quiz"]);
        assert_eq!(titles(&storage, &parent(), &all).await, vec!["Algebra quiz"]);
    }

    #[tokio::test]
    async fn test_teacher_and_class_filters_combine() {
        let storage = memory_storage().await;
        let school = seed_school(&storage.db).await;

        let mismatched = ExamListParams {
            teacher_id: Some("teacher_1".to_string()),
            class_id: Some(school.class_b),
            ..Default::default()
        };
        assert!(titles(&storage, &admin(), &mismatched).await.is_empty());

        let matched = ExamListParams {
            teacher_id: Some("teacher_2".to_string()),
            class_id: Some(school.class_b),
            ..Default::default()
        };
        assert_eq!(titles(&storage, &admin(), &matched).await, vec!["Colour theory"]);
    }

    #[tokio::test]
    async fn test_search_by_subject() {
        let storage = memory_storage().await;
        seed_school(&storage.db).await;

        let params = ExamListParams {
            search: Some("ART".to_string()),
            ..Default::default()
        };
        assert_eq!(titles(&storage, &admin(), &params).await, vec!["Colour theory"]);
    }

    #[tokio::test]
    async fn test_row_projection() {
        let storage = memory_storage().await;
        seed_school(&storage.db).await;

        let page = storage
            .list_exams(filters::exam_condition(&teacher(), &ExamListParams::default()), 1, 10)
            .await
            .unwrap();
        let row = &page.items[0];
        assert_eq!(row.subject_name, "Math");
        assert_eq!(row.class_name, "1A");
        assert_eq!(row.teacher_name, "Ada Lovelace");
    }

    #[tokio::test]
    async fn test_scope_check_and_mutations() {
        let storage = memory_storage().await;
        let school = seed_school(&storage.db).await;
        let scope = || filters::exam_condition(&teacher(), &ExamListParams::default());

        assert!(storage.exam_in_scope(school.exam_a, scope()).await.unwrap());
        assert!(!storage.exam_in_scope(school.exam_b, scope()).await.unwrap());

        let input = ExamInput {
            title: "Geometry".to_string(),
            start_time: chrono::DateTime::from_timestamp(MONDAY_8AM, 0).unwrap(),
            end_time: chrono::DateTime::from_timestamp(MONDAY_8AM + 3_600, 0).unwrap(),
            lesson_id: school.lesson_a,
        };
        let created = storage.create_exam(input.clone()).await.unwrap();
        assert!(storage.update_exam(created.id, input.clone()).await.unwrap().is_some());
        assert!(storage.delete_exam(created.id).await.unwrap());
        assert!(!storage.delete_exam(created.id).await.unwrap());
        assert!(storage.update_exam(created.id, input).await.unwrap().is_none());
    }
}

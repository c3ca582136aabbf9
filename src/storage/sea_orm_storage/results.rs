//! 成绩存储操作

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DatabaseTransaction, EntityTrait, QueryOrder, Select, Set};

use super::lessons::{LessonNames, lessons_by_id};
use super::listing::{Listing, index_by};
use super::{SeaOrmStorage, from_timestamp, read_err, write_err};
use crate::entity::prelude::*;
use crate::entity::{assignments, exams, results, students};
use crate::errors::Result;
use crate::models::results::{entities::ExamResult, requests::ResultInput, responses::ResultRow};

pub(crate) struct ResultListing;

/// 成绩来源（考试或作业）的标题、日期和所属课程
struct Source {
    title: String,
    date: i64,
    lesson_id: i64,
}

#[async_trait]
impl Listing for ResultListing {
    type Entity = Results;
    type Row = ResultRow;
    const WHAT: &'static str = "成绩";

    fn order(select: Select<Results>) -> Select<Results> {
        select
            .order_by_asc(results::Column::StudentId)
            .order_by_asc(results::Column::Id)
    }

    async fn project(txn: &DatabaseTransaction, models: Vec<ResultModel>) -> Result<Vec<ResultRow>> {
        let exam_ids = models.iter().filter_map(|m| m.exam_id).collect();
        let assignment_ids = models.iter().filter_map(|m| m.assignment_id).collect();
        let student_ids = models.iter().map(|m| m.student_id.clone()).collect();

        let exams = index_by::<Exams, _, _, _>(txn, exams::Column::Id, exam_ids, |e| e.id).await?;
        let assignments =
            index_by::<Assignments, _, _, _>(txn, assignments::Column::Id, assignment_ids, |a| a.id)
                .await?;
        let students =
            index_by::<Students, _, _, _>(txn, students::Column::Id, student_ids, |s| s.id.clone())
                .await?;

        let source = |m: &ResultModel| -> Option<Source> {
            match (m.exam_id, m.assignment_id) {
                (Some(id), _) => exams.get(&id).map(|e| Source {
                    title: e.title.clone(),
                    date: e.start_time,
                    lesson_id: e.lesson_id,
                }),
                (None, Some(id)) => assignments.get(&id).map(|a| Source {
                    title: a.title.clone(),
                    date: a.start_date,
                    lesson_id: a.lesson_id,
                }),
                (None, None) => None,
            }
        };

        let sources: Vec<Option<Source>> = models.iter().map(source).collect();
        let lessons = lessons_by_id(
            txn,
            sources.iter().flatten().map(|s| s.lesson_id).collect(),
        )
        .await?;
        let lesson_models: Vec<LessonModel> = lessons.values().cloned().collect();
        let names = LessonNames::load(txn, &lesson_models).await?;

        Ok(models
            .into_iter()
            .zip(sources)
            .map(|(m, source)| {
                let lesson = source.as_ref().and_then(|s| lessons.get(&s.lesson_id));
                ResultRow {
                    student_name: students
                        .get(&m.student_id)
                        .map(|s| s.full_name())
                        .unwrap_or_default(),
                    teacher_name: lesson.map(|l| names.teacher(l)).unwrap_or_default(),
                    class_name: lesson.map(|l| names.class(l)).unwrap_or_default(),
                    date: from_timestamp(source.as_ref().map(|s| s.date).unwrap_or_default()),
                    title: source.map(|s| s.title).unwrap_or_default(),
                    id: m.id,
                    student_id: m.student_id,
                    score: m.score,
                }
            })
            .collect())
    }
}

impl SeaOrmStorage {
    pub async fn create_result_impl(&self, input: ResultInput) -> Result<ExamResult> {
        let model = ResultActiveModel {
            score: Set(input.score),
            exam_id: Set(input.exam_id),
            assignment_id: Set(input.assignment_id),
            student_id: Set(input.student_id.trim().to_string()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| write_err("创建成绩失败", e))?;

        Ok(model.into_result())
    }

    pub async fn update_result_impl(&self, id: i64, input: ResultInput) -> Result<Option<ExamResult>> {
        let Some(existing) = Results::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| read_err("查询成绩失败", e))?
        else {
            return Ok(None);
        };

        let mut model: ResultActiveModel = existing.into();
        model.score = Set(input.score);
        model.exam_id = Set(input.exam_id);
        model.assignment_id = Set(input.assignment_id);
        model.student_id = Set(input.student_id.trim().to_string());

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| write_err("更新成绩失败", e))?;
        Ok(Some(updated.into_result()))
    }

    pub async fn delete_result_impl(&self, id: i64) -> Result<bool> {
        let result = Results::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| write_err("删除成绩失败", e))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{memory_storage, seed_school};
    use crate::filters::{
        self,
        test_support::{admin, parent, student, teacher},
    };
    use crate::models::results::requests::{ResultInput, ResultListParams};
    use crate::models::users::entities::Viewer;
    use crate::storage::Storage;

    async fn rows(
        storage: &super::SeaOrmStorage,
        viewer: &Viewer,
        params: &ResultListParams,
    ) -> Vec<crate::models::results::responses::ResultRow> {
        storage
            .list_results(filters::result_condition(viewer, params), 1, 50)
            .await
            .unwrap()
            .items
    }

    #[tokio::test]
    async fn test_role_scope() {
        let storage = memory_storage().await;
        seed_school(&storage.db).await;
        let all = ResultListParams::default();

        assert_eq!(rows(&storage, &admin(), &all).await.len(), 4);
        for viewer in [teacher(), student(), parent()] {
            let visible = rows(&storage, &viewer, &all).await;
            assert_eq!(visible.len(), 2);
            assert!(visible.iter().all(|r| r.student_id == "student_1"));
        }
    }

    #[tokio::test]
    async fn test_row_from_exam_and_assignment() {
        let storage = memory_storage().await;
        seed_school(&storage.db).await;

        let visible = rows(&storage, &student(), &ResultListParams::default()).await;
        let titles: Vec<_> = visible.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Algebra quiz", "Fractions sheet"]);
        assert!(visible.iter().all(|r| r.teacher_name == "Ada Lovelace"));
        assert!(visible.iter().all(|r| r.class_name == "1A"));
        assert_eq!(visible[0].student_name, "Sam Student");
        assert_eq!(visible[0].score, 90);
    }

    #[tokio::test]
    async fn test_search_by_title() {
        let storage = memory_storage().await;
        seed_school(&storage.db).await;

        let params = ResultListParams {
            search: Some("still".to_string()),
            ..Default::default()
        };
        let found = rows(&storage, &admin(), &params).await;
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].student_id, "student_2");
    }

    #[tokio::test]
    async fn test_mutations_and_scope_check() {
        let storage = memory_storage().await;
        let school = seed_school(&storage.db).await;
        let scope = || filters::result_condition(&teacher(), &ResultListParams::default());

        assert!(storage.result_in_scope(school.result_a, scope()).await.unwrap());
        assert!(!storage.result_in_scope(school.result_b, scope()).await.unwrap());

        let input = ResultInput {
            score: 55,
            exam_id: None,
            assignment_id: Some(school.assignment_b),
            student_id: "student_1".to_string(),
        };
        let created = storage.create_result(input.clone()).await.unwrap();
        assert_eq!(created.assignment_id, Some(school.assignment_b));

        let moved = ResultInput {
            exam_id: Some(school.exam_a),
            assignment_id: None,
            ..input
        };
        let updated = storage.update_result(created.id, moved).await.unwrap().unwrap();
        assert_eq!(updated.exam_id, Some(school.exam_a));
        assert_eq!(updated.assignment_id, None);

        assert!(storage.delete_result(created.id).await.unwrap());
        assert!(!storage.delete_result(created.id).await.unwrap());
    }
}

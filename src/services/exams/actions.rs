//! 考试写操作
//!
//! 管理员不受限制；教师只能操作自己任教课程下的考试，范围外的考试按不存在处理。

use sea_orm::Condition;
use tracing::info;

use crate::errors::Result;
use crate::filters;
use crate::models::MutationResult;
use crate::models::exams::requests::{ExamInput, ExamListParams};
use crate::models::lessons::requests::LessonListParams;
use crate::models::users::entities::Viewer;
use crate::services::deletion;
use crate::storage::Storage;
use crate::utils::validate::Validate;

const ENTITY: &str = "exam";
const DUPLICATE: &str = "This exam already exists";
const NOT_FOUND: &str = "Exam not found";

fn exam_scope(viewer: &Viewer) -> Condition {
    filters::exam_condition(viewer, &ExamListParams::default())
}

fn lesson_scope(viewer: &Viewer) -> Condition {
    filters::lesson_condition(viewer, &LessonListParams::default())
}

pub async fn create_exam(storage: &dyn Storage, viewer: &Viewer, input: ExamInput) -> MutationResult {
    if let Err(errors) = input.validate() {
        return MutationResult::invalid(ENTITY, errors);
    }
    MutationResult::settle(ENTITY, save(storage, viewer, None, input).await, DUPLICATE)
}

pub async fn update_exam(
    storage: &dyn Storage,
    viewer: &Viewer,
    id: i64,
    input: ExamInput,
) -> MutationResult {
    if let Err(errors) = input.validate() {
        return MutationResult::invalid(ENTITY, errors);
    }
    MutationResult::settle(ENTITY, save(storage, viewer, Some(id), input).await, DUPLICATE)
}

pub async fn delete_exam(storage: &dyn Storage, viewer: &Viewer, id: i64) -> MutationResult {
    match storage.exam_in_scope(id, exam_scope(viewer)).await {
        Ok(true) => deletion(ENTITY, id, NOT_FOUND, storage.delete_exam(id).await),
        Ok(false) => MutationResult::not_found(ENTITY, NOT_FOUND),
        Err(e) => MutationResult::from_error(ENTITY, e, DUPLICATE),
    }
}

async fn save(
    storage: &dyn Storage,
    viewer: &Viewer,
    id: Option<i64>,
    input: ExamInput,
) -> Result<MutationResult> {
    if let Some(id) = id
        && !storage.exam_in_scope(id, exam_scope(viewer)).await?
    {
        return Ok(MutationResult::not_found(ENTITY, NOT_FOUND));
    }
    if !storage
        .lesson_in_scope(input.lesson_id, lesson_scope(viewer))
        .await?
    {
        return Ok(MutationResult::not_found(ENTITY, "Lesson not found"));
    }

    match id {
        None => {
            let exam = storage.create_exam(input).await?;
            info!("Exam {} created by {}", exam.id, viewer.user_id);
            Ok(MutationResult::created(ENTITY, exam.id))
        }
        Some(id) => Ok(match storage.update_exam(id, input).await? {
            Some(exam) => MutationResult::updated(ENTITY, exam.id),
            None => MutationResult::not_found(ENTITY, NOT_FOUND),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::test_support::{admin, teacher};
    use crate::storage::sea_orm_storage::test_support::{
        DAY, MONDAY_8AM, memory_storage, seed_school,
    };

    fn input(lesson_id: i64) -> ExamInput {
        ExamInput {
            title: "Mid-term".to_string(),
            start_time: chrono::DateTime::from_timestamp(MONDAY_8AM + 7 * DAY, 0).unwrap(),
            end_time: chrono::DateTime::from_timestamp(MONDAY_8AM + 7 * DAY + 3_600, 0).unwrap(),
            lesson_id,
        }
    }

    #[tokio::test]
    async fn test_teacher_creates_only_for_own_lessons() {
        let storage = memory_storage().await;
        let school = seed_school(&storage.db).await;

        assert!(create_exam(&storage, &teacher(), input(school.lesson_a)).await.success());
        let result = create_exam(&storage, &teacher(), input(school.lesson_b)).await;
        assert_eq!(result.error(), Some("Lesson not found"));

        assert!(create_exam(&storage, &admin(), input(school.lesson_b)).await.success());
    }

    #[tokio::test]
    async fn test_out_of_scope_exam_reads_as_missing() {
        let storage = memory_storage().await;
        let school = seed_school(&storage.db).await;

        let result = update_exam(&storage, &teacher(), school.exam_b, input(school.lesson_a)).await;
        assert_eq!(result.error(), Some(NOT_FOUND));
        let result = delete_exam(&storage, &teacher(), school.exam_b).await;
        assert_eq!(result.error(), Some(NOT_FOUND));

        let result = update_exam(&storage, &teacher(), school.exam_a, input(school.lesson_a)).await;
        assert!(result.success());
    }

    #[tokio::test]
    async fn test_moving_exam_to_foreign_lesson_is_rejected() {
        let storage = memory_storage().await;
        let school = seed_school(&storage.db).await;

        let result = update_exam(&storage, &teacher(), school.exam_a, input(school.lesson_b)).await;
        assert_eq!(result.error(), Some("Lesson not found"));
    }

    #[tokio::test]
    async fn test_admin_deletes_any_exam() {
        let storage = memory_storage().await;
        let school = seed_school(&storage.db).await;

        assert!(delete_exam(&storage, &admin(), school.exam_b).await.success());
        assert_eq!(
            delete_exam(&storage, &admin(), school.exam_b).await.error(),
            Some(NOT_FOUND)
        );
    }
}

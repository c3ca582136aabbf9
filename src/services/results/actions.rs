use tracing::info;

use crate::errors::Result;
use crate::filters;
use crate::models::MutationResult;
use crate::models::assignments::requests::AssignmentListParams;
use crate::models::exams::requests::ExamListParams;
use crate::models::results::requests::{ResultInput, ResultListParams, ResultSource};
use crate::models::students::requests::StudentListParams;
use crate::models::users::entities::Viewer;
use crate::services::deletion;
use crate::storage::Storage;
use crate::utils::validate::Validate;

const ENTITY: &str = "result";
const DUPLICATE: &str = "This result already exists";
const NOT_FOUND: &str = "Result not found";

pub async fn create_result(storage: &dyn Storage, viewer: &Viewer, input: ResultInput) -> MutationResult {
    if let Err(errors) = input.validate() {
        return MutationResult::invalid(ENTITY, errors);
    }
    MutationResult::settle(ENTITY, save(storage, viewer, None, input).await, DUPLICATE)
}

pub async fn update_result(
    storage: &dyn Storage,
    viewer: &Viewer,
    id: i64,
    input: ResultInput,
) -> MutationResult {
    if let Err(errors) = input.validate() {
        return MutationResult::invalid(ENTITY, errors);
    }
    MutationResult::settle(ENTITY, save(storage, viewer, Some(id), input).await, DUPLICATE)
}

pub async fn delete_result(storage: &dyn Storage, viewer: &Viewer, id: i64) -> MutationResult {
    let scope = filters::result_condition(viewer, &ResultListParams::default());
    match storage.result_in_scope(id, scope).await {
        Ok(true) => deletion(ENTITY, id, NOT_FOUND, storage.delete_result(id).await),
        Ok(false) => MutationResult::not_found(ENTITY, NOT_FOUND),
        Err(e) => MutationResult::from_error(ENTITY, e, DUPLICATE),
    }
}

async fn save(
    storage: &dyn Storage,
    viewer: &Viewer,
    id: Option<i64>,
    input: ResultInput,
) -> Result<MutationResult> {
    if let Some(id) = id {
        let scope = filters::result_condition(viewer, &ResultListParams::default());
        if !storage.result_in_scope(id, scope).await? {
            return Ok(MutationResult::not_found(ENTITY, NOT_FOUND));
        }
    }

    let students = filters::student_condition(viewer, &StudentListParams::default());
    if !storage
        .student_in_scope(input.student_id.trim(), students)
        .await?
    {
        return Ok(MutationResult::not_found(ENTITY, "Student not found"));
    }

    // 校验已保证恰好一个来源
    let source_visible = match input.source() {
        Some(ResultSource::Exam(exam_id)) => {
            let exams = filters::exam_condition(viewer, &ExamListParams::default());
            storage.exam_in_scope(exam_id, exams).await?
        }
        Some(ResultSource::Assignment(assignment_id)) => {
            let assignments = filters::assignment_condition(viewer, &AssignmentListParams::default());
            storage.assignment_in_scope(assignment_id, assignments).await?
        }
        None => false,
    };
    if !source_visible {
        let message = if input.exam_id.is_some() {
            "Exam not found"
        } else {
            "Assignment not found"
        };
        return Ok(MutationResult::not_found(ENTITY, message));
    }

    match id {
        None => {
            let result = storage.create_result(input).await?;
            info!("Result {} recorded by {}", result.id, viewer.user_id);
            Ok(MutationResult::created(ENTITY, result.id))
        }
        Some(id) => Ok(match storage.update_result(id, input).await? {
            Some(result) => MutationResult::updated(ENTITY, result.id),
            None => MutationResult::not_found(ENTITY, NOT_FOUND),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::test_support::{admin, teacher};
    use crate::storage::sea_orm_storage::test_support::{memory_storage, seed_school};

    fn for_exam(student_id: &str, exam_id: i64, score: i32) -> ResultInput {
        ResultInput {
            score,
            exam_id: Some(exam_id),
            assignment_id: None,
            student_id: student_id.to_string(),
        }
    }

    #[tokio::test]
    async fn test_both_sources_fail_validation() {
        let storage = memory_storage().await;
        let school = seed_school(&storage.db).await;

        let mut both = for_exam("student_1", school.exam_a, 50);
        both.assignment_id = Some(school.assignment_a);
        let result = create_result(&storage, &admin(), both).await;
        assert_eq!(result.error(), Some("Validation failed"));
    }

    #[tokio::test]
    async fn test_teacher_records_for_own_exam_and_class() {
        let storage = memory_storage().await;
        let school = seed_school(&storage.db).await;

        assert!(create_result(&storage, &teacher(), for_exam("student_1", school.exam_a, 88)).await.success());
        assert_eq!(
            create_result(&storage, &teacher(), for_exam("student_1", school.exam_b, 88)).await.error(),
            Some("Exam not found")
        );
        assert_eq!(
            create_result(&storage, &teacher(), for_exam("student_2", school.exam_a, 88)).await.error(),
            Some("Student not found")
        );
    }

    #[tokio::test]
    async fn test_assignment_source() {
        let storage = memory_storage().await;
        let school = seed_school(&storage.db).await;

        let input = ResultInput {
            score: 61,
            exam_id: None,
            assignment_id: Some(school.assignment_b),
            student_id: "student_1".to_string(),
        };
        assert_eq!(
            create_result(&storage, &teacher(), input.clone()).await.error(),
            Some("Assignment not found")
        );
        assert!(create_result(&storage, &admin(), input).await.success());
    }

    #[tokio::test]
    async fn test_update_and_delete_respect_scope() {
        let storage = memory_storage().await;
        let school = seed_school(&storage.db).await;

        let result = update_result(&storage, &teacher(), school.result_b, for_exam("student_1", school.exam_a, 10)).await;
        assert_eq!(result.error(), Some(NOT_FOUND));
        let result = update_result(&storage, &teacher(), school.result_a, for_exam("student_1", school.exam_a, 95)).await;
        assert!(result.success());

        assert_eq!(delete_result(&storage, &teacher(), school.result_b).await.error(), Some(NOT_FOUND));
        assert!(delete_result(&storage, &admin(), school.result_b).await.success());
    }
}

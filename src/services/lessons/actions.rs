use tracing::info;

use crate::errors::Result;
use crate::models::MutationResult;
use crate::models::lessons::requests::LessonInput;
use crate::services::deletion;
use crate::storage::Storage;
use crate::utils::validate::Validate;

const ENTITY: &str = "lesson";
const DUPLICATE: &str = "This lesson already exists";
const NOT_FOUND: &str = "Lesson not found";

pub async fn create_lesson(storage: &dyn Storage, input: LessonInput) -> MutationResult {
    if let Err(errors) = input.validate() {
        return MutationResult::invalid(ENTITY, errors);
    }
    MutationResult::settle(ENTITY, save(storage, None, input).await, DUPLICATE)
}

pub async fn update_lesson(storage: &dyn Storage, id: i64, input: LessonInput) -> MutationResult {
    if let Err(errors) = input.validate() {
        return MutationResult::invalid(ENTITY, errors);
    }
    MutationResult::settle(ENTITY, save(storage, Some(id), input).await, DUPLICATE)
}

// 课程的考试、作业与考勤随课程一起删除
pub async fn delete_lesson(storage: &dyn Storage, id: i64) -> MutationResult {
    deletion(ENTITY, id, NOT_FOUND, storage.delete_lesson(id).await)
}

async fn save(storage: &dyn Storage, id: Option<i64>, input: LessonInput) -> Result<MutationResult> {
    if !storage.subject_exists(input.subject_id).await? {
        return Ok(MutationResult::not_found(ENTITY, "Subject not found"));
    }
    if !storage.class_exists(input.class_id).await? {
        return Ok(MutationResult::not_found(ENTITY, "Class not found"));
    }
    if !storage
        .teachers_exist(&[input.teacher_id.trim().to_string()])
        .await?
    {
        return Ok(MutationResult::not_found(ENTITY, "Teacher not found"));
    }

    match id {
        None => {
            let lesson = storage.create_lesson(input).await?;
            info!("Lesson {} ({}) created", lesson.id, lesson.name);
            Ok(MutationResult::created(ENTITY, lesson.id))
        }
        Some(id) => Ok(match storage.update_lesson(id, input).await? {
            Some(lesson) => MutationResult::updated(ENTITY, lesson.id),
            None => MutationResult::not_found(ENTITY, NOT_FOUND),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::lessons::entities::Day;
    use crate::storage::sea_orm_storage::test_support::{
        MONDAY_8AM, School, memory_storage, seed_school,
    };

    fn input(school: &School, teacher_id: &str) -> LessonInput {
        LessonInput {
            name: "Geometry 1A".to_string(),
            day: Day::Wednesday,
            start_time: chrono::DateTime::from_timestamp(MONDAY_8AM, 0).unwrap(),
            end_time: chrono::DateTime::from_timestamp(MONDAY_8AM + 2_700, 0).unwrap(),
            subject_id: school.math,
            class_id: school.class_a,
            teacher_id: teacher_id.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_checks_teacher() {
        let storage = memory_storage().await;
        let school = seed_school(&storage.db).await;

        assert_eq!(
            create_lesson(&storage, input(&school, "ghost")).await.error(),
            Some("Teacher not found")
        );
        assert!(create_lesson(&storage, input(&school, "teacher_1")).await.success());
    }

    #[tokio::test]
    async fn test_time_range_is_validated() {
        let storage = memory_storage().await;
        let school = seed_school(&storage.db).await;

        let mut backwards = input(&school, "teacher_1");
        backwards.end_time = backwards.start_time;
        let body = serde_json::to_value(create_lesson(&storage, backwards).await).unwrap();
        assert_eq!(body["fieldErrors"]["end_time"], "End time must be after start time");
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let storage = memory_storage().await;
        let school = seed_school(&storage.db).await;

        assert!(update_lesson(&storage, school.lesson_a, input(&school, "teacher_2")).await.success());
        assert_eq!(
            update_lesson(&storage, 9_999, input(&school, "teacher_2")).await.error(),
            Some(NOT_FOUND)
        );
        assert!(delete_lesson(&storage, school.lesson_a).await.success());
        assert_eq!(delete_lesson(&storage, school.lesson_a).await.error(), Some(NOT_FOUND));
    }
}

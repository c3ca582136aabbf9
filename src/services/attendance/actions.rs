use tracing::info;

use crate::errors::Result;
use crate::filters;
use crate::models::MutationResult;
use crate::models::attendance::requests::{AttendanceInput, AttendanceListParams};
use crate::models::lessons::requests::LessonListParams;
use crate::models::students::requests::StudentListParams;
use crate::models::users::entities::Viewer;
use crate::services::deletion;
use crate::storage::Storage;
use crate::utils::validate::Validate;

const ENTITY: &str = "attendance";
const DUPLICATE: &str = "This attendance record already exists";
const NOT_FOUND: &str = "Attendance not found";

pub async fn create_attendance(
    storage: &dyn Storage,
    viewer: &Viewer,
    input: AttendanceInput,
) -> MutationResult {
    if let Err(errors) = input.validate() {
        return MutationResult::invalid(ENTITY, errors);
    }
    MutationResult::settle(ENTITY, save(storage, viewer, None, input).await, DUPLICATE)
}

pub async fn update_attendance(
    storage: &dyn Storage,
    viewer: &Viewer,
    id: i64,
    input: AttendanceInput,
) -> MutationResult {
    if let Err(errors) = input.validate() {
        return MutationResult::invalid(ENTITY, errors);
    }
    MutationResult::settle(ENTITY, save(storage, viewer, Some(id), input).await, DUPLICATE)
}

pub async fn delete_attendance(storage: &dyn Storage, viewer: &Viewer, id: i64) -> MutationResult {
    let scope = filters::attendance_condition(viewer, &AttendanceListParams::default());
    match storage.attendance_in_scope(id, scope).await {
        Ok(true) => deletion(ENTITY, id, NOT_FOUND, storage.delete_attendance(id).await),
        Ok(false) => MutationResult::not_found(ENTITY, NOT_FOUND),
        Err(e) => MutationResult::from_error(ENTITY, e, DUPLICATE),
    }
}

async fn save(
    storage: &dyn Storage,
    viewer: &Viewer,
    id: Option<i64>,
    input: AttendanceInput,
) -> Result<MutationResult> {
    if let Some(id) = id {
        let scope = filters::attendance_condition(viewer, &AttendanceListParams::default());
        if !storage.attendance_in_scope(id, scope).await? {
            return Ok(MutationResult::not_found(ENTITY, NOT_FOUND));
        }
    }

    let lessons = filters::lesson_condition(viewer, &LessonListParams::default());
    if !storage.lesson_in_scope(input.lesson_id, lessons).await? {
        return Ok(MutationResult::not_found(ENTITY, "Lesson not found"));
    }
    let students = filters::student_condition(viewer, &StudentListParams::default());
    if !storage
        .student_in_scope(input.student_id.trim(), students)
        .await?
    {
        return Ok(MutationResult::not_found(ENTITY, "Student not found"));
    }

    match id {
        None => {
            let record = storage.create_attendance(input).await?;
            info!("Attendance {} recorded by {}", record.id, viewer.user_id);
            Ok(MutationResult::created(ENTITY, record.id))
        }
        Some(id) => Ok(match storage.update_attendance(id, input).await? {
            Some(record) => MutationResult::updated(ENTITY, record.id),
            None => MutationResult::not_found(ENTITY, NOT_FOUND),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::test_support::{admin, teacher};
    use crate::storage::sea_orm_storage::test_support::{MONDAY_8AM, memory_storage, seed_school};

    fn input(student_id: &str, lesson_id: i64, present: bool) -> AttendanceInput {
        AttendanceInput {
            date: chrono::DateTime::from_timestamp(MONDAY_8AM, 0).unwrap(),
            present,
            student_id: student_id.to_string(),
            lesson_id,
        }
    }

    #[tokio::test]
    async fn test_teacher_marks_own_lesson() {
        let storage = memory_storage().await;
        let school = seed_school(&storage.db).await;

        assert!(create_attendance(&storage, &teacher(), input("student_1", school.lesson_a, false)).await.success());
        assert_eq!(
            create_attendance(&storage, &teacher(), input("student_2", school.lesson_b, true)).await.error(),
            Some("Lesson not found")
        );
        assert_eq!(
            create_attendance(&storage, &teacher(), input("nobody", school.lesson_a, true)).await.error(),
            Some("Student not found")
        );
    }

    #[tokio::test]
    async fn test_update_and_delete_respect_scope() {
        let storage = memory_storage().await;
        let school = seed_school(&storage.db).await;

        let result = update_attendance(&storage, &teacher(), school.attendance_b, input("student_1", school.lesson_a, true)).await;
        assert_eq!(result.error(), Some(NOT_FOUND));
        let result = update_attendance(&storage, &teacher(), school.attendance_a, input("student_1", school.lesson_a, false)).await;
        assert!(result.success());

        assert_eq!(
            delete_attendance(&storage, &teacher(), school.attendance_b).await.error(),
            Some(NOT_FOUND)
        );
        assert!(delete_attendance(&storage, &admin(), school.attendance_b).await.success());
        assert_eq!(
            delete_attendance(&storage, &admin(), school.attendance_b).await.error(),
            Some(NOT_FOUND)
        );
    }
}

use tracing::info;

use crate::errors::Result;
use crate::models::MutationResult;
use crate::models::students::requests::StudentInput;
use crate::services::{PersonFields, deletion, person_conflict, person_id};
use crate::storage::Storage;
use crate::utils::validate::Validate;

const ENTITY: &str = "student";
const DUPLICATE_USERNAME: &str = "A student with this username already exists";
const NOT_FOUND: &str = "Student not found";

pub async fn create_student(storage: &dyn Storage, input: StudentInput) -> MutationResult {
    if let Err(errors) = input.validate() {
        return MutationResult::invalid(ENTITY, errors);
    }
    MutationResult::settle(ENTITY, save(storage, None, input).await, DUPLICATE_USERNAME)
}

pub async fn update_student(storage: &dyn Storage, id: &str, input: StudentInput) -> MutationResult {
    if let Err(errors) = input.validate() {
        return MutationResult::invalid(ENTITY, errors);
    }
    MutationResult::settle(ENTITY, save(storage, Some(id), input).await, DUPLICATE_USERNAME)
}

pub async fn delete_student(storage: &dyn Storage, id: &str) -> MutationResult {
    deletion(ENTITY, id.to_string(), NOT_FOUND, storage.delete_student(id).await)
}

async fn save(storage: &dyn Storage, id: Option<&str>, input: StudentInput) -> Result<MutationResult> {
    let fields = PersonFields::new(&input.id, &input.profile, id.is_none());
    if let Some(field) = storage
        .find_student_conflict(fields.claim(), id)
        .await?
    {
        return Ok(person_conflict(ENTITY, field));
    }
    if !storage.parent_exists(input.parent_id.trim()).await? {
        return Ok(MutationResult::not_found(ENTITY, "Parent not found"));
    }
    if !storage.grade_exists(input.grade_id).await? {
        return Ok(MutationResult::not_found(ENTITY, "Grade not found"));
    }
    if !storage.class_exists(input.class_id).await? {
        return Ok(MutationResult::not_found(ENTITY, "Class not found"));
    }
    if storage.class_is_full(input.class_id, id).await? {
        return Ok(MutationResult::conflict(ENTITY, "This class is already full"));
    }

    match id {
        None => {
            let student = storage.create_student(person_id(&input.id), input).await?;
            info!("Student {} ({}) created", student.id, student.username);
            Ok(MutationResult::created(ENTITY, student.id))
        }
        Some(id) => Ok(match storage.update_student(id, input).await? {
            Some(student) => MutationResult::updated(ENTITY, student.id),
            None => MutationResult::not_found(ENTITY, NOT_FOUND),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::classes::requests::ClassInput;
    use crate::models::users::entities::Sex;
    use crate::storage::sea_orm_storage::test_support::{
        School, memory_storage, profile, seed_school,
    };

    fn input(school: &School, username: &str, class_id: i64) -> StudentInput {
        StudentInput {
            id: None,
            profile: profile(username, None),
            img: None,
            blood_type: "AB".to_string(),
            sex: Sex::Male,
            birthday: chrono::DateTime::from_timestamp(1_000_000_000, 0).unwrap(),
            parent_id: "parent_1".to_string(),
            class_id,
            grade_id: school.grade,
        }
    }

    #[tokio::test]
    async fn test_create_and_conflict() {
        let storage = memory_storage().await;
        let school = seed_school(&storage.db).await;

        let result = create_student(&storage, input(&school, "newkid", school.class_a)).await;
        assert!(result.success());

        let result = create_student(&storage, input(&school, "NewKid", school.class_b)).await;
        assert_eq!(result.error(), Some(DUPLICATE_USERNAME));
    }

    #[tokio::test]
    async fn test_provided_id_already_taken() {
        let storage = memory_storage().await;
        let school = seed_school(&storage.db).await;

        let mut student = input(&school, "fresh", school.class_a);
        student.id = Some(" student_1 ".to_string());
        let result = create_student(&storage, student).await;
        assert_eq!(result.error(), Some("A student with this id already exists"));
    }

    #[tokio::test]
    async fn test_references_must_exist() {
        let storage = memory_storage().await;
        let school = seed_school(&storage.db).await;

        let mut orphan = input(&school, "orphan", school.class_a);
        orphan.parent_id = "nobody".to_string();
        assert_eq!(create_student(&storage, orphan).await.error(), Some("Parent not found"));

        let nowhere = input(&school, "nowhere", 9_999);
        assert_eq!(create_student(&storage, nowhere).await.error(), Some("Class not found"));
    }

    #[tokio::test]
    async fn test_full_class_rejects_new_students() {
        let storage = memory_storage().await;
        let school = seed_school(&storage.db).await;
        let tiny = storage
            .create_class(ClassInput {
                name: "Tiny".to_string(),
                capacity: 1,
                grade_id: school.grade,
                supervisor_id: None,
            })
            .await
            .unwrap();

        assert!(create_student(&storage, input(&school, "first", tiny.id)).await.success());
        let result = create_student(&storage, input(&school, "second", tiny.id)).await;
        assert_eq!(result.error(), Some("This class is already full"));
    }

    #[tokio::test]
    async fn test_update_in_place_and_missing() {
        let storage = memory_storage().await;
        let school = seed_school(&storage.db).await;

        let result = update_student(&storage, "student_1", input(&school, "student_1", school.class_a)).await;
        assert!(result.success());

        let result = update_student(&storage, "ghost", input(&school, "ghost", school.class_a)).await;
        assert_eq!(result.error(), Some(NOT_FOUND));
        assert_eq!(delete_student(&storage, "ghost").await.error(), Some(NOT_FOUND));
    }
}

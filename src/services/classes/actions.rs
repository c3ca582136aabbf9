use tracing::info;

use crate::errors::Result;
use crate::models::MutationResult;
use crate::models::classes::requests::ClassInput;
use crate::services::deletion;
use crate::storage::Storage;
use crate::utils::validate::Validate;

const ENTITY: &str = "class";
const DUPLICATE_NAME: &str = "A class with this name already exists";
const NOT_FOUND: &str = "Class not found";

pub async fn create_class(storage: &dyn Storage, input: ClassInput) -> MutationResult {
    if let Err(errors) = input.validate() {
        return MutationResult::invalid(ENTITY, errors);
    }
    MutationResult::settle(ENTITY, save(storage, None, input).await, DUPLICATE_NAME)
}

pub async fn update_class(storage: &dyn Storage, id: i64, input: ClassInput) -> MutationResult {
    if let Err(errors) = input.validate() {
        return MutationResult::invalid(ENTITY, errors);
    }
    MutationResult::settle(ENTITY, save(storage, Some(id), input).await, DUPLICATE_NAME)
}

pub async fn delete_class(storage: &dyn Storage, id: i64) -> MutationResult {
    deletion(ENTITY, id, NOT_FOUND, storage.delete_class(id).await)
}

async fn save(storage: &dyn Storage, id: Option<i64>, input: ClassInput) -> Result<MutationResult> {
    if storage.class_name_taken(&input.name, id).await? {
        return Ok(MutationResult::conflict(ENTITY, DUPLICATE_NAME));
    }
    if !storage.grade_exists(input.grade_id).await? {
        return Ok(MutationResult::not_found(ENTITY, "Grade not found"));
    }
    if let Some(supervisor) = input.supervisor_id()
        && !storage.teachers_exist(&[supervisor]).await?
    {
        return Ok(MutationResult::not_found(ENTITY, "Supervisor not found"));
    }

    match id {
        None => {
            let class = storage.create_class(input).await?;
            info!("Class {} ({}) created", class.id, class.name);
            Ok(MutationResult::created(ENTITY, class.id))
        }
        Some(id) => Ok(match storage.update_class(id, input).await? {
            Some(class) => MutationResult::updated(ENTITY, class.id),
            None => MutationResult::not_found(ENTITY, NOT_FOUND),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::test_support::{memory_storage, seed_school};

    fn input(name: &str, grade_id: i64, supervisor: Option<&str>) -> ClassInput {
        ClassInput {
            name: name.to_string(),
            capacity: 20,
            grade_id,
            supervisor_id: supervisor.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_rename_to_another_class_fails() {
        let storage = memory_storage().await;
        let school = seed_school(&storage.db).await;

        let result = update_class(&storage, school.class_a, input("2b", school.grade, None)).await;
        assert_eq!(result.error(), Some(DUPLICATE_NAME));

        let result = update_class(&storage, school.class_a, input("1A", school.grade, None)).await;
        assert!(result.success());
    }

    #[tokio::test]
    async fn test_references_must_exist() {
        let storage = memory_storage().await;
        let school = seed_school(&storage.db).await;

        let result = create_class(&storage, input("3C", 9_999, None)).await;
        assert_eq!(result.error(), Some("Grade not found"));

        let result = create_class(&storage, input("3C", school.grade, Some("ghost"))).await;
        assert_eq!(result.error(), Some("Supervisor not found"));

        let result = create_class(&storage, input("3C", school.grade, Some(" "))).await;
        assert!(result.success());
    }

    #[tokio::test]
    async fn test_delete_class_still_in_use() {
        let storage = memory_storage().await;
        let school = seed_school(&storage.db).await;

        let result = delete_class(&storage, school.class_a).await;
        assert!(!result.success());
        assert!(result.error().is_some());

        let result = delete_class(&storage, 9_999).await;
        assert_eq!(result.error(), Some(NOT_FOUND));
    }
}

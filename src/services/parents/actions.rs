use tracing::info;

use crate::errors::Result;
use crate::models::MutationResult;
use crate::models::parents::requests::ParentInput;
use crate::services::{PersonFields, deletion, person_conflict, person_id};
use crate::storage::Storage;
use crate::utils::validate::Validate;

const ENTITY: &str = "parent";
const DUPLICATE_USERNAME: &str = "A parent with this username already exists";
const NOT_FOUND: &str = "Parent not found";

pub async fn create_parent(storage: &dyn Storage, input: ParentInput) -> MutationResult {
    if let Err(errors) = input.validate() {
        return MutationResult::invalid(ENTITY, errors);
    }
    MutationResult::settle(ENTITY, save(storage, None, input).await, DUPLICATE_USERNAME)
}

pub async fn update_parent(storage: &dyn Storage, id: &str, input: ParentInput) -> MutationResult {
    if let Err(errors) = input.validate() {
        return MutationResult::invalid(ENTITY, errors);
    }
    MutationResult::settle(ENTITY, save(storage, Some(id), input).await, DUPLICATE_USERNAME)
}

// 仍有孩子关联的家长不能删除
pub async fn delete_parent(storage: &dyn Storage, id: &str) -> MutationResult {
    deletion(ENTITY, id.to_string(), NOT_FOUND, storage.delete_parent(id).await)
}

async fn save(storage: &dyn Storage, id: Option<&str>, input: ParentInput) -> Result<MutationResult> {
    let fields = PersonFields::new(&input.id, &input.profile, id.is_none());
    if let Some(field) = storage
        .find_parent_conflict(fields.claim(), id)
        .await?
    {
        return Ok(person_conflict(ENTITY, field));
    }

    match id {
        None => {
            let parent = storage.create_parent(person_id(&input.id), input).await?;
            info!("Parent {} ({}) created", parent.id, parent.username);
            Ok(MutationResult::created(ENTITY, parent.id))
        }
        Some(id) => Ok(match storage.update_parent(id, input).await? {
            Some(parent) => MutationResult::updated(ENTITY, parent.id),
            None => MutationResult::not_found(ENTITY, NOT_FOUND),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::test_support::{memory_storage, profile, seed_school};

    fn input(username: &str, email: Option<&str>) -> ParentInput {
        ParentInput {
            id: None,
            profile: profile(username, email),
        }
    }

    #[tokio::test]
    async fn test_create_update_delete() {
        let storage = memory_storage().await;
        seed_school(&storage.db).await;

        let created = create_parent(&storage, input("pat", Some("pat@home.org"))).await;
        assert!(created.success());
        let Some(crate::models::RecordId::Person(id)) = created.id().cloned() else {
            panic!("expected a person id");
        };

        let clash = create_parent(&storage, input("pat2", Some("PAT@home.org"))).await;
        assert_eq!(clash.error(), Some("A parent with this email already exists"));

        assert!(update_parent(&storage, &id, input("pat", None)).await.success());
        assert!(delete_parent(&storage, &id).await.success());
        assert_eq!(delete_parent(&storage, &id).await.error(), Some(NOT_FOUND));
    }

    #[tokio::test]
    async fn test_phone_conflict() {
        let storage = memory_storage().await;
        seed_school(&storage.db).await;

        let mut first = input("pat", None);
        first.profile.phone = Some("+44 20 7946 0000".to_string());
        assert!(create_parent(&storage, first).await.success());

        let mut second = input("sam", None);
        second.profile.phone = Some("+44 20 7946 0000".to_string());
        let result = create_parent(&storage, second).await;
        assert_eq!(result.error(), Some("A parent with this phone already exists"));
    }

    #[tokio::test]
    async fn test_parent_with_children_is_kept() {
        let storage = memory_storage().await;
        seed_school(&storage.db).await;

        let result = delete_parent(&storage, "parent_1").await;
        assert!(!result.success());
        assert!(result.error().is_some());
    }
}

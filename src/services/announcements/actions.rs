use tracing::info;

use crate::errors::Result;
use crate::models::MutationResult;
use crate::models::announcements::requests::AnnouncementInput;
use crate::services::deletion;
use crate::storage::Storage;
use crate::utils::validate::Validate;

const ENTITY: &str = "announcement";
const DUPLICATE: &str = "This announcement already exists";
const NOT_FOUND: &str = "Announcement not found";

pub async fn create_announcement(storage: &dyn Storage, input: AnnouncementInput) -> MutationResult {
    if let Err(errors) = input.validate() {
        return MutationResult::invalid(ENTITY, errors);
    }
    MutationResult::settle(ENTITY, save(storage, None, input).await, DUPLICATE)
}

pub async fn update_announcement(
    storage: &dyn Storage,
    id: i64,
    input: AnnouncementInput,
) -> MutationResult {
    if let Err(errors) = input.validate() {
        return MutationResult::invalid(ENTITY, errors);
    }
    MutationResult::settle(ENTITY, save(storage, Some(id), input).await, DUPLICATE)
}

pub async fn delete_announcement(storage: &dyn Storage, id: i64) -> MutationResult {
    deletion(ENTITY, id, NOT_FOUND, storage.delete_announcement(id).await)
}

async fn save(
    storage: &dyn Storage,
    id: Option<i64>,
    input: AnnouncementInput,
) -> Result<MutationResult> {
    if let Some(class_id) = input.class_id
        && !storage.class_exists(class_id).await?
    {
        return Ok(MutationResult::not_found(ENTITY, "Class not found"));
    }

    match id {
        None => {
            let announcement = storage.create_announcement(input).await?;
            info!("Announcement {} published", announcement.id);
            Ok(MutationResult::created(ENTITY, announcement.id))
        }
        Some(id) => Ok(match storage.update_announcement(id, input).await? {
            Some(announcement) => MutationResult::updated(ENTITY, announcement.id),
            None => MutationResult::not_found(ENTITY, NOT_FOUND),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::test_support::{MONDAY_8AM, memory_storage, seed_school};

    fn input(title: &str, class_id: Option<i64>) -> AnnouncementInput {
        AnnouncementInput {
            title: title.to_string(),
            description: "Bring a coat".to_string(),
            date: chrono::DateTime::from_timestamp(MONDAY_8AM, 0).unwrap(),
            class_id,
        }
    }

    #[tokio::test]
    async fn test_create_validates_and_checks_class() {
        let storage = memory_storage().await;
        let school = seed_school(&storage.db).await;

        let body = serde_json::to_value(create_announcement(&storage, input(" ", None)).await).unwrap();
        assert_eq!(body["fieldErrors"]["title"], "Title is required");

        assert_eq!(
            create_announcement(&storage, input("Trip", Some(9_999))).await.error(),
            Some("Class not found")
        );
        assert!(create_announcement(&storage, input("Trip", Some(school.class_a))).await.success());
    }

    #[tokio::test]
    async fn test_delete_missing() {
        let storage = memory_storage().await;
        seed_school(&storage.db).await;

        assert_eq!(delete_announcement(&storage, 9_999).await.error(), Some(NOT_FOUND));
        assert_eq!(
            update_announcement(&storage, 9_999, input("Late", None)).await.error(),
            Some(NOT_FOUND)
        );
    }
}

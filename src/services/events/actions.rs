use tracing::info;

use crate::errors::Result;
use crate::models::MutationResult;
use crate::models::events::requests::EventInput;
use crate::services::deletion;
use crate::storage::Storage;
use crate::utils::validate::Validate;

const ENTITY: &str = "event";
const DUPLICATE: &str = "This event already exists";
const NOT_FOUND: &str = "Event not found";

pub async fn create_event(storage: &dyn Storage, input: EventInput) -> MutationResult {
    if let Err(errors) = input.validate() {
        return MutationResult::invalid(ENTITY, errors);
    }
    MutationResult::settle(ENTITY, save(storage, None, input).await, DUPLICATE)
}

pub async fn update_event(storage: &dyn Storage, id: i64, input: EventInput) -> MutationResult {
    if let Err(errors) = input.validate() {
        return MutationResult::invalid(ENTITY, errors);
    }
    MutationResult::settle(ENTITY, save(storage, Some(id), input).await, DUPLICATE)
}

pub async fn delete_event(storage: &dyn Storage, id: i64) -> MutationResult {
    deletion(ENTITY, id, NOT_FOUND, storage.delete_event(id).await)
}

async fn save(storage: &dyn Storage, id: Option<i64>, input: EventInput) -> Result<MutationResult> {
    // 不指定班级即为全校活动
    if let Some(class_id) = input.class_id
        && !storage.class_exists(class_id).await?
    {
        return Ok(MutationResult::not_found(ENTITY, "Class not found"));
    }

    match id {
        None => {
            let event = storage.create_event(input).await?;
            info!("Event {} ({}) created", event.id, event.title);
            Ok(MutationResult::created(ENTITY, event.id))
        }
        Some(id) => Ok(match storage.update_event(id, input).await? {
            Some(event) => MutationResult::updated(ENTITY, event.id),
            None => MutationResult::not_found(ENTITY, NOT_FOUND),
        }),
    }
}

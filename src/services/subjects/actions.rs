use tracing::info;

use crate::errors::Result;
use crate::models::MutationResult;
use crate::models::subjects::requests::SubjectInput;
use crate::services::deletion;
use crate::storage::Storage;
use crate::utils::validate::Validate;

const ENTITY: &str = "subject";
const DUPLICATE_NAME: &str = "A subject with this name already exists";
const NOT_FOUND: &str = "Subject not found";

pub async fn create_subject(storage: &dyn Storage, input: SubjectInput) -> MutationResult {
    if let Err(errors) = input.validate() {
        return MutationResult::invalid(ENTITY, errors);
    }
    MutationResult::settle(ENTITY, save(storage, None, input).await, DUPLICATE_NAME)
}

pub async fn update_subject(storage: &dyn Storage, id: i64, input: SubjectInput) -> MutationResult {
    if let Err(errors) = input.validate() {
        return MutationResult::invalid(ENTITY, errors);
    }
    MutationResult::settle(ENTITY, save(storage, Some(id), input).await, DUPLICATE_NAME)
}

pub async fn delete_subject(storage: &dyn Storage, id: i64) -> MutationResult {
    deletion(ENTITY, id, NOT_FOUND, storage.delete_subject(id).await)
}

async fn save(storage: &dyn Storage, id: Option<i64>, input: SubjectInput) -> Result<MutationResult> {
    if storage.subject_name_taken(&input.name(), id).await? {
        return Ok(MutationResult::conflict(ENTITY, DUPLICATE_NAME));
    }
    if !storage.teachers_exist(&input.teachers).await? {
        return Ok(MutationResult::not_found(ENTITY, "Teacher not found"));
    }

    match id {
        None => {
            let subject = storage.create_subject(input).await?;
            info!("Subject {} created", subject.id);
            Ok(MutationResult::created(ENTITY, subject.id))
        }
        Some(id) => Ok(match storage.update_subject(id, input).await? {
            Some(subject) => MutationResult::updated(ENTITY, subject.id),
            None => MutationResult::not_found(ENTITY, NOT_FOUND),
        }),
    }
}

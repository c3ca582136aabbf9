use tracing::info;

use crate::errors::Result;
use crate::models::MutationResult;
use crate::models::teachers::requests::TeacherInput;
use crate::services::{PersonFields, deletion, person_conflict, person_id};
use crate::storage::Storage;
use crate::utils::validate::Validate;

const ENTITY: &str = "teacher";
const DUPLICATE_USERNAME: &str = "A teacher with this username already exists";
const NOT_FOUND: &str = "Teacher not found";

pub async fn create_teacher(storage: &dyn Storage, input: TeacherInput) -> MutationResult {
    if let Err(errors) = input.validate() {
        return MutationResult::invalid(ENTITY, errors);
    }
    MutationResult::settle(ENTITY, save(storage, None, input).await, DUPLICATE_USERNAME)
}

pub async fn update_teacher(storage: &dyn Storage, id: &str, input: TeacherInput) -> MutationResult {
    if let Err(errors) = input.validate() {
        return MutationResult::invalid(ENTITY, errors);
    }
    MutationResult::settle(ENTITY, save(storage, Some(id), input).await, DUPLICATE_USERNAME)
}

pub async fn delete_teacher(storage: &dyn Storage, id: &str) -> MutationResult {
    deletion(ENTITY, id.to_string(), NOT_FOUND, storage.delete_teacher(id).await)
}

async fn save(storage: &dyn Storage, id: Option<&str>, input: TeacherInput) -> Result<MutationResult> {
    let fields = PersonFields::new(&input.id, &input.profile, id.is_none());
    if let Some(field) = storage
        .find_teacher_conflict(fields.claim(), id)
        .await?
    {
        return Ok(person_conflict(ENTITY, field));
    }
    if !storage.subjects_exist(&input.subjects).await? {
        return Ok(MutationResult::not_found(ENTITY, "Subject not found"));
    }

    match id {
        None => {
            let teacher = storage.create_teacher(person_id(&input.id), input).await?;
            info!("Teacher {} ({}) created", teacher.id, teacher.username);
            Ok(MutationResult::created(ENTITY, teacher.id))
        }
        Some(id) => Ok(match storage.update_teacher(id, input).await? {
            Some(teacher) => MutationResult::updated(ENTITY, teacher.id),
            None => MutationResult::not_found(ENTITY, NOT_FOUND),
        }),
    }
}

use sea_orm::Condition;
use tracing::info;

use crate::errors::Result;
use crate::filters;
use crate::models::MutationResult;
use crate::models::assignments::requests::{AssignmentInput, AssignmentListParams};
use crate::models::lessons::requests::LessonListParams;
use crate::models::users::entities::Viewer;
use crate::services::deletion;
use crate::storage::Storage;
use crate::utils::validate::Validate;

const ENTITY: &str = "assignment";
const DUPLICATE: &str = "This assignment already exists";
const NOT_FOUND: &str = "Assignment not found";

fn assignment_scope(viewer: &Viewer) -> Condition {
    filters::assignment_condition(viewer, &AssignmentListParams::default())
}

pub async fn create_assignment(
    storage: &dyn Storage,
    viewer: &Viewer,
    input: AssignmentInput,
) -> MutationResult {
    if let Err(errors) = input.validate() {
        return MutationResult::invalid(ENTITY, errors);
    }
    MutationResult::settle(ENTITY, save(storage, viewer, None, input).await, DUPLICATE)
}

pub async fn update_assignment(
    storage: &dyn Storage,
    viewer: &Viewer,
    id: i64,
    input: AssignmentInput,
) -> MutationResult {
    if let Err(errors) = input.validate() {
        return MutationResult::invalid(ENTITY, errors);
    }
    MutationResult::settle(ENTITY, save(storage, viewer, Some(id), input).await, DUPLICATE)
}

pub async fn delete_assignment(storage: &dyn Storage, viewer: &Viewer, id: i64) -> MutationResult {
    match storage.assignment_in_scope(id, assignment_scope(viewer)).await {
        Ok(true) => deletion(ENTITY, id, NOT_FOUND, storage.delete_assignment(id).await),
        Ok(false) => MutationResult::not_found(ENTITY, NOT_FOUND),
        Err(e) => MutationResult::from_error(ENTITY, e, DUPLICATE),
    }
}

async fn save(
    storage: &dyn Storage,
    viewer: &Viewer,
    id: Option<i64>,
    input: AssignmentInput,
) -> Result<MutationResult> {
    if let Some(id) = id
        && !storage.assignment_in_scope(id, assignment_scope(viewer)).await?
    {
        return Ok(MutationResult::not_found(ENTITY, NOT_FOUND));
    }
    let lessons = filters::lesson_condition(viewer, &LessonListParams::default());
    if !storage.lesson_in_scope(input.lesson_id, lessons).await? {
        return Ok(MutationResult::not_found(ENTITY, "Lesson not found"));
    }

    match id {
        None => {
            let assignment = storage.create_assignment(input).await?;
            info!("Assignment {} created by {}", assignment.id, viewer.user_id);
            Ok(MutationResult::created(ENTITY, assignment.id))
        }
        Some(id) => Ok(match storage.update_assignment(id, input).await? {
            Some(assignment) => MutationResult::updated(ENTITY, assignment.id),
            None => MutationResult::not_found(ENTITY, NOT_FOUND),
        }),
    }
}

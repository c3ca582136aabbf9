use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{mutation_response, read_response};
use crate::errors::Result;
use crate::models::MutationResult;
use crate::models::grades::requests::GradeInput;
use crate::storage::Storage;
use crate::utils::validate::Validate;

const ENTITY: &str = "grade";
const DUPLICATE_LEVEL: &str = "A grade with this level already exists";

define_service!(GradeService);

impl GradeService {
    // 年级按级别排序，表单下拉使用
    pub async fn list_grades(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = match self.get_storage(request) {
            Ok(storage) => storage,
            Err(resp) => return Ok(resp),
        };
        Ok(read_response("grades", storage.list_grades().await))
    }

    pub async fn create_grade(
        &self,
        request: &HttpRequest,
        input: GradeInput,
    ) -> ActixResult<HttpResponse> {
        let storage = match self.get_storage(request) {
            Ok(storage) => storage,
            Err(resp) => return Ok(resp),
        };
        Ok(mutation_response(create_grade(storage.as_ref(), input).await))
    }
}

pub async fn create_grade(storage: &dyn Storage, input: GradeInput) -> MutationResult {
    if let Err(errors) = input.validate() {
        return MutationResult::invalid(ENTITY, errors);
    }
    MutationResult::settle(ENTITY, save(storage, input).await, DUPLICATE_LEVEL)
}

async fn save(storage: &dyn Storage, input: GradeInput) -> Result<MutationResult> {
    if storage.grade_level_taken(input.level).await? {
        return Ok(MutationResult::conflict(ENTITY, DUPLICATE_LEVEL));
    }
    let grade = storage.create_grade(input).await?;
    info!("Grade {} created", grade.level);
    Ok(MutationResult::created(ENTITY, grade.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::test_support::memory_storage;

    #[tokio::test]
    async fn test_grade_levels_are_unique() {
        let storage = memory_storage().await;

        assert!(create_grade(&storage, GradeInput { level: 3 }).await.success());
        let again = create_grade(&storage, GradeInput { level: 3 }).await;
        assert_eq!(again.error(), Some(DUPLICATE_LEVEL));

        let out_of_range = create_grade(&storage, GradeInput { level: 13 }).await;
        assert_eq!(out_of_range.error(), Some("Validation failed"));
        assert_eq!(storage.list_grades().await.unwrap().len(), 1);
    }
}

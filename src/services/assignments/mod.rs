pub mod actions;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{mutation_response, page_size, read_response};
use crate::filters;
use crate::models::assignments::requests::{AssignmentInput, AssignmentListParams};

define_service!(AssignmentService);

impl AssignmentService {
    pub async fn list_assignments(
        &self,
        request: &HttpRequest,
        params: AssignmentListParams,
    ) -> ActixResult<HttpResponse> {
        let (storage, viewer) = match self.context(request) {
            Ok(ctx) => ctx,
            Err(resp) => return Ok(resp),
        };

        let cond = filters::assignment_condition(&viewer, &params);
        let page = storage
            .list_assignments(cond, params.pagination.page(), page_size())
            .await;
        Ok(read_response("assignments", page))
    }

    // 教师只能为自己任教的课程布置作业
    pub async fn create_assignment(
        &self,
        request: &HttpRequest,
        input: AssignmentInput,
    ) -> ActixResult<HttpResponse> {
        let (storage, viewer) = match self.context(request) {
            Ok(ctx) => ctx,
            Err(resp) => return Ok(resp),
        };
        Ok(mutation_response(
            actions::create_assignment(storage.as_ref(), &viewer, input).await,
        ))
    }

    pub async fn update_assignment(
        &self,
        request: &HttpRequest,
        id: i64,
        input: AssignmentInput,
    ) -> ActixResult<HttpResponse> {
        let (storage, viewer) = match self.context(request) {
            Ok(ctx) => ctx,
            Err(resp) => return Ok(resp),
        };
        Ok(mutation_response(
            actions::update_assignment(storage.as_ref(), &viewer, id, input).await,
        ))
    }

    pub async fn delete_assignment(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        let (storage, viewer) = match self.context(request) {
            Ok(ctx) => ctx,
            Err(resp) => return Ok(resp),
        };
        Ok(mutation_response(
            actions::delete_assignment(storage.as_ref(), &viewer, id).await,
        ))
    }
}

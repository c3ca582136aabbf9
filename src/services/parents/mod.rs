pub mod actions;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{mutation_response, page_size, read_response};
use crate::filters;
use crate::models::parents::requests::{ParentInput, ParentListParams};

define_service!(ParentService);

impl ParentService {
    // 教师看到授课班级学生的家长，学生只看到自己的家长，家长只看到自己
    pub async fn list_parents(
        &self,
        request: &HttpRequest,
        params: ParentListParams,
    ) -> ActixResult<HttpResponse> {
        let (storage, viewer) = match self.context(request) {
            Ok(ctx) => ctx,
            Err(resp) => return Ok(resp),
        };

        let cond = filters::parent_condition(&viewer, &params);
        let page = storage
            .list_parents(cond, params.pagination.page(), page_size())
            .await;
        Ok(read_response("parents", page))
    }

    pub async fn create_parent(
        &self,
        request: &HttpRequest,
        input: ParentInput,
    ) -> ActixResult<HttpResponse> {
        let storage = match self.get_storage(request) {
            Ok(storage) => storage,
            Err(resp) => return Ok(resp),
        };
        Ok(mutation_response(
            actions::create_parent(storage.as_ref(), input).await,
        ))
    }

    pub async fn update_parent(
        &self,
        request: &HttpRequest,
        id: String,
        input: ParentInput,
    ) -> ActixResult<HttpResponse> {
        let storage = match self.get_storage(request) {
            Ok(storage) => storage,
            Err(resp) => return Ok(resp),
        };
        Ok(mutation_response(
            actions::update_parent(storage.as_ref(), &id, input).await,
        ))
    }

    pub async fn delete_parent(
        &self,
        request: &HttpRequest,
        id: String,
    ) -> ActixResult<HttpResponse> {
        let storage = match self.get_storage(request) {
            Ok(storage) => storage,
            Err(resp) => return Ok(resp),
        };
        Ok(mutation_response(
            actions::delete_parent(storage.as_ref(), &id).await,
        ))
    }
}

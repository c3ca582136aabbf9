pub mod actions;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{mutation_response, page_size, read_response};
use crate::filters;
use crate::models::subjects::requests::{SubjectInput, SubjectListParams};

define_service!(SubjectService);

impl SubjectService {
    // 科目列表（所有角色可见）
    pub async fn list_subjects(
        &self,
        request: &HttpRequest,
        params: SubjectListParams,
    ) -> ActixResult<HttpResponse> {
        let (storage, viewer) = match self.context(request) {
            Ok(ctx) => ctx,
            Err(resp) => return Ok(resp),
        };

        let cond = filters::subject_condition(&viewer, &params);
        let page = storage
            .list_subjects(cond, params.pagination.page(), page_size())
            .await;
        Ok(read_response("subjects", page))
    }

    // 按名称排序的 {id, name}，用于表单下拉与定位新行所在页
    pub async fn list_names(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = match self.get_storage(request) {
            Ok(storage) => storage,
            Err(resp) => return Ok(resp),
        };
        Ok(read_response(
            "subject names",
            storage.list_subject_names().await,
        ))
    }

    pub async fn create_subject(
        &self,
        request: &HttpRequest,
        input: SubjectInput,
    ) -> ActixResult<HttpResponse> {
        let storage = match self.get_storage(request) {
            Ok(storage) => storage,
            Err(resp) => return Ok(resp),
        };
        Ok(mutation_response(
            actions::create_subject(storage.as_ref(), input).await,
        ))
    }

    pub async fn update_subject(
        &self,
        request: &HttpRequest,
        id: i64,
        input: SubjectInput,
    ) -> ActixResult<HttpResponse> {
        let storage = match self.get_storage(request) {
            Ok(storage) => storage,
            Err(resp) => return Ok(resp),
        };
        Ok(mutation_response(
            actions::update_subject(storage.as_ref(), id, input).await,
        ))
    }

    pub async fn delete_subject(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        let storage = match self.get_storage(request) {
            Ok(storage) => storage,
            Err(resp) => return Ok(resp),
        };
        Ok(mutation_response(
            actions::delete_subject(storage.as_ref(), id).await,
        ))
    }
}

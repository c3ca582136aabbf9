pub mod actions;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{detail_response, mutation_response, page_size, read_response};
use crate::filters;
use crate::models::ErrorCode;
use crate::models::teachers::requests::{TeacherInput, TeacherListParams};

define_service!(TeacherService);

impl TeacherService {
    // 教师目录对所有角色开放
    pub async fn list_teachers(
        &self,
        request: &HttpRequest,
        params: TeacherListParams,
    ) -> ActixResult<HttpResponse> {
        let (storage, viewer) = match self.context(request) {
            Ok(ctx) => ctx,
            Err(resp) => return Ok(resp),
        };

        let cond = filters::teacher_condition(&viewer, &params);
        let page = storage
            .list_teachers(cond, params.pagination.page(), page_size())
            .await;
        Ok(read_response("teachers", page))
    }

    pub async fn get_teacher(&self, request: &HttpRequest, id: String) -> ActixResult<HttpResponse> {
        let (storage, viewer) = match self.context(request) {
            Ok(ctx) => ctx,
            Err(resp) => return Ok(resp),
        };

        let scope = filters::teacher_condition(&viewer, &TeacherListParams::default());
        Ok(detail_response(
            "Teacher",
            (ErrorCode::TeacherNotFound, "Teacher not found"),
            storage.get_teacher_detail(&id, scope).await,
        ))
    }

    pub async fn list_names(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = match self.get_storage(request) {
            Ok(storage) => storage,
            Err(resp) => return Ok(resp),
        };
        Ok(read_response(
            "teacher names",
            storage.list_teacher_names().await,
        ))
    }

    pub async fn create_teacher(
        &self,
        request: &HttpRequest,
        input: TeacherInput,
    ) -> ActixResult<HttpResponse> {
        let storage = match self.get_storage(request) {
            Ok(storage) => storage,
            Err(resp) => return Ok(resp),
        };
        Ok(mutation_response(
            actions::create_teacher(storage.as_ref(), input).await,
        ))
    }

    pub async fn update_teacher(
        &self,
        request: &HttpRequest,
        id: String,
        input: TeacherInput,
    ) -> ActixResult<HttpResponse> {
        let storage = match self.get_storage(request) {
            Ok(storage) => storage,
            Err(resp) => return Ok(resp),
        };
        Ok(mutation_response(
            actions::update_teacher(storage.as_ref(), &id, input).await,
        ))
    }

    pub async fn delete_teacher(
        &self,
        request: &HttpRequest,
        id: String,
    ) -> ActixResult<HttpResponse> {
        let storage = match self.get_storage(request) {
            Ok(storage) => storage,
            Err(resp) => return Ok(resp),
        };
        Ok(mutation_response(
            actions::delete_teacher(storage.as_ref(), &id).await,
        ))
    }
}

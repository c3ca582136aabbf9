pub mod actions;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{detail_response, mutation_response, page_size, read_response};
use crate::filters;
use crate::models::ErrorCode;
use crate::models::students::requests::{StudentInput, StudentListParams};

define_service!(StudentService);

impl StudentService {
    // 教师看到授课班级的学生，学生看到同班同学，家长只看到自己的孩子
    pub async fn list_students(
        &self,
        request: &HttpRequest,
        params: StudentListParams,
    ) -> ActixResult<HttpResponse> {
        let (storage, viewer) = match self.context(request) {
            Ok(ctx) => ctx,
            Err(resp) => return Ok(resp),
        };

        let cond = filters::student_condition(&viewer, &params);
        let page = storage
            .list_students(cond, params.pagination.page(), page_size())
            .await;
        Ok(read_response("students", page))
    }

    // 详情与列表使用相同的可见范围
    pub async fn get_student(&self, request: &HttpRequest, id: String) -> ActixResult<HttpResponse> {
        let (storage, viewer) = match self.context(request) {
            Ok(ctx) => ctx,
            Err(resp) => return Ok(resp),
        };

        let scope = filters::student_condition(&viewer, &StudentListParams::default());
        Ok(detail_response(
            "Student",
            (ErrorCode::StudentNotFound, "Student not found"),
            storage.get_student_detail(&id, scope).await,
        ))
    }

    pub async fn create_student(
        &self,
        request: &HttpRequest,
        input: StudentInput,
    ) -> ActixResult<HttpResponse> {
        let storage = match self.get_storage(request) {
            Ok(storage) => storage,
            Err(resp) => return Ok(resp),
        };
        Ok(mutation_response(
            actions::create_student(storage.as_ref(), input).await,
        ))
    }

    pub async fn update_student(
        &self,
        request: &HttpRequest,
        id: String,
        input: StudentInput,
    ) -> ActixResult<HttpResponse> {
        let storage = match self.get_storage(request) {
            Ok(storage) => storage,
            Err(resp) => return Ok(resp),
        };
        Ok(mutation_response(
            actions::update_student(storage.as_ref(), &id, input).await,
        ))
    }

    pub async fn delete_student(
        &self,
        request: &HttpRequest,
        id: String,
    ) -> ActixResult<HttpResponse> {
        let storage = match self.get_storage(request) {
            Ok(storage) => storage,
            Err(resp) => return Ok(resp),
        };
        Ok(mutation_response(
            actions::delete_student(storage.as_ref(), &id).await,
        ))
    }
}

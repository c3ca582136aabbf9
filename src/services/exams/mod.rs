pub mod actions;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{mutation_response, page_size, read_response};
use crate::filters;
use crate::models::exams::requests::{ExamInput, ExamListParams};

define_service!(ExamService);

impl ExamService {
    pub async fn list_exams(
        &self,
        request: &HttpRequest,
        params: ExamListParams,
    ) -> ActixResult<HttpResponse> {
        let (storage, viewer) = match self.context(request) {
            Ok(ctx) => ctx,
            Err(resp) => return Ok(resp),
        };

        let cond = filters::exam_condition(&viewer, &params);
        let page = storage
            .list_exams(cond, params.pagination.page(), page_size())
            .await;
        Ok(read_response("exams", page))
    }

    // 教师只能为自己任教的课程安排考试
    pub async fn create_exam(
        &self,
        request: &HttpRequest,
        input: ExamInput,
    ) -> ActixResult<HttpResponse> {
        let (storage, viewer) = match self.context(request) {
            Ok(ctx) => ctx,
            Err(resp) => return Ok(resp),
        };
        Ok(mutation_response(
            actions::create_exam(storage.as_ref(), &viewer, input).await,
        ))
    }

    pub async fn update_exam(
        &self,
        request: &HttpRequest,
        id: i64,
        input: ExamInput,
    ) -> ActixResult<HttpResponse> {
        let (storage, viewer) = match self.context(request) {
            Ok(ctx) => ctx,
            Err(resp) => return Ok(resp),
        };
        Ok(mutation_response(
            actions::update_exam(storage.as_ref(), &viewer, id, input).await,
        ))
    }

    pub async fn delete_exam(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        let (storage, viewer) = match self.context(request) {
            Ok(ctx) => ctx,
            Err(resp) => return Ok(resp),
        };
        Ok(mutation_response(
            actions::delete_exam(storage.as_ref(), &viewer, id).await,
        ))
    }
}

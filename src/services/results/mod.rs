pub mod actions;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{mutation_response, page_size, read_response};
use crate::filters;
use crate::models::results::requests::{ResultInput, ResultListParams};

define_service!(ResultService);

impl ResultService {
    pub async fn list_results(
        &self,
        request: &HttpRequest,
        params: ResultListParams,
    ) -> ActixResult<HttpResponse> {
        let (storage, viewer) = match self.context(request) {
            Ok(ctx) => ctx,
            Err(resp) => return Ok(resp),
        };

        let cond = filters::result_condition(&viewer, &params);
        let page = storage
            .list_results(cond, params.pagination.page(), page_size())
            .await;
        Ok(read_response("results", page))
    }

    // 教师只能为自己课程下的考试或作业、授课班级的学生登记成绩
    pub async fn create_result(
        &self,
        request: &HttpRequest,
        input: ResultInput,
    ) -> ActixResult<HttpResponse> {
        let (storage, viewer) = match self.context(request) {
            Ok(ctx) => ctx,
            Err(resp) => return Ok(resp),
        };
        Ok(mutation_response(
            actions::create_result(storage.as_ref(), &viewer, input).await,
        ))
    }

    pub async fn update_result(
        &self,
        request: &HttpRequest,
        id: i64,
        input: ResultInput,
    ) -> ActixResult<HttpResponse> {
        let (storage, viewer) = match self.context(request) {
            Ok(ctx) => ctx,
            Err(resp) => return Ok(resp),
        };
        Ok(mutation_response(
            actions::update_result(storage.as_ref(), &viewer, id, input).await,
        ))
    }

    pub async fn delete_result(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        let (storage, viewer) = match self.context(request) {
            Ok(ctx) => ctx,
            Err(resp) => return Ok(resp),
        };
        Ok(mutation_response(
            actions::delete_result(storage.as_ref(), &viewer, id).await,
        ))
    }
}

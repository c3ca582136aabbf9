pub mod actions;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{mutation_response, page_size, read_response};
use crate::filters;
use crate::models::lessons::requests::{LessonInput, LessonListParams, ScheduleParams};

define_service!(LessonService);

impl LessonService {
    pub async fn list_lessons(
        &self,
        request: &HttpRequest,
        params: LessonListParams,
    ) -> ActixResult<HttpResponse> {
        let (storage, viewer) = match self.context(request) {
            Ok(ctx) => ctx,
            Err(resp) => return Ok(resp),
        };

        let cond = filters::lesson_condition(&viewer, &params);
        let page = storage
            .list_lessons(cond, params.pagination.page(), page_size())
            .await;
        Ok(read_response("lessons", page))
    }

    // 日历课表：不分页，可见范围与课程列表一致
    pub async fn schedule(
        &self,
        request: &HttpRequest,
        params: ScheduleParams,
    ) -> ActixResult<HttpResponse> {
        let (storage, viewer) = match self.context(request) {
            Ok(ctx) => ctx,
            Err(resp) => return Ok(resp),
        };

        let cond = filters::lesson_condition(&viewer, &params.into());
        Ok(read_response("schedule", storage.list_schedule(cond).await))
    }

    pub async fn create_lesson(
        &self,
        request: &HttpRequest,
        input: LessonInput,
    ) -> ActixResult<HttpResponse> {
        let storage = match self.get_storage(request) {
            Ok(storage) => storage,
            Err(resp) => return Ok(resp),
        };
        Ok(mutation_response(
            actions::create_lesson(storage.as_ref(), input).await,
        ))
    }

    pub async fn update_lesson(
        &self,
        request: &HttpRequest,
        id: i64,
        input: LessonInput,
    ) -> ActixResult<HttpResponse> {
        let storage = match self.get_storage(request) {
            Ok(storage) => storage,
            Err(resp) => return Ok(resp),
        };
        Ok(mutation_response(
            actions::update_lesson(storage.as_ref(), id, input).await,
        ))
    }

    pub async fn delete_lesson(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        let storage = match self.get_storage(request) {
            Ok(storage) => storage,
            Err(resp) => return Ok(resp),
        };
        Ok(mutation_response(
            actions::delete_lesson(storage.as_ref(), id).await,
        ))
    }
}

pub mod actions;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{mutation_response, page_size, read_response};
use crate::filters;
use crate::models::attendance::requests::{AttendanceInput, AttendanceListParams};

define_service!(AttendanceService);

impl AttendanceService {
    pub async fn list_attendance(
        &self,
        request: &HttpRequest,
        params: AttendanceListParams,
    ) -> ActixResult<HttpResponse> {
        let (storage, viewer) = match self.context(request) {
            Ok(ctx) => ctx,
            Err(resp) => return Ok(resp),
        };

        let cond = filters::attendance_condition(&viewer, &params);
        let page = storage
            .list_attendance(cond, params.pagination.page(), page_size())
            .await;
        Ok(read_response("attendance", page))
    }

    // 教师只能为自己任教的课程记录考勤
    pub async fn create_attendance(
        &self,
        request: &HttpRequest,
        input: AttendanceInput,
    ) -> ActixResult<HttpResponse> {
        let (storage, viewer) = match self.context(request) {
            Ok(ctx) => ctx,
            Err(resp) => return Ok(resp),
        };
        Ok(mutation_response(
            actions::create_attendance(storage.as_ref(), &viewer, input).await,
        ))
    }

    pub async fn update_attendance(
        &self,
        request: &HttpRequest,
        id: i64,
        input: AttendanceInput,
    ) -> ActixResult<HttpResponse> {
        let (storage, viewer) = match self.context(request) {
            Ok(ctx) => ctx,
            Err(resp) => return Ok(resp),
        };
        Ok(mutation_response(
            actions::update_attendance(storage.as_ref(), &viewer, id, input).await,
        ))
    }

    pub async fn delete_attendance(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        let (storage, viewer) = match self.context(request) {
            Ok(ctx) => ctx,
            Err(resp) => return Ok(resp),
        };
        Ok(mutation_response(
            actions::delete_attendance(storage.as_ref(), &viewer, id).await,
        ))
    }
}

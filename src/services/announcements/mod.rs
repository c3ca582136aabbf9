pub mod actions;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{mutation_response, page_size, read_response};
use crate::filters;
use crate::models::announcements::requests::{AnnouncementInput, AnnouncementListParams};

define_service!(AnnouncementService);

impl AnnouncementService {
    // 全校公告所有人可见，班级公告只对相关班级可见
    pub async fn list_announcements(
        &self,
        request: &HttpRequest,
        params: AnnouncementListParams,
    ) -> ActixResult<HttpResponse> {
        let (storage, viewer) = match self.context(request) {
            Ok(ctx) => ctx,
            Err(resp) => return Ok(resp),
        };

        let cond = filters::announcement_condition(&viewer, &params);
        let page = storage
            .list_announcements(cond, params.pagination.page(), page_size())
            .await;
        Ok(read_response("announcements", page))
    }

    pub async fn create_announcement(
        &self,
        request: &HttpRequest,
        input: AnnouncementInput,
    ) -> ActixResult<HttpResponse> {
        let storage = match self.get_storage(request) {
            Ok(storage) => storage,
            Err(resp) => return Ok(resp),
        };
        Ok(mutation_response(
            actions::create_announcement(storage.as_ref(), input).await,
        ))
    }

    pub async fn update_announcement(
        &self,
        request: &HttpRequest,
        id: i64,
        input: AnnouncementInput,
    ) -> ActixResult<HttpResponse> {
        let storage = match self.get_storage(request) {
            Ok(storage) => storage,
            Err(resp) => return Ok(resp),
        };
        Ok(mutation_response(
            actions::update_announcement(storage.as_ref(), id, input).await,
        ))
    }

    pub async fn delete_announcement(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        let storage = match self.get_storage(request) {
            Ok(storage) => storage,
            Err(resp) => return Ok(resp),
        };
        Ok(mutation_response(
            actions::delete_announcement(storage.as_ref(), id).await,
        ))
    }
}

pub mod actions;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{mutation_response, page_size, read_response};
use crate::filters;
use crate::models::events::requests::{EventInput, EventListParams};

define_service!(EventService);

impl EventService {
    // 全校活动所有人可见，班级活动只对相关班级可见
    pub async fn list_events(
        &self,
        request: &HttpRequest,
        params: EventListParams,
    ) -> ActixResult<HttpResponse> {
        let (storage, viewer) = match self.context(request) {
            Ok(ctx) => ctx,
            Err(resp) => return Ok(resp),
        };

        let cond = filters::event_condition(&viewer, &params);
        let page = storage
            .list_events(cond, params.pagination.page(), page_size())
            .await;
        Ok(read_response("events", page))
    }

    pub async fn create_event(
        &self,
        request: &HttpRequest,
        input: EventInput,
    ) -> ActixResult<HttpResponse> {
        let storage = match self.get_storage(request) {
            Ok(storage) => storage,
            Err(resp) => return Ok(resp),
        };
        Ok(mutation_response(
            actions::create_event(storage.as_ref(), input).await,
        ))
    }

    pub async fn update_event(
        &self,
        request: &HttpRequest,
        id: i64,
        input: EventInput,
    ) -> ActixResult<HttpResponse> {
        let storage = match self.get_storage(request) {
            Ok(storage) => storage,
            Err(resp) => return Ok(resp),
        };
        Ok(mutation_response(
            actions::update_event(storage.as_ref(), id, input).await,
        ))
    }

    pub async fn delete_event(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        let storage = match self.get_storage(request) {
            Ok(storage) => storage,
            Err(resp) => return Ok(resp),
        };
        Ok(mutation_response(
            actions::delete_event(storage.as_ref(), id).await,
        ))
    }
}

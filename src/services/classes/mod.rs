pub mod actions;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{mutation_response, page_size, read_response};
use crate::filters;
use crate::models::classes::requests::{ClassInput, ClassListParams};

define_service!(ClassService);

impl ClassService {
    // 班级列表：教师看到授课或担任班主任的班级，学生与家长只看到所在班级
    pub async fn list_classes(
        &self,
        request: &HttpRequest,
        params: ClassListParams,
    ) -> ActixResult<HttpResponse> {
        let (storage, viewer) = match self.context(request) {
            Ok(ctx) => ctx,
            Err(resp) => return Ok(resp),
        };

        let cond = filters::class_condition(&viewer, &params);
        let page = storage
            .list_classes(cond, params.pagination.page(), page_size())
            .await;
        Ok(read_response("classes", page))
    }

    pub async fn create_class(
        &self,
        request: &HttpRequest,
        input: ClassInput,
    ) -> ActixResult<HttpResponse> {
        let storage = match self.get_storage(request) {
            Ok(storage) => storage,
            Err(resp) => return Ok(resp),
        };
        Ok(mutation_response(
            actions::create_class(storage.as_ref(), input).await,
        ))
    }

    pub async fn update_class(
        &self,
        request: &HttpRequest,
        id: i64,
        input: ClassInput,
    ) -> ActixResult<HttpResponse> {
        let storage = match self.get_storage(request) {
            Ok(storage) => storage,
            Err(resp) => return Ok(resp),
        };
        Ok(mutation_response(
            actions::update_class(storage.as_ref(), id, input).await,
        ))
    }

    pub async fn delete_class(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        let storage = match self.get_storage(request) {
            Ok(storage) => storage,
            Err(resp) => return Ok(resp),
        };
        Ok(mutation_response(
            actions::delete_class(storage.as_ref(), id).await,
        ))
    }
}

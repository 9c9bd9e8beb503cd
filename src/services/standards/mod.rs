use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

pub struct StandardService {
    storage: Option<Arc<dyn Storage>>,
}

impl StandardService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Option<Arc<dyn Storage>> {
        if let Some(storage) = &self.storage {
            return Some(storage.clone());
        }
        request
            .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
            .map(|data| data.get_ref().clone())
    }

    // 获取标准的类别与子指标（按 ID 升序），用于生成空白评分表
    pub async fn get_criteria_tree(
        &self,
        request: &HttpRequest,
        standard_id: i64,
    ) -> ActixResult<HttpResponse> {
        let Some(storage) = self.get_storage(request) else {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Storage not found in app data",
                )),
            );
        };

        match storage.get_criteria_tree(standard_id).await {
            Ok(Some(tree)) => Ok(HttpResponse::Ok().json(ApiResponse::success(tree, "查询成功"))),
            Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::StandardNotFound,
                "标准不存在",
            ))),
            Err(e) => Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("查询指标失败: {e}"),
                )),
            ),
        }
    }
}

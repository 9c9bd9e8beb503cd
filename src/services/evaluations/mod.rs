pub mod assign;
pub mod detail;
pub mod form;
pub mod list;
pub mod report;
pub mod submit;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use tracing::error;

use crate::cache::ObjectCache;
use crate::errors::{EvalSystemError, Result};
use crate::middlewares::RequireJWT;
use crate::models::evaluations::requests::{
    AssignEvaluationRequest, EvaluationListParams, ReportParams, SubmitEvaluationRequest,
};
use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

pub struct EvaluationService {
    storage: Option<Arc<dyn Storage>>,
    cache: Option<Arc<dyn ObjectCache>>,
}

impl EvaluationService {
    pub fn new_lazy() -> Self {
        Self {
            storage: None,
            cache: None,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_backends(storage: Arc<dyn Storage>, cache: Arc<dyn ObjectCache>) -> Self {
        Self {
            storage: Some(storage),
            cache: Some(cache),
        }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Option<Arc<dyn Storage>> {
        if let Some(storage) = &self.storage {
            return Some(storage.clone());
        }
        request
            .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
            .map(|data| data.get_ref().clone())
    }

    pub(crate) fn get_cache(&self, request: &HttpRequest) -> Option<Arc<dyn ObjectCache>> {
        if let Some(cache) = &self.cache {
            return Some(cache.clone());
        }
        request
            .app_data::<actix_web::web::Data<Arc<dyn ObjectCache>>>()
            .map(|data| data.get_ref().clone())
    }

    pub async fn assign_evaluation(
        &self,
        request: &HttpRequest,
        req: AssignEvaluationRequest,
    ) -> ActixResult<HttpResponse> {
        assign::assign_evaluation(self, request, req).await
    }

    pub async fn list_evaluations(
        &self,
        request: &HttpRequest,
        query: EvaluationListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_evaluations(self, request, query).await
    }

    pub async fn list_my_evaluations(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::list_my_evaluations(self, request).await
    }

    pub async fn get_evaluation(
        &self,
        request: &HttpRequest,
        evaluation_id: i64,
    ) -> ActixResult<HttpResponse> {
        list::get_evaluation(self, request, evaluation_id).await
    }

    pub async fn get_projection(
        &self,
        request: &HttpRequest,
        evaluation_id: i64,
    ) -> ActixResult<HttpResponse> {
        detail::get_projection(self, request, evaluation_id).await
    }

    pub async fn get_scoring_form(
        &self,
        request: &HttpRequest,
        evaluation_id: i64,
    ) -> ActixResult<HttpResponse> {
        form::get_scoring_form(self, request, evaluation_id).await
    }

    pub async fn submit_evaluation(
        &self,
        request: &HttpRequest,
        evaluation_id: i64,
        req: SubmitEvaluationRequest,
    ) -> ActixResult<HttpResponse> {
        submit::submit_evaluation(self, request, evaluation_id, req).await
    }

    pub async fn export_report(
        &self,
        request: &HttpRequest,
        evaluation_id: i64,
        params: ReportParams,
    ) -> ActixResult<HttpResponse> {
        report::export_report(self, request, evaluation_id, params).await
    }
}

/// 完成后评估视图的缓存键
pub(crate) fn projection_cache_key(evaluation_id: i64) -> String {
    format!("evaluation:projection:{evaluation_id}")
}

/// 评估员只能访问分配给自己的评估，管理员不受限
pub(crate) fn ensure_access(user: &User, evaluator_id: i64) -> Result<()> {
    if user.is_admin() || user.id == evaluator_id {
        Ok(())
    } else {
        Err(EvalSystemError::authorization(
            "Evaluation is assigned to another evaluator",
        ))
    }
}

/// 错误映射为统一响应；`internal` 为 5xx 时使用的业务码
pub(crate) fn error_response(err: &EvalSystemError, internal: ErrorCode) -> HttpResponse {
    let body = |code: ErrorCode| ApiResponse::error_empty(code, err.message());
    match err {
        EvalSystemError::Validation(_) => {
            HttpResponse::BadRequest().json(body(ErrorCode::EvaluationValidationFailed))
        }
        EvalSystemError::Authentication(_) => {
            HttpResponse::Unauthorized().json(body(ErrorCode::Unauthorized))
        }
        EvalSystemError::Authorization(_) => {
            HttpResponse::Forbidden().json(body(ErrorCode::Forbidden))
        }
        EvalSystemError::NotFound(_) => HttpResponse::NotFound().json(body(ErrorCode::NotFound)),
        EvalSystemError::InvalidState(_) => {
            HttpResponse::Conflict().json(body(ErrorCode::EvaluationAlreadyCompleted))
        }
        _ => {
            error!(
                "Request failed with {} (retryable: {}): {}",
                err.code(),
                err.is_retryable(),
                err.message()
            );
            HttpResponse::InternalServerError().json(body(internal))
        }
    }
}

/// 请求上下文：当前用户与存储
pub(crate) fn request_context(
    service: &EvaluationService,
    request: &HttpRequest,
) -> Result<(User, Arc<dyn Storage>)> {
    let user = RequireJWT::extract_user_claims(request)
        .ok_or_else(|| EvalSystemError::authentication("未登录"))?;
    let storage = service
        .get_storage(request)
        .ok_or_else(|| EvalSystemError::database_connection("Storage not found in app data"))?;
    Ok((user, storage))
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;
    use std::time::Duration;

    use crate::cache::object_cache::moka::MokaCacheWrapper;
    use crate::cache::ObjectCache;
    use crate::models::users::entities::{User, UserRole};
    use crate::storage::sea_orm_storage::test_support::{self, ids};
    use crate::storage::sea_orm_storage::SeaOrmStorage;
    use crate::storage::Storage;

    pub struct Backends {
        pub raw: Arc<SeaOrmStorage>,
        pub storage: Arc<dyn Storage>,
        pub cache: Arc<dyn ObjectCache>,
    }

    pub async fn backends() -> Backends {
        let raw = Arc::new(test_support::seeded_storage().await);
        Backends {
            storage: raw.clone(),
            raw,
            cache: Arc::new(MokaCacheWrapper::with_settings(1_000, Duration::from_secs(60))),
        }
    }

    pub fn user(id: i64, role: UserRole) -> User {
        User {
            id,
            name: format!("user{id}"),
            email: format!("user{id}@example.com"),
            role,
            created_at: chrono::Utc::now(),
        }
    }

    pub fn evaluator() -> User {
        user(ids::EVALUATOR, UserRole::Evaluator)
    }

    pub fn other_evaluator() -> User {
        user(ids::OTHER_EVALUATOR, UserRole::Evaluator)
    }

    pub fn admin() -> User {
        user(ids::ADMIN, UserRole::Admin)
    }
}

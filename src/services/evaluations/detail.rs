use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::debug;

use super::{EvaluationService, ensure_access, error_response, projection_cache_key, request_context};
use crate::cache::{ObjectCache, get_cached, put_cached};
use crate::errors::{EvalSystemError, Result};
use crate::models::evaluations::entities::EvaluationStatus;
use crate::models::evaluations::responses::EvaluationProjection;
use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::aggregation;
use crate::storage::Storage;

/// 组装评估完整视图
///
/// pending 评估没有评分与权重，汇总全为 0。completed 评估不可再变更，
/// 其视图写入缓存（ttl 为 0 时使用缓存默认值）。
pub async fn project(
    storage: &dyn Storage,
    cache: Option<&dyn ObjectCache>,
    evaluation_id: i64,
) -> Result<EvaluationProjection> {
    let key = projection_cache_key(evaluation_id);
    if let Some(cache) = cache
        && let Some(projection) = get_cached::<EvaluationProjection>(cache, &key).await
    {
        debug!("Projection for evaluation {} served from cache", evaluation_id);
        return Ok(projection);
    }

    let evaluation = storage
        .get_evaluation_overview(evaluation_id)
        .await?
        .ok_or_else(|| EvalSystemError::not_found(format!("Evaluation {evaluation_id} not found")))?;

    // 概览读到 pending 时不再读取明细，避免与并发提交交错
    let (scores, weights) = match evaluation.status {
        EvaluationStatus::Pending => (Vec::new(), Vec::new()),
        EvaluationStatus::Completed => (
            storage.list_evaluation_scores(evaluation_id).await?,
            storage.list_evaluation_weights(evaluation_id).await?,
        ),
    };

    let summary = aggregation::aggregate(&scores, &weights);
    let projection = EvaluationProjection {
        evaluation,
        scores,
        weights,
        summary,
    };

    if projection.evaluation.status == EvaluationStatus::Completed
        && let Some(cache) = cache
    {
        put_cached(cache, key, &projection, 0).await;
    }

    Ok(projection)
}

/// 按当前用户权限获取完整视图
pub async fn project_for(
    storage: &dyn Storage,
    cache: Option<&dyn ObjectCache>,
    user: &User,
    evaluation_id: i64,
) -> Result<EvaluationProjection> {
    let projection = project(storage, cache, evaluation_id).await?;
    ensure_access(user, projection.evaluation.evaluator_id)?;
    Ok(projection)
}

pub async fn get_projection(
    service: &EvaluationService,
    request: &HttpRequest,
    evaluation_id: i64,
) -> ActixResult<HttpResponse> {
    let (user, storage) = match request_context(service, request) {
        Ok(ctx) => ctx,
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    };
    let cache = service.get_cache(request);

    match project_for(storage.as_ref(), cache.as_deref(), &user, evaluation_id).await {
        Ok(projection) => Ok(HttpResponse::Ok().json(ApiResponse::success(projection, "查询成功"))),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

use std::time::Duration;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{info, warn};

use super::{EvaluationService, error_response, projection_cache_key, request_context};
use crate::cache::ObjectCache;
use crate::config::AppConfig;
use crate::errors::{EvalSystemError, Result};
use crate::models::evaluations::entities::Evaluation;
use crate::models::evaluations::requests::SubmitEvaluationRequest;
use crate::models::evaluations::responses::SubmitEvaluationResponse;
use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;
use crate::utils::validate_submission;

/// 提交评分
///
/// 只有被分配的评估员可以提交。校验在写入之前完成，写入由存储层在一个事务内完成。
/// 整个过程受 `timeout` 约束，超时时未提交的事务被丢弃，评估保持 pending。
pub async fn submit(
    storage: &dyn Storage,
    cache: Option<&dyn ObjectCache>,
    user: &User,
    evaluation_id: i64,
    req: SubmitEvaluationRequest,
    timeout: Duration,
) -> Result<SubmitEvaluationResponse> {
    let scores_recorded = req.scores.len();
    let weights_recorded = req.weights.len();

    let outcome: std::result::Result<Result<Evaluation>, _> = tokio::time::timeout(timeout, async {
        let evaluation = storage
            .get_evaluation_by_id(evaluation_id)
            .await?
            .ok_or_else(|| {
                EvalSystemError::not_found(format!("Evaluation {evaluation_id} not found"))
            })?;

        if evaluation.evaluator_id != user.id {
            return Err(EvalSystemError::authorization(
                "Only the assigned evaluator may submit this evaluation",
            ));
        }

        let validation = validate_submission(&req);
        if !validation.is_valid {
            return Err(EvalSystemError::validation(validation.error_message()));
        }

        storage.submit_evaluation(evaluation_id, req).await
    })
    .await;

    let evaluation = match outcome {
        Ok(result) => result?,
        Err(_) => {
            warn!(
                "Submission for evaluation {} timed out after {:?}",
                evaluation_id, timeout
            );
            return Err(EvalSystemError::database_operation(format!(
                "Submission timed out after {} ms",
                timeout.as_millis()
            )));
        }
    };

    if let Some(cache) = cache {
        cache.remove(&projection_cache_key(evaluation_id)).await;
    }

    info!(
        "Evaluation {} completed by evaluator {} ({} scores, {} weights)",
        evaluation_id, user.id, scores_recorded, weights_recorded
    );

    Ok(SubmitEvaluationResponse {
        evaluation_id: evaluation.id,
        status: evaluation.status,
        scores_recorded,
        weights_recorded,
        completed_at: evaluation.completed_at.unwrap_or_else(chrono::Utc::now),
    })
}

pub async fn submit_evaluation(
    service: &EvaluationService,
    request: &HttpRequest,
    evaluation_id: i64,
    req: SubmitEvaluationRequest,
) -> ActixResult<HttpResponse> {
    let (user, storage) = match request_context(service, request) {
        Ok(ctx) => ctx,
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    };
    let cache = service.get_cache(request);
    let timeout = AppConfig::get().submit_timeout();

    match submit(
        storage.as_ref(),
        cache.as_deref(),
        &user,
        evaluation_id,
        req,
        timeout,
    )
    .await
    {
        Ok(result) => Ok(HttpResponse::Ok().json(ApiResponse::success(result, "评估提交成功"))),
        Err(e) => Ok(error_response(&e, ErrorCode::EvaluationSubmitFailed)),
    }
}

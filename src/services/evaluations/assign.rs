use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{EvaluationService, error_response, request_context};
use crate::errors::{EvalSystemError, Result};
use crate::models::evaluations::entities::Evaluation;
use crate::models::evaluations::requests::AssignEvaluationRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

/// 分配评估：软件、评估员、标准 ID 必须为正数，评估以 pending 状态创建
pub async fn assign(storage: &dyn Storage, req: AssignEvaluationRequest) -> Result<Evaluation> {
    let mut invalid = Vec::new();
    for (field, value) in [
        ("software_id", req.software_id),
        ("evaluator_id", req.evaluator_id),
        ("standard_id", req.standard_id),
    ] {
        if value <= 0 {
            invalid.push(format!("{field} must be positive (got {value})"));
        }
    }
    if !invalid.is_empty() {
        return Err(EvalSystemError::validation(invalid.join("; ")));
    }

    let evaluation = storage.create_evaluation(req).await?;
    info!(
        "Evaluation {} assigned to evaluator {} (software {}, standard {})",
        evaluation.id, evaluation.evaluator_id, evaluation.software_id, evaluation.standard_id
    );
    Ok(evaluation)
}

pub async fn assign_evaluation(
    service: &EvaluationService,
    request: &HttpRequest,
    req: AssignEvaluationRequest,
) -> ActixResult<HttpResponse> {
    let (_, storage) = match request_context(service, request) {
        Ok(ctx) => ctx,
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    };

    match assign(storage.as_ref(), req).await {
        Ok(evaluation) => {
            Ok(HttpResponse::Created().json(ApiResponse::success(evaluation, "评估分配成功")))
        }
        Err(e) => Ok(error_response(&e, ErrorCode::EvaluationAssignFailed)),
    }
}

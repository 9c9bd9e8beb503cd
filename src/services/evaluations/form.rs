use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{EvaluationService, ensure_access, error_response, request_context};
use crate::errors::{EvalSystemError, Result};
use crate::models::evaluations::responses::ScoringFormResponse;
use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

/// 评分表：评估概览与所属标准的类别、子指标
pub async fn scoring_form(
    storage: &dyn Storage,
    user: &User,
    evaluation_id: i64,
) -> Result<ScoringFormResponse> {
    let evaluation = storage
        .get_evaluation_overview(evaluation_id)
        .await?
        .ok_or_else(|| EvalSystemError::not_found(format!("Evaluation {evaluation_id} not found")))?;
    ensure_access(user, evaluation.evaluator_id)?;

    let tree = storage
        .get_criteria_tree(evaluation.standard_id)
        .await?
        .ok_or_else(|| {
            EvalSystemError::not_found(format!("Standard {} not found", evaluation.standard_id))
        })?;

    Ok(ScoringFormResponse {
        evaluation,
        criteria: tree.criteria,
    })
}

pub async fn get_scoring_form(
    service: &EvaluationService,
    request: &HttpRequest,
    evaluation_id: i64,
) -> ActixResult<HttpResponse> {
    let (user, storage) = match request_context(service, request) {
        Ok(ctx) => ctx,
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    };

    match scoring_form(storage.as_ref(), &user, evaluation_id).await {
        Ok(form) => Ok(HttpResponse::Ok().json(ApiResponse::success(form, "查询成功"))),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::evaluations::test_support;
    use crate::storage::sea_orm_storage::test_support::ids;

    #[tokio::test]
    async fn test_form_lists_standard_tree() {
        let b = test_support::backends().await;
        let form = scoring_form(b.storage.as_ref(), &test_support::evaluator(), ids::EVALUATION)
            .await
            .unwrap();
        assert_eq!(form.evaluation.standard_name, "ISO/IEC 25010");
        let order: Vec<i64> = form.criteria.iter().map(|c| c.id).collect();
        assert_eq!(order, vec![ids::FUNCTIONALITY, ids::USABILITY]);
    }

    #[tokio::test]
    async fn test_form_of_another_evaluator() {
        let b = test_support::backends().await;
        let err = scoring_form(
            b.storage.as_ref(),
            &test_support::other_evaluator(),
            ids::EVALUATION,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, EvalSystemError::Authorization(_)));
    }
}

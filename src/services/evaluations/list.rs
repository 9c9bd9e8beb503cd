use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{EvaluationService, error_response, request_context};
use crate::models::evaluations::requests::{EvaluationListParams, EvaluationListQuery};
use crate::models::{ApiResponse, ErrorCode};

// 管理员分页查询全部评估
pub async fn list_evaluations(
    service: &EvaluationService,
    request: &HttpRequest,
    query: EvaluationListParams,
) -> ActixResult<HttpResponse> {
    let (_, storage) = match request_context(service, request) {
        Ok(ctx) => ctx,
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    };

    match storage
        .list_evaluations_with_pagination(EvaluationListQuery::from(query))
        .await
    {
        Ok(page) => Ok(HttpResponse::Ok().json(ApiResponse::success(page, "查询成功"))),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

// 评估员查询分配给自己的评估
pub async fn list_my_evaluations(
    service: &EvaluationService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (user, storage) = match request_context(service, request) {
        Ok(ctx) => ctx,
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    };

    match storage.list_evaluator_evaluations(user.id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(items, "查询成功"))),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

// 获取评估记录
pub async fn get_evaluation(
    service: &EvaluationService,
    request: &HttpRequest,
    evaluation_id: i64,
) -> ActixResult<HttpResponse> {
    let (_, storage) = match request_context(service, request) {
        Ok(ctx) => ctx,
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    };

    match storage.get_evaluation_by_id(evaluation_id).await {
        Ok(Some(evaluation)) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success(evaluation, "查询成功")))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::EvaluationNotFound,
            "评估不存在",
        ))),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::evaluations::test_support;
    use crate::storage::sea_orm_storage::test_support::ids;
    use actix_web::HttpMessage;
    use actix_web::body::to_bytes;
    use actix_web::http::StatusCode;
    use actix_web::test::TestRequest;

    #[actix_web::test]
    async fn test_list_my_evaluations_http() {
        let b = test_support::backends().await;
        let service = EvaluationService::with_backends(b.storage.clone(), b.cache.clone());

        let req = TestRequest::default().to_http_request();
        req.extensions_mut().insert(test_support::evaluator());

        let resp = list_my_evaluations(&service, &req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = to_bytes(resp.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["data"][0]["id"], ids::EVALUATION);
        assert_eq!(json["data"][0]["software_name"], "Gestor Académico");
    }

    #[actix_web::test]
    async fn test_missing_user_is_unauthorized() {
        let b = test_support::backends().await;
        let service = EvaluationService::with_backends(b.storage.clone(), b.cache.clone());

        let req = TestRequest::default().to_http_request();
        let resp = list_my_evaluations(&service, &req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_get_unknown_evaluation() {
        let b = test_support::backends().await;
        let service = EvaluationService::with_backends(b.storage.clone(), b.cache.clone());

        let req = TestRequest::default().to_http_request();
        req.extensions_mut().insert(test_support::admin());
        let resp = get_evaluation(&service, &req, 999).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::evaluations::requests::{ReportParams, SubmitEvaluationRequest};
use crate::models::users::entities::UserRole;
use crate::services::EvaluationService;

static EVALUATION_SERVICE: Lazy<EvaluationService> = Lazy::new(EvaluationService::new_lazy);

// 我的评估
pub async fn list_my_evaluations(req: HttpRequest) -> ActixResult<HttpResponse> {
    EVALUATION_SERVICE.list_my_evaluations(&req).await
}

// 评分表
pub async fn get_scoring_form(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    EVALUATION_SERVICE
        .get_scoring_form(&req, path.into_inner())
        .await
}

// 提交评分
pub async fn submit_evaluation(
    req: HttpRequest,
    path: web::Path<i64>,
    body: web::Json<SubmitEvaluationRequest>,
) -> ActixResult<HttpResponse> {
    EVALUATION_SERVICE
        .submit_evaluation(&req, path.into_inner(), body.into_inner())
        .await
}

// 评估汇总
pub async fn get_summary(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    EVALUATION_SERVICE
        .get_projection(&req, path.into_inner())
        .await
}

// 导出评估报告
pub async fn export_report(
    req: HttpRequest,
    path: web::Path<i64>,
    query: web::Query<ReportParams>,
) -> ActixResult<HttpResponse> {
    EVALUATION_SERVICE
        .export_report(&req, path.into_inner(), query.into_inner())
        .await
}

// 配置路由
pub fn configure_evaluator_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/evaluator/evaluations")
            .wrap(middlewares::RateLimit::api())
            .wrap(middlewares::RequireRole::new(&UserRole::Evaluator))
            .wrap(middlewares::RequireJWT)
            .service(web::resource("").route(web::get().to(list_my_evaluations)))
            .service(web::resource("/{id}/details").route(web::get().to(get_scoring_form)))
            .service(
                web::resource("/{id}/submit")
                    // 提交接口单独限流（每用户每分钟）
                    .wrap(middlewares::RateLimit::submission())
                    .route(web::post().to(submit_evaluation)),
            )
            .service(web::resource("/{id}/summary").route(web::get().to(get_summary)))
            .service(web::resource("/{id}/report").route(web::get().to(export_report))),
    );
}

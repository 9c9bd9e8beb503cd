use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::evaluations::requests::{
    AssignEvaluationRequest, EvaluationListParams, ReportParams,
};
use crate::models::users::entities::UserRole;
use crate::services::EvaluationService;

// 懒加载的全局 EvaluationService 实例
static EVALUATION_SERVICE: Lazy<EvaluationService> = Lazy::new(EvaluationService::new_lazy);

// 分配评估
pub async fn assign_evaluation(
    req: HttpRequest,
    body: web::Json<AssignEvaluationRequest>,
) -> ActixResult<HttpResponse> {
    EVALUATION_SERVICE
        .assign_evaluation(&req, body.into_inner())
        .await
}

// 列出评估
pub async fn list_evaluations(
    req: HttpRequest,
    query: web::Query<EvaluationListParams>,
) -> ActixResult<HttpResponse> {
    EVALUATION_SERVICE
        .list_evaluations(&req, query.into_inner())
        .await
}

// 获取评估记录
pub async fn get_evaluation(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    EVALUATION_SERVICE
        .get_evaluation(&req, path.into_inner())
        .await
}

// 获取评估完整视图
pub async fn get_evaluation_full(
    req: HttpRequest,
    path: web::Path<i64>,
) -> ActixResult<HttpResponse> {
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
pub fn configure_evaluation_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/evaluations")
            // 先执行 RequireJWT，再执行角色校验
            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles()))
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_evaluations))
                    .route(web::post().to(assign_evaluation)),
            )
            .service(web::resource("/{id}").route(web::get().to(get_evaluation)))
            .service(web::resource("/{id}/full").route(web::get().to(get_evaluation_full)))
            .service(web::resource("/{id}/report").route(web::get().to(export_report))),
    );
}

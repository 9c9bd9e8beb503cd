use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::services::StandardService;

static STANDARD_SERVICE: Lazy<StandardService> = Lazy::new(StandardService::new_lazy);

// 获取标准的指标树
pub async fn get_criteria_tree(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    STANDARD_SERVICE
        .get_criteria_tree(&req, path.into_inner())
        .await
}

// 配置路由 - 所有登录用户可访问
pub fn configure_standards_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/standards")
            .wrap(middlewares::RequireJWT)
            .service(web::resource("/{id}/criteria").route(web::get().to(get_criteria_tree))),
    );
}

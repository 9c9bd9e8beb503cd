//! 评估报告导出

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashMap;
use tracing::error;

use super::detail::project_for;
use super::{EvaluationService, error_response, request_context};
use crate::errors::{EvalSystemError, Result};
use crate::models::evaluations::requests::{ReportFormat, ReportParams};
use crate::models::evaluations::responses::EvaluationProjection;
use crate::models::{ApiResponse, ErrorCode};

/// 生成 CSV 报告
///
/// 三段依次为：评分明细（按类别、子指标）、各类别权重与得分、总体汇总。
pub fn render_csv(projection: &EvaluationProjection) -> Result<Vec<u8>> {
    let mut wtr = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(vec![]);

    wtr.write_record(["Categoría", "Subcriterio", "Puntaje", "Comentario"])?;
    for line in &projection.scores {
        wtr.write_record([
            line.criteria_name.clone(),
            line.subcriteria_name.clone(),
            line.score.to_string(),
            line.comment.clone().unwrap_or_default(),
        ])?;
    }

    let names: HashMap<i64, &str> = projection
        .weights
        .iter()
        .map(|w| (w.category_id, w.category_name.as_str()))
        .collect();

    wtr.write_record(["Categoría", "Peso", "Puntaje", "Máximo", "Porcentaje"])?;
    for category in &projection.summary.categories {
        wtr.write_record([
            names
                .get(&category.category_id)
                .copied()
                .unwrap_or_default()
                .to_string(),
            category.weight_num.to_string(),
            category.score.to_string(),
            category.max.to_string(),
            format!("{:.2}", category.percentage),
        ])?;
    }

    let summary = &projection.summary;
    wtr.write_record([
        "Puntaje total",
        "Máximo total",
        "Porcentaje",
        "Calificación",
        "Nivel",
    ])?;
    wtr.write_record([
        summary.total_score.to_string(),
        summary.total_max.to_string(),
        format!("{:.2}", summary.percentage),
        summary.rating.to_string(),
        summary.label.clone(),
    ])?;

    wtr.into_inner()
        .map_err(|e| EvalSystemError::export(format!("CSV 生成失败: {e}")))
}

pub async fn export_report(
    service: &EvaluationService,
    request: &HttpRequest,
    evaluation_id: i64,
    params: ReportParams,
) -> ActixResult<HttpResponse> {
    let (user, storage) = match request_context(service, request) {
        Ok(ctx) => ctx,
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    };
    let cache = service.get_cache(request);

    let projection =
        match project_for(storage.as_ref(), cache.as_deref(), &user, evaluation_id).await {
            Ok(projection) => projection,
            Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
        };

    match params.format {
        ReportFormat::Json => {
            Ok(HttpResponse::Ok().json(ApiResponse::success(projection, "导出成功")))
        }
        ReportFormat::Csv => match render_csv(&projection) {
            Ok(data) => Ok(HttpResponse::Ok()
                .content_type("text/csv; charset=utf-8")
                .insert_header((
                    "Content-Disposition",
                    format!("attachment; filename=\"evaluation-{evaluation_id}.csv\""),
                ))
                .body(data)),
            Err(e) => {
                error!("导出评估报告失败: {}", e);
                Ok(error_response(&e, ErrorCode::ReportExportFailed))
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::evaluations::requests::{ScoreInput, SubmitEvaluationRequest, WeightInput};
    use crate::services::evaluations::detail::project;
    use crate::services::evaluations::test_support;
    use crate::storage::sea_orm_storage::test_support::ids;
    use actix_web::HttpMessage;
    use actix_web::http::StatusCode;
    use actix_web::test::TestRequest;

    async fn completed_backends() -> test_support::Backends {
        let b = test_support::backends().await;
        b.storage
            .submit_evaluation(
                ids::EVALUATION,
                SubmitEvaluationRequest {
                    scores: vec![
                        ScoreInput {
                            subcriteria_id: ids::SUB_CORRECTNESS,
                            score: 3,
                            comment: Some("errores, menores".to_string()),
                        },
                        ScoreInput {
                            subcriteria_id: ids::SUB_COMPLETENESS,
                            score: 5,
                            comment: None,
                        },
                        ScoreInput {
                            subcriteria_id: ids::SUB_LEARNABILITY,
                            score: 2,
                            comment: None,
                        },
                    ],
                    weights: vec![
                        WeightInput {
                            category_id: ids::USABILITY,
                            weight_num: 40,
                        },
                        WeightInput {
                            category_id: ids::FUNCTIONALITY,
                            weight_num: 60,
                        },
                    ],
                    general_comments: None,
                },
            )
            .await
            .unwrap();
        b
    }

    #[tokio::test]
    async fn test_csv_sections_in_projection_order() {
        let b = completed_backends().await;
        let projection = project(b.storage.as_ref(), None, ids::EVALUATION)
            .await
            .unwrap();
        let data = render_csv(&projection).unwrap();

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(data.as_slice());
        let rows: Vec<Vec<String>> = reader
            .records()
            .map(|r| r.unwrap().iter().map(str::to_string).collect())
            .collect();

        // 1 + 3 评分, 1 + 2 类别, 1 + 1 汇总
        assert_eq!(rows.len(), 9);
        assert_eq!(rows[1], vec!["Funcionalidad", "Completitud", "5", ""]);
        assert_eq!(
            rows[2],
            vec!["Funcionalidad", "Corrección", "3", "errores, menores"]
        );
        assert_eq!(rows[3][1], "Aprendizaje");
        assert_eq!(rows[5], vec!["Funcionalidad", "60", "8", "10", "80.00"]);
        assert_eq!(rows[6], vec!["Usabilidad", "40", "2", "5", "40.00"]);
        assert_eq!(rows[8], vec!["10", "15", "64.00", "3", "Regular"]);
    }

    #[actix_web::test]
    async fn test_csv_http_response() {
        let b = completed_backends().await;
        let service = EvaluationService::with_backends(b.storage.clone(), b.cache.clone());

        let req = TestRequest::default().to_http_request();
        req.extensions_mut().insert(test_support::admin());
        let resp = export_report(
            &service,
            &req,
            ids::EVALUATION,
            ReportParams {
                format: ReportFormat::Csv,
            },
        )
        .await
        .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get("Content-Disposition").unwrap(),
            "attachment; filename=\"evaluation-1.csv\""
        );
    }

    #[actix_web::test]
    async fn test_report_of_another_evaluator_is_forbidden() {
        let b = completed_backends().await;
        let service = EvaluationService::with_backends(b.storage.clone(), b.cache.clone());

        let req = TestRequest::default().to_http_request();
        req.extensions_mut().insert(test_support::other_evaluator());
        let resp = export_report(&service, &req, ids::EVALUATION, ReportParams::default())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }
}

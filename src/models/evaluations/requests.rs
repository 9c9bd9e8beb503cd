use serde::Deserialize;

use super::entities::EvaluationStatus;
use crate::models::common::PaginationQuery;
use crate::models::common::pagination::deserialize_optional_i64;

// 分配评估请求
#[derive(Debug, Clone, Deserialize)]
pub struct AssignEvaluationRequest {
    pub software_id: i64,
    pub evaluator_id: i64,
    pub standard_id: i64,
    pub general_comments: Option<String>,
}

// 子指标评分输入
#[derive(Debug, Clone, Deserialize)]
pub struct ScoreInput {
    pub subcriteria_id: i64,
    pub score: i32,
    pub comment: Option<String>,
}

// 类别权重输入
#[derive(Debug, Clone, Deserialize)]
pub struct WeightInput {
    pub category_id: i64,
    pub weight_num: i32,
}

// 提交评估请求
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitEvaluationRequest {
    #[serde(default)]
    pub scores: Vec<ScoreInput>,
    #[serde(default)]
    pub weights: Vec<WeightInput>,
    pub general_comments: Option<String>,
}

// 评估列表查询参数（来自HTTP请求）
#[derive(Debug, Clone, Deserialize)]
pub struct EvaluationListParams {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
    pub status: Option<EvaluationStatus>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub evaluator_id: Option<i64>,
}

// 评估列表查询参数（用于存储层）
#[derive(Debug, Clone)]
pub struct EvaluationListQuery {
    pub page: u64,
    pub size: u64,
    pub status: Option<EvaluationStatus>,
    pub evaluator_id: Option<i64>,
}

impl From<EvaluationListParams> for EvaluationListQuery {
    fn from(params: EvaluationListParams) -> Self {
        let (page, size) = params.pagination.normalized();
        Self {
            page,
            size,
            status: params.status,
            evaluator_id: params.evaluator_id,
        }
    }
}

// 报告导出格式
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Json,
    Csv,
}

// 报告导出参数
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportParams {
    #[serde(default)]
    pub format: ReportFormat,
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::web::Query;

    #[test]
    fn test_list_params_from_query_string() {
        let params = Query::<EvaluationListParams>::from_query(
            "page=2&size=5&status=completed&evaluator_id=7",
        )
        .unwrap()
        .into_inner();
        let query = EvaluationListQuery::from(params);
        assert_eq!(query.page, 2);
        assert_eq!(query.size, 5);
        assert_eq!(query.status, Some(EvaluationStatus::Completed));
        assert_eq!(query.evaluator_id, Some(7));
    }

    #[test]
    fn test_list_params_defaults() {
        let params = Query::<EvaluationListParams>::from_query("")
            .unwrap()
            .into_inner();
        let query = EvaluationListQuery::from(params);
        assert_eq!((query.page, query.size), (1, 10));
        assert!(query.status.is_none());
        assert!(query.evaluator_id.is_none());
    }

    #[test]
    fn test_submit_request_missing_lists_default_empty() {
        let req: SubmitEvaluationRequest = serde_json::from_str("{}").unwrap();
        assert!(req.scores.is_empty());
        assert!(req.weights.is_empty());
    }

    #[test]
    fn test_report_format() {
        let p = Query::<ReportParams>::from_query("format=csv")
            .unwrap()
            .into_inner();
        assert_eq!(p.format, ReportFormat::Csv);
        let p = Query::<ReportParams>::from_query("")
            .unwrap()
            .into_inner();
        assert_eq!(p.format, ReportFormat::Json);
    }
}

use serde::{Deserialize, Serialize};

use super::entities::{CategoryWeight, EvaluationOverview, EvaluationStatus, ScoreLine};
use crate::models::criteria::responses::CriterionNode;

// 单个类别的聚合结果
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategorySummary {
    pub category_id: i64,
    pub weight_num: i32,
    pub score: i64,
    pub max: i64,
    pub percentage: f64,
}

// 评估聚合结果
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EvaluationSummary {
    pub total_score: i64,
    pub total_max: i64,
    pub percentage: f64,
    pub rating: u8,
    pub label: String,
    pub categories: Vec<CategorySummary>,
}

// 评估完整视图
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationProjection {
    pub evaluation: EvaluationOverview,
    pub scores: Vec<ScoreLine>,
    pub weights: Vec<CategoryWeight>,
    pub summary: EvaluationSummary,
}

// 提交结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitEvaluationResponse {
    pub evaluation_id: i64,
    pub status: EvaluationStatus,
    pub scores_recorded: usize,
    pub weights_recorded: usize,
    pub completed_at: chrono::DateTime<chrono::Utc>,
}

// 评分表：评估概览与所属标准的指标树
#[derive(Debug, Clone, Serialize)]
pub struct ScoringFormResponse {
    pub evaluation: EvaluationOverview,
    pub criteria: Vec<CriterionNode>,
}

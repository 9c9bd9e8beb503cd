use serde::{Deserialize, Serialize};

// 评估状态
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationStatus {
    Pending,   // 待评估
    Completed, // 已完成
}

impl EvaluationStatus {
    pub const PENDING: &'static str = "pending";
    pub const COMPLETED: &'static str = "completed";

    pub fn as_str(&self) -> &'static str {
        match self {
            EvaluationStatus::Pending => Self::PENDING,
            EvaluationStatus::Completed => Self::COMPLETED,
        }
    }
}

impl<'de> Deserialize<'de> for EvaluationStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的评估状态: '{s}'. 支持的状态: pending, completed"
            ))
        })
    }
}

impl std::fmt::Display for EvaluationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EvaluationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            Self::PENDING => Ok(EvaluationStatus::Pending),
            Self::COMPLETED => Ok(EvaluationStatus::Completed),
            _ => Err(format!("Invalid evaluation status: {s}")),
        }
    }
}

// 评估记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evaluation {
    pub id: i64,
    pub software_id: i64,
    pub evaluator_id: i64,
    pub standard_id: i64,
    pub status: EvaluationStatus,
    pub general_comments: Option<String>,
    pub evaluation_date: chrono::DateTime<chrono::Utc>,
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
}

// 评估概览：评估记录连同软件、厂商、标准与评估员信息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationOverview {
    pub id: i64,
    pub software_id: i64,
    pub software_name: String,
    pub company_name: String,
    pub evaluator_id: i64,
    pub evaluator_name: String,
    pub evaluator_email: String,
    pub standard_id: i64,
    pub standard_name: String,
    pub status: EvaluationStatus,
    pub general_comments: Option<String>,
    pub evaluation_date: chrono::DateTime<chrono::Utc>,
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
}

// 单个子指标的评分（含所属类别）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoreLine {
    pub criteria_id: i64,
    pub criteria_name: String,
    pub subcriteria_id: i64,
    pub subcriteria_name: String,
    pub score: i32,
    pub comment: Option<String>,
}

// 类别权重
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryWeight {
    pub category_id: i64,
    pub category_name: String,
    pub weight_num: i32,
}

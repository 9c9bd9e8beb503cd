//! 数据模型
//!
//! 业务实体、请求与响应结构，以及统一的响应码定义。

pub mod common;
pub mod criteria;
pub mod evaluations;
pub mod users;

pub use common::{ApiResponse, PaginatedResponse, PaginationInfo, PaginationQuery};

use serde::{Deserialize, Serialize};

/// 程序启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

/// 响应业务码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    RateLimitExceeded = 1029,
    InternalServerError = 1500,

    // 评估
    EvaluationNotFound = 3004,
    EvaluationAlreadyCompleted = 3009,
    EvaluationValidationFailed = 3010,
    EvaluationSubmitFailed = 3020,
    EvaluationAssignFailed = 3021,

    // 标准
    StandardNotFound = 4004,

    // 导出
    ReportExportFailed = 5001,
}

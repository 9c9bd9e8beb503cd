use std::sync::Arc;

use crate::models::{
    PaginatedResponse,
    criteria::responses::CriteriaTreeResponse,
    evaluations::{
        entities::{CategoryWeight, Evaluation, EvaluationOverview, ScoreLine},
        requests::{AssignEvaluationRequest, EvaluationListQuery, SubmitEvaluationRequest},
    },
    users::entities::User,
};

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;

    /// 评估管理方法
    // 分配评估（校验软件、标准与评估员）
    async fn create_evaluation(&self, req: AssignEvaluationRequest) -> Result<Evaluation>;
    // 通过ID获取评估记录
    async fn get_evaluation_by_id(&self, id: i64) -> Result<Option<Evaluation>>;
    // 获取评估概览（含软件、厂商、标准、评估员信息）
    async fn get_evaluation_overview(&self, id: i64) -> Result<Option<EvaluationOverview>>;
    // 分页列出评估
    async fn list_evaluations_with_pagination(
        &self,
        query: EvaluationListQuery,
    ) -> Result<PaginatedResponse<EvaluationOverview>>;
    // 列出分配给评估员的评估
    async fn list_evaluator_evaluations(&self, evaluator_id: i64)
    -> Result<Vec<EvaluationOverview>>;

    /// 评分方法
    // 列出评估的评分（按类别、子指标排序）
    async fn list_evaluation_scores(&self, evaluation_id: i64) -> Result<Vec<ScoreLine>>;
    // 列出评估的类别权重（按类别排序）
    async fn list_evaluation_weights(&self, evaluation_id: i64) -> Result<Vec<CategoryWeight>>;
    // 原子提交评分与权重，并将评估从 pending 置为 completed
    async fn submit_evaluation(
        &self,
        evaluation_id: i64,
        submission: SubmitEvaluationRequest,
    ) -> Result<Evaluation>;

    /// 标准
    // 获取标准的指标树
    async fn get_criteria_tree(&self, standard_id: i64) -> Result<Option<CriteriaTreeResponse>>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}

//! 评分与权重存储操作
//!
//! 提交流程在单个事务内完成：第一条语句以 `status = 'pending'` 为条件把评估置为
//! completed（并发提交只有一个能命中该行），再读取评估、校验引用并批量写入评分和权重。
//! 任一步失败都会回滚，评估保持 pending 且没有评分或权重记录。

use std::collections::{BTreeSet, HashMap, HashSet};

use super::SeaOrmStorage;
use crate::entity::criteria::{Column as CriteriaColumn, Entity as Criteria};
use crate::entity::evaluation_category_weights::{
    ActiveModel as WeightActiveModel, Column as WeightColumn, Entity as EvaluationCategoryWeights,
};
use crate::entity::evaluation_scores::{
    ActiveModel as ScoreActiveModel, Column as ScoreColumn, Entity as EvaluationScores,
};
use crate::entity::evaluations::{Column as EvaluationColumn, Entity as Evaluations};
use crate::entity::subcriteria::{Column as SubcriteriaColumn, Entity as Subcriteria};
use crate::errors::{EvalSystemError, Result};
use crate::models::evaluations::{
    entities::{CategoryWeight, Evaluation, EvaluationStatus, ScoreLine},
    requests::SubmitEvaluationRequest,
};
use sea_orm::{
    ColumnTrait, DatabaseTransaction, EntityTrait, QueryFilter, Set, TransactionTrait,
    sea_query::Expr,
};
use tracing::{debug, info, warn};

impl SeaOrmStorage {
    /// 列出评估的评分，按类别 ID、子指标 ID 排序
    pub async fn list_evaluation_scores_impl(&self, evaluation_id: i64) -> Result<Vec<ScoreLine>> {
        let scores = EvaluationScores::find()
            .filter(ScoreColumn::EvaluationId.eq(evaluation_id))
            .all(&self.db)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("查询评分失败: {e}")))?;

        if scores.is_empty() {
            return Ok(Vec::new());
        }

        let sub_ids: Vec<i64> = scores.iter().map(|s| s.subcriteria_id).collect();
        let sub_map: HashMap<i64, _> = Subcriteria::find()
            .filter(SubcriteriaColumn::Id.is_in(sub_ids))
            .all(&self.db)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("查询子指标失败: {e}")))?
            .into_iter()
            .map(|s| (s.id, s))
            .collect();

        let criteria_ids: Vec<i64> = sub_map.values().map(|s| s.criteria_id).collect();
        let criteria_names = self.criteria_names(criteria_ids).await?;

        let mut lines: Vec<ScoreLine> = scores
            .into_iter()
            .map(|score| {
                let (criteria_id, subcriteria_name) = sub_map
                    .get(&score.subcriteria_id)
                    .map(|s| (s.criteria_id, s.name.clone()))
                    .unwrap_or_default();
                ScoreLine {
                    criteria_id,
                    criteria_name: criteria_names.get(&criteria_id).cloned().unwrap_or_default(),
                    subcriteria_id: score.subcriteria_id,
                    subcriteria_name,
                    score: score.score,
                    comment: score.comment,
                }
            })
            .collect();
        lines.sort_by_key(|l| (l.criteria_id, l.subcriteria_id));

        Ok(lines)
    }

    /// 列出评估的类别权重，按类别 ID 排序
    pub async fn list_evaluation_weights_impl(
        &self,
        evaluation_id: i64,
    ) -> Result<Vec<CategoryWeight>> {
        let weights = EvaluationCategoryWeights::find()
            .filter(WeightColumn::EvaluationId.eq(evaluation_id))
            .all(&self.db)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("查询类别权重失败: {e}")))?;

        if weights.is_empty() {
            return Ok(Vec::new());
        }

        let criteria_names = self
            .criteria_names(weights.iter().map(|w| w.category_id).collect())
            .await?;

        let mut result: Vec<CategoryWeight> = weights
            .into_iter()
            .map(|w| {
                let name = criteria_names.get(&w.category_id).cloned().unwrap_or_default();
                w.into_category_weight(name)
            })
            .collect();
        result.sort_by_key(|w| w.category_id);

        Ok(result)
    }

    async fn criteria_names(&self, ids: Vec<i64>) -> Result<HashMap<i64, String>> {
        let names = Criteria::find()
            .filter(CriteriaColumn::Id.is_in(ids))
            .all(&self.db)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("查询评估类别失败: {e}")))?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect();
        Ok(names)
    }

    /// 原子提交评估
    pub async fn submit_evaluation_impl(
        &self,
        evaluation_id: i64,
        submission: SubmitEvaluationRequest,
    ) -> Result<Evaluation> {
        match self.apply_submission(evaluation_id, &submission).await {
            Err(EvalSystemError::DatabaseOperation(msg)) => {
                // 存储错误后若评估已是 completed，说明并发提交先一步成功
                if self.is_evaluation_completed(evaluation_id).await {
                    warn!(
                        "Submission for evaluation {} lost to a concurrent submission: {}",
                        evaluation_id, msg
                    );
                    return Err(already_completed(evaluation_id));
                }
                Err(EvalSystemError::DatabaseOperation(msg))
            }
            other => other,
        }
    }

    async fn apply_submission(
        &self,
        evaluation_id: i64,
        submission: &SubmitEvaluationRequest,
    ) -> Result<Evaluation> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("开启提交事务失败: {e}")))?;

        match Self::write_submission(&txn, evaluation_id, submission).await {
            Ok(evaluation) => {
                txn.commit().await.map_err(|e| {
                    EvalSystemError::database_operation(format!("提交评估事务失败: {e}"))
                })?;
                info!(
                    "Evaluation {} completed with {} scores and {} weights",
                    evaluation_id,
                    submission.scores.len(),
                    submission.weights.len()
                );
                Ok(evaluation)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    warn!(
                        "Rollback of evaluation {} submission failed: {}",
                        evaluation_id, rollback_err
                    );
                }
                debug!("Submission for evaluation {} rolled back: {}", evaluation_id, e);
                Err(e)
            }
        }
    }

    async fn write_submission(
        txn: &DatabaseTransaction,
        evaluation_id: i64,
        submission: &SubmitEvaluationRequest,
    ) -> Result<Evaluation> {
        // 条件更新必须是事务的第一条语句（SQLite 读事务无法再升级为写事务）
        let completed_at = chrono::Utc::now().timestamp();
        let transition = Evaluations::update_many()
            .col_expr(
                EvaluationColumn::Status,
                Expr::value(EvaluationStatus::Completed.to_string()),
            )
            .col_expr(
                EvaluationColumn::GeneralComments,
                Expr::value(submission.general_comments.clone()),
            )
            .col_expr(EvaluationColumn::CompletedAt, Expr::value(Some(completed_at)))
            .filter(EvaluationColumn::Id.eq(evaluation_id))
            .filter(EvaluationColumn::Status.eq(EvaluationStatus::PENDING))
            .exec(txn)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("更新评估状态失败: {e}")))?;

        let evaluation = Evaluations::find_by_id(evaluation_id)
            .one(txn)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("查询评估失败: {e}")))?
            .ok_or_else(|| EvalSystemError::not_found(format!("评估不存在: {evaluation_id}")))?;

        if transition.rows_affected == 0 {
            return Err(already_completed(evaluation_id));
        }

        Self::check_references(txn, evaluation.standard_id, submission).await?;

        let scores = submission.scores.iter().map(|s| ScoreActiveModel {
            evaluation_id: Set(evaluation_id),
            subcriteria_id: Set(s.subcriteria_id),
            score: Set(s.score),
            comment: Set(s.comment.clone()),
            ..Default::default()
        });
        EvaluationScores::insert_many(scores)
            .exec_without_returning(txn)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("写入评分失败: {e}")))?;

        let weights = submission.weights.iter().map(|w| WeightActiveModel {
            evaluation_id: Set(evaluation_id),
            category_id: Set(w.category_id),
            weight_num: Set(w.weight_num),
            ..Default::default()
        });
        EvaluationCategoryWeights::insert_many(weights)
            .exec_without_returning(txn)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("写入类别权重失败: {e}")))?;

        Ok(evaluation.into_evaluation())
    }

    /// 评分的子指标与权重的类别必须属于评估所用标准，且每个被评分的类别都有权重
    async fn check_references(
        txn: &DatabaseTransaction,
        standard_id: i64,
        submission: &SubmitEvaluationRequest,
    ) -> Result<()> {
        let categories: HashSet<i64> = Criteria::find()
            .filter(CriteriaColumn::StandardId.eq(standard_id))
            .all(txn)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("查询评估类别失败: {e}")))?
            .into_iter()
            .map(|c| c.id)
            .collect();

        let sub_ids: Vec<i64> = submission.scores.iter().map(|s| s.subcriteria_id).collect();
        let sub_category: HashMap<i64, i64> = Subcriteria::find()
            .filter(SubcriteriaColumn::Id.is_in(sub_ids.clone()))
            .all(txn)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("查询子指标失败: {e}")))?
            .into_iter()
            .map(|s| (s.id, s.criteria_id))
            .collect();

        let foreign_subs: BTreeSet<i64> = sub_ids
            .iter()
            .copied()
            .filter(|id| {
                !sub_category
                    .get(id)
                    .is_some_and(|category| categories.contains(category))
            })
            .collect();
        if !foreign_subs.is_empty() {
            return Err(EvalSystemError::not_found(format!(
                "子指标不存在或不属于评估标准 {standard_id}: {}",
                join_ids(&foreign_subs)
            )));
        }

        let foreign_categories: BTreeSet<i64> = submission
            .weights
            .iter()
            .map(|w| w.category_id)
            .filter(|id| !categories.contains(id))
            .collect();
        if !foreign_categories.is_empty() {
            return Err(EvalSystemError::not_found(format!(
                "类别不存在或不属于评估标准 {standard_id}: {}",
                join_ids(&foreign_categories)
            )));
        }

        let weighted: HashSet<i64> = submission.weights.iter().map(|w| w.category_id).collect();
        let unweighted: BTreeSet<i64> = sub_ids
            .iter()
            .filter_map(|id| sub_category.get(id).copied())
            .filter(|category| !weighted.contains(category))
            .collect();
        if !unweighted.is_empty() {
            return Err(EvalSystemError::validation(format!(
                "以下类别有评分但没有权重: {}",
                join_ids(&unweighted)
            )));
        }

        Ok(())
    }

    async fn is_evaluation_completed(&self, evaluation_id: i64) -> bool {
        matches!(
            self.get_evaluation_by_id_impl(evaluation_id).await,
            Ok(Some(evaluation)) if evaluation.status == EvaluationStatus::Completed
        )
    }
}

fn already_completed(evaluation_id: i64) -> EvalSystemError {
    EvalSystemError::invalid_state(format!("评估 {evaluation_id} 已完成，不能重复提交"))
}

fn join_ids(ids: &BTreeSet<i64>) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

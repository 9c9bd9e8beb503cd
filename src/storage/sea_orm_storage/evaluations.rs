//! 评估存储操作

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::companies::{Column as CompanyColumn, Entity as Companies};
use crate::entity::evaluations::{ActiveModel, Column, Entity as Evaluations, Model};
use crate::entity::softwares::{Column as SoftwareColumn, Entity as Softwares};
use crate::entity::standards::{Column as StandardColumn, Entity as Standards};
use crate::entity::users::{Column as UserColumn, Entity as Users};
use crate::errors::{EvalSystemError, Result};
use crate::models::{
    PaginatedResponse, PaginationInfo,
    evaluations::{
        entities::{Evaluation, EvaluationOverview, EvaluationStatus},
        requests::{AssignEvaluationRequest, EvaluationListQuery},
    },
    users::entities::UserRole,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    /// 分配评估
    pub async fn create_evaluation_impl(&self, req: AssignEvaluationRequest) -> Result<Evaluation> {
        Softwares::find_by_id(req.software_id)
            .one(&self.db)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("查询软件失败: {e}")))?
            .ok_or_else(|| EvalSystemError::not_found(format!("软件不存在: {}", req.software_id)))?;

        Standards::find_by_id(req.standard_id)
            .one(&self.db)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("查询标准失败: {e}")))?
            .ok_or_else(|| EvalSystemError::not_found(format!("标准不存在: {}", req.standard_id)))?;

        let evaluator = self
            .get_user_by_id_impl(req.evaluator_id)
            .await?
            .ok_or_else(|| {
                EvalSystemError::not_found(format!("评估员不存在: {}", req.evaluator_id))
            })?;
        if evaluator.role != UserRole::Evaluator {
            return Err(EvalSystemError::validation(format!(
                "用户 {} 不是评估员",
                req.evaluator_id
            )));
        }

        let model = ActiveModel {
            software_id: Set(req.software_id),
            evaluator_id: Set(req.evaluator_id),
            standard_id: Set(req.standard_id),
            status: Set(EvaluationStatus::Pending.to_string()),
            general_comments: Set(req.general_comments),
            evaluation_date: Set(chrono::Utc::now().timestamp()),
            completed_at: Set(None),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("创建评估失败: {e}")))?;

        Ok(result.into_evaluation())
    }

    /// 通过 ID 获取评估
    pub async fn get_evaluation_by_id_impl(&self, id: i64) -> Result<Option<Evaluation>> {
        let result = Evaluations::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("查询评估失败: {e}")))?;

        Ok(result.map(|m| m.into_evaluation()))
    }

    /// 获取评估概览
    pub async fn get_evaluation_overview_impl(
        &self,
        id: i64,
    ) -> Result<Option<EvaluationOverview>> {
        let Some(model) = Evaluations::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("查询评估失败: {e}")))?
        else {
            return Ok(None);
        };

        Ok(self.build_overviews(vec![model]).await?.pop())
    }

    /// 分页列出评估（按 ID 倒序）
    pub async fn list_evaluations_with_pagination_impl(
        &self,
        query: EvaluationListQuery,
    ) -> Result<PaginatedResponse<EvaluationOverview>> {
        let page = query.page.max(1);
        let size = query.size.max(1);

        let mut select = Evaluations::find();

        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.as_str()));
        }
        if let Some(evaluator_id) = query.evaluator_id {
            select = select.filter(Column::EvaluatorId.eq(evaluator_id));
        }

        let paginator = select.order_by_desc(Column::Id).paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("查询评估总数失败: {e}")))?;

        let models = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("查询评估列表失败: {e}")))?;

        Ok(PaginatedResponse {
            items: self.build_overviews(models).await?,
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    /// 列出评估员的全部评估（按评估日期倒序）
    pub async fn list_evaluator_evaluations_impl(
        &self,
        evaluator_id: i64,
    ) -> Result<Vec<EvaluationOverview>> {
        let models = Evaluations::find()
            .filter(Column::EvaluatorId.eq(evaluator_id))
            .order_by_desc(Column::EvaluationDate)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("查询评估列表失败: {e}")))?;

        self.build_overviews(models).await
    }

    /// 批量关联软件、厂商、标准与评估员，保持输入顺序
    async fn build_overviews(&self, models: Vec<Model>) -> Result<Vec<EvaluationOverview>> {
        if models.is_empty() {
            return Ok(Vec::new());
        }

        let software_ids: Vec<i64> = models.iter().map(|m| m.software_id).collect();
        let evaluator_ids: Vec<i64> = models.iter().map(|m| m.evaluator_id).collect();
        let standard_ids: Vec<i64> = models.iter().map(|m| m.standard_id).collect();

        let softwares = Softwares::find()
            .filter(SoftwareColumn::Id.is_in(software_ids))
            .all(&self.db)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("查询软件失败: {e}")))?;

        let company_ids: Vec<i64> = softwares.iter().map(|s| s.company_id).collect();
        let company_map: HashMap<i64, String> = Companies::find()
            .filter(CompanyColumn::Id.is_in(company_ids))
            .all(&self.db)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("查询厂商失败: {e}")))?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect();

        let software_map: HashMap<i64, (String, String)> = softwares
            .into_iter()
            .map(|s| {
                let company = company_map.get(&s.company_id).cloned().unwrap_or_default();
                (s.id, (s.name, company))
            })
            .collect();

        let user_map: HashMap<i64, _> = Users::find()
            .filter(UserColumn::Id.is_in(evaluator_ids))
            .all(&self.db)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("查询评估员失败: {e}")))?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        let standard_map: HashMap<i64, String> = Standards::find()
            .filter(StandardColumn::Id.is_in(standard_ids))
            .all(&self.db)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("查询标准失败: {e}")))?
            .into_iter()
            .map(|s| (s.id, s.name))
            .collect();

        let overviews = models
            .into_iter()
            .map(|m| {
                let (software_name, company_name) =
                    software_map.get(&m.software_id).cloned().unwrap_or_default();
                let (evaluator_name, evaluator_email) = user_map
                    .get(&m.evaluator_id)
                    .map(|u| (u.name.clone(), u.email.clone()))
                    .unwrap_or_default();
                let standard_name = standard_map.get(&m.standard_id).cloned().unwrap_or_default();
                let evaluation = m.into_evaluation();

                EvaluationOverview {
                    id: evaluation.id,
                    software_id: evaluation.software_id,
                    software_name,
                    company_name,
                    evaluator_id: evaluation.evaluator_id,
                    evaluator_name,
                    evaluator_email,
                    standard_id: evaluation.standard_id,
                    standard_name,
                    status: evaluation.status,
                    general_comments: evaluation.general_comments,
                    evaluation_date: evaluation.evaluation_date,
                    completed_at: evaluation.completed_at,
                }
            })
            .collect();

        Ok(overviews)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{self, ids};
    use super::*;

    fn assign(software_id: i64, evaluator_id: i64, standard_id: i64) -> AssignEvaluationRequest {
        AssignEvaluationRequest {
            software_id,
            evaluator_id,
            standard_id,
            general_comments: None,
        }
    }

    #[tokio::test]
    async fn test_create_evaluation_starts_pending() {
        let storage = test_support::seeded_storage().await;

        let evaluation = storage
            .create_evaluation_impl(assign(ids::SOFTWARE, ids::EVALUATOR, ids::STANDARD))
            .await
            .unwrap();

        assert_eq!(evaluation.status, EvaluationStatus::Pending);
        assert!(evaluation.completed_at.is_none());
        assert_eq!(evaluation.evaluator_id, ids::EVALUATOR);
    }

    #[tokio::test]
    async fn test_create_evaluation_rejects_unknown_references() {
        let storage = test_support::seeded_storage().await;

        let err = storage
            .create_evaluation_impl(assign(999, ids::EVALUATOR, ids::STANDARD))
            .await
            .unwrap_err();
        assert!(matches!(err, EvalSystemError::NotFound(_)));

        let err = storage
            .create_evaluation_impl(assign(ids::SOFTWARE, ids::EVALUATOR, 999))
            .await
            .unwrap_err();
        assert!(matches!(err, EvalSystemError::NotFound(_)));

        let err = storage
            .create_evaluation_impl(assign(ids::SOFTWARE, 999, ids::STANDARD))
            .await
            .unwrap_err();
        assert!(matches!(err, EvalSystemError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_create_evaluation_requires_evaluator_role() {
        let storage = test_support::seeded_storage().await;

        let err = storage
            .create_evaluation_impl(assign(ids::SOFTWARE, ids::ADMIN, ids::STANDARD))
            .await
            .unwrap_err();
        assert!(matches!(err, EvalSystemError::Validation(_)));
    }

    #[tokio::test]
    async fn test_overview_joins_names() {
        let storage = test_support::seeded_storage().await;

        let overview = storage
            .get_evaluation_overview_impl(ids::EVALUATION)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(overview.software_name, "Gestor Académico");
        assert_eq!(overview.company_name, "Acme Software");
        assert_eq!(overview.standard_name, "ISO/IEC 25010");
        assert_eq!(overview.evaluator_name, "Eva Evaluadora");

        assert!(
            storage
                .get_evaluation_overview_impl(999)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_list_filters_and_paginates() {
        let storage = test_support::seeded_storage().await;
        for _ in 0..3 {
            storage
                .create_evaluation_impl(assign(ids::SOFTWARE, ids::OTHER_EVALUATOR, ids::STANDARD))
                .await
                .unwrap();
        }

        let page = storage
            .list_evaluations_with_pagination_impl(EvaluationListQuery {
                page: 1,
                size: 2,
                status: None,
                evaluator_id: Some(ids::OTHER_EVALUATOR),
            })
            .await
            .unwrap();
        assert_eq!(page.pagination.total, 3);
        assert_eq!(page.pagination.total_pages, 2);
        assert_eq!(page.items.len(), 2);
        assert!(page.items[0].id > page.items[1].id);

        let completed = storage
            .list_evaluations_with_pagination_impl(EvaluationListQuery {
                page: 1,
                size: 10,
                status: Some(EvaluationStatus::Completed),
                evaluator_id: None,
            })
            .await
            .unwrap();
        assert_eq!(completed.pagination.total, 0);
        assert!(completed.items.is_empty());
    }

    #[tokio::test]
    async fn test_list_evaluator_evaluations_only_own() {
        let storage = test_support::seeded_storage().await;

        let mine = storage
            .list_evaluator_evaluations_impl(ids::EVALUATOR)
            .await
            .unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id, ids::EVALUATION);

        let others = storage
            .list_evaluator_evaluations_impl(ids::OTHER_EVALUATOR)
            .await
            .unwrap();
        assert!(others.is_empty());
    }
}

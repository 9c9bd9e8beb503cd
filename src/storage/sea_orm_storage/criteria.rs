//! 标准指标树存储操作

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::criteria::{Column as CriteriaColumn, Entity as Criteria};
use crate::entity::standards::Entity as Standards;
use crate::entity::subcriteria::{Column as SubcriteriaColumn, Entity as Subcriteria};
use crate::errors::{EvalSystemError, Result};
use crate::models::criteria::responses::{CriteriaTreeResponse, CriterionNode, SubcriterionNode};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};

impl SeaOrmStorage {
    /// 获取标准的类别与子指标（均按 ID 升序）
    pub async fn get_criteria_tree_impl(
        &self,
        standard_id: i64,
    ) -> Result<Option<CriteriaTreeResponse>> {
        let Some(standard) = Standards::find_by_id(standard_id)
            .one(&self.db)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("查询标准失败: {e}")))?
        else {
            return Ok(None);
        };

        let criteria = Criteria::find()
            .filter(CriteriaColumn::StandardId.eq(standard_id))
            .order_by_asc(CriteriaColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("查询评估类别失败: {e}")))?;

        let criteria_ids: Vec<i64> = criteria.iter().map(|c| c.id).collect();
        let mut sub_map: HashMap<i64, Vec<SubcriterionNode>> = HashMap::new();
        if !criteria_ids.is_empty() {
            let subs = Subcriteria::find()
                .filter(SubcriteriaColumn::CriteriaId.is_in(criteria_ids))
                .order_by_asc(SubcriteriaColumn::Id)
                .all(&self.db)
                .await
                .map_err(|e| {
                    EvalSystemError::database_operation(format!("查询子指标失败: {e}"))
                })?;

            for sub in subs {
                sub_map.entry(sub.criteria_id).or_default().push(SubcriterionNode {
                    id: sub.id,
                    name: sub.name,
                    description: sub.description,
                });
            }
        }

        let criteria = criteria
            .into_iter()
            .map(|c| CriterionNode {
                subcriteria: sub_map.remove(&c.id).unwrap_or_default(),
                id: c.id,
                name: c.name,
                description: c.description,
            })
            .collect();

        Ok(Some(CriteriaTreeResponse {
            standard_id: standard.id,
            standard_name: standard.name,
            criteria,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{self, ids};

    #[tokio::test]
    async fn test_tree_is_ordered_and_scoped_to_standard() {
        let storage = test_support::seeded_storage().await;

        let tree = storage
            .get_criteria_tree_impl(ids::STANDARD)
            .await
            .unwrap()
            .unwrap();

        let criteria: Vec<i64> = tree.criteria.iter().map(|c| c.id).collect();
        assert_eq!(criteria, vec![ids::FUNCTIONALITY, ids::USABILITY]);

        let first: Vec<i64> = tree.criteria[0].subcriteria.iter().map(|s| s.id).collect();
        assert_eq!(first, vec![ids::SUB_COMPLETENESS, ids::SUB_CORRECTNESS]);
        assert_eq!(tree.criteria[1].subcriteria.len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_standard() {
        let storage = test_support::seeded_storage().await;
        assert!(storage.get_criteria_tree_impl(999).await.unwrap().is_none());
    }
}

//! 类别权重实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "evaluation_category_weights")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub evaluation_id: i64,
    pub category_id: i64,
    pub weight_num: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::evaluations::Entity",
        from = "Column::EvaluationId",
        to = "super::evaluations::Column::Id"
    )]
    Evaluation,
    #[sea_orm(
        belongs_to = "super::criteria::Entity",
        from = "Column::CategoryId",
        to = "super::criteria::Column::Id"
    )]
    Category,
}

impl Related<super::evaluations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Evaluation.def()
    }
}

impl Related<super::criteria::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_category_weight(
        self,
        category_name: String,
    ) -> crate::models::evaluations::entities::CategoryWeight {
        crate::models::evaluations::entities::CategoryWeight {
            category_id: self.category_id,
            category_name,
            weight_num: self.weight_num,
        }
    }
}

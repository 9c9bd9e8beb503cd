//! 评估实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "evaluations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub software_id: i64,
    pub evaluator_id: i64,
    pub standard_id: i64,
    pub status: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub general_comments: Option<String>,
    pub evaluation_date: i64,
    pub completed_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::softwares::Entity",
        from = "Column::SoftwareId",
        to = "super::softwares::Column::Id"
    )]
    Software,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::EvaluatorId",
        to = "super::users::Column::Id"
    )]
    Evaluator,
    #[sea_orm(
        belongs_to = "super::standards::Entity",
        from = "Column::StandardId",
        to = "super::standards::Column::Id"
    )]
    Standard,
    #[sea_orm(has_many = "super::evaluation_scores::Entity")]
    Scores,
    #[sea_orm(has_many = "super::evaluation_category_weights::Entity")]
    Weights,
}

impl Related<super::softwares::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Software.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Evaluator.def()
    }
}

impl Related<super::standards::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Standard.def()
    }
}

impl Related<super::evaluation_scores::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Scores.def()
    }
}

impl Related<super::evaluation_category_weights::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Weights.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_evaluation(self) -> crate::models::evaluations::entities::Evaluation {
        use crate::models::evaluations::entities::{Evaluation, EvaluationStatus};
        use chrono::{DateTime, Utc};

        Evaluation {
            id: self.id,
            software_id: self.software_id,
            evaluator_id: self.evaluator_id,
            standard_id: self.standard_id,
            status: self
                .status
                .parse::<EvaluationStatus>()
                .unwrap_or(EvaluationStatus::Pending),
            general_comments: self.general_comments,
            evaluation_date: DateTime::<Utc>::from_timestamp(self.evaluation_date, 0)
                .unwrap_or_default(),
            completed_at: self
                .completed_at
                .map(|ts| DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default()),
        }
    }
}

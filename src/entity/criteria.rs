//! 评估类别（一级指标）实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "criteria")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub standard_id: i64,
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::standards::Entity",
        from = "Column::StandardId",
        to = "super::standards::Column::Id"
    )]
    Standard,
    #[sea_orm(has_many = "super::subcriteria::Entity")]
    Subcriteria,
}

impl Related<super::standards::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Standard.def()
    }
}

impl Related<super::subcriteria::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subcriteria.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

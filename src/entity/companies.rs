//! 软件厂商实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "companies")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::softwares::Entity")]
    Softwares,
}

impl Related<super::softwares::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Softwares.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

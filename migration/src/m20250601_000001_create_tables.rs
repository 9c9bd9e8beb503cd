use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建用户表（评估员与管理员）
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Name).string().not_null())
                    .col(
                        ColumnDef::new(Users::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::Role).string().not_null())
                    .col(ColumnDef::new(Users::CreatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 创建公司表
        manager
            .create_table(
                Table::create()
                    .table(Companies::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Companies::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Companies::Name).string().not_null())
                    .to_owned(),
            )
            .await?;

        // 创建软件表
        manager
            .create_table(
                Table::create()
                    .table(Softwares::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Softwares::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Softwares::CompanyId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Softwares::Name).string().not_null())
                    .col(ColumnDef::new(Softwares::Description).text().null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Softwares::Table, Softwares::CompanyId)
                            .to(Companies::Table, Companies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建标准表
        manager
            .create_table(
                Table::create()
                    .table(Standards::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Standards::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Standards::Name).string().not_null())
                    .col(ColumnDef::new(Standards::Description).text().null())
                    .to_owned(),
            )
            .await?;

        // 创建评估类别（准则）表
        manager
            .create_table(
                Table::create()
                    .table(Criteria::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Criteria::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Criteria::StandardId).big_integer().not_null())
                    .col(ColumnDef::new(Criteria::Name).string().not_null())
                    .col(ColumnDef::new(Criteria::Description).text().null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Criteria::Table, Criteria::StandardId)
                            .to(Standards::Table, Standards::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建子准则表
        manager
            .create_table(
                Table::create()
                    .table(Subcriteria::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Subcriteria::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Subcriteria::CriteriaId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Subcriteria::Name).string().not_null())
                    .col(ColumnDef::new(Subcriteria::Description).text().null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Subcriteria::Table, Subcriteria::CriteriaId)
                            .to(Criteria::Table, Criteria::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建评估表
        manager
            .create_table(
                Table::create()
                    .table(Evaluations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Evaluations::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Evaluations::SoftwareId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Evaluations::EvaluatorId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Evaluations::StandardId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Evaluations::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(Evaluations::GeneralComments).text().null())
                    .col(
                        ColumnDef::new(Evaluations::EvaluationDate)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Evaluations::CompletedAt).big_integer().null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Evaluations::Table, Evaluations::SoftwareId)
                            .to(Softwares::Table, Softwares::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Evaluations::Table, Evaluations::EvaluatorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Evaluations::Table, Evaluations::StandardId)
                            .to(Standards::Table, Standards::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建评分表：每个 (评估, 子准则) 至多一条
        manager
            .create_table(
                Table::create()
                    .table(EvaluationScores::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EvaluationScores::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(EvaluationScores::EvaluationId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EvaluationScores::SubcriteriaId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(EvaluationScores::Score).integer().not_null())
                    .col(ColumnDef::new(EvaluationScores::Comment).text().null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(EvaluationScores::Table, EvaluationScores::EvaluationId)
                            .to(Evaluations::Table, Evaluations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(EvaluationScores::Table, EvaluationScores::SubcriteriaId)
                            .to(Subcriteria::Table, Subcriteria::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建类别权重表：每个 (评估, 类别) 至多一条
        manager
            .create_table(
                Table::create()
                    .table(EvaluationCategoryWeights::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EvaluationCategoryWeights::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(EvaluationCategoryWeights::EvaluationId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EvaluationCategoryWeights::CategoryId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EvaluationCategoryWeights::WeightNum)
                            .integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(
                                EvaluationCategoryWeights::Table,
                                EvaluationCategoryWeights::EvaluationId,
                            )
                            .to(Evaluations::Table, Evaluations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(
                                EvaluationCategoryWeights::Table,
                                EvaluationCategoryWeights::CategoryId,
                            )
                            .to(Criteria::Table, Criteria::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_evaluations_evaluator_id")
                    .table(Evaluations::Table)
                    .col(Evaluations::EvaluatorId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_criteria_standard_id")
                    .table(Criteria::Table)
                    .col(Criteria::StandardId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_subcriteria_criteria_id")
                    .table(Subcriteria::Table)
                    .col(Subcriteria::CriteriaId)
                    .to_owned(),
            )
            .await?;

        // 唯一约束：防止同一评估重复写入评分/权重
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_evaluation_scores_evaluation_subcriteria")
                    .table(EvaluationScores::Table)
                    .col(EvaluationScores::EvaluationId)
                    .col(EvaluationScores::SubcriteriaId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_evaluation_category_weights_evaluation_category")
                    .table(EvaluationCategoryWeights::Table)
                    .col(EvaluationCategoryWeights::EvaluationId)
                    .col(EvaluationCategoryWeights::CategoryId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 按照创建的相反顺序删除
        manager
            .drop_table(
                Table::drop()
                    .table(EvaluationCategoryWeights::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(EvaluationScores::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Evaluations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Subcriteria::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Criteria::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Standards::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Softwares::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Companies::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    #[sea_orm(iden = "users")]
    Table,
    Id,
    Name,
    Email,
    Role,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Companies {
    #[sea_orm(iden = "companies")]
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum Softwares {
    #[sea_orm(iden = "softwares")]
    Table,
    Id,
    CompanyId,
    Name,
    Description,
}

#[derive(DeriveIden)]
enum Standards {
    #[sea_orm(iden = "standards")]
    Table,
    Id,
    Name,
    Description,
}

#[derive(DeriveIden)]
enum Criteria {
    #[sea_orm(iden = "criteria")]
    Table,
    Id,
    StandardId,
    Name,
    Description,
}

#[derive(DeriveIden)]
enum Subcriteria {
    #[sea_orm(iden = "subcriteria")]
    Table,
    Id,
    CriteriaId,
    Name,
    Description,
}

#[derive(DeriveIden)]
enum Evaluations {
    #[sea_orm(iden = "evaluations")]
    Table,
    Id,
    SoftwareId,
    EvaluatorId,
    StandardId,
    Status,
    GeneralComments,
    EvaluationDate,
    CompletedAt,
}

#[derive(DeriveIden)]
enum EvaluationScores {
    #[sea_orm(iden = "evaluation_scores")]
    Table,
    Id,
    EvaluationId,
    SubcriteriaId,
    Score,
    Comment,
}

#[derive(DeriveIden)]
enum EvaluationCategoryWeights {
    #[sea_orm(iden = "evaluation_category_weights")]
    Table,
    Id,
    EvaluationId,
    CategoryId,
    WeightNum,
}

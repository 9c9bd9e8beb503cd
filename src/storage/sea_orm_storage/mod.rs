//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod criteria;
mod evaluations;
mod scoring;
mod users;

#[cfg(test)]
pub(crate) mod test_support;

use crate::config::AppConfig;
use crate::errors::{EvalSystemError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config.database.pool_size, config.database.timeout)
                .await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!(
            "SeaORM 存储初始化完成，数据库类型: {}",
            db_url.split("://").next().unwrap_or("unknown")
        );

        Ok(Self { db })
    }

    /// 使用已建立的连接（不运行迁移）
    pub fn from_connection(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(
        url: &str,
        max_connections: u32,
        acquire_timeout_secs: u64,
    ) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| EvalSystemError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory")
            .pragma("mmap_size", "536870912")
            .pragma("wal_autocheckpoint", "1000");

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(acquire_timeout_secs))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| EvalSystemError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| EvalSystemError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") || url == ":memory:" {
            Ok(format!("sqlite://{}?mode=rwc", url))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(EvalSystemError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_database_url() {
        assert_eq!(
            SeaOrmStorage::build_database_url("evalsystem.db").unwrap(),
            "sqlite://evalsystem.db?mode=rwc"
        );
        assert_eq!(
            SeaOrmStorage::build_database_url("postgres://u:p@localhost/eval").unwrap(),
            "postgres://u:p@localhost/eval"
        );
        assert!(matches!(
            SeaOrmStorage::build_database_url("ftp://nope"),
            Err(EvalSystemError::DatabaseConfig(_))
        ));
    }
}

// Storage trait 实现
use crate::models::{
    PaginatedResponse,
    criteria::responses::CriteriaTreeResponse,
    evaluations::{
        entities::{CategoryWeight, Evaluation, EvaluationOverview, ScoreLine},
        requests::{AssignEvaluationRequest, EvaluationListQuery, SubmitEvaluationRequest},
    },
    users::entities::User,
};
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    // 评估模块
    async fn create_evaluation(&self, req: AssignEvaluationRequest) -> Result<Evaluation> {
        self.create_evaluation_impl(req).await
    }

    async fn get_evaluation_by_id(&self, id: i64) -> Result<Option<Evaluation>> {
        self.get_evaluation_by_id_impl(id).await
    }

    async fn get_evaluation_overview(&self, id: i64) -> Result<Option<EvaluationOverview>> {
        self.get_evaluation_overview_impl(id).await
    }

    async fn list_evaluations_with_pagination(
        &self,
        query: EvaluationListQuery,
    ) -> Result<PaginatedResponse<EvaluationOverview>> {
        self.list_evaluations_with_pagination_impl(query).await
    }

    async fn list_evaluator_evaluations(
        &self,
        evaluator_id: i64,
    ) -> Result<Vec<EvaluationOverview>> {
        self.list_evaluator_evaluations_impl(evaluator_id).await
    }

    // 评分模块
    async fn list_evaluation_scores(&self, evaluation_id: i64) -> Result<Vec<ScoreLine>> {
        self.list_evaluation_scores_impl(evaluation_id).await
    }

    async fn list_evaluation_weights(&self, evaluation_id: i64) -> Result<Vec<CategoryWeight>> {
        self.list_evaluation_weights_impl(evaluation_id).await
    }

    async fn submit_evaluation(
        &self,
        evaluation_id: i64,
        submission: SubmitEvaluationRequest,
    ) -> Result<Evaluation> {
        self.submit_evaluation_impl(evaluation_id, submission).await
    }

    // 标准模块
    async fn get_criteria_tree(&self, standard_id: i64) -> Result<Option<CriteriaTreeResponse>> {
        self.get_criteria_tree_impl(standard_id).await
    }
}

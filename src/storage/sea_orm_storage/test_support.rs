//! 测试用内存数据库与种子数据

use super::SeaOrmStorage;
use crate::entity::{
    companies, criteria, evaluations, softwares, standards, subcriteria, users,
};
use crate::models::evaluations::entities::EvaluationStatus;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};

pub mod ids {
    pub const ADMIN: i64 = 1;
    pub const EVALUATOR: i64 = 2;
    pub const OTHER_EVALUATOR: i64 = 3;

    pub const SOFTWARE: i64 = 1;

    pub const STANDARD: i64 = 1;
    pub const FUNCTIONALITY: i64 = 1;
    pub const USABILITY: i64 = 2;
    pub const SUB_COMPLETENESS: i64 = 1;
    pub const SUB_CORRECTNESS: i64 = 2;
    pub const SUB_LEARNABILITY: i64 = 3;

    pub const OTHER_STANDARD: i64 = 2;
    pub const FOREIGN_CATEGORY: i64 = 3;
    pub const FOREIGN_SUB: i64 = 4;

    pub const EVALUATION: i64 = 1;
}

/// 单连接内存 SQLite（每个连接独立一个库），并执行迁移
pub async fn memory_storage() -> SeaOrmStorage {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).min_connections(1).sqlx_logging(false);

    let db = Database::connect(opt)
        .await
        .expect("failed to open in-memory sqlite");
    Migrator::up(&db, None)
        .await
        .expect("failed to run migrations");

    SeaOrmStorage::from_connection(db)
}

/// 文件型 SQLite，连接方式与生产相同（WAL、多连接池），并写入基础数据
pub async fn file_storage(dir: &tempfile::TempDir) -> SeaOrmStorage {
    let url = format!(
        "sqlite://{}?mode=rwc",
        dir.path().join("evalsystem.db").display()
    );
    let db = SeaOrmStorage::connect_sqlite(&url, 8, 5)
        .await
        .expect("failed to open file sqlite");
    Migrator::up(&db, None)
        .await
        .expect("failed to run migrations");
    seed(&db).await;

    SeaOrmStorage::from_connection(db)
}

/// 内存库并写入基础数据：
/// 标准 1 有两个类别（1: 两个子指标，2: 一个子指标），标准 2 有一个类别与子指标，
/// 评估 1 分配给评估员 2，状态 pending。
pub async fn seeded_storage() -> SeaOrmStorage {
    let storage = memory_storage().await;
    seed(&storage.db).await;
    storage
}

async fn seed(db: &DatabaseConnection) {
    let now = chrono::Utc::now().timestamp();

    for (id, name, email, role) in [
        (ids::ADMIN, "Ana Admin", "admin@example.com", "admin"),
        (ids::EVALUATOR, "Eva Evaluadora", "eva@example.com", "evaluator"),
        (ids::OTHER_EVALUATOR, "Otro Evaluador", "otro@example.com", "evaluator"),
    ] {
        users::ActiveModel {
            id: Set(id),
            name: Set(name.to_string()),
            email: Set(email.to_string()),
            role: Set(role.to_string()),
            created_at: Set(now),
        }
        .insert(db)
        .await
        .expect("seed user");
    }

    companies::ActiveModel {
        id: Set(1),
        name: Set("Acme Software".to_string()),
    }
    .insert(db)
    .await
    .expect("seed company");

    softwares::ActiveModel {
        id: Set(ids::SOFTWARE),
        company_id: Set(1),
        name: Set("Gestor Académico".to_string()),
        description: Set(None),
    }
    .insert(db)
    .await
    .expect("seed software");

    for (id, name) in [
        (ids::STANDARD, "ISO/IEC 25010"),
        (ids::OTHER_STANDARD, "ISO/IEC 9126"),
    ] {
        standards::ActiveModel {
            id: Set(id),
            name: Set(name.to_string()),
            description: Set(None),
        }
        .insert(db)
        .await
        .expect("seed standard");
    }

    for (id, standard_id, name) in [
        (ids::FUNCTIONALITY, ids::STANDARD, "Funcionalidad"),
        (ids::USABILITY, ids::STANDARD, "Usabilidad"),
        (ids::FOREIGN_CATEGORY, ids::OTHER_STANDARD, "Fiabilidad"),
    ] {
        criteria::ActiveModel {
            id: Set(id),
            standard_id: Set(standard_id),
            name: Set(name.to_string()),
            description: Set(None),
        }
        .insert(db)
        .await
        .expect("seed criterion");
    }

    for (id, criteria_id, name) in [
        (ids::SUB_COMPLETENESS, ids::FUNCTIONALITY, "Completitud"),
        (ids::SUB_CORRECTNESS, ids::FUNCTIONALITY, "Corrección"),
        (ids::SUB_LEARNABILITY, ids::USABILITY, "Aprendizaje"),
        (ids::FOREIGN_SUB, ids::FOREIGN_CATEGORY, "Madurez"),
    ] {
        subcriteria::ActiveModel {
            id: Set(id),
            criteria_id: Set(criteria_id),
            name: Set(name.to_string()),
            description: Set(None),
        }
        .insert(db)
        .await
        .expect("seed subcriterion");
    }

    evaluations::ActiveModel {
        id: Set(ids::EVALUATION),
        software_id: Set(ids::SOFTWARE),
        evaluator_id: Set(ids::EVALUATOR),
        standard_id: Set(ids::STANDARD),
        status: Set(EvaluationStatus::Pending.to_string()),
        general_comments: Set(None),
        evaluation_date: Set(now),
        completed_at: Set(None),
    }
    .insert(db)
    .await
    .expect("seed evaluation");
}

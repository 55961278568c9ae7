use std::str::FromStr;
use std::{fs, path::Path};

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Pool, Sqlite};

mod models;
mod repo;

#[derive(Clone)]
pub struct Db {
    pub(crate) pool: Pool<Sqlite>,
}

impl Db {
    pub async fn new(db_url: &str) -> Result<Self, domain::Error> {
        if db_url.starts_with("sqlite://") && !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite://");
            let path = Path::new(path_str);
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    fs::create_dir_all(parent)
                        .map_err(|e| domain::Error::Storage(e.to_string()))?;
                }
            }
        }

        // foreign_keys 必须在每条连接上生效，级联删除与 SET NULL 都依赖它
        let options = SqliteConnectOptions::from_str(db_url)
            .map_err(map_err)?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .map_err(map_err)?;

        sqlx::migrate!("../../migrations")
            .run(&pool)
            .await
            .map_err(|e| domain::Error::Storage(e.to_string()))?;

        tracing::info!("database ready at {}", db_url);
        Ok(Self { pool })
    }

    /// 测试用内存库：单连接，否则每条池化连接各自是一个空库。
    pub async fn open_in_memory() -> Result<Self, domain::Error> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(map_err)?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(map_err)?;

        sqlx::migrate!("../../migrations")
            .run(&pool)
            .await
            .map_err(|e| domain::Error::Storage(e.to_string()))?;

        Ok(Self { pool })
    }
}

/// sqlx 错误到核心错误种类的映射。存储层报告的唯一性冲突是预期内的
/// 合法失败（见 slug 竞态），必须保持可区分。
pub(crate) fn map_err(e: sqlx::Error) -> domain::Error {
    if let sqlx::Error::Database(db) = &e {
        if db.kind() == sqlx::error::ErrorKind::UniqueViolation {
            return domain::Error::Conflict;
        }
    }
    match e {
        sqlx::Error::RowNotFound => domain::Error::NotFound,
        other => domain::Error::Storage(other.to_string()),
    }
}

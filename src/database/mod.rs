/// Postgres 연결 풀과 스키마 관리
// region:    --- Imports
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::future::Future;
use std::pin::Pin;
use tracing::{info, warn};

// endregion: --- Imports

const SCHEMA_SQL: &str = include_str!("../../sql/01-create-schema.sql");

pub struct DatabaseManager {
    pool: PgPool,
}

impl DatabaseManager {
    /// 연결 풀 생성
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        info!(
            "{:<12} --> 연결 풀 생성 (max_connections={})",
            "Database", max_connections
        );
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// 트랜잭션 실행: 클로저가 Ok 면 커밋, Err 면 롤백
    pub async fn transaction<F, R, E>(&self, f: F) -> Result<R, E>
    where
        F: for<'c> FnOnce(
            &'c mut sqlx::Transaction<'_, sqlx::Postgres>,
        ) -> Pin<Box<dyn Future<Output = Result<R, E>> + Send + 'c>>,
        E: From<sqlx::Error>,
    {
        let mut tx = self.pool.begin().await?;
        match f(&mut tx).await {
            Ok(r) => {
                tx.commit().await?;
                Ok(r)
            }
            Err(e) => {
                warn!("{:<12} --> 트랜잭션 롤백", "Database");
                tx.rollback().await?;
                Err(e)
            }
        }
    }

    /// 스키마 생성 (이미 있으면 유지)
    pub async fn initialize_database(&self) -> Result<(), sqlx::Error> {
        let mut applied = 0;
        for statement in schema_statements(SCHEMA_SQL) {
            sqlx::query(statement).execute(&self.pool).await?;
            applied += 1;
        }
        info!("{:<12} --> 스키마 적용: {} statements", "Database", applied);
        Ok(())
    }
}

/// ';' 로 구분된 SQL 스크립트를 개별 문장으로 분리 (빈 문장 제외)
fn schema_statements(sql: &str) -> impl Iterator<Item = &str> {
    sql.split(';').map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_statements() {
        let statements: Vec<&str> = schema_statements("CREATE A;\n\n  CREATE B ; ;").collect();
        assert_eq!(statements, vec!["CREATE A", "CREATE B"]);
    }

    #[test]
    fn test_bundled_schema_creates_tables() {
        let statements: Vec<&str> = schema_statements(SCHEMA_SQL).collect();
        assert!(statements
            .iter()
            .any(|s| s.contains("CREATE TABLE IF NOT EXISTS auctions")));
        assert!(statements
            .iter()
            .any(|s| s.contains("CREATE TABLE IF NOT EXISTS auction_bids")));
    }
}

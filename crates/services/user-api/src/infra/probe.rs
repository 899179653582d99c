//! Connectivity probe against the live connection pool.

use async_trait::async_trait;
use sea_orm::{ConnectionTrait, DbBackend, DbErr, Statement, TransactionTrait};
use serde::Serialize;

#[cfg(test)]
use mockall::automock;

use super::Database;

/// Product metadata read from a live connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatabaseInfo {
    pub product_name: String,
    pub product_version: String,
}

/// Checks that a connection can be acquired and queried.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ConnectivityProbe: Send + Sync {
    /// Acquire one connection, read product metadata, release the connection.
    async fn probe(&self) -> Result<DatabaseInfo, DbErr>;

    /// Cheap liveness check against the pool.
    async fn ping(&self) -> Result<(), DbErr>;
}

#[async_trait]
impl ConnectivityProbe for Database {
    async fn probe(&self) -> Result<DatabaseInfo, DbErr> {
        let backend = self.connection().get_database_backend();
        let product_version = self.read_version(version_query(backend)).await?;

        Ok(DatabaseInfo {
            product_name: product_name(backend).to_string(),
            product_version,
        })
    }

    async fn ping(&self) -> Result<(), DbErr> {
        Database::ping(self).await
    }
}

impl Database {
    /// Run `sql` on one pinned connection and read its `version` column.
    async fn read_version(&self, sql: &str) -> Result<String, DbErr> {
        let backend = self.connection().get_database_backend();

        // The transaction pins one pooled connection until it is committed or
        // dropped, so every early return below hands the connection back.
        let txn = self.connection().begin().await?;

        let row = txn
            .query_one(Statement::from_string(backend, sql.to_string()))
            .await?
            .ok_or_else(|| DbErr::RecordNotFound("database version".to_string()))?;
        let version: String = row.try_get("", "version")?;

        txn.commit().await?;
        Ok(version)
    }
}

fn product_name(backend: DbBackend) -> &'static str {
    match backend {
        DbBackend::Postgres => "PostgreSQL",
        DbBackend::MySql => "MySQL",
        DbBackend::Sqlite => "SQLite",
    }
}

fn version_query(backend: DbBackend) -> &'static str {
    match backend {
        DbBackend::Postgres => "SELECT current_setting('server_version') AS version",
        DbBackend::MySql => "SELECT VERSION() AS version",
        DbBackend::Sqlite => "SELECT sqlite_version() AS version",
    }
}

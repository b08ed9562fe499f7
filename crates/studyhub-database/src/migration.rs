//! Database migration runner and open-time schema upgrade.
//!
//! Migrations create the current layout on a fresh store. Stores written
//! by older versions may lack the `sort_order` column or carry a parent
//! index keyed by the wrong column; [`upgrade_schema`] repairs both. It
//! only runs when the store is opened and is idempotent.

use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{info, warn};

use studyhub_core::error::{AppError, ErrorKind};
use studyhub_core::result::AppResult;

/// Tables that carry a display-order column.
const ORDERED_TABLES: [&str; 3] = ["folders", "topics", "lessons"];

/// Column holding the display order.
const ORDER_COLUMN: &str = "sort_order";

/// A secondary index on a child collection's parent key.
#[derive(Debug, Clone, Copy)]
struct ParentIndex {
    name: &'static str,
    table: &'static str,
    column: &'static str,
}

const PARENT_INDEXES: [ParentIndex; 3] = [
    ParentIndex {
        name: "topics_by_parent",
        table: "topics",
        column: "folder_id",
    },
    ParentIndex {
        name: "lessons_by_parent",
        table: "lessons",
        column: "topic_id",
    },
    ParentIndex {
        name: "files_by_parent",
        table: "files",
        column: "lesson_id",
    },
];

/// What the schema upgrade changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpgradeReport {
    /// Tables that received the missing `sort_order` column.
    pub added_order_columns: Vec<String>,
    /// Indexes that were keyed by the wrong column and got rebuilt.
    pub rebuilt_indexes: Vec<String>,
    /// Indexes that were missing and got created.
    pub created_indexes: Vec<String>,
}

impl UpgradeReport {
    /// Whether the store was already up to date.
    pub fn is_noop(&self) -> bool {
        self.added_order_columns.is_empty()
            && self.rebuilt_indexes.is_empty()
            && self.created_indexes.is_empty()
    }
}

/// Run all pending database migrations.
pub async fn run_migrations(pool: &SqlitePool) -> AppResult<()> {
    info!("Running database migrations...");

    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::StorageUnavailable,
                format!("Failed to run migrations: {e}"),
                e,
            )
        })?;

    info!("Database migrations completed successfully");
    Ok(())
}

/// Bring a store written by an older layout up to date.
pub async fn upgrade_schema(pool: &SqlitePool) -> AppResult<UpgradeReport> {
    let mut report = UpgradeReport::default();

    for table in ORDERED_TABLES {
        if !column_exists(pool, table, ORDER_COLUMN).await? {
            warn!(table, column = ORDER_COLUMN, "Adding missing column");
            execute(
                pool,
                &format!("ALTER TABLE {table} ADD COLUMN {ORDER_COLUMN} INTEGER"),
            )
            .await?;
            report.added_order_columns.push(table.to_string());
        }
    }

    for index in PARENT_INDEXES {
        let key_columns = index_columns(pool, index.name).await?;
        if key_columns.is_empty() {
            info!(index = index.name, "Creating missing parent index");
            create_index(pool, index).await?;
            report.created_indexes.push(index.name.to_string());
        } else if key_columns != [index.column] {
            warn!(
                index = index.name,
                found = ?key_columns,
                expected = index.column,
                "Rebuilding parent index keyed by the wrong column"
            );
            execute(pool, &format!("DROP INDEX IF EXISTS {}", index.name)).await?;
            create_index(pool, index).await?;
            report.rebuilt_indexes.push(index.name.to_string());
        }
    }

    if report.is_noop() {
        info!("Schema is up to date");
    } else {
        info!(
            added_columns = report.added_order_columns.len(),
            rebuilt_indexes = report.rebuilt_indexes.len(),
            created_indexes = report.created_indexes.len(),
            "Schema upgraded"
        );
    }
    Ok(report)
}

async fn column_exists(pool: &SqlitePool, table: &str, column: &str) -> AppResult<bool> {
    let columns: Vec<String> = sqlx::query_scalar("SELECT name FROM pragma_table_info(?1)")
        .bind(table)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::StorageUnavailable,
                format!("Failed to inspect table '{table}'"),
                e,
            )
        })?;
    Ok(columns.iter().any(|c| c == column))
}

async fn index_columns(pool: &SqlitePool, index: &str) -> AppResult<Vec<String>> {
    sqlx::query_scalar("SELECT name FROM pragma_index_info(?1) ORDER BY seqno")
        .bind(index)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::StorageUnavailable,
                format!("Failed to inspect index '{index}'"),
                e,
            )
        })
}

async fn create_index(pool: &SqlitePool, index: ParentIndex) -> AppResult<()> {
    execute(
        pool,
        &format!(
            "CREATE INDEX IF NOT EXISTS {} ON {} ({})",
            index.name, index.table, index.column
        ),
    )
    .await
}

async fn execute(pool: &SqlitePool, sql: &str) -> AppResult<()> {
    sqlx::query(sql).execute(pool).await.map_err(|e| {
        AppError::with_source(
            ErrorKind::StorageUnavailable,
            format!("Schema upgrade failed: {sql}"),
            e,
        )
    })?;
    Ok(())
}

//! Repository layer for recipe history.

use super::migrations::is_valid_table_name;
use crate::domain::{Gsc, TimeMs};
use crate::recipes::Catalog;
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("no history table for recipe: {0}")]
    UnknownTable(String),
    #[error(transparent)]
    Db(#[from] sqlx::Error),
}

/// One persisted snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRow {
    pub id: i64,
    pub timestamp: TimeMs,
    pub crafting_cost: Gsc,
    pub sell: Gsc,
}

/// Repository for history tables, one per trackable recipe.
#[derive(Debug)]
pub struct Repository {
    pool: SqlitePool,
    tables: Vec<String>,
}

impl Repository {
    /// Create a repository over the tables of every trackable catalog recipe.
    pub fn new(pool: SqlitePool, catalog: &Catalog) -> Self {
        let tables = catalog
            .trackable()
            .map(|r| r.slug.to_string())
            .filter(|t| is_valid_table_name(t))
            .collect();
        Repository { pool, tables }
    }

    /// Round-trip a trivial query to confirm the pool is usable.
    pub async fn ping(&self) -> Result<(), RepoError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    pub fn tables(&self) -> &[String] {
        &self.tables
    }

    fn table(&self, recipe: &str) -> Result<&str, RepoError> {
        self.tables
            .iter()
            .find(|t| t.as_str() == recipe)
            .map(String::as_str)
            .ok_or_else(|| RepoError::UnknownTable(recipe.to_string()))
    }

    /// Append one snapshot row.
    ///
    /// # Errors
    /// Returns an error if the recipe has no table or the insert fails.
    pub async fn insert_snapshot(
        &self,
        recipe: &str,
        timestamp: TimeMs,
        crafting_cost: Gsc,
        sell: Gsc,
    ) -> Result<i64, RepoError> {
        let table = self.table(recipe)?;
        let sql = format!(
            r#"
            INSERT INTO {table} (
                timestamp, crafting_cost_g, crafting_cost_s, crafting_cost_c,
                sell_g, sell_s, sell_c
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
            "#
        );

        let result = sqlx::query(&sql)
            .bind(timestamp.as_ms())
            .bind(crafting_cost.gold)
            .bind(crafting_cost.silver)
            .bind(crafting_cost.copper)
            .bind(sell.gold)
            .bind(sell.silver)
            .bind(sell.copper)
            .execute(&self.pool)
            .await?;

        Ok(result.last_insert_rowid())
    }

    /// Rows within an optional inclusive time window, oldest first.
    ///
    /// # Errors
    /// Returns an error if the recipe has no table or the query fails.
    pub async fn query_history(
        &self,
        recipe: &str,
        from_ms: Option<TimeMs>,
        to_ms: Option<TimeMs>,
    ) -> Result<Vec<HistoryRow>, RepoError> {
        let table = self.table(recipe)?;
        let from_ms = from_ms.unwrap_or(TimeMs::new(i64::MIN)).as_ms();
        let to_ms = to_ms.unwrap_or(TimeMs::new(i64::MAX)).as_ms();

        let sql = format!(
            r#"
            SELECT id, timestamp, crafting_cost_g, crafting_cost_s, crafting_cost_c,
                   sell_g, sell_s, sell_c
            FROM {table}
            WHERE timestamp >= ? AND timestamp <= ?
            ORDER BY timestamp ASC, id ASC
            "#
        );

        let rows = sqlx::query(&sql)
            .bind(from_ms)
            .bind(to_ms)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(row_to_history).collect())
    }

    /// Number of rows stored for a recipe.
    pub async fn count(&self, recipe: &str) -> Result<i64, RepoError> {
        let table = self.table(recipe)?;
        let row = sqlx::query(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get(0))
    }

    /// Delete rows older than `cutoff` from every table in one transaction.
    ///
    /// Returns the number of deleted rows.
    pub async fn delete_older_than(&self, cutoff: TimeMs) -> Result<u64, RepoError> {
        let mut tx = self.pool.begin().await?;
        let mut deleted = 0u64;

        for table in &self.tables {
            let result = sqlx::query(&format!("DELETE FROM {table} WHERE timestamp < ?"))
                .bind(cutoff.as_ms())
                .execute(&mut *tx)
                .await?;
            deleted += result.rows_affected();
        }

        tx.commit().await?;
        Ok(deleted)
    }
}

fn row_to_history(row: &SqliteRow) -> HistoryRow {
    HistoryRow {
        id: row.get("id"),
        timestamp: TimeMs::new(row.get("timestamp")),
        crafting_cost: Gsc::new(
            row.get("crafting_cost_g"),
            row.get("crafting_cost_s"),
            row.get("crafting_cost_c"),
        ),
        sell: Gsc::new(row.get("sell_g"), row.get("sell_s"), row.get("sell_c")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_db;
    use tempfile::TempDir;

    async fn setup() -> (Repository, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir
            .path()
            .join("test.db")
            .to_string_lossy()
            .to_string();
        let catalog = Catalog::builtin();
        let pool = init_db(&db_path, &catalog).await.expect("init_db failed");
        (Repository::new(pool, &catalog), temp_dir)
    }

    #[tokio::test]
    async fn test_insert_and_query_roundtrip() {
        let (repo, _temp) = setup().await;

        let id = repo
            .insert_snapshot(
                "scholar_rune",
                TimeMs::new(1_000),
                Gsc::new(5, 7, 0),
                Gsc::new(10, 0, 0),
            )
            .await
            .unwrap();

        let rows = repo.query_history("scholar_rune", None, None).await.unwrap();
        assert_eq!(
            rows,
            vec![HistoryRow {
                id,
                timestamp: TimeMs::new(1_000),
                crafting_cost: Gsc::new(5, 7, 0),
                sell: Gsc::new(10, 0, 0),
            }]
        );
    }

    #[tokio::test]
    async fn test_negative_limbs_persist() {
        let (repo, _temp) = setup().await;
        repo.insert_snapshot(
            "gear_salvage",
            TimeMs::new(1),
            Gsc::new(-1, -2, -3),
            Gsc::new(0, 0, 0),
        )
        .await
        .unwrap();
        let rows = repo.query_history("gear_salvage", None, None).await.unwrap();
        assert_eq!(rows[0].crafting_cost, Gsc::new(-1, -2, -3));
    }

    #[tokio::test]
    async fn test_query_window_and_order() {
        let (repo, _temp) = setup().await;
        for ts in [3_000, 1_000, 2_000, 4_000] {
            repo.insert_snapshot(
                "relic_of_fireworks",
                TimeMs::new(ts),
                Gsc::default(),
                Gsc::default(),
            )
            .await
            .unwrap();
        }

        let rows = repo
            .query_history(
                "relic_of_fireworks",
                Some(TimeMs::new(1_500)),
                Some(TimeMs::new(3_000)),
            )
            .await
            .unwrap();
        let stamps: Vec<i64> = rows.iter().map(|r| r.timestamp.as_ms()).collect();
        assert_eq!(stamps, vec![2_000, 3_000]);
    }

    #[tokio::test]
    async fn test_unknown_table_rejected() {
        let (repo, _temp) = setup().await;
        let err = repo.query_history("t5_mats", None, None).await.unwrap_err();
        assert!(matches!(err, RepoError::UnknownTable(_)));
        let err = repo
            .insert_snapshot("nope", TimeMs::new(0), Gsc::default(), Gsc::default())
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::UnknownTable(_)));
    }

    #[tokio::test]
    async fn test_delete_older_than_sweeps_all_tables() {
        let (repo, _temp) = setup().await;
        for table in ["scholar_rune", "gear_to_ecto"] {
            for ts in [100, 200, 300] {
                repo.insert_snapshot(table, TimeMs::new(ts), Gsc::default(), Gsc::default())
                    .await
                    .unwrap();
            }
        }

        let deleted = repo.delete_older_than(TimeMs::new(250)).await.unwrap();
        assert_eq!(deleted, 4);
        assert_eq!(repo.count("scholar_rune").await.unwrap(), 1);
        assert_eq!(repo.count("gear_to_ecto").await.unwrap(), 1);
    }
}

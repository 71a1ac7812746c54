use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};
use tax_core::{AllowanceBound, AllowanceType, RepositoryError, TaxBracket, TaxRepository};
use tracing::debug;

use crate::row::{decimal_to_f64, get_allowance_type, get_decimal};

pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    /// Connect to a sqlx-style URL such as `sqlite:taxes.db?mode=rwc` or
    /// `sqlite::memory:`.
    ///
    /// Every connection to `:memory:` opens a separate database, so the
    /// pool is pinned to one connection in that case.
    pub async fn new(database_url: &str) -> Result<Self> {
        let mut options = SqlitePoolOptions::new();
        if database_url.contains(":memory:") {
            options = options.max_connections(1);
        }

        let pool = options
            .connect(database_url)
            .await
            .with_context(|| format!("Failed to connect to database: {}", database_url))?;
        Ok(Self { pool })
    }

    pub async fn new_with_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;
        Ok(())
    }

    /// Load and execute all SQL seed files from the specified directory.
    /// Files are executed in alphabetical order by filename.
    pub async fn run_seeds(
        &self,
        seeds_dir: &Path,
    ) -> Result<()> {
        let mut entries: Vec<_> = std::fs::read_dir(seeds_dir)
            .with_context(|| format!("Failed to read seeds directory '{}'", seeds_dir.display()))?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "sql"))
            .collect();

        entries.sort_by_key(|entry| entry.file_name());

        for entry in entries {
            let path = entry.path();
            let sql = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read seed file '{}'", path.display()))?;

            sqlx::raw_sql(&sql)
                .execute(&self.pool)
                .await
                .with_context(|| format!("Failed to execute seed file '{}'", path.display()))?;

            debug!(file = %path.display(), "applied seed file");
        }

        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn row_to_allowance_bound(row: &SqliteRow) -> Result<AllowanceBound, RepositoryError> {
    Ok(AllowanceBound {
        allowance_type: get_allowance_type(row, "allowance_type")?,
        min_amount: get_decimal(row, "min_amount")?,
        max_amount: get_decimal(row, "max_amount")?,
    })
}

#[async_trait]
impl TaxRepository for SqliteRepository {
    async fn list_allowance_bounds(&self) -> Result<Vec<AllowanceBound>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT allowance_type, min_amount, max_amount
             FROM tax_allowance ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        rows.iter().map(row_to_allowance_bound).collect()
    }

    async fn set_max_allowance(
        &self,
        allowance_type: AllowanceType,
        max_amount: Decimal,
    ) -> Result<Decimal, RepositoryError> {
        // Dropping the transaction without commit rolls it back.
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        let row = sqlx::query("SELECT min_amount FROM tax_allowance WHERE allowance_type = ?")
            .bind(allowance_type.as_str())
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?
            .ok_or(RepositoryError::NotFound)?;

        let min_amount = get_decimal(&row, "min_amount")?;
        if max_amount < min_amount {
            return Err(RepositoryError::BelowMinimum {
                allowance_type,
                requested: max_amount,
                min: min_amount,
            });
        }

        sqlx::query("UPDATE tax_allowance SET max_amount = ? WHERE allowance_type = ?")
            .bind(decimal_to_f64(max_amount)?)
            .bind(allowance_type.as_str())
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        debug!(%allowance_type, %max_amount, "stored allowance max amount");
        Ok(max_amount)
    }

    async fn get_tax_brackets(&self) -> Result<Vec<TaxBracket>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT min_income, max_income, percent
             FROM tax_level
             ORDER BY min_income",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        let mut brackets = Vec::new();
        for row in rows {
            brackets.push(TaxBracket {
                min_income: get_decimal(&row, "min_income")?,
                max_income: get_decimal(&row, "max_income")?,
                percent: get_decimal(&row, "percent")?,
            });
        }
        Ok(brackets)
    }
}

//! Relational store sink backed by sqlx.
//!
//! The rest of the pipeline is synchronous, so the sink owns a small
//! current-thread Tokio runtime and blocks on each operation.

use std::time::Instant;

use polars::prelude::DataFrame;
use sqlx::AnyPool;
use sqlx::any::{AnyPoolOptions, install_default_drivers};
use tokio::runtime::{Builder, Runtime};
use tracing::{debug, info};

use retail_model::{ColumnKind, DatasetName};

use crate::config::{StoreConfig, StoreDriver};
use crate::dialect;
use crate::error::{PersistenceError, Result};
use crate::sink::TableSink;
use crate::values::{StoredValues, stored_columns};

/// A live connection pool to MySQL, PostgreSQL or SQLite.
#[derive(Debug)]
pub struct SqlSink {
    runtime: Runtime,
    pool: AnyPool,
    driver: StoreDriver,
    target: String,
}

fn database_error(operation: &'static str) -> impl FnOnce(sqlx::Error) -> PersistenceError {
    move |source| PersistenceError::Database { operation, source }
}

impl SqlSink {
    /// Connect and verify the store answers a trivial query.
    ///
    /// Any failure here is reported as `ConnectionUnavailable`, before a
    /// single table has been touched.
    pub fn connect(config: &StoreConfig) -> Result<Self> {
        let url = config.connection_url()?;
        let target = config.redacted_url();
        let driver = config.effective_driver();
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(PersistenceError::Runtime)?;

        install_default_drivers();
        let pool = runtime
            .block_on(async {
                let pool = AnyPoolOptions::new()
                    .max_connections(1)
                    .acquire_timeout(config.connect_timeout())
                    .connect(&url)
                    .await?;
                sqlx::query("SELECT 1").execute(&pool).await?;
                Ok::<_, sqlx::Error>(pool)
            })
            .map_err(|source| PersistenceError::ConnectionUnavailable {
                target: target.clone(),
                source,
            })?;

        info!(store = %target, %driver, "connected to store");
        Ok(Self {
            runtime,
            pool,
            driver,
            target,
        })
    }

    pub fn driver(&self) -> StoreDriver {
        self.driver
    }

    /// Number of rows currently stored in `table`.
    pub fn row_count(&self, table: &str) -> Result<i64> {
        let sql = format!(
            "SELECT COUNT(*) FROM {}",
            dialect::quote_identifier(self.driver, table)
        );
        self.runtime
            .block_on(sqlx::query_scalar::<_, i64>(&sql).fetch_one(&self.pool))
            .map_err(database_error("count rows"))
    }
}

impl TableSink for SqlSink {
    fn replace_table(&mut self, name: &DatasetName, table: &DataFrame) -> Result<usize> {
        if table.width() == 0 {
            return Err(PersistenceError::NoColumns);
        }
        let columns = stored_columns(table)?;
        let rows = table.height();
        let driver = self.driver;
        let table_name = name.as_str();
        let schema: Vec<(&str, ColumnKind)> = columns
            .iter()
            .map(|column| (column.name.as_str(), column.values.kind()))
            .collect();
        let names: Vec<&str> = schema.iter().map(|(name, _)| *name).collect();
        let batch = dialect::rows_per_batch(columns.len());
        let start = Instant::now();

        self.runtime.block_on(async {
            let mut tx = self
                .pool
                .begin()
                .await
                .map_err(database_error("begin transaction"))?;
            sqlx::query(&dialect::drop_table(driver, table_name))
                .execute(&mut *tx)
                .await
                .map_err(database_error("drop table"))?;
            sqlx::query(&dialect::create_table(driver, table_name, &schema))
                .execute(&mut *tx)
                .await
                .map_err(database_error("create table"))?;

            let mut offset = 0;
            while offset < rows {
                let end = (offset + batch).min(rows);
                let sql = dialect::insert_rows(driver, table_name, &names, end - offset);
                let mut query = sqlx::query(&sql);
                for row in offset..end {
                    for column in &columns {
                        query = match &column.values {
                            StoredValues::Numeric(values) => query.bind(values[row]),
                            StoredValues::Text(values) => query.bind(values[row].clone()),
                        };
                    }
                }
                query
                    .execute(&mut *tx)
                    .await
                    .map_err(database_error("insert rows"))?;
                offset = end;
            }

            tx.commit().await.map_err(database_error("commit"))
        })?;

        debug!(
            table = table_name,
            rows,
            batch,
            duration_ms = start.elapsed().as_millis(),
            "replaced table"
        );
        Ok(rows)
    }

    fn describe(&self) -> String {
        self.target.clone()
    }
}

impl Drop for SqlSink {
    fn drop(&mut self) {
        self.runtime.block_on(self.pool.close());
    }
}

//! Generic key-addressable table sink over SQLite.
//!
//! The remote bundles decide which tables exist and what columns they carry,
//! so nothing here is schema-aware: a table is created the first time a row
//! is written to it, with column affinities derived from the row's cells and
//! a PRIMARY KEY over the declared natural-key columns. Identifiers coming
//! from bundle data are validated before they are interpolated into SQL.

use std::collections::BTreeSet;

use sqlx::query::Query;
use sqlx::sqlite::SqliteArguments;
use sqlx::{Sqlite, SqlitePool};

use riot_client::{CellValue, Row};

use crate::persistence::{AppendOutcome, StoreError};

/// The table sink used by the sync core and the static-data refresh.
#[derive(Clone)]
pub struct SqlStore {
    pool: SqlitePool,
}

impl SqlStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a reference to the underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Insert-or-update by natural key. One durable write; repeating the
    /// same merge leaves exactly one row behind.
    pub async fn upsert(
        &self,
        table: &str,
        key_cols: &[&str],
        row: &Row,
    ) -> Result<(), StoreError> {
        self.ensure_table(table, key_cols, row).await?;
        let sql = insert_sql("INSERT OR REPLACE", table, row)?;
        bind_row(sqlx::query(&sql), row).execute(&self.pool).await?;
        Ok(())
    }

    /// Append-only insert. A UNIQUE violation on the natural key reports
    /// [`AppendOutcome::DuplicateKey`] instead of failing; every other
    /// database error propagates.
    pub async fn append_row(
        &self,
        table: &str,
        key_cols: &[&str],
        row: &Row,
    ) -> Result<AppendOutcome, StoreError> {
        self.ensure_table(table, key_cols, row).await?;
        let sql = insert_sql("INSERT", table, row)?;
        match bind_row(sqlx::query(&sql), row).execute(&self.pool).await {
            Ok(_) => Ok(AppendOutcome::Inserted),
            Err(e) if is_unique_violation(&e) => Ok(AppendOutcome::DuplicateKey),
            Err(e) => Err(e.into()),
        }
    }

    /// Which of `keys` already exist in `table`? One existence query
    /// restricted to the candidates — never a full-table scan. A table that
    /// does not exist yet reads as the empty set.
    pub async fn exists_any(
        &self,
        table: &str,
        key_col: &str,
        keys: &[i64],
    ) -> Result<BTreeSet<i64>, StoreError> {
        if keys.is_empty() {
            return Ok(BTreeSet::new());
        }

        let placeholders = vec!["?"; keys.len()].join(", ");
        let sql = format!(
            "SELECT {key} FROM {table} WHERE {key} IN ({placeholders})",
            key = quote_ident(key_col)?,
            table = quote_ident(table)?,
        );

        let mut query = sqlx::query_as::<_, (i64,)>(&sql);
        for key in keys {
            query = query.bind(key);
        }

        match query.fetch_all(&self.pool).await {
            Ok(rows) => Ok(rows.into_iter().map(|(key,)| key).collect()),
            Err(e) if is_missing_table(&e) => Ok(BTreeSet::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Replace the whole table with `rows` (static reference data only).
    pub async fn replace_table(
        &self,
        table: &str,
        key_cols: &[&str],
        rows: &[Row],
    ) -> Result<(), StoreError> {
        let quoted = quote_ident(table)?;
        sqlx::query(&format!("DROP TABLE IF EXISTS {}", quoted))
            .execute(&self.pool)
            .await?;

        for row in rows {
            self.ensure_table(table, key_cols, row).await?;
            let sql = insert_sql("INSERT OR REPLACE", table, row)?;
            bind_row(sqlx::query(&sql), row).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Create `table` if it is not there yet, shaped after `row`.
    async fn ensure_table(
        &self,
        table: &str,
        key_cols: &[&str],
        row: &Row,
    ) -> Result<(), StoreError> {
        for key in key_cols {
            match row.get(*key) {
                Some(cell) if !cell.is_null() => {}
                _ => {
                    return Err(StoreError::MissingKeyColumn {
                        table: table.to_string(),
                        column: (*key).to_string(),
                    })
                }
            }
        }

        let mut columns = Vec::with_capacity(row.len());
        for (name, cell) in row {
            columns.push(format!("{} {}", quote_ident(name)?, column_affinity(cell)));
        }

        let sql = if key_cols.is_empty() {
            format!(
                "CREATE TABLE IF NOT EXISTS {} ({})",
                quote_ident(table)?,
                columns.join(", ")
            )
        } else {
            let keys = key_cols
                .iter()
                .map(|k| quote_ident(k))
                .collect::<Result<Vec<_>, _>>()?
                .join(", ");
            format!(
                "CREATE TABLE IF NOT EXISTS {} ({}, PRIMARY KEY ({}))",
                quote_ident(table)?,
                columns.join(", "),
                keys
            )
        };

        sqlx::query(&sql).execute(&self.pool).await?;
        Ok(())
    }
}

/// Quote an identifier for SQL interpolation. Only plain
/// `[A-Za-z0-9_]` names are accepted; anything else is rejected rather
/// than escaped, since table and column names come from remote data.
fn quote_ident(name: &str) -> Result<String, StoreError> {
    if name.is_empty()
        || !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(StoreError::InvalidIdentifier(name.to_string()));
    }
    Ok(format!("\"{}\"", name))
}

fn column_affinity(cell: &CellValue) -> &'static str {
    match cell {
        CellValue::Integer(_) | CellValue::Bool(_) => "INTEGER",
        CellValue::Float(_) => "REAL",
        CellValue::Null | CellValue::Text(_) | CellValue::Nested(_) => "TEXT",
    }
}

fn insert_sql(verb: &str, table: &str, row: &Row) -> Result<String, StoreError> {
    let columns = row
        .keys()
        .map(|c| quote_ident(c))
        .collect::<Result<Vec<_>, _>>()?
        .join(", ");
    let placeholders = vec!["?"; row.len()].join(", ");
    Ok(format!(
        "{} INTO {} ({}) VALUES ({})",
        verb,
        quote_ident(table)?,
        columns,
        placeholders
    ))
}

/// Bind every cell of `row` in column order (BTreeMap order matches the
/// column list built by [`insert_sql`]).
fn bind_row<'q>(
    mut query: Query<'q, Sqlite, SqliteArguments<'q>>,
    row: &'q Row,
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    for cell in row.values() {
        query = match cell {
            CellValue::Null => query.bind(None::<String>),
            CellValue::Integer(i) => query.bind(*i),
            CellValue::Float(f) => query.bind(*f),
            CellValue::Text(s) => query.bind(s.as_str()),
            CellValue::Bool(b) => query.bind(*b),
            CellValue::Nested(v) => query.bind(v.to_string()),
        };
    }
    query
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_unique_violation())
}

fn is_missing_table(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.message().contains("no such table"))
}

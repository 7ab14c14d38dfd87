//! Idempotent upsert of forecast tables into PostgreSQL.

use crate::db::config::DEFAULT_TABLE;
use crate::db::error::DbError;
use crate::types::table::{ColumnValues, ForecastTable};
use log::{info, warn};
use sqlx::{PgPool, Postgres, QueryBuilder};

/// Columns that identify a forecast day. The target table needs a unique
/// constraint on them.
pub const UPSERT_KEY: [&str; 2] = ["sunrise_iso", "sunset_iso"];

/// Upserts every row of `table` into `daily_forecast` in one transaction.
///
/// See [`upsert_into`].
pub async fn save_to_db(table: &ForecastTable, pool: &PgPool) -> Result<u64, DbError> {
    upsert_into(table, pool, DEFAULT_TABLE).await
}

/// Upserts every row of `table` into `table_name` and returns the number of
/// affected rows.
///
/// Rows conflicting on `(sunrise_iso, sunset_iso)` are updated in place. Hourly
/// columns are bound as `float8[]`, daily integers as `int8` and ISO timestamps as
/// text. Either every row is written or, on the first failure, the transaction is
/// rolled back and nothing is.
///
/// # Errors
///
/// * [`DbError::InvalidTableName`] for an empty (part of a) table name.
/// * [`DbError::MissingUpsertKey`] if a day has no `sunrise_iso`/`sunset_iso` text.
/// * [`DbError::Begin`], [`DbError::Upsert`], [`DbError::Rollback`], [`DbError::Commit`]
///   for database failures.
pub async fn upsert_into(
    table: &ForecastTable,
    pool: &PgPool,
    table_name: &str,
) -> Result<u64, DbError> {
    let target = quote_table_name(table_name)?;
    let days_count = table.days_count();
    let keys = (0..days_count)
        .map(|day| {
            table
                .upsert_key(day)
                .ok_or(DbError::MissingUpsertKey { day })
        })
        .collect::<Result<Vec<_>, _>>()?;
    if keys.is_empty() {
        info!("No forecast rows to upsert into {}", target);
        return Ok(0);
    }

    let mut tx = pool.begin().await.map_err(DbError::Begin)?;
    let mut affected = 0;
    for (day, (sunrise_iso, sunset_iso)) in keys.into_iter().enumerate() {
        let mut query = upsert_query(table, &target, day);
        let result = query.build().execute(&mut *tx).await;
        match result {
            Ok(done) => affected += done.rows_affected(),
            Err(source) => {
                warn!(
                    "Upsert of day {} into {} failed, rolling back: {}",
                    day, target, source
                );
                tx.rollback().await.map_err(DbError::Rollback)?;
                return Err(DbError::Upsert {
                    table: table_name.to_string(),
                    day,
                    sunrise_iso: sunrise_iso.to_string(),
                    sunset_iso: sunset_iso.to_string(),
                    source,
                });
            }
        }
    }
    tx.commit().await.map_err(DbError::Commit)?;

    info!("Upserted {} of {} rows into {}", affected, days_count, target);
    Ok(affected)
}

fn upsert_query(table: &ForecastTable, target: &str, day: usize) -> QueryBuilder<'static, Postgres> {
    let columns: Vec<String> = table.column_names().map(quote_ident).collect();
    let mut builder = QueryBuilder::new(format!(
        "INSERT INTO {} ({}) VALUES (",
        target,
        columns.join(", ")
    ));

    let mut values = builder.separated(", ");
    for (_, column) in table.columns() {
        match column {
            ColumnValues::Float(v) => values.push_bind(v.get(day).copied()),
            ColumnValues::Integer(v) => values.push_bind(v.get(day).copied()),
            ColumnValues::Text(v) => values.push_bind(v.get(day).cloned()),
            ColumnValues::HourlyFloat(v) => values.push_bind(v.get(day).cloned()),
        };
    }

    let key: Vec<String> = UPSERT_KEY.iter().map(|name| quote_ident(name)).collect();
    builder.push(format!(") ON CONFLICT ({}) DO ", key.join(", ")));

    let updates: Vec<String> = table
        .column_names()
        .filter(|name| !UPSERT_KEY.contains(name))
        .map(|name| {
            let quoted = quote_ident(name);
            format!("{quoted} = EXCLUDED.{quoted}")
        })
        .collect();
    if updates.is_empty() {
        builder.push("NOTHING");
    } else {
        builder.push("UPDATE SET ");
        builder.push(updates.join(", "));
    }
    builder
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn quote_table_name(table_name: &str) -> Result<String, DbError> {
    let parts: Vec<&str> = table_name.split('.').map(str::trim).collect();
    if parts.iter().any(|part| part.is_empty()) {
        return Err(DbError::InvalidTableName(table_name.to_string()));
    }
    Ok(parts
        .into_iter()
        .map(quote_ident)
        .collect::<Vec<_>>()
        .join("."))
}

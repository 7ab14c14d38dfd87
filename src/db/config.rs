//! PostgreSQL connection settings.

use crate::db::error::DbError;
use bon::bon;
use log::info;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;
use std::fmt;
use std::time::Duration;

pub const DEFAULT_TABLE: &str = "daily_forecast";
pub const DEFAULT_PORT: u16 = 5432;

const HOST_VAR: &str = "DB_HOST";
const PORT_VAR: &str = "DB_PORT";
const TABLE_VAR: &str = "DB_TABLE";
const DATABASE_VAR: &str = "POSTGRES_DB";
const USER_VAR: &str = "POSTGRES_USER";
const PASSWORD_VAR: &str = "POSTGRES_PASSWORD";

/// Where forecast rows are written.
#[derive(Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
    /// Target table, optionally schema-qualified (`public.daily_forecast`).
    pub table: String,
}

#[bon]
impl DbConfig {
    /// Creates a config.
    ///
    /// # Arguments
    ///
    /// * `.host(String)`, `.database(String)`, `.user(String)`, `.password(String)`: Required.
    /// * `.port(u16)`: Optional. Defaults to `5432`.
    /// * `.table(String)`: Optional. Defaults to `daily_forecast`.
    #[builder]
    pub fn new(
        host: String,
        database: String,
        user: String,
        password: String,
        port: Option<u16>,
        table: Option<String>,
    ) -> Self {
        Self {
            host,
            port: port.unwrap_or(DEFAULT_PORT),
            database,
            user,
            password,
            table: table.unwrap_or_else(|| DEFAULT_TABLE.to_string()),
        }
    }

    /// Reads `DB_HOST`, `POSTGRES_DB`, `POSTGRES_USER` and `POSTGRES_PASSWORD`,
    /// plus the optional `DB_PORT` and `DB_TABLE`.
    pub fn from_env() -> Result<Self, DbError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`DbConfig::from_env`] with a custom variable source. Blank values
    /// count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, DbError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let require = |key: &'static str| get(key).ok_or(DbError::MissingEnv(key));

        let port = match get(PORT_VAR) {
            Some(value) => Some(value.trim().parse::<u16>().map_err(|_| DbError::InvalidEnv {
                key: PORT_VAR,
                value,
            })?),
            None => None,
        };

        Ok(Self::builder()
            .host(require(HOST_VAR)?)
            .database(require(DATABASE_VAR)?)
            .user(require(USER_VAR)?)
            .password(require(PASSWORD_VAR)?)
            .maybe_port(port)
            .maybe_table(get(TABLE_VAR))
            .build())
    }

    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.database)
            .username(&self.user)
            .password(&self.password)
    }

    /// Opens a small connection pool.
    pub async fn connect(&self) -> Result<PgPool, DbError> {
        let pool = PgPoolOptions::new()
            .max_connections(4)
            .acquire_timeout(Duration::from_secs(8))
            .connect_with(self.connect_options())
            .await
            .map_err(DbError::Connect)?;
        info!(
            "Connected to PostgreSQL at {}:{}/{}",
            self.host, self.port, self.database
        );
        Ok(pool)
    }
}

impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"***")
            .field("table", &self.table)
            .finish()
    }
}

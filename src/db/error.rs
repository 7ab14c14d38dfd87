use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("Environment variable '{0}' is not set")]
    MissingEnv(&'static str),

    #[error("Environment variable '{key}' has invalid value '{value}'")]
    InvalidEnv { key: &'static str, value: String },

    #[error("Invalid table name '{0}'")]
    InvalidTableName(String),

    #[error("Day {day} has no sunrise_iso/sunset_iso pair to upsert on")]
    MissingUpsertKey { day: usize },

    #[error("Failed to connect to PostgreSQL")]
    Connect(#[source] sqlx::Error),

    #[error("Failed to begin transaction")]
    Begin(#[source] sqlx::Error),

    #[error("Failed to upsert day {day} ({sunrise_iso} .. {sunset_iso}) into '{table}'")]
    Upsert {
        table: String,
        day: usize,
        sunrise_iso: String,
        sunset_iso: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("Failed to roll back transaction")]
    Rollback(#[source] sqlx::Error),

    #[error("Failed to commit transaction")]
    Commit(#[source] sqlx::Error),
}

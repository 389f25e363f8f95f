use std::str::FromStr;

use sqlx::{
    Pool, Sqlite,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};

pub mod events;

const SCHEMA: [&str; 3] = [
    "CREATE TABLE IF NOT EXISTS events (
        id TEXT PRIMARY KEY NOT NULL,
        title TEXT NOT NULL CHECK (length(title) BETWEEN 1 AND 100),
        slug TEXT NOT NULL CHECK (slug <> ''),
        description TEXT NOT NULL CHECK (length(description) BETWEEN 1 AND 1000),
        overview TEXT NOT NULL CHECK (length(overview) BETWEEN 1 AND 500),
        image TEXT NOT NULL,
        venue TEXT NOT NULL,
        location TEXT NOT NULL,
        date TEXT NOT NULL,
        time TEXT NOT NULL,
        mode TEXT NOT NULL CHECK (mode IN ('online', 'offline', 'hybrid')),
        audience TEXT NOT NULL,
        agenda TEXT NOT NULL CHECK (agenda <> '[]'),
        organizer TEXT NOT NULL,
        tags TEXT NOT NULL CHECK (tags <> '[]'),
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )",
    "CREATE UNIQUE INDEX IF NOT EXISTS events_slug_idx ON events (slug)",
    "CREATE INDEX IF NOT EXISTS events_date_mode_idx ON events (date, mode)",
];

/// Opens the pool for the database at `DEVHUB_EVENTS_DB`.
pub async fn create_events_db_pool() -> Result<Pool<Sqlite>, sqlx::Error> {
    let db_path = std::env::var("DEVHUB_EVENTS_DB").expect("DEVHUB_EVENTS_DB env var not set");
    connect(&db_path).await
}

pub async fn connect(db_path: &str) -> Result<Pool<Sqlite>, sqlx::Error> {
    let connect_options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true);

    SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(connect_options)
        .await
}

/// A private in-memory database. Kept on a single connection, since every
/// new connection would see an empty database.
pub async fn connect_in_memory() -> Result<Pool<Sqlite>, sqlx::Error> {
    let connect_options = SqliteConnectOptions::from_str("sqlite::memory:")?;

    SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(connect_options)
        .await
}

pub async fn create_schema(pool: &Pool<Sqlite>) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}

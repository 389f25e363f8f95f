use std::{sync::Arc, time::Duration};

use devhub_persistence_sqlite::{
    create_events_db_pool, create_schema, events::SqliteEventRepository,
};
use devhub_server_app::build_application;

use crate::{
    commands::Command,
    logs::{LogSettings, init_logger},
};

mod commands;
mod logs;

fn slug_cache_ttl() -> Option<Duration> {
    let raw = std::env::var("DEVHUB_SLUG_CACHE_TTL_SECS").ok()?;
    match raw.parse::<u64>() {
        Ok(secs) => Some(Duration::from_secs(secs)),
        Err(_) => {
            log::warn!(
                "Ignoring DEVHUB_SLUG_CACHE_TTL_SECS={}, expected a number of seconds",
                raw
            );
            None
        }
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let command = match Command::parse(&args) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };

    let log_settings = LogSettings::from_env().expect("Failed to read log settings");
    init_logger(&log_settings).expect("Failed to initialize logger");

    let pool = create_events_db_pool()
        .await
        .expect("Failed to open events DB");
    create_schema(&pool)
        .await
        .expect("Failed to create events schema");

    let event_repo = Arc::new(match slug_cache_ttl() {
        Some(ttl) => SqliteEventRepository::with_cache_ttl(pool, ttl),
        None => SqliteEventRepository::new(pool),
    });
    let app = build_application(event_repo);

    if let Err(e) = commands::run(&app, command).await {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

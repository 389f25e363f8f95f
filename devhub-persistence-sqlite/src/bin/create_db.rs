use devhub_persistence_sqlite::{connect, create_schema};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let reset = std::env::args().skip(1).any(|arg| arg == "--reset");

    let events_db_path =
        std::env::var("DEVHUB_EVENTS_DB").expect("DEVHUB_EVENTS_DB env var not set");
    let parent = std::path::Path::new(&events_db_path)
        .parent()
        .expect("Failed to get parent directory of events DB path");
    if !parent.as_os_str().is_empty() && !parent.exists() {
        std::fs::create_dir_all(parent).expect("Failed to create parent directory for events DB");
        println!(
            "Created parent directory for events DB at {}",
            parent.display()
        );
    }

    if reset && std::path::Path::new(&events_db_path).exists() {
        std::fs::remove_file(&events_db_path).expect("Failed to remove existing events DB");
        println!("Removed existing events DB at {}", events_db_path);
    }

    let pool = connect(&events_db_path)
        .await
        .expect("Failed to create DB pool");
    create_schema(&pool)
        .await
        .expect("Failed to create events table");

    println!("Events DB ready at {}", events_db_path);
}

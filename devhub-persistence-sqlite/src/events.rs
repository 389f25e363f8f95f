use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::Duration,
};

use devhub_server_app::domain::{
    EventId, RepoCreateError, RepoError, RepoRetrieveError, RepoUpdateError,
    event::{Event, EventDetails, EventMode, EventRepository},
};
use sqlx::{Pool, Row, Sqlite, sqlite::SqliteRow};

const DEFAULT_SLUG_CACHE_TTL: Duration = Duration::from_secs(60 * 60 * 12);

const EVENT_COLUMNS: [&str; 17] = [
    "id",
    "title",
    "slug",
    "description",
    "overview",
    "image",
    "venue",
    "location",
    "date",
    "time",
    "mode",
    "audience",
    "agenda",
    "organizer",
    "tags",
    "created_at",
    "updated_at",
];

pub struct SqliteEventRepository {
    pool: Pool<Sqlite>,
    slug_cache: moka::sync::Cache<String, Event>,
    // Bumped by every update; lookups that raced an update are not cached.
    cache_generation: AtomicU64,
}

impl SqliteEventRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self::with_cache_ttl(pool, DEFAULT_SLUG_CACHE_TTL)
    }

    pub fn with_cache_ttl(pool: Pool<Sqlite>, ttl: Duration) -> Self {
        let slug_cache = moka::sync::Cache::builder()
            .max_capacity(10_000)
            .time_to_live(ttl)
            .build();
        Self {
            pool,
            slug_cache,
            cache_generation: AtomicU64::new(0),
        }
    }

    fn cache_generation(&self) -> u64 {
        self.cache_generation.load(Ordering::SeqCst)
    }

    /// Caches `event` under `slug` unless an update happened since
    /// `generation` was read.
    pub(crate) fn cache_if_current(&self, generation: u64, slug: &str, event: &Event) {
        if self.cache_generation() != generation {
            return;
        }
        self.slug_cache.insert(slug.to_string(), event.clone());
        // An update may have slipped in between the check and the insert.
        if self.cache_generation() != generation {
            self.slug_cache.invalidate(slug);
        }
    }

    fn event_from_row(row: &SqliteRow) -> sqlx::Result<Event> {
        let id: String = row.try_get("id")?;
        let id = EventId::parse(&id)
            .ok_or_else(|| sqlx::Error::Decode(format!("invalid event id '{}'", id).into()))?;
        let mode: String = row.try_get("mode")?;
        let mode = mode
            .parse::<EventMode>()
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;

        Ok(Event {
            id,
            details: EventDetails {
                title: row.try_get("title")?,
                slug: row.try_get("slug")?,
                description: row.try_get("description")?,
                overview: row.try_get("overview")?,
                image: row.try_get("image")?,
                venue: row.try_get("venue")?,
                location: row.try_get("location")?,
                date: row.try_get("date")?,
                time: row.try_get("time")?,
                mode,
                audience: row.try_get("audience")?,
                agenda: decode_list(row, "agenda")?,
                organizer: row.try_get("organizer")?,
                tags: decode_list(row, "tags")?,
            },
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    async fn find_one(&self, column: &str, value: String) -> Result<Event, RepoRetrieveError> {
        let row = sqlx::query(&format!("SELECT * FROM events WHERE {} = ?", column))
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoRetrieveError::StorageError(e.to_string()))?;
        match row {
            Some(row) => Self::event_from_row(&row)
                .map_err(|e| RepoRetrieveError::StorageError(e.to_string())),
            None => Err(RepoRetrieveError::NotFound),
        }
    }
}

fn decode_list(row: &SqliteRow, column: &str) -> sqlx::Result<Vec<String>> {
    let raw: String = row.try_get(column)?;
    serde_json::from_str(&raw).map_err(|e| sqlx::Error::Decode(Box::new(e)))
}

fn encode_list(items: &[String]) -> String {
    serde_json::Value::from(items.to_vec()).to_string()
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    match e {
        sqlx::Error::Database(db_error) => db_error.is_unique_violation(),
        _ => false,
    }
}

#[async_trait::async_trait]
impl EventRepository for SqliteEventRepository {
    async fn create_event(&self, event: &Event) -> Result<(), RepoCreateError> {
        let d = &event.details;
        sqlx::query(&format!(
            "INSERT INTO events ({}) VALUES ({})",
            EVENT_COLUMNS.join(", "),
            EVENT_COLUMNS.iter().map(|_| "?").collect::<Vec<_>>().join(", ")
        ))
        .bind(event.id.to_string())
        .bind(&d.title)
        .bind(&d.slug)
        .bind(&d.description)
        .bind(&d.overview)
        .bind(&d.image)
        .bind(&d.venue)
        .bind(&d.location)
        .bind(&d.date)
        .bind(&d.time)
        .bind(d.mode.as_str())
        .bind(&d.audience)
        .bind(encode_list(&d.agenda))
        .bind(&d.organizer)
        .bind(encode_list(&d.tags))
        .bind(event.created_at)
        .bind(event.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                RepoCreateError::Conflict
            } else {
                RepoCreateError::StorageError(e.to_string())
            }
        })?;
        Ok(())
    }

    async fn update_event(&self, event: &Event) -> Result<(), RepoUpdateError> {
        let d = &event.details;
        // id and created_at are immutable.
        let assignments = EVENT_COLUMNS[1..]
            .iter()
            .filter(|c| **c != "created_at")
            .map(|c| format!("{} = ?", c))
            .collect::<Vec<_>>();

        let result = sqlx::query(&format!(
            "UPDATE events SET {} WHERE id = ?",
            assignments.join(", ")
        ))
        .bind(&d.title)
        .bind(&d.slug)
        .bind(&d.description)
        .bind(&d.overview)
        .bind(&d.image)
        .bind(&d.venue)
        .bind(&d.location)
        .bind(&d.date)
        .bind(&d.time)
        .bind(d.mode.as_str())
        .bind(&d.audience)
        .bind(encode_list(&d.agenda))
        .bind(&d.organizer)
        .bind(encode_list(&d.tags))
        .bind(event.updated_at)
        .bind(event.id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                RepoUpdateError::Conflict
            } else {
                RepoUpdateError::StorageError(e.to_string())
            }
        })?;

        // Cached entries are keyed by slug, which this update may have changed.
        self.cache_generation.fetch_add(1, Ordering::SeqCst);
        self.slug_cache.invalidate_all();

        if result.rows_affected() == 0 {
            return Err(RepoUpdateError::NotFound);
        }
        Ok(())
    }

    async fn get_event(&self, id: EventId) -> Result<Event, RepoRetrieveError> {
        self.find_one("id", id.to_string()).await
    }

    async fn get_event_by_slug(&self, slug: &str) -> Result<Event, RepoRetrieveError> {
        if let Some(cached) = self.slug_cache.get(slug) {
            log::debug!("Slug cache hit for {}", slug);
            return Ok(cached);
        }
        let generation = self.cache_generation();
        let event = self.find_one("slug", slug.to_string()).await?;
        self.cache_if_current(generation, slug, &event);
        Ok(event)
    }

    async fn list_events(&self) -> Result<Vec<Event>, RepoError> {
        let rows = sqlx::query("SELECT * FROM events ORDER BY date, time, title")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::StorageError(e.to_string()))?;
        rows.iter()
            .map(|row| {
                Self::event_from_row(row).map_err(|e| RepoError::StorageError(e.to_string()))
            })
            .collect()
    }
}

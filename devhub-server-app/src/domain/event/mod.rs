use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::Validate;

use crate::domain::{EventId, RepoCreateError, RepoError, RepoRetrieveError, RepoUpdateError};

pub mod constraints;
pub mod date;
pub mod pipeline;
pub mod slug;
pub mod time_of_day;

/// Order in which fields are reported back to the caller.
pub const FIELD_ORDER: [&str; 14] = [
    "title",
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
    "slug",
];

#[async_trait::async_trait]
pub trait EventRepository {
    /// Fails with `Conflict` when another event already owns the slug.
    async fn create_event(&self, event: &Event) -> Result<(), RepoCreateError>;
    async fn update_event(&self, event: &Event) -> Result<(), RepoUpdateError>;
    async fn get_event(&self, id: EventId) -> Result<Event, RepoRetrieveError>;
    async fn get_event_by_slug(&self, slug: &str) -> Result<Event, RepoRetrieveError>;
    /// All events ordered by date, then time, then title.
    async fn list_events(&self) -> Result<Vec<Event>, RepoError>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventMode {
    Online,
    Offline,
    Hybrid,
}

impl EventMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventMode::Online => "online",
            EventMode::Offline => "offline",
            EventMode::Hybrid => "hybrid",
        }
    }
}

impl std::fmt::Display for EventMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Mode must be online, offline or hybrid, got '{0}'")]
pub struct UnknownEventMode(pub String);

impl std::str::FromStr for EventMode {
    type Err = UnknownEventMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "online" => Ok(EventMode::Online),
            "offline" => Ok(EventMode::Offline),
            "hybrid" => Ok(EventMode::Hybrid),
            other => Err(UnknownEventMode(other.to_string())),
        }
    }
}

/// The canonical, normalized content of an event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDetails {
    pub title: String,
    pub slug: String,
    pub description: String,
    pub overview: String,
    pub image: String,
    pub venue: String,
    pub location: String,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`, 24-hour
    pub time: String,
    pub mode: EventMode,
    pub audience: String,
    pub agenda: Vec<String>,
    pub organizer: String,
    pub tags: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: EventId,
    #[serde(flatten)]
    pub details: EventDetails,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A candidate event as submitted by an editor, before any checks.
///
/// Missing fields deserialize as empty and are reported by the constraint
/// checker instead of failing deserialization.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct EventDraft {
    #[validate(
        custom(function = "constraints::required", message = "Title is required"),
        length(max = 100, message = "Title cannot exceed 100 characters")
    )]
    pub title: String,
    #[validate(
        custom(function = "constraints::required", message = "Description is required"),
        length(max = 1000, message = "Description cannot exceed 1000 characters")
    )]
    pub description: String,
    #[validate(
        custom(function = "constraints::required", message = "Overview is required"),
        length(max = 500, message = "Overview cannot exceed 500 characters")
    )]
    pub overview: String,
    #[validate(custom(function = "constraints::required", message = "Image URL is required"))]
    pub image: String,
    #[validate(custom(function = "constraints::required", message = "Venue is required"))]
    pub venue: String,
    #[validate(custom(function = "constraints::required", message = "Location is required"))]
    pub location: String,
    #[validate(custom(function = "constraints::required", message = "Date is required"))]
    pub date: String,
    #[validate(custom(function = "constraints::required", message = "Time is required"))]
    pub time: String,
    pub mode: String,
    #[validate(custom(function = "constraints::required", message = "Audience is required"))]
    pub audience: String,
    #[validate(length(min = 1, message = "At least one agenda item is required"))]
    pub agenda: Vec<String>,
    #[validate(custom(function = "constraints::required", message = "Organizer is required"))]
    pub organizer: String,
    #[validate(length(min = 1, message = "At least one tag is required"))]
    pub tags: Vec<String>,
}

impl EventDraft {
    /// Strips surrounding whitespace from every text field.
    pub fn trimmed(self) -> Self {
        fn trim(s: String) -> String {
            let trimmed = s.trim();
            if trimmed.len() == s.len() {
                s
            } else {
                trimmed.to_string()
            }
        }

        Self {
            title: trim(self.title),
            description: trim(self.description),
            overview: trim(self.overview),
            image: trim(self.image),
            venue: trim(self.venue),
            location: trim(self.location),
            date: trim(self.date),
            time: trim(self.time),
            mode: trim(self.mode),
            audience: trim(self.audience),
            agenda: self.agenda,
            organizer: trim(self.organizer),
            tags: self.tags,
        }
    }
}

impl From<&EventDetails> for EventDraft {
    fn from(details: &EventDetails) -> Self {
        Self {
            title: details.title.clone(),
            description: details.description.clone(),
            overview: details.overview.clone(),
            image: details.image.clone(),
            venue: details.venue.clone(),
            location: details.location.clone(),
            date: details.date.clone(),
            time: details.time.clone(),
            mode: details.mode.as_str().to_string(),
            audience: details.audience.clone(),
            agenda: details.agenda.clone(),
            organizer: details.organizer.clone(),
            tags: details.tags.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Every field-level error found for one candidate event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    errors: Vec<ValidationError>,
}

impl ValidationFailure {
    pub fn new(mut errors: Vec<ValidationError>) -> Self {
        errors.sort_by_key(|e| field_rank(&e.field));
        Self { errors }
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    pub fn messages_for<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.errors
            .iter()
            .filter(move |e| e.field == field)
            .map(|e| e.message.as_str())
    }
}

impl std::fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts = self
            .errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>();
        write!(f, "invalid event: {}", parts.join("; "))
    }
}

impl std::error::Error for ValidationFailure {}

fn field_rank(field: &str) -> usize {
    FIELD_ORDER
        .iter()
        .position(|f| *f == field)
        .unwrap_or(FIELD_ORDER.len())
}

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{
    EventId,
    event::{Event, EventDraft, EventMode},
};

pub mod create;
pub mod get;
pub mod list;
pub mod update;

/// A canonical event as handed to the presentation layer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventView {
    pub id: EventId,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub overview: String,
    pub image: String,
    pub venue: String,
    pub location: String,
    pub date: String,
    pub time: String,
    pub mode: EventMode,
    pub audience: String,
    pub agenda: Vec<String>,
    pub organizer: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Event> for EventView {
    fn from(event: Event) -> Self {
        let details = event.details;
        Self {
            id: event.id,
            title: details.title,
            slug: details.slug,
            description: details.description,
            overview: details.overview,
            image: details.image,
            venue: details.venue,
            location: details.location,
            date: details.date,
            time: details.time,
            mode: details.mode,
            audience: details.audience,
            agenda: details.agenda,
            organizer: details.organizer,
            tags: details.tags,
            created_at: event.created_at,
            updated_at: event.updated_at,
        }
    }
}

impl From<&EventView> for EventDraft {
    fn from(view: &EventView) -> Self {
        Self {
            title: view.title.clone(),
            description: view.description.clone(),
            overview: view.overview.clone(),
            image: view.image.clone(),
            venue: view.venue.clone(),
            location: view.location.clone(),
            date: view.date.clone(),
            time: view.time.clone(),
            mode: view.mode.as_str().to_string(),
            audience: view.audience.clone(),
            agenda: view.agenda.clone(),
            organizer: view.organizer.clone(),
            tags: view.tags.clone(),
        }
    }
}

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;

use crate::{
    domain::{
        EventId, RepoCreateError,
        event::{Event, EventDraft, EventRepository, ValidationFailure, pipeline::normalize_event},
    },
    workflow::events::EventView,
};

#[async_trait::async_trait]
pub trait CreateEventUseCase {
    async fn create_event(&self, draft: EventDraft) -> Result<EventView, CreateEventError>;
}

#[derive(Debug, Error)]
pub enum CreateEventError {
    #[error("{0}")]
    Invalid(ValidationFailure),
    #[error("title already in use: an event with slug '{0}' exists")]
    SlugTaken(String),
    #[error("event storage failed")]
    RepositoryError,
}

pub struct CreateEventUseCaseImpl<R: EventRepository> {
    event_repository: Arc<R>,
}

impl<R: EventRepository> CreateEventUseCaseImpl<R> {
    pub fn new(event_repository: Arc<R>) -> Self {
        Self { event_repository }
    }
}

#[async_trait::async_trait]
impl<R: EventRepository + Send + Sync + 'static> CreateEventUseCase for CreateEventUseCaseImpl<R> {
    async fn create_event(&self, draft: EventDraft) -> Result<EventView, CreateEventError> {
        let details = normalize_event(None, draft).map_err(CreateEventError::Invalid)?;

        let now = Utc::now();
        let event = Event {
            id: EventId::new(),
            details,
            created_at: now,
            updated_at: now,
        };

        match self.event_repository.create_event(&event).await {
            Ok(()) => {
                log::info!("Created event {} ({})", event.details.slug, event.id);
                Ok(event.into())
            }
            Err(RepoCreateError::Conflict) => Err(CreateEventError::SlugTaken(event.details.slug)),
            Err(RepoCreateError::StorageError(e)) => {
                log::error!("Failed to store event {}: {}", event.details.slug, e);
                Err(CreateEventError::RepositoryError)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{domain::event::fixtures::draft, workflow::events::mock::MockEventRepository};

    #[tokio::test]
    async fn test_create_event() {
        let repo = Arc::new(MockEventRepository::default());
        let use_case = CreateEventUseCaseImpl::new(repo.clone());

        let view = use_case
            .create_event(draft("My Awesome Event!!"))
            .await
            .expect("event should be created");
        assert_eq!(view.slug, "my-awesome-event");
        assert_eq!(view.time, "09:00");
        assert_eq!(view.created_at, view.updated_at);
        assert_eq!(repo.stored().len(), 1);
    }

    #[tokio::test]
    async fn test_colliding_slug_is_a_conflict() {
        let repo = Arc::new(MockEventRepository::default());
        let use_case = CreateEventUseCaseImpl::new(repo.clone());

        use_case
            .create_event(draft("Rust Meetup"))
            .await
            .expect("first event should be created");
        let err = use_case
            .create_event(draft("rust   meetup!"))
            .await
            .expect_err("second event should collide");
        assert!(matches!(err, CreateEventError::SlugTaken(ref slug) if slug == "rust-meetup"));
        assert_eq!(repo.stored().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_draft_is_never_stored() {
        let repo = Arc::new(MockEventRepository::default());
        let use_case = CreateEventUseCaseImpl::new(repo.clone());

        let mut d = draft("Rust Meetup");
        d.mode = "virtual".to_string();
        d.agenda.clear();
        let err = use_case.create_event(d).await.expect_err("invalid draft");
        match err {
            CreateEventError::Invalid(failure) => {
                assert!(failure.has_field("mode"));
                assert!(failure.has_field("agenda"));
            }
            other => panic!("unexpected error: {}", other),
        }
        assert!(repo.stored().is_empty());
    }

    #[tokio::test]
    async fn test_storage_failure() {
        let use_case = CreateEventUseCaseImpl::new(Arc::new(MockEventRepository::unavailable()));
        let err = use_case
            .create_event(draft("Rust Meetup"))
            .await
            .expect_err("storage is unavailable");
        assert!(matches!(err, CreateEventError::RepositoryError));
    }
}

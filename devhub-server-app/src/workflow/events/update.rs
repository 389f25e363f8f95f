use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;

use crate::{
    domain::{
        EventId, RepoRetrieveError, RepoUpdateError,
        event::{Event, EventDraft, EventRepository, ValidationFailure, pipeline::normalize_event},
    },
    workflow::events::EventView,
};

#[async_trait::async_trait]
pub trait UpdateEventUseCase {
    /// Replaces the editable fields of an event with `draft`.
    async fn update_event(&self, id: EventId, draft: EventDraft)
    -> Result<EventView, UpdateEventError>;
}

#[derive(Debug, Error)]
pub enum UpdateEventError {
    #[error("event not found")]
    NotFound,
    #[error("{0}")]
    Invalid(ValidationFailure),
    #[error("title already in use: an event with slug '{0}' exists")]
    SlugTaken(String),
    #[error("event storage failed")]
    RepositoryError,
}

pub struct UpdateEventUseCaseImpl<R: EventRepository> {
    event_repository: Arc<R>,
}

impl<R: EventRepository> UpdateEventUseCaseImpl<R> {
    pub fn new(event_repository: Arc<R>) -> Self {
        Self { event_repository }
    }
}

#[async_trait::async_trait]
impl<R: EventRepository + Send + Sync + 'static> UpdateEventUseCase for UpdateEventUseCaseImpl<R> {
    async fn update_event(
        &self,
        id: EventId,
        draft: EventDraft,
    ) -> Result<EventView, UpdateEventError> {
        let previous = match self.event_repository.get_event(id).await {
            Ok(event) => event,
            Err(RepoRetrieveError::NotFound) => return Err(UpdateEventError::NotFound),
            Err(RepoRetrieveError::StorageError(e)) => {
                log::error!("Failed to load event {} for update: {}", id, e);
                return Err(UpdateEventError::RepositoryError);
            }
        };

        let details = normalize_event(Some(&previous), draft).map_err(UpdateEventError::Invalid)?;
        if details == previous.details {
            log::debug!("Event {} unchanged, skipping write", id);
            return Ok(previous.into());
        }

        let event = Event {
            id,
            details,
            created_at: previous.created_at,
            updated_at: Utc::now(),
        };

        match self.event_repository.update_event(&event).await {
            Ok(()) => {
                log::info!("Updated event {} ({})", event.details.slug, event.id);
                Ok(event.into())
            }
            Err(RepoUpdateError::NotFound) => Err(UpdateEventError::NotFound),
            Err(RepoUpdateError::Conflict) => Err(UpdateEventError::SlugTaken(event.details.slug)),
            Err(RepoUpdateError::StorageError(e)) => {
                log::error!("Failed to update event {}: {}", id, e);
                Err(UpdateEventError::RepositoryError)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::event::fixtures::draft,
        workflow::events::{
            create::{CreateEventUseCase, CreateEventUseCaseImpl},
            mock::MockEventRepository,
        },
    };

    async fn seeded(titles: &[&str]) -> (Arc<MockEventRepository>, Vec<EventView>) {
        let repo = Arc::new(MockEventRepository::default());
        let create = CreateEventUseCaseImpl::new(repo.clone());
        let mut views = Vec::new();
        for title in titles {
            views.push(create.create_event(draft(title)).await.expect("seed event"));
        }
        (repo, views)
    }

    fn draft_of(view: &EventView, repo: &MockEventRepository) -> EventDraft {
        let stored = repo
            .stored()
            .into_iter()
            .find(|e| e.id == view.id)
            .expect("event is stored");
        EventDraft::from(&stored.details)
    }

    #[tokio::test]
    async fn test_title_change_updates_slug() {
        let (repo, views) = seeded(&["Rust Meetup"]).await;
        let use_case = UpdateEventUseCaseImpl::new(repo.clone());

        let mut candidate = draft_of(&views[0], &repo);
        candidate.title = "Rust Meetup 2026".to_string();
        let updated = use_case
            .update_event(views[0].id, candidate)
            .await
            .expect("update should succeed");

        assert_eq!(updated.slug, "rust-meetup-2026");
        assert_eq!(updated.created_at, views[0].created_at);
        assert!(updated.updated_at >= views[0].updated_at);
    }

    #[tokio::test]
    async fn test_unchanged_draft_skips_write() {
        let (repo, views) = seeded(&["Rust Meetup"]).await;
        let use_case = UpdateEventUseCaseImpl::new(repo.clone());

        let candidate = draft_of(&views[0], &repo);
        let updated = use_case
            .update_event(views[0].id, candidate)
            .await
            .expect("no-op update");
        assert_eq!(updated, views[0]);
    }

    #[tokio::test]
    async fn test_renaming_onto_existing_slug_conflicts() {
        let (repo, views) = seeded(&["Rust Meetup", "Go Meetup"]).await;
        let use_case = UpdateEventUseCaseImpl::new(repo.clone());

        let mut candidate = draft_of(&views[1], &repo);
        candidate.title = "Rust  Meetup".to_string();
        let err = use_case
            .update_event(views[1].id, candidate)
            .await
            .expect_err("slug is taken");
        assert!(matches!(err, UpdateEventError::SlugTaken(ref slug) if slug == "rust-meetup"));
    }

    #[tokio::test]
    async fn test_invalid_time_is_rejected() {
        let (repo, views) = seeded(&["Rust Meetup"]).await;
        let use_case = UpdateEventUseCaseImpl::new(repo.clone());

        let mut candidate = draft_of(&views[0], &repo);
        candidate.time = "13:00 PM".to_string();
        let err = use_case
            .update_event(views[0].id, candidate)
            .await
            .expect_err("invalid time");
        match err {
            UpdateEventError::Invalid(failure) => assert_eq!(
                failure.messages_for("time").collect::<Vec<_>>(),
                vec!["Invalid time values"]
            ),
            other => panic!("unexpected error: {}", other),
        }
        assert_eq!(repo.stored()[0].details.time, "09:00");
    }

    #[tokio::test]
    async fn test_unknown_event() {
        let repo = Arc::new(MockEventRepository::default());
        let use_case = UpdateEventUseCaseImpl::new(repo);
        let err = use_case
            .update_event(EventId::new(), draft("Rust Meetup"))
            .await
            .expect_err("unknown id");
        assert!(matches!(err, UpdateEventError::NotFound));
    }
}

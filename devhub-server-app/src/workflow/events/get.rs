use std::sync::Arc;

use thiserror::Error;

use crate::{
    domain::{
        RepoRetrieveError,
        event::{EventRepository, slug::is_valid_slug},
    },
    workflow::events::EventView,
};

#[async_trait::async_trait]
pub trait GetEventUseCase {
    async fn get_event(&self, slug: &str) -> Result<EventView, GetEventError>;
}

#[derive(Debug, Error)]
pub enum GetEventError {
    #[error("event not found")]
    NotFound,
    #[error("event storage failed")]
    RepositoryError,
}

pub struct GetEventUseCaseImpl<R: EventRepository> {
    event_repository: Arc<R>,
}

impl<R: EventRepository> GetEventUseCaseImpl<R> {
    pub fn new(event_repository: Arc<R>) -> Self {
        Self { event_repository }
    }
}

#[async_trait::async_trait]
impl<R: EventRepository + Send + Sync + 'static> GetEventUseCase for GetEventUseCaseImpl<R> {
    async fn get_event(&self, slug: &str) -> Result<EventView, GetEventError> {
        if !is_valid_slug(slug) {
            return Err(GetEventError::NotFound);
        }
        match self.event_repository.get_event_by_slug(slug).await {
            Ok(event) => Ok(event.into()),
            Err(RepoRetrieveError::NotFound) => Err(GetEventError::NotFound),
            Err(RepoRetrieveError::StorageError(e)) => {
                log::error!("Failed to retrieve event {}: {}", slug, e);
                Err(GetEventError::RepositoryError)
            }
        }
    }
}

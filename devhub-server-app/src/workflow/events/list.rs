use std::sync::Arc;

use thiserror::Error;

use crate::{
    domain::{RepoError, event::EventRepository},
    workflow::events::EventView,
};

#[async_trait::async_trait]
pub trait ListEventsUseCase {
    async fn list_events(&self) -> Result<Vec<EventView>, ListEventsError>;
}

#[derive(Debug, Error)]
pub enum ListEventsError {
    #[error("event storage failed")]
    RepositoryError,
}

pub struct ListEventsUseCaseImpl<R: EventRepository> {
    event_repository: Arc<R>,
}

impl<R: EventRepository> ListEventsUseCaseImpl<R> {
    pub fn new(event_repository: Arc<R>) -> Self {
        Self { event_repository }
    }
}

#[async_trait::async_trait]
impl<R: EventRepository + Send + Sync + 'static> ListEventsUseCase for ListEventsUseCaseImpl<R> {
    async fn list_events(&self) -> Result<Vec<EventView>, ListEventsError> {
        match self.event_repository.list_events().await {
            Ok(events) => Ok(events.into_iter().map(EventView::from).collect()),
            Err(RepoError::StorageError(e)) => {
                log::error!("Error retrieving events: {}", e);
                Err(ListEventsError::RepositoryError)
            }
        }
    }
}

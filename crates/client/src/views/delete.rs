use std::sync::Arc;

use cinedex_core::{Movie, MovieId};

use crate::error::ClientResult;
use crate::events::{EventBus, MovieEvent, ITEM_DELETED_EVENT};
use crate::service::MovieTransport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogOutcome {
    /// Closed after an action; carries the event name.
    Closed(&'static str),
    Dismissed,
}

impl DialogOutcome {
    pub fn is_item_deleted(&self) -> bool {
        *self == DialogOutcome::Closed(ITEM_DELETED_EVENT)
    }
}

/// Confirmation dialog opened from the list.
pub struct MovieDeleteDialog {
    transport: Arc<dyn MovieTransport>,
    events: EventBus,
    movie: Movie,
    outcome: Option<DialogOutcome>,
}

impl MovieDeleteDialog {
    pub fn new(transport: Arc<dyn MovieTransport>, events: EventBus, movie: Movie) -> Self {
        Self {
            transport,
            events,
            movie,
            outcome: None,
        }
    }

    pub fn movie(&self) -> &Movie {
        &self.movie
    }

    /// `None` while the dialog is open.
    pub fn outcome(&self) -> Option<DialogOutcome> {
        self.outcome
    }

    pub fn cancel(&mut self) -> DialogOutcome {
        self.outcome = Some(DialogOutcome::Dismissed);
        DialogOutcome::Dismissed
    }

    /// Delete `id`; on success close and announce the deletion.
    ///
    /// On failure the dialog stays open.
    pub async fn confirm_delete(&mut self, id: MovieId) -> ClientResult<DialogOutcome> {
        self.transport.delete(id).await?;
        self.events.publish(MovieEvent::ItemDeleted(id));

        let outcome = DialogOutcome::Closed(ITEM_DELETED_EVENT);
        self.outcome = Some(outcome);
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use crate::testing::MockTransport;

    use super::*;

    fn dialog(transport: &Arc<MockTransport>, events: &EventBus) -> MovieDeleteDialog {
        MovieDeleteDialog::new(transport.clone(), events.clone(), Movie::with_id(MovieId::new(123)))
    }

    #[tokio::test]
    async fn confirm_deletes_closes_and_signals() {
        let transport = Arc::new(MockTransport::with_movies(vec![Movie::with_id(MovieId::new(123))]));
        let events = EventBus::new();
        let mut rx = events.subscribe();
        let mut dialog = dialog(&transport, &events);

        let outcome = dialog.confirm_delete(MovieId::new(123)).await.unwrap();

        assert_eq!(transport.calls(), vec!["delete 123"]);
        assert!(outcome.is_item_deleted());
        assert_eq!(dialog.outcome(), Some(DialogOutcome::Closed(ITEM_DELETED_EVENT)));
        assert_eq!(rx.try_recv().unwrap(), MovieEvent::ItemDeleted(MovieId::new(123)));
    }

    #[tokio::test]
    async fn failed_delete_keeps_dialog_open() {
        let transport = Arc::new(MockTransport::default());
        transport.fail_with(500);
        let events = EventBus::new();
        let mut rx = events.subscribe();
        let mut dialog = dialog(&transport, &events);

        assert!(dialog.confirm_delete(MovieId::new(123)).await.is_err());
        assert_eq!(dialog.outcome(), None);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn cancel_dismisses_without_calls() {
        let transport = Arc::new(MockTransport::default());
        let events = EventBus::new();
        let mut dialog = dialog(&transport, &events);

        assert_eq!(dialog.cancel(), DialogOutcome::Dismissed);
        assert!(!DialogOutcome::Dismissed.is_item_deleted());
        assert!(transport.calls().is_empty());
    }
}

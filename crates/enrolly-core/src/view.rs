// ── Latest-page holder for one listing ──
//
// A view (students table, course picker, ...) re-fetches its page on every
// filter or page change. `ListView` keeps the newest accepted page in a
// `watch` channel and ignores responses that were overtaken in flight.

use std::future::Future;
use std::sync::Arc;

use enrolly_api::{Error, PaginatedData};
use tokio::sync::watch;

use crate::sequence::{QuerySequencer, QueryTicket};

type Snapshot<T> = Option<Arc<PaginatedData<T>>>;

pub struct ListView<T: Send + Sync + 'static> {
    key: String,
    sequencer: Arc<QuerySequencer>,
    state: watch::Sender<Snapshot<T>>,
}

impl<T: Send + Sync + 'static> ListView<T> {
    pub fn new(key: impl Into<String>) -> Self {
        Self::with_sequencer(key, Arc::new(QuerySequencer::new()))
    }

    /// Share counters with other views (each view uses its own key).
    pub fn with_sequencer(key: impl Into<String>, sequencer: Arc<QuerySequencer>) -> Self {
        let (state, _) = watch::channel(None);
        Self {
            key: key.into(),
            sequencer,
            state,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Mark a new request as dispatched.
    pub fn begin(&self) -> QueryTicket {
        self.sequencer.issue(&self.key)
    }

    /// Store `page` if `ticket` is still the newest. Returns whether it was applied.
    pub fn apply(&self, ticket: &QueryTicket, page: PaginatedData<T>) -> bool {
        if ticket.key() != self.key {
            return false;
        }
        match self.sequencer.accept(ticket, page) {
            Some(page) => {
                self.state.send_replace(Some(Arc::new(page)));
                true
            }
            None => false,
        }
    }

    /// Run `request` as the newest fetch for this view.
    ///
    /// `Ok(false)` means the response arrived after a newer one was started
    /// and was discarded. Errors leave the current page untouched.
    pub async fn load<F>(&self, request: F) -> Result<bool, Error>
    where
        F: Future<Output = Result<PaginatedData<T>, Error>>,
    {
        let ticket = self.begin();
        let page = request.await?;
        Ok(self.apply(&ticket, page))
    }

    /// The newest accepted page, if any.
    pub fn current(&self) -> Snapshot<T> {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot<T>> {
        self.state.subscribe()
    }
}

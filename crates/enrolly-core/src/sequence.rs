// ── Stale-response guard ──
//
// Concurrent requests for the same logical query may complete in any
// order. Each dispatch takes a ticket with a per-key monotonic number;
// only the holder of the newest ticket may apply its result.

use std::future::Future;

use dashmap::DashMap;
use enrolly_api::Error;
use tracing::debug;

/// Proof of dispatch order for one request of a logical query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTicket {
    key: String,
    seq: u64,
}

impl QueryTicket {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }
}

/// Per-query sequence counters.
#[derive(Debug, Default)]
pub struct QuerySequencer {
    latest: DashMap<String, u64>,
}

impl QuerySequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new dispatch for `key`. Supersedes every earlier ticket.
    pub fn issue(&self, key: &str) -> QueryTicket {
        let mut latest = self.latest.entry(key.to_owned()).or_insert(0);
        *latest += 1;
        QueryTicket {
            key: key.to_owned(),
            seq: *latest,
        }
    }

    /// `true` while no later request for the same key has been dispatched.
    pub fn is_current(&self, ticket: &QueryTicket) -> bool {
        self.latest
            .get(&ticket.key)
            .is_some_and(|latest| *latest == ticket.seq)
    }

    /// Hand back `value` only if `ticket` is still the newest for its key.
    pub fn accept<T>(&self, ticket: &QueryTicket, value: T) -> Option<T> {
        if self.is_current(ticket) {
            Some(value)
        } else {
            debug!(key = %ticket.key, seq = ticket.seq, "discarding stale response");
            None
        }
    }

    /// Dispatch `request` under `key` and drop its result if it went stale.
    ///
    /// Errors are always returned; staleness only suppresses successes.
    pub async fn run<T, F>(&self, key: &str, request: F) -> Result<Option<T>, Error>
    where
        F: Future<Output = Result<T, Error>>,
    {
        let ticket = self.issue(key);
        let value = request.await?;
        Ok(self.accept(&ticket, value))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn later_ticket_supersedes_earlier() {
        let seq = QuerySequencer::new();
        let first = seq.issue("students?page=1");
        let second = seq.issue("students?page=1");

        assert!(!seq.is_current(&first));
        assert!(seq.is_current(&second));
        assert_eq!(second.seq(), 2);
    }

    #[test]
    fn out_of_order_completion_keeps_newest() {
        let seq = QuerySequencer::new();
        let older = seq.issue("courses");
        let newer = seq.issue("courses");

        // Newer finishes first and is applied; older arrives late and is dropped.
        assert_eq!(seq.accept(&newer, "page from newer"), Some("page from newer"));
        assert_eq!(seq.accept(&older, "page from older"), None);
    }

    #[test]
    fn keys_are_independent() {
        let seq = QuerySequencer::new();
        let students = seq.issue("students");
        let _courses = seq.issue("courses");
        assert!(seq.is_current(&students));
        assert_eq!(students.key(), "students");
    }

    #[test]
    fn unknown_ticket_is_not_current() {
        let seq = QuerySequencer::new();
        let foreign = QuerySequencer::new().issue("x");
        assert!(!seq.is_current(&foreign));
    }

    #[tokio::test]
    async fn run_returns_value_when_current() {
        let seq = QuerySequencer::new();
        let value = seq.run("k", async { Ok::<_, Error>(7) }).await;
        assert!(matches!(value, Ok(Some(7))));
    }

    #[tokio::test]
    async fn run_propagates_errors() {
        let seq = QuerySequencer::new();
        let result: Result<Option<u32>, Error> = seq
            .run("k", async { Err(Error::Timeout { timeout_ms: 5000 }) })
            .await;
        assert!(matches!(result, Err(Error::Timeout { .. })));
    }

    #[tokio::test]
    async fn run_discards_result_superseded_mid_flight() {
        let seq = QuerySequencer::new();
        let result = seq
            .run("k", async {
                // A newer request for the same key is dispatched while this one is in flight.
                let _newer = seq.issue("k");
                Ok::<_, Error>("stale")
            })
            .await;
        assert!(matches!(result, Ok(None)));
    }
}

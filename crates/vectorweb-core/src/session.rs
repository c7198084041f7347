use std::time::Duration;

use crate::model::{ConnectivityStatus, SearchRequest};
use crate::orchestrator::Resolution;
use crate::presenter::ResultPresenter;

/// Sequence number of one search attempt. Later submissions get larger
/// tickets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SearchTicket(u64);

/// A validated submission, ready to hand to the orchestrator.
#[derive(Debug, Clone)]
pub struct PendingSearch {
    pub ticket: SearchTicket,
    pub request: SearchRequest,
    /// Connectivity as known at submission time; drives the fallback decision.
    pub status: ConnectivityStatus,
}

/// All UI-side search state: connectivity, the latest ticket, and the
/// presenter. Every mutation happens through `&mut self` on the UI thread.
#[derive(Debug)]
pub struct SearchSession {
    status: ConnectivityStatus,
    latest: u64,
    presenter: ResultPresenter,
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new(ResultPresenter::default())
    }
}

impl SearchSession {
    pub fn new(presenter: ResultPresenter) -> Self {
        Self {
            status: ConnectivityStatus::Unknown,
            latest: 0,
            presenter,
        }
    }

    pub fn with_copy_window(copy_window: Duration) -> Self {
        Self::new(ResultPresenter::new(copy_window))
    }

    pub fn status(&self) -> ConnectivityStatus {
        self.status
    }

    pub fn apply_probe(&mut self, status: ConnectivityStatus) {
        self.status = status;
    }

    pub fn presenter(&self) -> &ResultPresenter {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut ResultPresenter {
        &mut self.presenter
    }

    pub fn latest_ticket(&self) -> Option<SearchTicket> {
        (self.latest > 0).then_some(SearchTicket(self.latest))
    }

    /// Start a new search. Returns `None` without touching any state when a
    /// field is empty. Otherwise the outcome becomes Pending, focus is
    /// cleared, and any attempt still in flight is superseded.
    pub fn submit(&mut self, url: &str, query: &str, limit: usize) -> Option<PendingSearch> {
        let request = match SearchRequest::new(url, query, limit) {
            Ok(request) => request,
            Err(e) => {
                tracing::debug!(error = %e, "search not submitted");
                return None;
            }
        };

        self.latest += 1;
        let ticket = SearchTicket(self.latest);
        self.presenter.set_pending();

        Some(PendingSearch {
            ticket,
            request,
            status: self.status,
        })
    }

    /// Apply a finished attempt. Resolutions for superseded tickets are
    /// discarded and `false` is returned.
    pub fn complete(&mut self, ticket: SearchTicket, resolution: Resolution) -> bool {
        if ticket.0 != self.latest {
            tracing::debug!(
                ticket = ticket.0,
                latest = self.latest,
                "discarding superseded search result"
            );
            return false;
        }

        if let Some(status) = resolution.status {
            self.status = status;
        }
        self.presenter.set_outcome(resolution.outcome);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ResultSet, SearchOutcome};
    use crate::orchestrator::mock_results;

    fn live(query: &str) -> Resolution {
        Resolution {
            outcome: SearchOutcome::Success(ResultSet::live(mock_results("u", query))),
            status: Some(ConnectivityStatus::Connected),
        }
    }

    #[test]
    fn test_empty_fields_do_not_transition() {
        let mut s = SearchSession::default();
        assert!(s.submit("", "q", 10).is_none());
        assert!(s.submit("https://example.com", "  ", 10).is_none());
        assert!(s.presenter().outcome().is_none());
        assert!(s.latest_ticket().is_none());
    }

    #[test]
    fn test_submit_goes_pending_and_clears_focus() {
        let mut s = SearchSession::default();
        let first = s.submit("https://example.com", "test", 10).unwrap();
        assert!(s.complete(first.ticket, live("test")));
        assert!(s.presenter_mut().focus("chunk-0"));

        let second = s.submit("https://example.com", "again", 10).unwrap();
        assert!(second.ticket > first.ticket);
        assert!(s.presenter().is_pending());
        assert!(s.presenter().focused_item().is_none());
    }

    #[test]
    fn test_pending_search_snapshots_status() {
        let mut s = SearchSession::default();
        s.apply_probe(ConnectivityStatus::Disconnected);
        let pending = s.submit("https://example.com", "test", 10).unwrap();
        assert_eq!(pending.status, ConnectivityStatus::Disconnected);
        assert_eq!(pending.request.limit(), 10);
    }

    #[test]
    fn test_live_success_marks_connected() {
        let mut s = SearchSession::default();
        assert_eq!(s.status(), ConnectivityStatus::Unknown);
        let p = s.submit("https://example.com", "test", 10).unwrap();
        s.complete(p.ticket, live("test"));
        assert_eq!(s.status(), ConnectivityStatus::Connected);
        assert_eq!(s.presenter().derived_count(), Some(5));
    }

    #[test]
    fn test_failure_keeps_status() {
        let mut s = SearchSession::default();
        s.apply_probe(ConnectivityStatus::Connected);
        let p = s.submit("https://example.com", "test", 10).unwrap();
        s.complete(
            p.ticket,
            Resolution {
                outcome: SearchOutcome::Failure("index not found".into()),
                status: None,
            },
        );
        assert_eq!(s.status(), ConnectivityStatus::Connected);
        assert_eq!(s.presenter().error(), Some("index not found"));
    }

    #[test]
    fn test_last_submission_wins() {
        let mut s = SearchSession::default();
        let first = s.submit("https://example.com", "first", 10).unwrap();
        let second = s.submit("https://example.com", "second", 10).unwrap();

        assert!(s.complete(second.ticket, live("second")));
        // The first attempt resolves late and must not overwrite.
        assert!(!s.complete(first.ticket, live("first")));

        let set = s.presenter().results().unwrap();
        assert!(set.items[0].content.plain_text().contains("second"));
    }

    #[test]
    fn test_stale_result_while_newer_pending_is_dropped() {
        let mut s = SearchSession::default();
        let first = s.submit("https://example.com", "first", 10).unwrap();
        let _second = s.submit("https://example.com", "second", 10).unwrap();

        assert!(!s.complete(first.ticket, live("first")));
        assert!(s.presenter().is_pending());
    }
}

//! Search orchestration: live request, failure classification, and the
//! preview fallback.
//!
//! When a search fails, what the user sees depends on what was known about
//! the service beforehand:
//!
//! - `Connected`: the failure is real and is surfaced as
//!   [`SearchOutcome::Failure`].
//! - `Unknown` / `Disconnected`: a deterministic preview set is synthesized
//!   after a short artificial delay, so the client stays usable without a
//!   backend. The set is tagged [`ResultOrigin::Preview`].
//!
//! [`ResultOrigin::Preview`]: crate::model::ResultOrigin::Preview

use std::time::Duration;

use crate::backend::SearchBackend;
use crate::config::VectorWebConfig;
use crate::error::{Result, VectorWebError};
use crate::markup::RichText;
use crate::model::{ConnectivityStatus, ResultItem, ResultSet, SearchOutcome, SearchRequest};

pub const MOCK_RESULT_COUNT: usize = 5;
const MOCK_TOP_SCORE: f64 = 0.98;
const MOCK_SCORE_STEP: f64 = 0.05;
const MOCK_WINDOW_STRIDE: u64 = 100;
const MOCK_WINDOW_LEN: u64 = 500;

const DEFAULT_DEADLINE: Duration = Duration::from_secs(30);
const DEFAULT_MOCK_DELAY: Duration = Duration::from_millis(1500);

/// What to do with the result of a live call.
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    /// The service answered; show its results.
    Live(Vec<ResultItem>),
    /// A known-good service failed; show the message.
    Fail(String),
    /// The service was never confirmed; show synthesized results.
    Preview(Vec<ResultItem>),
}

/// Terminal result of one search attempt, ready to be applied to a session.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub outcome: SearchOutcome,
    /// New connectivity status, when the attempt proved something about it.
    pub status: Option<ConnectivityStatus>,
}

/// Pure fallback decision over `(request, last known status, call result)`.
pub fn decide(
    request: &SearchRequest,
    status: ConnectivityStatus,
    result: Result<Vec<ResultItem>>,
) -> Decision {
    match result {
        Ok(items) => Decision::Live(items),
        Err(e) if status.is_connected() => Decision::Fail(e.user_message()),
        Err(_) => Decision::Preview(mock_results(request.url(), request.query())),
    }
}

/// The deterministic preview set: five items with descending scores, each
/// naming the submitted url and query verbatim.
pub fn mock_results(url: &str, query: &str) -> Vec<ResultItem> {
    (0..MOCK_RESULT_COUNT)
        .map(|i| {
            let raw_score = MOCK_TOP_SCORE - MOCK_SCORE_STEP * i as f64;
            let start = MOCK_WINDOW_STRIDE * i as u64;
            let content = RichText::new()
                .text(&format!(
                    "...This is a simulated matching chunk #{} from the website ",
                    i + 1
                ))
                .emphasis(url)
                .text(" based on your query \"")
                .emphasis(query)
                .text("\". ")
                .line_break()
                .line_break()
                .text(
                    " In a real scenario, this would contain semantic matches extracted \
                     from the HTML DOM, cleaned of scripts and styles, and ranked by vector \
                     similarity via Pinecone...",
                );
            ResultItem {
                id: format!("chunk-{i}"),
                score: (raw_score * 1000.0).round() / 1000.0,
                content,
                start_index: Some(start),
                end_index: Some(start + MOCK_WINDOW_LEN),
            }
        })
        .collect()
}

/// Runs searches against a backend and resolves every attempt to a terminal
/// outcome.
pub struct Orchestrator<B> {
    backend: B,
    deadline: Duration,
    mock_delay: Duration,
}

impl<B: SearchBackend> Orchestrator<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            deadline: DEFAULT_DEADLINE,
            mock_delay: DEFAULT_MOCK_DELAY,
        }
    }

    pub fn from_config(backend: B, config: &VectorWebConfig) -> Self {
        Self::new(backend)
            .with_deadline(config.service.timeout())
            .with_mock_delay(config.search.mock_delay())
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn with_mock_delay(mut self, mock_delay: Duration) -> Self {
        self.mock_delay = mock_delay;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Attempt the live call under the deadline, then apply [`decide`].
    /// Always returns; never leaves the caller pending.
    pub async fn execute(&self, request: &SearchRequest, status: ConnectivityStatus) -> Resolution {
        tracing::debug!(
            endpoint = self.backend.endpoint(),
            url = request.url(),
            query = request.query(),
            limit = request.limit(),
            %status,
            "dispatching search"
        );

        let result = match tokio::time::timeout(self.deadline, self.backend.search(request)).await
        {
            Ok(result) => result,
            Err(_) => Err(VectorWebError::Timeout(self.deadline)),
        };

        if let Err(ref e) = result {
            tracing::warn!(error = %e, transient = e.is_transient(), %status, "search failed");
        }

        match decide(request, status, result) {
            Decision::Live(items) => {
                tracing::debug!(count = items.len(), "search returned live results");
                Resolution {
                    outcome: SearchOutcome::Success(ResultSet::live(items)),
                    status: Some(ConnectivityStatus::Connected),
                }
            }
            Decision::Fail(message) => Resolution {
                outcome: SearchOutcome::Failure(message),
                status: None,
            },
            Decision::Preview(items) => {
                tracing::warn!("service not confirmed reachable, switching to preview results");
                tokio::time::sleep(self.mock_delay).await;
                Resolution {
                    outcome: SearchOutcome::Success(ResultSet::preview(items)),
                    status: None,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HealthReport, ResultOrigin};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn request() -> SearchRequest {
        SearchRequest::new("https://example.com", "test", 10).unwrap()
    }

    fn item(id: &str, score: f64) -> ResultItem {
        ResultItem {
            id: id.into(),
            score,
            content: RichText::parse("live <b>content</b>"),
            start_index: None,
            end_index: None,
        }
    }

    /// Backend whose search behaviour is scripted per test.
    enum Scripted {
        Ok(Vec<ResultItem>),
        Err(fn() -> VectorWebError),
        Hang,
    }

    struct ScriptedBackend {
        script: Scripted,
        calls: AtomicUsize,
    }

    impl ScriptedBackend {
        fn new(script: Scripted) -> Self {
            Self {
                script,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl SearchBackend for ScriptedBackend {
        async fn health(&self) -> Result<HealthReport> {
            Err(VectorWebError::Transport("unused".into()))
        }

        async fn search(&self, _request: &SearchRequest) -> Result<Vec<ResultItem>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.script {
                Scripted::Ok(items) => Ok(items.clone()),
                Scripted::Err(make) => Err(make()),
                Scripted::Hang => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Ok(Vec::new())
                }
            }
        }

        fn endpoint(&self) -> &str {
            "scripted"
        }
    }

    fn orchestrator(script: Scripted) -> Orchestrator<ScriptedBackend> {
        Orchestrator::new(ScriptedBackend::new(script))
            .with_mock_delay(Duration::from_millis(5))
            .with_deadline(Duration::from_millis(200))
    }

    // -- decide --

    #[test]
    fn test_decide_success_is_live_for_any_status() {
        for status in [
            ConnectivityStatus::Unknown,
            ConnectivityStatus::Connected,
            ConnectivityStatus::Disconnected,
        ] {
            let d = decide(&request(), status, Ok(vec![item("a", 0.9)]));
            assert_eq!(d, Decision::Live(vec![item("a", 0.9)]));
        }
    }

    #[test]
    fn test_decide_connected_failure_surfaces_message() {
        let err = VectorWebError::Service {
            status: 500,
            message: "index not found".into(),
        };
        let d = decide(&request(), ConnectivityStatus::Connected, Err(err));
        assert_eq!(d, Decision::Fail("index not found".into()));
    }

    #[test]
    fn test_decide_unconfirmed_failure_previews() {
        for status in [ConnectivityStatus::Unknown, ConnectivityStatus::Disconnected] {
            let err = VectorWebError::Transport("connection refused".into());
            match decide(&request(), status, Err(err)) {
                Decision::Preview(items) => assert_eq!(items.len(), MOCK_RESULT_COUNT),
                other => panic!("expected preview, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_decide_service_error_while_unknown_previews() {
        let err = VectorWebError::Service {
            status: 500,
            message: "index not found".into(),
        };
        let d = decide(&request(), ConnectivityStatus::Unknown, Err(err));
        assert!(matches!(d, Decision::Preview(_)));
    }

    // -- mock_results --

    #[test]
    fn test_mock_results_shape() {
        let items = mock_results("https://example.com", "test");
        assert_eq!(items.len(), 5);
        for pair in items.windows(2) {
            assert!(pair[0].score > pair[1].score);
        }
        for (i, item) in items.iter().enumerate() {
            assert_eq!(item.id, format!("chunk-{i}"));
            let text = item.content.plain_text();
            assert!(text.contains("https://example.com"));
            assert!(text.contains("test"));
            assert_eq!(item.start_index, Some(100 * i as u64));
            assert_eq!(item.end_index, Some(100 * i as u64 + 500));
        }
        assert!((items[0].score - 0.98).abs() < 1e-9);
        assert!((items[4].score - 0.78).abs() < 1e-9);
    }

    #[test]
    fn test_mock_results_keep_markup_characters_verbatim() {
        let items = mock_results("https://example.com/?a=<b>", "x < y");
        let text = items[0].content.plain_text();
        assert!(text.contains("https://example.com/?a=<b>"));
        assert!(text.contains("x < y"));
    }

    #[test]
    fn test_mock_results_survive_wire_round_trip() {
        let items = mock_results("https://e.com/?q=<y>", "a<tag>b");
        for item in &items {
            let back = RichText::parse(&item.content.to_markup());
            assert_eq!(back.plain_text(), item.content.plain_text());
        }
        let text = items[0].content.plain_text();
        assert!(text.contains("https://e.com/?q=<y>"));
        assert!(text.contains("\"a<tag>b\""));
    }

    #[test]
    fn test_preview_echoes_submitted_query_verbatim() {
        let request = SearchRequest::new("https://example.com", " test ", 10).unwrap();
        let err = VectorWebError::Transport("down".into());
        let Decision::Preview(items) = decide(&request, ConnectivityStatus::Unknown, Err(err))
        else {
            panic!("expected preview");
        };
        assert!(items[0].content.plain_text().contains("\" test \""));
    }

    #[test]
    fn test_mock_results_deterministic() {
        assert_eq!(mock_results("u", "q"), mock_results("u", "q"));
    }

    // -- execute --

    #[tokio::test]
    async fn test_execute_live_marks_connected() {
        let orch = orchestrator(Scripted::Ok(vec![item("a", 0.9), item("b", 0.5)]));
        let res = orch.execute(&request(), ConnectivityStatus::Unknown).await;
        assert_eq!(res.status, Some(ConnectivityStatus::Connected));
        let set = res.outcome.results().unwrap();
        assert_eq!(set.origin, ResultOrigin::Live);
        assert_eq!(set.len(), 2);
        assert_eq!(orch.backend().calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_execute_connected_failure() {
        let orch = orchestrator(Scripted::Err(|| VectorWebError::Service {
            status: 500,
            message: "index not found".into(),
        }));
        let res = orch.execute(&request(), ConnectivityStatus::Connected).await;
        assert_eq!(res.outcome, SearchOutcome::Failure("index not found".into()));
        assert_eq!(res.status, None);
    }

    #[tokio::test]
    async fn test_execute_unknown_failure_previews() {
        let orch = orchestrator(Scripted::Err(|| {
            VectorWebError::Transport("connection refused".into())
        }));
        let res = orch.execute(&request(), ConnectivityStatus::Unknown).await;
        let set = res.outcome.results().unwrap();
        assert_eq!(set.origin, ResultOrigin::Preview);
        assert_eq!(set.len(), MOCK_RESULT_COUNT);
        assert_eq!(res.status, None);
    }

    #[tokio::test]
    async fn test_execute_deadline_counts_as_transport_failure() {
        let orch = orchestrator(Scripted::Hang);
        let res = orch.execute(&request(), ConnectivityStatus::Connected).await;
        match res.outcome {
            SearchOutcome::Failure(msg) => assert_eq!(msg, "Request timed out after 200ms"),
            other => panic!("expected failure, got {other:?}"),
        }

        let res = orch.execute(&request(), ConnectivityStatus::Disconnected).await;
        assert_eq!(
            res.outcome.results().map(|s| s.origin),
            Some(ResultOrigin::Preview)
        );
    }

    #[tokio::test]
    async fn test_execute_waits_mock_delay() {
        let orch = Orchestrator::new(ScriptedBackend::new(Scripted::Err(|| {
            VectorWebError::Transport("down".into())
        })))
        .with_mock_delay(Duration::from_millis(60));
        let started = std::time::Instant::now();
        let _ = orch.execute(&request(), ConnectivityStatus::Unknown).await;
        assert!(started.elapsed() >= Duration::from_millis(60));
    }
}

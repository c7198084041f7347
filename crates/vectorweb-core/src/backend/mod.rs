mod http;

pub use http::HttpSearchBackend;

use crate::error::Result;
use crate::model::{HealthReport, ResultItem, SearchRequest};

/// The remote indexing/search service.
///
/// Implementations:
/// - `HttpSearchBackend`: JSON over HTTP (`GET /health`, `POST /search`)
///
/// Extraction, chunking, embedding and ranking all happen behind this seam;
/// the client only sees ordered result fragments.
pub trait SearchBackend: Send + Sync {
    /// Fetch the service's health report.
    fn health(&self) -> impl std::future::Future<Output = Result<HealthReport>> + Send;

    /// Run one search. Results come back in the service's ranking order.
    fn search(
        &self,
        request: &SearchRequest,
    ) -> impl std::future::Future<Output = Result<Vec<ResultItem>>> + Send;

    /// Human-readable location of the service, for logs and status display.
    fn endpoint(&self) -> &str;
}

use crate::backend::SearchBackend;
use crate::model::{ConnectivityStatus, HealthReport};

/// Check whether the search service is reachable and ready.
///
/// Any transport error, timeout, unreadable body or a status other than
/// `"ok"` yields `Disconnected`. Never errors: connectivity is a hint for the
/// fallback decision, not a liveness guarantee.
pub async fn probe<B: SearchBackend>(backend: &B) -> ConnectivityStatus {
    probe_report(backend).await.0
}

/// Like [`probe`], but also returns the parsed report when one was received.
pub async fn probe_report<B: SearchBackend>(
    backend: &B,
) -> (ConnectivityStatus, Option<HealthReport>) {
    match backend.health().await {
        Ok(report) => {
            let status = report.connectivity();
            tracing::info!(
                endpoint = backend.endpoint(),
                status = %status,
                reported = %report.status,
                "health probe finished"
            );
            (status, Some(report))
        }
        Err(e) => {
            tracing::info!(
                endpoint = backend.endpoint(),
                error = %e,
                "health probe failed, service treated as disconnected"
            );
            (ConnectivityStatus::Disconnected, None)
        }
    }
}

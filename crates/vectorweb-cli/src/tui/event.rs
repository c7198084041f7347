use vectorweb_core::model::ConnectivityStatus;
use vectorweb_core::orchestrator::Resolution;
use vectorweb_core::session::{PendingSearch, SearchTicket};

/// Actions the UI sends to the async worker task.
#[derive(Debug)]
pub enum AsyncAction {
    /// Check the search service once at startup.
    Probe,
    /// Run a submitted search through the orchestrator.
    Search(PendingSearch),
}

/// Results the async worker sends back to the UI.
#[derive(Debug)]
pub enum AsyncResult {
    Probe(ConnectivityStatus),
    /// A search attempt finished; applied only if `ticket` is still the latest.
    Search {
        ticket: SearchTicket,
        resolution: Resolution,
    },
}

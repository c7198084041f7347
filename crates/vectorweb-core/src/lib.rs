pub mod backend;
pub mod clipboard;
pub mod config;
pub mod error;
pub mod markup;
pub mod model;
pub mod orchestrator;
pub mod presenter;
pub mod probe;
pub mod session;

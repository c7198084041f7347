mod search;
mod status;

pub use search::*;
pub use status::*;

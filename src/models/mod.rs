// Filter state, normalized metrics, and content models

mod content;
mod filter;
mod metrics;

pub use content::*;
pub use filter::*;
pub use metrics::*;

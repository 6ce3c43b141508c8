pub mod composer;
pub mod configs;
pub mod logger;
pub mod mock;
pub mod service;
pub mod shared_metrics;

pub use composer::{ComposerState, MultiResponse, ResponsePolicy};
pub use service::*;

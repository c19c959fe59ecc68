//! FAQ search, popularity counters and stats.
//!
//! Search is a linear scan over the published set; relevance comes from the
//! token scoring in [`search`], not from any index.

pub mod search;
pub mod repository;
pub mod service;

pub use service::{FaqService, FaqStats};

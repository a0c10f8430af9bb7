//! Candidate review: the filter → sort → paginate pipeline, comparison
//! selection, AI search, and the HTTP handlers on top of them.

pub mod ai_search;
pub mod criteria;
pub mod filter;
pub mod handlers;
pub mod paginate;
pub mod prompts;
pub mod selection;
pub mod sort;
pub mod view;

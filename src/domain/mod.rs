//! Domain types for a single-page audit.

pub mod context;
pub mod models;

pub use context::{
    FetchedPage, FetchedResponse, PageContext, ProbeResults, ResourceStatus, TargetUrl,
};
pub use models::*;

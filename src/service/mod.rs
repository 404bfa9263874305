pub mod auditor;
pub mod fetcher;
pub mod http;
pub mod recommendation;

pub use auditor::{Auditor, PageAuditor};
pub use fetcher::{normalize_url, PageFetcher, ResourceChecker};
pub use recommendation::RecommendationClient;

#[cfg(test)]
mod tests;

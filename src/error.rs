//! Error types for route construction and handlers.

use thiserror::Error;

/// Errors that can occur while building a router.
///
/// Every variant is produced at construction time. Dispatching a request
/// never fails: unmatched paths and methods fall through to the next stage.
#[derive(Debug, Error)]
pub enum Error {
    /// A declared path does not follow the template grammar.
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// A router prefix does not follow the prefix grammar.
    #[error("Invalid prefix: {0}")]
    InvalidPrefix(String),

    /// Router options were neither a prefix string nor an options object.
    #[error("Invalid router options: {0}")]
    InvalidOptions(String),

    /// The same parameter name appears twice in one declared path.
    #[error("Duplicate parameter `{name}` in path: {path}")]
    DuplicateParam {
        /// The repeated parameter name.
        name: String,
        /// The full path (prefix included) that declared it.
        path: String,
    },

    /// The method name is not one a route can be declared for.
    #[error("Invalid HTTP method: {0}")]
    InvalidMethod(String),

    /// The generated matcher source was rejected by the regex engine.
    #[error("Pattern compilation error: {0}")]
    Pattern(#[from] regex::Error),

    /// Error parsing JSON router options.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Error type returned by route handlers.
///
/// Handler failures are not interpreted by the router and reach the caller
/// unchanged.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

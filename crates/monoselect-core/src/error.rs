//! Error types for module selection.

use monoselect_git::GitError;
use std::path::PathBuf;

/// Fatal errors raised while selecting modules or preparing their configs.
///
/// The optional pull-request lookup has its own [`crate::github::GitHubError`];
/// those failures are logged and never surface here.
#[derive(Debug, thiserror::Error)]
pub enum SelectError {
    /// Not running under the CI provider.
    #[error("Running outside of CircleCI environment. Aborting")]
    NotInCi,

    /// A mapping line without exactly three `;`-separated fields.
    #[error("invalid mapping `{line}`: expected 3 fields separated by `;`, found {fields}")]
    MalformedMapping { line: String, fields: usize },

    /// A mapping predicate without a `<location>:` prefix.
    #[error("invalid mapping `{line}`: predicate must look like `<location>:<pattern>`")]
    MissingLocation { line: String },

    #[error("'{0}' search location is not supported")]
    UnsupportedLocation(String),

    #[error("invalid pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Parameters that are not valid JSON.
    #[error("invalid parameters in {context}: {source}")]
    InvalidParams {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// Parameters that parse, but not to a JSON object.
    #[error("parameters in {context} must be a JSON object")]
    ParamsNotObject { context: String },

    #[error("Invalid pull request url `{0}`")]
    InvalidPullRequestUrl(String),

    #[error("invalid MAX_AGE `{0}`: expected a non-negative integer")]
    InvalidLookback(String),

    #[error("Config at '{}' does not exist", path.display())]
    ConfigNotFound { path: PathBuf },

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Git(#[from] GitError),
}

impl SelectError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

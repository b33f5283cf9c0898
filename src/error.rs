//! Error types for flow-dl
//!
//! Errors fall into two groups:
//! - [`Error`]: fatal for the whole run (bad cookies, bad configuration, the
//!   workflow listing endpoint failing, local disk failures)
//! - [`DownloadError`]: scoped to a single media item; the downloader records
//!   it and moves on to the next item

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for flow-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for flow-dl
///
/// Every variant aborts the current run. Per-item download failures are
/// reported through [`DownloadError`] instead.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "video_dir")
        key: Option<String>,
    },

    /// Cookie file could not be loaded or normalized
    #[error("cookie error: {0}")]
    Cookie(#[from] CookieError),

    /// A tRPC endpoint answered with a non-success status
    #[error("API request to {endpoint} failed with status {status}: {body}")]
    Api {
        /// Procedure name (e.g., "project.searchProjectWorkflows")
        endpoint: String,
        /// HTTP status code returned by the server
        status: u16,
        /// Response body, kept for diagnostics
        body: String,
    },

    /// A tRPC endpoint answered with a body that does not match the envelope
    #[error("invalid response from {endpoint}: {reason}")]
    InvalidResponse {
        /// Procedure name
        endpoint: String,
        /// What failed to decode
        reason: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Network error
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Shorthand for a [`Error::Config`] tied to a configuration key
    pub fn config(key: &str, message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
            key: Some(key.to_string()),
        }
    }
}

/// Cookie file loading errors
#[derive(Debug, Error)]
pub enum CookieError {
    /// Cookie file does not exist
    #[error("cookie file {path} does not exist")]
    NotFound {
        /// Path that was checked
        path: PathBuf,
    },

    /// Cookie file exists but could not be read
    #[error("failed to read cookie file {path}: {source}")]
    Read {
        /// Path of the cookie file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Cookie file is not valid JSON
    #[error("cookie file is not valid JSON: {0}")]
    Json(#[source] serde_json::Error),

    /// JSON is valid but is neither a list of pairs, a mapping, nor a wrapper
    #[error("unsupported cookie format: expected a list of {{name, value}} pairs, an object, or {{\"cookies\": ...}}")]
    UnsupportedShape,

    /// Cookie name or value cannot be sent in an HTTP header
    #[error("cookie {name} contains characters not allowed in an HTTP header")]
    InvalidHeaderValue {
        /// Name of the offending cookie
        name: String,
    },
}

/// Per-item download errors
///
/// None of these stop the traversal; the item is skipped and the next one is
/// attempted.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// Media generation carries no media key, so no file name can be derived
    #[error("media generation in {workflow_id}/{step_id} has no mediaKey")]
    MissingMediaKey {
        /// Owning workflow
        workflow_id: String,
        /// Owning step
        step_id: String,
    },

    /// Media key cannot be used as a file name (path separators, `..`)
    #[error("mediaKey {media_key:?} is not a safe file name")]
    UnsafeMediaKey {
        /// The rejected key
        media_key: String,
    },

    /// Media generation has no fetchable video URL
    #[error("no fifeUri for {media_key}")]
    MissingVideoUrl {
        /// Media key of the generation
        media_key: String,
    },

    /// Video host answered with a non-success status
    #[error("HTTP {status} downloading {media_key}")]
    HttpStatus {
        /// Media key of the generation
        media_key: String,
        /// HTTP status code
        status: u16,
    },

    /// Video host did not start responding within the download timeout
    #[error("no response for {media_key} within {timeout:?}")]
    Timeout {
        /// Media key of the generation
        media_key: String,
        /// Configured header timeout
        timeout: std::time::Duration,
    },

    /// Request could not be sent or no response headers arrived
    #[error("request for {media_key} failed: {source}")]
    Request {
        /// Media key of the generation
        media_key: String,
        /// Underlying transport error
        #[source]
        source: reqwest::Error,
    },

    /// Body stream broke off mid-transfer; the partial file was removed
    #[error("download of {media_key} interrupted after {bytes_written} bytes: {source}")]
    Interrupted {
        /// Media key of the generation
        media_key: String,
        /// Bytes already written before the failure
        bytes_written: u64,
        /// Underlying transport error
        #[source]
        source: reqwest::Error,
    },
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_helper_sets_key() {
        let err = Error::config("api.page_size", "page size must be at least 1");
        match &err {
            Error::Config { message, key } => {
                assert_eq!(message, "page size must be at least 1");
                assert_eq!(key.as_deref(), Some("api.page_size"));
            }
            other => panic!("expected Config error, got {other:?}"),
        }
        assert_eq!(
            err.to_string(),
            "configuration error: page size must be at least 1"
        );
    }

    #[test]
    fn api_error_display_includes_status_and_body() {
        let err = Error::Api {
            endpoint: "project.searchProjectWorkflows".to_string(),
            status: 401,
            body: "unauthorized".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "API request to project.searchProjectWorkflows failed with status 401: unauthorized"
        );
    }

    #[test]
    fn cookie_error_converts_into_error() {
        let err: Error = CookieError::UnsupportedShape.into();
        assert!(matches!(err, Error::Cookie(CookieError::UnsupportedShape)));
        assert!(err.to_string().starts_with("cookie error: unsupported cookie format"));
    }

    #[test]
    fn download_error_messages_name_the_item() {
        let missing_key = DownloadError::MissingMediaKey {
            workflow_id: "wf-1".to_string(),
            step_id: "step-1".to_string(),
        };
        assert_eq!(
            missing_key.to_string(),
            "media generation in wf-1/step-1 has no mediaKey"
        );

        let status = DownloadError::HttpStatus {
            media_key: "abc123".to_string(),
            status: 404,
        };
        assert_eq!(status.to_string(), "HTTP 404 downloading abc123");
    }
}

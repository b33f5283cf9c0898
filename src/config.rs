//! Configuration types for flow-dl

use crate::error::{Error, Result};
use crate::types::SortOrder;
use crate::utils::is_safe_path_component;
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Duration};

/// Browser user agent sent with every request
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/138.0.0.0 Safari/537.36";

/// Remote API settings (endpoints, identity, paging)
///
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the tRPC API; procedure names are appended as path segments
    /// (default: "https://labs.google/fx/api/trpc")
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Flow tool page, used to build the Referer and Origin headers
    /// (default: "https://labs.google/fx/vi/tools/flow")
    #[serde(default = "default_flow_page_url")]
    pub flow_page_url: String,

    /// Tool identifier sent in every search payload (default: "PINHOLE")
    #[serde(default = "default_tool_name")]
    pub tool_name: String,

    /// Workflows requested per page (default: 3)
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Projects requested per page when listing projects (default: 20)
    #[serde(default = "default_project_page_size")]
    pub project_page_size: u32,

    /// User-Agent header value
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Timeout for a single API request (default: 30 seconds)
    #[serde(default = "default_request_timeout", with = "duration_serde")]
    pub request_timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            flow_page_url: default_flow_page_url(),
            tool_name: default_tool_name(),
            page_size: default_page_size(),
            project_page_size: default_project_page_size(),
            user_agent: default_user_agent(),
            request_timeout: default_request_timeout(),
        }
    }
}

/// Download behavior (destination, ordering, limit)
///
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Root directory; videos land in `<video_dir>/<project_id>/`
    /// (default: "~/Downloads")
    #[serde(default = "default_video_dir")]
    pub video_dir: PathBuf,

    /// Stop after this many successful downloads (None = no limit)
    #[serde(default)]
    pub limit: Option<usize>,

    /// Order in which workflows are processed, by `createTime`
    #[serde(default)]
    pub order: SortOrder,

    /// How long to wait for a video host to start responding (default: 5 minutes)
    ///
    /// Only the wait for response headers is bounded; streaming the body is not.
    #[serde(default = "default_download_timeout", with = "duration_serde")]
    pub download_timeout: Duration,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            video_dir: default_video_dir(),
            limit: None,
            order: SortOrder::default(),
            download_timeout: default_download_timeout(),
        }
    }
}

/// Main configuration for a flow-dl run
///
/// All fields have defaults, so `Config::default()` targets the production API
/// and downloads into `~/Downloads`.
///
/// # Example
///
/// ```
/// use flow_dl::config::{Config, DownloadConfig};
///
/// let config = Config {
///     download: DownloadConfig {
///         video_dir: "videos".into(),
///         limit: Some(5),
///         ..Default::default()
///     },
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Remote API settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Download settings
    #[serde(default)]
    pub download: DownloadConfig,
}

impl Config {
    /// Check settings that serde defaults cannot guarantee
    pub fn validate(&self) -> Result<()> {
        if self.api.page_size == 0 {
            return Err(Error::config(
                "api.page_size",
                "page size must be at least 1",
            ));
        }
        if self.api.project_page_size == 0 {
            return Err(Error::config(
                "api.project_page_size",
                "project page size must be at least 1",
            ));
        }
        if self.api.tool_name.is_empty() {
            return Err(Error::config("api.tool_name", "tool name must not be empty"));
        }
        url::Url::parse(&self.api.base_url).map_err(|e| {
            Error::config("api.base_url", format!("invalid base URL '{}': {}", self.api.base_url, e))
        })?;
        url::Url::parse(&self.api.flow_page_url).map_err(|e| {
            Error::config(
                "api.flow_page_url",
                format!("invalid flow page URL '{}': {}", self.api.flow_page_url, e),
            )
        })?;
        Ok(())
    }

    /// Directory that receives the videos of `project_id`
    ///
    /// # Errors
    ///
    /// [`Error::Config`] if `project_id` is not a single relative path component
    /// (absolute, `..`, or containing separators).
    pub fn project_dir(&self, project_id: &str) -> Result<PathBuf> {
        if !is_safe_path_component(project_id) {
            return Err(Error::config(
                "project_id",
                format!("project id {project_id:?} cannot be used as a directory name"),
            ));
        }
        Ok(self.download.video_dir.join(project_id))
    }
}

/// Serialize durations as whole seconds
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_secs)
    }
}

fn default_base_url() -> String {
    "https://labs.google/fx/api/trpc".to_string()
}

fn default_flow_page_url() -> String {
    "https://labs.google/fx/vi/tools/flow".to_string()
}

fn default_tool_name() -> String {
    "PINHOLE".to_string()
}

fn default_page_size() -> u32 {
    3
}

fn default_project_page_size() -> u32 {
    20
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_download_timeout() -> Duration {
    Duration::from_secs(5 * 60)
}

/// `~/Downloads`, falling back to `./Downloads` when no home directory is set
pub fn default_video_dir() -> PathBuf {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Downloads")
}

//! # flow-dl
//!
//! Downloads every video generated in a Flow project.
//!
//! A run is a straight pipeline:
//! 1. list all workflows of the project through the cursor-paginated
//!    `project.searchProjectWorkflows` tRPC endpoint
//! 2. sort them by `createTime`
//! 3. stream each referenced video to `<video_dir>/<project_id>/<mediaKey>.mp4`,
//!    one at a time, skipping items that cannot be downloaded
//!
//! ## Quick Start
//!
//! ```no_run
//! use flow_dl::{Config, Session, cookies::load_cookie_file, download_project};
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let cookies = load_cookie_file(Path::new("cookies.json")).await?;
//!     let session = Session::new(&config.api, &cookies, Some("my-project-id"))?;
//!
//!     let report = download_project(&session, &config, "my-project-id").await?;
//!     println!("saved {} videos, skipped {}", report.downloaded.len(), report.skipped.len());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Configuration types
pub mod config;
/// Cookie file loading and normalization
pub mod cookies;
/// Media downloader
pub mod downloader;
/// Error types
pub mod error;
/// Workflow and project listing
pub mod fetcher;
/// Authenticated HTTP session
pub mod session;
/// tRPC request encoding and response decoding
pub mod trpc;
/// Core types
pub mod types;
/// Path helpers
pub mod utils;

// Re-export commonly used types
pub use config::{ApiConfig, Config, DownloadConfig};
pub use cookies::SessionCookies;
pub use downloader::{DownloadOptions, download_project, download_videos, sort_workflows};
pub use error::{CookieError, DownloadError, Error, Result};
pub use fetcher::{fetch_all_projects, fetch_all_workflows};
pub use session::Session;
pub use types::{
    DownloadReport, MediaGeneration, SkippedItem, SortOrder, UserProject, Workflow, WorkflowStep,
};

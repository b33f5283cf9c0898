//! Core types for flow-dl
//!
//! The workflow model mirrors the JSON returned by `project.searchProjectWorkflows`.
//! Fields the server may omit are `Option`s or default to empty collections, so a
//! record missing a media key or video URL still decodes and is skipped later by
//! the downloader instead of failing the whole page.

use crate::error::DownloadError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Placeholder used in logs when a workflow has no id
const UNKNOWN_WORKFLOW: &str = "unknown-workflow";
/// Placeholder used in logs when a step has no id
const UNKNOWN_STEP: &str = "unknown-step";

/// A top-level unit of generated work in a project
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workflow {
    /// Server-assigned workflow id
    #[serde(default)]
    pub workflow_id: Option<String>,
    /// Creation timestamp (ISO-8601), only used for ordering
    #[serde(default)]
    pub create_time: Option<String>,
    /// Steps in server order
    #[serde(default)]
    pub workflow_steps: Vec<WorkflowStep>,
}

impl Workflow {
    /// Workflow id, or a placeholder for logging
    pub fn id(&self) -> &str {
        self.workflow_id.as_deref().unwrap_or(UNKNOWN_WORKFLOW)
    }

    /// Sort key; a missing `createTime` sorts before every timestamp
    pub fn create_time(&self) -> &str {
        self.create_time.as_deref().unwrap_or("")
    }

    /// Total number of media generations across all steps
    pub fn media_count(&self) -> usize {
        self.workflow_steps
            .iter()
            .map(|s| s.media_generations.len())
            .sum()
    }
}

/// A stage within a workflow
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowStep {
    /// Server-assigned step id
    #[serde(default)]
    pub workflow_step_id: Option<String>,
    /// Media produced by this step
    #[serde(default)]
    pub media_generations: Vec<MediaGeneration>,
}

impl WorkflowStep {
    /// Step id, or a placeholder for logging
    pub fn id(&self) -> &str {
        self.workflow_step_id.as_deref().unwrap_or(UNKNOWN_STEP)
    }
}

/// A single generated media artifact
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaGeneration {
    /// Identity block holding the media key
    #[serde(default)]
    pub media_generation_id: Option<MediaGenerationId>,
    /// Payload block holding the video URL
    #[serde(default)]
    pub media_data: Option<MediaData>,
}

impl MediaGeneration {
    /// Media key used as the output file stem; empty keys count as absent
    pub fn media_key(&self) -> Option<&str> {
        self.media_generation_id
            .as_ref()
            .and_then(|id| id.media_key.as_deref())
            .filter(|key| !key.is_empty())
    }

    /// URL the video bytes can be streamed from; empty URLs count as absent
    pub fn video_url(&self) -> Option<&str> {
        self.media_data
            .as_ref()
            .and_then(|data| data.video_data.as_ref())
            .and_then(|video| video.fife_uri.as_deref())
            .filter(|url| !url.is_empty())
    }
}

/// `mediaGenerationId` object
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaGenerationId {
    /// Unique key of the artifact
    #[serde(default)]
    pub media_key: Option<String>,
    /// Media type reported by the server (e.g. "MEDIA_TYPE_VIDEO")
    #[serde(default)]
    pub media_type: Option<String>,
}

/// `mediaData` object
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaData {
    /// Present for video generations
    #[serde(default)]
    pub video_data: Option<VideoData>,
}

/// `mediaData.videoData` object
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoData {
    /// Fetchable URL of the video bytes
    #[serde(default)]
    pub fife_uri: Option<String>,
    /// Base URI of the serving host
    #[serde(default)]
    pub serving_base_uri: Option<String>,
}

/// One page of `project.searchProjectWorkflows`
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowPage {
    /// Workflows on this page
    #[serde(default)]
    pub workflows: Vec<Workflow>,
    /// Cursor for the next page; absent or empty on the last page
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// A project owned by the signed-in user
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProject {
    /// Project id, as accepted by the workflow fetcher
    pub project_id: String,
    /// Display information
    #[serde(default)]
    pub project_info: Option<ProjectInfo>,
    /// Creation timestamp
    #[serde(default)]
    pub creation_time: Option<String>,
}

impl UserProject {
    /// Project title, empty if the server sent none
    pub fn title(&self) -> &str {
        self.project_info
            .as_ref()
            .map(|info| info.project_title.as_str())
            .unwrap_or("")
    }
}

/// `projectInfo` object
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInfo {
    /// Human-readable title
    #[serde(default)]
    pub project_title: String,
}

/// One page of `project.searchUserProjects`
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPage {
    /// Projects on this page
    #[serde(default)]
    pub projects: Vec<UserProject>,
    /// Cursor for the next page
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// Ordering of workflows by `createTime`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Oldest first
    #[default]
    Asc,
    /// Newest first
    Desc,
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortOrder::Asc => write!(f, "asc"),
            SortOrder::Desc => write!(f, "desc"),
        }
    }
}

/// A media generation that was not downloaded
#[derive(Debug)]
pub struct SkippedItem {
    /// Owning workflow id
    pub workflow_id: String,
    /// Owning step id
    pub step_id: String,
    /// Media key, when the generation had one
    pub media_key: Option<String>,
    /// Why it was skipped
    pub reason: DownloadError,
}

/// Outcome of a [`download_videos`](crate::downloader::download_videos) run
#[derive(Debug, Default)]
pub struct DownloadReport {
    /// Files written, in download order
    pub downloaded: Vec<PathBuf>,
    /// Items skipped, in traversal order
    pub skipped: Vec<SkippedItem>,
    /// Whether traversal stopped early because the limit was reached
    pub limit_reached: bool,
}

//! Media downloader
//!
//! Walks workflows → steps → media generations in order and streams each video
//! to `<dir>/<mediaKey>.mp4`. Per-item problems (missing key, missing URL, HTTP
//! error, broken stream) skip that item only; local disk failures abort.

use crate::config::{Config, DownloadConfig};
use crate::error::{DownloadError, Error, Result};
use crate::fetcher::fetch_all_workflows;
use crate::session::Session;
use crate::types::{DownloadReport, MediaGeneration, SkippedItem, SortOrder, Workflow};
use crate::utils::is_safe_path_component;
use futures::StreamExt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::AsyncWriteExt;

/// Extension of every downloaded file
const VIDEO_EXTENSION: &str = "mp4";

/// Per-run download settings
#[derive(Clone, Copy, Debug)]
pub struct DownloadOptions {
    /// Stop once this many videos were saved (None = no limit)
    pub limit: Option<usize>,
    /// How long to wait for a video's response headers
    pub timeout: Duration,
}

impl From<&DownloadConfig> for DownloadOptions {
    fn from(config: &DownloadConfig) -> Self {
        Self {
            limit: config.limit,
            timeout: config.download_timeout,
        }
    }
}

/// Stable sort of workflows by `createTime`
///
/// Workflows with equal timestamps keep their delivery order in both directions.
pub fn sort_workflows(workflows: &mut [Workflow], order: SortOrder) {
    match order {
        SortOrder::Asc => workflows.sort_by(|a, b| a.create_time().cmp(b.create_time())),
        SortOrder::Desc => workflows.sort_by(|a, b| b.create_time().cmp(a.create_time())),
    }
}

/// Output path of a media key: `<dir>/<media_key>.mp4`
pub fn video_path(dir: &Path, media_key: &str) -> PathBuf {
    dir.join(format!("{media_key}.{VIDEO_EXTENSION}"))
}

/// Download every video referenced by `workflows` into `dir`
///
/// `dir` is created (with parents) if needed. Items are processed strictly in
/// nested order; the limit is checked before each item and only successful
/// downloads count toward it. Existing files with the same name are overwritten.
///
/// # Errors
///
/// Only local I/O failures (creating `dir`, creating or writing a file) are
/// returned. Everything else is recorded in [`DownloadReport::skipped`].
pub async fn download_videos(
    session: &Session,
    workflows: &[Workflow],
    dir: &Path,
    options: DownloadOptions,
) -> Result<DownloadReport> {
    tokio::fs::create_dir_all(dir).await?;

    let mut report = DownloadReport::default();

    for workflow in workflows {
        for step in &workflow.workflow_steps {
            for generation in &step.media_generations {
                if let Some(limit) = options.limit
                    && report.downloaded.len() >= limit
                {
                    tracing::info!(limit, "download limit reached");
                    report.limit_reached = true;
                    return Ok(report);
                }

                match download_generation(session, generation, workflow, step.id(), dir, options)
                    .await?
                {
                    Ok(path) => report.downloaded.push(path),
                    Err(reason) => {
                        tracing::warn!(
                            workflow_id = workflow.id(),
                            step_id = step.id(),
                            error = %reason,
                            "skipping media generation"
                        );
                        report.skipped.push(SkippedItem {
                            workflow_id: workflow.id().to_string(),
                            step_id: step.id().to_string(),
                            media_key: generation.media_key().map(str::to_string),
                            reason,
                        });
                    }
                }
            }
        }
    }

    Ok(report)
}

// Outer error aborts the run; inner error skips this item.
async fn download_generation(
    session: &Session,
    generation: &MediaGeneration,
    workflow: &Workflow,
    step_id: &str,
    dir: &Path,
    options: DownloadOptions,
) -> Result<std::result::Result<PathBuf, DownloadError>> {
    let Some(media_key) = generation.media_key() else {
        return Ok(Err(DownloadError::MissingMediaKey {
            workflow_id: workflow.id().to_string(),
            step_id: step_id.to_string(),
        }));
    };
    // Keys come from the server; one that could escape `dir` is never used as a path.
    if !is_safe_path_component(media_key) {
        return Ok(Err(DownloadError::UnsafeMediaKey {
            media_key: media_key.to_string(),
        }));
    }
    let Some(url) = generation.video_url() else {
        return Ok(Err(DownloadError::MissingVideoUrl {
            media_key: media_key.to_string(),
        }));
    };

    let path = video_path(dir, media_key);
    tracing::info!(media_key, path = %path.display(), "downloading video");

    let outcome = download_video(session, url, &path, media_key, options.timeout).await?;
    Ok(outcome.map(|bytes| {
        tracing::info!(media_key, bytes, path = %path.display(), "saved video");
        path
    }))
}

/// Stream one video to `path`, returning the number of bytes written
///
/// `timeout` bounds the wait for the response headers only. The body is written
/// chunk by chunk as it arrives. If the stream breaks off,
/// the partial file is removed and [`DownloadError::Interrupted`] is returned
/// as a skip.
pub async fn download_video(
    session: &Session,
    url: &str,
    path: &Path,
    media_key: &str,
    timeout: Duration,
) -> Result<std::result::Result<u64, DownloadError>> {
    // Only the wait for response headers is bounded; a large body may take
    // as long as it needs once it is flowing.
    let response = match tokio::time::timeout(timeout, session.client().get(url).send()).await {
        Ok(Ok(response)) => response,
        Ok(Err(source)) => {
            return Ok(Err(DownloadError::Request {
                media_key: media_key.to_string(),
                source,
            }));
        }
        Err(_) => {
            return Ok(Err(DownloadError::Timeout {
                media_key: media_key.to_string(),
                timeout,
            }));
        }
    };

    let status = response.status();
    if !status.is_success() {
        return Ok(Err(DownloadError::HttpStatus {
            media_key: media_key.to_string(),
            status: status.as_u16(),
        }));
    }

    let mut file = tokio::fs::File::create(path).await?;
    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(source) => {
                drop(file);
                remove_partial(path).await;
                return Ok(Err(DownloadError::Interrupted {
                    media_key: media_key.to_string(),
                    bytes_written,
                    source,
                }));
            }
        };
        if let Err(e) = file.write_all(&chunk).await {
            drop(file);
            remove_partial(path).await;
            return Err(Error::Io(e));
        }
        bytes_written += chunk.len() as u64;
    }

    file.flush().await?;
    Ok(Ok(bytes_written))
}

async fn remove_partial(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        tracing::warn!(path = %path.display(), error = %e, "failed to remove partial file");
    }
}

/// Fetch, sort and download every video of `project_id`
///
/// Videos land in `<video_dir>/<project_id>/`.
pub async fn download_project(
    session: &Session,
    config: &Config,
    project_id: &str,
) -> Result<DownloadReport> {
    let dir = config.project_dir(project_id)?;
    let mut workflows = fetch_all_workflows(session, project_id, config.api.page_size).await?;
    sort_workflows(&mut workflows, config.download.order);
    tracing::info!(
        count = workflows.len(),
        media = workflows.iter().map(Workflow::media_count).sum::<usize>(),
        order = %config.download.order,
        "sorted workflows by createTime"
    );

    download_videos(session, &workflows, &dir, DownloadOptions::from(&config.download)).await
}

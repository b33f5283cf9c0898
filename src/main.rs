use clap::{Parser, ValueEnum};
use flow_dl::config::default_video_dir;
use flow_dl::cookies::load_cookie_file;
use flow_dl::{
    Config, DownloadReport, Error, Result, Session, SortOrder, download_project,
    fetch_all_projects,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
enum Order {
    /// Oldest first
    Asc,
    /// Newest first
    Desc,
}

impl From<Order> for SortOrder {
    fn from(order: Order) -> Self {
        match order {
            Order::Asc => SortOrder::Asc,
            Order::Desc => SortOrder::Desc,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Download every video of a Flow project", long_about = None)]
struct Cli {
    /// Id of the project whose videos should be downloaded
    #[arg(required_unless_present = "list_projects")]
    project_id: Option<String>,

    /// JSON cookie file exported from the browser
    #[arg(short, long, value_name = "FILE")]
    cookie_file: PathBuf,

    /// Directory to save videos in (default: ~/Downloads)
    #[arg(short = 'd', long, value_name = "DIR")]
    video_dir: Option<PathBuf>,

    /// Only download the first N videos
    #[arg(short, long, value_name = "N")]
    limit: Option<usize>,

    /// Process workflows by createTime, oldest (asc) or newest (desc) first
    #[arg(short, long, value_enum, default_value_t = Order::Asc)]
    order: Order,

    /// Workflows requested per API page
    #[arg(long, default_value_t = 3, value_name = "N")]
    page_size: u32,

    /// List the account's projects and exit
    #[arg(long)]
    list_projects: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn resolve_video_dir(video_dir: Option<PathBuf>) -> Result<PathBuf> {
    match video_dir {
        Some(dir) => {
            let is_dir = tokio::fs::metadata(&dir)
                .await
                .map(|m| m.is_dir())
                .unwrap_or(false);
            if !is_dir {
                return Err(Error::config(
                    "video_dir",
                    format!("directory '{}' does not exist", dir.display()),
                ));
            }
            Ok(dir)
        }
        None => {
            let dir = default_video_dir();
            tokio::fs::create_dir_all(&dir).await?;
            Ok(dir)
        }
    }
}

fn print_report(report: &DownloadReport) {
    println!(
        "Downloaded {} video(s), skipped {}{}.",
        report.downloaded.len(),
        report.skipped.len(),
        if report.limit_reached { " (limit reached)" } else { "" }
    );
    for item in &report.skipped {
        println!(
            "  skipped {}/{} {}: {}",
            item.workflow_id,
            item.step_id,
            item.media_key.as_deref().unwrap_or("-"),
            item.reason
        );
    }
}

async fn run(cli: Cli) -> Result<()> {
    let cookies = load_cookie_file(&cli.cookie_file).await?;

    let mut config = Config::default();
    config.api.page_size = cli.page_size;
    config.download.limit = cli.limit;
    config.download.order = cli.order.into();

    if cli.list_projects {
        config.validate()?;
        let session = Session::new(&config.api, &cookies, None)?;
        let projects = fetch_all_projects(&session, config.api.project_page_size).await?;
        for project in &projects {
            println!(
                "{}\t{}\t{}",
                project.project_id,
                project.creation_time.as_deref().unwrap_or("-"),
                project.title()
            );
        }
        return Ok(());
    }

    let Some(project_id) = cli.project_id else {
        return Err(Error::config("project_id", "a project id is required"));
    };

    config.download.video_dir = resolve_video_dir(cli.video_dir).await?;
    config.validate()?;

    tracing::info!(project_id = %project_id, video_dir = %config.download.video_dir.display(), "starting download");

    let session = Session::new(&config.api, &cookies, Some(&project_id))?;
    let report = download_project(&session, &config, &project_id).await?;
    print_report(&report);
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "run aborted");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

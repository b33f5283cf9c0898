//! Test configuration helpers pointing flow-dl at a wiremock server

use flow_dl::config::{ApiConfig, Config, DownloadConfig};
use flow_dl::{Session, SessionCookies};
use std::path::Path;
use std::time::Duration;
use wiremock::MockServer;

/// Path prefix the mock API is mounted under
pub const API_PREFIX: &str = "/fx/api/trpc";

/// Project id used throughout the tests
pub const PROJECT_ID: &str = "proj1";

/// Cookie header every API request must carry
pub const COOKIE_HEADER: &str = "SID=abc; token=xyz";

/// Cookies matching [`COOKIE_HEADER`]
pub fn test_cookies() -> SessionCookies {
    SessionCookies::from_json(r#"[{"name": "SID", "value": "abc"}, {"name": "token", "value": "xyz"}]"#)
        .unwrap_or_default()
}

/// Config whose API lives on `server` and whose videos land in `video_dir`
pub fn test_config(server: &MockServer, video_dir: &Path) -> Config {
    Config {
        api: ApiConfig {
            base_url: format!("{}{}", server.uri(), API_PREFIX),
            flow_page_url: format!("{}/fx/vi/tools/flow", server.uri()),
            request_timeout: Duration::from_secs(5),
            ..Default::default()
        },
        download: DownloadConfig {
            video_dir: video_dir.to_path_buf(),
            download_timeout: Duration::from_secs(5),
            ..Default::default()
        },
    }
}

/// Session for [`PROJECT_ID`] against `config`
pub fn test_session(config: &Config) -> Session {
    match Session::new(&config.api, &test_cookies(), Some(PROJECT_ID)) {
        Ok(session) => session,
        Err(e) => panic!("failed to build test session: {e}"),
    }
}

/// Full path of a tRPC procedure on the mock server
pub fn procedure_path(procedure: &str) -> String {
    format!("{API_PREFIX}/{procedure}")
}

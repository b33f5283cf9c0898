//! Authenticated HTTP session shared by the fetcher and the downloader

use crate::config::ApiConfig;
use crate::cookies::SessionCookies;
use crate::error::{Error, Result};
use reqwest::header::{ACCEPT, CONTENT_TYPE, COOKIE, HeaderMap, HeaderValue, ORIGIN, REFERER};
use std::time::Duration;

/// One HTTP client plus the headers every API call carries
///
/// Built once per run and passed by reference; nothing mutates it afterwards.
/// The cookie, referer and origin headers are attached only to tRPC calls, so
/// video hosts never receive the account cookies.
#[derive(Clone, Debug)]
pub struct Session {
    client: reqwest::Client,
    base_url: String,
    api_headers: HeaderMap,
    tool_name: String,
    request_timeout: Duration,
}

impl Session {
    /// Build a session for `project_id`, or for account-wide calls when `None`
    ///
    /// # Errors
    ///
    /// [`Error::Cookie`] if a cookie cannot be sent as a header,
    /// [`Error::Config`] if the configured URLs or project id are unusable,
    /// [`Error::Network`] if the HTTP client cannot be constructed.
    pub fn new(
        api: &ApiConfig,
        cookies: &SessionCookies,
        project_id: Option<&str>,
    ) -> Result<Self> {
        let flow_page = url::Url::parse(&api.flow_page_url).map_err(|e| {
            Error::config(
                "api.flow_page_url",
                format!("invalid flow page URL '{}': {}", api.flow_page_url, e),
            )
        })?;

        let referer = referer_url(&api.flow_page_url, project_id);
        let mut api_headers = HeaderMap::new();
        api_headers.insert(
            REFERER,
            HeaderValue::from_str(&referer).map_err(|_| {
                Error::config("project_id", format!("project id cannot be used in a URL: {referer}"))
            })?,
        );
        if let Ok(origin) = HeaderValue::from_str(&flow_page.origin().ascii_serialization()) {
            api_headers.insert(ORIGIN, origin);
        }
        api_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        api_headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
        if !cookies.is_empty() {
            api_headers.insert(COOKIE, cookies.header_value()?);
        }

        let client = reqwest::Client::builder()
            .user_agent(api.user_agent.as_str())
            .connect_timeout(api.request_timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: api.base_url.trim_end_matches('/').to_string(),
            api_headers,
            tool_name: api.tool_name.clone(),
            request_timeout: api.request_timeout,
        })
    }

    /// Underlying HTTP client
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Headers attached to every tRPC call
    pub fn api_headers(&self) -> &HeaderMap {
        &self.api_headers
    }

    /// Full URL of a tRPC procedure
    pub fn endpoint(&self, procedure: &str) -> String {
        format!("{}/{}", self.base_url, procedure)
    }

    /// Tool identifier sent in search payloads
    pub fn tool_name(&self) -> &str {
        &self.tool_name
    }

    /// Timeout applied to each API request
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }
}

/// Referer the web app sends from a project page
///
/// # Examples
///
/// ```
/// use flow_dl::session::referer_url;
///
/// assert_eq!(
///     referer_url("https://labs.google/fx/vi/tools/flow", Some("proj1")),
///     "https://labs.google/fx/vi/tools/flow/project/proj1?"
/// );
/// ```
pub fn referer_url(flow_page_url: &str, project_id: Option<&str>) -> String {
    match project_id {
        Some(id) => format!("{}/project/{}?", flow_page_url.trim_end_matches('/'), id),
        None => flow_page_url.to_string(),
    }
}

//! tRPC request encoding and response decoding
//!
//! Queries are sent as `GET <base>/<procedure>?input=<json>`. The `input` JSON is
//! compact (no whitespace) and, on the first page only, carries a `meta` block
//! telling the server that `cursor` is `undefined` rather than a real value.
//! Responses wrap the payload as `result.data.json.result`.

use crate::error::{Error, Result};
use crate::session::Session;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Procedure listing the workflows of one project
pub const SEARCH_PROJECT_WORKFLOWS: &str = "project.searchProjectWorkflows";
/// Procedure listing the projects of the signed-in user
pub const SEARCH_USER_PROJECTS: &str = "project.searchUserProjects";

/// Payload of [`SEARCH_PROJECT_WORKFLOWS`]; field order is part of the wire format
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowQuery<'a> {
    /// Workflows per page
    pub page_size: u32,
    /// Project to list
    pub project_id: &'a str,
    /// Calling tool identifier
    pub tool_name: &'a str,
    /// Encoded cursor, `null` on the first page
    pub cursor: Option<String>,
}

/// Payload of [`SEARCH_USER_PROJECTS`]
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectQuery<'a> {
    /// Projects per page
    pub page_size: u32,
    /// Calling tool identifier
    pub tool_name: &'a str,
    /// Encoded cursor, `null` on the first page
    pub cursor: Option<String>,
}

#[derive(Serialize)]
struct Input<'a, Q> {
    json: &'a Q,
    #[serde(skip_serializing_if = "Option::is_none")]
    meta: Option<Meta>,
}

#[derive(Serialize)]
struct Meta {
    values: MetaValues,
}

#[derive(Serialize)]
struct MetaValues {
    cursor: [&'static str; 1],
}

#[derive(Deserialize)]
struct Envelope<T> {
    result: EnvelopeResult<T>,
}

#[derive(Deserialize)]
struct EnvelopeResult<T> {
    data: EnvelopeData<T>,
}

#[derive(Deserialize)]
struct EnvelopeData<T> {
    json: EnvelopeJson<T>,
}

#[derive(Deserialize)]
struct EnvelopeJson<T> {
    result: T,
}

/// Percent-encode a server cursor before it goes into the payload
///
/// Unreserved characters (`A-Z a-z 0-9 - _ . ~`) are kept, spaces become `+`,
/// everything else is `%XX`.
///
/// # Examples
///
/// ```
/// use flow_dl::trpc::encode_cursor;
///
/// assert_eq!(encode_cursor("CAE=/page 2"), "CAE%3D%2Fpage+2");
/// ```
pub fn encode_cursor(cursor: &str) -> String {
    urlencoding::encode(cursor).replace("%20", "+")
}

/// Serialize the `input` query parameter for one request
///
/// `first_page` adds the `meta` block marking the cursor as undefined.
pub fn encode_input<Q: Serialize>(query: &Q, first_page: bool) -> Result<String> {
    let input = Input {
        json: query,
        meta: first_page.then_some(Meta {
            values: MetaValues {
                cursor: ["undefined"],
            },
        }),
    };
    Ok(serde_json::to_string(&input)?)
}

/// Decode `result.data.json.result` out of a tRPC response body
pub fn decode_result<T: DeserializeOwned>(procedure: &str, body: &str) -> Result<T> {
    serde_json::from_str::<Envelope<T>>(body)
        .map(|envelope| envelope.result.data.json.result)
        .map_err(|e| Error::InvalidResponse {
            endpoint: procedure.to_string(),
            reason: e.to_string(),
        })
}

/// Issue one tRPC query and decode its result
///
/// # Errors
///
/// - [`Error::Network`] if the request fails or times out
/// - [`Error::Api`] on a non-success status
/// - [`Error::InvalidResponse`] if the body does not match the envelope
pub async fn query<T: DeserializeOwned>(
    session: &Session,
    procedure: &str,
    input: &str,
) -> Result<T> {
    let url = session.endpoint(procedure);
    tracing::debug!(procedure, input, "tRPC query");

    let response = session
        .client()
        .get(&url)
        .headers(session.api_headers().clone())
        .query(&[("input", input)])
        .timeout(session.request_timeout())
        .send()
        .await?;

    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(Error::Api {
            endpoint: procedure.to_string(),
            status: status.as_u16(),
            body,
        });
    }

    decode_result(procedure, &body)
}

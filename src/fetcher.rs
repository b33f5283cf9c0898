//! Cursor-paginated listing of workflows and projects
//!
//! Both listings follow the same loop: request a page, append its items, and
//! continue with the returned `nextPageToken` until the server sends none. The
//! cursor is opaque and forwarded unchanged (apart from percent-encoding). There
//! is no page cap and no retry; any failed page aborts the listing.

use crate::error::Result;
use crate::session::Session;
use crate::trpc::{
    self, ProjectQuery, SEARCH_PROJECT_WORKFLOWS, SEARCH_USER_PROJECTS, WorkflowQuery,
};
use crate::types::{ProjectPage, UserProject, Workflow, WorkflowPage};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// A single page of a cursor-paginated listing
pub trait Page: DeserializeOwned {
    /// Item type accumulated across pages
    type Item;

    /// Split into the page's items and the cursor of the next page
    fn into_parts(self) -> (Vec<Self::Item>, Option<String>);
}

impl Page for WorkflowPage {
    type Item = Workflow;

    fn into_parts(self) -> (Vec<Workflow>, Option<String>) {
        (self.workflows, self.next_page_token)
    }
}

impl Page for ProjectPage {
    type Item = UserProject;

    fn into_parts(self) -> (Vec<UserProject>, Option<String>) {
        (self.projects, self.next_page_token)
    }
}

/// Fetch one page of `procedure`
///
/// `cursor` is the raw token from the previous page; `None` requests the first
/// page and adds the undefined-cursor marker.
pub async fn fetch_page<P, Q>(
    session: &Session,
    procedure: &str,
    cursor: Option<&str>,
    build_query: impl Fn(Option<String>) -> Q,
) -> Result<P>
where
    P: Page,
    Q: Serialize,
{
    let query = build_query(cursor.map(trpc::encode_cursor));
    let input = trpc::encode_input(&query, cursor.is_none())?;
    trpc::query(session, procedure, &input).await
}

/// Follow `nextPageToken` until exhaustion, concatenating every page in order
pub async fn fetch_all<P, Q>(
    session: &Session,
    procedure: &str,
    build_query: impl Fn(Option<String>) -> Q,
) -> Result<Vec<P::Item>>
where
    P: Page,
    Q: Serialize,
{
    let mut items = Vec::new();
    let mut cursor: Option<String> = None;
    let mut pages = 0usize;

    loop {
        let page: P = fetch_page(session, procedure, cursor.as_deref(), &build_query).await?;
        let (page_items, next) = page.into_parts();
        pages += 1;
        tracing::debug!(
            procedure,
            page = pages,
            items = page_items.len(),
            has_next = next.as_deref().is_some_and(|t| !t.is_empty()),
            "fetched page"
        );
        items.extend(page_items);

        match next {
            Some(token) if !token.is_empty() => cursor = Some(token),
            _ => break,
        }
    }

    tracing::info!(procedure, pages, total = items.len(), "listing complete");
    Ok(items)
}

/// Fetch every workflow of `project_id`, in server delivery order
///
/// # Errors
///
/// Any network failure, non-success status or malformed envelope on any page
/// aborts the whole listing.
pub async fn fetch_all_workflows(
    session: &Session,
    project_id: &str,
    page_size: u32,
) -> Result<Vec<Workflow>> {
    let tool_name = session.tool_name();
    fetch_all::<WorkflowPage, _>(session, SEARCH_PROJECT_WORKFLOWS, |cursor| WorkflowQuery {
        page_size,
        project_id,
        tool_name,
        cursor,
    })
    .await
}

/// Fetch every project visible to the signed-in user
pub async fn fetch_all_projects(session: &Session, page_size: u32) -> Result<Vec<UserProject>> {
    let tool_name = session.tool_name();
    fetch_all::<ProjectPage, _>(session, SEARCH_USER_PROJECTS, |cursor| ProjectQuery {
        page_size,
        tool_name,
        cursor,
    })
    .await
}

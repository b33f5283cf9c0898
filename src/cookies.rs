//! Cookie file loading and normalization
//!
//! Browser export tools write cookies in several JSON layouts. All of them are
//! normalized into one [`SessionCookies`] set:
//!
//! - a list of objects with `name` and `value` (extra fields such as `domain`
//!   or `expirationDate` are ignored)
//! - a flat object mapping cookie names to values
//! - a wrapper object whose `cookies` key holds either of the above

use crate::error::CookieError;
use reqwest::header::HeaderValue;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Deserialize)]
struct CookiePair {
    name: String,
    value: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CookieEntries {
    List(Vec<CookiePair>),
    Map(BTreeMap<String, String>),
}

// Variant order matters: a wrapper only matches when `cookies` holds a list or
// an object, so a flat mapping that happens to contain a "cookies" string
// still falls through to `Flat`.
#[derive(Deserialize)]
#[serde(untagged)]
enum CookieFile {
    List(Vec<CookiePair>),
    Wrapped { cookies: CookieEntries },
    Flat(BTreeMap<String, String>),
}

impl From<CookieFile> for CookieEntries {
    fn from(file: CookieFile) -> Self {
        match file {
            CookieFile::List(list) => CookieEntries::List(list),
            CookieFile::Wrapped { cookies } => cookies,
            CookieFile::Flat(map) => CookieEntries::Map(map),
        }
    }
}

/// Normalized set of session cookies
///
/// Setting a name that is already present replaces its value. Iteration and
/// the rendered `Cookie` header are ordered by name, so equivalent inputs in
/// different layouts produce identical sets.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionCookies {
    cookies: BTreeMap<String, String>,
}

impl SessionCookies {
    /// Empty cookie set
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the JSON content of a cookie file
    ///
    /// # Errors
    ///
    /// [`CookieError::Json`] if the text is not JSON, [`CookieError::UnsupportedShape`]
    /// if it is JSON in none of the accepted layouts.
    pub fn from_json(content: &str) -> Result<Self, CookieError> {
        let value: serde_json::Value = serde_json::from_str(content).map_err(CookieError::Json)?;
        let file = CookieFile::deserialize(value).map_err(|_| CookieError::UnsupportedShape)?;

        let mut cookies = Self::new();
        match CookieEntries::from(file) {
            CookieEntries::List(list) => {
                for pair in list {
                    cookies.set(pair.name, pair.value);
                }
            }
            CookieEntries::Map(map) => {
                for (name, value) in map {
                    cookies.set(name, value);
                }
            }
        }
        Ok(cookies)
    }

    /// Insert or replace a cookie
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.cookies.insert(name.into(), value.into());
    }

    /// Value of a cookie by name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    /// Number of cookies
    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    /// True when no cookies are set
    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    /// Iterate `(name, value)` pairs in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cookies.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Render as a `Cookie` header value: `a=1; b=2`
    pub fn to_header_string(&self) -> String {
        self.iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Render as a sensitive `Cookie` header value
    ///
    /// # Errors
    ///
    /// [`CookieError::InvalidHeaderValue`] naming the first cookie that contains
    /// bytes not allowed in a header.
    pub fn header_value(&self) -> Result<HeaderValue, CookieError> {
        for (name, value) in self.iter() {
            if HeaderValue::from_str(&format!("{name}={value}")).is_err() {
                return Err(CookieError::InvalidHeaderValue {
                    name: name.to_string(),
                });
            }
        }
        let mut header = HeaderValue::from_str(&self.to_header_string()).map_err(|_| {
            CookieError::InvalidHeaderValue {
                name: String::new(),
            }
        })?;
        header.set_sensitive(true);
        Ok(header)
    }
}

/// Read and normalize a cookie file
///
/// # Errors
///
/// [`CookieError::NotFound`] if `path` is not a regular file, [`CookieError::Read`]
/// if it cannot be read, plus everything [`SessionCookies::from_json`] returns.
pub async fn load_cookie_file(path: &Path) -> Result<SessionCookies, CookieError> {
    let is_file = tokio::fs::metadata(path)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false);
    if !is_file {
        return Err(CookieError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CookieError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    let cookies = SessionCookies::from_json(&content)?;
    tracing::debug!(path = %path.display(), count = cookies.len(), "loaded cookies");
    Ok(cookies)
}

//! Path helpers for names that come from the command line or the server

/// Check that `name` is a single, relative path component
///
/// Rejects empty names, `.` and `..`, and anything containing a path separator,
/// a drive colon or NUL, so joining it onto a directory can never leave that
/// directory or replace it with an absolute path.
///
/// # Examples
///
/// ```
/// use flow_dl::utils::is_safe_path_component;
///
/// assert!(is_safe_path_component("abc123"));
/// assert!(!is_safe_path_component("../etc"));
/// assert!(!is_safe_path_component("/tmp"));
/// ```
#[must_use]
pub fn is_safe_path_component(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\', ':', '\0'])
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_names() {
        assert!(is_safe_path_component("abc123"));
        assert!(is_safe_path_component("CAUSJGI3..x"));
        assert!(is_safe_path_component("0b5c1f6e-8d7a-4f1e-9c2b-2f0d3e4a5b6c"));
    }

    #[test]
    fn rejects_names_that_escape_the_directory() {
        for name in ["", ".", "..", "../etc/passwd", "/abs", "a\\b", "C:evil", "nul\0byte"] {
            assert!(!is_safe_path_component(name), "{name:?} should be rejected");
        }
    }
}

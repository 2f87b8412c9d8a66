//! Hierarchical resource key handling.
//!
//! Keys are `/`-separated paths such as `about/team`. Every key that enters a
//! project or workspace goes through [`normalize_key`] first, so stored keys
//! never carry leading or trailing separators or empty segments.

use once_cell::sync::Lazy;
use regex::Regex;

/// Key separator.
pub const SEPARATOR: char = '/';

// Runs of forward or backward slashes collapse into one separator.
static SEPARATOR_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\\/]+").unwrap());

/// Normalize a resource or project key.
///
/// Collapses runs of `/` and `\` into a single `/`, then strips one leading
/// separator and one trailing separator. A lone `/` normalizes to the empty
/// root key. The function is idempotent.
pub fn normalize_key(key: &str) -> String {
    if key.is_empty() {
        return String::new();
    }
    let collapsed = SEPARATOR_RUNS.replace_all(key, "/");
    let mut key: &str = &collapsed;
    if let Some(stripped) = key.strip_prefix(SEPARATOR) {
        key = stripped;
    }
    if key.len() > 1 {
        if let Some(stripped) = key.strip_suffix(SEPARATOR) {
            key = stripped;
        }
    }
    key.to_string()
}

/// Return the parent of a normalized key, or `None` for a single-segment key.
pub fn parent_key(key: &str) -> Option<&str> {
    key.rfind(SEPARATOR).map(|pos| &key[..pos])
}

/// Check whether `key` sits exactly one path segment below `prefix`.
///
/// Both arguments must already be normalized. With the empty root prefix,
/// every non-empty single-segment key is a direct child.
pub fn is_direct_child(prefix: &str, key: &str) -> bool {
    let rest = if prefix.is_empty() {
        key
    } else {
        match key
            .strip_prefix(prefix)
            .and_then(|rest| rest.strip_prefix(SEPARATOR))
        {
            Some(rest) => rest,
            None => return false,
        }
    };
    !rest.is_empty() && !rest.contains(SEPARATOR)
}

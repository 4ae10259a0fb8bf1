//! Pagination and ordering helpers for list endpoints.
//!
//! Ordering parameters come straight from the query string, so they are
//! matched against a per-resource whitelist and turned into a fixed SQL
//! fragment; user input never reaches the query text.

// ---------------------------------------------------------------------------
// Pagination defaults
// ---------------------------------------------------------------------------

/// Default number of list results per page.
pub const DEFAULT_PAGE_LIMIT: i64 = 20;

/// Maximum number of list results per page.
pub const MAX_PAGE_LIMIT: i64 = 100;

/// Clamp a user-provided limit to `[1, max]`, defaulting when absent.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

// ---------------------------------------------------------------------------
// Ordering
// ---------------------------------------------------------------------------

/// A whitelisted `ORDER BY` clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ordering {
    pub column: &'static str,
    pub descending: bool,
}

impl Ordering {
    pub const fn desc(column: &'static str) -> Self {
        Self {
            column,
            descending: true,
        }
    }

    /// Parse `field` / `-field` against `allowed` (bare column names).
    ///
    /// Unknown or absent values fall back to `default`.
    pub fn parse(raw: Option<&str>, allowed: &[&'static str], default: Ordering) -> Ordering {
        let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
            return default;
        };
        let (name, descending) = match raw.strip_prefix('-') {
            Some(rest) => (rest, true),
            None => (raw, false),
        };
        allowed
            .iter()
            .copied()
            .find(|col| *col == name)
            .map(|column| Ordering { column, descending })
            .unwrap_or(default)
    }

    /// Render as SQL, qualified with `alias`. `id` breaks ties in the same direction.
    pub fn to_sql(&self, alias: &str) -> String {
        let dir = if self.descending { "DESC" } else { "ASC" };
        format!("{alias}.{} {dir}, {alias}.id {dir}", self.column)
    }
}

/// Escape `%`, `_` and `\` so user text is matched literally by `ILIKE`.
pub fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

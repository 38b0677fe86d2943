//! Statement text normalization and table reference extraction.
//!
//! This is a token heuristic, not a SQL parser. Only the first token after
//! each `FROM`/`JOIN` is taken, so tables inside nested subqueries and derived
//! tables are not reported.

use crate::utils::config::RESERVED_CLAUSE_KEYWORDS;
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

static LINE_COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)--.*$").expect("valid line comment regex"));

static BLOCK_COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").expect("valid block comment regex"));

static FROM_JOIN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s+(?:FROM|JOIN)\s+").expect("valid FROM/JOIN regex"));

/// Strip comments and collapse whitespace in a statement
///
/// **Public** - used before table extraction and by callers that want a
/// comparable form of the statement text
///
/// Line comments (`--` to end of line) are removed first, then block
/// comments (`/* ... */`, possibly spanning lines). Whitespace runs become a
/// single space and the ends are trimmed.
pub fn normalize_statement(statement: &str) -> String {
    if statement.is_empty() {
        return String::new();
    }

    let without_lines = LINE_COMMENT_RE.replace_all(statement, "");
    let without_blocks = BLOCK_COMMENT_RE.replace_all(&without_lines, "");

    without_blocks.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Extract the uppercase table names referenced by a statement
///
/// **Public** - main entry point for table extraction
///
/// Accepts raw or already-normalized text; comments are always stripped
/// before splitting, so a commented-out `FROM` clause never counts.
///
/// # Example
/// ```ignore
/// let tables = extract_tables("SELECT * FROM Orders o JOIN Customers c ON o.cid = c.id");
/// assert!(tables.contains("ORDERS") && tables.contains("CUSTOMERS"));
/// ```
pub fn extract_tables(statement: &str) -> BTreeSet<String> {
    let normalized = normalize_statement(statement);
    if normalized.is_empty() {
        return BTreeSet::new();
    }

    let upper = normalized.to_uppercase();

    // The segment before the first FROM/JOIN is the select list
    FROM_JOIN_RE
        .split(&upper)
        .skip(1)
        .filter_map(first_table_token)
        .collect()
}

/// Take the table name candidate at the start of a post-FROM/JOIN segment
///
/// **Private** - internal helper for extract_tables
fn first_table_token(segment: &str) -> Option<String> {
    let token = segment.split_whitespace().next()?;
    let name = token.trim_matches(|c: char| c == '(' || c == ')');

    if name.is_empty() || RESERVED_CLAUSE_KEYWORDS.contains(&name) {
        None
    } else {
        Some(name.to_string())
    }
}

/// Uppercased first word of a statement (`SELECT`, `INSERT`, ...)
///
/// Returns `None` for empty or whitespace-only text.
pub fn statement_type(statement: &str) -> Option<String> {
    statement
        .split_whitespace()
        .next()
        .map(|word| word.to_uppercase())
}

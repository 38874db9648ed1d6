//! Cursor pagination over list results.
//!
//! Cursors are opaque base64 strings of `arrayconnection:<offset>`, the
//! format used by relay array connections, so clients that already page
//! through relay-style APIs keep working.

use {
    async_graphql::dynamic::TypeRef,
    base64::{Engine, engine::general_purpose::STANDARD},
    serde_json::{Map, Value},
};

use crate::{error::Error, types::Output};

const CURSOR_PREFIX: &str = "arrayconnection:";

/// Arguments accepted by every list-typed field, with their graph types.
pub const PAGINATION_ARGS: [(&str, &str); 4] = [
    ("first", TypeRef::INT),
    ("after", TypeRef::STRING),
    ("last", TypeRef::INT),
    ("before", TypeRef::STRING),
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaginationArgs {
    pub first: Option<usize>,
    pub after: Option<String>,
    pub last: Option<usize>,
    pub before: Option<String>,
}

impl PaginationArgs {
    /// Read pagination arguments out of a field's incoming arguments.
    pub fn from_args(args: &Map<String, Value>) -> Result<Self, Error> {
        Ok(Self {
            first: count(args, "first")?,
            after: cursor(args, "after"),
            last: count(args, "last")?,
            before: cursor(args, "before"),
        })
    }
}

fn count(args: &Map<String, Value>, name: &'static str) -> Result<Option<usize>, Error> {
    match args.get(name).and_then(Value::as_i64) {
        None => Ok(None),
        Some(n) => usize::try_from(n)
            .map(Some)
            .map_err(|_| Error::Pagination { argument: name }),
    }
}

fn cursor(args: &Map<String, Value>, name: &str) -> Option<String> {
    args.get(name).and_then(Value::as_str).map(str::to_owned)
}

#[derive(Debug, Clone)]
pub struct Edge {
    pub cursor: String,
    pub node: Output,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageInfo {
    pub has_next_page: bool,
    pub has_previous_page: bool,
    pub start_cursor: Option<String>,
    pub end_cursor: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Connection {
    pub edges: Vec<Edge>,
    pub page_info: PageInfo,
}

pub fn offset_to_cursor(offset: usize) -> String {
    STANDARD.encode(format!("{CURSOR_PREFIX}{offset}"))
}

pub fn cursor_to_offset(cursor: &str) -> Option<usize> {
    let decoded = STANDARD.decode(cursor).ok()?;
    let text = std::str::from_utf8(&decoded).ok()?;
    text.strip_prefix(CURSOR_PREFIX)?.parse().ok()
}

/// Page a complete list. Unparseable cursors are ignored.
pub fn connection_from_array(items: Vec<Output>, args: &PaginationArgs) -> Connection {
    let len = items.len();
    let after = args.after.as_deref().and_then(cursor_to_offset);
    let before = args.before.as_deref().and_then(cursor_to_offset);

    let mut start = after.map_or(0, |offset| offset.saturating_add(1));
    let mut end = before.map_or(len, |offset| offset.min(len));
    if let Some(first) = args.first {
        end = end.min(start.saturating_add(first));
    }
    if let Some(last) = args.last {
        start = start.max(end.saturating_sub(last));
    }

    let edges: Vec<Edge> = items
        .into_iter()
        .enumerate()
        .skip(start)
        .take(end.saturating_sub(start))
        .map(|(offset, node)| Edge {
            cursor: offset_to_cursor(offset),
            node,
        })
        .collect();

    let lower = after.map_or(0, |offset| offset.saturating_add(1));
    let upper = before.unwrap_or(len);
    let page_info = PageInfo {
        has_next_page: args.first.is_some() && end < upper,
        has_previous_page: args.last.is_some() && start > lower,
        start_cursor: edges.first().map(|e| e.cursor.clone()),
        end_cursor: edges.last().map(|e| e.cursor.clone()),
    };

    Connection { edges, page_info }
}

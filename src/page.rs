use serde::{Deserialize, Serialize};

use crate::errors::StoreError;

pub const DEFAULT_PAGE_SIZE: u64 = 25;
pub const MAX_PAGE_SIZE: u64 = 100;

/// Cursor-based forward pagination request.
///
/// The cursor is the opaque `continue_cursor` returned by a previous page;
/// `None` starts from the beginning of the index.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageRequest {
    #[serde(default)]
    pub cursor: Option<String>,
    #[serde(default)]
    pub num_items: Option<u64>,
}

impl PageRequest {
    pub fn first(num_items: u64) -> Self {
        Self {
            cursor: None,
            num_items: Some(num_items),
        }
    }

    pub fn after(cursor: impl Into<String>, num_items: u64) -> Self {
        Self {
            cursor: Some(cursor.into()),
            num_items: Some(num_items),
        }
    }

    pub fn limit(&self) -> u64 {
        self.num_items.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
    }

    /// Rank offset encoded by the cursor; zero for the first page.
    pub fn offset(&self) -> Result<u64, StoreError> {
        match &self.cursor {
            None => Ok(0),
            Some(raw) => decode_cursor(raw),
        }
    }
}

/// Load status reported alongside a page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageStatus {
    /// First page is still being fetched (client-side only).
    LoadingFirstPage,
    /// A follow-up page is still being fetched (client-side only).
    LoadingMore,
    /// More results exist past `continue_cursor`.
    CanLoadMore,
    /// The index has been fully consumed.
    Exhausted,
}

/// One page of results plus the continuation cursor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub page: Vec<T>,
    pub is_done: bool,
    pub continue_cursor: String,
    pub status: PageStatus,
}

impl<T> Page<T> {
    /// Builds a page from the items at `offset`, given the total index size.
    pub fn from_slice(items: Vec<T>, offset: u64, total: u64) -> Self {
        let consumed = offset + items.len() as u64;
        let is_done = consumed >= total;
        Self {
            page: items,
            is_done,
            continue_cursor: encode_cursor(consumed),
            status: if is_done {
                PageStatus::Exhausted
            } else {
                PageStatus::CanLoadMore
            },
        }
    }
}

/// Cursors encode a rank offset into the ordered index. Treated as opaque by
/// callers; concurrent deletions may shift ranks between pages.
pub fn encode_cursor(offset: u64) -> String {
    format!("o{offset}")
}

pub fn decode_cursor(raw: &str) -> Result<u64, StoreError> {
    raw.strip_prefix('o')
        .and_then(|rest| rest.parse::<u64>().ok())
        .ok_or_else(|| StoreError::invalid(format!("malformed pagination cursor: {raw:?}")))
}

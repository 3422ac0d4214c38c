//! Page - one slice of a cursor-paginated listing.
//!
//! A page carries its items, the limit used to fetch it, and an opaque
//! continuation token. The token belongs to the store adapter; nothing here
//! inspects or builds it.
//!
//! An empty `next_token` on a returned page is the only end-of-results
//! signal. Keep paging until you see it; do not count items.
//!
//! Cursor consistency is weak: pages are read from live data, so writes to
//! the collection between two page fetches can make items show up twice or
//! not at all. A token is only meaningful with the same filter and limit
//! that produced it.

use serde::{Deserialize, Serialize};

/// A page of entities plus the token to fetch the next one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<E> {
    pub items: Vec<E>,
    /// Continuation token. Empty: start from the beginning (on a request
    /// page) or no further results (on a returned page).
    pub next_token: String,
    pub limit: usize,
}

impl<E> Page<E> {
    /// An empty request page: start paginating with `limit` items per page.
    pub fn first(limit: usize) -> Self {
        Self {
            items: Vec::new(),
            next_token: String::new(),
            limit,
        }
    }

    /// Whether another page can be fetched after this one.
    pub fn has_next(&self) -> bool {
        !self.next_token.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_items(self) -> Vec<E> {
        self.items
    }
}

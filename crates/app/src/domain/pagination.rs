//! Pagination

use serde::Serialize;

use crate::params::{Params, ValidationError};

/// Page size used when a request does not name one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// One-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page_size: u32,
    pub page_number: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            page_number: 1,
        }
    }
}

impl Pagination {
    /// Read the page size from `size_field` and the page from `page_number`,
    /// in that order.
    ///
    /// # Errors
    ///
    /// Returns an error when either value is present but not a positive integer.
    pub fn from_params(params: &Params, size_field: &str) -> Result<Self, ValidationError> {
        let defaults = Self::default();

        Ok(Self {
            page_size: params.positive(size_field)?.unwrap_or(defaults.page_size),
            page_number: params.positive("page_number")?.unwrap_or(defaults.page_number),
        })
    }

    /// Rows to skip: `(page_number - 1) * page_size`.
    #[must_use]
    pub fn offset(&self) -> i64 {
        i64::from(self.page_number.saturating_sub(1)) * i64::from(self.page_size)
    }

    /// Rows to fetch. One more than the page size so the page can tell
    /// whether another follows.
    #[must_use]
    pub fn fetch_limit(&self) -> i64 {
        i64::from(self.page_size) + 1
    }
}

/// A bounded slice of an ordered result set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub page_number: u32,
    pub page_size: u32,
    pub has_next_page: bool,
    pub items: Vec<T>,
}

impl<T> Page<T> {
    /// Build a page from rows fetched with [`Pagination::fetch_limit`].
    #[must_use]
    pub fn from_rows(mut rows: Vec<T>, pagination: Pagination) -> Self {
        let page_size = pagination.page_size as usize;
        let has_next_page = rows.len() > page_size;

        rows.truncate(page_size);

        Self {
            page_number: pagination.page_number,
            page_size: pagination.page_size,
            has_next_page,
            items: rows,
        }
    }

    #[must_use]
    pub fn empty(pagination: Pagination) -> Self {
        Self::from_rows(Vec::new(), pagination)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            page_number: self.page_number,
            page_size: self.page_size,
            has_next_page: self.has_next_page,
            items: self.items.into_iter().map(f).collect(),
        }
    }
}

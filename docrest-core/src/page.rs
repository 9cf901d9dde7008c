//! Pagination parameters and page metadata.
//!
//! [`ListParams`] is the skip/limit/search window a caller asks for, and
//! [`Pagination`] is the metadata returned alongside a page of results.

use serde::{Deserialize, Serialize};

use crate::error::{Constraint, ValidationError};

/// Number of items returned when the caller does not specify a limit.
pub const DEFAULT_LIMIT: i64 = 100;
/// Largest page a caller may request.
pub const MAX_LIMIT: i64 = 1000;

/// A window over a collection, optionally narrowed by a free-text search term.
///
/// Values are signed so that out-of-range input reaches [`ListParams::validate`]
/// and is reported as a [`ValidationError`] rather than a parse failure.
///
/// # Example
///
/// ```ignore
/// use docrest_core::page::ListParams;
///
/// let params = ListParams::new(20, 10).with_search("ripple");
/// assert!(params.validate().is_ok());
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ListParams {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub search: Option<String>,
}

fn default_limit() -> i64 {
    DEFAULT_LIMIT
}

impl Default for ListParams {
    fn default() -> Self {
        Self { skip: 0, limit: DEFAULT_LIMIT, search: None }
    }
}

impl ListParams {
    pub fn new(skip: i64, limit: i64) -> Self {
        Self { skip, limit, search: None }
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Checks `skip >= 0` and `1 <= limit <= 1000`.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] on the offending parameter.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.skip < 0 {
            return Err(ValidationError::new("skip", Constraint::Minimum(0)));
        }
        if self.limit < 1 {
            return Err(ValidationError::new("limit", Constraint::Minimum(1)));
        }
        if self.limit > MAX_LIMIT {
            return Err(ValidationError::new("limit", Constraint::Maximum(MAX_LIMIT)));
        }

        Ok(())
    }

    /// The trimmed search term, or `None` when absent or blank.
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
    }
}

/// Page metadata returned with list results.
///
/// `page` is 1-indexed and derived from the skip/limit window, so a skip that is not a
/// multiple of the limit lands on the page containing its first item.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u64,
    pub size: u64,
    pub total: u64,
    pub pages: u64,
}

impl Pagination {
    /// Computes page metadata: `page = skip / limit + 1`, `pages = ceil(total / limit)`.
    pub fn new(skip: u64, limit: u64, total: u64) -> Self {
        if limit == 0 {
            return Self { page: 1, size: 0, total, pages: 0 };
        }

        Self {
            page: skip / limit + 1,
            size: limit,
            total,
            pages: total.div_ceil(limit),
        }
    }
}

/// A single page of results together with its metadata.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, pagination: Pagination) -> Self {
        Self { items, pagination }
    }
}

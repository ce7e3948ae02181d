use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PER_PAGE: i64 = 10;

/// Inbound paging parameters. `page` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PaginationRequest {
    #[serde(default)]
    pub search: String,
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_per_page")]
    pub per_page: i64,
}

fn default_page() -> i64 {
    DEFAULT_PAGE
}

fn default_per_page() -> i64 {
    DEFAULT_PER_PAGE
}

impl Default for PaginationRequest {
    fn default() -> Self {
        Self {
            search: String::new(),
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl PaginationRequest {
    pub fn new(search: impl Into<String>, page: i64, per_page: i64) -> Self {
        Self {
            search: search.into(),
            page,
            per_page,
        }
    }

    /// Clamp out-of-range values: `page < 1` becomes 1, `per_page < 1` becomes 10.
    pub fn normalized(&self) -> Self {
        Self {
            search: self.search.clone(),
            page: if self.page < 1 { DEFAULT_PAGE } else { self.page },
            per_page: if self.per_page < 1 { DEFAULT_PER_PAGE } else { self.per_page },
        }
    }

    /// Row offset of the first item on this page. Call on a normalized request.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.per_page)
    }

    pub fn limit(&self) -> i64 {
        self.per_page
    }
}

/// Paging envelope returned next to every paginated listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationResponse {
    pub page: i64,
    pub per_page: i64,
    pub max_page: i64,
    pub count: i64,
}

impl PaginationResponse {
    /// `max_page` is `ceil(count / per_page)`; zero matches give zero pages.
    pub fn new(request: &PaginationRequest, count: i64) -> Self {
        let per_page = request.per_page.max(1);
        let count = count.max(0);
        Self {
            page: request.page,
            per_page,
            max_page: count / per_page + i64::from(count % per_page != 0),
            count,
        }
    }
}

/// One page of entities as produced by a repository.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: PaginationResponse,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }
}

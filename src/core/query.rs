//! Query parameters, filters and pagination utilities

use crate::core::menu::MenuResource;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Upper bound on page size when no configuration overrides it
pub const DEFAULT_MAX_LIMIT: usize = 100;

/// Pagination parameters
///
/// # Example
/// ```text
/// GET /menus?page=2&limit=10
/// GET /menus?page=1&limit=20&sort=priority:desc
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PageParams {
    /// Page number (starts at 1)
    pub page: usize,

    /// Number of items per page
    pub limit: usize,

    /// Caller-supplied sort (`field:asc` / `field:desc`)
    ///
    /// Menu listings ignore it and always use [`MenuOrder::DEFAULT`].
    pub sort: Option<String>,
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 10,
            sort: None,
        }
    }
}

impl PageParams {
    pub fn new(page: usize, limit: usize) -> Self {
        Self {
            page,
            limit,
            sort: None,
        }
    }

    /// Get page number, ensuring minimum of 1
    pub fn page(&self) -> usize {
        self.page.max(1)
    }

    /// Get limit, kept within `1..=max_limit`
    pub fn limit(&self, max_limit: usize) -> usize {
        self.limit.clamp(1, max_limit.max(1))
    }

    /// Copy with page and limit brought into range
    pub fn normalized(&self, max_limit: usize) -> Self {
        Self {
            page: self.page(),
            limit: self.limit(max_limit),
            sort: self.sort.clone(),
        }
    }

    /// Number of rows skipped before the window
    pub fn offset(&self) -> usize {
        (self.page() - 1).saturating_mul(self.limit.max(1))
    }

    /// Slice the window out of an already filtered and ordered list
    pub fn window<T: Clone>(&self, rows: &[T]) -> Vec<T> {
        rows.iter()
            .skip(self.offset())
            .take(self.limit.max(1))
            .cloned()
            .collect()
    }
}

/// A list result, optionally paginated
#[derive(Debug, Clone, Serialize)]
pub struct PageList<T> {
    pub list: Vec<T>,

    /// Total number of rows matching the query (before windowing)
    pub total: usize,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationMeta>,
}

impl<T> PageList<T> {
    /// Unpaginated list; `total` is its length
    pub fn from_list(list: Vec<T>) -> Self {
        let total = list.len();
        Self {
            list,
            total,
            pagination: None,
        }
    }

    /// One window of a larger result
    pub fn paged(list: Vec<T>, total: usize, params: &PageParams) -> Self {
        Self {
            list,
            total,
            pagination: Some(PaginationMeta::new(params.page(), params.limit, total)),
        }
    }
}

/// Pagination metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationMeta {
    /// Current page number (starts at 1)
    pub page: usize,

    /// Number of items per page
    pub limit: usize,

    /// Total number of items (after filters)
    pub total: usize,

    /// Total number of pages
    pub total_pages: usize,

    /// Whether there is a next page
    pub has_next: bool,

    /// Whether there is a previous page
    pub has_prev: bool,
}

impl PaginationMeta {
    pub fn new(page: usize, limit: usize, total: usize) -> Self {
        let page = page.max(1);
        let limit = limit.max(1);
        let total_pages = if total == 0 { 0 } else { total.div_ceil(limit) };
        let end = (page - 1).saturating_mul(limit).saturating_add(limit);

        Self {
            page,
            limit,
            total,
            total_pages,
            has_next: end < total,
            has_prev: page > 1,
        }
    }
}

/// Keyword filter over `menu_code` and `menu_name`
///
/// Matching is a case-sensitive substring test on either field. A missing or
/// empty keyword matches every menu.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuFilter {
    keyword: Option<String>,
}

impl MenuFilter {
    pub fn keyword(keyword: Option<&str>) -> Self {
        Self {
            keyword: keyword.filter(|k| !k.is_empty()).map(str::to_string),
        }
    }

    pub fn all() -> Self {
        Self::default()
    }

    pub fn matches(&self, menu: &MenuResource) -> bool {
        match &self.keyword {
            None => true,
            Some(k) => menu.menu_code.contains(k.as_str()) || menu.menu_name.contains(k.as_str()),
        }
    }
}

/// Column a menu listing can be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuSortField {
    MenuId,
    Priority,
}

/// One ordering key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuOrder {
    pub field: MenuSortField,
    pub ascending: bool,
}

impl MenuOrder {
    /// `menu_id ASC, priority ASC`
    pub const DEFAULT: &'static [MenuOrder] = &[
        MenuOrder::asc(MenuSortField::MenuId),
        MenuOrder::asc(MenuSortField::Priority),
    ];

    pub const fn asc(field: MenuSortField) -> Self {
        Self {
            field,
            ascending: true,
        }
    }

    pub const fn desc(field: MenuSortField) -> Self {
        Self {
            field,
            ascending: false,
        }
    }

    fn compare_one(&self, a: &MenuResource, b: &MenuResource) -> Ordering {
        let ord = match self.field {
            MenuSortField::MenuId => a.menu_id.cmp(&b.menu_id),
            MenuSortField::Priority => a.priority.cmp(&b.priority),
        };
        if self.ascending { ord } else { ord.reverse() }
    }

    /// Compare two menus by a list of ordering keys, first key first
    pub fn compare(order: &[MenuOrder], a: &MenuResource, b: &MenuResource) -> Ordering {
        order
            .iter()
            .map(|o| o.compare_one(a, b))
            .find(|ord| *ord != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    }
}

//! Search, filter, sort and paginate a flat record list.
//!
//! The pipeline is the same for every record kind; a kind only has to say
//! which text it can be searched by, which fields can be filtered on, which
//! date the range applies to, and how each sort key resolves. See
//! [`Viewable`].

pub mod meeting;
pub mod task;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use crate::error::CoreError;

pub use meeting::{MeetingField, MeetingSortKey, MeetingViewConfig};
pub use task::{TaskField, TaskSortKey, TaskViewConfig};

/// Filter value that disables a filter.
pub const ALL: &str = "all";

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Number of page buttons the pager shows around the current page.
pub const PAGER_WINDOW: usize = 5;

/// A resolved sort value. Text is already lower-cased.
///
/// `None` (the key did not resolve on a record) sorts below every value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortValue {
    Date(NaiveDate),
    Timestamp(i64),
    Text(String),
}

impl SortValue {
    pub fn text(s: &str) -> Self {
        Self::Text(s.to_lowercase())
    }
}

/// A record kind the view pipeline can work on.
pub trait Viewable {
    /// Fields usable in equality filters.
    type Field: Copy + Ord + fmt::Debug;
    /// Recognised sort keys.
    type SortKey: Copy + PartialEq + fmt::Debug;

    /// Text the free-form search looks into.
    fn search_text(&self) -> Vec<&str>;

    /// Value compared by an equality filter on `field`.
    fn field_value(&self, field: Self::Field) -> Option<String>;

    /// Date the date-range filter applies to.
    fn view_date(&self) -> Option<NaiveDate>;

    fn sort_value(&self, key: Self::SortKey) -> Option<SortValue>;
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    fn apply(self, ord: Ordering) -> Ordering {
        match self {
            Self::Asc => ord,
            Self::Desc => ord.reverse(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SortSpec<K> {
    pub key: K,
    pub direction: SortDirection,
}

/// Inclusive calendar-date range.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }
}

/// Everything a list page keeps in its local state, as one value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(
    rename_all = "camelCase",
    bound(
        serialize = "F: Serialize, K: Serialize",
        deserialize = "F: Deserialize<'de> + Ord, K: Deserialize<'de>"
    )
)]
pub struct ViewConfig<F, K> {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub filters: BTreeMap<F, String>,
    #[serde(default)]
    pub date_range: Option<DateRange>,
    #[serde(default)]
    pub sort: Option<SortSpec<K>>,
    /// 1-based.
    pub page: usize,
    pub page_size: usize,
}

impl<F, K> Default for ViewConfig<F, K> {
    fn default() -> Self {
        Self {
            search: String::new(),
            filters: BTreeMap::new(),
            date_range: None,
            sort: None,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl<F: Ord, K: PartialEq + Copy> ViewConfig<F, K> {
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_filter(mut self, field: F, value: impl Into<String>) -> Self {
        self.filters.insert(field, value.into());
        self
    }

    pub fn with_date_range(mut self, from: NaiveDate, to: NaiveDate) -> Self {
        self.date_range = Some(DateRange { from, to });
        self
    }

    pub fn with_sort(mut self, key: K, direction: SortDirection) -> Self {
        self.sort = Some(SortSpec { key, direction });
        self
    }

    pub fn with_page(mut self, page: usize, page_size: usize) -> Self {
        self.page = page;
        self.page_size = page_size;
        self
    }

    /// Clicking a column header: the active key flips direction, any other
    /// key starts ascending.
    pub fn toggle_sort(&mut self, key: K) {
        self.sort = Some(match self.sort {
            Some(spec) if spec.key == key => SortSpec {
                key,
                direction: spec.direction.flipped(),
            },
            _ => SortSpec {
                key,
                direction: SortDirection::Asc,
            },
        });
    }

    /// Back to an unfiltered first page. The page size is kept.
    pub fn reset(&mut self) {
        self.search.clear();
        self.filters.clear();
        self.date_range = None;
        self.sort = None;
        self.page = 1;
    }

    /// Filters that are actually active (not set to [`ALL`]).
    pub fn active_filters(&self) -> impl Iterator<Item = (&F, &str)> {
        self.filters
            .iter()
            .filter(|(_, v)| v.as_str() != ALL)
            .map(|(f, v)| (f, v.as_str()))
    }
}

/// One page of a derived view.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Page<R> {
    pub items: Vec<R>,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub total_count: usize,
}

/// Search, filter, and sort, without paginating. Report export uses this.
pub fn filter_and_sort<R: Viewable + Clone>(
    records: &[R],
    config: &ViewConfig<R::Field, R::SortKey>,
) -> Vec<R> {
    let needle = config.search.trim().to_lowercase();
    let filters: Vec<(R::Field, &str)> =
        config.active_filters().map(|(f, v)| (*f, v)).collect();

    let mut keyed: Vec<(Option<SortValue>, &R)> = records
        .iter()
        .filter(|r| needle.is_empty() || matches_search(*r, &needle))
        .filter(|r| {
            filters
                .iter()
                .all(|(field, want)| r.field_value(*field).as_deref() == Some(*want))
        })
        .filter(|r| match &config.date_range {
            Some(range) => r.view_date().is_some_and(|d| range.contains(d)),
            None => true,
        })
        .map(|r| {
            let key = config.sort.and_then(|spec| r.sort_value(spec.key));
            (key, r)
        })
        .collect();

    if let Some(spec) = config.sort {
        // `sort_by` is stable: ties keep their filtered order in both directions.
        keyed.sort_by(|a, b| spec.direction.apply(a.0.cmp(&b.0)));
    }

    keyed.into_iter().map(|(_, r)| r.clone()).collect()
}

/// Derive the requested page.
///
/// `page_size == 0` is an [`CoreError::InvalidConfig`]. A page outside
/// `1..=total_pages` is not clamped; it comes back empty.
pub fn derive<R: Viewable + Clone>(
    records: &[R],
    config: &ViewConfig<R::Field, R::SortKey>,
) -> Result<Page<R>, CoreError> {
    if config.page_size == 0 {
        return Err(CoreError::InvalidConfig("page size must be positive".into()));
    }

    let all = filter_and_sort(records, config);
    let total_count = all.len();
    let total_pages = total_pages(total_count, config.page_size);

    let items = match config.page.checked_sub(1) {
        Some(zero_based) => {
            let start = zero_based.saturating_mul(config.page_size);
            all.into_iter().skip(start).take(config.page_size).collect()
        }
        None => Vec::new(),
    };

    Ok(Page {
        items,
        page: config.page,
        page_size: config.page_size,
        total_pages,
        total_count,
    })
}

fn matches_search<R: Viewable>(record: &R, needle: &str) -> bool {
    record
        .search_text()
        .iter()
        .any(|hay| hay.to_lowercase().contains(needle))
}

/// `ceil(count / page_size)`; zero when `page_size` is zero.
pub fn total_pages(count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    count.div_ceil(page_size)
}

/// Clamp a requested page into `1..=total_pages` (page 1 when empty).
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}

/// Page numbers the pager shows: up to `window` pages starting
/// `window / 2` before the current one.
pub fn visible_pages(current: usize, total_pages: usize, window: usize) -> Vec<usize> {
    if total_pages == 0 || window == 0 {
        return Vec::new();
    }
    let start = current.saturating_sub(window / 2).max(1);
    let end = total_pages.min(start.saturating_add(window - 1));
    (start..=end).collect()
}

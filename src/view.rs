//! View state and reducer
//!
//! The whole list view is one immutable [`ViewState`] value. Every change,
//! whether from user input or a finished fetch, is an [`Action`] applied with
//! [`ViewState::reduce`]. The visible page is derived on demand and never
//! cached.
//!
//! Two behaviors are deliberate:
//! - a finished fetch replaces the dataset wholesale, so whichever fetch
//!   resolves last wins;
//! - `current_page` is reset only by a query change, never by the dataset
//!   shrinking, so a stale page can render empty.

use crate::record::Record;
use std::sync::Arc;

/// Rows per page
pub const PAGE_SIZE: usize = 10;

/// Which of the two fetches an action refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatasetKind {
    /// Small first-page dataset
    Initial,
    /// Complete dataset
    All,
}

impl DatasetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetKind::Initial => "initial",
            DatasetKind::All => "all",
        }
    }
}

/// State transitions of the list view
#[derive(Debug, Clone)]
pub enum Action {
    /// Replace the query; always returns to page 1
    SetQuery(String),
    /// Jump to a page (floored at 1)
    SetPage(usize),
    /// Advance one page, unbounded
    NextPage,
    /// Go back one page, floored at 1
    PreviousPage,
    /// A fetch finished and parsed
    DatasetLoaded {
        kind: DatasetKind,
        records: Arc<Vec<Record>>,
    },
    /// A fetch failed; the dataset is left as is
    LoadFailed { kind: DatasetKind },
}

/// Complete state of the list view
#[derive(Debug, Clone)]
pub struct ViewState {
    pub dataset: Arc<Vec<Record>>,
    pub query: String,
    /// 1-based
    pub current_page: usize,
    /// Initial fetch in flight
    pub loading: bool,
    /// Full fetch in flight
    pub loading_all_data: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            dataset: Arc::new(Vec::new()),
            query: String::new(),
            current_page: 1,
            loading: true,
            loading_all_data: true,
        }
    }
}

impl ViewState {
    /// Apply one action, producing the next state
    pub fn reduce(self, action: Action) -> Self {
        match action {
            Action::SetQuery(query) => Self {
                query,
                current_page: 1,
                ..self
            },
            Action::SetPage(page) => Self {
                current_page: page.max(1),
                ..self
            },
            Action::NextPage => Self {
                current_page: self.current_page + 1,
                ..self
            },
            Action::PreviousPage => Self {
                current_page: self.current_page.saturating_sub(1).max(1),
                ..self
            },
            Action::DatasetLoaded { kind, records } => Self {
                dataset: records,
                ..self.clear_loading(kind)
            },
            Action::LoadFailed { kind } => self.clear_loading(kind),
        }
    }

    fn clear_loading(self, kind: DatasetKind) -> Self {
        match kind {
            DatasetKind::Initial => Self {
                loading: false,
                ..self
            },
            DatasetKind::All => Self {
                loading_all_data: false,
                ..self
            },
        }
    }

    /// Whether either fetch is still in flight
    pub fn is_loading(&self) -> bool {
        self.loading || self.loading_all_data
    }

    /// Rows matching the query, in dataset order. An empty query matches
    /// everything.
    pub fn filtered(&self) -> Vec<&Record> {
        if self.query.is_empty() {
            return self.dataset.iter().collect();
        }

        let needle = self.query.to_lowercase();
        self.dataset.iter().filter(|r| r.matches(&needle)).collect()
    }

    /// Derive the page currently on screen
    pub fn page(&self) -> Page<'_> {
        let displayed = self.filtered();
        let total = displayed.len();

        let start_index = self.current_page.saturating_sub(1).saturating_mul(PAGE_SIZE);
        let end_index = start_index.saturating_add(PAGE_SIZE);

        let rows = if start_index >= total {
            Vec::new()
        } else {
            displayed[start_index..end_index.min(total)].to_vec()
        };

        Page {
            rows,
            current_page: self.current_page,
            start_index,
            end_index,
            total,
        }
    }
}

/// One derived page of the filtered dataset
#[derive(Debug)]
pub struct Page<'a> {
    pub rows: Vec<&'a Record>,
    pub current_page: usize,
    /// Index of the first row in the filtered sequence
    pub start_index: usize,
    /// One past the last slot on this page (not clamped to `total`)
    pub end_index: usize,
    /// Length of the filtered sequence
    pub total: usize,
}

impl Page<'_> {
    pub fn has_next(&self) -> bool {
        self.end_index < self.total
    }

    pub fn has_previous(&self) -> bool {
        self.current_page != 1
    }

    /// Number of pages needed for `total` rows, at least 1
    pub fn max_page(&self) -> usize {
        self.total.div_ceil(PAGE_SIZE).max(1)
    }
}

//! List query normalization: filters and page windows.
//!
//! # Invariants
//! - Filters always run before sorting and pagination.
//! - A normalized page is `>= 1`; a normalized page size is in `[1, 100]`.

use crate::model::todo::TodoItem;

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Optional list filters, combined with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoFilter {
    /// Keep only records whose completion flag equals this value.
    pub is_completed: Option<bool>,
    /// Case-insensitive substring matched against the title.
    pub search: Option<String>,
}

type TodoPredicate = Box<dyn Fn(&TodoItem) -> bool + Send + Sync>;

impl TodoFilter {
    /// Returns the trimmed, lowercased search term, if one applies.
    pub fn normalized_search(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .map(str::to_lowercase)
    }

    /// Compiles the filter into a conjunction of predicates.
    pub fn to_predicate(&self) -> impl Fn(&TodoItem) -> bool + Send + Sync {
        let mut predicates: Vec<TodoPredicate> = Vec::new();

        if let Some(expected) = self.is_completed {
            predicates.push(Box::new(move |todo: &TodoItem| todo.is_completed == expected));
        }

        if let Some(term) = self.normalized_search() {
            predicates.push(Box::new(move |todo: &TodoItem| {
                todo.title.to_lowercase().contains(term.as_str())
            }));
        }

        move |todo: &TodoItem| predicates.iter().all(|predicate| predicate(todo))
    }
}

/// Normalized pagination window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: u32,
    pub page_size: u32,
}

impl PageWindow {
    /// Clamps raw page parameters.
    ///
    /// - `page < 1` becomes `1`.
    /// - `page_size < 1` becomes `DEFAULT_PAGE_SIZE`.
    /// - `page_size > MAX_PAGE_SIZE` becomes `MAX_PAGE_SIZE`.
    pub fn normalize(page: i64, page_size: i64) -> Self {
        let page = u32::try_from(page.max(1)).unwrap_or(u32::MAX);
        let page_size = if page_size < 1 {
            DEFAULT_PAGE_SIZE
        } else {
            u32::try_from(page_size.min(i64::from(MAX_PAGE_SIZE))).unwrap_or(MAX_PAGE_SIZE)
        };
        Self { page, page_size }
    }

    /// Number of records to skip; saturates instead of overflowing.
    pub fn offset(&self) -> usize {
        let skipped = u64::from(self.page - 1).saturating_mul(u64::from(self.page_size));
        usize::try_from(skipped).unwrap_or(usize::MAX)
    }

    pub fn limit(&self) -> usize {
        self.page_size as usize
    }
}

//! Client-side pagination over lists already fetched from the backend.

/// Number of pages needed to show `len` items, `page_size` at a time
pub fn total_pages(len: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    len.div_ceil(page_size)
}

/// One page of a list together with its position
#[derive(Debug, Clone, PartialEq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    /// 1-based page number
    pub number: usize,
    pub total_pages: usize,
    pub total_items: usize,
    /// 0-based index of the first item on this page within the full list
    pub offset: usize,
}

impl<T> Page<'_, T> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_next(&self) -> bool {
        self.number < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    /// "Showing 11-20 of 23" style label
    pub fn range_label(&self) -> String {
        if self.items.is_empty() {
            return format!("Showing 0 of {}", self.total_items);
        }
        format!(
            "Showing {}-{} of {}",
            self.offset + 1,
            self.offset + self.items.len(),
            self.total_items
        )
    }
}

/// Per-view pagination state: page size plus the page currently shown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pager {
    page_size: usize,
    current_page: usize,
}

impl Pager {
    /// A page size of zero is treated as one item per page
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            current_page: 1,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Jump to a 1-based page; page 0 is clamped to 1
    pub fn go_to(&mut self, page: usize) {
        self.current_page = page.max(1);
    }

    pub fn next(&mut self) {
        self.current_page += 1;
    }

    pub fn previous(&mut self) {
        self.current_page = self.current_page.saturating_sub(1).max(1);
    }

    /// Back to page 1, done after every refresh of the underlying list
    pub fn reset(&mut self) {
        self.current_page = 1;
    }

    /// Slice the current page out of `items`; past the end yields an empty page
    pub fn page<'a, T>(&self, items: &'a [T]) -> Page<'a, T> {
        let offset = (self.current_page - 1).saturating_mul(self.page_size);
        let start = offset.min(items.len());
        let end = offset.saturating_add(self.page_size).min(items.len());

        Page {
            items: &items[start..end],
            number: self.current_page,
            total_pages: total_pages(items.len(), self.page_size),
            total_items: items.len(),
            offset: start,
        }
    }
}

impl Default for Pager {
    fn default() -> Self {
        Self::new(10)
    }
}

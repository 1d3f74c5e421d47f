pub const DEFAULT_PAGE_SIZE: usize = 5;

pub fn total_pages(count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 1;
    }
    count.div_ceil(page_size).max(1)
}

pub fn clamp_page(current: usize, total_pages: usize) -> usize {
    current.clamp(1, total_pages.max(1))
}

/// Items shown on a 1-based `page`. Out of range pages are empty.
pub fn page_slice<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    if page == 0 || page_size == 0 {
        return &[];
    }
    let start = (page - 1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

/// Independent page cursors for the active and completed goal lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursors {
    pub active: usize,
    pub completed: usize,
    pub page_size: usize,
}

impl Default for PageCursors {
    fn default() -> Self {
        Self {
            active: 1,
            completed: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageCursors {
    pub fn clamp(&mut self, active_count: usize, completed_count: usize) {
        self.active = clamp_page(self.active, total_pages(active_count, self.page_size));
        self.completed = clamp_page(self.completed, total_pages(completed_count, self.page_size));
    }
}

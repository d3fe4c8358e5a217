use serde::{Deserialize, Serialize};

pub const POSTS_PER_PAGE: u32 = 10;
pub const USERS_PER_PAGE: u32 = 6;

/// Page-number arithmetic over a counted result set.
///
/// Mirrors the forgiving lookup of classic web paginators: a missing or
/// non-numeric page yields the first page, and any number outside
/// `1..=num_pages` yields the last page. An empty result set still has one
/// (empty) page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    count: u64,
    per_page: u32,
}

impl Paginator {
    pub fn new(count: u64, per_page: u32) -> Self {
        Self {
            count,
            per_page: per_page.max(1),
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    pub fn num_pages(&self) -> u32 {
        if self.count == 0 {
            return 1;
        }
        let pages = self.count.div_ceil(u64::from(self.per_page));
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    /// Resolve a raw `?page=` value to a valid 1-based page number.
    pub fn resolve(&self, requested: Option<&str>) -> u32 {
        let Some(raw) = requested else {
            return 1;
        };
        match raw.trim().parse::<i64>() {
            Err(_) => 1,
            Ok(n) if n >= 1 && n <= i64::from(self.num_pages()) => n as u32,
            Ok(_) => self.num_pages(),
        }
    }

    /// Row offset of the first item on page `number`.
    pub fn offset(&self, number: u32) -> u64 {
        u64::from(number.saturating_sub(1)) * u64::from(self.per_page)
    }

    pub fn page<T>(&self, number: u32, items: Vec<T>) -> Page<T> {
        let num_pages = self.num_pages();
        Page {
            items,
            number,
            num_pages,
            count: self.count,
            has_next: number < num_pages,
            has_previous: number > 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: u32,
    pub num_pages: u32,
    pub count: u64,
    pub has_next: bool,
    pub has_previous: bool,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            num_pages: self.num_pages,
            count: self.count,
            has_next: self.has_next,
            has_previous: self.has_previous,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_result_has_one_page() {
        let p = Paginator::new(0, POSTS_PER_PAGE);
        assert_eq!(p.num_pages(), 1);
        assert_eq!(p.resolve(None), 1);
        let page = p.page::<u8>(1, vec![]);
        assert!(!page.has_next);
        assert!(!page.has_previous);
    }

    #[test]
    fn page_count_rounds_up() {
        assert_eq!(Paginator::new(10, 10).num_pages(), 1);
        assert_eq!(Paginator::new(11, 10).num_pages(), 2);
        assert_eq!(Paginator::new(13, USERS_PER_PAGE).num_pages(), 3);
    }

    #[test]
    fn garbage_page_falls_back_to_first() {
        let p = Paginator::new(25, 10);
        assert_eq!(p.resolve(Some("abc")), 1);
        assert_eq!(p.resolve(Some("")), 1);
    }

    #[test]
    fn out_of_range_page_falls_back_to_last() {
        let p = Paginator::new(25, 10);
        assert_eq!(p.resolve(Some("99")), 3);
        assert_eq!(p.resolve(Some("0")), 3);
        assert_eq!(p.resolve(Some("-4")), 3);
        assert_eq!(p.resolve(Some("2")), 2);
    }

    #[test]
    fn offsets_and_navigation_flags() {
        let p = Paginator::new(25, 10);
        assert_eq!(p.offset(1), 0);
        assert_eq!(p.offset(3), 20);

        let middle = p.page(2, vec![0; 10]);
        assert!(middle.has_next);
        assert!(middle.has_previous);

        let last = p.page(3, vec![0; 5]).map(|n| n + 1);
        assert!(!last.has_next);
        assert_eq!(last.items, vec![1; 5]);
        assert_eq!(last.count, 25);
    }
}

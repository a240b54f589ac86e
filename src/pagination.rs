use serde::Serialize;

/// TMDB refuses to serve pages beyond this, whatever `total_pages` says.
pub const MAX_PAGE: u32 = 500;
const WINDOW: u32 = 5;

/// Clamps a requested page into `1..=MAX_PAGE`.
pub fn clamp_page(page: u32) -> u32 {
    page.clamp(1, MAX_PAGE)
}

/// Page strip shown under a grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub current: u32,
    pub total_pages: u32,
    pub pages: Vec<u32>,
    pub show_first: bool,
    pub leading_ellipsis: bool,
    pub show_last: bool,
    pub trailing_ellipsis: bool,
    pub prev: Option<u32>,
    pub next: Option<u32>,
}

impl Pagination {
    /// Returns `None` when there is nothing to page through.
    pub fn new(current: u32, advertised_total: u32) -> Option<Self> {
        let total = advertised_total.min(MAX_PAGE);
        if total <= 1 {
            return None;
        }
        let current = current.clamp(1, total);

        let mut start = current.saturating_sub(WINDOW / 2).max(1);
        let end = (start + WINDOW - 1).min(total);
        if end == total {
            start = end.saturating_sub(WINDOW - 1).max(1);
        }
        let pages: Vec<u32> = (start..=end).collect();

        Some(Self {
            current,
            total_pages: total,
            show_first: start > 1,
            leading_ellipsis: start > 2,
            show_last: end < total,
            trailing_ellipsis: end + 1 < total,
            prev: (current > 1).then(|| current - 1),
            next: (current < total).then(|| current + 1),
            pages,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidden_for_single_page() {
        assert!(Pagination::new(1, 0).is_none());
        assert!(Pagination::new(1, 1).is_none());
    }

    #[test]
    fn window_at_start() {
        let p = Pagination::new(1, 40).unwrap();
        assert_eq!(p.pages, vec![1, 2, 3, 4, 5]);
        assert!(!p.show_first);
        assert!(p.show_last && p.trailing_ellipsis);
        assert_eq!(p.prev, None);
        assert_eq!(p.next, Some(2));
    }

    #[test]
    fn window_centred() {
        let p = Pagination::new(10, 40).unwrap();
        assert_eq!(p.pages, vec![8, 9, 10, 11, 12]);
        assert!(p.show_first && p.leading_ellipsis);
        assert!(p.show_last && p.trailing_ellipsis);
    }

    #[test]
    fn window_shifts_to_end() {
        let p = Pagination::new(40, 40).unwrap();
        assert_eq!(p.pages, vec![36, 37, 38, 39, 40]);
        assert!(!p.show_last);
        assert_eq!(p.next, None);
    }

    #[test]
    fn no_ellipsis_when_adjacent() {
        let p = Pagination::new(4, 7).unwrap();
        assert_eq!(p.pages, vec![2, 3, 4, 5, 6]);
        assert!(p.show_first && !p.leading_ellipsis);
        assert!(p.show_last && !p.trailing_ellipsis);
    }

    #[test]
    fn never_exceeds_ceiling() {
        let p = Pagination::new(9000, 42_000).unwrap();
        assert_eq!(p.total_pages, MAX_PAGE);
        assert_eq!(p.current, MAX_PAGE);
        assert!(p.pages.iter().all(|&n| n <= MAX_PAGE));
        assert_eq!(p.next, None);
    }

    #[test]
    fn short_totals_show_every_page() {
        let p = Pagination::new(2, 3).unwrap();
        assert_eq!(p.pages, vec![1, 2, 3]);
        assert!(!p.show_first && !p.show_last);
    }

    #[test]
    fn clamp_page_bounds() {
        assert_eq!(clamp_page(0), 1);
        assert_eq!(clamp_page(12), 12);
        assert_eq!(clamp_page(501), MAX_PAGE);
    }
}

//! Page links shown under a list: both edges, a window around the current
//! page, and `None` gaps for the elided ranges.

const LEFT_EDGE: usize = 2;
const LEFT_CURRENT: usize = 2;
const RIGHT_CURRENT: usize = 4;
const RIGHT_EDGE: usize = 2;

fn get_pages(
    total_pages: usize,
    current_page: usize,
    left_edge: usize,
    left_current: usize,
    right_current: usize,
    right_edge: usize,
) -> Vec<Option<usize>> {
    let last_page = total_pages;

    if last_page == 0 {
        return vec![];
    }

    let mut pages = Vec::new();

    let left_end = (1 + left_edge).min(last_page + 1);
    pages.extend((1..left_end).map(Some));

    let mid_start = left_end.max(current_page.saturating_sub(left_current));
    let mid_end = (current_page + right_current + 1).min(last_page + 1);

    if mid_start > left_end {
        pages.push(None);
    }
    pages.extend((mid_start..mid_end).map(Some));

    let right_start = mid_end.max(last_page.saturating_sub(right_edge) + 1);

    if right_start > mid_end {
        pages.push(None);
    }
    pages.extend((right_start..=last_page).map(Some));

    pages
}

/// Page links for `current_page` out of `total_pages`.
pub fn page_window(total_pages: usize, current_page: usize) -> Vec<Option<usize>> {
    let current_page = current_page.max(1);
    get_pages(
        total_pages,
        current_page,
        LEFT_EDGE,
        LEFT_CURRENT,
        RIGHT_CURRENT,
        RIGHT_EDGE,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_pages_for_empty_collection() {
        assert!(page_window(0, 1).is_empty());
    }

    #[test]
    fn short_collections_list_every_page() {
        assert_eq!(page_window(3, 2), vec![Some(1), Some(2), Some(3)]);
    }

    #[test]
    fn long_collections_elide_both_sides() {
        let pages = page_window(30, 15);
        assert_eq!(
            pages,
            vec![
                Some(1),
                Some(2),
                None,
                Some(13),
                Some(14),
                Some(15),
                Some(16),
                Some(17),
                Some(18),
                Some(19),
                None,
                Some(29),
                Some(30),
            ]
        );
    }

    #[test]
    fn zero_current_page_is_treated_as_first() {
        assert_eq!(page_window(2, 0), page_window(2, 1));
    }
}

use crate::{Page, Property, PropertyFilters};

/// Pagination controls derived from a page envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationView {
    /// Zero-based
    pub current: u32,
    pub total_pages: u32,
    pub previous_disabled: bool,
    pub next_disabled: bool,
}

impl PaginationView {
    /// `None` when everything fits on one page.
    pub fn from_page<T>(page: &Page<T>) -> Option<Self> {
        if page.total_pages <= 1 {
            return None;
        }
        Some(Self {
            current: page.number,
            total_pages: page.total_pages,
            previous_disabled: page.first,
            next_disabled: page.last,
        })
    }

    pub fn previous_page(&self) -> Option<u32> {
        if self.previous_disabled {
            None
        } else {
            self.current.checked_sub(1)
        }
    }

    pub fn next_page(&self) -> Option<u32> {
        if self.next_disabled {
            None
        } else {
            self.current.checked_add(1)
        }
    }

    /// One-based, for display.
    pub fn label(&self) -> String {
        format!(
            "Page {} of {}",
            self.current.saturating_add(1),
            self.total_pages
        )
    }

    /// Filters for the page before, if there is one.
    pub fn previous(&self, filters: &PropertyFilters) -> Option<PropertyFilters> {
        self.previous_page().map(|page| filters.with_page(page))
    }

    pub fn next(&self, filters: &PropertyFilters) -> Option<PropertyFilters> {
        self.next_page().map(|page| filters.with_page(page))
    }
}

/// What the property list renders for a fetch.
#[derive(Debug, PartialEq)]
pub enum ListView<'a> {
    Loading,
    Error(String),
    Empty,
    Grid {
        properties: &'a [Property],
        pagination: Option<PaginationView>,
    },
}

impl<'a> ListView<'a> {
    pub fn new(
        is_loading: bool,
        error: Option<&str>,
        page: Option<&'a Page<Property>>,
    ) -> Self {
        if is_loading {
            return Self::Loading;
        }
        if let Some(error) = error {
            return Self::Error(error.to_string());
        }
        match page {
            None => Self::Loading,
            Some(page) if page.content.is_empty() => Self::Empty,
            Some(page) => Self::Grid {
                properties: &page.content,
                pagination: PaginationView::from_page(page),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ClientError;
    use crate::filters::FilterField;

    fn envelope(number: u32, total_pages: u32) -> Page<Property> {
        Page {
            content: vec![Property::default()],
            number,
            total_pages,
            total_elements: u64::from(total_pages) * 12,
            size: 12,
            first: number == 0,
            last: number + 1 >= total_pages,
            empty: false,
        }
    }

    #[test]
    fn a_single_page_has_no_controls() {
        assert_eq!(PaginationView::from_page(&envelope(0, 1)), None);
        assert_eq!(PaginationView::from_page(&envelope(0, 0)), None);
    }

    #[test]
    fn next_on_the_first_of_three_pages() {
        let view = PaginationView::from_page(&envelope(0, 3)).unwrap();
        assert!(view.previous_disabled);
        assert!(!view.next_disabled);
        assert_eq!(view.label(), "Page 1 of 3");

        let filters =
            PropertyFilters::default().with_field(FilterField::Bedrooms, "3");
        let next = view.next(&filters).unwrap();
        assert_eq!(next.page, 1);
        assert_eq!(next.bedrooms, "3");
        assert_ne!(next, filters);
        assert!(next.to_query_string().contains("page=1"));
        assert_eq!(view.previous(&filters), None);
    }

    #[test]
    fn last_page_disables_next() {
        let view = PaginationView::from_page(&envelope(2, 3)).unwrap();
        assert_eq!(view.next_page(), None);
        assert_eq!(view.previous_page(), Some(1));
    }

    #[test]
    fn next_stops_at_the_largest_page_number() {
        let mut page = envelope(0, 3);
        page.number = u32::MAX;
        page.first = false;
        page.last = false;
        let view = PaginationView::from_page(&page).unwrap();
        assert_eq!(view.next_page(), None);
        assert_eq!(view.previous_page(), Some(u32::MAX - 1));
        assert_eq!(view.label(), format!("Page {} of 3", u32::MAX));
    }

    #[test]
    fn list_view_states() {
        assert_eq!(ListView::new(true, None, None), ListView::Loading);

        let empty = Page::<Property>::single(vec![]);
        assert_eq!(ListView::new(false, None, Some(&empty)), ListView::Empty);

        let error = ClientError::NotFound("gone".into());
        assert_eq!(
            ListView::new(false, Some(&error.user_message()), Some(&empty)),
            ListView::Error("gone".into())
        );

        let page = envelope(0, 1);
        assert!(matches!(
            ListView::new(false, None, Some(&page)),
            ListView::Grid { pagination: None, .. }
        ));
    }
}

//! Filter state for the property list.
//!
//! The URL query string is the source of truth for the list parameters:
//! [`PropertyFilters::from_query_string`] and
//! [`PropertyFilters::to_query_string`] map between the two, and both
//! directions run the sanitizers so hand-edited URLs are treated the same as
//! typed input.

use regex::Regex;
use std::sync::LazyLock;
use url::form_urlencoded;

pub const DEFAULT_PAGE_SIZE: u32 = 12;
pub const MAX_PAGE_SIZE: u32 = 100;
pub const ADDRESS_MAX_LEN: usize = 100;
pub const NUMERIC_MAX_LEN: usize = 10;
/// Quiet period before an edited filter is forwarded.
pub const FILTER_DEBOUNCE_MS: u32 = 500;

static TAG_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<[^>]*>").expect("tag pattern is a valid regex")
});

/// Remove anything that looks like an HTML tag, keeping the inner text, then
/// truncate to [`ADDRESS_MAX_LEN`] characters.
pub fn sanitize_address(value: &str) -> String {
    TAG_PATTERN
        .replace_all(value, "")
        .chars()
        .take(ADDRESS_MAX_LEN)
        .collect()
}

/// Keep only ASCII digits, truncated to [`NUMERIC_MAX_LEN`] characters.
pub fn sanitize_digits(value: &str) -> String {
    value
        .chars()
        .filter(char::is_ascii_digit)
        .take(NUMERIC_MAX_LEN)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterField {
    Address,
    MinPrice,
    MaxPrice,
    Bedrooms,
}

impl FilterField {
    pub const ALL: [FilterField; 4] = [
        FilterField::Address,
        FilterField::MinPrice,
        FilterField::MaxPrice,
        FilterField::Bedrooms,
    ];

    /// Query parameter name, shared by the browser URL and the backend.
    pub fn key(self) -> &'static str {
        match self {
            Self::Address => "address",
            Self::MinPrice => "minPrice",
            Self::MaxPrice => "maxPrice",
            Self::Bedrooms => "bedrooms",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.key() == key)
    }

    pub fn sanitize(self, value: &str) -> String {
        match self {
            Self::Address => sanitize_address(value),
            Self::MinPrice | Self::MaxPrice | Self::Bedrooms => {
                sanitize_digits(value)
            }
        }
    }
}

/// The full filter tuple. Two values that differ in any field identify
/// different result pages, so this doubles as the fetch cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PropertyFilters {
    pub address: String,
    pub min_price: String,
    pub max_price: String,
    pub bedrooms: String,
    /// Zero-based
    pub page: u32,
    pub size: u32,
}

impl Default for PropertyFilters {
    fn default() -> Self {
        Self {
            address: String::new(),
            min_price: String::new(),
            max_price: String::new(),
            bedrooms: String::new(),
            page: 0,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PropertyFilters {
    pub fn get(&self, field: FilterField) -> &str {
        match field {
            FilterField::Address => &self.address,
            FilterField::MinPrice => &self.min_price,
            FilterField::MaxPrice => &self.max_price,
            FilterField::Bedrooms => &self.bedrooms,
        }
    }

    fn get_mut(&mut self, field: FilterField) -> &mut String {
        match field {
            FilterField::Address => &mut self.address,
            FilterField::MinPrice => &mut self.min_price,
            FilterField::MaxPrice => &mut self.max_price,
            FilterField::Bedrooms => &mut self.bedrooms,
        }
    }

    /// Set one field to its sanitized value. Any filter change returns to the
    /// first page.
    pub fn set(&mut self, field: FilterField, value: &str) {
        *self.get_mut(field) = field.sanitize(value);
        self.page = 0;
    }

    pub fn with_field(&self, field: FilterField, value: &str) -> Self {
        let mut filters = self.clone();
        filters.set(field, value);
        filters
    }

    pub fn with_page(&self, page: u32) -> Self {
        Self {
            page,
            ..self.clone()
        }
    }

    pub fn sanitized(mut self) -> Self {
        for field in FilterField::ALL {
            let value = field.sanitize(self.get(field));
            *self.get_mut(field) = value;
        }
        self.size = clamp_size(self.size);
        self
    }

    /// True when no narrowing field is set.
    pub fn is_unfiltered(&self) -> bool {
        FilterField::ALL
            .into_iter()
            .all(|field| self.get(field).is_empty())
    }

    /// Parameters for the backend search endpoint. Empty fields are left
    /// out; paging is always sent.
    pub fn search_params(&self) -> Vec<(&'static str, String)> {
        let mut params = self.field_params();
        params.push(("page", self.page.to_string()));
        params.push(("size", self.size.to_string()));
        params
    }

    fn field_params(&self) -> Vec<(&'static str, String)> {
        FilterField::ALL
            .into_iter()
            .filter(|field| !self.get(*field).is_empty())
            .map(|field| (field.key(), self.get(field).to_string()))
            .collect()
    }

    /// Encode for the browser URL, omitting empty fields, the first page and
    /// the default page size.
    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in self.field_params() {
            serializer.append_pair(key, &value);
        }
        if self.page != 0 {
            serializer.append_pair("page", &self.page.to_string());
        }
        if self.size != DEFAULT_PAGE_SIZE {
            serializer.append_pair("size", &self.size.to_string());
        }
        serializer.finish()
    }

    /// Decode from a URL query string, with or without the leading `?`.
    /// Unknown keys are ignored and malformed paging falls back to defaults.
    pub fn from_query_string(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut filters = Self::default();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            if let Some(field) = FilterField::from_key(&key) {
                *filters.get_mut(field) = field.sanitize(&value);
                continue;
            }
            match key.as_ref() {
                "page" => filters.page = value.trim().parse().unwrap_or(0),
                "size" => {
                    filters.size = clamp_size(
                        value.trim().parse().unwrap_or(DEFAULT_PAGE_SIZE),
                    )
                }
                _ => {}
            }
        }
        filters
    }
}

fn clamp_size(size: u32) -> u32 {
    if size == 0 {
        DEFAULT_PAGE_SIZE
    } else {
        size.min(MAX_PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_keeps_inner_text_of_tags() {
        assert_eq!(
            sanitize_address("<script>alert(1)</script>"),
            "alert(1)"
        );
        assert_eq!(
            sanitize_address("12 <b>Baker</b> Street"),
            "12 Baker Street"
        );
    }

    #[test]
    fn address_is_truncated_after_tags_are_stripped() {
        let long = format!("<i>{}</i>", "a".repeat(150));
        let sanitized = sanitize_address(&long);
        assert_eq!(sanitized.chars().count(), ADDRESS_MAX_LEN);
        assert!(sanitized.chars().all(|c| c == 'a'));
    }

    #[test]
    fn numeric_fields_keep_only_digits() {
        assert_eq!(sanitize_digits("£1,250,000"), "1250000");
        assert_eq!(sanitize_digits("-5e3"), "53");
        assert_eq!(sanitize_digits("123456789012345"), "1234567890");
        assert_eq!(sanitize_digits("abc"), "");
    }

    #[test]
    fn setting_a_field_resets_the_page() {
        let filters = PropertyFilters::default().with_page(4);
        let edited = filters.with_field(FilterField::Bedrooms, "3 beds");
        assert_eq!(edited.bedrooms, "3");
        assert_eq!(edited.page, 0);
    }

    #[test]
    fn query_string_round_trips() {
        let filters = PropertyFilters {
            address: "Baker Street & Co".into(),
            min_price: "100000".into(),
            max_price: String::new(),
            bedrooms: "3".into(),
            page: 2,
            size: 24,
        };
        let query = filters.to_query_string();
        assert!(!query.contains("maxPrice"));
        assert_eq!(PropertyFilters::from_query_string(&query), filters);
    }

    #[test]
    fn default_filters_encode_to_an_empty_query() {
        assert_eq!(PropertyFilters::default().to_query_string(), "");
        assert_eq!(
            PropertyFilters::from_query_string(""),
            PropertyFilters::default()
        );
    }

    #[test]
    fn hand_edited_urls_are_sanitized_on_read() {
        let filters = PropertyFilters::from_query_string(
            "?address=%3Cb%3EHigh%3C%2Fb%3E&minPrice=10k&bedrooms=two2\
             &page=-1&size=100000&color=red",
        );
        assert_eq!(filters.address, "High");
        assert_eq!(filters.min_price, "10");
        assert_eq!(filters.bedrooms, "2");
        assert_eq!(filters.page, 0);
        assert_eq!(filters.size, MAX_PAGE_SIZE);
    }

    #[test]
    fn search_params_always_include_paging() {
        let filters =
            PropertyFilters::default().with_field(FilterField::Bedrooms, "3");
        assert_eq!(
            filters.search_params(),
            vec![
                ("bedrooms", "3".to_string()),
                ("page", "0".to_string()),
                ("size", "12".to_string()),
            ]
        );
    }

    #[test]
    fn filters_differing_only_by_page_are_distinct_keys() {
        let first = PropertyFilters::default();
        assert_ne!(first, first.with_page(1));
    }
}

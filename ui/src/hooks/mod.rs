pub mod use_authentication;
pub mod use_debounced;
pub mod use_fetch;
pub mod use_list_filters;
pub mod use_logout;
pub mod use_properties;
pub mod use_property;
pub mod use_push_route;
pub mod use_title;

pub use use_authentication::use_authentication;
pub use use_debounced::use_debounced;
pub use use_fetch::{FetchHookReturn, use_fetch};
pub use use_list_filters::use_list_filters;
pub use use_logout::use_logout;
pub use use_properties::use_properties;
pub use use_property::use_property;
pub use use_push_route::use_push_route;
pub use use_title::use_title;

/// Distinguishes "not fetched yet" from "fetched and empty".
#[derive(Debug, Clone, PartialEq)]
pub enum FetchState<T> {
    NotFetched,
    Fetched(T),
}

impl<T> FetchState<T> {
    pub fn is_fetched(&self) -> bool {
        matches!(self, Self::Fetched(_))
    }

    pub fn as_ref(&self) -> Option<&T> {
        match self {
            Self::NotFetched => None,
            Self::Fetched(data) => Some(data),
        }
    }
}

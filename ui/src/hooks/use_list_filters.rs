use payloads::PropertyFilters;
use yew::prelude::*;
use yew_router::history::{BrowserHistory, History};
use yew_router::prelude::*;

use super::use_push_route::scroll_to_top;

/// The list filters as encoded in the current URL, and a callback that
/// writes new filters into the URL. The URL is the only place they are kept:
/// pushing a new query re-renders with the filters read back from it.
#[hook]
pub fn use_list_filters() -> (PropertyFilters, Callback<PropertyFilters>) {
    let query = use_location()
        .map(|location| location.query_str().to_string())
        .unwrap_or_default();
    let filters = use_memo(query, |query| {
        PropertyFilters::from_query_string(query)
    });

    let set_filters = {
        let current = filters.clone();
        Callback::from(move |filters: PropertyFilters| {
            if filters == *current {
                return;
            }
            let query = filters.to_query_string();
            let path = if query.is_empty() {
                "/".to_string()
            } else {
                format!("/?{query}")
            };
            let scroll = filters.page != current.page;
            tracing::debug!("Navigating to {path}");
            BrowserHistory::new().push(path);
            if scroll {
                scroll_to_top();
            }
        })
    };

    ((*filters).clone(), set_filters)
}

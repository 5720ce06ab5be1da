use payloads::{Page, Property, PropertyFilters};
use yew::prelude::*;
use yewdux::prelude::*;

use super::{FetchHookReturn, use_fetch::use_fetch_with_cache};
use crate::{State, get_api_client};

/// One page of listings for `filters`, cached under the full filter tuple.
#[hook]
pub fn use_properties(
    filters: PropertyFilters,
) -> FetchHookReturn<Page<Property>> {
    let (state, dispatch) = use_store::<State>();

    let get_cached = {
        let filters = filters.clone();
        move || state.cache.page(&filters).cloned()
    };

    let fetch_and_cache = {
        let filters = filters.clone();
        move || {
            let filters = filters.clone();
            let dispatch = dispatch.clone();
            async move {
                let page =
                    get_api_client().search_properties(&filters).await?;
                dispatch.reduce_mut(|s| s.cache.store_page(filters, page));
                Ok(())
            }
        }
    };

    use_fetch_with_cache(filters, get_cached, fetch_and_cache)
}

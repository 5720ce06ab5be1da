use payloads::{Property, PropertyId};
use yew::prelude::*;
use yewdux::prelude::*;

use super::{FetchHookReturn, use_fetch::use_fetch_with_cache};
use crate::{State, get_api_client};

#[hook]
pub fn use_property(id: PropertyId) -> FetchHookReturn<Property> {
    let (state, dispatch) = use_store::<State>();

    use_fetch_with_cache(
        id,
        move || state.cache.property(id).cloned(),
        move || {
            let dispatch = dispatch.clone();
            async move {
                let property = get_api_client().get_property(id).await?;
                dispatch.reduce_mut(|s| s.cache.store_property(property));
                Ok(())
            }
        },
    )
}

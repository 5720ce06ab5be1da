use payloads::ClientError;
use yew::prelude::*;
use yewdux::prelude::*;

use crate::{State, auth_config, get_api_client};

/// Hook to check the stored session with the backend on startup
#[hook]
pub fn use_authentication() {
    let (_state, dispatch) = use_store::<State>();

    use_effect_with((), move |_| {
        if !auth_config().enabled {
            return;
        }
        yew::platform::spawn_local(async move {
            let api_client = get_api_client();
            match api_client.validate_session().await {
                Ok(Some(profile)) => {
                    dispatch.reduce_mut(|state| state.login(profile));
                }
                Ok(None) => {}
                Err(ClientError::Unauthorized) => {
                    // session already cleared by the client
                    dispatch.reduce_mut(|state| state.logout());
                }
                Err(e) => {
                    // Network error or other issue, keep the stored session
                    tracing::warn!("Could not validate session: {e}");
                }
            }
        });
    });
}

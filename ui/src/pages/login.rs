use payloads::responses;
use yew::prelude::*;
use yew_router::prelude::*;
use yewdux::prelude::*;

use crate::components::LoginForm;
use crate::hooks::use_title;
use crate::{Route, State};

/// True when served from this machine, where the dev-server's seeded
/// accounts exist.
fn is_dev_mode() -> bool {
    let host = match option_env!("BACKEND_URL") {
        Some(url) => url.to_string(),
        None => web_sys::window()
            .and_then(|w| w.location().hostname().ok())
            .unwrap_or_default(),
    };
    host.contains("localhost") || host.contains("127.0.0.1")
}

#[function_component]
pub fn LoginPage() -> Html {
    use_title("Sign in");
    let navigator = use_navigator().unwrap();
    let (state, _) = use_store::<State>();

    // Redirect to home if already logged in
    {
        let navigator = navigator.clone();
        let is_authenticated = state.is_authenticated();

        use_effect_with(is_authenticated, move |is_auth| {
            if *is_auth {
                navigator.push(&Route::Home);
            }
        });
    }

    let on_success = Callback::from(move |_: responses::UserProfile| {
        navigator.push(&Route::Home);
    });

    html! {
        <div class="flex items-center justify-center min-h-[60vh]">
            <LoginForm {on_success} show_dev_credentials={is_dev_mode()} />
        </div>
    }
}

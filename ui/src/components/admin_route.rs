use payloads::auth::{Access, admin_access};
use yew::prelude::*;
use yew_router::prelude::*;
use yewdux::prelude::*;

use crate::{Route, State, auth_config};

/// Renders its children only for admins, or for everyone when auth is
/// disabled. Anonymous visitors are sent to the login page and signed-in
/// non-admins to the list.
///
/// Children, and so their hooks, are never created without access.
#[derive(Properties, PartialEq)]
pub struct AdminRouteProps {
    pub children: Children,
}

#[function_component]
pub fn AdminRoute(props: &AdminRouteProps) -> Html {
    let (state, _) = use_store::<State>();

    match admin_access(&state.auth_state, &auth_config()) {
        Access::Granted => html! { <>{for props.children.iter()}</> },
        Access::RedirectToLogin => html! { <Redirect<Route> to={Route::Login} /> },
        Access::RedirectHome => html! { <Redirect<Route> to={Route::Home} /> },
    }
}

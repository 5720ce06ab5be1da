use yew::prelude::*;
use yew_router::prelude::*;
use yewdux::prelude::*;

use crate::hooks::use_logout;
use crate::{Route, State};

const LINK_CLASS: &str = "text-sm font-medium text-neutral-700 \
    dark:text-neutral-300 hover:text-neutral-900 dark:hover:text-white \
    transition-colors";

#[function_component]
pub fn Header() -> Html {
    let (state, _) = use_store::<State>();
    let on_logout = use_logout();

    html! {
        <header class="bg-white dark:bg-neutral-800 border-b border-neutral-200 dark:border-neutral-700">
            <div class="max-w-7xl mx-auto px-4 sm:px-6 lg:px-8">
                <div class="flex justify-between items-center h-16">
                    <Link<Route> to={Route::Home} classes="text-xl font-semibold text-neutral-900 dark:text-white">
                        {"Property Manager"}
                    </Link<Route>>
                    <nav class="flex items-center space-x-6">
                        <Link<Route> to={Route::Home} classes={LINK_CLASS}>
                            {"Properties"}
                        </Link<Route>>
                        if state.is_admin() {
                            <Link<Route> to={Route::NewProperty} classes={LINK_CLASS}>
                                {"Add Property"}
                            </Link<Route>>
                        }
                        if let Some(user) = state.auth_state.user() {
                            <span class="text-sm text-neutral-500 dark:text-neutral-400">
                                {&user.username}
                            </span>
                            <button onclick={on_logout} class={LINK_CLASS}>
                                {"Logout"}
                            </button>
                        } else {
                            <Link<Route> to={Route::Login} classes={LINK_CLASS}>
                                {"Login"}
                            </Link<Route>>
                        }
                    </nav>
                </div>
            </div>
        </header>
    }
}

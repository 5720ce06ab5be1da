use std::sync::Arc;

use payloads::auth::AuthConfig;
use payloads::session::SessionStorage;
use payloads::{APIClient, PropertyId, SessionStore};
use yew::prelude::*;
use yew_router::prelude::*;

mod components;
mod contexts;
mod hooks;
mod logs;
mod pages;
mod state;

pub(crate) use state::State;

use components::{AdminRoute, MainLayout, ToastContainer};
use contexts::toast::ToastProvider;
use hooks::use_authentication;

/// Browser local storage as the session backend. Storage being unavailable
/// (private mode, disabled by policy) behaves like an empty store.
struct LocalStorage;

impl LocalStorage {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok().flatten()
    }
}

impl SessionStorage for LocalStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok().flatten()
    }

    fn set_item(&self, key: &str, value: &str) {
        if let Some(storage) = Self::storage()
            && storage.set_item(key, value).is_err()
        {
            tracing::warn!("Could not persist {key} to local storage");
        }
    }

    fn remove_item(&self, key: &str) {
        if let Some(storage) = Self::storage() {
            let _ = storage.remove_item(key);
        }
    }
}

// Global API client - configurable via environment or same-origin fallback
pub fn get_api_client() -> APIClient {
    // Try environment variable first (set at build time)
    let address = option_env!("BACKEND_URL")
        .map(|url| url.to_string())
        .unwrap_or_else(|| {
            // Fallback to same origin
            web_sys::window()
                .and_then(|window| window.location().origin().ok())
                .unwrap_or_default()
        });

    APIClient::new(address, SessionStore::new(Arc::new(LocalStorage)))
        .with_unauthorized_handler(redirect_to_login)
}

/// The stored session is already cleared by the time this runs; a full page
/// load resets the in-memory state along with it.
fn redirect_to_login() {
    if let Some(window) = web_sys::window()
        && window.location().set_href("/login").is_err()
    {
        tracing::error!("Could not navigate to /login");
    }
}

pub fn auth_config() -> AuthConfig {
    AuthConfig::from_disabled_flag(option_env!("AUTH_DISABLED"))
}

#[function_component]
pub fn App() -> Html {
    logs::init_logging();
    html! {
        <ToastProvider>
            <BrowserRouter>
                <AppInner />
            </BrowserRouter>
        </ToastProvider>
    }
}

#[function_component]
fn AppInner() -> Html {
    use_authentication();

    html! {
        <MainLayout>
            <ToastContainer />
            <Switch<Route> render={switch} />
        </MainLayout>
    }
}

#[derive(Clone, Routable, PartialEq)]
pub enum Route {
    #[at("/")]
    Home,
    #[at("/properties/new")]
    NewProperty,
    #[at("/properties/:id")]
    PropertyDetails { id: i64 },
    #[at("/properties/:id/edit")]
    EditProperty { id: i64 },
    #[at("/login")]
    Login,
    #[not_found]
    #[at("/404")]
    NotFound,
}

fn switch(routes: Route) -> Html {
    use pages::*;

    match routes {
        Route::Home => html! { <PropertyListPage /> },
        Route::NewProperty => html! {
            <AdminRoute>
                <PropertyFormPage />
            </AdminRoute>
        },
        Route::PropertyDetails { id } => html! {
            <PropertyDetailsPage id={PropertyId(id)} />
        },
        Route::EditProperty { id } => html! {
            <AdminRoute>
                <PropertyFormPage id={PropertyId(id)} />
            </AdminRoute>
        },
        Route::Login => html! { <LoginPage /> },
        Route::NotFound => html! { <NotFoundPage /> },
    }
}

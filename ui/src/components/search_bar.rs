use payloads::requests::SearchCriteria;
use payloads::{Property, PropertyId, filters::sanitize_address, format_price};
use web_sys::HtmlInputElement;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::hooks::{use_debounced, use_fetch};
use crate::{Route, get_api_client};

const SEARCH_DEBOUNCE_MS: u32 = 300;

/// Quick address search, independent of the list filters.
#[function_component]
pub fn SearchBar() -> Html {
    let term = use_state(String::new);
    let typed = {
        let term = term.clone();
        use_debounced(
            String::new(),
            SEARCH_DEBOUNCE_MS,
            Callback::from(move |value: String| term.set(value)),
        )
    };

    let results = {
        let term = (*term).clone();
        use_fetch(term.clone(), move || {
            let criteria = SearchCriteria {
                address: term.trim().to_string(),
            };
            async move {
                if criteria.address.is_empty() {
                    return Ok(None);
                }
                get_api_client().search(&criteria).await.map(Some)
            }
        })
    };

    let oninput = {
        let typed = typed.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let value = sanitize_address(&input.value());
            typed.edit(|term| *term = value);
        })
    };

    let body = if results.is_loading {
        html! {
            <p class="text-sm text-neutral-500 dark:text-neutral-400">
                {"Searching..."}
            </p>
        }
    } else if let Some(error) = results.error_message() {
        html! {
            <p class="text-sm text-red-600 dark:text-red-400">{error}</p>
        }
    } else {
        match results.data.as_ref() {
            Some(Some(found)) if found.is_empty() => html! {
                <p class="text-sm text-neutral-500 dark:text-neutral-400">
                    {format!("No properties found matching \"{}\"", *term)}
                </p>
            },
            Some(Some(found)) => html! {
                <ul class="divide-y divide-neutral-200 dark:divide-neutral-700">
                    {for found.iter().map(result_row)}
                </ul>
            },
            _ => html! {},
        }
    };

    html! {
        <div class="mb-6">
            <input
                type="search"
                value={typed.value()}
                {oninput}
                placeholder="Quick search by address"
                class="w-full px-4 py-2 border border-neutral-300 dark:border-neutral-600
                       rounded-md bg-white dark:bg-neutral-700
                       text-neutral-900 dark:text-neutral-100
                       focus:outline-none focus:ring-2 focus:ring-neutral-500"
            />
            <div class="mt-2">{body}</div>
        </div>
    }
}

fn result_row(property: &Property) -> Html {
    let label = html! {
        <div class="flex justify-between py-2 text-sm">
            <span class="text-neutral-800 dark:text-neutral-200">
                {&property.address}
            </span>
            <span class="text-neutral-500 dark:text-neutral-400">
                {format_price(property.price)}
            </span>
        </div>
    };
    match property.id {
        Some(PropertyId(id)) => html! {
            <li>
                <Link<Route> to={Route::PropertyDetails { id }}>{label}</Link<Route>>
            </li>
        },
        None => html! { <li>{label}</li> },
    }
}

use payloads::PropertyFilters;
use payloads::filters::{FILTER_DEBOUNCE_MS, FilterField};
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::hooks::use_debounced;

#[derive(Properties, PartialEq)]
pub struct Props {
    /// The filters currently in effect
    pub filters: PropertyFilters,
    /// Called with the complete, sanitized filters once typing pauses
    pub on_change: Callback<PropertyFilters>,
}

fn label(field: FilterField) -> &'static str {
    match field {
        FilterField::Address => "Address",
        FilterField::MinPrice => "Min price",
        FilterField::MaxPrice => "Max price",
        FilterField::Bedrooms => "Bedrooms",
    }
}

fn placeholder(field: FilterField) -> &'static str {
    match field {
        FilterField::Address => "Street, town or postcode",
        FilterField::MinPrice
        | FilterField::MaxPrice
        | FilterField::Bedrooms => "Any",
    }
}

#[function_component]
pub fn FilterPanel(props: &Props) -> Html {
    let draft = use_debounced(
        props.filters.clone(),
        FILTER_DEBOUNCE_MS,
        props.on_change.clone(),
    );

    // Follow outside changes (back button, pagination) unless mid-edit
    {
        let draft = draft.clone();
        use_effect_with(props.filters.clone(), move |filters| {
            if !draft.is_pending() && draft.value() != *filters {
                draft.reset(filters.clone());
            }
        });
    }

    let on_clear = {
        let draft = draft.clone();
        let on_change = props.on_change.clone();
        let size = props.filters.size;
        Callback::from(move |_: MouseEvent| {
            let cleared = PropertyFilters {
                size,
                ..Default::default()
            };
            draft.reset(cleared.clone());
            on_change.emit(cleared);
        })
    };

    let current = draft.value();
    let input = |field: FilterField| {
        let draft = draft.clone();
        let oninput = Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let value = input.value();
            draft.edit(|filters| filters.set(field, &value));
        });
        let id = format!("filter-{}", field.key());
        let numeric = field != FilterField::Address;

        html! {
            <div>
                <label for={id.clone()} class="block text-sm font-medium text-neutral-700 dark:text-neutral-300 mb-1">
                    {label(field)}
                </label>
                <input
                    id={id}
                    type="text"
                    inputmode={if numeric { "numeric" } else { "text" }}
                    value={current.get(field).to_string()}
                    placeholder={placeholder(field)}
                    {oninput}
                    class="w-full px-3 py-2 text-sm border border-neutral-300 dark:border-neutral-600
                           rounded-md bg-white dark:bg-neutral-700
                           text-neutral-900 dark:text-neutral-100
                           focus:outline-none focus:ring-2 focus:ring-neutral-500"
                />
            </div>
        }
    };

    html! {
        <div class="bg-white dark:bg-neutral-800 rounded-lg border border-neutral-200 dark:border-neutral-700 p-4 mb-6">
            <div class="grid grid-cols-1 md:grid-cols-5 gap-4 items-end">
                <div class="md:col-span-2">{input(FilterField::Address)}</div>
                {input(FilterField::MinPrice)}
                {input(FilterField::MaxPrice)}
                {input(FilterField::Bedrooms)}
            </div>
            if !current.is_unfiltered() {
                <div class="mt-3 text-right">
                    <button
                        onclick={on_clear}
                        class="text-sm text-neutral-600 dark:text-neutral-400 hover:text-neutral-900 dark:hover:text-neutral-100 underline"
                    >
                        {"Clear filters"}
                    </button>
                </div>
            }
        </div>
    }
}

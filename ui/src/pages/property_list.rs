use payloads::pagination::ListView;
use yew::prelude::*;

use crate::components::{
    FilterPanel, PaginationControls, PropertyCard, SearchBar,
};
use crate::hooks::{use_list_filters, use_properties, use_title};

#[function_component]
pub fn PropertyListPage() -> Html {
    use_title("");
    let (filters, set_filters) = use_list_filters();
    let properties = use_properties(filters.clone());

    let on_page_change = {
        let filters = filters.clone();
        let set_filters = set_filters.clone();
        Callback::from(move |page: u32| set_filters.emit(filters.with_page(page)))
    };

    // cached pages render at once, even while another fetch is in flight
    let is_loading = properties.is_loading && !properties.data.is_fetched();
    let error = properties.error_message();
    let view = ListView::new(
        is_loading,
        error.as_deref(),
        properties.data.as_ref(),
    );

    let empty_message = if filters.is_unfiltered() {
        "No properties listed yet."
    } else {
        "No properties match your filters."
    };

    let content = match view {
        ListView::Loading => html! {
            <div class="text-center py-12">
                <div class="inline-block animate-spin rounded-full h-8 w-8 border-2 border-neutral-900 dark:border-neutral-100 border-t-transparent dark:border-t-transparent"></div>
                <p class="mt-2 text-neutral-600 dark:text-neutral-400">
                    {"Loading properties..."}
                </p>
            </div>
        },
        ListView::Error(message) => html! {
            <div class="p-4 rounded-md bg-red-50 dark:bg-red-900/20 border border-red-200 dark:border-red-800">
                <p class="text-sm text-red-700 dark:text-red-400">{message}</p>
            </div>
        },
        ListView::Empty => html! {
            <div class="text-center py-12">
                <p class="text-neutral-600 dark:text-neutral-400">
                    {empty_message}
                </p>
            </div>
        },
        ListView::Grid {
            properties: page,
            pagination,
        } => html! {
            <>
                <div class="grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-3 gap-6">
                    {for page.iter().map(|property| html! {
                        <PropertyCard
                            key={property.id.map(|id| id.0).unwrap_or_default()}
                            property={property.clone()}
                        />
                    })}
                </div>
                if let Some(view) = pagination {
                    <PaginationControls
                        {view}
                        {on_page_change}
                        is_loading={properties.is_loading}
                    />
                }
            </>
        },
    };

    html! {
        <div>
            <h1 class="text-2xl font-bold text-neutral-900 dark:text-neutral-100 mb-6">
                {"Properties"}
            </h1>
            <SearchBar />
            <FilterPanel {filters} on_change={set_filters} />
            {content}
        </div>
    }
}

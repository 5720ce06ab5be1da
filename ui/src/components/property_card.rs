use payloads::{Property, PropertyId, format_price};
use yew::prelude::*;
use yew_router::prelude::*;

use crate::{Route, get_api_client};

#[derive(Properties, PartialEq)]
pub struct Props {
    pub property: Property,
}

#[function_component]
pub fn PropertyCard(props: &Props) -> Html {
    let property = &props.property;
    let cover = property
        .images
        .first()
        .map(|image| get_api_client().image_url(&image.url));

    let details = html! {
        <div class="bg-white dark:bg-neutral-800 rounded-lg shadow-sm overflow-hidden \
                    border border-neutral-200 dark:border-neutral-700 \
                    hover:shadow-md transition-shadow">
            if let Some(src) = cover {
                <img src={src} alt={property.address.clone()} class="w-full h-48 object-cover" />
            } else {
                <div class="w-full h-48 flex items-center justify-center \
                            bg-neutral-100 dark:bg-neutral-700 \
                            text-sm text-neutral-500 dark:text-neutral-400">
                    {"No Image"}
                </div>
            }
            <div class="p-4 space-y-2">
                <p class="text-lg font-semibold text-neutral-900 dark:text-neutral-100">
                    {format_price(property.price)}
                </p>
                <p class="text-sm text-neutral-700 dark:text-neutral-300 truncate">
                    {&property.address}
                </p>
                <p class="text-sm text-neutral-500 dark:text-neutral-400">
                    {format!(
                        "{} bed · {} bath · {} sq ft",
                        property.bedrooms,
                        property.bathrooms,
                        property.square_footage
                    )}
                </p>
            </div>
        </div>
    };

    // unsaved records have nowhere to link to
    match property.id {
        Some(PropertyId(id)) => html! {
            <Link<Route> to={Route::PropertyDetails { id }} classes="block">
                {details}
            </Link<Route>>
        },
        None => details,
    }
}

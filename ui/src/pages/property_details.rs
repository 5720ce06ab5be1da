use payloads::{Property, PropertyId, format_price};
use yew::prelude::*;
use yew_router::prelude::*;
use yewdux::prelude::*;

use crate::components::{ConfirmationModal, ImageSlider};
use crate::contexts::toast::use_toast;
use crate::hooks::{use_property, use_push_route, use_title};
use crate::{Route, State, get_api_client};

#[derive(Properties, PartialEq)]
pub struct Props {
    pub id: PropertyId,
}

#[function_component]
pub fn PropertyDetailsPage(props: &Props) -> Html {
    let property = use_property(props.id);
    use_title(
        property
            .data
            .as_ref()
            .map(|p| p.address.as_str())
            .unwrap_or("Property"),
    );

    if property.is_not_found() {
        return html! {
            <div class="text-center py-12 space-y-4">
                <h1 class="text-2xl font-bold text-neutral-900 dark:text-neutral-100">
                    {"Property not found"}
                </h1>
                <Link<Route> to={Route::Home} classes="text-sm font-medium underline text-neutral-900 dark:text-neutral-100">
                    {"Back to properties"}
                </Link<Route>>
            </div>
        };
    }

    let id = props.id;
    property.render("property", move |property, _| {
        html! { <PropertyDetails {id} property={property.clone()} /> }
    })
}

#[derive(Properties, PartialEq)]
struct DetailsProps {
    id: PropertyId,
    property: Property,
}

#[function_component]
fn PropertyDetails(props: &DetailsProps) -> Html {
    let (state, dispatch) = use_store::<State>();
    let toast = use_toast();
    let push_route = use_push_route();
    let show_confirm = use_state(|| false);
    let is_deleting = use_state(|| false);
    let delete_error = use_state(|| None::<String>);

    let id = props.id;
    let property = &props.property;

    let on_delete_click = {
        let show_confirm = show_confirm.clone();
        Callback::from(move |_: MouseEvent| show_confirm.set(true))
    };

    let on_close = {
        let show_confirm = show_confirm.clone();
        let delete_error = delete_error.clone();
        Callback::from(move |_| {
            show_confirm.set(false);
            delete_error.set(None);
        })
    };

    let on_confirm = {
        let is_deleting = is_deleting.clone();
        let delete_error = delete_error.clone();
        Callback::from(move |_| {
            let is_deleting = is_deleting.clone();
            let delete_error = delete_error.clone();
            let dispatch = dispatch.clone();
            let toast = toast.clone();
            let push_route = push_route.clone();

            yew::platform::spawn_local(async move {
                is_deleting.set(true);
                match get_api_client().delete_property(id).await {
                    Ok(()) => {
                        dispatch.reduce_mut(|s| s.cache.invalidate(id));
                        toast.success("Property deleted");
                        push_route.emit(Route::Home);
                    }
                    Err(e) => {
                        tracing::warn!("Could not delete property {id}: {e}");
                        delete_error.set(Some(e.user_message()));
                        is_deleting.set(false);
                    }
                }
            });
        })
    };

    let stat = |label: &'static str, value: String| {
        html! {
            <div class="p-4 rounded-lg bg-neutral-100 dark:bg-neutral-800 text-center">
                <p class="text-lg font-semibold text-neutral-900 dark:text-neutral-100">{value}</p>
                <p class="text-xs uppercase tracking-wide text-neutral-500 dark:text-neutral-400">{label}</p>
            </div>
        }
    };

    html! {
        <div class="space-y-6">
            <Link<Route> to={Route::Home} classes="text-sm text-neutral-600 dark:text-neutral-400 hover:underline">
                {"← Back to properties"}
            </Link<Route>>

            <ImageSlider images={property.images.clone()} alt={property.address.clone()} />

            <div class="flex flex-col sm:flex-row sm:items-start sm:justify-between gap-4">
                <div>
                    <p class="text-3xl font-bold text-neutral-900 dark:text-neutral-100">
                        {format_price(property.price)}
                    </p>
                    <h1 class="text-lg text-neutral-700 dark:text-neutral-300">
                        {&property.address}
                    </h1>
                </div>
                if state.is_admin() {
                    <div class="flex gap-3">
                        <Link<Route>
                            to={Route::EditProperty { id: id.0 }}
                            classes="px-4 py-2 text-sm font-medium rounded-md border border-neutral-300 dark:border-neutral-600 text-neutral-700 dark:text-neutral-300 hover:bg-neutral-50 dark:hover:bg-neutral-700"
                        >
                            {"Edit"}
                        </Link<Route>>
                        <button
                            onclick={on_delete_click}
                            class="px-4 py-2 text-sm font-medium rounded-md text-white bg-red-600 hover:bg-red-700"
                        >
                            {"Delete"}
                        </button>
                    </div>
                }
            </div>

            <div class="grid grid-cols-3 gap-4">
                {stat("Bedrooms", property.bedrooms.to_string())}
                {stat("Bathrooms", property.bathrooms.to_string())}
                {stat("Sq ft", property.square_footage.to_string())}
            </div>

            <div>
                <h2 class="text-lg font-semibold text-neutral-900 dark:text-neutral-100 mb-2">
                    {"Description"}
                </h2>
                if property.description.trim().is_empty() {
                    <p class="text-neutral-500 dark:text-neutral-400 italic">
                        {"No description available."}
                    </p>
                } else {
                    <p class="text-neutral-700 dark:text-neutral-300 whitespace-pre-line">
                        {&property.description}
                    </p>
                }
            </div>

            if *show_confirm {
                <ConfirmationModal
                    title="Delete Property"
                    message={format!("{} will be removed permanently.", property.address)}
                    confirm_text="Delete"
                    {on_confirm}
                    {on_close}
                    is_loading={*is_deleting}
                    error_message={(*delete_error).clone().map(AttrValue::from)}
                />
            }
        </div>
    }
}

use std::cell::RefCell;
use std::rc::Rc;

use payloads::form::{
    FormMode, FormPhase, PropertyField, PropertyForm, SubmitError,
    submit_property,
};
use payloads::requests::UploadFile;
use payloads::{Image, ImageId, PropertyId};
use web_sys::{HtmlInputElement, HtmlTextAreaElement};
use yew::prelude::*;
use yewdux::prelude::*;

use crate::components::ImageUpload;
use crate::components::image_upload::preview_url;
use crate::contexts::toast::use_toast;
use crate::hooks::{use_push_route, use_title};
use crate::{Route, State, get_api_client};

#[derive(Properties, PartialEq)]
pub struct Props {
    /// Edit this property; create a new one when absent
    #[prop_or_default]
    pub id: Option<PropertyId>,
}

const INPUT_CLASS: &str = "w-full px-3 py-2 border rounded-md shadow-sm \
    bg-white dark:bg-neutral-700 text-neutral-900 dark:text-neutral-100 \
    focus:outline-none focus:ring-2 focus:ring-neutral-500 \
    disabled:opacity-50";

/// Shared handle on the form so async completions see the latest state.
#[derive(Clone)]
struct FormHandle {
    form: Rc<RefCell<PropertyForm>>,
    rerender: UseForceUpdateHandle,
}

impl FormHandle {
    fn update<R>(&self, f: impl FnOnce(&mut PropertyForm) -> R) -> R {
        let result = f(&mut self.form.borrow_mut());
        self.rerender.force_update();
        result
    }

    fn snapshot(&self) -> PropertyForm {
        self.form.borrow().clone()
    }
}

#[function_component]
pub fn PropertyFormPage(props: &Props) -> Html {
    let mode = match props.id {
        Some(id) => FormMode::Edit(id),
        None => FormMode::Create,
    };
    use_title(match mode {
        FormMode::Create => "Add Property",
        FormMode::Edit(_) => "Edit Property",
    });

    let (_, dispatch) = use_store::<State>();
    let toast = use_toast();
    let push_route = use_push_route();
    let handle = FormHandle {
        form: use_mut_ref(move || PropertyForm::new(mode)),
        rerender: use_force_update(),
    };

    // Leave Idle, prefilling from the backend when editing
    {
        let handle = handle.clone();
        use_effect_with((), move |_| {
            if let Some(id) = handle.update(PropertyForm::start) {
                yew::platform::spawn_local(async move {
                    match get_api_client().get_property(id).await {
                        Ok(property) => handle.update(|f| f.loaded(&property)),
                        Err(e) => {
                            tracing::warn!("Could not load property {id}: {e}");
                            handle.update(|f| f.load_failed(&e));
                        }
                    }
                });
            }
        });
    }

    let on_field = |field: PropertyField| {
        let handle = handle.clone();
        Callback::from(move |value: String| {
            handle.update(|f| f.set_field(field, value));
        })
    };

    let on_files = {
        let handle = handle.clone();
        Callback::from(move |files: Vec<UploadFile>| {
            handle.update(|f| f.add_files(files));
        })
    };

    let on_remove_file = {
        let handle = handle.clone();
        Callback::from(move |index: usize| {
            handle.update(|f| f.remove_file(index));
        })
    };

    // Deleting a stored image takes effect at once, not on submit
    let on_delete_image = {
        let handle = handle.clone();
        let toast = toast.clone();
        let dispatch = dispatch.clone();
        Callback::from(move |image_id: ImageId| {
            let handle = handle.clone();
            let toast = toast.clone();
            let dispatch = dispatch.clone();
            yew::platform::spawn_local(async move {
                match get_api_client().delete_image(image_id).await {
                    Ok(()) => {
                        handle.update(|f| f.image_deleted(image_id));
                        if let Some(id) = handle.snapshot().mode.property_id()
                        {
                            dispatch.reduce_mut(|s| s.cache.invalidate(id));
                        }
                    }
                    Err(e) => toast.error(e.user_message()),
                }
            });
        })
    };

    let on_submit = {
        let handle = handle.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let Some(property) = handle.update(PropertyForm::begin_submit)
            else {
                return;
            };
            let form = handle.snapshot();
            let handle = handle.clone();
            let dispatch = dispatch.clone();
            let toast = toast.clone();
            let push_route = push_route.clone();

            yew::platform::spawn_local(async move {
                let result = submit_property(
                    &get_api_client(),
                    form.mode,
                    &property,
                    &form.files,
                )
                .await;
                handle.update(|f| f.finish_submit(&result));

                match result {
                    Ok(saved) => {
                        dispatch.reduce_mut(|s| s.cache.saved(&saved));
                        toast.success("Property saved");
                        let route = match (form.mode, saved.id) {
                            (FormMode::Edit(_), Some(PropertyId(id))) => {
                                Route::PropertyDetails { id }
                            }
                            _ => Route::Home,
                        };
                        push_route.emit(route);
                    }
                    // saved without its images: the form stays
                    Err(
                        SubmitError::UploadFailed { property, .. }
                        | SubmitError::SavedWithoutId(property),
                    ) => {
                        dispatch.reduce_mut(|s| s.cache.saved(&property));
                    }
                    Err(_) => {}
                }
            });
        })
    };

    let form = handle.snapshot();
    let disabled = form.is_submitting();

    if matches!(form.phase, FormPhase::Idle | FormPhase::LoadingExisting) {
        return html! {
            <div class="text-center py-12">
                <p class="text-neutral-600 dark:text-neutral-400">
                    {"Loading property..."}
                </p>
            </div>
        };
    }

    let render_field = |field: PropertyField| {
        let value = form.draft.get(field).to_string();
        let error = form.field_errors.for_field(field).map(str::to_string);
        let id = format!("property-{}", field.key());
        let on_change = on_field(field);
        let border = if error.is_some() {
            "border-red-500"
        } else {
            "border-neutral-300 dark:border-neutral-600"
        };

        let input = match field {
            PropertyField::Description => html! {
                <textarea
                    id={id.clone()}
                    rows="4"
                    value={value}
                    {disabled}
                    class={classes!(INPUT_CLASS, border)}
                    oninput={on_change.reform(|e: InputEvent| {
                        e.target_unchecked_into::<HtmlTextAreaElement>().value()
                    })}
                />
            },
            _ => {
                let (kind, step) = match field {
                    PropertyField::Address => ("text", None),
                    PropertyField::Bathrooms => ("number", Some("0.5")),
                    _ => ("number", Some("1")),
                };
                html! {
                    <input
                        id={id.clone()}
                        type={kind}
                        step={step}
                        min={step.map(|_| "0")}
                        value={value}
                        {disabled}
                        class={classes!(INPUT_CLASS, border)}
                        oninput={on_change.reform(|e: InputEvent| {
                            e.target_unchecked_into::<HtmlInputElement>().value()
                        })}
                    />
                }
            }
        };

        html! {
            <div>
                <label for={id} class="block text-sm font-medium text-neutral-700 dark:text-neutral-300 mb-1">
                    {field.label()}
                </label>
                {input}
                if let Some(error) = error {
                    <p class="mt-1 text-sm text-red-600 dark:text-red-400">{error}</p>
                }
            </div>
        }
    };

    let title = match form.mode {
        FormMode::Create => "Add Property",
        FormMode::Edit(_) => "Edit Property",
    };

    html! {
        <div class="max-w-2xl mx-auto">
            <h1 class="text-2xl font-bold text-neutral-900 dark:text-neutral-100 mb-6">
                {title}
            </h1>

            <form onsubmit={on_submit} class="space-y-6 bg-white dark:bg-neutral-800 p-6 rounded-lg shadow-sm">
                if let Some(error) = &form.error {
                    <div class="p-4 rounded-md bg-red-50 dark:bg-red-900/20 border border-red-200 dark:border-red-800">
                        <p class="text-sm text-red-700 dark:text-red-400">{error}</p>
                    </div>
                }

                {render_field(PropertyField::Address)}
                {render_field(PropertyField::Description)}
                <div class="grid grid-cols-2 gap-4">
                    {render_field(PropertyField::Price)}
                    {render_field(PropertyField::SquareFootage)}
                    {render_field(PropertyField::Bedrooms)}
                    {render_field(PropertyField::Bathrooms)}
                </div>

                <div class="space-y-3">
                    <h2 class="text-sm font-medium text-neutral-700 dark:text-neutral-300">
                        {"Images"}
                    </h2>
                    <ExistingImages
                        images={form.existing_images.clone()}
                        on_delete={on_delete_image}
                        {disabled}
                    />
                    <div class="flex flex-wrap gap-3">
                        {for form.files.iter().enumerate().map(|(index, file)| {
                            let on_remove = on_remove_file.reform(move |_: MouseEvent| index);
                            html! {
                                <div class="relative">
                                    <img src={preview_url(file)} alt={file.file_name.clone()} class="h-24 w-24 object-cover rounded-md" />
                                    <button
                                        type="button"
                                        onclick={on_remove}
                                        {disabled}
                                        class="absolute top-1 right-1 px-1.5 rounded-full bg-black/60 text-white text-xs"
                                        title="Remove"
                                    >
                                        {"×"}
                                    </button>
                                </div>
                            }
                        })}
                    </div>
                    <ImageUpload {on_files} {disabled} />
                </div>

                <button
                    type="submit"
                    {disabled}
                    class="w-full py-2 px-4 rounded-md text-sm font-medium text-white
                           bg-neutral-900 hover:bg-neutral-800
                           dark:bg-neutral-100 dark:text-neutral-900 dark:hover:bg-neutral-200
                           disabled:opacity-50 disabled:cursor-not-allowed transition-colors"
                >
                    if disabled {
                        {"Saving..."}
                    } else if form.mode == FormMode::Create {
                        {"Create Property"}
                    } else {
                        {"Save Changes"}
                    }
                </button>
            </form>
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct ExistingImagesProps {
    images: Vec<Image>,
    on_delete: Callback<ImageId>,
    disabled: bool,
}

#[function_component]
fn ExistingImages(props: &ExistingImagesProps) -> Html {
    if props.images.is_empty() {
        return html! {};
    }
    let client = get_api_client();

    html! {
        <div class="flex flex-wrap gap-3">
            {for props.images.iter().map(|image| {
                let image_id = image.id;
                let on_delete = props.on_delete.reform(move |_: MouseEvent| image_id);
                html! {
                    <div key={image.id.0} class="relative">
                        <img src={client.image_url(&image.url)} alt={image.file_name.clone()} class="h-24 w-24 object-cover rounded-md" />
                        <button
                            type="button"
                            onclick={on_delete}
                            disabled={props.disabled}
                            class="absolute top-1 right-1 px-1.5 rounded-full bg-red-600 text-white text-xs"
                            title="Delete image"
                        >
                            {"×"}
                        </button>
                    </div>
                }
            })}
        </div>
    }
}

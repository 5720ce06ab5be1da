use yew::prelude::*;

const APP_NAME: &str = "Property Manager";

/// Sets the document title to "{title} | Property Manager", or just the app
/// name for an empty title.
#[hook]
pub fn use_title(title: &str) {
    let title = if title.is_empty() {
        APP_NAME.to_string()
    } else {
        format!("{title} | {APP_NAME}")
    };
    use_effect_with(title, |title| {
        if let Some(doc) = web_sys::window().and_then(|w| w.document()) {
            doc.set_title(title);
        }
    });
}

use payloads::Image;
use yew::prelude::*;

use crate::get_api_client;

#[derive(Properties, PartialEq)]
pub struct Props {
    pub images: Vec<Image>,
    #[prop_or_default]
    pub alt: AttrValue,
}

/// Steps from `current` by `delta`, wrapping around at both ends.
fn wrap(current: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    (current as isize + delta).rem_euclid(len as isize) as usize
}

/// Image carousel with previous/next buttons, dot navigation and an
/// "n / total" counter.
#[function_component]
pub fn ImageSlider(props: &Props) -> Html {
    let current = use_state(|| 0usize);
    let len = props.images.len();

    // A shorter list after an image is deleted must not leave us past the end
    let index = if *current < len { *current } else { 0 };

    let Some(image) = props.images.get(index) else {
        return html! {
            <div class="w-full h-80 flex items-center justify-center rounded-lg
                        bg-neutral-100 dark:bg-neutral-800
                        text-neutral-500 dark:text-neutral-400">
                {"No Images Available"}
            </div>
        };
    };

    let step = |delta: isize| {
        let current = current.clone();
        Callback::from(move |_: MouseEvent| {
            current.set(wrap(index, delta, len));
        })
    };

    let arrow_class = "absolute top-1/2 -translate-y-1/2 px-3 py-2 rounded-full \
                       bg-black/40 hover:bg-black/60 text-white text-lg";

    html! {
        <div class="relative w-full">
            <img
                src={get_api_client().image_url(&image.url)}
                alt={props.alt.clone()}
                class="w-full h-80 object-cover rounded-lg"
            />
            if len > 1 {
                <button onclick={step(-1)} class={classes!(arrow_class, "left-3")} title="Previous image">
                    {"‹"}
                </button>
                <button onclick={step(1)} class={classes!(arrow_class, "right-3")} title="Next image">
                    {"›"}
                </button>
                <div class="absolute bottom-3 left-1/2 -translate-x-1/2 flex space-x-2">
                    {for (0..len).map(|dot| {
                        let current = current.clone();
                        let onclick = Callback::from(move |_: MouseEvent| current.set(dot));
                        let fill = if dot == index { "bg-white" } else { "bg-white/50" };
                        html! {
                            <button
                                {onclick}
                                class={classes!("w-2.5", "h-2.5", "rounded-full", fill)}
                                title={format!("Image {}", dot + 1)}
                            />
                        }
                    })}
                </div>
            }
            <span class="absolute top-3 right-3 px-2 py-1 rounded bg-black/50 text-xs text-white">
                {format!("{} / {}", index + 1, len)}
            </span>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::wrap;

    #[test]
    fn stepping_wraps_at_both_ends() {
        assert_eq!(wrap(0, -1, 3), 2);
        assert_eq!(wrap(2, 1, 3), 0);
        assert_eq!(wrap(1, 1, 3), 2);
        assert_eq!(wrap(0, 1, 0), 0);
    }
}

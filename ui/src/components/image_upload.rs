//! File picker that reads the chosen images into memory for upload on
//! submit.

use std::cell::RefCell;
use std::rc::Rc;

use base64::{Engine as _, engine::general_purpose};
use payloads::requests::UploadFile;
use wasm_bindgen::prelude::*;
use web_sys::{Event, File, FileReader, HtmlInputElement};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct Props {
    /// Called once per selection with every file read, in selection order
    pub on_files: Callback<Vec<UploadFile>>,
    #[prop_or_default]
    pub disabled: bool,
}

/// A `data:` URL for showing a file before it is uploaded.
pub fn preview_url(file: &UploadFile) -> String {
    format!(
        "data:{};base64,{}",
        file.content_type,
        general_purpose::STANDARD.encode(&file.data)
    )
}

/// Selected files still being read; emits when the last one finishes.
struct PendingReads {
    files: Vec<Option<UploadFile>>,
    remaining: usize,
    on_files: Callback<Vec<UploadFile>>,
}

impl PendingReads {
    fn finish(&mut self, index: usize, file: Option<UploadFile>) {
        self.files[index] = file;
        self.remaining -= 1;
        if self.remaining == 0 {
            let files = self.files.drain(..).flatten().collect();
            self.on_files.emit(files);
        }
    }
}

fn read_file(file: File, index: usize, pending: Rc<RefCell<PendingReads>>) {
    let Ok(reader) = FileReader::new() else {
        pending.borrow_mut().finish(index, None);
        return;
    };
    let reader_clone = reader.clone();
    let file_name = file.name();
    let content_type = match file.type_() {
        t if t.is_empty() => "application/octet-stream".to_string(),
        t => t,
    };

    let finished = pending.clone();
    let onload = Closure::wrap(Box::new(move |_: Event| {
        let read = reader_clone.result().ok().map(|result| {
            let data = js_sys::Uint8Array::new(&result).to_vec();
            UploadFile::new(file_name.clone(), content_type.clone(), data)
        });
        if read.is_none() {
            tracing::warn!("Could not read {file_name}");
        }
        finished.borrow_mut().finish(index, read);
    }) as Box<dyn FnMut(_)>);

    reader.set_onload(Some(onload.as_ref().unchecked_ref()));
    if reader.read_as_array_buffer(&file).is_err() {
        pending.borrow_mut().finish(index, None);
        return;
    }
    onload.forget();
}

#[function_component]
pub fn ImageUpload(props: &Props) -> Html {
    let onchange = {
        let on_files = props.on_files.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let Some(list) = input.files() else {
                return;
            };
            let files: Vec<File> =
                (0..list.length()).filter_map(|i| list.get(i)).collect();
            // allow choosing the same file again
            input.set_value("");
            if files.is_empty() {
                return;
            }

            let pending = Rc::new(RefCell::new(PendingReads {
                files: vec![None; files.len()],
                remaining: files.len(),
                on_files: on_files.clone(),
            }));
            for (index, file) in files.into_iter().enumerate() {
                read_file(file, index, pending.clone());
            }
        })
    };

    html! {
        <label class="inline-flex items-center px-4 py-2 text-sm font-medium cursor-pointer
                      text-neutral-700 dark:text-neutral-300 bg-white dark:bg-neutral-700
                      border border-neutral-300 dark:border-neutral-600 rounded-md
                      hover:bg-neutral-50 dark:hover:bg-neutral-600">
            {"Choose images"}
            <input
                type="file"
                accept="image/*"
                multiple={true}
                class="hidden"
                disabled={props.disabled}
                {onchange}
            />
        </label>
    }
}

//! Lotte Vegi List Widget (Leptos + WASM)

mod app;
mod browser;
mod components;

use wasm_bindgen::prelude::*;
use leptos::prelude::*;
use app::App;

/// ホストページ上のマウント先
const ROOT_ID: &str = "lotte-vegi-list-root";

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();

    let root = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(ROOT_ID));
    let config = app::sort_config_from(root.as_ref());

    match root.and_then(|el| el.dyn_into::<web_sys::HtmlElement>().ok()) {
        Some(el) => leptos::mount::mount_to(el, move || view! { <App config=config /> }).forget(),
        None => leptos::mount::mount_to_body(move || view! { <App config=config /> }),
    }
}

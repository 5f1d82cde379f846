//! ヘッダーコンポーネント

use leptos::prelude::*;
use crate::app::WidgetHandle;
use crate::components::pick_menu::PickMenu;

#[component]
pub fn Header(handle: WidgetHandle) -> impl IntoView {
    let sort_label = handle.peek(|c| c.sort_label());

    view! {
        <div class="flex flex-row items-center gap-4 border-b border-black/5 py-4 relative">
            <img
                src="/static/logo.png"
                alt="Lotte Vegetables"
                class="w-16 h-16 rounded-xl object-cover ring ring-black/5"
                loading="lazy"
                on:error=|ev| {
                    let img: web_sys::HtmlElement = event_target(&ev);
                    let _ = img.style().set_property("display", "none");
                }
            />
            <div class="flex-1">
                <div class="text-base sm:text-xl font-medium">"Lotte Fresh Vegetables"</div>
                <div class="text-sm text-black/60">{sort_label}</div>
            </div>
            <PickMenu handle=handle />
        </div>
    }
}

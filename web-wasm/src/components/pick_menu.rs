//! 찜ボタンと選択操作メニュー

use leptos::prelude::*;
use crate::app::{deliver, WidgetHandle};

#[component]
pub fn PickMenu(handle: WidgetHandle) -> impl IntoView {
    let menu_open = move || handle.read(|c| c.menu_open());
    let picked_count = move || handle.read(|c| c.picked_count());
    let show_only_label = move || {
        if handle.read(|c| c.show_only_picked()) {
            "선택 해제 포함하여 보기"
        } else {
            "선택한 항목만 보기"
        }
    };

    view! {
        <div class="relative">
            <button
                type="button"
                class="cursor-pointer inline-flex items-center rounded-full bg-[#22C55E] text-white px-4 py-1.5 sm:text-md text-sm font-medium hover:opacity-90 active:opacity-100"
                aria-haspopup="true"
                aria-expanded=move || menu_open().to_string()
                title="선택 항목 액션"
                on:click=move |_| {
                    handle.update(|c| c.toggle_menu());
                }
            >
                {move || format!("찜 {}", picked_count())}
            </button>

            <Show when=menu_open>
                <div
                    class="absolute right-0 mt-2 w-52 rounded-xl border border-black/10 bg-white shadow-lg z-20"
                    role="menu"
                >
                    <button
                        class="w-full text-left px-3 py-2 hover:bg-green-50 rounded-t-xl"
                        role="menuitem"
                        on:click=move |_| {
                            handle.update(|c| c.toggle_show_only_picked());
                        }
                    >
                        {show_only_label}
                    </button>
                    <button
                        class="w-full text-left px-3 py-2 hover:bg-green-50"
                        role="menuitem"
                        on:click=move |_| {
                            if let Some(followup) = handle.update(|c| c.copy_links()) {
                                deliver(followup);
                            }
                        }
                    >
                        "선택 링크 복사"
                    </button>
                    <button
                        class="w-full text-left px-3 py-2 hover:bg-green-50 rounded-b-xl"
                        role="menuitem"
                        on:click=move |_| {
                            // ポップアップ許可のためクリック中に同期で開く
                            if let Some(followup) = handle.update(|c| c.open_all()) {
                                deliver(followup);
                            }
                        }
                    >
                        "선택 링크 모두 열기"
                    </button>
                </div>
            </Show>
        </div>
    }
}

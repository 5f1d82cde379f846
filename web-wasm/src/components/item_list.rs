//! 野菜リストコンポーネント

use leptos::prelude::*;
use lotte_vegi_common::ItemRecord;
use crate::app::WidgetHandle;

#[component]
pub fn ItemList(handle: WidgetHandle) -> impl IntoView {
    let rows = move || {
        handle.read(|c| {
            c.visible_items()
                .into_iter()
                .cloned()
                .enumerate()
                .collect::<Vec<_>>()
        })
    };

    view! {
        <div class="flex flex-col">
            <For
                each=rows
                key=|(i, item)| (*i, item.id.clone())
                children=move |(i, item)| {
                    view! { <ItemRow handle=handle index=i item=item /> }
                }
            />
        </div>
    }
}

#[component]
fn ItemRow(handle: WidgetHandle, index: usize, item: ItemRecord) -> impl IntoView {
    let id = item.id.clone();
    let is_picked = {
        let id = id.clone();
        move || handle.read(|c| c.is_picked(&id))
    };
    let name_class = if item.is_lower_rated() {
        "font-medium text-sm sm:text-md truncate text-black/50"
    } else {
        "font-medium text-sm sm:text-md truncate"
    };
    let row_class = if item.link().is_some() {
        "px-3 -mx-2 rounded-2xl hover:bg-black/5 cursor-pointer"
    } else {
        "px-3 -mx-2 rounded-2xl hover:bg-black/5"
    };

    view! {
        <div
            class=row_class
            role="link"
            tabindex="0"
            on:click={
                let id = id.clone();
                move |_| {
                    handle.peek(|c| c.open_item(&id));
                }
            }
            on:keydown={
                let id = id.clone();
                move |ev: web_sys::KeyboardEvent| {
                    let key = ev.key();
                    if key == "Enter" || key == " " {
                        ev.prevent_default();
                        handle.peek(|c| c.open_item(&id));
                    }
                }
            }
        >
            <div class="flex w-full items-center gap-3 py-3 border-b border-black/5">
                <input
                    type="checkbox"
                    class="h-4 w-4 accent-green-500"
                    aria-label=format!("{} 선택", item.name)
                    prop:checked=is_picked
                    on:click=|ev| ev.stop_propagation()
                    on:change={
                        let id = id.clone();
                        move |ev| {
                            ev.stop_propagation();
                            handle.update(|c| c.toggle_pick(&id));
                        }
                    }
                />
                <img
                    src=item.thumbnail.clone()
                    alt=item.name.clone()
                    class="h-10 w-10 sm:h-11 sm:w-11 rounded-lg object-cover ring ring-black/5"
                    loading="lazy"
                />
                <div class="w-3 text-end sm:block hidden text-sm text-black/40">{index + 1}</div>
                <div class="min-w-0 flex-1">
                    <div class=name_class>{item.name.clone()}</div>
                    <div class="mt-1 flex items-center gap-3 text-black/70 text-sm">
                        <span>"★ " {item.rating_label()}</span>
                        <span>{item.price_label()}</span>
                    </div>
                    {item.description.clone().map(|d| view! {
                        <div class="text-sm mt-0.5 text-black/60 truncate">{d}</div>
                    })}
                </div>
            </div>
        </div>
    }
}

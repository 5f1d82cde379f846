//! メインアプリケーションコンポーネント

use leptos::prelude::*;
use leptos::task::spawn_local;
use lotte_vegi_common::{
    Followup, LinkDispatcher, Notifier, RecordStore, SortConfig, SortKey, SortOrder,
    WidgetController,
};
use crate::browser::{AlertNotifier, AnchorRetry, BrowserStore, WebClipboard, WindowOpener};
use crate::components::{header::Header, item_list::ItemList};

/// 同梱のマーカーデータ
const MARKERS_JSON: &str = include_str!("../../data/markers.json");

pub type Controller = WidgetController<BrowserStore, WindowOpener, AnchorRetry>;

/// コントローラへのハンドル
///
/// コントローラ本体は描画スレッド専用の `StoredValue` に置き、
/// 変更のたびに `revision` を進めて再描画させる。
#[derive(Clone, Copy)]
pub struct WidgetHandle {
    controller: StoredValue<Controller, LocalStorage>,
    revision: RwSignal<u64>,
}

impl WidgetHandle {
    fn new(controller: Controller) -> Self {
        Self {
            controller: StoredValue::new_local(controller),
            revision: RwSignal::new(0),
        }
    }

    /// 読み取り（リアクティブに追跡される）
    pub fn read<O>(&self, f: impl FnOnce(&Controller) -> O) -> O {
        self.revision.track();
        self.controller.with_value(f)
    }

    /// 読み取り（追跡しない。イベントハンドラ用）
    pub fn peek<O>(&self, f: impl FnOnce(&Controller) -> O) -> O {
        self.controller.with_value(f)
    }

    /// 変更して再描画
    pub fn update<O>(&self, f: impl FnOnce(&mut Controller) -> O) -> Option<O> {
        let out = self.controller.try_update_value(f);
        self.revision.update(|r| *r += 1);
        out
    }
}

/// 同期処理の結果を通知する（コピーが残っていれば非同期で実行）
pub fn deliver(followup: Followup) {
    match followup {
        Followup::Done(notice) => AlertNotifier.notify(&notice),
        pending => spawn_local(async move {
            let notice = pending.resolve(&WebClipboard).await;
            AlertNotifier.notify(&notice);
        }),
    }
}

/// マウント先要素の `data-sort-by` / `data-order` からソート設定を読む
pub fn sort_config_from(root: Option<&web_sys::Element>) -> SortConfig {
    let Some(root) = root else {
        return SortConfig::default();
    };
    let sort_by = root
        .get_attribute("data-sort-by")
        .and_then(|v| v.parse::<SortKey>().ok())
        .unwrap_or_default();
    let order = root
        .get_attribute("data-order")
        .and_then(|v| v.parse::<SortOrder>().ok())
        .unwrap_or_default();
    SortConfig::new(sort_by, order)
}

#[component]
pub fn App(config: SortConfig) -> impl IntoView {
    let records = RecordStore::from_json(MARKERS_JSON).unwrap_or_else(|e| {
        web_sys::console::warn_1(&format!("markers.json の読み込みに失敗: {}", e).into());
        RecordStore::default()
    });

    let handle = WidgetHandle::new(WidgetController::new(
        records,
        config,
        BrowserStore::open(),
        LinkDispatcher::new(WindowOpener, AnchorRetry),
    ));

    let has_rows = move || handle.read(|c| !c.visible_items().is_empty());

    // 表示が空でもヘッダー（メニュー）は残し、「選択のみ表示」を解除できるようにする
    view! {
        <div class="antialiased w-full text-black px-4 pb-2 border border-black/10 rounded-2xl sm:rounded-3xl overflow-hidden bg-white">
            <div class="max-w-full">
                <Header handle=handle />
                <Show
                    when=has_rows
                    fallback=|| view! {
                        <div class="py-6 text-center text-gray-500">
                            "표시할 데이터가 없습니다."
                        </div>
                    }
                >
                    <ItemList handle=handle />
                </Show>
            </div>
        </div>
    }
}

#[cfg(all(target_arch = "wasm32", test))]
mod wasm_tests {
    use super::*;
    use lotte_vegi_common::{KeyValueStore, PICKED_IDS_KEY, SHOW_ONLY_PICKED_KEY};
    use wasm_bindgen::JsCast;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn wasm_stale_selection_keeps_menu_visible() {
        let mut store = BrowserStore::open();
        store.set(PICKED_IDS_KEY, r#"["gone"]"#).expect("保存失敗");
        store.set(SHOW_ONLY_PICKED_KEY, "true").expect("保存失敗");

        let document = web_sys::window().unwrap().document().unwrap();
        let root: web_sys::HtmlElement = document
            .create_element("div")
            .unwrap()
            .dyn_into()
            .unwrap();
        document.body().unwrap().append_child(&root).unwrap();

        let _handle = leptos::mount::mount_to(root.clone(), || {
            view! { <App config=SortConfig::default() /> }
        });

        let text = root.text_content().unwrap_or_default();
        assert!(text.contains("표시할 데이터가 없습니다."));
        assert!(text.contains("찜 1"));
        assert!(root.query_selector("button[aria-haspopup]").unwrap().is_some());

        store.set(PICKED_IDS_KEY, "[]").expect("保存失敗");
        store.set(SHOW_ONLY_PICKED_KEY, "false").expect("保存失敗");
    }
}

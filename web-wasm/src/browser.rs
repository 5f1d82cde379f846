//! ブラウザ側のポート実装
//!
//! - localStorage（使えなければメモリ）
//! - `window.open` による新規タブ
//! - 一時的な `<a>` のクリックによる遅延再試行
//! - `navigator.clipboard` と `textarea` + `execCommand("copy")` の代替
//! - `alert` による通知

use gloo::timers::callback::Timeout;
use lotte_vegi_common::{
    Clipboard, ContextOpener, Error, KeyValueStore, MemoryStore, Notice, Notifier, OpenAttempt,
    Result, RetryScheduler,
};
use std::time::Duration;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{HtmlAnchorElement, HtmlDocument, HtmlTextAreaElement};

fn warn(message: &str) {
    web_sys::console::warn_1(&JsValue::from_str(message));
}

fn document() -> std::result::Result<web_sys::Document, JsValue> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("document is not available"))
}

/// localStorage ストア
pub struct BrowserStore {
    storage: Option<web_sys::Storage>,
    fallback: MemoryStore,
}

impl BrowserStore {
    /// localStorage を開く（sandbox 等で使えない場合はメモリに保存）
    pub fn open() -> Self {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
        if storage.is_none() {
            warn("localStorage is unavailable; selection will not survive reloads");
        }
        Self {
            storage,
            fallback: MemoryStore::new(),
        }
    }
}

impl KeyValueStore for BrowserStore {
    fn get(&self, key: &str) -> Option<String> {
        match &self.storage {
            Some(storage) => storage.get_item(key).ok().flatten(),
            None => self.fallback.get(key),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match &self.storage {
            Some(storage) => storage
                .set_item(key, value)
                .map_err(|e| Error::Storage(format!("{:?}", e))),
            None => self.fallback.set(key, value),
        }
    }
}

/// `window.open` で新しいタブを開く
///
/// `noopener` を指定すると成功しても null が返りブロックと区別できないため、
/// 開いた後で opener を切る。
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowOpener;

impl ContextOpener for WindowOpener {
    fn open(&self, url: &str) -> OpenAttempt {
        let Some(window) = web_sys::window() else {
            return OpenAttempt::Blocked;
        };
        match window.open_with_url_and_target(url, "_blank") {
            Ok(Some(opened)) => {
                let _ = opened.set_opener(&JsValue::NULL);
                OpenAttempt::Opened
            }
            _ => OpenAttempt::Blocked,
        }
    }
}

/// 遅延して `<a target="_blank">` をクリックする
#[derive(Debug, Clone, Copy, Default)]
pub struct AnchorRetry;

impl RetryScheduler for AnchorRetry {
    fn schedule(&self, url: String, delay: Duration) {
        let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
        Timeout::new(millis, move || {
            if let Err(e) = click_anchor(&url) {
                warn(&format!("retry open failed for {}: {:?}", url, e));
            }
        })
        .forget();
    }
}

fn click_anchor(url: &str) -> std::result::Result<(), JsValue> {
    let document = document()?;
    let body = document.body().ok_or("document has no body")?;

    let anchor: HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
    anchor.set_href(url);
    anchor.set_target("_blank");
    anchor.set_rel("noopener noreferrer");

    body.append_child(&anchor)?;
    anchor.click();
    anchor.remove();
    Ok(())
}

/// Clipboard API（HTTPS かつユーザー操作が必要）
#[derive(Debug, Clone, Copy, Default)]
pub struct WebClipboard;

fn clipboard_error(e: JsValue) -> Error {
    Error::Clipboard(format!("{:?}", e))
}

impl Clipboard for WebClipboard {
    async fn write_text(&self, text: &str) -> Result<()> {
        let window = web_sys::window()
            .ok_or_else(|| Error::Clipboard("window is not available".into()))?;
        let navigator = window.navigator();

        // 非セキュアコンテキストでは navigator.clipboard 自体が存在しない
        let clipboard = js_sys::Reflect::get(&navigator, &JsValue::from_str("clipboard"))
            .map_err(clipboard_error)?;
        if clipboard.is_undefined() || clipboard.is_null() {
            return Err(Error::Clipboard("Clipboard API is unavailable".into()));
        }

        let write_text: js_sys::Function =
            js_sys::Reflect::get(&clipboard, &JsValue::from_str("writeText"))
                .map_err(clipboard_error)?
                .dyn_into()
                .map_err(|_| Error::Clipboard("writeText is not a function".into()))?;

        let promise: js_sys::Promise = write_text
            .call1(&clipboard, &JsValue::from_str(text))
            .map_err(clipboard_error)?
            .dyn_into()
            .map_err(|_| Error::Clipboard("writeText did not return a promise".into()))?;

        JsFuture::from(promise).await.map_err(clipboard_error)?;
        Ok(())
    }

    fn copy_via_selection(&self, text: &str) -> bool {
        match select_and_copy(text) {
            Ok(copied) => copied,
            Err(e) => {
                warn(&format!("selection copy failed: {:?}", e));
                false
            }
        }
    }
}

fn select_and_copy(text: &str) -> std::result::Result<bool, JsValue> {
    let document = document()?;
    let body = document.body().ok_or("document has no body")?;

    let textarea: HtmlTextAreaElement = document.create_element("textarea")?.dyn_into()?;
    textarea.set_value(text);
    let style = textarea.style();
    style.set_property("position", "fixed")?;
    style.set_property("opacity", "0")?;

    body.append_child(&textarea)?;
    textarea.focus()?;
    textarea.select();

    let copied = match document.dyn_ref::<HtmlDocument>() {
        Some(html) => html.exec_command("copy"),
        None => Ok(false),
    };
    textarea.remove();
    copied
}

/// `alert` で通知
#[derive(Debug, Clone, Copy, Default)]
pub struct AlertNotifier;

impl Notifier for AlertNotifier {
    fn notify(&self, notice: &Notice) {
        gloo::dialogs::alert(&notice.to_string());
    }
}

#[cfg(all(target_arch = "wasm32", test))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn wasm_browser_store_roundtrip() {
        let mut store = BrowserStore::open();
        store.set("lotte_test_key", "[\"a\"]").expect("保存失敗");
        assert_eq!(store.get("lotte_test_key").as_deref(), Some("[\"a\"]"));
    }

    #[wasm_bindgen_test]
    fn wasm_click_anchor_does_not_leave_element() {
        click_anchor("about:blank").expect("アンカー作成失敗");
        let anchors = document()
            .unwrap()
            .query_selector_all("a[href='about:blank']")
            .unwrap();
        assert_eq!(anchors.length(), 0);
    }
}

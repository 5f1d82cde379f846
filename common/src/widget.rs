//! ウィジェットのコントローラ
//!
//! レコード・ソート設定・選択状態・リンク処理をまとめ、メニューの開閉を管理する。
//! メニューからの操作は成功・失敗にかかわらず必ずメニューを閉じる。

use crate::dispatch::{self, ContextOpener, Followup, LinkDispatcher, OpenAttempt, RetryScheduler};
use crate::selection::SelectionManager;
use crate::store::KeyValueStore;
use crate::types::{ItemRecord, RecordStore};
use crate::view::{self, SortConfig};

pub struct WidgetController<S: KeyValueStore, O, R> {
    records: RecordStore,
    config: SortConfig,
    selection: SelectionManager<S>,
    dispatcher: LinkDispatcher<O, R>,
    menu_open: bool,
}

impl<S, O, R> WidgetController<S, O, R>
where
    S: KeyValueStore,
    O: ContextOpener,
    R: RetryScheduler,
{
    /// 永続化ストアから選択状態を復元して作成（メニューは閉じた状態）
    pub fn new(
        records: RecordStore,
        config: SortConfig,
        store: S,
        dispatcher: LinkDispatcher<O, R>,
    ) -> Self {
        Self {
            records,
            config,
            selection: SelectionManager::restore(store),
            dispatcher,
            menu_open: false,
        }
    }

    pub fn records(&self) -> &RecordStore {
        &self.records
    }

    pub fn config(&self) -> SortConfig {
        self.config
    }

    pub fn selection(&self) -> &SelectionManager<S> {
        &self.selection
    }

    pub fn dispatcher(&self) -> &LinkDispatcher<O, R> {
        &self.dispatcher
    }

    pub fn sort_label(&self) -> String {
        self.config.label()
    }

    pub fn picked_count(&self) -> usize {
        self.selection.len()
    }

    pub fn is_picked(&self, id: &str) -> bool {
        self.selection.is_picked(id)
    }

    pub fn show_only_picked(&self) -> bool {
        self.selection.show_only_picked()
    }

    /// 表示するリスト
    pub fn visible_items(&self) -> Vec<&ItemRecord> {
        view::derive_view(
            self.records.records(),
            self.config,
            self.selection.picked(),
            self.selection.show_only_picked(),
        )
    }

    /// 絞り込みなしの全件（ソート済み）
    pub fn sorted_items(&self) -> Vec<&ItemRecord> {
        view::sorted(self.records.records(), self.config)
    }

    /// 一括操作の対象
    pub fn selected_rows(&self) -> Vec<&ItemRecord> {
        view::selected_rows(self.records.records(), self.config, self.selection.picked())
    }

    pub fn menu_open(&self) -> bool {
        self.menu_open
    }

    pub fn toggle_menu(&mut self) -> bool {
        self.menu_open = !self.menu_open;
        self.menu_open
    }

    pub fn close_menu(&mut self) {
        self.menu_open = false;
    }

    /// チェックボックスの切り替え
    pub fn toggle_pick(&mut self, id: &str) -> bool {
        self.selection.toggle(id)
    }

    /// メニュー: 「選択のみ表示」の切り替え
    pub fn toggle_show_only_picked(&mut self) -> bool {
        let value = self.selection.toggle_show_only_picked();
        self.close_menu();
        value
    }

    /// メニュー: 選択リンクをコピー
    pub fn copy_links(&mut self) -> Followup {
        self.close_menu();
        dispatch::copy_links(&self.selected_rows())
    }

    /// メニュー: 選択リンクをすべて開く
    ///
    /// ユーザー操作のイベントハンドラ内で同期的に呼ぶこと。
    pub fn open_all(&mut self) -> Followup {
        self.close_menu();
        let rows = self.selected_rows();
        self.dispatcher.open_all(&rows)
    }

    /// 行クリックで1件開く
    pub fn open_item(&self, id: &str) -> Option<OpenAttempt> {
        self.records.get(id).and_then(|r| self.dispatcher.open_one(r))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::fakes::*;
    use crate::notice::{CopyMethod, Notice};
    use crate::selection::{PICKED_IDS_KEY, SHOW_ONLY_PICKED_KEY};
    use crate::store::MemoryStore;
    use futures::executor::block_on;
    use super::OpenAttempt::{Blocked, Opened};

    type Controller = WidgetController<MemoryStore, ScriptedOpener, RecordingScheduler>;

    const MARKERS: &str = r#"{"places": [
        {"id": "romaine", "name": "로메인", "rating": 4.6, "priceKrwPerKg": 12900, "link": "https://example.com/romaine"},
        {"id": "butterhead", "name": "버터헤드", "rating": 4.2, "link": "https://example.com/butterhead"},
        {"id": "batavia", "name": "바타비아", "rating": 4.4, "priceKrwPerKg": 9800},
        {"id": "frillice", "name": "프릴아이스", "rating": 4.8, "priceKrwPerKg": 15800, "link": "https://example.com/frillice"}
    ]}"#;

    fn controller_with(store: MemoryStore, script: &[OpenAttempt]) -> Controller {
        let records = RecordStore::from_json(MARKERS).expect("読み込み失敗");
        let dispatcher = LinkDispatcher::new(ScriptedOpener::new(script), RecordingScheduler::default());
        WidgetController::new(records, SortConfig::default(), store, dispatcher)
    }

    fn controller(script: &[OpenAttempt]) -> Controller {
        controller_with(MemoryStore::new(), script)
    }

    fn ids(rows: &[&ItemRecord]) -> Vec<String> {
        rows.iter().map(|r| r.id.clone()).collect()
    }

    #[test]
    fn test_initial_state() {
        let c = controller(&[]);
        assert!(!c.menu_open());
        assert_eq!(c.picked_count(), 0);
        assert_eq!(c.sort_label(), "Sorted by rating (desc)");
        assert_eq!(
            ids(&c.visible_items()),
            vec!["frillice", "romaine", "batavia", "butterhead"]
        );
    }

    #[test]
    fn test_restores_persisted_selection() {
        let store = MemoryStore::with_entries([
            (PICKED_IDS_KEY, r#"["batavia","gone"]"#),
            (SHOW_ONLY_PICKED_KEY, "true"),
        ]);
        let c = controller_with(store, &[]);

        assert!(c.show_only_picked());
        assert_eq!(ids(&c.visible_items()), vec!["batavia"]);
    }

    #[test]
    fn test_toggle_menu() {
        let mut c = controller(&[]);
        assert!(c.toggle_menu());
        assert!(!c.toggle_menu());
    }

    #[test]
    fn test_show_only_picked_closes_menu() {
        let mut c = controller(&[]);
        c.toggle_pick("romaine");
        c.toggle_menu();

        assert!(c.toggle_show_only_picked());
        assert!(!c.menu_open());
        assert_eq!(ids(&c.visible_items()), vec!["romaine"]);
    }

    #[test]
    fn test_sorted_items_ignore_show_only_filter() {
        let mut c = controller(&[]);
        c.toggle_pick("romaine");
        c.toggle_show_only_picked();

        assert_eq!(c.visible_items().len(), 1);
        assert_eq!(
            ids(&c.sorted_items()),
            vec!["frillice", "romaine", "batavia", "butterhead"]
        );
    }

    #[test]
    fn test_show_only_picked_with_empty_selection() {
        let mut c = controller(&[]);
        c.toggle_menu();
        assert!(!c.toggle_show_only_picked());
        assert!(!c.menu_open());
        assert_eq!(c.visible_items().len(), 4);
    }

    #[test]
    fn test_unpick_last_reverts_to_full_list() {
        let mut c = controller(&[]);
        c.toggle_pick("batavia");
        c.toggle_show_only_picked();
        c.toggle_pick("batavia");

        assert!(!c.show_only_picked());
        assert_eq!(c.visible_items().len(), 4);
    }

    #[test]
    fn test_open_all_nothing_selected() {
        let mut c = controller(&[]);
        c.toggle_menu();

        let followup = c.open_all();
        assert_eq!(followup, Followup::Done(Notice::NothingSelected));
        assert!(!c.menu_open());
        assert_eq!(c.dispatcher().opener().attempts(), 0);
    }

    #[test]
    fn test_open_all_in_sorted_order() {
        let mut c = controller(&[]);
        c.toggle_pick("romaine");
        c.toggle_pick("frillice");

        assert_eq!(c.open_all(), Followup::Done(Notice::AllOpened { count: 2 }));
        assert_eq!(
            *c.dispatcher().opener().opened.borrow(),
            vec!["https://example.com/frillice", "https://example.com/romaine"]
        );
    }

    #[test]
    fn test_open_all_total_block_falls_back_to_copy() {
        let mut c = controller(&[Blocked, Blocked, Blocked]);
        c.toggle_pick("romaine");
        c.toggle_pick("butterhead");
        c.toggle_pick("frillice");
        c.toggle_menu();

        let followup = c.open_all();
        assert!(!c.menu_open());

        let clipboard = FakeClipboard::default();
        let notice = block_on(followup.resolve(&clipboard));
        assert_eq!(notice, Notice::PopupsBlocked { copied: CopyMethod::Clipboard });
        assert_eq!(clipboard.api_writes.borrow()[0].lines().count(), 3);
    }

    #[test]
    fn test_open_all_partial_block_retries() {
        let mut c = controller(&[Opened, Opened, Blocked]);
        c.toggle_pick("romaine");
        c.toggle_pick("butterhead");
        c.toggle_pick("frillice");

        let followup = c.open_all();
        assert_eq!(
            followup,
            Followup::Done(Notice::RetryingBlocked { opened: 2, retrying: 1 })
        );
        let scheduled = c.dispatcher().scheduler().scheduled.borrow();
        assert_eq!(scheduled.len(), 1);
        assert_eq!(scheduled[0].0, "https://example.com/butterhead");
    }

    #[test]
    fn test_copy_links_excludes_linkless_record() {
        let mut c = controller(&[]);
        c.toggle_pick("romaine");
        c.toggle_pick("batavia");
        c.toggle_menu();

        let followup = c.copy_links();
        assert!(!c.menu_open());

        let clipboard = FakeClipboard::default();
        let notice = block_on(followup.resolve(&clipboard));
        assert_eq!(notice, Notice::LinksCopied { count: 1 });
        assert_eq!(*clipboard.api_writes.borrow(), vec!["https://example.com/romaine"]);
    }

    #[test]
    fn test_copy_links_no_links() {
        let mut c = controller(&[]);
        c.toggle_pick("batavia");
        c.toggle_menu();

        assert_eq!(c.copy_links(), Followup::Done(Notice::NoLinksToCopy));
        assert!(!c.menu_open());
    }

    #[test]
    fn test_open_all_with_only_linkless_selection_copies() {
        let mut c = controller(&[]);
        c.toggle_pick("batavia");
        c.toggle_menu();

        let followup = c.open_all();
        assert!(!c.menu_open());
        assert_eq!(c.dispatcher().opener().attempts(), 0);

        let clipboard = FakeClipboard::default();
        let notice = block_on(followup.resolve(&clipboard));
        assert_eq!(notice, Notice::PopupsBlocked { copied: CopyMethod::Clipboard });
        assert_eq!(*clipboard.api_writes.borrow(), vec![String::new()]);
    }

    #[test]
    fn test_stale_selection_with_show_only_can_be_turned_off() {
        let store = MemoryStore::with_entries([
            (PICKED_IDS_KEY, r#"["gone"]"#),
            (SHOW_ONLY_PICKED_KEY, "true"),
        ]);
        let mut c = controller_with(store, &[]);

        // 古いIDだけが残っていても描画は止めない
        assert_eq!(c.picked_count(), 1);
        assert!(c.show_only_picked());
        assert!(c.visible_items().is_empty());
        assert_eq!(c.sort_label(), "Sorted by rating (desc)");

        c.toggle_menu();
        assert!(!c.toggle_show_only_picked());
        assert!(!c.menu_open());
        assert_eq!(c.visible_items().len(), 4);
        assert_eq!(
            c.selection().store().get(SHOW_ONLY_PICKED_KEY).as_deref(),
            Some("false")
        );
    }

    #[test]
    fn test_linkless_record_still_selectable() {
        let mut c = controller(&[]);
        assert!(c.toggle_pick("batavia"));
        assert!(c.is_picked("batavia"));
        assert_eq!(c.open_item("batavia"), None);
        assert!(c.visible_items().iter().any(|r| r.id == "batavia"));
    }

    #[test]
    fn test_open_item() {
        let c = controller(&[Opened]);
        assert_eq!(c.open_item("romaine"), Some(Opened));
        assert_eq!(c.open_item("unknown"), None);
    }
}

//! 選択（찜）状態の管理
//!
//! 選択IDの集合と「選択のみ表示」フラグを持ち、変更のたびに即時永続化する。
//!
//! 不変条件: 選択が空なら「選択のみ表示」は必ず false。

use crate::store::KeyValueStore;
use serde::de::DeserializeOwned;
use std::collections::BTreeSet;

/// 選択IDの保存キー
pub const PICKED_IDS_KEY: &str = "lotte_picked_ids";

/// 「選択のみ表示」フラグの保存キー
pub const SHOW_ONLY_PICKED_KEY: &str = "lotte_show_only_picked";

/// 選択IDの集合
pub type PickedIds = BTreeSet<String>;

/// 選択状態マネージャ
#[derive(Debug)]
pub struct SelectionManager<S: KeyValueStore> {
    store: S,
    picked: PickedIds,
    show_only_picked: bool,
}

impl<S: KeyValueStore> SelectionManager<S> {
    /// 保存済みの状態から復元
    ///
    /// 値がない・壊れている場合は空集合 / false にフォールバックする。
    pub fn restore(store: S) -> Self {
        let picked: PickedIds = read_json::<Vec<String>>(&store, PICKED_IDS_KEY)
            .map(|ids| ids.into_iter().collect())
            .unwrap_or_default();
        let show_only_picked = read_json::<bool>(&store, SHOW_ONLY_PICKED_KEY).unwrap_or(false);

        let mut manager = Self {
            store,
            picked,
            show_only_picked,
        };
        manager.enforce_invariant();
        manager
    }

    /// 選択を反転し、反転後に選択されているかを返す
    pub fn toggle(&mut self, id: &str) -> bool {
        let now_picked = if self.picked.remove(id) {
            false
        } else {
            self.picked.insert(id.to_string());
            true
        };
        tracing::debug!(id, now_picked, "toggle pick");

        self.persist_picked();
        self.enforce_invariant();
        now_picked
    }

    /// 「選択のみ表示」を設定し、実際に設定された値を返す
    ///
    /// 選択が空のときに true を指定しても false のまま。
    pub fn set_show_only_picked(&mut self, value: bool) -> bool {
        self.show_only_picked = value && !self.picked.is_empty();
        self.persist_flag();
        self.show_only_picked
    }

    /// 「選択のみ表示」を反転
    pub fn toggle_show_only_picked(&mut self) -> bool {
        self.set_show_only_picked(!self.show_only_picked)
    }

    pub fn picked(&self) -> &PickedIds {
        &self.picked
    }

    pub fn is_picked(&self, id: &str) -> bool {
        self.picked.contains(id)
    }

    pub fn len(&self) -> usize {
        self.picked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.picked.is_empty()
    }

    pub fn show_only_picked(&self) -> bool {
        self.show_only_picked
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn enforce_invariant(&mut self) {
        if self.picked.is_empty() && self.show_only_picked {
            tracing::debug!("selection empty, resetting show-only-picked");
            self.show_only_picked = false;
            self.persist_flag();
        }
    }

    fn persist_picked(&mut self) {
        let ids: Vec<&String> = self.picked.iter().collect();
        match serde_json::to_string(&ids) {
            Ok(json) => self.write(PICKED_IDS_KEY, &json),
            Err(e) => tracing::warn!("failed to serialize picked ids: {e}"),
        }
    }

    fn persist_flag(&mut self) {
        let json = if self.show_only_picked { "true" } else { "false" };
        self.write(SHOW_ONLY_PICKED_KEY, json);
    }

    // 書き込み失敗はログのみ（表示は止めない）
    fn write(&mut self, key: &str, value: &str) {
        if let Err(e) = self.store.set(key, value) {
            tracing::warn!(key, "failed to persist selection state: {e}");
        }
    }
}

fn read_json<T: DeserializeOwned>(store: &impl KeyValueStore, key: &str) -> Option<T> {
    let raw = store.get(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key, "corrupt persisted value, using default: {e}");
            None
        }
    }
}

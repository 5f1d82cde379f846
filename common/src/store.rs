//! キー・バリュー永続化ポート
//!
//! ブラウザでは localStorage、CLIではJSONファイルが実装になる。
//! 値はJSON文字列のまま保存し、解釈は呼び出し側が行う。

use crate::error::Result;
use std::collections::HashMap;

/// 永続化ストア
pub trait KeyValueStore {
    /// 値を取得（なければ None）
    fn get(&self, key: &str) -> Option<String>;

    /// 値を書き込む（即時書き込み）
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// メモリ上のストア
///
/// テスト用、または localStorage が使えない環境の代替。
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 既存の値を持った状態で作成
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
            writes: 0,
        }
    }

    /// これまでの書き込み回数
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }
}

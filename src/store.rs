//! ファイル永続化ストア
//!
//! キー → JSON文字列のマップを1つのJSONファイルに保存する。
//! 読み込めないファイルは空として扱い、`set` のたびに書き出す。

use lotte_vegi_common::{Error, KeyValueStore};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// 状態ファイルを読み込み（存在しない・壊れている場合は空）
    pub fn load(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            entries: Self::read_entries(path),
        }
    }

    fn read_entries(path: &Path) -> BTreeMap<String, String> {
        if !path.exists() {
            return BTreeMap::new();
        }

        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!("状態ファイルを開けません ({}): {}", path.display(), e);
                return BTreeMap::new();
            }
        };

        match serde_json::from_reader(BufReader::new(file)) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("状態ファイルが壊れています、初期状態で開始します: {}", e);
                BTreeMap::new()
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn flush(&self) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(&self.path, content)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> lotte_vegi_common::Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush()
            .map_err(|e| Error::Storage(format!("{}: {}", self.path.display(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let store = FileStore::load(&dir.path().join("state.json"));
        assert!(store.is_empty());
        assert_eq!(store.get("anything"), None);
    }

    #[test]
    fn test_set_writes_through() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sub").join("state.json");

        let mut store = FileStore::load(&path);
        store.set("k", "[\"a\"]").unwrap();
        assert!(path.exists());

        let reloaded = FileStore::load(&path);
        assert_eq!(reloaded.get("k").as_deref(), Some("[\"a\"]"));
        assert_eq!(reloaded.len(), 1);
    }

    #[test]
    fn test_corrupt_file_is_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = FileStore::load(&path);
        assert!(store.is_empty());
    }
}

use crate::error::{Result, VegiError};
use lotte_vegi_common::{SortKey, SortOrder};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    /// 商品データ（`{ "places": [...] }`）
    pub data_path: Option<PathBuf>,
    /// 選択状態の保存先
    pub state_path: Option<PathBuf>,
    pub sort_by: SortKey,
    pub order: SortOrder,
    /// リンクを開くブラウザコマンド（省略時は `$BROWSER` → OS標準）
    pub browser: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_dir() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| VegiError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("lotte-vegi"))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// データファイル（フラグ → 設定 → カレントの markers.json）
    pub fn resolve_data_path(&self, flag: Option<PathBuf>) -> PathBuf {
        flag.or_else(|| self.data_path.clone())
            .unwrap_or_else(|| PathBuf::from("data").join("markers.json"))
    }

    /// 状態ファイル（フラグ → 設定 → 設定ディレクトリ）
    pub fn resolve_state_path(&self, flag: Option<PathBuf>) -> Result<PathBuf> {
        match flag.or_else(|| self.state_path.clone()) {
            Some(path) => Ok(path),
            None => Ok(Self::config_dir()?.join("state.json")),
        }
    }
}

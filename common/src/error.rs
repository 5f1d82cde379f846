//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Unknown sort key: {0}. Use rating, priceKrwPerKg, name, or id")]
    UnknownSortKey(String),

    #[error("Unknown sort order: {0}. Use asc or desc")]
    UnknownSortOrder(String),

    #[error("Clipboard error: {0}")]
    Clipboard(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;

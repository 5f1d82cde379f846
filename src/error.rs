use thiserror::Error;

#[derive(Error, Debug)]
pub enum VegiError {
    #[error(transparent)]
    Common(#[from] lotte_vegi_common::Error),

    #[error("設定エラー: {0}")]
    Config(String),

    #[error("データファイルが見つかりません: {0}")]
    DataNotFound(String),

    #[error("商品が見つかりません: {0}")]
    UnknownItem(String),

    #[error("リンクが登録されていません: {0}")]
    NoLink(String),

    #[error("対話入力エラー: {0}")]
    Prompt(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, VegiError>;

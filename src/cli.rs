use clap::{Parser, Subcommand};
use lotte_vegi_common::{SortKey, SortOrder};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lotte-vegi")]
#[command(about = "롯데 채소 목록: 찜하기・링크 복사・일괄 열기", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 商品データJSON（`{ "places": [...] }`）
    #[arg(long, global = true)]
    pub data: Option<PathBuf>,

    /// 選択状態の保存先
    #[arg(long, global = true)]
    pub state: Option<PathBuf>,

    /// ソートキー (rating/priceKrwPerKg/name/id)
    #[arg(long, global = true)]
    pub sort_by: Option<SortKey>,

    /// ソート順 (asc/desc)
    #[arg(long, global = true)]
    pub order: Option<SortOrder>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 一覧を表示
    List,

    /// 찜の切り替え（ID省略時は対話選択）
    Pick {
        /// 切り替える商品ID
        ids: Vec<String>,
    },

    /// 「選択のみ表示」の切り替え
    OnlyPicked {
        /// on / off / toggle
        #[arg(default_value = "toggle")]
        mode: SwitchMode,
    },

    /// 選択中のリンクをクリップボードにコピー
    Copy,

    /// 選択中のリンクをすべて開く
    OpenAll,

    /// 1件だけ開く
    Open {
        /// 商品ID
        #[arg(required = true)]
        id: String,
    },

    /// 設定を表示/編集
    Config {
        /// 設定を表示
        #[arg(long)]
        show: bool,

        /// データファイルを設定
        #[arg(long)]
        set_data: Option<PathBuf>,

        /// 状態ファイルを設定
        #[arg(long)]
        set_state: Option<PathBuf>,

        /// 既定のソートキーを設定
        #[arg(long)]
        set_sort_by: Option<SortKey>,

        /// 既定のソート順を設定
        #[arg(long)]
        set_order: Option<SortOrder>,

        /// ブラウザコマンドを設定
        #[arg(long)]
        set_browser: Option<String>,
    },

    /// クリップボード保持用（内部利用）
    #[command(name = "__hold-clipboard", hide = true)]
    HoldClipboard,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SwitchMode {
    On,
    Off,
    #[default]
    Toggle,
}

impl std::str::FromStr for SwitchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "on" | "true" => Ok(SwitchMode::On),
            "off" | "false" => Ok(SwitchMode::Off),
            "toggle" | "t" => Ok(SwitchMode::Toggle),
            _ => Err(format!("Unknown mode: {}. Use on, off, or toggle", s)),
        }
    }
}

impl std::fmt::Display for SwitchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SwitchMode::On => write!(f, "on"),
            SwitchMode::Off => write!(f, "off"),
            SwitchMode::Toggle => write!(f, "toggle"),
        }
    }
}

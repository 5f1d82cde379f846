//! Lotte Vegi Common Library
//!
//! CLIとWeb(WASM)で共有される商品リスト・選択・リンク処理

pub mod types;
pub mod error;
pub mod store;
pub mod view;
pub mod selection;
pub mod notice;
pub mod dispatch;
pub mod widget;

pub use types::{ItemRecord, RecordStore, format_price};
pub use error::{Error, Result};
pub use store::{KeyValueStore, MemoryStore};
pub use view::{SortConfig, SortKey, SortOrder, derive_view, selected_rows, resolvable_links};
pub use selection::{PickedIds, SelectionManager, PICKED_IDS_KEY, SHOW_ONLY_PICKED_KEY};
pub use notice::{CopyMethod, Notice, Notifier};
pub use dispatch::{
    Clipboard, ContextOpener, CopyJob, Followup, LinkDispatcher, OpenAttempt, RetryScheduler,
    RETRY_STAGGER, copy_links, copy_text,
};
pub use widget::WidgetController;

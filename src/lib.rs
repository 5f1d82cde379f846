//! lotte-vegi CLI
//!
//! 共通ライブラリのコントローラに、ファイル永続化・外部ブラウザ起動・
//! システムクリップボードを接続する。

pub mod cli;
pub mod clipboard;
pub mod commands;
pub mod config;
pub mod console;
pub mod error;
pub mod launcher;
pub mod store;

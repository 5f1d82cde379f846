//! 端末への通知

use lotte_vegi_common::{Notice, Notifier};

/// 標準出力（失敗系は標準エラー）に表示
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: &Notice) {
        if notice.is_failure() {
            eprintln!("⚠ {}", notice);
        } else {
            println!("✔ {}", notice);
        }
    }
}

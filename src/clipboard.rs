//! システムクリップボード（arboard）
//!
//! Linux (X11/Wayland) ではクリップボードの内容は所有プロセスが終わると消える。
//! そのため書き込み後に自分自身を隠しサブコマンドで起動し、
//! 他のアプリが内容を引き取るまで保持させる。

use lotte_vegi_common::{Clipboard, Error, Result};
use std::cell::RefCell;

/// 保持用プロセスのサブコマンド名
pub const HOLD_CLIPBOARD_COMMAND: &str = "__hold-clipboard";

fn clipboard_error(e: impl std::fmt::Display) -> Error {
    Error::Clipboard(e.to_string())
}

/// arboard のクリップボード
#[derive(Default)]
pub struct NativeClipboard {
    inner: RefCell<Option<arboard::Clipboard>>,
}

impl NativeClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    fn set_text(&self, text: &str) -> Result<()> {
        let mut inner = self.inner.borrow_mut();
        if inner.is_none() {
            *inner = Some(arboard::Clipboard::new().map_err(clipboard_error)?);
        }
        match inner.as_mut() {
            Some(clipboard) => clipboard.set_text(text.to_string()).map_err(clipboard_error),
            None => Err(Error::Clipboard("clipboard is not available".into())),
        }
    }
}

impl Clipboard for NativeClipboard {
    async fn write_text(&self, text: &str) -> Result<()> {
        // 書き込めることをここで確認してから保持プロセスに渡す
        self.set_text(text)?;

        #[cfg(target_os = "linux")]
        spawn_holder(text)?;

        Ok(())
    }

    /// 端末に表示して手動でコピーしてもらう
    fn copy_via_selection(&self, text: &str) -> bool {
        if text.is_empty() {
            return false;
        }
        println!("--- 아래 링크를 복사해 주세요 ---");
        println!("{}", text);
        println!("--------------------------------");
        true
    }
}

/// 自分自身を保持プロセスとして起動し、標準入力でテキストを渡す
#[cfg(target_os = "linux")]
fn spawn_holder(text: &str) -> Result<()> {
    use std::io::Write;
    use std::process::{Command, Stdio};

    let exe = std::env::current_exe().map_err(clipboard_error)?;
    let mut child = Command::new(exe)
        .arg(HOLD_CLIPBOARD_COMMAND)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(clipboard_error)?;

    let mut stdin = child
        .stdin
        .take()
        .ok_or_else(|| Error::Clipboard("holder stdin is not available".into()))?;
    stdin.write_all(text.as_bytes()).map_err(clipboard_error)?;
    drop(stdin);

    tracing::debug!(pid = child.id(), "clipboard holder started");
    Ok(())
}

/// 保持プロセス本体: 標準入力の内容を書き込み、所有権を失うまで待つ
pub fn hold_from_stdin() -> Result<()> {
    use std::io::Read;

    let mut text = String::new();
    std::io::stdin()
        .read_to_string(&mut text)
        .map_err(clipboard_error)?;
    hold_text(text)
}

#[cfg(target_os = "linux")]
fn hold_text(text: String) -> Result<()> {
    use arboard::SetExtLinux;

    let mut clipboard = arboard::Clipboard::new().map_err(clipboard_error)?;
    clipboard.set().wait().text(text).map_err(clipboard_error)
}

// Linux 以外は所有プロセスが終わっても内容が残る
#[cfg(not(target_os = "linux"))]
fn hold_text(_text: String) -> Result<()> {
    Ok(())
}

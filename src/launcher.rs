//! リンクを外部ブラウザで開く
//!
//! - `SystemOpener`: 即時に起動（起動失敗はブロック扱い）
//! - `ProcessRetry`: 遅延後にOS標準のオープナーで再試行

use lotte_vegi_common::{ContextOpener, OpenAttempt, RetryScheduler};
use std::cell::RefCell;
use std::process::Stdio;
use std::time::Duration;
use tokio::task::JoinSet;

/// 起動コマンド（URLは最後の引数に付く）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchCommand {
    program: String,
    args: Vec<String>,
}

impl LaunchCommand {
    /// `"firefox --new-tab"` のような文字列を分解
    pub fn parse(command: &str) -> Option<Self> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }

    /// OS標準のオープナー
    pub fn platform() -> Self {
        #[cfg(windows)]
        let (program, args) = ("cmd", vec!["/C", "start", ""]);

        #[cfg(target_os = "macos")]
        let (program, args) = ("open", vec![]);

        #[cfg(not(any(windows, target_os = "macos")))]
        let (program, args) = ("xdg-open", vec![]);

        Self {
            program: program.to_string(),
            args: args.into_iter().map(str::to_string).collect(),
        }
    }

    /// 設定 → `$BROWSER` → OS標準 の順に決める
    pub fn resolve(configured: Option<&str>) -> Self {
        configured
            .and_then(Self::parse)
            .or_else(|| std::env::var("BROWSER").ok().as_deref().and_then(Self::parse))
            .unwrap_or_else(Self::platform)
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn std_command(&self, url: &str) -> std::process::Command {
        let mut command = std::process::Command::new(&self.program);
        command
            .args(&self.args)
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        command
    }

    fn tokio_command(&self, url: &str) -> tokio::process::Command {
        let mut command = tokio::process::Command::new(&self.program);
        command
            .args(&self.args)
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        command
    }
}

/// ブラウザを起動して開く
#[derive(Debug, Clone)]
pub struct SystemOpener {
    command: LaunchCommand,
}

impl SystemOpener {
    pub fn new(command: LaunchCommand) -> Self {
        Self { command }
    }

    pub fn command(&self) -> &LaunchCommand {
        &self.command
    }
}

impl ContextOpener for SystemOpener {
    fn open(&self, url: &str) -> OpenAttempt {
        match self.command.std_command(url).spawn() {
            // 起動したプロセスは待たずに切り離す
            Ok(child) => {
                tracing::debug!(
                    pid = child.id(),
                    "{} で開きました: {}",
                    self.command.program,
                    url
                );
                OpenAttempt::Opened
            }
            Err(e) => {
                tracing::warn!("{} を起動できません: {}", self.command.program, e);
                OpenAttempt::Blocked
            }
        }
    }
}

/// 遅延再試行（tokioタスク）
///
/// 結果は確認しない。プロセス終了前に `drain` で待つこと。
#[derive(Debug)]
pub struct ProcessRetry {
    command: LaunchCommand,
    tasks: RefCell<JoinSet<()>>,
}

impl ProcessRetry {
    pub fn new(command: LaunchCommand) -> Self {
        Self {
            command,
            tasks: RefCell::new(JoinSet::new()),
        }
    }

    pub fn pending(&self) -> usize {
        self.tasks.borrow().len()
    }

    /// 予約済みの再試行がすべて終わるまで待つ
    pub async fn drain(&self) -> usize {
        let mut tasks = self.tasks.take();
        let mut finished = 0;
        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                tracing::warn!("再試行タスクが異常終了しました: {}", e);
            }
            finished += 1;
        }
        finished
    }
}

impl RetryScheduler for ProcessRetry {
    fn schedule(&self, url: String, delay: Duration) {
        let mut command = self.command.tokio_command(&url);
        self.tasks.borrow_mut().spawn(async move {
            tokio::time::sleep(delay).await;
            match command.status().await {
                Ok(status) if status.success() => tracing::debug!("再試行で開きました: {}", url),
                Ok(status) => tracing::warn!("再試行に失敗しました ({}): {}", status, url),
                Err(e) => tracing::warn!("再試行を起動できません: {}: {}", url, e),
            }
        });
    }
}

//! ユーザー通知
//!
//! 操作の終端ごとに必ず1件だけ通知する。文言はウィジェットの表示言語（韓国語）。

/// クリップボードへのコピー手段の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyMethod {
    /// Clipboard API で書き込めた
    Clipboard,
    /// 選択＋コピーコマンドの代替手段で書き込めた
    Selection,
    /// どちらも失敗
    Failed,
}

/// 通知内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    NothingSelected,
    NoLinksToCopy,
    LinksCopied { count: usize },
    CopyFailed,
    AllOpened { count: usize },
    /// 一部がブロックされ、遅延再試行を予約した
    RetryingBlocked { opened: usize, retrying: usize },
    /// 全てブロックされ、代わりにリンクをコピーした
    PopupsBlocked { copied: CopyMethod },
}

impl Notice {
    /// 失敗系の通知か
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Notice::CopyFailed | Notice::PopupsBlocked { .. }
        )
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        const BLOCKED: &str = "브라우저 팝업 차단으로 새 탭을 열 수 없었어요.";
        match self {
            Notice::NothingSelected => write!(f, "선택된 항목이 없습니다."),
            Notice::NoLinksToCopy => write!(f, "선택된 항목에 링크가 없습니다."),
            Notice::LinksCopied { .. } => write!(f, "선택한 링크를 복사했어요."),
            Notice::CopyFailed => write!(f, "복사에 실패했어요. 수동으로 복사해주세요."),
            Notice::AllOpened { count } => write!(f, "링크 {}개를 새 탭으로 열었어요.", count),
            Notice::RetryingBlocked { opened, retrying } => write!(
                f,
                "링크 {}개를 열었어요. 차단된 {}개는 잠시 후 다시 열어볼게요.",
                opened, retrying
            ),
            Notice::PopupsBlocked { copied: CopyMethod::Clipboard } => write!(
                f,
                "{}\n링크를 클립보드에 복사해 두었습니다. 팝업 허용 후 붙여넣어 열어주세요.",
                BLOCKED
            ),
            Notice::PopupsBlocked { copied: CopyMethod::Selection } => {
                write!(f, "{}\n링크를 클립보드에 복사해 두었습니다.", BLOCKED)
            }
            Notice::PopupsBlocked { copied: CopyMethod::Failed } => write!(
                f,
                "{}\n링크 복사에도 실패했어요. 팝업을 허용한 뒤 다시 시도해주세요.",
                BLOCKED
            ),
        }
    }
}

/// 通知ポート（ブラウザでは alert）
pub trait Notifier {
    fn notify(&self, notice: &Notice);
}

//! 選択リンクの一括オープンとコピー
//!
//! ポップアップブロックの状況に応じて3段階で処理する:
//! 1) ユーザー操作の中で即座に開く
//! 2) 一部ブロック → ブロックされた分だけ別手段で遅延再試行
//! 3) 全部ブロック → リンク一覧をクリップボードにコピー
//!
//! 1) は同期処理でなければならない（ブラウザはジェスチャ中に同期で開いたものしか許可しない）。
//! クリップボード処理は非同期なので [`Followup::Copy`] として呼び出し側に返す。

use crate::error::Result;
use crate::notice::{CopyMethod, Notice};
use crate::types::ItemRecord;
use crate::view::resolvable_links;
use std::time::Duration;

/// 遅延再試行の間隔
pub const RETRY_STAGGER: Duration = Duration::from_millis(150);

/// 新しいタブを開いた結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenAttempt {
    Opened,
    Blocked,
}

/// 新しいブラウジングコンテキストを開くポート
pub trait ContextOpener {
    fn open(&self, url: &str) -> OpenAttempt;
}

/// 遅延再試行のポート
///
/// 予約したら取り消しも結果確認もしない。
pub trait RetryScheduler {
    fn schedule(&self, url: String, delay: Duration);
}

/// クリップボードのポート
#[allow(async_fn_in_trait)]
pub trait Clipboard {
    /// Clipboard API で書き込む
    async fn write_text(&self, text: &str) -> Result<()>;

    /// 代替手段（一時的なテキスト欄を選択してコピー）
    fn copy_via_selection(&self, text: &str) -> bool;
}

/// 書き込み → 失敗したら代替手段
pub async fn copy_text<C: Clipboard>(clipboard: &C, text: &str) -> CopyMethod {
    match clipboard.write_text(text).await {
        Ok(()) => CopyMethod::Clipboard,
        Err(e) => {
            tracing::warn!("clipboard write failed, falling back to selection copy: {e}");
            if clipboard.copy_via_selection(text) {
                CopyMethod::Selection
            } else {
                CopyMethod::Failed
            }
        }
    }
}

/// コピーの目的
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyPurpose {
    /// 「選択リンクをコピー」
    Requested,
    /// 全部ブロックされたときの代替
    PopupFallback,
}

/// 非同期で実行するコピー処理
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyJob {
    text: String,
    count: usize,
    purpose: CopyPurpose,
}

impl CopyJob {
    fn new(links: &[String], purpose: CopyPurpose) -> Self {
        Self {
            text: links.join("\n"),
            count: links.len(),
            purpose,
        }
    }

    /// コピーするテキスト（改行区切り）
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn purpose(&self) -> CopyPurpose {
        self.purpose
    }

    pub async fn run<C: Clipboard>(self, clipboard: &C) -> Notice {
        let method = copy_text(clipboard, &self.text).await;
        match (self.purpose, method) {
            (CopyPurpose::Requested, CopyMethod::Failed) => Notice::CopyFailed,
            (CopyPurpose::Requested, _) => Notice::LinksCopied { count: self.count },
            (CopyPurpose::PopupFallback, copied) => Notice::PopupsBlocked { copied },
        }
    }
}

/// 同期処理の後に残る仕事
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Followup {
    /// 終了。通知だけ出す
    Done(Notice),
    /// クリップボード処理を実行してから通知する
    Copy(CopyJob),
}

impl Followup {
    /// 最後まで実行して通知内容を返す
    pub async fn resolve<C: Clipboard>(self, clipboard: &C) -> Notice {
        match self {
            Followup::Done(notice) => notice,
            Followup::Copy(job) => job.run(clipboard).await,
        }
    }
}

/// リンクの一括オープン
#[derive(Debug, Clone)]
pub struct LinkDispatcher<O, R> {
    opener: O,
    scheduler: R,
    stagger: Duration,
}

impl<O: ContextOpener, R: RetryScheduler> LinkDispatcher<O, R> {
    pub fn new(opener: O, scheduler: R) -> Self {
        Self {
            opener,
            scheduler,
            stagger: RETRY_STAGGER,
        }
    }

    pub fn with_stagger(mut self, stagger: Duration) -> Self {
        self.stagger = stagger;
        self
    }

    pub fn opener(&self) -> &O {
        &self.opener
    }

    pub fn scheduler(&self) -> &R {
        &self.scheduler
    }

    /// 1件だけ開く（リンクがなければ何もしない）
    pub fn open_one(&self, record: &ItemRecord) -> Option<OpenAttempt> {
        record.link().map(|link| self.opener.open(link))
    }

    /// 選択行のリンクをすべて開く
    pub fn open_all(&self, rows: &[&ItemRecord]) -> Followup {
        if rows.is_empty() {
            return Followup::Done(Notice::NothingSelected);
        }

        let links = resolvable_links(rows);

        let mut opened = 0;
        let mut blocked = Vec::new();
        for link in &links {
            match self.opener.open(link) {
                OpenAttempt::Opened => opened += 1,
                OpenAttempt::Blocked => blocked.push(link.clone()),
            }
        }
        tracing::debug!(opened, blocked = blocked.len(), "immediate open pass");

        // 1件も開けなかった（リンクがなかった場合も含む）→ コピーで代替
        if opened == 0 {
            return Followup::Copy(CopyJob::new(&links, CopyPurpose::PopupFallback));
        }

        if blocked.is_empty() {
            return Followup::Done(Notice::AllOpened { count: opened });
        }

        let retrying = blocked.len();
        for (i, url) in blocked.into_iter().enumerate() {
            self.scheduler.schedule(url, self.stagger * i as u32);
        }
        Followup::Done(Notice::RetryingBlocked { opened, retrying })
    }
}

/// 選択行のリンクをコピーする
pub fn copy_links(rows: &[&ItemRecord]) -> Followup {
    let links = resolvable_links(rows);
    if links.is_empty() {
        return Followup::Done(Notice::NoLinksToCopy);
    }
    Followup::Copy(CopyJob::new(&links, CopyPurpose::Requested))
}


#[cfg(test)]
mod tests {
    use super::fakes::*;
    use super::*;
    use futures::executor::block_on;
    use super::OpenAttempt::{Blocked, Opened};

    fn record(id: &str, link: Option<&str>) -> ItemRecord {
        ItemRecord {
            id: id.to_string(),
            name: id.to_string(),
            link: link.map(str::to_string),
            ..Default::default()
        }
    }

    fn three_linked() -> Vec<ItemRecord> {
        vec![
            record("a", Some("https://example.com/a")),
            record("b", Some("https://example.com/b")),
            record("c", Some("https://example.com/c")),
        ]
    }

    fn dispatcher(script: &[OpenAttempt]) -> LinkDispatcher<ScriptedOpener, RecordingScheduler> {
        LinkDispatcher::new(ScriptedOpener::new(script), RecordingScheduler::default())
    }

    #[test]
    fn test_open_all_empty_selection() {
        let d = dispatcher(&[]);
        let followup = d.open_all(&[]);

        assert_eq!(followup, Followup::Done(Notice::NothingSelected));
        assert_eq!(d.opener().attempts(), 0);
    }

    #[test]
    fn test_open_all_every_link_opens() {
        let records = three_linked();
        let rows: Vec<&ItemRecord> = records.iter().collect();
        let d = dispatcher(&[Opened, Opened, Opened]);

        let followup = d.open_all(&rows);
        assert_eq!(followup, Followup::Done(Notice::AllOpened { count: 3 }));
        assert!(d.scheduler().scheduled.borrow().is_empty());
    }

    #[test]
    fn test_open_all_partial_block_schedules_retry() {
        let records = three_linked();
        let rows: Vec<&ItemRecord> = records.iter().collect();
        let d = dispatcher(&[Opened, Blocked, Opened]);

        let followup = d.open_all(&rows);
        match &followup {
            Followup::Done(notice) => {
                assert_eq!(*notice, Notice::RetryingBlocked { opened: 2, retrying: 1 });
                assert!(!notice.is_failure());
            }
            other => panic!("unexpected followup: {:?}", other),
        }

        let scheduled = d.scheduler().scheduled.borrow();
        assert_eq!(
            *scheduled,
            vec![("https://example.com/b".to_string(), Duration::ZERO)]
        );
    }

    #[test]
    fn test_partial_block_staggers_retries() {
        let records = three_linked();
        let rows: Vec<&ItemRecord> = records.iter().collect();
        let d = dispatcher(&[Blocked, Opened, Blocked]);

        d.open_all(&rows);

        let delays: Vec<Duration> = d
            .scheduler()
            .scheduled
            .borrow()
            .iter()
            .map(|(_, delay)| *delay)
            .collect();
        assert_eq!(delays, vec![Duration::ZERO, Duration::from_millis(150)]);
    }

    #[test]
    fn test_open_all_total_block_copies_links() {
        let records = three_linked();
        let rows: Vec<&ItemRecord> = records.iter().collect();
        let d = dispatcher(&[Blocked, Blocked, Blocked]);
        let clipboard = FakeClipboard::default();

        let followup = d.open_all(&rows);
        assert!(d.scheduler().scheduled.borrow().is_empty());

        let notice = block_on(followup.resolve(&clipboard));
        assert_eq!(notice, Notice::PopupsBlocked { copied: CopyMethod::Clipboard });
        assert_eq!(
            *clipboard.api_writes.borrow(),
            vec!["https://example.com/a\nhttps://example.com/b\nhttps://example.com/c".to_string()]
        );
    }

    #[test]
    fn test_total_block_with_clipboard_denied_uses_selection() {
        let records = three_linked();
        let rows: Vec<&ItemRecord> = records.iter().collect();
        let d = dispatcher(&[Blocked, Blocked, Blocked]);
        let clipboard = FakeClipboard::denied();

        let notice = block_on(d.open_all(&rows).resolve(&clipboard));
        assert_eq!(notice, Notice::PopupsBlocked { copied: CopyMethod::Selection });
        assert_eq!(clipboard.selection_writes.borrow().len(), 1);
    }

    #[test]
    fn test_open_all_skips_records_without_link() {
        let records = vec![
            record("a", Some("https://example.com/a")),
            record("b", None),
        ];
        let rows: Vec<&ItemRecord> = records.iter().collect();
        let d = dispatcher(&[]);

        let followup = d.open_all(&rows);
        assert_eq!(followup, Followup::Done(Notice::AllOpened { count: 1 }));
        assert_eq!(*d.opener().opened.borrow(), vec!["https://example.com/a".to_string()]);
    }

    #[test]
    fn test_open_all_without_any_link_falls_back_to_copy() {
        let records = vec![record("a", None)];
        let rows: Vec<&ItemRecord> = records.iter().collect();
        let d = dispatcher(&[]);
        let clipboard = FakeClipboard::default();

        let followup = d.open_all(&rows);
        assert_eq!(d.opener().attempts(), 0);
        assert!(d.scheduler().scheduled.borrow().is_empty());
        match &followup {
            Followup::Copy(job) => {
                assert_eq!(job.purpose(), CopyPurpose::PopupFallback);
                assert_eq!(job.count(), 0);
            }
            other => panic!("unexpected followup: {:?}", other),
        }

        let notice = block_on(followup.resolve(&clipboard));
        assert_eq!(notice, Notice::PopupsBlocked { copied: CopyMethod::Clipboard });
        assert_eq!(clipboard.calls.get(), 1);
    }

    #[test]
    fn test_open_one() {
        let d = dispatcher(&[Blocked]);
        assert_eq!(d.open_one(&record("a", None)), None);
        assert_eq!(d.open_one(&record("b", Some("https://example.com/b"))), Some(Blocked));
    }

    #[test]
    fn test_copy_links_single_resolvable() {
        let records = vec![
            record("a", Some("https://example.com/a")),
            record("b", None),
        ];
        let rows: Vec<&ItemRecord> = records.iter().collect();
        let clipboard = FakeClipboard::default();

        let notice = block_on(copy_links(&rows).resolve(&clipboard));
        assert_eq!(notice, Notice::LinksCopied { count: 1 });
        assert_eq!(*clipboard.api_writes.borrow(), vec!["https://example.com/a".to_string()]);
    }

    #[test]
    fn test_copy_links_nothing_to_copy() {
        let records = vec![record("a", None)];
        let rows: Vec<&ItemRecord> = records.iter().collect();
        let clipboard = FakeClipboard::default();

        let notice = block_on(copy_links(&rows).resolve(&clipboard));
        assert_eq!(notice, Notice::NoLinksToCopy);
        assert_eq!(clipboard.calls.get(), 0);
    }

    #[test]
    fn test_copy_links_both_methods_fail() {
        let records = three_linked();
        let rows: Vec<&ItemRecord> = records.iter().collect();
        let clipboard = FakeClipboard {
            deny_api: true,
            deny_selection: true,
            ..Default::default()
        };

        let notice = block_on(copy_links(&rows).resolve(&clipboard));
        assert_eq!(notice, Notice::CopyFailed);
    }

    #[test]
    fn test_copy_job_accessors() {
        let records = three_linked();
        let rows: Vec<&ItemRecord> = records.iter().collect();
        match copy_links(&rows) {
            Followup::Copy(job) => {
                assert_eq!(job.count(), 3);
                assert_eq!(job.purpose(), CopyPurpose::Requested);
                assert_eq!(job.text().lines().count(), 3);
            }
            other => panic!("unexpected followup: {:?}", other),
        }
    }
}

//! サブコマンドの処理
//!
//! ウィジェットと同じコントローラを使い、メニュー操作をコマンドとして実行する。

use crate::error::{Result, VegiError};
use crate::launcher::{LaunchCommand, ProcessRetry, SystemOpener};
use crate::store::FileStore;
use dialoguer::MultiSelect;
use lotte_vegi_common::{
    Clipboard, ContextOpener, ItemRecord, KeyValueStore, LinkDispatcher, Notice, OpenAttempt,
    RecordStore, RetryScheduler, SortConfig, WidgetController,
};
use std::path::Path;

pub type CliController = WidgetController<FileStore, SystemOpener, ProcessRetry>;

/// 商品データを読み込む
pub fn load_records(path: &Path) -> Result<RecordStore> {
    if !path.exists() {
        return Err(VegiError::DataNotFound(path.display().to_string()));
    }
    let content = std::fs::read_to_string(path)?;
    let records = RecordStore::from_json(&content)?;
    tracing::debug!("{}件の商品を読み込み: {}", records.len(), path.display());
    Ok(records)
}

/// CLI用コントローラを組み立てる
pub fn open_controller(
    data_path: &Path,
    state_path: &Path,
    config: SortConfig,
    browser: Option<&str>,
) -> Result<CliController> {
    let records = load_records(data_path)?;
    let opener = SystemOpener::new(LaunchCommand::resolve(browser));
    let retry = ProcessRetry::new(LaunchCommand::platform());
    Ok(WidgetController::new(
        records,
        config,
        FileStore::load(state_path),
        LinkDispatcher::new(opener, retry),
    ))
}

fn row_line(index: usize, item: &ItemRecord, picked: bool) -> String {
    let mark = if picked { "[x]" } else { "[ ]" };
    let dim = if item.is_lower_rated() { " ↓" } else { "" };
    let rating = item.rating_label();
    let rating = if rating.is_empty() { "-".to_string() } else { rating };
    let link = if item.link().is_some() { "" } else { " (링크 없음)" };
    format!(
        "{} {:>2}. {}{}  ★ {}  {}  [{}]{}",
        mark,
        index + 1,
        item.name,
        dim,
        rating,
        item.price_label(),
        item.id,
        link
    )
}

/// 一覧表示用の行
pub fn render_list<S, O, R>(controller: &WidgetController<S, O, R>) -> Vec<String>
where
    S: KeyValueStore,
    O: ContextOpener,
    R: RetryScheduler,
{
    let mut lines = vec![format!(
        "{} · 찜 {}{}",
        controller.sort_label(),
        controller.picked_count(),
        if controller.show_only_picked() { " · 선택한 항목만" } else { "" }
    )];

    let items = controller.visible_items();
    if items.is_empty() {
        lines.push("표시할 데이터가 없습니다.".to_string());
        return lines;
    }

    lines.extend(
        items
            .iter()
            .enumerate()
            .map(|(i, item)| row_line(i, item, controller.is_picked(&item.id))),
    );
    lines
}

/// IDを指定して찜を切り替える（未知のIDがあれば何も変更しない）
pub fn toggle_picks<S, O, R>(
    controller: &mut WidgetController<S, O, R>,
    ids: &[String],
) -> Result<Vec<(String, bool)>>
where
    S: KeyValueStore,
    O: ContextOpener,
    R: RetryScheduler,
{
    if let Some(unknown) = ids.iter().find(|id| !controller.records().contains(id)) {
        return Err(VegiError::UnknownItem(unknown.clone()));
    }
    Ok(ids
        .iter()
        .map(|id| (id.clone(), controller.toggle_pick(id)))
        .collect())
}

/// 対話選択の候補（表示の絞り込みに関係なく全件）
pub fn pick_choices<S, O, R>(controller: &WidgetController<S, O, R>) -> Vec<PickChoice>
where
    S: KeyValueStore,
    O: ContextOpener,
    R: RetryScheduler,
{
    controller
        .sorted_items()
        .iter()
        .map(|item| PickChoice {
            id: item.id.clone(),
            label: format!("{}  ★ {}  {}", item.name, item.rating_label(), item.price_label()),
            picked: controller.is_picked(&item.id),
        })
        .collect()
}

/// 対話選択の1行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickChoice {
    pub id: String,
    pub label: String,
    pub picked: bool,
}

/// 選ばれた番号に合わせて찜を切り替え、変更件数を返す
pub fn apply_choices<S, O, R>(
    controller: &mut WidgetController<S, O, R>,
    choices: &[PickChoice],
    chosen: &[usize],
) -> usize
where
    S: KeyValueStore,
    O: ContextOpener,
    R: RetryScheduler,
{
    let mut changed = 0;
    for (i, choice) in choices.iter().enumerate() {
        if chosen.contains(&i) != choice.picked {
            controller.toggle_pick(&choice.id);
            changed += 1;
        }
    }
    changed
}

/// 対話的に찜を選び直す（キャンセル時は変更なし）
pub fn pick_interactive(controller: &mut CliController) -> Result<usize> {
    let choices = pick_choices(controller);
    if choices.is_empty() {
        println!("표시할 데이터가 없습니다.");
        return Ok(0);
    }

    let labels: Vec<&str> = choices.iter().map(|c| c.label.as_str()).collect();
    let defaults: Vec<bool> = choices.iter().map(|c| c.picked).collect();

    let chosen = MultiSelect::new()
        .with_prompt("찜할 항목 선택 (Space: 선택, Enter: 확정)")
        .items(&labels)
        .defaults(&defaults)
        .interact_opt()
        .map_err(|e| VegiError::Prompt(e.to_string()))?;

    match chosen {
        Some(chosen) => Ok(apply_choices(controller, &choices, &chosen)),
        None => Ok(0),
    }
}

/// メニュー: 選択リンクをコピー
pub async fn copy_links<S, O, R, C>(controller: &mut WidgetController<S, O, R>, clipboard: &C) -> Notice
where
    S: KeyValueStore,
    O: ContextOpener,
    R: RetryScheduler,
    C: Clipboard,
{
    controller.copy_links().resolve(clipboard).await
}

/// メニュー: 選択リンクをすべて開く
pub async fn open_all<S, O, R, C>(controller: &mut WidgetController<S, O, R>, clipboard: &C) -> Notice
where
    S: KeyValueStore,
    O: ContextOpener,
    R: RetryScheduler,
    C: Clipboard,
{
    controller.open_all().resolve(clipboard).await
}

/// 1件だけ開く
pub fn open_item<S, O, R>(controller: &WidgetController<S, O, R>, id: &str) -> Result<OpenAttempt>
where
    S: KeyValueStore,
    O: ContextOpener,
    R: RetryScheduler,
{
    if !controller.records().contains(id) {
        return Err(VegiError::UnknownItem(id.to_string()));
    }
    controller
        .open_item(id)
        .ok_or_else(|| VegiError::NoLink(id.to_string()))
}

//! 並び替え・絞り込み
//!
//! レコードストアと選択状態から表示用のリストを毎回作り直す純粋関数群。
//! 件数は小さい前提なので O(n log n) の全ソートで十分。

use crate::error::Error;
use crate::selection::PickedIds;
use crate::types::ItemRecord;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// ソートキー
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Rating,
    #[serde(rename = "priceKrwPerKg", alias = "price")]
    Price,
    Name,
    Id,
}

impl SortKey {
    /// 見出し用の短い名前
    pub fn label(&self) -> &'static str {
        match self {
            SortKey::Rating => "rating",
            SortKey::Price => "price",
            SortKey::Name => "name",
            SortKey::Id => "id",
        }
    }
}

impl std::str::FromStr for SortKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rating" => Ok(SortKey::Rating),
            "pricekrwperkg" | "price" => Ok(SortKey::Price),
            "name" => Ok(SortKey::Name),
            "id" => Ok(SortKey::Id),
            _ => Err(Error::UnknownSortKey(s.to_string())),
        }
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortKey::Price => write!(f, "priceKrwPerKg"),
            other => write!(f, "{}", other.label()),
        }
    }
}

/// ソート順
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl std::str::FromStr for SortOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortOrder::Asc),
            "desc" | "descending" => Ok(SortOrder::Desc),
            _ => Err(Error::UnknownSortOrder(s.to_string())),
        }
    }
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortOrder::Asc => write!(f, "asc"),
            SortOrder::Desc => write!(f, "desc"),
        }
    }
}

/// ソート設定（セッション中は不変）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortConfig {
    #[serde(default)]
    pub sort_by: SortKey,
    #[serde(default)]
    pub order: SortOrder,
}

impl SortConfig {
    pub fn new(sort_by: SortKey, order: SortOrder) -> Self {
        Self { sort_by, order }
    }

    /// `Sorted by rating (desc)`
    pub fn label(&self) -> String {
        format!("Sorted by {} ({})", self.sort_by.label(), self.order)
    }

    /// 三方比較（昇順なら a→b、降順なら反転）
    pub fn compare(&self, a: &ItemRecord, b: &ItemRecord) -> Ordering {
        let ord = match self.sort_by {
            SortKey::Rating => compare_optional(a.rating, b.rating),
            SortKey::Price => compare_optional(a.price_krw_per_kg, b.price_krw_per_kg),
            SortKey::Name => a.name.cmp(&b.name),
            SortKey::Id => a.id.cmp(&b.id),
        };
        match self.order {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        }
    }
}

// 値なしは常に値ありより小さい
fn compare_optional(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
    }
}

/// ソート済みリスト
pub fn sorted<'a>(records: &'a [ItemRecord], config: SortConfig) -> Vec<&'a ItemRecord> {
    let mut rows: Vec<&ItemRecord> = records.iter().collect();
    rows.sort_by(|a, b| config.compare(a, b));
    rows
}

/// 表示用リストを作る
///
/// `show_only_picked` が true なら選択済みのみに絞る（ソート順は維持）。
/// ストアにない古いIDは何にもマッチしないだけ。
pub fn derive_view<'a>(
    records: &'a [ItemRecord],
    config: SortConfig,
    picked: &PickedIds,
    show_only_picked: bool,
) -> Vec<&'a ItemRecord> {
    let rows = sorted(records, config);
    if show_only_picked {
        rows.into_iter().filter(|r| picked.contains(&r.id)).collect()
    } else {
        rows
    }
}

/// 選択済みの行（表示フィルタに関係なくソート順）
pub fn selected_rows<'a>(
    records: &'a [ItemRecord],
    config: SortConfig,
    picked: &PickedIds,
) -> Vec<&'a ItemRecord> {
    derive_view(records, config, picked, true)
}

/// 開ける/コピーできるリンクだけを取り出す
pub fn resolvable_links(rows: &[&ItemRecord]) -> Vec<String> {
    rows.iter()
        .filter_map(|r| r.link())
        .map(str::to_string)
        .collect()
}

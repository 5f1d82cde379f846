//! 商品レコードとレコードストア
//!
//! マーカーデータ（`{"places": [...]}`）を読み込み、起動後は変更しない。

use serde::{Deserialize, Serialize};

/// 評価がこの値未満なら「低評価」表示
pub const LOWER_RATED_THRESHOLD: f64 = 4.3;

/// 価格がない場合の表示
pub const PRICE_PLACEHOLDER: &str = "—";

/// 商品レコード
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRecord {
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub thumbnail: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_krw_per_kg: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl ItemRecord {
    /// 開けるリンク（空文字はリンクなし扱い）
    pub fn link(&self) -> Option<&str> {
        self.link.as_deref().filter(|l| !l.trim().is_empty())
    }

    pub fn is_lower_rated(&self) -> bool {
        self.rating.is_some_and(|r| r < LOWER_RATED_THRESHOLD)
    }

    /// 評価の表示（小数1桁）
    pub fn rating_label(&self) -> String {
        self.rating.map(|r| format!("{:.1}", r)).unwrap_or_default()
    }

    pub fn price_label(&self) -> String {
        format_price(self.price_krw_per_kg)
    }
}

/// 価格を `₩1,234 / kg` 形式に整形
pub fn format_price(krw_per_kg: Option<f64>) -> String {
    match krw_per_kg {
        Some(v) if v.is_finite() => format!("₩{} / kg", group_thousands(v)),
        _ => PRICE_PLACEHOLDER.to_string(),
    }
}

/// 3桁区切り（小数は最大3桁、末尾の0は落とす）
fn group_thousands(value: f64) -> String {
    let fixed = format!("{:.3}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let frac = frac_part.trim_end_matches('0');
    let sign = if value < 0.0 && (int_part != "0" || !frac.is_empty()) { "-" } else { "" };
    if frac.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac}")
    }
}

/// マーカーデータファイルの構造
#[derive(Debug, Deserialize)]
struct MarkersFile {
    #[serde(default)]
    places: serde_json::Value,
}

/// 不変のレコード集合
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<ItemRecord>,
}

impl RecordStore {
    pub fn new(records: Vec<ItemRecord>) -> Self {
        Self { records }
    }

    /// マーカーJSONから読み込み
    ///
    /// `places` が配列でなければ空のストアになる。
    /// 配列内の不正な要素はスキップする。
    pub fn from_json(json: &str) -> crate::Result<Self> {
        let file: MarkersFile = serde_json::from_str(json)?;
        let records = match file.places {
            serde_json::Value::Array(items) => items
                .into_iter()
                .filter_map(|item| match serde_json::from_value::<ItemRecord>(item) {
                    Ok(record) => Some(record),
                    Err(e) => {
                        tracing::warn!("skipping malformed place: {e}");
                        None
                    }
                })
                .collect(),
            _ => Vec::new(),
        };
        Ok(Self { records })
    }

    pub fn records(&self) -> &[ItemRecord] {
        &self.records
    }

    pub fn get(&self, id: &str) -> Option<&ItemRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

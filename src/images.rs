//! 画像収集・重複排除エンジン
//!
//! タブごとに見えている画像URL集合を統合する。同一URLが複数カテゴリで
//! 観測された場合は優先度の高いカテゴリ（外観 > 内装 > 間取り図）が勝ち、
//! 挿入位置は最初の観測位置を保持する。

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

/// レコードが持つ画像スロット数の上限
pub const MAX_IMAGE_SLOTS: usize = 16;

/// 間取り図URLの命名規約（`fr_<番号>` のリサイズ画像ファイル名）
static FLOORPLAN_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/fr_[0-9]+\.(?:jpe?g|png|webp)").expect("invalid regex: floorplan name")
});

/// 画像カテゴリ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageCategory {
    Floorplan,
    Interior,
    Exterior,
}

impl ImageCategory {
    /// マージ時の優先度（大きい方が勝つ）
    pub fn priority(&self) -> u8 {
        match self {
            Self::Floorplan => 0,
            Self::Interior => 1,
            Self::Exterior => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Floorplan => "floorplan",
            Self::Interior => "interior",
            Self::Exterior => "exterior",
        }
    }
}

/// 収集済み画像エントリ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageEntry {
    pub category: ImageCategory,
    pub url: String,
}

/// URL形状からカテゴリを推定する
///
/// 間取り図マーカー（`madori`/`floorplan`）かリサイズ命名規約に一致すれば
/// 間取り図。それ以外は表示中ビューのカテゴリ、ビューが無ければ内装扱い。
pub fn classify_url(url: &str, view_category: Option<ImageCategory>) -> ImageCategory {
    if url.contains("madori") || url.contains("floorplan") || FLOORPLAN_NAME_RE.is_match(url) {
        ImageCategory::Floorplan
    } else {
        view_category.unwrap_or(ImageCategory::Interior)
    }
}

/// プレースホルダー画像（収集対象外）
pub fn is_placeholder_url(url: &str) -> bool {
    url.is_empty() || url.contains("nofloorplan.webp")
}

/// 挿入順を保持するURLキーの画像集合
#[derive(Debug, Default)]
pub struct ImageSet {
    entries: Vec<ImageEntry>,
    index: HashMap<String, usize>,
}

impl ImageSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// 画像を1件取り込む
    ///
    /// 既知URLの再観測時は、新カテゴリの優先度が厳密に高い場合のみ
    /// カテゴリを上書きする（位置は元のまま）。初観測なら末尾に追加。
    pub fn insert(&mut self, url: impl Into<String>, category: ImageCategory) {
        let url = url.into();
        if is_placeholder_url(&url) {
            return;
        }
        match self.index.get(&url) {
            Some(&i) => {
                if category.priority() > self.entries[i].category.priority() {
                    self.entries[i].category = category;
                }
            }
            None => {
                self.index.insert(url.clone(), self.entries.len());
                self.entries.push(ImageEntry { category, url });
            }
        }
    }

    pub fn contains(&self, url: &str) -> bool {
        self.index.contains_key(url)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 最終リストを取り出す（スロット上限で切り詰め、先着優先）
    pub fn into_entries(mut self) -> Vec<ImageEntry> {
        self.entries.truncate(MAX_IMAGE_SLOTS);
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_url() {
        assert_eq!(
            classify_url("https://img.example.jp/madori/001.jpg", None),
            ImageCategory::Floorplan
        );
        assert_eq!(
            classify_url("https://img.example.jp/fr_001.webp", Some(ImageCategory::Exterior)),
            ImageCategory::Floorplan
        );
        assert_eq!(
            classify_url("https://img.example.jp/room/001.jpg", Some(ImageCategory::Exterior)),
            ImageCategory::Exterior
        );
        // ビュー指定なしは内装扱い
        assert_eq!(
            classify_url("https://img.example.jp/room/001.jpg", None),
            ImageCategory::Interior
        );
    }

    #[test]
    fn test_placeholder_filtered() {
        let mut set = ImageSet::new();
        set.insert("https://img.example.jp/nofloorplan.webp", ImageCategory::Floorplan);
        set.insert("", ImageCategory::Interior);
        assert!(set.is_empty());
    }

    #[test]
    fn test_priority_upgrade_keeps_position() {
        let mut set = ImageSet::new();
        set.insert("https://a.jp/x.jpg", ImageCategory::Floorplan);
        set.insert("https://a.jp/y.jpg", ImageCategory::Interior);
        // 同一URLを外観として再観測 → カテゴリ昇格、位置は先頭のまま
        set.insert("https://a.jp/x.jpg", ImageCategory::Exterior);

        let entries = set.into_entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].url, "https://a.jp/x.jpg");
        assert_eq!(entries[0].category, ImageCategory::Exterior);
        assert_eq!(entries[1].category, ImageCategory::Interior);
    }

    #[test]
    fn test_lower_priority_ignored() {
        let mut set = ImageSet::new();
        set.insert("https://a.jp/x.jpg", ImageCategory::Exterior);
        set.insert("https://a.jp/x.jpg", ImageCategory::Floorplan);

        let entries = set.into_entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].category, ImageCategory::Exterior);
    }

    #[test]
    fn test_truncate_to_slot_limit() {
        let mut set = ImageSet::new();
        for i in 0..20 {
            set.insert(format!("https://a.jp/{i}.jpg"), ImageCategory::Interior);
        }
        let entries = set.into_entries();
        assert_eq!(entries.len(), MAX_IMAGE_SLOTS);
        // 先に挿入されたものが残る
        assert_eq!(entries[0].url, "https://a.jp/0.jpg");
        assert_eq!(entries[15].url, "https://a.jp/15.jpg");
    }
}

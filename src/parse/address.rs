//! 住所パーサー
//!
//! 所在地文字列を 都道府県 / 市区郡 / 町名 / 丁目番地 に分割する。
//! 左から順に確定していく方式で、前段が取れなければ後段も取れない。
//! 厳密な文法ではなくベストエフォートのヒューリスティック。

use std::sync::LazyLock;

use regex::Regex;

static PREF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*?[都道府県])(.+)$").expect("invalid regex: prefecture"));
static CITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*?[市区郡])(.*)$").expect("invalid regex: city"));
static BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+?)(\d.*|[一二三四五六七八九十]+\s*丁目.*)$").expect("invalid regex: block")
});

/// 分割済み住所
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Address {
    pub prefecture: Option<String>,
    pub city: Option<String>,
    pub district: Option<String>,
    pub chome_banchi: Option<String>,
}

impl Address {
    /// 所在地文字列を分割する
    ///
    /// 1. 都/道/府/県 で終わる先頭部分。見つからなければ全フィールドNone。
    /// 2. 市/区/郡 で終わる先頭部分。見つからなければ都道府県のみ。
    /// 3. 残りを町名と丁目番地に分割。数字または漢数字＋丁目の開始位置を
    ///    優先し、だめなら空白分割、空白もなければ全体を町名とする。
    pub fn parse(addr: &str) -> Self {
        if addr.is_empty() {
            return Self::default();
        }

        let Some(m) = PREF_RE.captures(addr) else {
            return Self::default();
        };
        let prefecture = m[1].trim().to_string();
        let rest = &m[2];

        let Some(m2) = CITY_RE.captures(rest) else {
            return Self {
                prefecture: Some(prefecture),
                ..Default::default()
            };
        };
        let city = m2[1].trim().to_string();
        let tail = m2[2].trim();

        let (district, chome_banchi) = if let Some(m3) = BLOCK_RE.captures(tail) {
            (
                Some(m3[1].trim_matches([' ', '・']).to_string()),
                Some(m3[2].trim().to_string()),
            )
        } else {
            // フォールバック: 空白で分割
            let parts: Vec<&str> = tail.split_whitespace().collect();
            if parts.len() >= 2 {
                (Some(parts[0].to_string()), Some(parts[1..].join(" ")))
            } else {
                (Some(tail.to_string()), None)
            }
        };

        Self {
            prefecture: Some(prefecture),
            city: Some(city),
            district,
            chome_banchi,
        }
    }
}

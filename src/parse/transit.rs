//! 交通（路線・駅・徒歩分数）パーサー

use std::sync::LazyLock;

use regex::Regex;

use super::text::{extract_integer, strip_tags};

static WALK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"徒歩\s*([0-9０-９]+)\s*分").expect("invalid regex: walk minutes")
});
static LINE_STATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:JR|ＪＲ)?\s*([^\s]+線)\s*([^\s]+)\s*徒歩").expect("invalid regex: line/station")
});

/// 交通1区間
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransitLeg {
    pub station: Option<String>,
    pub line: Option<String>,
    pub walk_minutes: Option<i64>,
}

impl TransitLeg {
    /// 交通欄のHTML断片をパースする
    ///
    /// 例: `ＪＲ 総武線 錦糸町 徒歩9分`
    ///
    /// 徒歩分数は路線・駅とは独立に抽出する。路線・駅は
    /// 「〜線 駅名 徒歩」のパターンを優先し、だめなら空白トークン列で
    /// 「徒歩」の直前2トークンを (路線, 駅) とみなす。
    pub fn parse(html_block: &str) -> Self {
        let text = strip_tags(html_block);

        let walk_minutes = WALK_RE
            .captures(&text)
            .and_then(|m| extract_integer(m.get(1).map(|g| g.as_str()).unwrap_or_default()));

        if let Some(m) = LINE_STATION_RE.captures(&text) {
            return Self {
                station: Some(m[2].to_string()),
                line: Some(m[1].to_string()),
                walk_minutes,
            };
        }

        // フォールバック: トークン位置ベース
        let toks: Vec<&str> = text.split_whitespace().collect();
        if let Some(i) = toks.iter().position(|t| *t == "徒歩") {
            if i >= 2 {
                return Self {
                    station: Some(toks[i - 1].to_string()),
                    line: Some(toks[i - 2].to_string()),
                    walk_minutes,
                };
            }
        }

        Self {
            station: None,
            line: None,
            walk_minutes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_compact() {
        let leg = TransitLeg::parse("ＪＲ総武線錦糸町徒歩9分");
        assert_eq!(leg.station.as_deref(), Some("錦糸町"));
        assert_eq!(leg.line.as_deref(), Some("総武線"));
        assert_eq!(leg.walk_minutes, Some(9));
    }

    #[test]
    fn test_parse_spaced_html() {
        let leg = TransitLeg::parse("<p>ＪＲ 総武線 錦糸町 徒歩9分</p>");
        assert_eq!(leg.station.as_deref(), Some("錦糸町"));
        assert_eq!(leg.line.as_deref(), Some("総武線"));
        assert_eq!(leg.walk_minutes, Some(9));
    }

    #[test]
    fn test_parse_fullwidth_minutes() {
        let leg = TransitLeg::parse("東京メトロ半蔵門線 錦糸町 徒歩１０分");
        assert_eq!(leg.walk_minutes, Some(10));
        assert_eq!(leg.line.as_deref(), Some("東京メトロ半蔵門線"));
    }

    #[test]
    fn test_parse_token_fallback() {
        // 「線」で終わらない路線名はトークン位置で救済
        let leg = TransitLeg::parse("ゆりかもめ 豊洲 徒歩 5 分");
        assert_eq!(leg.line.as_deref(), Some("ゆりかもめ"));
        assert_eq!(leg.station.as_deref(), Some("豊洲"));
        assert_eq!(leg.walk_minutes, Some(5));
    }

    #[test]
    fn test_parse_walk_only() {
        let leg = TransitLeg::parse("徒歩12分");
        assert!(leg.station.is_none());
        assert!(leg.line.is_none());
        assert_eq!(leg.walk_minutes, Some(12));
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(TransitLeg::parse(""), TransitLeg::default());
    }
}

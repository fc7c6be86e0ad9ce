//! テキスト正規化とスカラー値抽出
//!
//! 全角数字の正規化、タグ除去、金額・ヶ月数・年・面積などの抽出。
//! 抽出失敗は常に `None` であり、エラーにはならない。

use std::sync::LazyLock;

use regex::Regex;

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("invalid regex: tag"));
static WS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("invalid regex: whitespace"));

static INT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(-?[0-9]+)").expect("invalid regex: integer"));
static MONEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]{1,3}(?:,[0-9]{3})+|[0-9]+)\s*円").expect("invalid regex: money")
});
static MONTHS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]+(?:\.[0-9]+)?)\s*ヶ月").expect("invalid regex: months")
});
static YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]{4})年").expect("invalid regex: year"));
static AREA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9.]+)\s*㎡").expect("invalid regex: area"));

static POSTCODE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"〒\s*([0-9]{3}-?[0-9]{4})").expect("invalid regex: postcode")
});
static ROOM_TYPE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9A-Z]+[A-Z]?[＋\+\w]*)\s*/").expect("invalid regex: room type")
});
static LOCK_EXCHANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(鍵交換|キー交換|玄関[鍵錠]交換|鍵交換費|鍵交換料)").expect("invalid regex: lock exchange")
});
static MAINTENANCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/\s*([0-9,０-９]+円)").expect("invalid regex: maintenance")
});
static GUARANTOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"【([^】]+)】").expect("invalid regex: guarantor"));

/// 全角アラビア数字（U+FF10〜FF19）をASCII数字に変換する
///
/// それ以外の文字はそのまま。冪等。
pub fn normalize_digits(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '０'..='９' => char::from_u32(c as u32 - '０' as u32 + '0' as u32).unwrap_or(c),
            _ => c,
        })
        .collect()
}

/// タグを除去し、連続する空白を1つにまとめる
///
/// 字句的な処理のみ（HTMLツリーは解釈しない）。壊れたマークアップでも
/// パニックしないが、断片が残ることはある。
pub fn strip_tags(s: &str) -> String {
    let text = TAG_RE.replace_all(s, " ");
    WS_RE.replace_all(&text, " ").trim().to_string()
}

/// 最初の符号付き整数を抽出
pub fn extract_integer(s: &str) -> Option<i64> {
    let s = normalize_digits(s);
    INT_RE.captures(&s)?.get(1)?.as_str().parse().ok()
}

/// 円単位の金額を抽出（カンマ区切り対応）
///
/// 「円」が付いていない数値は金額とみなさない。
pub fn extract_money(s: &str) -> Option<i64> {
    let s = normalize_digits(s);
    let m = MONEY_RE.captures(&s)?;
    m.get(1)?.as_str().replace(',', "").parse().ok()
}

/// ヶ月数を抽出（小数対応）
pub fn extract_months(s: &str) -> Option<f64> {
    let s = normalize_digits(s);
    MONTHS_RE.captures(&s)?.get(1)?.as_str().parse().ok()
}

/// 西暦年（4桁＋「年」）を抽出
pub fn extract_year(s: &str) -> Option<i64> {
    let s = normalize_digits(s);
    YEAR_RE.captures(&s)?.get(1)?.as_str().parse().ok()
}

/// 面積（㎡）を抽出
pub fn extract_area(s: &str) -> Option<f64> {
    let s = normalize_digits(s);
    AREA_RE.captures(&s)?.get(1)?.as_str().parse().ok()
}

/// 郵便番号を抽出し `123-4567` 形式に正規化
pub fn extract_postcode(html: &str) -> Option<String> {
    let m = POSTCODE_RE.captures(html)?;
    let zp = m.get(1)?.as_str();
    if zp.contains('-') {
        Some(zp.to_string())
    } else {
        Some(format!("{}-{}", &zp[..3], &zp[3..]))
    }
}

/// 間取りタイプを抽出（例: `1LDK＋S / 40.5㎡` → `1LDK+S`）
pub fn extract_room_type(s: &str) -> Option<String> {
    let m = ROOM_TYPE_RE.captures(s)?;
    Some(m.get(1)?.as_str().replace('＋', "+"))
}

/// 鍵交換費用を抽出
///
/// 鍵交換に関する文言がある場合のみ金額を返す。
pub fn extract_lock_exchange_fee(s: &str) -> Option<i64> {
    if LOCK_EXCHANGE_RE.is_match(s) {
        extract_money(s)
    } else {
        None
    }
}

/// 賃料欄のスラッシュ後の管理費・共益費を抽出
pub fn extract_maintenance_fee(s: &str) -> Option<i64> {
    let m = MAINTENANCE_RE.captures(s)?;
    extract_money(m.get(1)?.as_str())
}

/// 保証会社名を抽出（`【社名】` の列挙をカンマ区切りで連結）
pub fn extract_guarantor_companies(s: &str) -> Option<String> {
    let companies: Vec<&str> = GUARANTOR_RE
        .captures_iter(s)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
        .collect();
    if companies.is_empty() {
        None
    } else {
        Some(companies.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_digits() {
        assert_eq!(normalize_digits("１２３"), "123");
        assert_eq!(normalize_digits("２０１号室"), "201号室");
        assert_eq!(normalize_digits("abc"), "abc");
    }

    #[test]
    fn test_normalize_digits_idempotent() {
        let s = "１２3４abc５";
        let once = normalize_digits(s);
        assert_eq!(normalize_digits(&once), once);
    }

    #[test]
    fn test_strip_tags() {
        assert_eq!(strip_tags("<p>ＪＲ 総武線</p><br>錦糸町"), "ＪＲ 総武線 錦糸町");
        assert_eq!(strip_tags("  a \n b  "), "a b");
    }

    #[test]
    fn test_extract_integer() {
        assert_eq!(extract_integer("地上１４階"), Some(14));
        assert_eq!(extract_integer("-5度"), Some(-5));
        assert_eq!(extract_integer("なし"), None);
    }

    #[test]
    fn test_extract_money() {
        assert_eq!(extract_money("1,234円"), Some(1234));
        assert_eq!(extract_money("123,000円 / 10,000円"), Some(123_000));
        assert_eq!(extract_money("１２３円"), Some(123));
        // 単位なしは金額ではない
        assert_eq!(extract_money("1234"), None);
    }

    #[test]
    fn test_extract_months() {
        assert_eq!(extract_months("2ヶ月"), Some(2.0));
        assert_eq!(extract_months("2.5ヶ月"), Some(2.5));
        assert_eq!(extract_months("なし"), None);
    }

    #[test]
    fn test_extract_year() {
        assert_eq!(extract_year("2015年3月"), Some(2015));
        assert_eq!(extract_year("築10年"), None);
    }

    #[test]
    fn test_extract_area() {
        assert_eq!(extract_area("40.52㎡"), Some(40.52));
        assert_eq!(extract_area("40.52m2"), None);
    }

    #[test]
    fn test_extract_postcode() {
        assert_eq!(
            extract_postcode("〒130-0012 東京都墨田区"),
            Some("130-0012".to_string())
        );
        assert_eq!(
            extract_postcode("〒 1300012"),
            Some("130-0012".to_string())
        );
        assert_eq!(extract_postcode("東京都墨田区"), None);
    }

    #[test]
    fn test_extract_room_type() {
        assert_eq!(extract_room_type("1LDK / 40.52㎡"), Some("1LDK".to_string()));
        assert_eq!(
            extract_room_type("2DK＋S / 50㎡"),
            Some("2DK+S".to_string())
        );
        assert_eq!(extract_room_type("ワンルーム"), None);
    }

    #[test]
    fn test_extract_lock_exchange_fee() {
        assert_eq!(extract_lock_exchange_fee("鍵交換費 16,500円"), Some(16500));
        // 鍵交換の文言がなければ金額があってもNone
        assert_eq!(extract_lock_exchange_fee("町会費 300円"), None);
    }

    #[test]
    fn test_extract_maintenance_fee() {
        assert_eq!(
            extract_maintenance_fee("123,000円 / 10,000円"),
            Some(10_000)
        );
        assert_eq!(extract_maintenance_fee("123,000円"), None);
    }

    #[test]
    fn test_extract_guarantor_companies() {
        assert_eq!(
            extract_guarantor_companies("【A社】または【B社】をご利用ください"),
            Some("A社, B社".to_string())
        );
        assert_eq!(extract_guarantor_companies("保証会社不要"), None);
    }
}

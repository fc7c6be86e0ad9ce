//! 建物種別の推定と規模構造のパース

use std::sync::LazyLock;

use regex::Regex;

use super::text::extract_integer;

static STRUCTURE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+?造)").expect("invalid regex: structure"));
static FLOORS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"地上\s*([0-9０-９]+)\s*階").expect("invalid regex: floors")
});
static BASEMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"地下\s*([0-9０-９]+)\s*階").expect("invalid regex: basement")
});

/// 建物種別
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildingType {
    /// 戸建て
    Detached,
    /// マンション
    ApartmentBuilding,
    /// アパート
    LowRise,
}

impl BuildingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Detached => "戸建て",
            Self::ApartmentBuilding => "マンション",
            Self::LowRise => "アパート",
        }
    }

    /// 構造文・階数・建物名から種別を推定する
    ///
    /// 優先順位カスケード: 建物名の戸建て表記 → 鉄筋/RC または 3階以上 →
    /// 木造 または 2階以下。鉄筋・高層の根拠を木造・低層より先に見るため、
    /// 記述の粗い高層RC物件がアパートに誤判定されることはない。
    pub fn classify(
        structure_text: Option<&str>,
        floors: Option<i64>,
        building_name: Option<&str>,
    ) -> Option<Self> {
        let st = structure_text.unwrap_or_default();
        let bn = building_name.unwrap_or_default();

        if bn.contains("戸建") || bn.contains("一戸建") {
            return Some(Self::Detached);
        }
        if st.contains("鉄筋") || st.contains("RC") || floors.is_some_and(|f| f >= 3) {
            return Some(Self::ApartmentBuilding);
        }
        if st.contains("木造") || floors.is_some_and(|f| f <= 2) {
            return Some(Self::LowRise);
        }
        None
    }
}

/// 規模構造のパース結果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructureInfo {
    /// 構造（「〜造」まで）
    pub structure: Option<String>,
    /// 地上階数
    pub floors: Option<i64>,
    /// 地下階数
    pub basement_floors: Option<i64>,
}

impl StructureInfo {
    /// 例: `鉄筋コンクリート造 地上14階建 / 地下1階`
    pub fn parse(structure_text: &str) -> Self {
        if structure_text.is_empty() {
            return Self::default();
        }
        Self {
            structure: STRUCTURE_RE
                .captures(structure_text)
                .map(|m| m[1].to_string()),
            floors: FLOORS_RE
                .captures(structure_text)
                .and_then(|m| extract_integer(&m[1])),
            basement_floors: BASEMENT_RE
                .captures(structure_text)
                .and_then(|m| extract_integer(&m[1])),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_detached() {
        let t = BuildingType::classify(Some("木造"), Some(2), Some("亀戸一戸建て"));
        assert_eq!(t, Some(BuildingType::Detached));
    }

    #[test]
    fn test_classify_apartment_by_structure() {
        let t = BuildingType::classify(Some("鉄筋コンクリート造"), None, Some("コート錦糸町"));
        assert_eq!(t, Some(BuildingType::ApartmentBuilding));
    }

    #[test]
    fn test_classify_apartment_by_floors() {
        // 構造の記述が粗くても階数で判定
        let t = BuildingType::classify(Some(""), Some(14), None);
        assert_eq!(t, Some(BuildingType::ApartmentBuilding));
    }

    #[test]
    fn test_classify_tall_rc_never_low_rise() {
        // RCかつ2階以下でもマンション側が優先
        let t = BuildingType::classify(Some("RC造"), Some(2), None);
        assert_eq!(t, Some(BuildingType::ApartmentBuilding));
    }

    #[test]
    fn test_classify_low_rise() {
        assert_eq!(
            BuildingType::classify(Some("木造"), None, None),
            Some(BuildingType::LowRise)
        );
        assert_eq!(
            BuildingType::classify(None, Some(2), None),
            Some(BuildingType::LowRise)
        );
    }

    #[test]
    fn test_classify_unknown() {
        assert_eq!(BuildingType::classify(None, None, None), None);
        assert_eq!(BuildingType::classify(Some("鉄骨造"), None, None), None);
    }

    #[test]
    fn test_parse_structure() {
        let info = StructureInfo::parse("鉄筋コンクリート造 地上14階建 / 地下1階");
        assert_eq!(info.structure.as_deref(), Some("鉄筋コンクリート造"));
        assert_eq!(info.floors, Some(14));
        assert_eq!(info.basement_floors, Some(1));
    }

    #[test]
    fn test_parse_structure_fullwidth() {
        let info = StructureInfo::parse("鉄筋コンクリート造 地上１４階建");
        assert_eq!(info.floors, Some(14));
        assert!(info.basement_floors.is_none());
    }

    #[test]
    fn test_parse_structure_empty() {
        assert_eq!(StructureInfo::parse(""), StructureInfo::default());
    }
}

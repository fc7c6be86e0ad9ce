//! 設備フラグ抽出
//!
//! 設備説明文に対する固定語彙の部分文字列判定。各フラグは独立で、
//! トリガー語は OR 結合。ここでは bool のまま扱い、"Y"/"N" への変換は
//! レコード組み立て側で行う。

/// 専有部・共用部設備フラグ
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeatureFlags {
    pub autolock: bool,
    pub delivery_box: bool,
    pub elevator: bool,
    pub balcony: bool,
    pub bath: bool,
    pub washing_machine: bool,
    pub underfloor_heating: bool,
    pub bath_water_heater: bool,
    pub bs: bool,
    pub cable: bool,
    pub system_kitchen: bool,
    pub range: bool,
    pub internet_broadband: bool,
}

impl FeatureFlags {
    /// 設備説明文から一括でフラグを立てる
    pub fn extract(equip_text: &str) -> Self {
        let has = |needles: &[&str]| needles.iter().any(|n| equip_text.contains(n));
        Self {
            autolock: has(&["オートロック"]),
            delivery_box: has(&["宅配ロッカー", "宅配ボックス"]),
            elevator: has(&["エレベータ", "エレベーター"]),
            balcony: has(&["バルコニー"]),
            bath: has(&["バストイレ", "バス有"]),
            washing_machine: has(&["室内洗濯機置場"]),
            underfloor_heating: has(&["床暖房"]),
            bath_water_heater: has(&["追い焚き", "給湯"]),
            bs: has(&["BS"]),
            cable: has(&["CS"]),
            system_kitchen: has(&["システムキッチン"]),
            range: has(&["コンロ"]),
            internet_broadband: has(&["インターネット"]),
        }
    }
}

/// 方位フラグ（方位欄の文言から）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FacingFlags {
    pub north: bool,
    pub northeast: bool,
    pub east: bool,
    pub southeast: bool,
    pub south: bool,
    pub southwest: bool,
    pub west: bool,
    pub northwest: bool,
}

impl FacingFlags {
    pub fn extract(facing_text: &str) -> Self {
        Self {
            north: facing_text.contains('北'),
            northeast: facing_text.contains("北東"),
            east: facing_text.contains('東'),
            southeast: facing_text.contains("南東"),
            south: facing_text.contains('南'),
            southwest: facing_text.contains("南西"),
            west: facing_text.contains('西'),
            northwest: facing_text.contains("北西"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_features() {
        let flags = FeatureFlags::extract("オートロック・宅配ボックス・エレベーター・システムキッチン");
        assert!(flags.autolock);
        assert!(flags.delivery_box);
        assert!(flags.elevator);
        assert!(flags.system_kitchen);
        assert!(!flags.balcony);
        assert!(!flags.bs);
    }

    #[test]
    fn test_extract_or_triggers() {
        // どちらのトリガー語でも同じフラグが立つ
        assert!(FeatureFlags::extract("宅配ロッカー有").delivery_box);
        assert!(FeatureFlags::extract("宅配ボックス有").delivery_box);
        assert!(FeatureFlags::extract("追い焚き機能").bath_water_heater);
        assert!(FeatureFlags::extract("給湯器").bath_water_heater);
    }

    #[test]
    fn test_extract_empty() {
        assert_eq!(FeatureFlags::extract(""), FeatureFlags::default());
    }

    #[test]
    fn test_facing_flags() {
        let facing = FacingFlags::extract("南東");
        assert!(facing.southeast);
        assert!(facing.south);
        assert!(facing.east);
        assert!(!facing.north);
        assert!(!facing.west);
    }
}

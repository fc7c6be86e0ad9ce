//! 正規化レコードと組み立て
//!
//! 出力スキーマは固定・閉集合で、実行時にキーが増減することはない。
//! シリアライズ結果には全キーが必ず現れ、値が取れなかったものは null。
//! レコードは可変マップへの逐次書き込みではなく、パーサー出力から
//! 1つの式で構築する。

use chrono::{offset::FixedOffset, Utc};
use serde::{Serialize, Serializer};

use crate::images::ImageEntry;
use crate::parse::{Address, BuildingType, FacingFlags, FeatureFlags, StructureInfo, TransitLeg};

/// "Y"/"N" としてシリアライズされるフラグ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flag {
    Yes,
    No,
}

impl Flag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Yes => "Y",
            Self::No => "N",
        }
    }
}

impl From<bool> for Flag {
    fn from(b: bool) -> Self {
        if b {
            Self::Yes
        } else {
            Self::No
        }
    }
}

impl Serialize for Flag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// パーサー出力の集約（レコード組み立ての入力）
#[derive(Debug, Clone, Default)]
pub struct ListingFields {
    pub link: Option<String>,
    pub property_csv_id: Option<String>,
    pub postcode: Option<String>,
    pub building_name: Option<String>,
    pub floor_no: Option<i64>,
    pub unit_no: Option<String>,
    pub address: Address,
    pub transit: TransitLeg,
    pub monthly_rent: Option<i64>,
    pub monthly_maintenance: Option<i64>,
    pub months_deposit: Option<f64>,
    pub months_key: Option<f64>,
    pub months_renewal: Option<f64>,
    pub room_type: Option<String>,
    pub size: Option<f64>,
    pub year: Option<i64>,
    pub structure: StructureInfo,
    pub building_type: Option<BuildingType>,
    pub parking: bool,
    pub available_from: Option<String>,
    pub facing: FacingFlags,
    pub other_fees: Option<String>,
    pub lock_exchange: Option<i64>,
    pub features: FeatureFlags,
    pub building_description: Option<String>,
    pub ad_type: Option<String>,
    pub fire_insurance: Option<String>,
    pub guarantor_agency_name: Option<String>,
    pub motorcycle_parking: bool,
    pub aircon: bool,
    pub newly_built: bool,
    pub images: Vec<ImageEntry>,
}

impl ListingFields {
    /// 完全なレコードを構築する
    ///
    /// 派生値の計算（賃料×ヶ月数の金額化など）はここで行う。
    /// どちらかのオペランドが欠けている派生値は null のまま。
    pub fn into_record(self) -> ListingRecord {
        let Self {
            link,
            property_csv_id,
            postcode,
            building_name,
            floor_no,
            unit_no,
            address,
            transit,
            monthly_rent,
            monthly_maintenance,
            months_deposit,
            months_key,
            months_renewal,
            room_type,
            size,
            year,
            structure,
            building_type,
            parking,
            available_from,
            facing,
            other_fees,
            lock_exchange,
            features,
            building_description,
            ad_type,
            fire_insurance,
            guarantor_agency_name,
            motorcycle_parking,
            aircon,
            newly_built,
            images,
        } = self;

        let derive = |months: Option<f64>| -> Option<i64> {
            match (monthly_rent, months) {
                (Some(rent), Some(m)) => Some((rent as f64 * m) as i64),
                _ => None,
            }
        };

        let img_cat = |i: usize| images.get(i).map(|e| e.category.as_str().to_string());
        let img_url = |i: usize| images.get(i).map(|e| e.url.clone());

        let jst = FixedOffset::east_opt(9 * 3600).expect("JST offset");
        let create_date = Utc::now()
            .with_timezone(&jst)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string();

        ListingRecord {
            link,
            property_csv_id,
            postcode,
            prefecture: address.prefecture,
            city: address.city,
            district: address.district,
            chome_banchi: address.chome_banchi,
            building_type: building_type.map(|t| t.as_str().to_string()),
            year,
            building_name_ja: building_name,
            building_description_ja: building_description.clone(),
            station_name_1: transit.station,
            train_line_name_1: transit.line,
            walk_1: transit.walk_minutes,
            floors: structure.floors,
            basement_floors: structure.basement_floors,
            structure: structure.structure,
            parking: Some(parking.into()),
            motorcycle_parking: Some(motorcycle_parking.into()),
            building_notes: building_description.clone(),
            autolock: Some(features.autolock.into()),
            delivery_box: Some(features.delivery_box.into()),
            elevator: Some(features.elevator.into()),
            newly_built: Some(newly_built.into()),
            room_type,
            size,
            unit_no,
            ad_type,
            available_from,
            property_other_expenses_ja: other_fees.clone(),
            floor_no,
            monthly_rent,
            monthly_maintenance,
            months_deposit,
            numeric_deposit: derive(months_deposit),
            months_key,
            numeric_key: derive(months_key),
            months_renewal,
            numeric_renewal: derive(months_renewal),
            lock_exchange,
            fire_insurance,
            other_initial_fees: other_fees,
            no_guarantor: Some(Flag::No),
            guarantor_agency: Some(guarantor_agency_name.is_some().into()),
            guarantor_agency_name,
            // 更新料のヶ月数が取れたときだけ「更新時新賃料」を立てる
            renewal_new_rent: months_renewal.map(|_| Flag::Yes),
            property_notes: building_description,
            facing_north: Some(facing.north.into()),
            facing_northeast: Some(facing.northeast.into()),
            facing_east: Some(facing.east.into()),
            facing_southeast: Some(facing.southeast.into()),
            facing_south: Some(facing.south.into()),
            facing_southwest: Some(facing.southwest.into()),
            facing_west: Some(facing.west.into()),
            facing_northwest: Some(facing.northwest.into()),
            aircon: Some(aircon.into()),
            balcony: Some(features.balcony.into()),
            bath: Some(features.bath.into()),
            bath_water_heater: Some(features.bath_water_heater.into()),
            bs: Some(features.bs.into()),
            cable: Some(features.cable.into()),
            internet_broadband: Some(features.internet_broadband.into()),
            range: Some(features.range.into()),
            system_kitchen: Some(features.system_kitchen.into()),
            underfloor_heating: Some(features.underfloor_heating.into()),
            washing_machine: Some(features.washing_machine.into()),
            create_date: Some(create_date),
            image_category_1: img_cat(0),
            image_url_1: img_url(0),
            image_category_2: img_cat(1),
            image_url_2: img_url(1),
            image_category_3: img_cat(2),
            image_url_3: img_url(2),
            image_category_4: img_cat(3),
            image_url_4: img_url(3),
            image_category_5: img_cat(4),
            image_url_5: img_url(4),
            image_category_6: img_cat(5),
            image_url_6: img_url(5),
            image_category_7: img_cat(6),
            image_url_7: img_url(6),
            image_category_8: img_cat(7),
            image_url_8: img_url(7),
            image_category_9: img_cat(8),
            image_url_9: img_url(8),
            image_category_10: img_cat(9),
            image_url_10: img_url(9),
            image_category_11: img_cat(10),
            image_url_11: img_url(10),
            image_category_12: img_cat(11),
            image_url_12: img_url(11),
            image_category_13: img_cat(12),
            image_url_13: img_url(12),
            image_category_14: img_cat(13),
            image_url_14: img_url(13),
            image_category_15: img_cat(14),
            image_url_15: img_url(14),
            image_category_16: img_cat(15),
            image_url_16: img_url(15),
            ..Default::default()
        }
    }
}

/// 正規化済みの1物件レコード
///
/// スキーマはこのページ種別で埋められる範囲より意図的に広い。
/// 多言語フィールド・交通2区間目以降・座標などは常に null。
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ListingRecord {
    pub link: Option<String>,
    pub property_csv_id: Option<String>,
    pub postcode: Option<String>,
    pub prefecture: Option<String>,
    pub city: Option<String>,
    pub district: Option<String>,
    pub chome_banchi: Option<String>,
    pub building_type: Option<String>,
    pub year: Option<i64>,
    pub building_name_en: Option<String>,
    pub building_name_ja: Option<String>,
    #[serde(rename = "building_name_zh_CN")]
    pub building_name_zh_cn: Option<String>,
    #[serde(rename = "building_name_zh_TW")]
    pub building_name_zh_tw: Option<String>,
    pub building_description_en: Option<String>,
    pub building_description_ja: Option<String>,
    #[serde(rename = "building_description_zh_CN")]
    pub building_description_zh_cn: Option<String>,
    #[serde(rename = "building_description_zh_TW")]
    pub building_description_zh_tw: Option<String>,
    pub building_landmarks_en: Option<String>,
    pub building_landmarks_ja: Option<String>,
    #[serde(rename = "building_landmarks_zh_CN")]
    pub building_landmarks_zh_cn: Option<String>,
    #[serde(rename = "building_landmarks_zh_TW")]
    pub building_landmarks_zh_tw: Option<String>,
    pub station_name_1: Option<String>,
    pub train_line_name_1: Option<String>,
    pub walk_1: Option<i64>,
    pub bus_1: Option<i64>,
    pub car_1: Option<i64>,
    pub cycle_1: Option<i64>,
    pub station_name_2: Option<String>,
    pub train_line_name_2: Option<String>,
    pub walk_2: Option<i64>,
    pub bus_2: Option<i64>,
    pub car_2: Option<i64>,
    pub cycle_2: Option<i64>,
    pub station_name_3: Option<String>,
    pub train_line_name_3: Option<String>,
    pub walk_3: Option<i64>,
    pub bus_3: Option<i64>,
    pub car_3: Option<i64>,
    pub cycle_3: Option<i64>,
    pub station_name_4: Option<String>,
    pub train_line_name_4: Option<String>,
    pub walk_4: Option<i64>,
    pub bus_4: Option<i64>,
    pub car_4: Option<i64>,
    pub cycle_4: Option<i64>,
    pub station_name_5: Option<String>,
    pub train_line_name_5: Option<String>,
    pub walk_5: Option<i64>,
    pub bus_5: Option<i64>,
    pub car_5: Option<i64>,
    pub cycle_5: Option<i64>,
    pub map_lat: Option<f64>,
    pub map_lng: Option<f64>,
    pub num_units: Option<i64>,
    pub floors: Option<i64>,
    pub basement_floors: Option<i64>,
    pub parking: Option<Flag>,
    pub parking_cost: Option<i64>,
    pub bicycle_parking: Option<Flag>,
    pub motorcycle_parking: Option<Flag>,
    pub structure: Option<String>,
    pub building_notes: Option<String>,
    pub building_style: Option<String>,
    pub autolock: Option<Flag>,
    pub credit_card: Option<Flag>,
    pub concierge: Option<Flag>,
    pub delivery_box: Option<Flag>,
    pub elevator: Option<Flag>,
    pub gym: Option<Flag>,
    pub newly_built: Option<Flag>,
    pub pets: Option<Flag>,
    pub swimming_pool: Option<Flag>,
    pub ur: Option<Flag>,
    pub room_type: Option<String>,
    pub size: Option<f64>,
    pub unit_no: Option<String>,
    pub ad_type: Option<String>,
    pub available_from: Option<String>,
    pub property_description_en: Option<String>,
    pub property_description_ja: Option<String>,
    #[serde(rename = "property_description_zh_CN")]
    pub property_description_zh_cn: Option<String>,
    #[serde(rename = "property_description_zh_TW")]
    pub property_description_zh_tw: Option<String>,
    pub property_other_expenses_en: Option<String>,
    pub property_other_expenses_ja: Option<String>,
    #[serde(rename = "property_other_expenses_zh_CN")]
    pub property_other_expenses_zh_cn: Option<String>,
    #[serde(rename = "property_other_expenses_zh_TW")]
    pub property_other_expenses_zh_tw: Option<String>,
    pub featured_a: Option<String>,
    pub featured_b: Option<String>,
    pub featured_c: Option<String>,
    pub floor_no: Option<i64>,
    pub monthly_rent: Option<i64>,
    pub monthly_maintenance: Option<i64>,
    pub months_deposit: Option<f64>,
    pub numeric_deposit: Option<i64>,
    pub months_key: Option<f64>,
    pub numeric_key: Option<i64>,
    pub months_guarantor: Option<f64>,
    pub numeric_guarantor: Option<i64>,
    pub months_agency: Option<f64>,
    pub numeric_agency: Option<i64>,
    pub months_renewal: Option<f64>,
    pub numeric_renewal: Option<i64>,
    pub months_deposit_amortization: Option<f64>,
    pub numeric_deposit_amortization: Option<i64>,
    pub months_security_deposit: Option<f64>,
    pub numeric_security_deposit: Option<i64>,
    pub lock_exchange: Option<i64>,
    pub fire_insurance: Option<String>,
    pub other_initial_fees: Option<String>,
    pub other_subscription_fees: Option<String>,
    pub no_guarantor: Option<Flag>,
    pub guarantor_agency: Option<Flag>,
    pub guarantor_agency_name: Option<String>,
    pub rent_negotiable: Option<Flag>,
    pub renewal_new_rent: Option<Flag>,
    pub lease_date: Option<String>,
    pub lease_months: Option<f64>,
    pub lease_type: Option<String>,
    pub short_term_ok: Option<Flag>,
    pub balcony_size: Option<f64>,
    pub property_notes: Option<String>,
    pub facing_north: Option<Flag>,
    pub facing_northeast: Option<Flag>,
    pub facing_east: Option<Flag>,
    pub facing_southeast: Option<Flag>,
    pub facing_south: Option<Flag>,
    pub facing_southwest: Option<Flag>,
    pub facing_west: Option<Flag>,
    pub facing_northwest: Option<Flag>,
    pub aircon: Option<Flag>,
    pub aircon_heater: Option<Flag>,
    pub all_electric: Option<Flag>,
    pub auto_fill_bath: Option<Flag>,
    pub balcony: Option<Flag>,
    pub bath: Option<Flag>,
    pub bath_water_heater: Option<Flag>,
    pub blinds: Option<Flag>,
    pub bs: Option<Flag>,
    pub cable: Option<Flag>,
    pub carpet: Option<Flag>,
    pub cleaning_service: Option<Flag>,
    pub counter_kitchen: Option<Flag>,
    pub dishwasher: Option<Flag>,
    pub drapes: Option<Flag>,
    pub female_only: Option<Flag>,
    pub fireplace: Option<Flag>,
    pub flooring: Option<Flag>,
    pub full_kitchen: Option<Flag>,
    pub furnished: Option<Flag>,
    pub gas: Option<Flag>,
    pub induction_cooker: Option<Flag>,
    pub internet_broadband: Option<Flag>,
    pub internet_wifi: Option<Flag>,
    pub japanese_toilet: Option<Flag>,
    pub linen: Option<Flag>,
    pub loft: Option<Flag>,
    pub microwave: Option<Flag>,
    pub oven: Option<Flag>,
    pub phoneline: Option<Flag>,
    pub range: Option<Flag>,
    pub refrigerator: Option<Flag>,
    pub refrigerator_freezer: Option<Flag>,
    pub roof_balcony: Option<Flag>,
    pub separate_toilet: Option<Flag>,
    pub shower: Option<Flag>,
    pub soho: Option<Flag>,
    pub storage: Option<Flag>,
    pub student_friendly: Option<Flag>,
    pub system_kitchen: Option<Flag>,
    pub tatami: Option<Flag>,
    pub underfloor_heating: Option<Flag>,
    pub unit_bath: Option<Flag>,
    pub utensils_cutlery: Option<Flag>,
    pub veranda: Option<Flag>,
    pub washer_dryer: Option<Flag>,
    pub washing_machine: Option<Flag>,
    pub washlet: Option<Flag>,
    pub western_toilet: Option<Flag>,
    pub yard: Option<Flag>,
    pub youtube: Option<String>,
    pub vr_link: Option<String>,
    pub numeric_guarantor_max: Option<i64>,
    pub discount: Option<i64>,
    pub create_date: Option<String>,
    pub image_category_1: Option<String>,
    pub image_url_1: Option<String>,
    pub image_category_2: Option<String>,
    pub image_url_2: Option<String>,
    pub image_category_3: Option<String>,
    pub image_url_3: Option<String>,
    pub image_category_4: Option<String>,
    pub image_url_4: Option<String>,
    pub image_category_5: Option<String>,
    pub image_url_5: Option<String>,
    pub image_category_6: Option<String>,
    pub image_url_6: Option<String>,
    pub image_category_7: Option<String>,
    pub image_url_7: Option<String>,
    pub image_category_8: Option<String>,
    pub image_url_8: Option<String>,
    pub image_category_9: Option<String>,
    pub image_url_9: Option<String>,
    pub image_category_10: Option<String>,
    pub image_url_10: Option<String>,
    pub image_category_11: Option<String>,
    pub image_url_11: Option<String>,
    pub image_category_12: Option<String>,
    pub image_url_12: Option<String>,
    pub image_category_13: Option<String>,
    pub image_url_13: Option<String>,
    pub image_category_14: Option<String>,
    pub image_url_14: Option<String>,
    pub image_category_15: Option<String>,
    pub image_url_15: Option<String>,
    pub image_category_16: Option<String>,
    pub image_url_16: Option<String>,
}

impl ListingRecord {
    /// スキーマの総フィールド数
    pub const FIELD_COUNT: usize = 216;

    /// UTF-8・非ASCII非エスケープ・整形済みのJSON文字列
    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::images::ImageCategory;

    fn record_as_map(record: &ListingRecord) -> serde_json::Map<String, serde_json::Value> {
        match serde_json::to_value(record).unwrap() {
            serde_json::Value::Object(map) => map,
            other => panic!("record must serialize to an object, got {other:?}"),
        }
    }

    #[test]
    fn test_all_canonical_keys_present() {
        let map = record_as_map(&ListingRecord::default());
        assert_eq!(map.len(), ListingRecord::FIELD_COUNT);
        for key in [
            "link",
            "prefecture",
            "building_name_zh_CN",
            "station_name_5",
            "numeric_renewal",
            "facing_northwest",
            "image_url_16",
            "create_date",
        ] {
            assert!(map.contains_key(key), "missing key: {key}");
        }
        // 未設定フィールドはすべてnull
        assert!(map.values().all(|v| v.is_null()));
    }

    #[test]
    fn test_flag_serialization() {
        let record = ListingRecord {
            parking: Some(Flag::Yes),
            autolock: Some(Flag::No),
            ..Default::default()
        };
        let map = record_as_map(&record);
        assert_eq!(map["parking"], "Y");
        assert_eq!(map["autolock"], "N");
        assert!(map["elevator"].is_null());
    }

    #[test]
    fn test_derivations_require_both_operands() {
        let record = ListingFields {
            monthly_rent: Some(123_000),
            months_deposit: Some(2.0),
            months_renewal: None,
            ..Default::default()
        }
        .into_record();

        assert_eq!(record.numeric_deposit, Some(246_000));
        assert!(record.numeric_key.is_none());
        assert!(record.numeric_renewal.is_none());
        assert!(record.renewal_new_rent.is_none());
    }

    #[test]
    fn test_derivation_null_without_rent() {
        let record = ListingFields {
            monthly_rent: None,
            months_deposit: Some(2.0),
            ..Default::default()
        }
        .into_record();
        assert!(record.numeric_deposit.is_none());
        assert_eq!(record.months_deposit, Some(2.0));
    }

    #[test]
    fn test_renewal_new_rent_follows_months_renewal() {
        let record = ListingFields {
            monthly_rent: Some(100_000),
            months_renewal: Some(1.0),
            ..Default::default()
        }
        .into_record();
        assert_eq!(record.renewal_new_rent, Some(Flag::Yes));
        assert_eq!(record.numeric_renewal, Some(100_000));
    }

    #[test]
    fn test_fractional_months_truncate_to_integer() {
        let record = ListingFields {
            monthly_rent: Some(100_001),
            months_deposit: Some(2.5),
            ..Default::default()
        }
        .into_record();
        assert_eq!(record.numeric_deposit, Some(250_002));
    }

    #[test]
    fn test_image_fields_contiguous() {
        let images = vec![
            ImageEntry {
                category: ImageCategory::Floorplan,
                url: "https://a.jp/1.jpg".into(),
            },
            ImageEntry {
                category: ImageCategory::Exterior,
                url: "https://a.jp/2.jpg".into(),
            },
        ];
        let record = ListingFields {
            images,
            ..Default::default()
        }
        .into_record();

        assert_eq!(record.image_category_1.as_deref(), Some("floorplan"));
        assert_eq!(record.image_url_1.as_deref(), Some("https://a.jp/1.jpg"));
        assert_eq!(record.image_category_2.as_deref(), Some("exterior"));
        assert!(record.image_category_3.is_none());
        assert!(record.image_url_16.is_none());
    }

    #[test]
    fn test_guarantor_agency_flag() {
        let record = ListingFields {
            guarantor_agency_name: Some("A社".into()),
            ..Default::default()
        }
        .into_record();
        assert_eq!(record.guarantor_agency, Some(Flag::Yes));
        assert_eq!(record.no_guarantor, Some(Flag::No));

        let record = ListingFields::default().into_record();
        assert_eq!(record.guarantor_agency, Some(Flag::No));
    }

    #[test]
    fn test_notes_fan_out() {
        let record = ListingFields {
            building_description: Some("駅近".into()),
            ..Default::default()
        }
        .into_record();
        assert_eq!(record.building_description_ja.as_deref(), Some("駅近"));
        assert_eq!(record.building_notes.as_deref(), Some("駅近"));
        assert_eq!(record.property_notes.as_deref(), Some("駅近"));
    }
}

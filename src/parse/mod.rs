//! テキスト抽出・正規化パイプライン
//!
//! ページから取得した生テキスト/HTML断片を型付きの値に変換する純関数群。
//! すべてのパーサーは「マッチなし = None」を第一級の結果として返し、
//! 例外を投げない。

pub mod address;
pub mod building;
pub mod features;
pub mod text;
pub mod transit;

pub use address::Address;
pub use building::{BuildingType, StructureInfo};
pub use features::{FacingFlags, FeatureFlags};
pub use transit::TransitLeg;

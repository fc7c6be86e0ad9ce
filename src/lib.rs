//! 賃貸物件詳細ページスクレイパーライブラリ
//!
//! 物件詳細ページ（日本語）から1件の正規化レコードを抽出する。
//! 住所・金額・ヶ月数・交通・設備などのテキスト断片を型付きの値に
//! 変換するパーサー群と、タブ横断の画像収集・重複排除エンジンが中核。
//! ブラウザ操作は `ListingPage` トレイトの背後に隔離されており、
//! 抽出コアはフィクスチャでオフラインテストできる。
//!
//! # 使用例
//!
//! ```rust,ignore
//! use chintai_scraper::{ScrapeRequest, ScraperService};
//! use tower::Service;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut service = ScraperService::new();
//!
//!     let request = ScrapeRequest::new("https://www.mitsui-chintai.co.jp/rf/buildroom/XXXX")
//!         .with_headless(true);
//!
//!     let result = service.call(request).await.unwrap();
//!     println!("{}", result.to_pretty_json().unwrap());
//! }
//! ```

pub mod buildroom;
pub mod config;
pub mod error;
pub mod images;
pub mod parse;
pub mod record;
pub mod service;
pub mod traits;

// 主要な型をリエクスポート
pub use buildroom::BuildroomScraper;
pub use config::ScraperConfig;
pub use error::ScraperError;
pub use images::{ImageCategory, ImageEntry, ImageSet, MAX_IMAGE_SLOTS};
pub use record::{Flag, ListingFields, ListingRecord};
pub use service::{ScrapeRequest, ScrapeResult, ScraperService};
pub use traits::{ListingPage, Scraper};

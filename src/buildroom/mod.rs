//! 物件詳細ページ（buildroom）スクレイパーモジュール
//!
//! ブラウザ操作層（page）と抽出オーケストレーション（scraper）。

mod page;
mod scraper;

pub use page::BuildroomPage;
pub use scraper::BuildroomScraper;

use async_trait::async_trait;

use crate::error::ScraperError;
use crate::record::ListingRecord;

/// ページ側コラボレーターの狭いインターフェース
///
/// 抽出・組み立てコアはこのトレイト越しにのみページへアクセスする。
/// テキストフィクスチャによるオフラインテストを可能にするための境界。
#[async_trait]
pub trait ListingPage: Send + Sync {
    /// 表示キャプション（dt）に対応する値ブロック（dd）のHTMLを返す
    ///
    /// ラベルが存在しなければ `Ok(None)`。
    async fn fetch_labeled_field(&self, label: &str) -> Result<Option<String>, ScraperError>;

    /// 表示状態（タブ）を切り替える。コントロールが無ければ `Ok(false)`
    async fn activate_view(&self, view: &str) -> Result<bool, ScraperError>;

    /// 指定スコープ内に現在描画されている画像URLのスナップショット
    async fn list_visible_image_urls(&self, scope: &str) -> Result<Vec<String>, ScraperError>;

    /// 関連ページ（建物ページ等）のHTMLをベストエフォートで取得
    async fn fetch_secondary_page(&self, id: &str) -> Result<Option<String>, ScraperError>;
}

/// スクレイパーのライフサイクル
#[async_trait]
pub trait Scraper: Send + Sync {
    /// ブラウザ初期化
    async fn initialize(&mut self) -> Result<(), ScraperError>;

    /// 1物件を抽出
    async fn scrape(&mut self, url: &str) -> Result<ListingRecord, ScraperError>;

    /// リソース解放
    async fn close(&mut self) -> Result<(), ScraperError>;

    /// 一括実行（initialize → scrape → close）
    async fn execute(&mut self, url: &str) -> Result<ListingRecord, ScraperError> {
        self.initialize().await?;
        let record = self.scrape(url).await?;
        self.close().await?;
        Ok(record)
    }
}

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tower::Service;
use tracing::info;

use crate::buildroom::BuildroomScraper;
use crate::config::ScraperConfig;
use crate::error::ScraperError;
use crate::record::ListingRecord;
use crate::traits::Scraper;

/// スクレイピングリクエスト
#[derive(Debug, Clone)]
pub struct ScrapeRequest {
    pub url: String,
    pub headless: bool,
}

impl ScrapeRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headless: true,
        }
    }

    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }
}

impl From<&ScrapeRequest> for ScraperConfig {
    fn from(req: &ScrapeRequest) -> Self {
        ScraperConfig::default().with_headless(req.headless)
    }
}

/// スクレイピング結果
#[derive(Debug, Clone)]
pub struct ScrapeResult {
    pub record: ListingRecord,
}

impl ScrapeResult {
    /// 非ASCII文字をエスケープせずに整形したJSON
    pub fn to_pretty_json(&self) -> Result<String, ScraperError> {
        Ok(self.record.to_pretty_json()?)
    }
}

/// tower::Serviceを実装したスクレイパーサービス
#[derive(Debug, Clone, Default)]
pub struct ScraperService {
    // 将来的な拡張用（レートリミット、キャッシュなど）
}

impl ScraperService {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Service<ScrapeRequest> for ScraperService {
    type Response = ScrapeResult;
    type Error = ScraperError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: ScrapeRequest) -> Self::Future {
        info!("スクレイピングリクエスト受信: url={}", req.url);

        Box::pin(async move {
            let config: ScraperConfig = (&req).into();
            let mut scraper = BuildroomScraper::new(config);

            let record = scraper.execute(&req.url).await?;

            info!("スクレイピング完了: url={}", req.url);
            Ok(ScrapeResult { record })
        })
    }
}

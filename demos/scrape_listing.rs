use chintai_scraper::{ScrapeRequest, ScraperService};
use tower::Service;

#[tokio::main]
async fn main() {
    // ログ設定
    tracing_subscriber::fmt()
        .with_env_filter("info,chintai_scraper=debug")
        .init();

    // 引数または環境変数からURLを取得
    let url = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("LISTING_URL").ok())
        .expect("物件URLを指定してください: scrape_listing <url>");

    let headful = std::env::args().any(|a| a == "--headful");

    let mut service = ScraperService::new();
    let request = ScrapeRequest::new(&url).with_headless(!headful);

    match service.call(request).await {
        Ok(result) => {
            println!("{}", result.to_pretty_json().unwrap_or_default());
        }
        Err(e) => {
            eprintln!("エラー: {}", e);
            std::process::exit(1);
        }
    }
}

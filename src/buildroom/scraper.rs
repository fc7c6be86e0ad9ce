//! 物件詳細ページのスクレイパー本体
//!
//! ブラウザ操作（ナビゲーション・タブ切替・要素取得）と、純関数の
//! パーサー群による抽出・組み立てを束ねる。初回ページ読み込みの失敗
//! だけが致命的エラーで、それ以外のフィールド欠落はすべて null に落ちる。

use std::sync::LazyLock;
use std::time::Duration;

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::ScreenshotParams;
use async_trait::async_trait;
use futures::StreamExt;
use regex::Regex;
use tokio::time::sleep;
use tracing::{debug, info};

use crate::config::ScraperConfig;
use crate::error::ScraperError;
use crate::images::{classify_url, is_placeholder_url, ImageCategory, ImageSet};
use crate::parse::text::{
    extract_area, extract_guarantor_companies, extract_lock_exchange_fee, extract_maintenance_fee,
    extract_money, extract_months, extract_postcode, extract_room_type, extract_year,
    normalize_digits, strip_tags,
};
use crate::parse::{Address, BuildingType, FacingFlags, FeatureFlags, StructureInfo, TransitLeg};
use crate::record::{ListingFields, ListingRecord};
use crate::traits::{ListingPage, Scraper};

use super::page::BuildroomPage;

// 概要・詳細テーブルのラベル
const LABEL_ADDRESS: &str = "所在地";
const LABEL_ACCESS: &str = "交通";
const LABEL_RENT: &str = "賃料・管理費・共益費";
const LABEL_DEPOSIT_KEY: &str = "敷金／礼金";
const LABEL_LAYOUT: &str = "間取り・面積";
const LABEL_BUILT: &str = "竣工日";
const LABEL_STRUCTURE: &str = "規模構造";
const LABEL_AVAILABLE_FROM: &str = "入居可能日";
const LABEL_RENEWAL: &str = "更新料";
const LABEL_PARKING: &str = "駐車場";
const LABEL_FACING: &str = "方位";
const LABEL_OTHER_FEES: &str = "その他費用";
const LABEL_EQUIPMENT: &str = "専有部・共用部設備";
const LABEL_NOTES: &str = "備考";
const LABEL_AD_TYPE: &str = "取引態様";
const LABEL_INSURANCE: &str = "保険";

/// 画像サムネイルのDOMスコープ
const IMAGE_SCOPE: &str = ".c-buildroom-slide__thumbs";
/// タブ順のビュー定義（ビュー名, そのビューで見える画像のカテゴリ）
const IMAGE_VIEWS: &[(&str, ImageCategory)] = &[
    ("floorplan", ImageCategory::Interior),
    ("exterior", ImageCategory::Exterior),
];
/// 画像出現待ちのリトライ上限と間隔
const IMAGE_POLL_ATTEMPTS: u32 = 8;
const IMAGE_POLL_INTERVAL_MS: u64 = 500;

/// ページロード待ちの上限（秒）
const PAGE_LOAD_WAIT_SECS: u32 = 30;

static HEADER_TRAILING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s*\d+\s*階\s*[０-９0-9]+.*$").expect("invalid regex: header trailing")
});
static HEADER_UNIT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+)\s*階\s*([０-９0-9]+)").expect("invalid regex: header unit")
});

/// ヘッダ（h1）から建物名・階数・部屋番号を切り出す
///
/// 例: `プレディアコート錦糸町スカイビュー  2階２０１`
fn parse_summary_header(h1: &str) -> (Option<String>, Option<i64>, Option<String>) {
    let name = HEADER_TRAILING_RE.replace(h1, "").trim().to_string();
    let name = (!name.is_empty()).then_some(name);

    let Some(m) = HEADER_UNIT_RE.captures(h1) else {
        return (name, None, None);
    };
    let floor_no = normalize_digits(&m[1]).parse().ok();
    let unit_no = Some(normalize_digits(&m[2]));
    (name, floor_no, unit_no)
}

/// ラベル付きフィールドを取得（失敗はNoneに落として続行）
async fn labeled_html(page: &dyn ListingPage, label: &str) -> Option<String> {
    match page.fetch_labeled_field(label).await {
        Ok(v) => v,
        Err(e) => {
            debug!("ラベル取得失敗: {}: {}", label, e);
            None
        }
    }
}

/// ラベル付きフィールドのタグ除去済みテキスト（空文字はNone）
async fn labeled_text(page: &dyn ListingPage, label: &str) -> Option<String> {
    let text = strip_tags(&labeled_html(page, label).await.unwrap_or_default());
    (!text.is_empty()).then_some(text)
}

/// ラベル付きフィールド群を純関数パーサーに通して集約する
///
/// `ListingPage` 越しにしか触らないため、フィクスチャでオフライン
/// テストできる。
async fn extract_listing_fields(page: &dyn ListingPage, link: &str) -> ListingFields {
    let address_text = labeled_text(page, LABEL_ADDRESS).await.unwrap_or_default();
    let address = Address::parse(&address_text);

    let access_html = labeled_html(page, LABEL_ACCESS).await.unwrap_or_default();
    let transit = TransitLeg::parse(&access_html);

    let rent_html = labeled_html(page, LABEL_RENT).await.unwrap_or_default();
    let monthly_rent = extract_money(&rent_html);
    let monthly_maintenance = extract_maintenance_fee(&rent_html);

    let depkey_html = labeled_html(page, LABEL_DEPOSIT_KEY).await.unwrap_or_default();
    let months_deposit = extract_months(&depkey_html);
    // 敷金／礼金はスラッシュ区切り。礼金は後半からのみ拾う
    let months_key = depkey_html
        .rsplit_once('/')
        .and_then(|(_, key)| extract_months(key));

    let layout_html = labeled_html(page, LABEL_LAYOUT).await.unwrap_or_default();
    let room_type = extract_room_type(&layout_html);
    let size = extract_area(&layout_html);

    let year = extract_year(&labeled_html(page, LABEL_BUILT).await.unwrap_or_default());

    let structure_text = labeled_text(page, LABEL_STRUCTURE).await.unwrap_or_default();
    let structure = StructureInfo::parse(&structure_text);

    let available_from = labeled_text(page, LABEL_AVAILABLE_FROM).await;

    let months_renewal =
        extract_months(&labeled_html(page, LABEL_RENEWAL).await.unwrap_or_default());

    let parking = labeled_text(page, LABEL_PARKING)
        .await
        .is_some_and(|t| t.contains('有'));

    let facing = FacingFlags::extract(&labeled_text(page, LABEL_FACING).await.unwrap_or_default());

    let other_fees = labeled_text(page, LABEL_OTHER_FEES).await;
    let lock_exchange = other_fees
        .as_deref()
        .and_then(extract_lock_exchange_fee);

    let equip_text = labeled_text(page, LABEL_EQUIPMENT).await.unwrap_or_default();
    let features = FeatureFlags::extract(&equip_text);
    let motorcycle_parking = equip_text.contains("バイク置場");

    let building_description = labeled_text(page, LABEL_NOTES).await;
    let aircon = equip_text.contains("エアコン")
        || building_description
            .as_deref()
            .is_some_and(|d| d.contains("ｴｱｺﾝ"));

    let ad_type = labeled_text(page, LABEL_AD_TYPE).await;
    let fire_insurance = labeled_text(page, LABEL_INSURANCE).await;

    ListingFields {
        link: Some(link.to_string()),
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
        parking,
        available_from,
        facing,
        other_fees,
        lock_exchange,
        features,
        building_description,
        ad_type,
        fire_insurance,
        motorcycle_parking,
        aircon,
        ..Default::default()
    }
}

/// 有効な画像が少なくとも1枚見えるまで（上限付きで）待つ
///
/// 上限に達したら最後のスナップショットをそのまま返す。0枚は正常系。
async fn wait_for_images(page: &dyn ListingPage) -> Vec<String> {
    let mut last = Vec::new();
    for attempt in 0..IMAGE_POLL_ATTEMPTS {
        match page.list_visible_image_urls(IMAGE_SCOPE).await {
            Ok(urls) => {
                if urls.iter().any(|u| !is_placeholder_url(u)) {
                    return urls;
                }
                last = urls;
            }
            Err(e) => debug!("画像一覧取得失敗 ({}回目): {}", attempt + 1, e),
        }
        sleep(Duration::from_millis(IMAGE_POLL_INTERVAL_MS)).await;
    }
    last
}

/// タブを順に切り替えて画像を収集し、最後に取りこぼしを掃く
async fn collect_images(page: &dyn ListingPage, set: &mut ImageSet) {
    for (view, view_category) in IMAGE_VIEWS {
        let activated = page.activate_view(view).await.unwrap_or(false);
        if !activated {
            debug!("タブ切替失敗のためスキップ: {}", view);
            continue;
        }

        for url in wait_for_images(page).await {
            let category = classify_url(&url, Some(*view_category));
            set.insert(url, category);
        }
    }

    // フォールバック掃き: 現在の状態に残っている未収集URL（ビュー情報
    // なしのためURL形状のみで分類）
    match page.list_visible_image_urls(IMAGE_SCOPE).await {
        Ok(urls) => {
            for url in urls {
                if !set.contains(&url) {
                    let category = classify_url(&url, None);
                    set.insert(url, category);
                }
            }
        }
        Err(e) => debug!("フォールバック画像収集失敗: {}", e),
    }
}

/// 物件詳細ページスクレイパー
pub struct BuildroomScraper {
    config: ScraperConfig,
    browser: Option<Browser>,
}

impl BuildroomScraper {
    pub fn new(config: ScraperConfig) -> Self {
        Self {
            config,
            browser: None,
        }
    }

    fn get_browser(&self) -> Result<&Browser, ScraperError> {
        self.browser
            .as_ref()
            .ok_or_else(|| ScraperError::BrowserInit("ブラウザが初期化されていません".into()))
    }

    /// ページの読み込み完了を待つ
    async fn wait_for_load(&self, page: &chromiumoxide::Page) -> Result<(), ScraperError> {
        for i in 0..PAGE_LOAD_WAIT_SECS {
            let ready = page
                .evaluate("document.readyState")
                .await
                .map_err(|e| ScraperError::JavaScript(e.to_string()))?
                .into_value::<String>()
                .unwrap_or_default();

            if ready == "complete" || ready == "interactive" {
                debug!("ページロード完了 ({}秒)", i);
                return Ok(());
            }
            sleep(Duration::from_secs(1)).await;
        }
        // 初回ページが読み込めないのは致命的エラー
        Err(ScraperError::Timeout(format!(
            "ページロードが{}秒以内に完了しませんでした",
            PAGE_LOAD_WAIT_SECS
        )))
    }

    async fn debug_screenshot(&self, page: &chromiumoxide::Page) {
        if !self.config.debug {
            return;
        }
        if let Ok(screenshot) = page
            .screenshot(ScreenshotParams::builder().full_page(true).build())
            .await
        {
            use base64::Engine;
            let encoded = base64::engine::general_purpose::STANDARD.encode(&screenshot);
            debug!("ページスクリーンショット: data:image/png;base64,{}", encoded);
        }
    }
}

#[async_trait]
impl Scraper for BuildroomScraper {
    async fn initialize(&mut self) -> Result<(), ScraperError> {
        info!("ブラウザを初期化中...");

        // ユニークなユーザーデータディレクトリを生成
        let unique_id = format!(
            "{}-{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        );
        let user_data_dir = std::env::temp_dir().join(format!("buildroom-{}", unique_id));

        let chrome_path = std::env::var("CHROME_PATH")
            .or_else(|_| std::env::var("CHROMIUM_PATH"))
            .unwrap_or_else(|_| "chromium".to_string());

        let mut builder = BrowserConfig::builder()
            .chrome_executable(chrome_path)
            .user_data_dir(&user_data_dir)
            .window_size(1280, 800)
            .request_timeout(self.config.timeout);

        if !self.config.headless {
            builder = builder.with_head();
        }

        builder = builder
            .no_sandbox()
            .arg("--disable-blink-features=AutomationControlled")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-gpu");

        let browser_config = builder
            .build()
            .map_err(|e| ScraperError::BrowserInit(e.to_string()))?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| ScraperError::BrowserInit(e.to_string()))?;

        // ブラウザイベントハンドラをバックグラウンドで実行
        tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                debug!("Browser event: {:?}", event);
            }
        });

        self.browser = Some(browser);
        info!("ブラウザ初期化完了");
        Ok(())
    }

    async fn scrape(&mut self, url: &str) -> Result<ListingRecord, ScraperError> {
        let browser = self.get_browser()?;
        info!("抽出開始: {}", url);

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| ScraperError::BrowserInit(e.to_string()))?;

        // 初回ページ読み込みの失敗だけは致命的
        page.goto(url)
            .await
            .map_err(|e| ScraperError::Navigation(e.to_string()))?;
        self.wait_for_load(&page).await?;

        self.debug_screenshot(&page).await;

        let bp = BuildroomPage::new(page.clone(), browser);

        // ヘッダ
        let h1 = bp.summary_header().await.unwrap_or(None).unwrap_or_default();
        let (building_name, floor_no, unit_no) = parse_summary_header(&h1);

        // ラベル付きフィールド群
        let mut fields = extract_listing_fields(&bp, url).await;
        fields.floor_no = floor_no;
        fields.unit_no = unit_no;
        fields.building_type = BuildingType::classify(
            fields.structure.structure.as_deref(),
            fields.structure.floors,
            building_name.as_deref(),
        );
        fields.building_name = building_name;

        // 物件コード・建物ページからの郵便番号補完（ベストエフォート）
        let (property_csv_id, bld_cd) = bp.property_codes().await.unwrap_or((None, None));
        fields.property_csv_id = property_csv_id;
        if let Some(bld_cd) = bld_cd {
            if let Some(html) = bp.fetch_secondary_page(&bld_cd).await.unwrap_or(None) {
                fields.postcode = extract_postcode(&html);
            }
        }

        // 保証会社モーダル
        fields.guarantor_agency_name = bp
            .guarantor_modal_text()
            .await
            .unwrap_or(None)
            .as_deref()
            .and_then(extract_guarantor_companies);

        // 新築フラグ
        fields.newly_built = bp
            .summary_flag_text()
            .await
            .unwrap_or(None)
            .is_some_and(|t| t.contains("新築"));

        // 画像収集: メイン画像（間取り図扱い）→ タブ順 → フォールバック掃き
        let mut images = ImageSet::new();
        if let Some(src) = bp.main_image_src().await.unwrap_or(None) {
            images.insert(src, ImageCategory::Floorplan);
        }
        collect_images(&bp, &mut images).await;
        info!("画像収集完了: {}枚", images.len());
        fields.images = images.into_entries();

        if let Err(e) = page.close().await {
            debug!("ページのクローズに失敗: {}", e);
        }

        let record = fields.into_record();
        info!("抽出完了: {}", url);
        Ok(record)
    }

    async fn close(&mut self) -> Result<(), ScraperError> {
        info!("ブラウザを終了中...");
        self.browser = None;
        info!("ブラウザ終了完了");
        Ok(())
    }
}

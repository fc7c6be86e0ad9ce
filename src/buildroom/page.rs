//! 物件詳細ページへのアクセス層
//!
//! DOM操作はすべてJavaScript評価で行い、結果の取り出しに失敗しても
//! パニックせず None / 空集合に落とす。

use async_trait::async_trait;
use chromiumoxide::browser::Browser;
use chromiumoxide::Page;
use tracing::debug;

use crate::error::ScraperError;
use crate::traits::ListingPage;

/// 建物ページのベースURL（郵便番号の補完に使用）
const BUILDING_PAGE_BASE: &str = "https://www.mitsui-chintai.co.jp/rf/tatemono";

/// chromiumoxide による ListingPage 実装
pub struct BuildroomPage<'a> {
    page: Page,
    browser: &'a Browser,
}

impl<'a> BuildroomPage<'a> {
    pub fn new(page: Page, browser: &'a Browser) -> Self {
        Self { page, browser }
    }

    async fn eval_opt_string(&self, script: &str) -> Result<Option<String>, ScraperError> {
        let result = self
            .page
            .evaluate(script)
            .await
            .map_err(|e| ScraperError::JavaScript(e.to_string()))?;
        Ok(result.into_value::<Option<String>>().unwrap_or(None))
    }

    /// 物件ヘッダ（h1）のテキスト
    pub async fn summary_header(&self) -> Result<Option<String>, ScraperError> {
        self.eval_opt_string(
            r#"
            (function() {
                var h1 = document.querySelector('h1.c-buildroom__summary-h');
                return h1 ? h1.textContent.trim() : null;
            })()
            "#,
        )
        .await
    }

    /// 物件コードと建物コード（data-code / data-bld_cd）
    pub async fn property_codes(&self) -> Result<(Option<String>, Option<String>), ScraperError> {
        let result = self
            .page
            .evaluate(
                r#"
                (function() {
                    var btn = document.querySelector('button[data-code]');
                    if (!btn) return null;
                    return [btn.getAttribute('data-code'), btn.getAttribute('data-bld_cd')];
                })()
                "#,
            )
            .await
            .map_err(|e| ScraperError::JavaScript(e.to_string()))?;

        let codes = result
            .into_value::<Option<(Option<String>, Option<String>)>>()
            .unwrap_or(None);
        Ok(codes.unwrap_or((None, None)))
    }

    /// 保証会社モーダルの本文テキスト
    pub async fn guarantor_modal_text(&self) -> Result<Option<String>, ScraperError> {
        self.eval_opt_string(
            r#"
            (function() {
                var body = document.querySelector('#guarantor .c-modal-content__body');
                return body ? body.textContent : null;
            })()
            "#,
        )
        .await
    }

    /// ヘッダ付近のフラグ表示（新築など）
    pub async fn summary_flag_text(&self) -> Result<Option<String>, ScraperError> {
        self.eval_opt_string(
            r#"
            (function() {
                var flag = document.querySelector('.c-buildroom__summary-flag');
                return flag ? flag.textContent : null;
            })()
            "#,
        )
        .await
    }

    /// メイン画像（サマリー領域の先頭img）のsrc
    pub async fn main_image_src(&self) -> Result<Option<String>, ScraperError> {
        self.eval_opt_string(
            r#"
            (function() {
                var img = document.querySelector('.c-buildroom__summary-pics img');
                return img ? img.getAttribute('src') : null;
            })()
            "#,
        )
        .await
    }
}

#[async_trait]
impl ListingPage for BuildroomPage<'_> {
    async fn fetch_labeled_field(&self, label: &str) -> Result<Option<String>, ScraperError> {
        let script = format!(
            r#"
            (function() {{
                var dts = document.querySelectorAll('dt');
                for (var i = 0; i < dts.length; i++) {{
                    if (dts[i].textContent.trim() === '{label}') {{
                        var dd = dts[i].nextElementSibling;
                        if (dd && dd.tagName === 'DD') return dd.innerHTML;
                    }}
                }}
                return null;
            }})()
            "#
        );
        self.eval_opt_string(&script).await
    }

    async fn activate_view(&self, view: &str) -> Result<bool, ScraperError> {
        let script = format!(
            r#"
            (function() {{
                var btn = document.querySelector("button[data-js-buildroom-slide-tab='{view}']");
                if (btn && btn.offsetParent !== null) {{
                    btn.click();
                    return true;
                }}
                return false;
            }})()
            "#
        );
        let result = self
            .page
            .evaluate(script.as_str())
            .await
            .map_err(|e| ScraperError::JavaScript(e.to_string()))?;
        Ok(result.into_value::<bool>().unwrap_or(false))
    }

    async fn list_visible_image_urls(&self, scope: &str) -> Result<Vec<String>, ScraperError> {
        let script = format!(
            r#"
            (function() {{
                var imgs = document.querySelectorAll('{scope} img');
                var urls = [];
                for (var i = 0; i < imgs.length; i++) {{
                    var src = imgs[i].getAttribute('src');
                    if (src) urls.push(src);
                }}
                return urls;
            }})()
            "#
        );
        let result = self
            .page
            .evaluate(script.as_str())
            .await
            .map_err(|e| ScraperError::JavaScript(e.to_string()))?;
        Ok(result.into_value::<Vec<String>>().unwrap_or_default())
    }

    async fn fetch_secondary_page(&self, id: &str) -> Result<Option<String>, ScraperError> {
        let url = format!("{}/{}", BUILDING_PAGE_BASE, id);

        let secondary = match self.browser.new_page(url.as_str()).await {
            Ok(p) => p,
            Err(e) => {
                debug!("建物ページを開けませんでした: {}", e);
                return Ok(None);
            }
        };

        tokio::time::sleep(std::time::Duration::from_secs(2)).await;

        let html = secondary.content().await.ok();
        if let Err(e) = secondary.close().await {
            debug!("建物ページのクローズに失敗: {}", e);
        }

        Ok(html)
    }
}

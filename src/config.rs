use std::time::Duration;

/// スクレイパー設定
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    /// ヘッドレスモード
    pub headless: bool,
    /// デバッグモード（スクリーンショット等）
    pub debug: bool,
    /// 抽出全体のタイムアウト
    pub timeout: Duration,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            headless: true,
            debug: false,
            timeout: Duration::from_secs(120),
        }
    }
}

impl ScraperConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

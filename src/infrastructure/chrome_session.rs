//! chromiumoxide 浏览器会话 - 基础设施层

use async_trait::async_trait;
use chromiumoxide::Browser;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::browser::{connect_to_browser, launch_headless_browser, BrowserContext, BrowserSession};
use crate::config::Config;
use crate::error::BrowserError;
use crate::infrastructure::JsExecutor;

/// 基于 chromiumoxide 的浏览器会话
///
/// 每次 `open_context` 创建一个新页面，包装成 [`JsExecutor`]。
pub struct ChromeSession {
    browser: Browser,
    events: JoinHandle<()>,
}

impl ChromeSession {
    /// 根据配置连接已有浏览器，或启动无头浏览器
    pub async fn from_config(config: &Config) -> Result<Self, BrowserError> {
        let (browser, events) = match config.browser_debug_port {
            Some(port) => connect_to_browser(port).await?,
            None => launch_headless_browser(config.chrome_executable.as_deref()).await?,
        };
        Ok(Self { browser, events })
    }

    /// 关闭浏览器并停止事件处理
    pub async fn shutdown(mut self) {
        if let Err(e) = self.browser.close().await {
            warn!("关闭浏览器失败: {}", e);
        }
        self.events.abort();
        info!("浏览器已关闭");
    }
}

#[async_trait]
impl BrowserSession for ChromeSession {
    async fn open_context(&self) -> Result<Box<dyn BrowserContext>, BrowserError> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| BrowserError::PageCreationFailed {
                source: Box::new(e),
            })?;
        debug!("已创建新页面");
        Ok(Box::new(JsExecutor::new(page)))
    }
}

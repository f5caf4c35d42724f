//! JS 执行器 - 基础设施层
//!
//! 持有唯一的 page 资源，只暴露"导航"和"执行 JS"的能力

use async_trait::async_trait;
use chromiumoxide::Page;
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::browser::BrowserContext;
use crate::error::BrowserError;

/// JS 执行器
///
/// 职责：
/// - 持有唯一的 Page 资源
/// - 暴露 navigate() / eval() 能力
/// - 不认识 JobPosting
/// - 不处理重试和超时
pub struct JsExecutor {
    page: Page,
    closed: bool,
}

impl JsExecutor {
    /// 创建新的 JS 执行器
    pub fn new(page: Page) -> Self {
        Self {
            page,
            closed: false,
        }
    }

    /// 执行 JS 代码并返回 JSON 结果
    pub async fn eval(&self, js_code: impl Into<String>) -> Result<JsonValue, BrowserError> {
        let result = self.page.evaluate(js_code.into()).await?;
        result
            .into_value()
            .map_err(|e| BrowserError::ScriptExecutionFailed {
                source: Box::new(e),
            })
    }
}

#[async_trait]
impl BrowserContext for JsExecutor {
    async fn navigate(&mut self, url: &str) -> Result<(), BrowserError> {
        debug!("导航到: {}", url);
        self.page
            .goto(url)
            .await
            .map_err(|e| BrowserError::NavigationFailed {
                url: url.to_string(),
                source: Box::new(e),
            })?;
        Ok(())
    }

    async fn extract(&mut self, script: &str) -> Result<JsonValue, BrowserError> {
        self.eval(script).await
    }

    async fn close(&mut self) -> Result<(), BrowserError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.page
            .clone()
            .close()
            .await
            .map_err(|e| BrowserError::CloseFailed {
                source: Box::new(e),
            })
    }
}

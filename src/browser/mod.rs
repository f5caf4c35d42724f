//! 浏览器能力
//!
//! 核心流程只通过这里的两个 trait 使用浏览器，不直接持有 chromiumoxide 的类型。
//! 真实实现见 [`crate::infrastructure::ChromeSession`]，测试中使用脚本化的假实现。

pub mod connection;
pub mod headless;

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use crate::error::BrowserError;

pub use connection::connect_to_browser;
pub use headless::launch_headless_browser;

/// 浏览器会话
///
/// 一个会话可以同时打开多个互不共享的上下文。
#[async_trait]
pub trait BrowserSession: Send + Sync {
    /// 打开一个新的上下文（独立页面）
    async fn open_context(&self) -> Result<Box<dyn BrowserContext>, BrowserError>;
}

/// 单个浏览器上下文
///
/// 同一时间只属于一个解析任务。使用完毕后必须调用 [`BrowserContext::close`]。
#[async_trait]
pub trait BrowserContext: Send {
    /// 导航到指定地址
    async fn navigate(&mut self, url: &str) -> Result<(), BrowserError>;

    /// 在当前页面执行脚本并返回 JSON 结果
    async fn extract(&mut self, script: &str) -> Result<JsonValue, BrowserError>;

    /// 关闭上下文，重复调用无副作用
    async fn close(&mut self) -> Result<(), BrowserError>;
}

use std::path::Path;

use chromiumoxide::{Browser, BrowserConfig};
use futures::StreamExt;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, error, info};

use crate::error::BrowserError;

/// 启动无头浏览器
///
/// 返回浏览器和后台事件处理任务的句柄。
pub async fn launch_headless_browser(
    chrome_executable: Option<&str>,
) -> Result<(Browser, JoinHandle<()>), BrowserError> {
    info!("🚀 启动无头浏览器...");

    let mut builder = BrowserConfig::builder().new_headless_mode().args(vec![
        "--disable-gpu",
        "--no-sandbox",
        "--disable-dev-shm-usage",
        "--lang=nl-NL",
    ]);
    if let Some(path) = chrome_executable {
        debug!("使用浏览器可执行文件: {}", path);
        builder = builder.chrome_executable(Path::new(path));
    }

    let config = builder.build().map_err(|message| {
        error!("配置无头浏览器失败: {}", message);
        BrowserError::ConfigurationFailed { message }
    })?;

    let (browser, mut handler) = Browser::launch(config).await.map_err(|e| {
        error!("启动无头浏览器失败: {}", e);
        BrowserError::LaunchFailed {
            source: Box::new(e),
        }
    })?;
    debug!("无头浏览器启动成功");

    // 在后台处理浏览器事件
    let events = tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if h.is_err() {
                break;
            }
        }
    });

    // 等待浏览器状态同步
    sleep(tokio::time::Duration::from_millis(300)).await;

    info!("✅ 无头浏览器已就绪");
    Ok((browser, events))
}

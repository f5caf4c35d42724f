use anyhow::{Context, Result};
use job_enrichment::utils::logging;
use job_enrichment::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 读取 .env（不存在时忽略）
    let _ = dotenvy::dotenv();

    // 加载配置
    let config = Config::from_env().context("读取配置失败")?;

    // 初始化日志
    logging::init(config.verbose_logging);

    // 初始化并运行应用
    let app = App::initialize(config).await.context("初始化失败")?;
    let result = app.run().await;
    app.shutdown().await;

    result.context("处理职位批次失败")?;
    Ok(())
}

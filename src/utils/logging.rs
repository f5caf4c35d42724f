/// 日志工具模块
///
/// 提供日志初始化以及批次/统计信息的输出辅助函数
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化全局日志
///
/// 优先使用 `RUST_LOG`，否则根据 `verbose` 选择 info 或 debug 级别。
/// 重复调用是安全的（测试中会多次调用）。
pub fn init(verbose: bool) {
    let fallback = if verbose {
        "job_enrichment=debug"
    } else {
        "job_enrichment=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(scraping_enabled: bool, max_concurrent: usize, max_retries: u32) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 职位补全模式");
    info!(
        "🔗 链接解析: {}",
        if scraping_enabled { "开启" } else { "关闭" }
    );
    info!("📊 最大并发数: {} | 最大重试: {}", max_concurrent, max_retries);
    info!("{}", "=".repeat(60));
}

/// 记录批次加载信息
pub fn log_batches_loaded(total_batches: usize, total_postings: usize) {
    info!("✓ 找到 {} 个待处理的批次，共 {} 个职位", total_batches, total_postings);
}

/// 记录批次开始信息
pub fn log_batch_start(batch_num: usize, total_batches: usize, name: &str, postings: usize) {
    info!("\n{}", "=".repeat(60));
    info!("📦 开始处理第 {}/{} 批: {}", batch_num, total_batches, name);
    info!("📄 本批职位: {} 个", postings);
    info!("{}", "=".repeat(60));
}

/// 记录批次完成信息
pub fn log_batch_complete(batch_num: usize, verified: usize, total: usize) {
    info!("\n{}", "─".repeat(60));
    info!("✓ 第 {} 批完成: 链接已验证 {}/{}", batch_num, verified, total);
    info!("{}", "─".repeat(60));
}

/// 打印最终统计信息
pub fn print_final_stats(verified: usize, unverified: usize, total: usize, output_dir: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 链接已验证: {}/{}", verified, total);
    info!("❌ 链接不可用: {}", unverified);
    info!("{}", "=".repeat(60));
    info!("\n结果已保存至: {}", output_dir);
}

/// 截断长文本用于日志显示
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

//! 批量处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责批次的处理和资源管理。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：加载档案、启动或连接浏览器
//! 2. **批量加载**：扫描并加载所有待处理的职位批次（`Vec<PostingBatch>`）
//! 3. **逐批处理**：每批完成补全、评分并写入输出目录后再开始下一批
//! 4. **资源管理**：持有 ChromeSession，确保生命周期正确
//! 5. **全局统计**：汇总所有批次的链接验证结果
//!
//! ## 设计特点
//!
//! - **降级而不失败**：浏览器启动失败时继续运行，只是不解析链接
//! - **资源所有者**：唯一持有浏览器的模块
//! - **向下委托**：委托 enrichment_coordinator 处理单个批次

use std::path::Path;
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::browser::BrowserSession;
use crate::config::Config;
use crate::error::AppResult;
use crate::infrastructure::ChromeSession;
use crate::models::loaders::{load_all_posting_batches, save_enriched_batch, PostingBatch, ProfileStore};
use crate::models::profile::UserProfile;
use crate::orchestrator::{count_verified, enrich_and_score};
use crate::utils::logging;

/// 应用主结构
pub struct App {
    config: Config,
    profile: UserProfile,
    session: Option<Arc<ChromeSession>>,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> AppResult<Self> {
        logging::log_startup(
            config.enable_url_scraping,
            config.max_concurrent_resolutions,
            config.max_scraping_retries,
        );

        let store = ProfileStore::open(&config.profiles_dir)?;
        let profile = store.load_active(&config.active_profile)?;
        info!(
            "👤 当前档案: {} ({})",
            profile.name,
            profile.profile_id.as_deref().unwrap_or("-")
        );

        let session = if config.enable_url_scraping {
            match ChromeSession::from_config(&config).await {
                Ok(session) => Some(Arc::new(session)),
                Err(e) => {
                    warn!("⚠️ 浏览器不可用，链接将不会被验证: {}", e);
                    None
                }
            }
        } else {
            info!("链接解析已关闭 (ENABLE_URL_SCRAPING=false)");
            None
        };

        Ok(Self {
            config,
            profile,
            session,
        })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> AppResult<()> {
        info!("\n📁 正在扫描待处理的职位批次...");
        let batches = load_all_posting_batches(&self.config.postings_folder).await?;

        if batches.is_empty() {
            warn!("⚠️ 没有找到待处理的职位文件，程序结束");
            return Ok(());
        }

        let total_postings: usize = batches.iter().map(|b| b.postings.len()).sum();
        logging::log_batches_loaded(batches.len(), total_postings);

        let mut stats = ProcessingStats::default();
        let total_batches = batches.len();

        for (idx, batch) in batches.into_iter().enumerate() {
            let batch_num = idx + 1;
            logging::log_batch_start(batch_num, total_batches, &batch.name, batch.postings.len());

            match self.process_batch(batch).await {
                Ok(result) => {
                    logging::log_batch_complete(batch_num, result.verified, result.total);
                    stats.verified += result.verified;
                    stats.total += result.total;
                }
                Err(e) => {
                    error!("[批次 {}] ❌ 处理失败: {}", batch_num, e);
                    stats.failed_batches += 1;
                }
            }
        }

        logging::print_final_stats(
            stats.verified,
            stats.total - stats.verified,
            stats.total,
            &self.config.output_folder,
        );
        if stats.failed_batches > 0 {
            warn!("⚠️ {} 个批次处理失败", stats.failed_batches);
        }

        Ok(())
    }

    /// 处理单个批次：补全、评分、保存
    async fn process_batch(&self, batch: PostingBatch) -> AppResult<BatchResult> {
        let session = self
            .session
            .clone()
            .map(|session| session as Arc<dyn BrowserSession>);

        let enriched = enrich_and_score(batch.postings, &self.profile, &self.config, session).await?;

        save_enriched_batch(
            Path::new(&self.config.output_folder),
            &batch.name,
            chrono::Local::now().date_naive(),
            self.profile.profile_id.as_deref(),
            &enriched,
        )?;

        Ok(BatchResult {
            verified: count_verified(&enriched),
            total: enriched.len(),
        })
    }

    /// 关闭浏览器
    pub async fn shutdown(self) {
        let Some(session) = self.session else {
            return;
        };
        match Arc::try_unwrap(session) {
            Ok(session) => session.shutdown().await,
            Err(_) => warn!("浏览器会话仍在使用中，跳过关闭"),
        }
    }
}

/// 处理统计
#[derive(Debug, Default)]
struct ProcessingStats {
    verified: usize,
    total: usize,
    failed_batches: usize,
}

/// 批次处理结果
#[derive(Debug, Default)]
struct BatchResult {
    verified: usize,
    total: usize,
}

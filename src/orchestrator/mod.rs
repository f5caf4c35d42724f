//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批量处理和流程调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 批量处理器
//! - 管理应用生命周期（初始化、运行、清理）
//! - 加载用户档案和所有职位批次
//! - 管理浏览器资源（ChromeSession）
//! - 保存结果，输出全局统计信息
//!
//! ### `enrichment_coordinator` - 单个批次的补全协调器
//! - 链接分类与分流
//! - 控制解析并发数量（Semaphore）
//! - 按身份合并解析结果，保持输入顺序
//! - 为每个职位评分
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<PostingBatch>)
//!     ↓
//! enrichment_coordinator (处理 Vec<JobPosting>)
//!     ↓
//! workflow::ResolutionFlow (处理单个 ScrapeTask)
//!     ↓
//! services (能力层：compile / score / classify / resolve)
//!     ↓
//! infrastructure (基础设施：ChromeSession / JsExecutor)
//! ```

pub mod batch_processor;
pub mod enrichment_coordinator;

use std::sync::Arc;

use crate::browser::BrowserSession;
use crate::config::Config;
use crate::error::AppResult;
use crate::models::posting::{EnrichedJobPosting, JobPosting};
use crate::models::profile::UserProfile;
use crate::services::{compile_criteria, UrlValidator};

pub use batch_processor::App;
pub use enrichment_coordinator::{count_verified, EnrichmentCoordinator};

/// 补全并评分一批职位
///
/// 唯一会返回的错误是结构性错误：档案无法编译为匹配条件，或内置链接规则无效。
/// 单个职位的链接解析失败只体现在输出的 `url_note` 中。
pub async fn enrich_and_score(
    postings: Vec<JobPosting>,
    profile: &UserProfile,
    config: &Config,
    browser: Option<Arc<dyn BrowserSession>>,
) -> AppResult<Vec<EnrichedJobPosting>> {
    let criteria = compile_criteria(profile)?;
    let validator = Arc::new(UrlValidator::with_default_sources()?);
    let coordinator = EnrichmentCoordinator::new(config, validator);
    Ok(coordinator.enrich(postings, &criteria, browser).await)
}

//! 链接解析流程 - 流程层
//!
//! 核心职责：定义"一个职位"的链接解析流程
//!
//! 流程顺序：
//! 1. 检查来源是否支持解析
//! 2. 委托 TargetedResolver 完成搜索与重试
//! 3. 记录尝试次数并输出结果

use std::sync::Arc;

use tracing::{info, warn};

use crate::browser::BrowserSession;
use crate::services::{ResolutionOutcome, TargetedResolver};
use crate::workflow::scrape_task::ScrapeTask;

/// 链接解析流程
///
/// - 不持有浏览器会话，由编排层传入
/// - 只依赖业务能力（services）
pub struct ResolutionFlow {
    resolver: Arc<TargetedResolver>,
}

impl ResolutionFlow {
    pub fn new(resolver: Arc<TargetedResolver>) -> Self {
        Self { resolver }
    }

    /// 执行解析，返回结果并更新任务的尝试次数
    pub async fn run(&self, session: &dyn BrowserSession, task: &mut ScrapeTask) -> ResolutionOutcome {
        info!(
            "{} 🔍 开始解析链接 (来源: {}, 原始链接: {:?})",
            task, task.source, task.classification
        );

        let resolution = self
            .resolver
            .resolve(session, &task.source, &task.query)
            .await;
        task.attempts_made += resolution.attempts;

        match &resolution.outcome {
            ResolutionOutcome::Resolved(url) => {
                info!("{} ✅ 链接已解析: {}", task, url);
            }
            ResolutionOutcome::NotFound(reason) => {
                warn!(
                    "{} ❌ 未找到直接链接 ({} 次尝试): {}",
                    task, task.attempts_made, reason
                );
            }
        }

        resolution.outcome
    }
}

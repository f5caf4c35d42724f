//! 职位补全协调器 - 编排层
//!
//! ## 职责
//!
//! 1. **分类**：对每个职位的原始链接分类
//! 2. **分流**：直接链接跳过解析，其余职位生成 `ScrapeTask`
//! 3. **并发控制**：使用 Semaphore 限制同时进行的解析任务
//! 4. **礼貌延迟**：同一个工作槽位在两次解析之间等待
//! 5. **合并**：按 `PostingKey` 把结果合并回职位，输出顺序与输入一致
//! 6. **评分**：每个职位都会评分，链接失败不影响输出
//!
//! 浏览器不可用或解析被关闭时进入降级模式：保留原始链接，只按分类标记是否已验证。

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::browser::BrowserSession;
use crate::config::Config;
use crate::models::criteria::MatchCriteria;
use crate::models::posting::{EnrichedJobPosting, JobPosting, UrlClass};
use crate::services::{score_posting, ResolutionOutcome, TargetedResolver, UrlValidator};
use crate::workflow::{PostingKey, ResolutionFlow, ScrapeTask};

const NOTE_SCRAPING_DISABLED: &str = "URL not verified: link lookup is disabled.";
const NOTE_BROWSER_UNAVAILABLE: &str = "URL not verified: browser automation is unavailable.";
const NOTE_TASK_FAILED: &str = "Direct job link could not be found. Search manually on job board.";

/// 职位补全协调器
pub struct EnrichmentCoordinator {
    validator: Arc<UrlValidator>,
    flow: Arc<ResolutionFlow>,
    scraping_enabled: bool,
    max_concurrent: usize,
    inter_posting_delay: Duration,
}

impl EnrichmentCoordinator {
    pub fn new(config: &Config, validator: Arc<UrlValidator>) -> Self {
        let resolver = Arc::new(TargetedResolver::new(validator.clone(), config.retry_policy()));
        Self {
            validator,
            flow: Arc::new(ResolutionFlow::new(resolver)),
            scraping_enabled: config.enable_url_scraping,
            max_concurrent: config.max_concurrent_resolutions.max(1),
            inter_posting_delay: config.inter_posting_delay(),
        }
    }

    /// 补全并评分，输出与输入一一对应且顺序相同
    pub async fn enrich(
        &self,
        postings: Vec<JobPosting>,
        criteria: &MatchCriteria,
        session: Option<Arc<dyn BrowserSession>>,
    ) -> Vec<EnrichedJobPosting> {
        let entries: Vec<(PostingKey, JobPosting, UrlClass)> = postings
            .into_iter()
            .enumerate()
            .map(|(idx, posting)| {
                let class = self.validator.classify(&posting.raw_url, &posting.source);
                (PostingKey::new(idx as u64), posting, class)
            })
            .collect();

        let direct = entries.iter().filter(|(_, _, class)| class.is_direct()).count();
        debug!("链接分类完成: {} 个直接链接 / 共 {} 个职位", direct, entries.len());

        let session = match (self.scraping_enabled, session) {
            (true, Some(session)) => session,
            (enabled, _) => {
                let note = if enabled {
                    NOTE_BROWSER_UNAVAILABLE
                } else {
                    NOTE_SCRAPING_DISABLED
                };
                warn!("⚠️ 降级模式: {}", note);
                return entries
                    .into_iter()
                    .map(|(_, posting, class)| degraded(posting, class, note, criteria))
                    .collect();
            }
        };

        let tasks: Vec<ScrapeTask> = entries
            .iter()
            .filter(|(_, _, class)| !class.is_direct())
            .map(|(key, posting, class)| {
                ScrapeTask::new(*key, posting, *class, criteria.primary_location())
            })
            .collect();

        info!(
            "🔗 {} 个职位需要解析链接，{} 个已是直接链接",
            tasks.len(),
            direct
        );

        let mut outcomes = self.resolve_all(tasks, session).await;

        entries
            .into_iter()
            .map(|(key, posting, class)| {
                let score = score_posting(&posting, criteria);
                if class.is_direct() {
                    let url = posting.raw_url.trim().to_string();
                    return EnrichedJobPosting::verified(posting, score, url, class);
                }
                match outcomes.remove(&key) {
                    Some(ResolutionOutcome::Resolved(url)) => {
                        EnrichedJobPosting::verified(posting, score, url, class)
                    }
                    Some(ResolutionOutcome::NotFound(reason)) => {
                        EnrichedJobPosting::unavailable(posting, score, reason.note(), class)
                    }
                    None => EnrichedJobPosting::unavailable(
                        posting,
                        score,
                        NOTE_TASK_FAILED.to_string(),
                        class,
                    ),
                }
            })
            .collect()
    }

    /// 在并发上限内解析所有任务
    async fn resolve_all(
        &self,
        tasks: Vec<ScrapeTask>,
        session: Arc<dyn BrowserSession>,
    ) -> HashMap<PostingKey, ResolutionOutcome> {
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));
        let total = tasks.len();
        let mut handles = Vec::with_capacity(total);

        for (idx, mut task) in tasks.into_iter().enumerate() {
            let permit = match semaphore.clone().acquire_owned().await {
                Ok(permit) => permit,
                Err(e) => {
                    error!("{} 无法获取并发许可: {}", task, e);
                    break;
                }
            };

            let flow = self.flow.clone();
            let session = session.clone();
            // 之后还有任务会接着使用这个槽位
            let delay_after = (idx + self.max_concurrent < total).then_some(self.inter_posting_delay);
            let key = task.key;

            let handle = tokio::spawn(async move {
                let _permit = permit;
                let outcome = flow.run(session.as_ref(), &mut task).await;

                if let Some(delay) = delay_after.filter(|d| !d.is_zero()) {
                    if task.attempts_made > 0 {
                        debug!("{} 等待 {:?} 后处理下一个职位", task, delay);
                        sleep(delay).await;
                    }
                }
                outcome
            });
            handles.push((key, handle));
        }

        let mut outcomes = HashMap::with_capacity(handles.len());
        for (key, handle) in handles {
            match handle.await {
                Ok(outcome) => {
                    outcomes.insert(key, outcome);
                }
                Err(e) => {
                    error!("[职位 {}] 解析任务执行失败: {}", key, e);
                }
            }
        }
        outcomes
    }
}

fn degraded(
    posting: JobPosting,
    class: UrlClass,
    note: &str,
    criteria: &MatchCriteria,
) -> EnrichedJobPosting {
    let score = score_posting(&posting, criteria);
    if class.is_direct() {
        let url = posting.raw_url.trim().to_string();
        EnrichedJobPosting::verified(posting, score, url, class)
    } else {
        EnrichedJobPosting::unverified(posting, score, note.to_string(), class)
    }
}

/// 统计补全结果中已验证的链接数
pub fn count_verified(postings: &[EnrichedJobPosting]) -> usize {
    postings.iter().filter(|p| p.url_verified()).count()
}


//! 定向链接解析 - 业务能力层
//!
//! 在来源站内搜索"职位名 + 公司"，从第一页结果中找到匹配的职位，拼出直接链接。
//!
//! 失败分两类：
//! - 可重试：超时、导航失败、结果为空、提取失败
//! - 确定失败：页面明确显示没有结果，或结果中没有匹配的职位
//!
//! 找不到链接不是错误，而是 [`ResolutionOutcome::NotFound`]。

use std::fmt;
use std::sync::Arc;

use tokio::time::{sleep, timeout, timeout_at, Instant};
use tracing::{debug, info, warn};

use crate::browser::{BrowserContext, BrowserSession};
use crate::services::{RetryPolicy, UrlValidator};
use crate::sources::{JobSource, ResolutionStrategy, SearchPage, SearchQuery};
use crate::utils::text::{companies_match, titles_match};
use crate::utils::truncate_text;

/// 超时发生在哪一步
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    OpenContext,
    Navigate,
    Extract,
    /// 整次尝试超过了截止时间
    Attempt,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::OpenContext => "打开页面",
            Step::Navigate => "导航",
            Step::Extract => "提取",
            Step::Attempt => "整次尝试",
        };
        f.write_str(name)
    }
}

/// 单次尝试的失败原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptFailure {
    Timeout(Step),
    ContextUnavailable(String),
    Navigation(String),
    Extraction(String),
    /// 结果页没有任何记录，可能尚未加载完成
    EmptyResults,
    /// 页面明确显示没有结果
    NoResults,
    /// 有结果，但没有匹配的职位
    NoMatchingEntry,
}

impl AttemptFailure {
    /// 确定失败不再重试
    pub fn is_definitive(&self) -> bool {
        matches!(self, AttemptFailure::NoResults | AttemptFailure::NoMatchingEntry)
    }
}

impl fmt::Display for AttemptFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttemptFailure::Timeout(step) => write!(f, "{}超时", step),
            AttemptFailure::ContextUnavailable(e) => write!(f, "无法打开页面: {}", e),
            AttemptFailure::Navigation(e) => write!(f, "导航失败: {}", e),
            AttemptFailure::Extraction(e) => write!(f, "提取失败: {}", e),
            AttemptFailure::EmptyResults => f.write_str("结果页为空"),
            AttemptFailure::NoResults => f.write_str("站内搜索没有结果"),
            AttemptFailure::NoMatchingEntry => f.write_str("结果中没有匹配的职位"),
        }
    }
}

/// 未找到链接的原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotFoundReason {
    /// 来源没有解析策略
    UnsupportedSource { source: String },
    /// 站内确定没有这个职位
    Definitive(AttemptFailure),
    /// 重试次数用尽
    RetriesExhausted { attempts: u32, last: AttemptFailure },
}

impl NotFoundReason {
    /// 写入输出文件的说明
    pub fn note(&self) -> String {
        match self {
            NotFoundReason::UnsupportedSource { source } => format!(
                "Direct job link could not be verified: {} is not supported for link lookup. Search manually on the job board.",
                if source.trim().is_empty() { "this source" } else { source.trim() }
            ),
            NotFoundReason::Definitive(_) => {
                "Posting not found on the job board. It may have been removed; search manually.".to_string()
            }
            NotFoundReason::RetriesExhausted { attempts, .. } => format!(
                "Direct job link could not be found after {} attempts. Search manually on job board.",
                attempts
            ),
        }
    }
}

impl fmt::Display for NotFoundReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotFoundReason::UnsupportedSource { source } => write!(f, "来源不支持解析: {}", source),
            NotFoundReason::Definitive(failure) => write!(f, "{}", failure),
            NotFoundReason::RetriesExhausted { attempts, last } => {
                write!(f, "{} 次尝试均失败，最后一次: {}", attempts, last)
            }
        }
    }
}

/// 解析结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionOutcome {
    Resolved(String),
    NotFound(NotFoundReason),
}

impl ResolutionOutcome {
    pub fn is_resolved(&self) -> bool {
        matches!(self, ResolutionOutcome::Resolved(_))
    }
}

/// 一次解析的结果以及实际使用的尝试次数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub outcome: ResolutionOutcome,
    pub attempts: u32,
}

/// 定向链接解析器
///
/// 职责：
/// - 按来源选择解析策略
/// - 执行单个职位的全部尝试（含重试和超时）
/// - 每次尝试都独占一个浏览器上下文，结束时一定关闭
/// - 不关心职位在批次中的位置
pub struct TargetedResolver {
    validator: Arc<UrlValidator>,
    policy: RetryPolicy,
}

impl TargetedResolver {
    pub fn new(validator: Arc<UrlValidator>, policy: RetryPolicy) -> Self {
        Self { validator, policy }
    }

    /// 来源是否有解析策略
    pub fn supports(&self, source: &str, raw_url: &str) -> bool {
        self.validator
            .source_for(raw_url, source)
            .is_some_and(|s| s.resolver().is_some())
    }

    /// 解析单个职位的直接链接
    pub async fn resolve(
        &self,
        session: &dyn BrowserSession,
        source: &str,
        query: &SearchQuery,
    ) -> Resolution {
        let Some((job_source, strategy)) = self
            .validator
            .source_for(&query.raw_url, source)
            .and_then(|s| s.resolver().map(|strategy| (s, strategy)))
        else {
            debug!("来源 '{}' 没有解析策略，跳过", source);
            return Resolution {
                outcome: ResolutionOutcome::NotFound(NotFoundReason::UnsupportedSource {
                    source: source.to_string(),
                }),
                attempts: 0,
            };
        };

        let search_url = strategy.search_url(query);
        let label = format!(
            "{} @ {}",
            truncate_text(&query.title, 40),
            truncate_text(&query.company, 30)
        );
        debug!("[{}] 站内搜索: {}", label, search_url);

        let mut attempts = 0;
        loop {
            attempts += 1;
            let deadline = Instant::now() + self.policy.attempt_timeout();

            let failure = match self
                .attempt(session, job_source, strategy, &search_url, query, deadline)
                .await
            {
                Ok(url) => {
                    info!("[{}] ✅ 找到直接链接 (第 {} 次尝试): {}", label, attempts, url);
                    return Resolution {
                        outcome: ResolutionOutcome::Resolved(url),
                        attempts,
                    };
                }
                Err(failure) => failure,
            };

            if failure.is_definitive() {
                info!("[{}] ⚠️ {}，不再重试", label, failure);
                return Resolution {
                    outcome: ResolutionOutcome::NotFound(NotFoundReason::Definitive(failure)),
                    attempts,
                };
            }

            if !self.policy.allows_retry_after(attempts) {
                warn!(
                    "[{}] ❌ 已尝试 {}/{} 次，放弃: {}",
                    label,
                    attempts,
                    self.policy.max_attempts(),
                    failure
                );
                return Resolution {
                    outcome: ResolutionOutcome::NotFound(NotFoundReason::RetriesExhausted {
                        attempts,
                        last: failure,
                    }),
                    attempts,
                };
            }

            warn!(
                "[{}] 第 {}/{} 次尝试失败: {}，准备重试",
                label,
                attempts,
                self.policy.max_attempts(),
                failure
            );
            if !self.policy.backoff().is_zero() {
                sleep(self.policy.backoff()).await;
            }
        }
    }

    /// 一次尝试：打开上下文 → 搜索 → 关闭上下文
    async fn attempt(
        &self,
        session: &dyn BrowserSession,
        job_source: &dyn JobSource,
        strategy: &dyn ResolutionStrategy,
        search_url: &str,
        query: &SearchQuery,
        deadline: Instant,
    ) -> Result<String, AttemptFailure> {
        let mut context = match timeout(self.policy.step_timeout(), session.open_context()).await {
            Err(_) => return Err(AttemptFailure::Timeout(Step::OpenContext)),
            Ok(Err(e)) => return Err(AttemptFailure::ContextUnavailable(e.to_string())),
            Ok(Ok(context)) => context,
        };

        let result = timeout_at(
            deadline,
            self.search(context.as_mut(), job_source, strategy, search_url, query),
        )
        .await
        .unwrap_or(Err(AttemptFailure::Timeout(Step::Attempt)));

        // 关闭也有时限，卡住的页面不能一直占着并发槽位
        match timeout(self.policy.step_timeout(), context.close()).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!("关闭页面失败: {}", e),
            Err(_) => warn!("关闭页面超时 ({:?})，不再等待", self.policy.step_timeout()),
        }

        result
    }

    async fn search(
        &self,
        context: &mut dyn BrowserContext,
        job_source: &dyn JobSource,
        strategy: &dyn ResolutionStrategy,
        search_url: &str,
        query: &SearchQuery,
    ) -> Result<String, AttemptFailure> {
        let step = self.policy.step_timeout();

        timeout(step, context.navigate(search_url))
            .await
            .map_err(|_| AttemptFailure::Timeout(Step::Navigate))?
            .map_err(|e| AttemptFailure::Navigation(e.to_string()))?;

        let value = timeout(step, context.extract(strategy.results_script()))
            .await
            .map_err(|_| AttemptFailure::Timeout(Step::Extract))?
            .map_err(|e| AttemptFailure::Extraction(e.to_string()))?;

        let page: SearchPage = serde_json::from_value(value)
            .map_err(|e| AttemptFailure::Extraction(format!("结果格式无法解析: {}", e)))?;

        if page.no_results {
            return Err(AttemptFailure::NoResults);
        }
        if page.hits.is_empty() {
            return Err(AttemptFailure::EmptyResults);
        }
        debug!("结果页共 {} 条记录", page.hits.len());

        let hit = page
            .hits
            .iter()
            .find(|hit| {
                titles_match(&query.title, &hit.title) && companies_match(&query.company, &hit.company)
            })
            .ok_or(AttemptFailure::NoMatchingEntry)?;

        let url = strategy
            .listing_url(hit, query)
            .ok_or_else(|| AttemptFailure::Extraction("匹配的记录缺少职位ID".to_string()))?;

        if !self.validator.classify(&url, job_source.name()).is_direct() {
            return Err(AttemptFailure::Extraction(format!(
                "构造的链接不是职位详情页: {}",
                url
            )));
        }

        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_explicit_signals_are_definitive() {
        assert!(AttemptFailure::NoResults.is_definitive());
        assert!(AttemptFailure::NoMatchingEntry.is_definitive());
        assert!(!AttemptFailure::EmptyResults.is_definitive());
        assert!(!AttemptFailure::Timeout(Step::Navigate).is_definitive());
        assert!(!AttemptFailure::Extraction("x".into()).is_definitive());
    }

    #[test]
    fn notes_are_human_readable() {
        let exhausted = NotFoundReason::RetriesExhausted {
            attempts: 3,
            last: AttemptFailure::Timeout(Step::Navigate),
        };
        assert_eq!(
            exhausted.note(),
            "Direct job link could not be found after 3 attempts. Search manually on job board."
        );
        assert!(exhausted.to_string().contains("导航超时"));

        let unsupported = NotFoundReason::UnsupportedSource { source: "Werkzoeken".into() };
        assert!(unsupported.note().contains("Werkzoeken is not supported"));
    }

    #[test]
    fn supports_only_sources_with_a_strategy() {
        let resolver = TargetedResolver::new(
            Arc::new(UrlValidator::with_default_sources().unwrap()),
            RetryPolicy::default(),
        );
        assert!(resolver.supports("indeed", "https://nl.indeed.com/vacatures"));
        assert!(resolver.supports("Glassdoor", ""));
        assert!(!resolver.supports("linkedin", "https://www.linkedin.com/jobs/search"));
        assert!(!resolver.supports("Werkzoeken", "https://www.werkzoeken.nl/vacature/1"));
    }
}

//! 链接分类 - 业务能力层
//!
//! 判断一个职位的原始链接能否直接使用。规则按顺序执行，先命中者生效：
//!
//! 1. 空值或占位链接 → `Invalid`
//! 2. 来源的搜索页规则 → `Invalid`
//! 3. 来源的单个职位规则 → `Direct`
//! 4. 其他 → `Unknown`
//!
//! 规则 2、3 只在链接的域名确实属于该来源时生效。

use std::sync::Arc;

use phf::phf_set;
use regex::Regex;

use crate::error::ConfigError;
use crate::models::posting::{UrlClass, URL_NOT_AVAILABLE};
use crate::sources::{parse_url, source_pattern, JobSource, SourceRegistry};

/// 常被编造出来的职位ID
static PLACEHOLDER_IDS: phf::Set<&'static str> = phf_set! {
    "123456", "654321", "789012", "345678", "901234", "567890", "12345", "1234567890",
};

/// 不是链接、只是一句说明
const PLACEHOLDER_NOTES: &[&str] = &["see listing", "see job"];

/// 链接分类器
///
/// 职责：
/// - 识别占位链接
/// - 按来源规则区分搜索页和职位页
/// - 不访问网络
pub struct UrlValidator {
    registry: Arc<SourceRegistry>,
    placeholder_id: Regex,
}

impl UrlValidator {
    pub fn new(registry: Arc<SourceRegistry>) -> Result<Self, ConfigError> {
        Ok(Self {
            registry,
            placeholder_id: source_pattern(
                "placeholder",
                r"(?i)(?:[?&](?:jk|jl|currentjobid|jobid)=|/jobs/view/(?:[^/?#]*-)?)(\d+)(?:[&#/?]|$)",
            )?,
        })
    }

    /// 使用内置来源
    pub fn with_default_sources() -> Result<Self, ConfigError> {
        Self::new(Arc::new(SourceRegistry::with_defaults()?))
    }

    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    /// 查找链接所属的来源
    pub fn source_for(&self, raw_url: &str, source: &str) -> Option<&dyn JobSource> {
        self.registry.find(source, parse_url(raw_url).as_ref())
    }

    /// 对原始链接分类
    pub fn classify(&self, raw_url: &str, source: &str) -> UrlClass {
        let url = raw_url.trim();

        if self.is_placeholder(url) {
            return UrlClass::Invalid;
        }

        let Some(parsed) = parse_url(url) else {
            return UrlClass::Unknown;
        };
        let Some(job_source) = self.registry.find(source, Some(&parsed)) else {
            return UrlClass::Unknown;
        };
        if !job_source.owns_host(&parsed) {
            return UrlClass::Unknown;
        }

        if job_source.is_search_page(&parsed) {
            UrlClass::Invalid
        } else if job_source.is_single_posting(&parsed) {
            UrlClass::Direct
        } else {
            UrlClass::Unknown
        }
    }

    fn is_placeholder(&self, url: &str) -> bool {
        if url.is_empty() || url.eq_ignore_ascii_case(URL_NOT_AVAILABLE) || url.eq_ignore_ascii_case("n/a") {
            return true;
        }

        let lower = url.to_lowercase();
        if lower.contains('…') || lower.contains("...") || lower.chars().any(char::is_whitespace) {
            return true;
        }
        if PLACEHOLDER_NOTES.iter().any(|note| lower.contains(note)) {
            return true;
        }

        self.placeholder_id
            .captures_iter(url)
            .filter_map(|caps| caps.get(1))
            .any(|id| PLACEHOLDER_IDS.contains(id.as_str()))
    }
}

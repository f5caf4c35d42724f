//! 招聘来源 - 业务能力层
//!
//! 每个来源描述两件事：
//! - 如何识别自己的链接（搜索页 / 单个职位页）
//! - 可选的解析策略：如何在站内搜索一个职位并拼出直接链接
//!
//! 新增来源只需要实现 [`JobSource`] 并注册到 [`SourceRegistry`]，
//! 协调器和解析器都不需要改动。

mod glassdoor;
mod indeed;
mod linkedin;

pub use glassdoor::Glassdoor;
pub use indeed::Indeed;
pub use linkedin::LinkedIn;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use phf::phf_set;
use regex::Regex;
use serde::Deserialize;
use url::Url;

use crate::error::ConfigError;
use crate::utils::text::words;

/// 一次站内搜索的查询条件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    /// 原始链接，部分来源用它推断站点域名
    pub raw_url: String,
}

/// 搜索结果页上的一条记录
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SearchHit {
    /// 站内职位ID（例如 Indeed 的 `data-jk`）
    #[serde(default)]
    pub id: Option<String>,
    /// 职位链接（可能是相对路径）
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company: String,
}

/// 提取脚本返回的搜索结果页
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SearchPage {
    /// 页面明确显示"没有结果"
    #[serde(default, rename = "noResults")]
    pub no_results: bool,
    #[serde(default)]
    pub hits: Vec<SearchHit>,
}

/// 招聘来源
pub trait JobSource: Send + Sync {
    /// 展示用名称
    fn name(&self) -> &'static str;

    /// 用于匹配来源名和域名的关键字，例如 "indeed"
    fn key(&self) -> &'static str;

    /// 链接是否为搜索结果页或列表页，只看路径和查询参数
    fn is_search_page(&self, url: &Url) -> bool;

    /// 链接是否为单个职位详情页，只看路径和查询参数
    fn is_single_posting(&self, url: &Url) -> bool;

    /// 域名是否属于这个来源
    fn owns_host(&self, url: &Url) -> bool {
        url.host_str().is_some_and(|host| is_source_host(host, self.key()))
    }

    /// 站内解析策略，没有则不尝试解析
    fn resolver(&self) -> Option<&dyn ResolutionStrategy> {
        None
    }
}

/// 站内解析策略
pub trait ResolutionStrategy: Send + Sync {
    /// 站内搜索地址
    fn search_url(&self, query: &SearchQuery) -> String;

    /// 在搜索结果页执行的提取脚本，返回 [`SearchPage`] 形状的 JSON
    fn results_script(&self) -> &'static str;

    /// 根据命中的记录构造直接链接
    fn listing_url(&self, hit: &SearchHit, query: &SearchQuery) -> Option<String>;
}

/// 来源注册表
pub struct SourceRegistry {
    sources: Vec<Box<dyn JobSource>>,
}

impl SourceRegistry {
    /// 空注册表
    pub fn empty() -> Self {
        Self { sources: Vec::new() }
    }

    /// 内置来源：Indeed、Glassdoor、LinkedIn
    pub fn with_defaults() -> Result<Self, ConfigError> {
        let mut registry = Self::empty();
        registry.register(Indeed::new()?);
        registry.register(Glassdoor::new()?);
        registry.register(LinkedIn::new()?);
        Ok(registry)
    }

    pub fn register(&mut self, source: impl JobSource + 'static) {
        self.sources.push(Box::new(source));
    }

    /// 先按来源名查找，找不到再按链接域名查找
    pub fn find(&self, source_name: &str, url: Option<&Url>) -> Option<&dyn JobSource> {
        let name_words = words(source_name);
        let by_name = self.sources.iter().find(|s| {
            name_words.iter().any(|w| w == s.key())
                || is_source_host(&source_name.trim().to_lowercase(), s.key())
        });

        by_name
            .or_else(|| {
                let url = url?;
                self.sources.iter().find(|s| s.owns_host(url))
            })
            .map(|s| &**s)
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.sources.iter().map(|s| s.name()).collect()
    }
}

/// 编译来源的链接规则
pub(crate) fn source_pattern(source_name: &str, pattern: &str) -> Result<Regex, ConfigError> {
    Regex::new(pattern).map_err(|source| ConfigError::InvalidSourcePattern {
        source_name: source_name.to_string(),
        source,
    })
}

/// 解析 http(s) 链接，缺少 scheme 时按 https 处理
pub fn parse_url(raw: &str) -> Option<Url> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let parsed = if trimmed.contains("://") {
        Url::parse(trimmed)
    } else {
        Url::parse(&format!("https://{}", trimmed))
    }
    .ok()?;

    let has_domain = parsed.host_str().is_some_and(|host| host.contains('.'));
    (matches!(parsed.scheme(), "http" | "https") && has_domain).then_some(parsed)
}

/// 路径加查询参数，例如 `/viewjob?jk=abc`，来源规则只匹配这一部分
pub(crate) fn path_and_query(url: &Url) -> String {
    match url.query() {
        Some(query) => format!("{}?{}", url.path(), query),
        None => url.path().to_string(),
    }
}

/// 常见的二级公共后缀，例如 `indeed.co.uk`
static SECOND_LEVEL_LABELS: phf::Set<&'static str> = phf_set! {
    "co", "com", "org", "net", "ac", "gov", "edu",
};

/// 来源关键字是注册域名本身
///
/// `nl.indeed.com`、`indeed.co.uk` 属于 "indeed"；
/// `notindeed.com`、`indeed.evil.example` 不属于。
pub fn is_source_host(host: &str, key: &str) -> bool {
    let host = host.trim_end_matches('.').to_ascii_lowercase();
    let labels: Vec<&str> = host.split('.').collect();
    labels.iter().enumerate().any(|(idx, label)| {
        if *label != key {
            return false;
        }
        match &labels[idx + 1..] {
            [tld] => !tld.is_empty(),
            [second, tld] => SECOND_LEVEL_LABELS.contains(*second) && tld.len() == 2,
            _ => false,
        }
    })
}

/// 查询参数中不编码的字符（与表单编码一致）
const QUERY_COMPONENT_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b' ');

/// 表单风格的查询参数编码，空格写作 `+`
pub(crate) fn encode_query(value: &str) -> String {
    utf8_percent_encode(value.trim(), QUERY_COMPONENT_SET)
        .to_string()
        .replace(' ', "+")
}

/// 链接的 scheme + 域名，例如 `https://nl.indeed.com`
pub(crate) fn origin_of(url: &Url) -> Option<String> {
    let origin = url.origin();
    origin.is_tuple().then(|| origin.ascii_serialization())
}

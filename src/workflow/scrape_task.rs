//! 链接解析任务上下文
//!
//! 封装"我正在为哪个职位找链接"这一信息

use std::fmt::Display;

use crate::models::posting::{JobPosting, UrlClass};
use crate::sources::SearchQuery;
use crate::utils::truncate_text;

/// 职位在一次补全中的身份
///
/// 解析结果按身份合并回职位，而不是按数组下标。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PostingKey(u64);

impl PostingKey {
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

impl Display for PostingKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 链接解析任务
///
/// 截止时间按单次尝试计算，由解析器在每次尝试开始时设定，不记录在任务上。
#[derive(Debug, Clone)]
pub struct ScrapeTask {
    pub key: PostingKey,
    /// 职位的来源名称
    pub source: String,
    pub query: SearchQuery,
    /// 原始链接的分类（仅用于日志）
    pub classification: UrlClass,
    /// 已经使用的尝试次数
    pub attempts_made: u32,
}

impl ScrapeTask {
    /// 为职位创建任务，职位没有地点时使用默认地点
    pub fn new(
        key: PostingKey,
        posting: &JobPosting,
        classification: UrlClass,
        default_location: Option<&str>,
    ) -> Self {
        let location = posting
            .location
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .or(default_location)
            .map(String::from);

        Self {
            key,
            source: posting.source.clone(),
            query: SearchQuery {
                title: posting.title.clone(),
                company: posting.company.clone(),
                location,
                raw_url: posting.raw_url.clone(),
            },
            classification,
            attempts_made: 0,
        }
    }
}

impl Display for ScrapeTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[职位 {} {} @ {}]",
            self.key,
            truncate_text(&self.query.title, 40),
            truncate_text(&self.query.company, 30)
        )
    }
}

//! 编译后的匹配条件
//!
//! 由 [`crate::services::criteria_compiler`] 构建，构建后只读，
//! 可以在并发任务之间共享。

use std::collections::BTreeSet;

use chrono::NaiveDate;
use regex::Regex;

/// 经验条件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExperienceCriteria {
    pub min_years: u32,
    pub max_years: u32,
    pub exclude_senior_titles: bool,
}

/// 单个语言条件
#[derive(Debug, Clone)]
pub struct LanguageCriterion {
    /// 小写语言名
    pub name: String,
    pub required: bool,
    pub exclude_if_required: bool,
    /// 识别"职位要求该语言"的表述
    pub(crate) requirement_pattern: Regex,
    /// 识别文本中出现该语言
    pub(crate) mention_pattern: Regex,
}

impl LanguageCriterion {
    /// 文本中是否出现该语言
    pub fn is_mentioned_in(&self, text: &str) -> bool {
        self.mention_pattern.is_match(text)
    }

    /// 文本是否把该语言列为要求
    pub fn is_required_by(&self, text: &str) -> bool {
        self.requirement_pattern.is_match(text)
    }
}

/// 匹配条件
///
/// 集合使用 `BTreeSet`，保证遍历顺序固定，评分结果可复现。
#[derive(Debug, Clone)]
pub struct MatchCriteria {
    pub role_tokens: BTreeSet<String>,
    pub allowed_countries: BTreeSet<String>,
    pub allowed_cities: BTreeSet<String>,
    pub allow_remote: bool,
    pub experience: ExperienceCriteria,
    pub languages: Vec<LanguageCriterion>,
    pub max_posting_age_days: u32,
    /// 计算发布时间时使用的"今天"
    pub reference_date: NaiveDate,
}

impl MatchCriteria {
    /// 链接解析时使用的默认搜索地点
    pub fn primary_location(&self) -> Option<&str> {
        self.allowed_countries.iter().next().map(String::as_str)
    }
}

//! 职位数据模型

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 无法获得可用链接时写入 `url` 的占位值
pub const URL_NOT_AVAILABLE: &str = "URL_NOT_AVAILABLE";

/// 外部发现能力返回的原始职位
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// 来源名称，例如 "Indeed"
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub posted_date: Option<NaiveDate>,
    #[serde(default)]
    pub raw_url: String,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub skills: Vec<String>,
}

impl JobPosting {
    /// 创建只包含必要字段的职位
    pub fn new(
        title: impl Into<String>,
        company: impl Into<String>,
        source: impl Into<String>,
        raw_url: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            company: company.into(),
            location: None,
            description: None,
            source: source.into(),
            posted_date: None,
            raw_url: raw_url.into(),
            requirements: Vec::new(),
            skills: Vec::new(),
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_posted_date(mut self, date: NaiveDate) -> Self {
        self.posted_date = Some(date);
        self
    }

    pub fn with_requirements(mut self, requirements: Vec<String>) -> Self {
        self.requirements = requirements;
        self
    }

    /// 描述、要求和技能拼接后的小写文本，用于语言与经验判断
    pub fn searchable_text(&self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        if let Some(description) = &self.description {
            parts.push(description);
        }
        parts.extend(self.requirements.iter().map(String::as_str));
        parts.extend(self.skills.iter().map(String::as_str));
        parts.join("\n").to_lowercase()
    }
}

/// 链接分类结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrlClass {
    /// 可以直接使用的职位详情链接
    Direct,
    /// 已知无效（占位符或搜索结果页）
    Invalid,
    /// 无法判断
    Unknown,
}

impl UrlClass {
    pub fn is_direct(self) -> bool {
        matches!(self, UrlClass::Direct)
    }
}

/// 单个评分因素
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreFactor {
    pub factor: String,
    pub contribution: i32,
}

impl ScoreFactor {
    pub fn new(factor: impl Into<String>, contribution: i32) -> Self {
        Self {
            factor: factor.into(),
            contribution,
        }
    }
}

/// 评分结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchScore {
    pub score: u8,
    pub factors: Vec<ScoreFactor>,
}

impl MatchScore {
    pub fn has_factor(&self, name: &str) -> bool {
        self.factors.iter().any(|f| f.factor == name)
    }

    /// 按前缀查找因素，例如 `"role:"`
    pub fn factor_with_prefix(&self, prefix: &str) -> Option<&ScoreFactor> {
        self.factors.iter().find(|f| f.factor.starts_with(prefix))
    }
}

/// 补全后的职位
///
/// 只能通过 `verified` / `unavailable` / `unverified` 构造，
/// 保证 `url_verified` 与 `url`、`url_note` 的组合始终合法。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedJobPosting {
    #[serde(flatten)]
    posting: JobPosting,
    match_score: u8,
    score_factors: Vec<ScoreFactor>,
    url: String,
    url_verified: bool,
    url_note: Option<String>,
    url_classification: UrlClass,
}

impl EnrichedJobPosting {
    /// 链接已验证（直接可用或解析成功）
    pub fn verified(
        posting: JobPosting,
        score: MatchScore,
        url: String,
        classification: UrlClass,
    ) -> Self {
        Self {
            posting,
            match_score: score.score,
            score_factors: score.factors,
            url,
            url_verified: true,
            url_note: None,
            url_classification: classification,
        }
    }

    /// 尝试解析后仍没有可用链接
    pub fn unavailable(
        posting: JobPosting,
        score: MatchScore,
        note: String,
        classification: UrlClass,
    ) -> Self {
        Self {
            posting,
            match_score: score.score,
            score_factors: score.factors,
            url: URL_NOT_AVAILABLE.to_string(),
            url_verified: false,
            url_note: Some(note),
            url_classification: classification,
        }
    }

    /// 降级模式：保留原始链接，但不做验证
    pub fn unverified(
        posting: JobPosting,
        score: MatchScore,
        note: String,
        classification: UrlClass,
    ) -> Self {
        let url = if posting.raw_url.trim().is_empty() {
            URL_NOT_AVAILABLE.to_string()
        } else {
            posting.raw_url.clone()
        };
        Self {
            posting,
            match_score: score.score,
            score_factors: score.factors,
            url,
            url_verified: false,
            url_note: Some(note),
            url_classification: classification,
        }
    }

    pub fn posting(&self) -> &JobPosting {
        &self.posting
    }

    pub fn title(&self) -> &str {
        &self.posting.title
    }

    pub fn company(&self) -> &str {
        &self.posting.company
    }

    pub fn match_score(&self) -> u8 {
        self.match_score
    }

    pub fn score_factors(&self) -> &[ScoreFactor] {
        &self.score_factors
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn url_verified(&self) -> bool {
        self.url_verified
    }

    pub fn url_note(&self) -> Option<&str> {
        self.url_note.as_deref()
    }

    pub fn url_classification(&self) -> UrlClass {
        self.url_classification
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score() -> MatchScore {
        MatchScore {
            score: 60,
            factors: vec![ScoreFactor::new("role:exact", 35), ScoreFactor::new("location:city", 25)],
        }
    }

    #[test]
    fn unavailable_uses_placeholder_url() {
        let posting = JobPosting::new("Trainer", "Acme", "indeed", "https://nl.indeed.com/vacatures");
        let enriched = EnrichedJobPosting::unavailable(posting, score(), "not found".into(), UrlClass::Invalid);
        assert_eq!(enriched.url(), URL_NOT_AVAILABLE);
        assert!(!enriched.url_verified());
        assert_eq!(enriched.url_note(), Some("not found"));
    }

    #[test]
    fn unverified_keeps_original_url_unless_blank() {
        let posting = JobPosting::new("Trainer", "Acme", "somewhere", "https://acme.example/jobs/1");
        let kept = EnrichedJobPosting::unverified(posting.clone(), score(), "n".into(), UrlClass::Unknown);
        assert_eq!(kept.url(), "https://acme.example/jobs/1");

        let blank = JobPosting { raw_url: "  ".into(), ..posting };
        let replaced = EnrichedJobPosting::unverified(blank, score(), "n".into(), UrlClass::Invalid);
        assert_eq!(replaced.url(), URL_NOT_AVAILABLE);
    }

    #[test]
    fn serialized_form_flattens_posting_fields() {
        let posting = JobPosting::new("Trainer", "Acme", "linkedin", "https://www.linkedin.com/jobs/view/4012345678")
            .with_posted_date(NaiveDate::from_ymd_opt(2026, 10, 1).unwrap());
        let enriched = EnrichedJobPosting::verified(
            posting.clone(),
            score(),
            posting.raw_url.clone(),
            UrlClass::Direct,
        );
        let value = serde_json::to_value(&enriched).unwrap();
        assert_eq!(value["title"], "Trainer");
        assert_eq!(value["posted_date"], "2026-10-01");
        assert_eq!(value["match_score"], 60);
        assert_eq!(value["url_classification"], "direct");
        assert_eq!(value["score_factors"][0]["factor"], "role:exact");

        let back: EnrichedJobPosting = serde_json::from_value(value).unwrap();
        assert_eq!(back, enriched);
    }
}

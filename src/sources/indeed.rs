//! Indeed

use regex::Regex;
use url::Url;

use super::{
    encode_query, origin_of, parse_url, path_and_query, source_pattern, JobSource,
    ResolutionStrategy, SearchHit, SearchQuery,
};
use crate::error::ConfigError;

const NAME: &str = "Indeed";
const DEFAULT_ORIGIN: &str = "https://nl.indeed.com";

/// 搜索结果页提取脚本
///
/// 职位卡片上的 `data-jk` 就是职位ID。
const RESULTS_SCRIPT: &str = r#"
(() => {
    const text = (root, selector) => {
        const el = root.querySelector(selector);
        return el ? el.innerText.trim() : '';
    };
    const noResults = !!document.querySelector(
        '.jobsearch-NoResult-messageContainer, .no_results, [data-testid="no-results-message"]'
    );
    const cards = Array.from(document.querySelectorAll('.job_seen_beacon, .result[data-jk]'));
    const hits = cards.slice(0, 25).map(card => {
        const anchor = card.querySelector('[data-jk]');
        return {
            id: (anchor && anchor.getAttribute('data-jk')) || card.getAttribute('data-jk'),
            title: text(card, 'h2.jobTitle, .jobTitle'),
            company: text(card, '[data-testid="company-name"], .companyName'),
        };
    }).filter(hit => hit.id);
    return { noResults, hits };
})()
"#;

/// Indeed 来源
///
/// - `/vacatures`、`/jobs` 是搜索结果页
/// - `viewjob?jk=` 和 `rc/clk?jk=` 是单个职位
pub struct Indeed {
    search_page: Regex,
    single_posting: Regex,
    job_id: Regex,
}

impl Indeed {
    pub fn new() -> Result<Self, ConfigError> {
        Ok(Self {
            search_page: source_pattern(
                NAME,
                r"(?i)^/(?:m/)?(?:vacatures|jobs|q-[^/?]*-jobs\.html)(?:[/?]|$)",
            )?,
            single_posting: source_pattern(
                NAME,
                r"(?i)^/(?:m/)?(?:viewjob|rc/clk|pagead/clk)\?(?:.*&)?jk=[0-9a-z]+",
            )?,
            job_id: source_pattern(NAME, r"^[0-9a-zA-Z]{6,32}$")?,
        })
    }

    /// 使用原始链接的站点（例如 `be.indeed.com`），否则使用荷兰站
    fn origin_for(&self, raw_url: &str) -> String {
        parse_url(raw_url)
            .filter(|url| self.owns_host(url))
            .and_then(|url| origin_of(&url))
            .unwrap_or_else(|| DEFAULT_ORIGIN.to_string())
    }
}

impl JobSource for Indeed {
    fn name(&self) -> &'static str {
        NAME
    }

    fn key(&self) -> &'static str {
        "indeed"
    }

    fn is_search_page(&self, url: &Url) -> bool {
        self.search_page.is_match(&path_and_query(url))
    }

    fn is_single_posting(&self, url: &Url) -> bool {
        self.single_posting.is_match(&path_and_query(url))
    }

    fn resolver(&self) -> Option<&dyn ResolutionStrategy> {
        Some(self)
    }
}

impl ResolutionStrategy for Indeed {
    fn search_url(&self, query: &SearchQuery) -> String {
        let terms = format!("\"{}\" \"{}\"", query.title.trim(), query.company.trim());
        let mut url = format!(
            "{}/jobs?q={}",
            self.origin_for(&query.raw_url),
            encode_query(&terms)
        );
        if let Some(location) = query.location.as_deref().filter(|l| !l.trim().is_empty()) {
            url.push_str("&l=");
            url.push_str(&encode_query(location));
        }
        url
    }

    fn results_script(&self) -> &'static str {
        RESULTS_SCRIPT
    }

    fn listing_url(&self, hit: &SearchHit, query: &SearchQuery) -> Option<String> {
        let id = hit.id.as_deref()?.trim();
        if !self.job_id.is_match(id) {
            return None;
        }
        Some(format!("{}/viewjob?jk={}", self.origin_for(&query.raw_url), id))
    }
}

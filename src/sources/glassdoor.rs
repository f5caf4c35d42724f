//! Glassdoor

use regex::Regex;
use url::Url;

use super::{
    encode_query, path_and_query, source_pattern, JobSource, ResolutionStrategy, SearchHit,
    SearchQuery,
};
use crate::error::ConfigError;

const NAME: &str = "Glassdoor";
const ORIGIN: &str = "https://www.glassdoor.com";

const RESULTS_SCRIPT: &str = r#"
(() => {
    const text = (root, selector) => {
        const el = root.querySelector(selector);
        return el ? el.innerText.trim() : '';
    };
    const noResults = !!document.querySelector('[data-test="no-results"], .noResults, [class*="NoResults"]');
    const listings = Array.from(document.querySelectorAll('[data-test="jobListing"]'));
    const hits = listings.slice(0, 25).map(listing => {
        const link = listing.querySelector('a[data-test="job-link"], a[data-test="job-title"]');
        return {
            href: link ? link.getAttribute('href') : null,
            title: text(listing, '[data-test="job-title"], a[data-test="job-link"]'),
            company: text(listing, '[data-test="employer-name"], [class*="EmployerProfile_compactEmployerName"]'),
        };
    }).filter(hit => hit.href);
    return { noResults, hits };
})()
"#;

/// Glassdoor 来源
///
/// 搜索页带有 `SRCH_` 或 `/jobs-srch`，单个职位在 `/job-listing/` 下。
pub struct Glassdoor {
    search_page: Regex,
    single_posting: Regex,
}

impl Glassdoor {
    pub fn new() -> Result<Self, ConfigError> {
        Ok(Self {
            search_page: source_pattern(
                NAME,
                r"(?i)^/(?:.*srch_|jobs-srch|job/jobs\.htm|job/[^/?]*-jobs-)",
            )?,
            single_posting: source_pattern(
                NAME,
                r"(?i)^/(?:job-listing/[^/?]+|partner/joblisting\.htm\?(?:.*&)?jl=\d+)",
            )?,
        })
    }
}

impl JobSource for Glassdoor {
    fn name(&self) -> &'static str {
        NAME
    }

    fn key(&self) -> &'static str {
        "glassdoor"
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

impl ResolutionStrategy for Glassdoor {
    fn search_url(&self, query: &SearchQuery) -> String {
        let keywords = format!("{} {}", query.title.trim(), query.company.trim());
        let mut url = format!("{}/Job/jobs.htm?sc.keyword={}", ORIGIN, encode_query(&keywords));
        if let Some(location) = query.location.as_deref().filter(|l| !l.trim().is_empty()) {
            url.push_str("&locKeyword=");
            url.push_str(&encode_query(location));
        }
        url
    }

    fn results_script(&self) -> &'static str {
        RESULTS_SCRIPT
    }

    fn listing_url(&self, hit: &SearchHit, _query: &SearchQuery) -> Option<String> {
        let href = hit.href.as_deref()?.trim();
        if href.starts_with('/') {
            Some(format!("{}{}", ORIGIN, href))
        } else if href.starts_with("https://") || href.starts_with("http://") {
            Some(href.to_string())
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::parse_url;

    fn url(raw: &str) -> Url {
        parse_url(raw).unwrap()
    }

    #[test]
    fn recognises_search_and_posting_pages() {
        let glassdoor = Glassdoor::new().unwrap();

        assert!(glassdoor.is_search_page(
            &url("https://www.glassdoor.com/Job/netherlands-learning-designer-jobs-SRCH_IL.0,11_IN178_KO12,29.htm")
        ));
        assert!(glassdoor.is_search_page(&url("https://www.glassdoor.nl/Job/jobs.htm?sc.keyword=trainer")));
        assert!(glassdoor.is_search_page(&url("https://www.glassdoor.com/jobs-srch?q=x")));

        assert!(glassdoor.is_single_posting(
            &url("https://www.glassdoor.com/job-listing/learning-designer-acme-JV_IC3064478_KO0,17_KE18,22.htm?jl=1009512345678")
        ));
        assert!(glassdoor.is_single_posting(&url("https://www.glassdoor.nl/partner/jobListing.htm?pos=101&jl=1009512345678")));
        assert!(!glassdoor.is_single_posting(&url("https://www.glassdoor.com/Overview/Working-at-Acme.htm")));
    }

    #[test]
    fn listing_url_accepts_relative_and_absolute_links() {
        let glassdoor = Glassdoor::new().unwrap();
        let query = SearchQuery {
            title: "Trainer".into(),
            company: "Acme".into(),
            location: None,
            raw_url: String::new(),
        };
        let relative = SearchHit {
            href: Some("/job-listing/trainer-acme-JV_KO0,7.htm?jl=1009".into()),
            ..SearchHit::default()
        };
        assert_eq!(
            glassdoor.listing_url(&relative, &query).as_deref(),
            Some("https://www.glassdoor.com/job-listing/trainer-acme-JV_KO0,7.htm?jl=1009")
        );

        let junk = SearchHit {
            href: Some("javascript:void(0)".into()),
            ..SearchHit::default()
        };
        assert_eq!(glassdoor.listing_url(&junk, &query), None);
        assert_eq!(
            glassdoor.search_url(&query),
            "https://www.glassdoor.com/Job/jobs.htm?sc.keyword=Trainer+Acme"
        );
    }
}

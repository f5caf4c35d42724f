//! LinkedIn
//!
//! 只做链接分类。站内搜索需要登录，没有解析策略。

use regex::Regex;
use url::Url;

use super::{path_and_query, source_pattern, JobSource};
use crate::error::ConfigError;

const NAME: &str = "LinkedIn";

pub struct LinkedIn {
    search_page: Regex,
    single_posting: Regex,
}

impl LinkedIn {
    pub fn new() -> Result<Self, ConfigError> {
        Ok(Self {
            search_page: source_pattern(
                NAME,
                r"(?i)^/(?:jobs/search|jobs/collections|search/results/jobs|jobs/?(?:\?|$))",
            )?,
            single_posting: source_pattern(
                NAME,
                r"(?i)^/(?:comm/)?jobs/view/(?:[^/?]*-)?\d{6,}",
            )?,
        })
    }
}

impl JobSource for LinkedIn {
    fn name(&self) -> &'static str {
        NAME
    }

    fn key(&self) -> &'static str {
        "linkedin"
    }

    fn is_search_page(&self, url: &Url) -> bool {
        self.search_page.is_match(&path_and_query(url))
    }

    fn is_single_posting(&self, url: &Url) -> bool {
        self.single_posting.is_match(&path_and_query(url))
    }
}

//! 文本规范化与模糊匹配
//!
//! 评分引擎和链接解析都依赖这里的分词规则，保证两边对"同一个职位名"的理解一致。

use phf::phf_set;

/// 分词时忽略的虚词
static STOP_WORDS: phf::Set<&'static str> = phf_set! {
    "a", "an", "and", "the", "of", "for", "in", "at", "to", "on", "with", "m", "f", "d", "x",
};

/// 公司名中常见的法律后缀，比较公司名时忽略
static COMPANY_SUFFIXES: phf::Set<&'static str> = phf_set! {
    "bv", "nv", "inc", "ltd", "llc", "gmbh", "group", "company", "co",
};

/// 小写、去首尾空白
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// 按非字母数字字符拆分的小写词（保留 `&`，例如 "l&d"）
pub fn words(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '&'))
        .filter(|w| !w.is_empty() && *w != "&")
        .map(String::from)
        .collect()
}

/// 有意义的词：去掉虚词和单字符词
pub fn significant_words(text: &str) -> Vec<String> {
    words(text)
        .into_iter()
        .filter(|w| w.chars().count() > 1 && !STOP_WORDS.contains(w.as_str()))
        .collect()
}

/// 两段文本共有的有意义的词
pub fn shared_words(left: &str, right: &str) -> Vec<String> {
    let right_words = significant_words(right);
    let mut shared: Vec<String> = significant_words(left)
        .into_iter()
        .filter(|w| right_words.contains(w))
        .collect();
    shared.dedup();
    shared
}

/// `needle` 作为连续的词序列出现在 `haystack` 中
fn contains_run(haystack: &[String], needle: &[String]) -> bool {
    !needle.is_empty()
        && needle.len() <= haystack.len()
        && haystack.windows(needle.len()).any(|window| window == needle)
}

/// 职位名模糊匹配：候选包含完整的查询词序列，或至少一半的查询词出现在候选中
///
/// 只按整词比较，"Design" 不会匹配 "Designer"。
pub fn titles_match(query: &str, candidate: &str) -> bool {
    let query_words = significant_words(query);
    let candidate_words = significant_words(candidate);
    if query_words.is_empty() || candidate_words.is_empty() {
        return false;
    }
    if contains_run(&candidate_words, &query_words) {
        return true;
    }

    let overlap = shared_words(query, candidate).len();
    overlap * 2 >= query_words.len()
}

/// 公司名中有意义的词：去掉法律后缀和单字符词
fn company_words(text: &str) -> Vec<String> {
    words(text)
        .into_iter()
        .filter(|w| w.chars().count() > 1 && !COMPANY_SUFFIXES.contains(w.as_str()))
        .collect()
}

/// 公司名模糊匹配，忽略法律后缀；查询为空时视为匹配
///
/// 一方的词序列必须完整出现在另一方中，"ING" 不会匹配 "Booking.com"。
pub fn companies_match(query: &str, candidate: &str) -> bool {
    let query = company_words(query);
    if query.is_empty() {
        return true;
    }
    let candidate = company_words(candidate);
    contains_run(&candidate, &query) || contains_run(&query, &candidate)
}

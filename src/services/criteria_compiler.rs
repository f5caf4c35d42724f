//! 匹配条件编译 - 业务能力层
//!
//! 把 `UserProfile` 规范化为 `MatchCriteria`。纯函数，不做任何 I/O。
//! 所有字符串集合都转小写并去掉首尾空白，空项丢弃，重复项合并。

use std::collections::BTreeSet;

use chrono::NaiveDate;
use phf::phf_map;
use regex::Regex;
use tracing::debug;

use crate::error::CriteriaError;
use crate::models::criteria::{ExperienceCriteria, LanguageCriterion, MatchCriteria};
use crate::models::profile::{LanguageRequirement, UserProfile};
use crate::utils::text::normalize;

/// 语言在职位描述中常见的本地写法
static LANGUAGE_ALIASES: phf::Map<&'static str, &'static [&'static str]> = phf_map! {
    "dutch" => &["nederlands", "nederlandse"],
    "english" => &["engels", "englisch"],
    "german" => &["deutsch", "duits"],
    "french" => &["français", "francais", "frans"],
    "spanish" => &["español", "espanol", "spaans"],
    "turkish" => &["türkçe", "turks"],
};

/// 以今天为基准编译
pub fn compile_criteria(profile: &UserProfile) -> Result<MatchCriteria, CriteriaError> {
    compile_criteria_at(profile, chrono::Local::now().date_naive())
}

/// 以指定日期为"今天"编译，保证评分可复现
pub fn compile_criteria_at(
    profile: &UserProfile,
    reference_date: NaiveDate,
) -> Result<MatchCriteria, CriteriaError> {
    let search = &profile.search_criteria;

    let role_tokens = normalized_set(&search.role_variations);
    if role_tokens.is_empty() {
        return Err(CriteriaError::NoRoleVariations);
    }

    let experience = &search.experience;
    if experience.min_years > experience.max_years {
        return Err(CriteriaError::ExperienceRangeInverted {
            min_years: experience.min_years,
            max_years: experience.max_years,
        });
    }

    if search.posting_recency_days == 0 {
        return Err(CriteriaError::InvalidRecencyWindow);
    }

    let mut seen = BTreeSet::new();
    let mut languages = Vec::new();
    for requirement in &search.languages {
        let name = normalize(&requirement.language);
        if name.is_empty() || !seen.insert(name.clone()) {
            continue;
        }
        languages.push(compile_language(name, requirement)?);
    }

    let criteria = MatchCriteria {
        role_tokens,
        allowed_countries: normalized_set(std::slice::from_ref(&search.location_prefs.country)),
        allowed_cities: normalized_set(&search.location_prefs.cities),
        allow_remote: search.location_prefs.allow_remote,
        experience: ExperienceCriteria {
            min_years: experience.min_years,
            max_years: experience.max_years,
            exclude_senior_titles: experience.exclude_senior_roles,
        },
        languages,
        max_posting_age_days: search.posting_recency_days,
        reference_date,
    };

    debug!(
        "匹配条件已编译: {} 个职位变体, {} 个城市, {} 个语言条件",
        criteria.role_tokens.len(),
        criteria.allowed_cities.len(),
        criteria.languages.len()
    );

    Ok(criteria)
}

fn normalized_set(values: &[String]) -> BTreeSet<String> {
    values
        .iter()
        .map(|v| normalize(v))
        .filter(|v| !v.is_empty())
        .collect()
}

fn compile_language(
    name: String,
    requirement: &LanguageRequirement,
) -> Result<LanguageCriterion, CriteriaError> {
    let mut spellings = vec![regex::escape(&name)];
    if let Some(aliases) = LANGUAGE_ALIASES.get(name.as_str()) {
        spellings.extend(aliases.iter().map(|a| regex::escape(a)));
    }
    let alternation = spellings.join("|");

    let build = |pattern: String| {
        Regex::new(&pattern).map_err(|source| CriteriaError::LanguagePattern {
            language: name.clone(),
            source,
        })
    };

    let mention_pattern = build(format!(r"(?i)\b(?:{alternation})\b"))?;
    let requirement_pattern = build(format!(
        r"(?i)\b(?:fluent|fluency|proficient|proficiency|native|speak|speaks|speaking|command of)\b[^.,;\n]{{0,20}}?\b(?:{alternation})\b|\b(?:{alternation})\b[^.,;\n]{{0,25}}?\b(?:required|mandatory|a must|essential|vereist|verplicht|fluency|proficiency)\b"
    ))?;

    Ok(LanguageCriterion {
        name,
        required: requirement.required,
        exclude_if_required: requirement.exclude_if_required,
        requirement_pattern,
        mention_pattern,
    })
}

//! 用户档案
//!
//! 由档案加载器（`models::loaders`）从 JSON 读入，进入核心之前已经完成结构校验。

use serde::{Deserialize, Serialize};

/// 地点偏好
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LocationPreferences {
    /// 目标国家
    pub country: String,
    /// 偏好城市
    #[serde(default)]
    pub cities: Vec<String>,
    /// 是否接受远程职位
    #[serde(default = "default_true")]
    pub allow_remote: bool,
}

/// 经验要求
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExperienceRange {
    #[serde(default)]
    pub min_years: u32,
    #[serde(default = "default_max_years")]
    pub max_years: u32,
    /// 排除 senior / lead / principal 职位
    #[serde(default = "default_true")]
    pub exclude_senior_roles: bool,
}

impl Default for ExperienceRange {
    fn default() -> Self {
        Self {
            min_years: 0,
            max_years: default_max_years(),
            exclude_senior_roles: true,
        }
    }
}

/// 语言要求
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LanguageRequirement {
    /// 语言名称，例如 "English"
    pub language: String,
    /// 用户是否掌握（职位缺少该语言时扣分）
    #[serde(default = "default_true")]
    pub required: bool,
    /// 职位要求该语言时直接判零
    #[serde(default)]
    pub exclude_if_required: bool,
}

/// 搜索条件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchCriteria {
    pub role_variations: Vec<String>,
    pub location_prefs: LocationPreferences,
    #[serde(default)]
    pub experience: ExperienceRange,
    #[serde(default)]
    pub languages: Vec<LanguageRequirement>,
    #[serde(default = "default_recency_days")]
    pub posting_recency_days: u32,
    #[serde(default = "default_min_target_jobs")]
    pub min_target_jobs: u32,
    #[serde(default = "default_max_target_jobs")]
    pub max_target_jobs: u32,
    #[serde(default = "default_job_sources")]
    pub job_sources: Vec<String>,
}

/// 完整的用户档案
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserProfile {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    pub search_criteria: SearchCriteria,
    #[serde(default)]
    pub profile_id: Option<String>,
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_true() -> bool {
    true
}

fn default_max_years() -> u32 {
    5
}

fn default_recency_days() -> u32 {
    30
}

fn default_min_target_jobs() -> u32 {
    8
}

fn default_max_target_jobs() -> u32 {
    12
}

fn default_job_sources() -> Vec<String> {
    vec!["LinkedIn".to_string(), "Indeed".to_string(), "Glassdoor".to_string()]
}

fn default_timezone() -> String {
    "Europe/Amsterdam".to_string()
}

use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;
use crate::services::RetryPolicy;

/// 程序配置
///
/// 所有字段都可以通过同名的大写环境变量覆盖。
#[derive(Clone, Debug)]
pub struct Config {
    /// 是否尝试通过浏览器解析职位链接
    pub enable_url_scraping: bool,
    /// 首次尝试之后的额外重试次数
    pub max_scraping_retries: u32,
    /// 单个导航/提取步骤的超时（毫秒）
    pub scraping_timeout_ms: u64,
    /// 同一职位两次重试之间的等待（毫秒）
    pub scraping_retry_backoff_ms: u64,
    /// 两个职位之间的礼貌延迟（毫秒）
    pub scraping_delay_ms: u64,
    /// 同时进行的链接解析任务数量
    pub max_concurrent_resolutions: usize,
    /// 浏览器调试端口，设置后连接已有浏览器而不是启动新的
    pub browser_debug_port: Option<u16>,
    /// 无头模式使用的浏览器可执行文件
    pub chrome_executable: Option<String>,
    /// 用户档案目录
    pub profiles_dir: String,
    /// 当前使用的档案ID
    pub active_profile: String,
    /// 待处理的职位批次目录
    pub postings_folder: String,
    /// 输出目录
    pub output_folder: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enable_url_scraping: true,
            max_scraping_retries: 2,
            scraping_timeout_ms: 15_000,
            scraping_retry_backoff_ms: 0,
            scraping_delay_ms: 1_000,
            max_concurrent_resolutions: 1,
            browser_debug_port: None,
            chrome_executable: None,
            profiles_dir: "profiles".to_string(),
            active_profile: "default".to_string(),
            postings_folder: "storage/discovered".to_string(),
            output_folder: "storage/job_postings".to_string(),
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 从环境变量读取配置，未设置的项使用默认值
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// 从任意键值来源读取配置
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let default = Self::default();
        let string = |name: &str, fallback: String| lookup(name).unwrap_or(fallback);

        Ok(Self {
            enable_url_scraping: parse_bool(&lookup, "ENABLE_URL_SCRAPING", default.enable_url_scraping)?,
            max_scraping_retries: parse_var(&lookup, "MAX_SCRAPING_RETRIES", default.max_scraping_retries)?,
            scraping_timeout_ms: parse_var(&lookup, "SCRAPING_TIMEOUT_MS", default.scraping_timeout_ms)?,
            scraping_retry_backoff_ms: parse_var(&lookup, "SCRAPING_RETRY_BACKOFF_MS", default.scraping_retry_backoff_ms)?,
            scraping_delay_ms: parse_var(&lookup, "SCRAPING_DELAY_MS", default.scraping_delay_ms)?,
            max_concurrent_resolutions: parse_var(&lookup, "MAX_CONCURRENT_RESOLUTIONS", default.max_concurrent_resolutions)?.max(1),
            browser_debug_port: match lookup("BROWSER_DEBUG_PORT") {
                Some(raw) => Some(parse_value("BROWSER_DEBUG_PORT", &raw)?),
                None => None,
            },
            chrome_executable: lookup("CHROME_EXECUTABLE").filter(|v| !v.trim().is_empty()),
            profiles_dir: string("PROFILES_DIR", default.profiles_dir),
            active_profile: string("ACTIVE_PROFILE", default.active_profile),
            postings_folder: string("POSTINGS_FOLDER", default.postings_folder),
            output_folder: string("OUTPUT_FOLDER", default.output_folder),
            verbose_logging: parse_bool(&lookup, "VERBOSE_LOGGING", default.verbose_logging)?,
        })
    }

    /// 链接解析的重试策略
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.max_scraping_retries,
            Duration::from_millis(self.scraping_timeout_ms),
            Duration::from_millis(self.scraping_retry_backoff_ms),
        )
    }

    /// 两个职位之间的礼貌延迟
    pub fn inter_posting_delay(&self) -> Duration {
        Duration::from_millis(self.scraping_delay_ms)
    }
}

fn parse_var<T, F>(lookup: &F, name: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(raw) => parse_value(name, &raw),
        None => Ok(default),
    }
}

fn parse_value<T: FromStr>(name: &str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::EnvVarParseFailed {
        var_name: name.to_string(),
        value: raw.to_string(),
        expected_type: std::any::type_name::<T>().to_string(),
    })
}

fn parse_bool<F>(lookup: &F, name: &str, default: bool) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(name) else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::EnvVarParseFailed {
            var_name: name.to_string(),
            value: raw,
            expected_type: "bool".to_string(),
        }),
    }
}

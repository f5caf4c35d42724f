use thiserror::Error;

/// 应用程序错误类型
///
/// 只覆盖"结构性"错误。单个职位的链接解析失败不是错误，
/// 而是 [`crate::services::ResolutionOutcome::NotFound`]。
#[derive(Debug, Error)]
pub enum AppError {
    /// 浏览器相关错误
    #[error("浏览器错误: {0}")]
    Browser(#[from] BrowserError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 用户档案无法编译为匹配条件
    #[error("匹配条件错误: {0}")]
    Criteria(#[from] CriteriaError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 其他错误（用于包装第三方库错误）
    #[error("错误: {0}")]
    Other(String),
}

type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

/// 浏览器相关错误
#[derive(Debug, Error)]
pub enum BrowserError {
    /// 启动无头浏览器失败
    #[error("启动无头浏览器失败: {source}")]
    LaunchFailed {
        #[source]
        source: BoxedSource,
    },
    /// 连接浏览器失败
    #[error("无法连接到浏览器 (端口: {port}): {source}")]
    ConnectionFailed {
        port: u16,
        #[source]
        source: BoxedSource,
    },
    /// 创建页面失败
    #[error("创建页面失败: {source}")]
    PageCreationFailed {
        #[source]
        source: BoxedSource,
    },
    /// 导航失败
    #[error("导航到 {url} 失败: {source}")]
    NavigationFailed {
        url: String,
        #[source]
        source: BoxedSource,
    },
    /// 执行脚本失败
    #[error("执行脚本失败: {source}")]
    ScriptExecutionFailed {
        #[source]
        source: BoxedSource,
    },
    /// 关闭页面失败
    #[error("关闭页面失败: {source}")]
    CloseFailed {
        #[source]
        source: BoxedSource,
    },
    /// 浏览器配置失败
    #[error("浏览器配置失败: {message}")]
    ConfigurationFailed { message: String },
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 文件不存在
    #[error("文件不存在: {path}")]
    NotFound { path: String },
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: BoxedSource,
    },
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: BoxedSource,
    },
    /// JSON 解析失败
    #[error("JSON解析失败 ({path}): {source}")]
    JsonParseFailed {
        path: String,
        #[source]
        source: BoxedSource,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: BoxedSource,
    },
    /// 目录中没有任何档案
    #[error("目录 {path} 中没有找到任何档案")]
    NoProfiles { path: String },
    /// 缺少档案ID
    #[error("保存档案时缺少 profile_id")]
    MissingProfileId,
}

/// 匹配条件编译错误
#[derive(Debug, Error)]
pub enum CriteriaError {
    /// 没有任何有效的职位名称变体
    #[error("role_variations 中没有任何有效的职位名称")]
    NoRoleVariations,
    /// 经验范围颠倒
    #[error("经验范围无效: min_years ({min_years}) 大于 max_years ({max_years})")]
    ExperienceRangeInverted { min_years: u32, max_years: u32 },
    /// 发布时间窗口无效
    #[error("posting_recency_days 必须大于 0")]
    InvalidRecencyWindow,
    /// 语言匹配模式构建失败
    #[error("无法为语言 '{language}' 构建匹配模式: {source}")]
    LanguagePattern {
        language: String,
        #[source]
        source: regex::Error,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 内置匹配规则无法编译
    #[error("来源 {source_name} 的链接规则无效: {source}")]
    InvalidSourcePattern {
        source_name: String,
        #[source]
        source: regex::Error,
    },
}

// ========== 从常见错误类型转换 ==========

impl From<chromiumoxide::error::CdpError> for BrowserError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        BrowserError::ScriptExecutionFailed {
            source: Box::new(err),
        }
    }
}

impl From<chromiumoxide::error::CdpError> for AppError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        AppError::Browser(err.into())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::File(FileError::ReadFailed {
            path: String::new(),
            source: Box::new(err),
        })
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建文件读取错误
    pub fn file_read_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::File(FileError::ReadFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }

    /// 创建文件写入错误
    pub fn file_write_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }

    /// 创建 JSON 解析错误
    pub fn json_parse_failed(path: impl Into<String>, source: serde_json::Error) -> Self {
        AppError::File(FileError::JsonParseFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }

    /// 创建 TOML 解析错误
    pub fn toml_parse_failed(path: impl Into<String>, source: toml::de::Error) -> Self {
        AppError::File(FileError::TomlParseFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

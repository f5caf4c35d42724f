//! # Job Enrichment
//!
//! 为外部发现的职位补全可用链接，并按用户档案评分
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（Browser / Page），只暴露能力
//! - `ChromeSession` - 浏览器会话，每个解析任务一个独立页面
//! - `JsExecutor` - 唯一的 page owner，提供 navigate() / eval() 能力
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单个职位
//! - `criteria_compiler` - 把用户档案编译为匹配条件
//! - `match_scoring` - 0-100 评分，附带每一项的贡献
//! - `url_validator` - 链接分类（Direct / Invalid / Unknown）
//! - `TargetedResolver` - 站内搜索并构造直接链接（含重试与超时）
//! - `sources/` - 各招聘来源的链接规则和解析策略
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个职位"的链接解析流程
//! - `ScrapeTask` - 上下文封装（职位身份 + 查询条件）
//! - `ResolutionFlow` - 流程编排（解析 → 记录 → 日志）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/enrichment_coordinator` - 单个批次的分流、并发与合并
//! - `orchestrator/batch_processor` - 批量处理器，管理资源和输出
//!
//! ## 模块结构

pub mod browser;
pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod sources;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use browser::{BrowserContext, BrowserSession};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::{ChromeSession, JsExecutor};
pub use models::{EnrichedJobPosting, JobPosting, MatchCriteria, UrlClass, UserProfile};
pub use orchestrator::{enrich_and_score, App, EnrichmentCoordinator};
pub use services::{ResolutionOutcome, RetryPolicy, TargetedResolver, UrlValidator};
pub use workflow::{PostingKey, ResolutionFlow, ScrapeTask};

//! 集成测试共用的假浏览器和测试数据
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value as JsonValue};

use job_enrichment::error::BrowserError;
use job_enrichment::models::{
    ExperienceRange, LanguageRequirement, LocationPreferences, SearchCriteria,
};
use job_enrichment::{BrowserContext, BrowserSession, Config, UserProfile};

/// 一次导航的脚本化行为
#[derive(Debug, Clone)]
pub enum Behavior {
    /// 导航成功，提取返回给定 JSON
    Respond(JsonValue),
    /// 导航等待一段时间后成功
    SlowRespond(Duration, JsonValue),
    /// 导航失败
    NavigationFails,
    /// 导航永远不返回
    HangOnNavigate,
    /// 提取永远不返回
    HangOnExtract,
    /// 提取报错
    ExtractFails,
}

#[derive(Default)]
pub struct Stats {
    opened: AtomicUsize,
    closed: AtomicUsize,
    active: AtomicUsize,
    max_active: AtomicUsize,
    navigations: Mutex<Vec<String>>,
}

impl Stats {
    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn max_active(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }

    pub fn navigations(&self) -> Vec<String> {
        self.navigations.lock().unwrap().clone()
    }
}

type Routes = Arc<Mutex<Vec<(String, VecDeque<Behavior>)>>>;

/// 按搜索地址中的关键字返回预设行为的假浏览器
///
/// 同一个关键字的行为按顺序消费，最后一个会一直重复。
/// 没有匹配的关键字时返回"没有结果"。
#[derive(Default)]
pub struct FakeBrowser {
    routes: Routes,
    stats: Arc<Stats>,
    hang_on_close: bool,
}

impl FakeBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(self, needle: &str, behaviors: Vec<Behavior>) -> Self {
        self.routes
            .lock()
            .unwrap()
            .push((needle.to_string(), behaviors.into()));
        self
    }

    /// 页面关闭永远不返回
    pub fn hang_on_close(mut self) -> Self {
        self.hang_on_close = true;
        self
    }

    pub fn into_session(self) -> (Arc<dyn BrowserSession>, Arc<Stats>) {
        let stats = self.stats.clone();
        (Arc::new(self), stats)
    }
}

fn next_behavior(routes: &Routes, url: &str) -> Behavior {
    let mut routes = routes.lock().unwrap();
    for (needle, queue) in routes.iter_mut() {
        if url.contains(needle.as_str()) {
            if queue.len() > 1 {
                if let Some(behavior) = queue.pop_front() {
                    return behavior;
                }
            }
            return queue
                .front()
                .cloned()
                .unwrap_or_else(|| Behavior::Respond(no_results()));
        }
    }
    Behavior::Respond(no_results())
}

#[async_trait]
impl BrowserSession for FakeBrowser {
    async fn open_context(&self) -> Result<Box<dyn BrowserContext>, BrowserError> {
        self.stats.opened.fetch_add(1, Ordering::SeqCst);
        let active = self.stats.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.stats.max_active.fetch_max(active, Ordering::SeqCst);

        Ok(Box::new(FakeContext {
            routes: self.routes.clone(),
            stats: self.stats.clone(),
            current: None,
            closed: false,
            hang_on_close: self.hang_on_close,
        }))
    }
}

struct FakeContext {
    routes: Routes,
    stats: Arc<Stats>,
    current: Option<Behavior>,
    closed: bool,
    hang_on_close: bool,
}

#[async_trait]
impl BrowserContext for FakeContext {
    async fn navigate(&mut self, url: &str) -> Result<(), BrowserError> {
        self.stats.navigations.lock().unwrap().push(url.to_string());
        let behavior = next_behavior(&self.routes, url);
        self.current = Some(behavior.clone());

        match behavior {
            Behavior::NavigationFails => Err(BrowserError::NavigationFailed {
                url: url.to_string(),
                source: "net::ERR_CONNECTION_RESET".into(),
            }),
            Behavior::HangOnNavigate => std::future::pending().await,
            Behavior::SlowRespond(delay, _) => {
                tokio::time::sleep(delay).await;
                Ok(())
            }
            _ => Ok(()),
        }
    }

    async fn extract(&mut self, _script: &str) -> Result<JsonValue, BrowserError> {
        match self.current.clone() {
            Some(Behavior::Respond(value)) | Some(Behavior::SlowRespond(_, value)) => Ok(value),
            Some(Behavior::HangOnExtract) => std::future::pending().await,
            _ => Err(BrowserError::ScriptExecutionFailed {
                source: "Execution context was destroyed".into(),
            }),
        }
    }

    async fn close(&mut self) -> Result<(), BrowserError> {
        if self.hang_on_close {
            return std::future::pending().await;
        }
        if !self.closed {
            self.closed = true;
            self.stats.closed.fetch_add(1, Ordering::SeqCst);
            self.stats.active.fetch_sub(1, Ordering::SeqCst);
        }
        Ok(())
    }
}

// ========== 测试数据 ==========

pub fn no_results() -> JsonValue {
    json!({ "noResults": true, "hits": [] })
}

pub fn empty_page() -> JsonValue {
    json!({ "noResults": false, "hits": [] })
}

pub fn indeed_page(hits: &[(&str, &str, &str)]) -> JsonValue {
    let hits: Vec<JsonValue> = hits
        .iter()
        .map(|(id, title, company)| json!({ "id": id, "title": title, "company": company }))
        .collect();
    json!({ "noResults": false, "hits": hits })
}

pub fn glassdoor_page(hits: &[(&str, &str, &str)]) -> JsonValue {
    let hits: Vec<JsonValue> = hits
        .iter()
        .map(|(href, title, company)| json!({ "href": href, "title": title, "company": company }))
        .collect();
    json!({ "noResults": false, "hits": hits })
}

pub fn profile() -> UserProfile {
    UserProfile {
        name: "Seray".into(),
        email: Some("seray@example.com".into()),
        search_criteria: SearchCriteria {
            role_variations: vec!["Learning Designer".into(), "Trainer".into()],
            location_prefs: LocationPreferences {
                country: "Netherlands".into(),
                cities: vec!["Amsterdam".into(), "Utrecht".into()],
                allow_remote: true,
            },
            experience: ExperienceRange::default(),
            languages: vec![LanguageRequirement {
                language: "English".into(),
                required: true,
                exclude_if_required: false,
            }],
            posting_recency_days: 30,
            min_target_jobs: 8,
            max_target_jobs: 12,
            job_sources: vec!["indeed".into(), "glassdoor".into()],
        },
        profile_id: Some("seray".into()),
        timezone: "Europe/Amsterdam".into(),
    }
}

/// 测试用配置：不做礼貌延迟
pub fn config() -> Config {
    Config {
        enable_url_scraping: true,
        scraping_delay_ms: 0,
        ..Config::default()
    }
}

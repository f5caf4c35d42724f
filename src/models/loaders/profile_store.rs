//! 用户档案存储
//!
//! 每个档案保存为 `<profiles_dir>/<profile_id>.json`。

use std::path::PathBuf;

use tracing::{info, warn};

use crate::error::{AppError, AppResult, FileError};
use crate::models::profile::UserProfile;

/// 默认档案ID
pub const DEFAULT_PROFILE_ID: &str = "default";

pub struct ProfileStore {
    profiles_dir: PathBuf,
}

impl ProfileStore {
    /// 打开档案目录，不存在时自动创建
    pub fn open(profiles_dir: impl Into<PathBuf>) -> AppResult<Self> {
        let profiles_dir = profiles_dir.into();
        std::fs::create_dir_all(&profiles_dir)
            .map_err(|e| AppError::file_write_failed(profiles_dir.display().to_string(), e))?;
        Ok(Self { profiles_dir })
    }

    fn path_for(&self, profile_id: &str) -> PathBuf {
        self.profiles_dir.join(format!("{}.json", profile_id))
    }

    /// 按ID加载档案，缺少 `profile_id` 时用文件名补全
    pub fn load(&self, profile_id: &str) -> AppResult<UserProfile> {
        let path = self.path_for(profile_id);
        let path_display = path.display().to_string();

        if !path.exists() {
            warn!(
                "档案 '{}' 不存在，可用档案: {:?}",
                profile_id,
                self.list().unwrap_or_default()
            );
            return Err(FileError::NotFound { path: path_display }.into());
        }

        let content =
            std::fs::read_to_string(&path).map_err(|e| AppError::file_read_failed(&path_display, e))?;
        let mut profile: UserProfile =
            serde_json::from_str(&content).map_err(|e| AppError::json_parse_failed(&path_display, e))?;

        if profile.profile_id.is_none() {
            profile.profile_id = Some(profile_id.to_string());
        }

        Ok(profile)
    }

    /// 保存档案，返回写入的路径
    pub fn save(&self, profile: &UserProfile) -> AppResult<PathBuf> {
        let profile_id = profile
            .profile_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .ok_or(FileError::MissingProfileId)?;

        let path = self.path_for(profile_id);
        let path_display = path.display().to_string();
        let json = serde_json::to_string_pretty(profile)
            .map_err(|e| AppError::json_parse_failed(&path_display, e))?;
        std::fs::write(&path, json).map_err(|e| AppError::file_write_failed(&path_display, e))?;

        info!("✅ 档案已保存至 {}", path_display);
        Ok(path)
    }

    /// 所有档案ID，按名称排序
    pub fn list(&self) -> AppResult<Vec<String>> {
        let path_display = self.profiles_dir.display().to_string();
        let entries = std::fs::read_dir(&self.profiles_dir)
            .map_err(|e| AppError::file_read_failed(&path_display, e))?;

        let mut ids: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().and_then(|s| s.to_str()) == Some("json"))
            .filter_map(|path| path.file_stem().map(|s| s.to_string_lossy().to_string()))
            .collect();
        ids.sort();
        Ok(ids)
    }

    pub fn exists(&self, profile_id: &str) -> bool {
        self.path_for(profile_id).exists()
    }

    /// 加载 `default` 档案，不存在时退回到第一个可用档案
    pub fn load_default(&self) -> AppResult<UserProfile> {
        if self.exists(DEFAULT_PROFILE_ID) {
            return self.load(DEFAULT_PROFILE_ID);
        }

        let available = self.list()?;
        let first = available.first().ok_or_else(|| FileError::NoProfiles {
            path: self.profiles_dir.display().to_string(),
        })?;

        warn!("⚠️ 没有找到 'default' 档案，使用 '{}'", first);
        self.load(first)
    }

    /// 加载指定档案；空ID或默认ID走 [`Self::load_default`]
    pub fn load_active(&self, profile_id: &str) -> AppResult<UserProfile> {
        let profile_id = profile_id.trim();
        if profile_id.is_empty() || profile_id == DEFAULT_PROFILE_ID {
            return self.load_default();
        }
        self.load(profile_id)
    }
}

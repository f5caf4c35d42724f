use std::path::{Path, PathBuf};

use serde::Deserialize;
use tokio::fs;

use crate::error::{AppError, AppResult, FileError};
use crate::models::posting::JobPosting;

/// 一个待处理的职位批次（对应一个文件）
#[derive(Debug, Clone)]
pub struct PostingBatch {
    /// 文件名（不含扩展名），也用作输出文件名
    pub name: String,
    pub file_path: PathBuf,
    pub postings: Vec<JobPosting>,
}

#[derive(Debug, Deserialize)]
struct PostingFile {
    #[serde(default)]
    postings: Vec<JobPosting>,
}

/// 从 TOML 或 JSON 文件加载一个职位批次
///
/// TOML 使用 `[[postings]]` 表数组，JSON 使用 `{ "postings": [...] }`。
pub async fn load_posting_batch(path: &Path) -> AppResult<PostingBatch> {
    let path_display = path.display().to_string();
    let content = fs::read_to_string(path)
        .await
        .map_err(|e| AppError::file_read_failed(&path_display, e))?;

    let file: PostingFile = match extension_of(path).as_deref() {
        Some("toml") => toml::from_str(&content).map_err(|e| AppError::toml_parse_failed(&path_display, e))?,
        Some("json") => serde_json::from_str(&content).map_err(|e| AppError::json_parse_failed(&path_display, e))?,
        _ => {
            return Err(AppError::Other(format!("不支持的职位文件格式: {}", path_display)));
        }
    };

    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "postings".to_string());

    Ok(PostingBatch {
        name,
        file_path: path.to_path_buf(),
        postings: file.postings,
    })
}

/// 加载文件夹中所有 TOML / JSON 职位批次，按文件名排序
///
/// 单个文件解析失败只记录警告，不影响其他批次。
pub async fn load_all_posting_batches(folder_path: &str) -> AppResult<Vec<PostingBatch>> {
    let folder = PathBuf::from(folder_path);

    if !folder.exists() {
        return Err(FileError::NotFound {
            path: folder_path.to_string(),
        }
        .into());
    }

    let mut paths = Vec::new();
    let mut entries = fs::read_dir(&folder)
        .await
        .map_err(|e| AppError::file_read_failed(folder_path, e))?;

    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| AppError::file_read_failed(folder_path, e))?
    {
        let path = entry.path();
        if matches!(extension_of(&path).as_deref(), Some("toml") | Some("json")) {
            paths.push(path);
        }
    }
    paths.sort();

    let mut batches = Vec::new();
    for path in paths {
        tracing::info!(
            "正在加载: {}",
            path.file_name().unwrap_or_default().to_string_lossy()
        );

        match load_posting_batch(&path).await {
            Ok(batch) => {
                tracing::info!("成功加载 {} 个职位", batch.postings.len());
                batches.push(batch);
            }
            Err(e) => {
                tracing::warn!("加载文件失败 {}: {}", path.display(), e);
            }
        }
    }

    Ok(batches)
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_ascii_lowercase())
}

//! 补全结果的平面文件输出

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::models::posting::EnrichedJobPosting;

/// 输出文件内容
#[derive(Debug, Serialize, Deserialize)]
pub struct EnrichedBatchFile {
    pub date: NaiveDate,
    pub profile_id: Option<String>,
    pub job_count: usize,
    pub postings: Vec<EnrichedJobPosting>,
}

/// 写入 `<output_dir>/<batch_name>.json`，返回文件路径
pub fn save_enriched_batch(
    output_dir: &Path,
    batch_name: &str,
    date: NaiveDate,
    profile_id: Option<&str>,
    postings: &[EnrichedJobPosting],
) -> AppResult<PathBuf> {
    std::fs::create_dir_all(output_dir)
        .map_err(|e| AppError::file_write_failed(output_dir.display().to_string(), e))?;

    let path = output_dir.join(format!("{}.json", batch_name));
    let path_display = path.display().to_string();

    let file = EnrichedBatchFile {
        date,
        profile_id: profile_id.map(String::from),
        job_count: postings.len(),
        postings: postings.to_vec(),
    };
    let json =
        serde_json::to_string_pretty(&file).map_err(|e| AppError::json_parse_failed(&path_display, e))?;
    std::fs::write(&path, json).map_err(|e| AppError::file_write_failed(&path_display, e))?;

    info!("✅ 已保存 {} 个职位至 {}", postings.len(), path_display);
    Ok(path)
}

/// 读取输出目录中最新（文件名最大）的一批结果，目录为空时返回空列表
pub fn latest_postings(output_dir: &Path) -> AppResult<Vec<EnrichedJobPosting>> {
    if !output_dir.exists() {
        return Ok(Vec::new());
    }

    let dir_display = output_dir.display().to_string();
    let entries = std::fs::read_dir(output_dir).map_err(|e| AppError::file_read_failed(&dir_display, e))?;
    let latest = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().and_then(|s| s.to_str()) == Some("json"))
        .max();

    let Some(path) = latest else {
        return Ok(Vec::new());
    };

    let path_display = path.display().to_string();
    let content =
        std::fs::read_to_string(&path).map_err(|e| AppError::file_read_failed(&path_display, e))?;
    let file: EnrichedBatchFile = serde_json::from_str(&content)
        .map_err(|e| AppError::json_parse_failed(&path_display, e))?;
    Ok(file.postings)
}

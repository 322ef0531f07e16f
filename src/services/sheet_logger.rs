//! 结果表格记录服务 - 业务能力层
//!
//! 只负责"往外部表格追加一条评估记录"能力，尽力而为：
//! 记录失败绝不影响整体评估结果。

use chrono::Local;
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;
use tracing::debug;

use crate::config::{Config, RUBRIC_SECTION_END, RUBRIC_SECTION_START};
use crate::error::{AppError, AppResult, LoggingError};

/// 响应中缺少边界标记时的占位值
pub const MISSING_SECTION_SENTINEL: &str = "N/A";

/// 追加到外部表格的一条评估记录
#[derive(Clone, Debug, Serialize)]
pub struct EvalRecord {
    pub timestamp: String,
    pub rubric_file: String,
    pub lesson_file: String,
    pub overview_file: String,
    pub rubric_section: String,
    pub parse_seconds: f64,
    pub llm_seconds: f64,
}

impl EvalRecord {
    /// 构建一条带当前时间戳的记录
    pub fn new(
        sources: [&str; 3],
        rubric_section: String,
        parse_seconds: f64,
        llm_seconds: f64,
    ) -> Self {
        Self {
            timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            rubric_file: sources[0].to_string(),
            lesson_file: sources[1].to_string(),
            overview_file: sources[2].to_string(),
            rubric_section,
            parse_seconds,
            llm_seconds,
        }
    }
}

/// 从原始响应中抽取评分章节
///
/// 取 `RUBRIC_SECTION_START` 与 `RUBRIC_SECTION_END` 之间的内容，
/// 边界匹配不区分大小写，结果去除首尾空白。
/// 任一标记缺失时返回 "N/A"（设计如此：响应不保证包含标记）。
pub fn extract_rubric_section(response: &str) -> String {
    static SECTION_RE: OnceLock<Option<Regex>> = OnceLock::new();
    let re = SECTION_RE.get_or_init(|| {
        Regex::new(&format!(
            "(?is){}(.*?){}",
            regex::escape(RUBRIC_SECTION_START),
            regex::escape(RUBRIC_SECTION_END)
        ))
        .ok()
    });

    re.as_ref()
        .and_then(|re| re.captures(response))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_else(|| MISSING_SECTION_SENTINEL.to_string())
}

/// 表格记录服务
///
/// 职责：
/// - 把 EvalRecord 以 JSON POST 到配置的 webhook
/// - 未配置 webhook 时静默跳过
/// - 不关心流程顺序，失败由调用方降级处理
pub struct SheetLogger {
    webhook_url: Option<String>,
    bearer_token: Option<String>,
    client: reqwest::Client,
}

impl SheetLogger {
    /// 创建新的表格记录服务
    ///
    /// 凭证文件已在启动时由 base64 环境变量解码落盘，
    /// 这里读出内容作为请求的 bearer 凭证。
    pub fn new(config: &Config) -> Self {
        let bearer_token = std::fs::read_to_string(&config.sheet_credentials_path)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Self {
            webhook_url: config.sheet_webhook_url.clone(),
            bearer_token,
            client: reqwest::Client::new(),
        }
    }

    /// 追加一条评估记录
    pub async fn append(&self, record: &EvalRecord) -> AppResult<()> {
        let Some(url) = &self.webhook_url else {
            debug!("未配置表格 webhook，跳过记录");
            return Ok(());
        };

        debug!(
            "追加评估记录: {}",
            serde_json::to_string(record).unwrap_or_default()
        );

        let mut request = self.client.post(url).json(record);
        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            AppError::Logging(LoggingError::RequestFailed {
                endpoint: url.clone(),
                source: Box::new(e),
            })
        })?;

        if !response.status().is_success() {
            return Err(AppError::Logging(LoggingError::BadStatus {
                endpoint: url.clone(),
                status: response.status().as_u16(),
            }));
        }

        debug!("评估记录已追加");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_text_between_markers() {
        let response = "1. Relevance Summary\nfine.\n\n2. Rubric Evaluation\n\
                        Criterion: Clarity\nScore: 3\n\n3. Suggestions for Improvement\nnone";
        assert_eq!(
            extract_rubric_section(response),
            "Criterion: Clarity\nScore: 3"
        );
    }

    #[test]
    fn test_boundary_match_is_case_insensitive() {
        let response = "intro RUBRIC EVALUATION body text suggestions for improvement outro";
        assert_eq!(extract_rubric_section(response), "body text");
    }

    #[test]
    fn test_missing_start_marker_yields_sentinel() {
        let response = "no rubric here\nSuggestions for Improvement\nsomething";
        assert_eq!(extract_rubric_section(response), MISSING_SECTION_SENTINEL);
    }

    #[test]
    fn test_missing_end_marker_yields_sentinel() {
        let response = "Rubric Evaluation\nscores without a closing section";
        assert_eq!(extract_rubric_section(response), MISSING_SECTION_SENTINEL);
    }
}

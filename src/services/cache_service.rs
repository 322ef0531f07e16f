//! 解析缓存服务 - 业务能力层
//!
//! 只负责"按内容哈希取归一化文本"能力，不关心流程。
//! 缓存键是文件原始字节的 SHA-256，与路径和修改时间无关：
//! 同一份内容在缓存生命周期内最多归一化一次。
//! 缓存永不失效、永不淘汰（接受无限增长，见设计文档）。

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs;
use tokio::task;
use tracing::{debug, warn};

use crate::error::{AppError, AppResult, CacheError};
use crate::models::{content_hash, DocFormat};
use crate::parsers;

/// 解析缓存
///
/// 职责：
/// - 读取源文件字节并计算内容哈希
/// - 命中时直接返回缓存文本，不调用解析器
/// - 未命中时解析并原子落盘（先写临时文件再重命名）
/// - 写入失败只降级为告警，本次结果照常返回
#[derive(Clone, Debug)]
pub struct ParseCache {
    cache_dir: PathBuf,
}

impl ParseCache {
    /// 创建新的解析缓存
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
        }
    }

    /// 取文件的归一化文本（缓存优先）
    ///
    /// # 参数
    /// - `path`: 源文件路径
    ///
    /// # 返回
    /// 返回归一化文本
    pub async fn fetch(&self, path: &Path) -> AppResult<String> {
        let bytes = fs::read(path)
            .await
            .map_err(|e| AppError::read_failed(path.display().to_string(), e))?;

        let hash = content_hash(&bytes);
        let entry_path = self.cache_dir.join(format!("{}.txt", hash));

        if let Ok(cached) = fs::read_to_string(&entry_path).await {
            debug!("缓存命中: {}", hash);
            return Ok(cached);
        }

        debug!("缓存未命中，开始解析: {}", hash);
        let format = DocFormat::from_path(path);
        let parsed = task::spawn_blocking(move || parsers::parse_document(format, &bytes))
            .await
            .map_err(|e| AppError::Other(format!("解析任务执行失败: {}", e)))??;

        if let Err(e) = self.store(&entry_path, &parsed).await {
            // 降级：下次运行对这份内容重新解析
            warn!("⚠️ {}", e);
        }

        Ok(parsed)
    }

    /// 原子写入缓存条目
    ///
    /// 先写临时文件再重命名，并发读取方永远看不到半成品；
    /// 同键竞争以相同内容互相覆盖，结果等价。
    /// 临时文件名带进程内序号：同进程并发写同一键时各写各的临时文件，
    /// 不会互相截断对方尚未重命名的半成品。
    async fn store(&self, entry_path: &Path, text: &str) -> AppResult<()> {
        static TMP_SEQ: AtomicU64 = AtomicU64::new(0);

        fs::create_dir_all(&self.cache_dir).await.map_err(|e| {
            AppError::Cache(CacheError::DirCreationFailed {
                path: self.cache_dir.display().to_string(),
                source: Box::new(e),
            })
        })?;

        let seq = TMP_SEQ.fetch_add(1, Ordering::Relaxed);
        let tmp_path =
            entry_path.with_extension(format!("tmp{}-{}", std::process::id(), seq));
        fs::write(&tmp_path, text)
            .await
            .map_err(|e| AppError::cache_write_failed(tmp_path.display().to_string(), e))?;
        fs::rename(&tmp_path, entry_path)
            .await
            .map_err(|e| AppError::cache_write_failed(entry_path.display().to_string(), e))?;

        Ok(())
    }
}

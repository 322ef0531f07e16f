//! 评估流水线编排层
//!
//! 定义整条流水线的执行顺序：
//! 并发解析（缓存优先）→ 拼装 → 预算闸门 → LLM 调用 → 输出与记录

use std::path::Path;
use std::time::Instant;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use futures::future::try_join_all;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult, ConfigError};
use crate::models::DocumentRole;
use crate::services::{
    assemble, extract_rubric_section, EvalInvoker, EvalRecord, EvalService, ParseCache,
    SheetLogger, TokenCounter,
};
use crate::utils::truncate_text;

/// 应用主结构
pub struct App {
    config: Config,
    cache: ParseCache,
    counter: TokenCounter,
    eval: EvalService,
    logger: SheetLogger,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> AppResult<Self> {
        // 解码表格凭证（可选，未配置则跳过）
        decode_sheet_credentials(&config)?;

        let cache = ParseCache::new(&config.cache_dir);
        let counter = TokenCounter::new()?;
        let eval = EvalService::new(&config);
        let logger = SheetLogger::new(&config);

        Ok(Self {
            config,
            cache,
            counter,
            eval,
            logger,
        })
    }

    /// 运行评估流水线并把结果打印到标准输出
    pub async fn run(&self, paths: [String; 3]) -> AppResult<String> {
        run_pipeline(
            &self.config,
            &self.cache,
            &self.counter,
            &self.eval,
            &self.logger,
            paths,
        )
        .await
    }
}

/// 评估流水线
///
/// 三份文档各自一个并发任务（缓存优先），全部完成后拼装载荷。
/// 预算闸门是 fail-closed 的：超限直接返回错误，LLM 调用不会发生。
/// 表格记录尽力而为，失败只产生告警，不影响退出码。
pub async fn run_pipeline<I: EvalInvoker>(
    config: &Config,
    cache: &ParseCache,
    counter: &TokenCounter,
    invoker: &I,
    logger: &SheetLogger,
    paths: [String; 3],
) -> AppResult<String> {
    let t0 = Instant::now();
    log_startup(config);

    // 并发解析，wait-all 屏障后按输入顺序取回结果
    let handles: Vec<_> = paths
        .iter()
        .cloned()
        .map(|path| {
            let cache = cache.clone();
            tokio::spawn(async move { cache.fetch(Path::new(&path)).await })
        })
        .collect();
    let joined = try_join_all(handles)
        .await
        .map_err(|e| AppError::Other(format!("解析任务执行失败: {}", e)))?;

    let mut texts = Vec::with_capacity(3);
    for (role, result) in DocumentRole::ALL.iter().zip(joined) {
        let text = result?;
        info!(
            "✅ 完成解析: {} (耗时 {:.2}s)",
            role.label(),
            t0.elapsed().as_secs_f64()
        );
        texts.push(text);
    }
    let parse_seconds = t0.elapsed().as_secs_f64();

    // 拼装 + 预算闸门
    let prompt = match assemble(
        &texts[0],
        &texts[1],
        &texts[2],
        counter,
        config.max_prompt_tokens,
    ) {
        Ok(prompt) => prompt,
        Err(e) => {
            warn!("⚠️ {}", e);
            return Err(e);
        }
    };

    info!(
        "🧠 Token 总数: {} / 上限 {}",
        prompt.token_count, config.max_prompt_tokens
    );
    info!("⏱️ 解析总耗时: {:.2}s", parse_seconds);
    debug!("载荷预览: {}", truncate_text(&prompt.payload, 200));

    // 调用 LLM（失败原样上抛，不做重试）
    info!("🤖 正在调用 LLM...");
    let llm_start = Instant::now();
    let response = invoker.invoke(&config.system_prompt, &prompt.payload).await?;
    let llm_seconds = llm_start.elapsed().as_secs_f64();
    info!("✅ LLM 响应完成 (耗时 {:.2}s)", llm_seconds);

    // 输出结果
    println!("{}", response);

    // 尽力而为的表格记录
    let record = EvalRecord::new(
        [paths[0].as_str(), paths[1].as_str(), paths[2].as_str()],
        extract_rubric_section(&response),
        parse_seconds,
        llm_seconds,
    );
    if let Err(e) = logger.append(&record).await {
        warn!("⚠️ 评估记录失败（不影响结果）: {}", e);
    }

    Ok(response)
}

/// 解码 base64 凭证内容到本地文件
fn decode_sheet_credentials(config: &Config) -> AppResult<()> {
    let Some(blob) = &config.sheet_credentials_b64 else {
        return Ok(());
    };

    let bytes = BASE64.decode(blob.as_bytes()).map_err(|e| {
        AppError::Config(ConfigError::CredentialDecodeFailed {
            source: Box::new(e),
        })
    })?;
    std::fs::write(&config.sheet_credentials_path, bytes).map_err(|e| {
        AppError::Config(ConfigError::CredentialDecodeFailed {
            source: Box::new(e),
        })
    })?;

    info!("🔑 表格凭证已解码至 {}", config.sheet_credentials_path);
    Ok(())
}

fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 开始评估课程材料 - 并行解析三份输入");
    info!("📦 缓存目录: {}", config.cache_dir);
    info!("{}", "=".repeat(60));
}

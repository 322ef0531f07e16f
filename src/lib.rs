//! # Course Material Eval
//!
//! 一个用于自动化评估大学课程材料的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 归一化层（Parsers）
//! - `parsers/` - 按格式把文档转成带页码/幻灯片标记的纯文本
//! - `pdf` / `docx` / `pptx` - 每种格式一个处理器，封闭枚举分发
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，不关心流程
//! - `ParseCache` - 内容寻址缓存能力（同内容最多解析一次）
//! - `TokenCounter` - cl100k_base token 计数能力
//! - `prompt_service` - 固定顺序拼装 + 预算闸门能力
//! - `EvalService` - LLM 评估能力
//! - `SheetLogger` - 尽力而为的表格记录能力
//!
//! ### ③ 编排层（App）
//! - `app` - 定义整条流水线：并发解析 → 拼装 → 闸门 → LLM → 记录
//!
//! ## 模块结构

pub mod app;
pub mod config;
pub mod error;
pub mod models;
pub mod parsers;
pub mod services;
pub mod utils;

// 重新导出常用类型
pub use app::{run_pipeline, App};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{DocFormat, DocumentRole};
pub use services::{
    assemble, extract_rubric_section, AssembledPrompt, EvalInvoker, EvalRecord, EvalService,
    ParseCache, SheetLogger, TokenCounter,
};

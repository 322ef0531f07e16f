//! Prompt 拼装服务
//!
//! 把三份归一化文本按固定顺序（Rubric → Lesson → Course Overview）
//! 拼成一个评估载荷，并在任何外部调用之前执行 token 预算闸门。
//! 闸门是 fail-closed 的：超限直接报错，绝不触达付费的 LLM 调用。

use crate::error::AppResult;
use crate::models::DocumentRole;
use crate::services::token_service::TokenCounter;

/// 拼装完成、已测量 token 的评估载荷
#[derive(Clone, Debug)]
pub struct AssembledPrompt {
    pub payload: String,
    pub token_count: usize,
}

/// 拼装评估载荷并执行预算闸门
///
/// 每个章节包装为 `### <标题> ###\n<文本>`，章节之间以空行分隔。
/// 顺序固定且有语义：系统提示词隐式引用这个章节结构。
///
/// # 参数
/// - `rubric`: 评分标准的归一化文本
/// - `lesson`: 课程内容的归一化文本
/// - `overview`: 课程概览的归一化文本
/// - `counter`: Token 计数器
/// - `max_tokens`: token 上限
///
/// # 返回
/// 超出上限时返回 `AppError::Budget`，流程不得继续调用 LLM
pub fn assemble(
    rubric: &str,
    lesson: &str,
    overview: &str,
    counter: &TokenCounter,
    max_tokens: usize,
) -> AppResult<AssembledPrompt> {
    let texts = [rubric, lesson, overview];
    let payload = DocumentRole::ALL
        .iter()
        .zip(texts.iter())
        .map(|(role, text)| format!("### {} ###\n{}", role.label(), text))
        .collect::<Vec<_>>()
        .join("\n\n");

    let token_count = counter.count(&payload);
    if token_count > max_tokens {
        return Err(crate::error::AppError::budget_exceeded(
            token_count,
            max_tokens,
        ));
    }

    Ok(AssembledPrompt {
        payload,
        token_count,
    })
}

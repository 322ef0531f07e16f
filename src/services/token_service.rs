//! Token 计数服务
//!
//! 用与目标模型一致的 cl100k_base 分词方案测量文本大小，
//! 只作为预算闸门使用，纯函数、无外部调用、不改状态。

use tiktoken_rs::{cl100k_base, CoreBPE};

use crate::error::{AppError, AppResult, ConfigError};

/// Token 计数器
///
/// BPE 词表在启动时构建一次，之后的计数都是本地确定性计算。
pub struct TokenCounter {
    bpe: CoreBPE,
}

impl TokenCounter {
    /// 创建新的 Token 计数器
    pub fn new() -> AppResult<Self> {
        let bpe = cl100k_base().map_err(|e| {
            AppError::Config(ConfigError::TokenizerInitFailed {
                message: e.to_string(),
            })
        })?;
        Ok(Self { bpe })
    }

    /// 计算文本的 token 数量
    pub fn count(&self, text: &str) -> usize {
        self.bpe.encode_ordinary(text).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_is_deterministic() {
        let counter = TokenCounter::new().unwrap();
        let text = "### Rubric ###\n[Page 1] GRADING CRITERIA";
        assert_eq!(counter.count(text), counter.count(text));
    }

    #[test]
    fn test_empty_text_counts_zero() {
        let counter = TokenCounter::new().unwrap();
        assert_eq!(counter.count(""), 0);
    }

    #[test]
    fn test_longer_text_costs_more() {
        let counter = TokenCounter::new().unwrap();
        let short = counter.count("Week 3: Functions");
        let long = counter.count(&"Week 3: Functions. ".repeat(50));
        assert!(short > 0);
        assert!(long > short);
    }
}

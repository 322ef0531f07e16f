//! 文档归一化解析 - 叶子层
//!
//! 按格式把文档转换为带页码/幻灯片标记的有序纯文本。
//! 同样的字节输入必须产出逐字节相同的输出（与文件路径无关），
//! 这是内容寻址缓存正确性的前提。

pub mod docx;
pub mod pdf;
pub mod pptx;

use crate::error::AppResult;
use crate::models::DocFormat;

/// 不支持扩展名的哨兵文本
///
/// 软失败：不是错误，拼装层原样拼入该文本继续流程。
pub const UNSUPPORTED_SENTINEL: &str = "Unsupported file type.";

/// 按格式分发解析
pub fn parse_document(format: DocFormat, bytes: &[u8]) -> AppResult<String> {
    match format {
        DocFormat::Pdf => pdf::parse(bytes),
        DocFormat::Docx => docx::parse(bytes),
        DocFormat::Pptx => pptx::parse(bytes),
        DocFormat::Unsupported => Ok(UNSUPPORTED_SENTINEL.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_format_yields_sentinel() {
        // 不支持的格式产出哨兵文本而不是错误
        let result = parse_document(DocFormat::Unsupported, b"whatever bytes").unwrap();
        assert_eq!(result, UNSUPPORTED_SENTINEL);
    }
}

//! 文档模型
//!
//! 三份输入文档的格式标签、角色定义与内容哈希

use sha2::{Digest, Sha256};
use std::path::Path;

/// 文档格式（按扩展名一次性解析，封闭枚举）
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DocFormat {
    Pdf,
    Docx,
    Pptx,
    /// 不支持的扩展名（软失败，解析时产出哨兵文本）
    Unsupported,
}

impl DocFormat {
    /// 从文件路径的扩展名解析格式
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_ascii_lowercase())
            .as_deref()
        {
            Some("pdf") => DocFormat::Pdf,
            Some("docx") => DocFormat::Docx,
            Some("pptx") => DocFormat::Pptx,
            _ => DocFormat::Unsupported,
        }
    }
}

/// 文档在评估 prompt 中的角色
///
/// 顺序固定为 Rubric → Lesson → Course Overview，
/// 系统提示词隐式依赖这个章节顺序。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DocumentRole {
    Rubric,
    Lesson,
    CourseOverview,
}

impl DocumentRole {
    /// 三个角色的固定拼装顺序
    pub const ALL: [DocumentRole; 3] = [
        DocumentRole::Rubric,
        DocumentRole::Lesson,
        DocumentRole::CourseOverview,
    ];

    /// 章节标题
    pub fn label(&self) -> &'static str {
        match self {
            DocumentRole::Rubric => "Rubric",
            DocumentRole::Lesson => "Lesson",
            DocumentRole::CourseOverview => "Course Overview",
        }
    }
}

/// 计算文件原始字节的内容哈希（SHA-256，十六进制）
///
/// 哈希只取决于字节内容，与文件名和路径无关，用作缓存键。
pub fn content_hash(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(DocFormat::from_path(Path::new("a.pdf")), DocFormat::Pdf);
        assert_eq!(DocFormat::from_path(Path::new("b.DOCX")), DocFormat::Docx);
        assert_eq!(DocFormat::from_path(Path::new("c.pptx")), DocFormat::Pptx);
        assert_eq!(
            DocFormat::from_path(Path::new("d.txt")),
            DocFormat::Unsupported
        );
        assert_eq!(
            DocFormat::from_path(Path::new("no_extension")),
            DocFormat::Unsupported
        );
    }

    #[test]
    fn test_content_hash_ignores_path() {
        // 哈希只依赖字节内容
        let a = content_hash(b"identical bytes");
        let b = content_hash(b"identical bytes");
        assert_eq!(a, b);

        let c = content_hash(b"different bytes");
        assert_ne!(a, c);

        // 路径不参与哈希
        let _unused: PathBuf = PathBuf::from("/some/other/place.pdf");
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_role_order_and_labels() {
        let labels: Vec<&str> = DocumentRole::ALL.iter().map(|r| r.label()).collect();
        assert_eq!(labels, vec!["Rubric", "Lesson", "Course Overview"]);
    }
}

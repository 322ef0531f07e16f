//! DOCX 解析
//!
//! DOCX 是包含 Office Open XML 的 ZIP 容器，正文在 `word/document.xml`。
//! 手工 ZIP + XML 解析（docx-rs 只支持写入）。
//!
//! 按文档顺序遍历段落：标题样式（`w:pStyle` 以 `Heading` 开头）的段落
//! 前缀 `[Page n]` 标记并整体大写以示结构重要性，普通段落原样输出，
//! 空段落丢弃。段落编号按全部段落（含空段）从 1 计数。

use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Cursor, Read};
use zip::ZipArchive;

use crate::error::{AppError, AppResult, ParseError};

const DOCUMENT_ENTRY: &str = "word/document.xml";

/// 解析 DOCX 字节内容为归一化文本
pub fn parse(bytes: &[u8]) -> AppResult<String> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).map_err(|e| {
        AppError::Parse(ParseError::ArchiveCorrupt {
            entry: DOCUMENT_ENTRY.to_string(),
            source: Box::new(e),
        })
    })?;

    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_ENTRY)
        .map_err(|e| {
            AppError::Parse(ParseError::ArchiveCorrupt {
                entry: DOCUMENT_ENTRY.to_string(),
                source: Box::new(e),
            })
        })?
        .read_to_string(&mut xml)
        .map_err(|e| {
            AppError::Parse(ParseError::ArchiveCorrupt {
                entry: DOCUMENT_ENTRY.to_string(),
                source: Box::new(e),
            })
        })?;

    walk_paragraphs(&xml)
}

/// 遍历 document.xml 中的段落并渲染
fn walk_paragraphs(xml: &str) -> AppResult<String> {
    let mut reader = Reader::from_str(xml);

    let mut lines: Vec<String> = Vec::new();
    // 段落编号覆盖所有段落（空段也计数），与标记中的 n 对应
    let mut paragraph_index = 0usize;
    let mut in_paragraph = false;
    let mut is_heading = false;
    let mut in_text = false;
    let mut paragraph_text = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"w:p" => {
                    paragraph_index += 1;
                    in_paragraph = true;
                    is_heading = false;
                    paragraph_text.clear();
                }
                b"w:t" => in_text = true,
                b"w:pStyle" if in_paragraph && style_is_heading(&e) => is_heading = true,
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                // 自闭合的空段落不输出，但参与编号
                b"w:p" => paragraph_index += 1,
                b"w:pStyle" if in_paragraph && style_is_heading(&e) => is_heading = true,
                // <w:tab/> 是 <w:t> 的兄弟节点（同在 <w:r> 内），按制表符渲染
                b"w:tab" if in_paragraph => paragraph_text.push('\t'),
                _ => {}
            },
            Ok(Event::Text(t)) if in_text => {
                let text = t.unescape().map_err(|e| xml_failed(e))?;
                paragraph_text.push_str(&text);
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:p" => {
                    if !paragraph_text.trim().is_empty() {
                        if is_heading {
                            lines.push(format!(
                                "\n[Page {}] {}",
                                paragraph_index,
                                paragraph_text.to_uppercase()
                            ));
                        } else {
                            lines.push(paragraph_text.clone());
                        }
                    }
                    in_paragraph = false;
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_failed(e)),
            _ => {}
        }
    }

    Ok(lines.join("\n"))
}

/// 段落样式是否为标题（`w:val` 以 `Heading` 开头）
fn style_is_heading(e: &quick_xml::events::BytesStart<'_>) -> bool {
    get_attr(e, b"w:val")
        .map(|val| val.starts_with("Heading"))
        .unwrap_or(false)
}

/// 按键名取属性值
fn get_attr(e: &quick_xml::events::BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .find(|a| a.as_ref().ok().map(|x| x.key.as_ref()) == Some(key))
        .and_then(Result::ok)
        .map(|attr| String::from_utf8_lossy(&attr.value).to_string())
}

fn xml_failed(e: quick_xml::Error) -> AppError {
    AppError::Parse(ParseError::XmlFailed {
        entry: DOCUMENT_ENTRY.to_string(),
        source: Box::new(e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    /// 用给定的 document.xml 正文构造内存中的 DOCX
    fn build_docx(body: &str) -> Vec<u8> {
        let xml = format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
             <w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
             <w:body>{}</w:body></w:document>",
            body
        );
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file(DOCUMENT_ENTRY, SimpleFileOptions::default())
            .expect("创建 ZIP 条目失败");
        writer.write_all(xml.as_bytes()).expect("写入 XML 失败");
        writer.finish().expect("关闭 ZIP 失败").into_inner()
    }

    fn paragraph(text: &str) -> String {
        format!("<w:p><w:r><w:t>{}</w:t></w:r></w:p>", text)
    }

    fn heading(text: &str) -> String {
        format!(
            "<w:p><w:pPr><w:pStyle w:val=\"Heading1\"/></w:pPr>\
             <w:r><w:t>{}</w:t></w:r></w:p>",
            text
        )
    }

    #[test]
    fn test_heading_gets_page_marker_and_uppercase() {
        let bytes = build_docx(&format!(
            "{}{}",
            heading("Grading Criteria"),
            paragraph("Each criterion is scored from 1 to 4.")
        ));
        let text = parse(&bytes).unwrap();

        assert!(text.contains("[Page 1] GRADING CRITERIA"));
        assert!(text.contains("Each criterion is scored from 1 to 4."));
    }

    #[test]
    fn test_empty_paragraphs_dropped_but_counted() {
        // 空段落不输出，但参与编号
        let bytes = build_docx(&format!(
            "{}<w:p/>{}",
            paragraph("intro"),
            heading("Section")
        ));
        let text = parse(&bytes).unwrap();

        assert!(text.contains("[Page 3] SECTION"));
        assert!(!text.contains("[Page 2]"));
    }

    #[test]
    fn test_tab_rendered_between_runs() {
        // <w:tab/> 独占一个 <w:r>，与文本 run 相邻
        let bytes = build_docx(
            "<w:p><w:r><w:t>Criterion</w:t></w:r>\
             <w:r><w:tab/></w:r>\
             <w:r><w:t>Score</w:t></w:r></w:p>",
        );
        let text = parse(&bytes).unwrap();
        assert_eq!(text, "Criterion\tScore");
    }

    #[test]
    fn test_non_heading_paragraph_verbatim() {
        let bytes = build_docx(&paragraph("Mixed Case Stays"));
        let text = parse(&bytes).unwrap();
        assert_eq!(text, "Mixed Case Stays");
    }

    #[test]
    fn test_deterministic_extraction() {
        let bytes = build_docx(&format!("{}{}", heading("Title"), paragraph("body")));
        assert_eq!(parse(&bytes).unwrap(), parse(&bytes).unwrap());
    }

    #[test]
    fn test_corrupt_archive_is_an_error() {
        assert!(parse(b"not a zip container").is_err());
    }
}

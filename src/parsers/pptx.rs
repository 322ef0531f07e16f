//! PPTX 解析
//!
//! PPTX 同样是 ZIP 容器，每页幻灯片对应 `ppt/slides/slideN.xml`。
//! 按幻灯片编号升序，每页一个文本段，段首为 `[Slide N]` 标记；
//! 段内每个含文本的形状（`p:sp`）贡献一行去除首尾空白的文本，
//! 无文本的形状跳过（显式的"有文本"判定：形状内至少有一个非空 `a:t`）。

use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Cursor, Read};
use zip::ZipArchive;

use crate::error::{AppError, AppResult, ParseError};

const SLIDE_PREFIX: &str = "ppt/slides/slide";
const SLIDE_SUFFIX: &str = ".xml";

/// 解析 PPTX 字节内容为归一化文本
pub fn parse(bytes: &[u8]) -> AppResult<String> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).map_err(|e| {
        AppError::Parse(ParseError::ArchiveCorrupt {
            entry: SLIDE_PREFIX.to_string(),
            source: Box::new(e),
        })
    })?;

    // 收集幻灯片条目并按编号排序（条目在 ZIP 中的顺序不保证）
    let mut slides: Vec<(usize, String)> = archive
        .file_names()
        .filter_map(|name| slide_number(name).map(|n| (n, name.to_string())))
        .collect();
    slides.sort();

    let mut segments = Vec::new();
    for (index, (_, entry)) in slides.iter().enumerate() {
        let mut xml = String::new();
        archive
            .by_name(entry)
            .map_err(|e| {
                AppError::Parse(ParseError::ArchiveCorrupt {
                    entry: entry.clone(),
                    source: Box::new(e),
                })
            })?
            .read_to_string(&mut xml)
            .map_err(|e| {
                AppError::Parse(ParseError::ArchiveCorrupt {
                    entry: entry.clone(),
                    source: Box::new(e),
                })
            })?;

        let mut lines = vec![format!("[Slide {}]", index + 1)];
        lines.extend(extract_shape_texts(&xml, entry)?);
        segments.push(lines.join("\n"));
    }

    Ok(segments.join("\n\n"))
}

/// 从条目名解析幻灯片编号（`ppt/slides/slide3.xml` → 3）
fn slide_number(name: &str) -> Option<usize> {
    name.strip_prefix(SLIDE_PREFIX)?
        .strip_suffix(SLIDE_SUFFIX)?
        .parse()
        .ok()
}

/// 抽取一页幻灯片中每个形状的文本
fn extract_shape_texts(xml: &str, entry: &str) -> AppResult<Vec<String>> {
    let mut reader = Reader::from_str(xml);

    let mut lines = Vec::new();
    let mut in_shape = false;
    let mut in_run_text = false;
    let mut shape_text = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"p:sp" => {
                    in_shape = true;
                    shape_text.clear();
                }
                // 形状内的段落以换行分隔
                b"a:p" if in_shape && !shape_text.is_empty() => shape_text.push('\n'),
                b"a:t" if in_shape => in_run_text = true,
                _ => {}
            },
            Ok(Event::Text(t)) if in_run_text => {
                let text = t.unescape().map_err(|e| xml_failed(entry, e))?;
                shape_text.push_str(&text);
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"a:t" => in_run_text = false,
                b"p:sp" => {
                    let trimmed = shape_text.trim();
                    if !trimmed.is_empty() {
                        lines.push(trimmed.to_string());
                    }
                    in_shape = false;
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_failed(entry, e)),
            _ => {}
        }
    }

    Ok(lines)
}

fn xml_failed(entry: &str, e: quick_xml::Error) -> AppError {
    AppError::Parse(ParseError::XmlFailed {
        entry: entry.to_string(),
        source: Box::new(e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    /// 用给定的每页形状文本构造内存中的 PPTX
    fn build_pptx(slides: &[&[&str]]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (i, shapes) in slides.iter().enumerate() {
            let body: String = shapes
                .iter()
                .map(|text| {
                    format!(
                        "<p:sp><p:txBody><a:p><a:r><a:t>{}</a:t></a:r></a:p></p:txBody></p:sp>",
                        text
                    )
                })
                .collect();
            let xml = format!(
                "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
                 <p:sld xmlns:p=\"http://schemas.openxmlformats.org/presentationml/2006/main\" \
                 xmlns:a=\"http://schemas.openxmlformats.org/drawingml/2006/main\">\
                 <p:cSld><p:spTree>{}</p:spTree></p:cSld></p:sld>",
                body
            );
            writer
                .start_file(
                    format!("{}{}{}", SLIDE_PREFIX, i + 1, SLIDE_SUFFIX),
                    SimpleFileOptions::default(),
                )
                .expect("创建 ZIP 条目失败");
            writer.write_all(xml.as_bytes()).expect("写入 XML 失败");
        }
        writer.finish().expect("关闭 ZIP 失败").into_inner()
    }

    #[test]
    fn test_slides_in_order_with_markers() {
        let bytes = build_pptx(&[&["Intro to Functions"], &["Defining a Function"]]);
        let text = parse(&bytes).unwrap();

        let expected = "[Slide 1]\nIntro to Functions\n\n[Slide 2]\nDefining a Function";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_shape_without_text_skipped() {
        let bytes = build_pptx(&[&["visible", "   ", ""]]);
        let text = parse(&bytes).unwrap();
        assert_eq!(text, "[Slide 1]\nvisible");
    }

    #[test]
    fn test_deterministic_extraction() {
        let bytes = build_pptx(&[&["a"], &["b", "c"]]);
        assert_eq!(parse(&bytes).unwrap(), parse(&bytes).unwrap());
    }
}

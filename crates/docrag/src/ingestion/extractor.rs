//! Multi-format content extraction

use calamine::Reader;

use crate::error::{Error, Result};

/// File formats the pipeline can ingest
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Pdf,
    Docx,
    Pptx,
    Xlsx,
    Text,
    Unknown,
}

impl FileKind {
    /// Detect file kind from a lowercased extension
    pub fn from_extension(ext: &str) -> Self {
        match ext {
            "pdf" => Self::Pdf,
            "docx" => Self::Docx,
            "pptx" => Self::Pptx,
            "xlsx" => Self::Xlsx,
            "txt" | "text" | "md" | "markdown" => Self::Text,
            _ => Self::Unknown,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

/// Converts raw file bytes into extracted text segments
///
/// One segment per page/sheet/slide where the format has such structure,
/// a single segment otherwise.
pub trait ContentExtractor: Send + Sync {
    /// Extract text segments from a file
    ///
    /// Fails with `Error::UnsupportedFormat` for unknown extensions and
    /// `Error::Extraction` when a supported file cannot be read.
    fn extract(&self, data: &[u8], extension: &str) -> Result<Vec<String>>;
}

/// Extractor for the formats the ingestion pipeline accepts
#[derive(Debug, Clone, Default)]
pub struct FileExtractor;

impl FileExtractor {
    pub fn new() -> Self {
        Self
    }

    fn extract_text(data: &[u8]) -> Vec<String> {
        vec![String::from_utf8_lossy(data).into_owned()]
    }

    fn extract_pdf(data: &[u8]) -> Result<Vec<String>> {
        let text = pdf_extract::extract_text_from_mem(data)
            .map_err(|e| Error::extraction("document.pdf", e.to_string()))?;

        let cleaned = cleanup_extracted_text(&text);
        if cleaned.trim().is_empty() {
            return Err(Error::extraction(
                "document.pdf",
                "no text content could be extracted",
            ));
        }
        Ok(vec![cleaned])
    }

    fn extract_docx(data: &[u8]) -> Result<Vec<String>> {
        let doc = docx_rs::read_docx(data)
            .map_err(|e| Error::extraction("document.docx", e.to_string()))?;

        let mut content = String::new();
        for child in doc.document.children {
            if let docx_rs::DocumentChild::Paragraph(p) = child {
                for child in p.children {
                    if let docx_rs::ParagraphChild::Run(run) = child {
                        for child in run.children {
                            if let docx_rs::RunChild::Text(t) = child {
                                content.push_str(&t.text);
                            }
                        }
                    }
                }
                content.push('\n');
            }
        }

        if content.trim().is_empty() {
            return Err(Error::extraction("document.docx", "document has no text"));
        }
        Ok(vec![content])
    }

    /// One segment per slide, read from the pptx zip archive
    fn extract_pptx(data: &[u8]) -> Result<Vec<String>> {
        use std::io::Read;

        let cursor = std::io::Cursor::new(data);
        let mut archive = zip::ZipArchive::new(cursor)
            .map_err(|e| Error::extraction("presentation.pptx", e.to_string()))?;

        let mut slide_names: Vec<String> = archive
            .file_names()
            .filter(|name| name.starts_with("ppt/slides/slide") && name.ends_with(".xml"))
            .map(|s| s.to_string())
            .collect();

        slide_names.sort_by_key(|name| {
            name.trim_start_matches("ppt/slides/slide")
                .trim_end_matches(".xml")
                .parse::<u32>()
                .unwrap_or(0)
        });

        let mut segments = Vec::new();
        for slide_name in slide_names {
            if let Ok(mut file) = archive.by_name(&slide_name) {
                let mut xml = String::new();
                if file.read_to_string(&mut xml).is_ok() {
                    let slide_text = slide_text_from_xml(&xml);
                    if !slide_text.trim().is_empty() {
                        segments.push(slide_text);
                    }
                }
            }
        }

        if segments.is_empty() {
            return Err(Error::extraction(
                "presentation.pptx",
                "presentation has no extractable text",
            ));
        }
        Ok(segments)
    }

    /// One segment per sheet, rows joined with ` | `
    fn extract_xlsx(data: &[u8]) -> Result<Vec<String>> {
        let cursor = std::io::Cursor::new(data);
        let mut workbook = calamine::open_workbook_auto_from_rs(cursor)
            .map_err(|e| Error::extraction("spreadsheet.xlsx", e.to_string()))?;

        let mut segments = Vec::new();
        for sheet_name in workbook.sheet_names().to_vec() {
            if let Ok(range) = workbook.worksheet_range(&sheet_name) {
                let mut sheet = format!("Sheet: {}\n", sheet_name);
                for row in range.rows() {
                    let cells: Vec<String> = row
                        .iter()
                        .map(|cell| match cell {
                            calamine::Data::Empty => String::new(),
                            calamine::Data::String(s) => s.clone(),
                            calamine::Data::Float(f) => f.to_string(),
                            calamine::Data::Int(i) => i.to_string(),
                            calamine::Data::Bool(b) => b.to_string(),
                            calamine::Data::DateTime(dt) => dt.to_string(),
                            _ => String::new(),
                        })
                        .collect();
                    if !cells.iter().all(|c| c.is_empty()) {
                        sheet.push_str(&cells.join(" | "));
                        sheet.push('\n');
                    }
                }
                segments.push(sheet);
            }
        }

        if segments.is_empty() {
            return Err(Error::extraction(
                "spreadsheet.xlsx",
                "workbook has no sheets",
            ));
        }
        Ok(segments)
    }
}

impl ContentExtractor for FileExtractor {
    fn extract(&self, data: &[u8], extension: &str) -> Result<Vec<String>> {
        match FileKind::from_extension(extension) {
            FileKind::Text => Ok(Self::extract_text(data)),
            FileKind::Pdf => Self::extract_pdf(data),
            FileKind::Docx => Self::extract_docx(data),
            FileKind::Pptx => Self::extract_pptx(data),
            FileKind::Xlsx => Self::extract_xlsx(data),
            FileKind::Unknown => Err(Error::UnsupportedFormat(extension.to_string())),
        }
    }
}

/// Normalize artifacts common in extracted PDF text
fn cleanup_extracted_text(text: &str) -> String {
    text.replace('\0', "")
        .replace('\u{FB00}', "ff")
        .replace('\u{FB01}', "fi")
        .replace('\u{FB02}', "fl")
        .replace('\u{00A0}', " ")
        .lines()
        .map(|l| l.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Pull the text runs (`<a:t>` elements) out of a slide's XML
fn slide_text_from_xml(xml: &str) -> String {
    use quick_xml::events::Event;
    use quick_xml::Reader;

    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut parts = Vec::new();
    let mut in_text = false;
    let mut current = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"t" => {
                in_text = true;
                current.clear();
            }
            Ok(Event::Text(e)) if in_text => {
                if let Ok(text) = e.unescape() {
                    current.push_str(&text);
                }
            }
            Ok(Event::End(e)) => {
                let name = e.local_name();
                if name.as_ref() == b"t" && in_text {
                    if !current.trim().is_empty() {
                        parts.push(current.trim().to_string());
                    }
                    in_text = false;
                } else if name.as_ref() == b"p" && !parts.is_empty() {
                    parts.push("\n".to_string());
                }
            }
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {}
        }
    }

    parts
        .join(" ")
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_supported_kinds() {
        assert_eq!(FileKind::from_extension("pdf"), FileKind::Pdf);
        assert_eq!(FileKind::from_extension("md"), FileKind::Text);
        assert_eq!(FileKind::from_extension("xlsx"), FileKind::Xlsx);
        assert!(!FileKind::from_extension("exe").is_supported());
    }

    #[test]
    fn text_files_extract_as_single_segment() {
        let segments = FileExtractor::new()
            .extract(b"hello world", "txt")
            .unwrap();
        assert_eq!(segments, vec!["hello world".to_string()]);
    }

    #[test]
    fn unknown_extension_is_unsupported() {
        let err = FileExtractor::new().extract(b"data", "bin").unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(_)));
    }

    #[test]
    fn slide_xml_text_runs_are_collected() {
        let xml = r#"<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main">
            <a:p><a:r><a:t>Title slide</a:t></a:r></a:p>
            <a:p><a:r><a:t>Second line</a:t></a:r></a:p>
        </p:sld>"#;
        let text = slide_text_from_xml(xml);
        assert!(text.contains("Title slide"));
        assert!(text.contains("Second line"));
    }

    #[test]
    fn cleanup_strips_ligatures_and_nulls() {
        let cleaned = cleanup_extracted_text("o\u{FB01}ce\0 dra\u{FB02}t  ");
        assert_eq!(cleaned, "ofice draflt");
    }
}

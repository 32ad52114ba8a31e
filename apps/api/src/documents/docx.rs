//! DOCX text extraction: unzip `word/document.xml` and flatten WordprocessingML to text.

use std::io::{Cursor, Read};
use std::sync::OnceLock;

use regex::Regex;

use super::DocumentError;

const DOCUMENT_XML: &str = "word/document.xml";

/// Ceiling on the decompressed `word/document.xml`.
const MAX_EXPANDED_BYTES: u64 = 50 * 1024 * 1024;

pub fn extract_text(data: &[u8]) -> Result<String, DocumentError> {
    extract_text_within(data, MAX_EXPANDED_BYTES)
}

/// Checks the declared size, then caps the read itself; headers can understate it.
fn extract_text_within(data: &[u8], limit: u64) -> Result<String, DocumentError> {
    let mut archive =
        zip::ZipArchive::new(Cursor::new(data)).map_err(|e| DocumentError::Docx(e.to_string()))?;

    let mut entry = archive
        .by_name(DOCUMENT_XML)
        .map_err(|e| DocumentError::Docx(format!("{DOCUMENT_XML}: {e}")))?;
    let too_large = || DocumentError::Docx(format!("{DOCUMENT_XML} expands past {limit} bytes"));
    if entry.size() > limit {
        return Err(too_large());
    }

    let mut raw = Vec::new();
    entry
        .by_ref()
        .take(limit + 1)
        .read_to_end(&mut raw)
        .map_err(|e| DocumentError::Docx(e.to_string()))?;
    if raw.len() as u64 > limit {
        return Err(too_large());
    }

    let xml = String::from_utf8(raw)
        .map_err(|_| DocumentError::Docx(format!("{DOCUMENT_XML} is not valid UTF-8")))?;
    Ok(xml_to_text(&xml))
}

fn tag_pattern() -> &'static Regex {
    static TAG: OnceLock<Regex> = OnceLock::new();
    TAG.get_or_init(|| Regex::new(r"<[^>]*>").expect("static regex"))
}

fn xml_to_text(xml: &str) -> String {
    let with_breaks = xml
        .replace("</w:p>", "\n")
        .replace("<w:br/>", "\n")
        .replace("<w:tab/>", "\t");

    let stripped = tag_pattern().replace_all(&with_breaks, "");

    // &amp; last so "&amp;lt;" decodes to "&lt;", not "<"
    let decoded = stripped
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&");

    decoded
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use crate::errors::AppError;

    fn build_docx(document_xml: &str) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file(DOCUMENT_XML, zip::write::FileOptions::default())
            .unwrap();
        writer.write_all(document_xml.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_paragraphs_become_lines() {
        let xml = r#"<w:document><w:body>
            <w:p><w:r><w:t>Professional Summary</w:t></w:r></w:p>
            <w:p><w:r><w:t>Java &amp; Spring Boot</w:t></w:r><w:r><w:tab/><w:t>2019</w:t></w:r></w:p>
        </w:body></w:document>"#;
        let text = extract_text(&build_docx(xml)).unwrap();
        assert!(text.contains("Professional Summary\n"));
        assert!(text.contains("Java & Spring Boot\t2019"));
    }

    #[test]
    fn test_missing_document_xml_is_error() {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("word/styles.xml", zip::write::FileOptions::default())
            .unwrap();
        writer.write_all(b"<w:styles/>").unwrap();
        let data = writer.finish().unwrap().into_inner();

        let err = extract_text(&data).unwrap_err();
        assert!(matches!(err, DocumentError::Docx(msg) if msg.contains(DOCUMENT_XML)));
    }

    #[test]
    fn test_not_a_zip_is_error() {
        assert!(matches!(
            extract_text(b"plain bytes"),
            Err(DocumentError::Docx(_))
        ));
    }

    #[test]
    fn test_oversized_document_xml_is_rejected() {
        let body = "<w:p><w:r><w:t>padding</w:t></w:r></w:p>".repeat(100);
        let data = build_docx(&body);

        let err = extract_text_within(&data, 1024).unwrap_err();
        assert!(matches!(err, DocumentError::Docx(msg) if msg.contains("expands past 1024")));
        assert!(extract_text_within(&data, 1024 * 1024).is_ok());
    }

    #[test]
    fn test_oversized_document_maps_to_unprocessable() {
        let err = AppError::from(DocumentError::Docx("too big".to_string()));
        assert!(matches!(err, AppError::UnprocessableEntity(_)));
    }

    #[test]
    fn test_entity_decoding_order() {
        assert_eq!(xml_to_text("<w:t>a &amp;lt; b</w:t>"), "a &lt; b");
    }
}

/*!
 * DOCX exporter
 *
 * Emits a minimal WordprocessingML package: `[Content_Types].xml`,
 * `_rels/.rels` and `word/document.xml`, zipped as an OPC container.
 * All formatting is direct run formatting, so no styles part is needed.
 */

use std::path::Path;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::document::{save_atomic, DocumentSink, HeadingLevel};
use crate::error::Result;
use crate::package::ZipPackage;

const WORDML_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;

const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

const FONT_MONO: &str = "Courier New";
const COLOR_NAVY: &str = "000080";

// Run sizes in half-points
const SIZE_TITLE: &str = "48";
const SIZE_HEADING: &str = "28";
const SIZE_BODY: &str = "18";
const SIZE_CODE: &str = "16";

/// Page breaks every three files keeps individual pages manageable
const DOCX_PAGE_BREAK_CADENCE: usize = 3;

struct RunStyle {
    bold: bool,
    mono: bool,
    size: &'static str,
    color: Option<&'static str>,
}

/// DOCX document sink
pub struct DocxWriter {
    xml: Writer<Vec<u8>>,
}

impl DocxWriter {
    /// Start an empty document
    pub fn new() -> Result<Self> {
        let mut xml = Writer::new(Vec::new());
        xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;

        let mut document = BytesStart::new("w:document");
        document.push_attribute(("xmlns:w", WORDML_NS));
        xml.write_event(Event::Start(document))?;
        xml.write_event(Event::Start(BytesStart::new("w:body")))?;

        Ok(Self { xml })
    }

    fn write_paragraph(&mut self, text: &str, style: &RunStyle, centered: bool) -> Result<()> {
        self.xml.write_event(Event::Start(BytesStart::new("w:p")))?;
        if centered {
            self.xml.write_event(Event::Start(BytesStart::new("w:pPr")))?;
            let mut jc = BytesStart::new("w:jc");
            jc.push_attribute(("w:val", "center"));
            self.xml.write_event(Event::Empty(jc))?;
            self.xml.write_event(Event::End(BytesEnd::new("w:pPr")))?;
        }
        self.write_runs(text, style)?;
        self.xml.write_event(Event::End(BytesEnd::new("w:p")))?;
        Ok(())
    }

    // One run per line; newlines become <w:br/>, tabs become <w:tab/>.
    fn write_runs(&mut self, text: &str, style: &RunStyle) -> Result<()> {
        for (index, line) in text.split('\n').enumerate() {
            if index > 0 {
                self.xml.write_event(Event::Start(BytesStart::new("w:r")))?;
                self.xml.write_event(Event::Empty(BytesStart::new("w:br")))?;
                self.xml.write_event(Event::End(BytesEnd::new("w:r")))?;
            }

            let line = line.strip_suffix('\r').unwrap_or(line);
            self.xml.write_event(Event::Start(BytesStart::new("w:r")))?;
            self.write_run_props(style)?;
            for (segment_index, segment) in line.split('\t').enumerate() {
                if segment_index > 0 {
                    self.xml.write_event(Event::Empty(BytesStart::new("w:tab")))?;
                }
                if !segment.is_empty() {
                    let mut t = BytesStart::new("w:t");
                    t.push_attribute(("xml:space", "preserve"));
                    self.xml.write_event(Event::Start(t))?;
                    self.xml.write_event(Event::Text(BytesText::new(segment)))?;
                    self.xml.write_event(Event::End(BytesEnd::new("w:t")))?;
                }
            }
            self.xml.write_event(Event::End(BytesEnd::new("w:r")))?;
        }
        Ok(())
    }

    fn write_run_props(&mut self, style: &RunStyle) -> Result<()> {
        self.xml.write_event(Event::Start(BytesStart::new("w:rPr")))?;
        if style.mono {
            let mut fonts = BytesStart::new("w:rFonts");
            fonts.push_attribute(("w:ascii", FONT_MONO));
            fonts.push_attribute(("w:hAnsi", FONT_MONO));
            self.xml.write_event(Event::Empty(fonts))?;
        }
        if style.bold {
            self.xml.write_event(Event::Empty(BytesStart::new("w:b")))?;
        }
        if let Some(color) = style.color {
            let mut el = BytesStart::new("w:color");
            el.push_attribute(("w:val", color));
            self.xml.write_event(Event::Empty(el))?;
        }
        let mut sz = BytesStart::new("w:sz");
        sz.push_attribute(("w:val", style.size));
        self.xml.write_event(Event::Empty(sz))?;
        self.xml.write_event(Event::End(BytesEnd::new("w:rPr")))?;
        Ok(())
    }

    #[cfg(test)]
    fn body_xml(&self) -> &[u8] {
        self.xml.get_ref()
    }
}

impl DocumentSink for DocxWriter {
    fn add_heading(&mut self, level: HeadingLevel, text: &str) -> Result<()> {
        let (size, centered) = match level {
            HeadingLevel::Title => (SIZE_TITLE, true),
            HeadingLevel::Section => (SIZE_HEADING, false),
        };
        self.write_paragraph(
            text,
            &RunStyle {
                bold: true,
                mono: false,
                size,
                color: None,
            },
            centered,
        )
    }

    fn add_paragraph(&mut self, text: &str) -> Result<()> {
        self.write_paragraph(
            text,
            &RunStyle {
                bold: false,
                mono: true,
                size: SIZE_BODY,
                color: None,
            },
            false,
        )
    }

    fn add_file_header(&mut self, text: &str) -> Result<()> {
        self.write_paragraph(
            text,
            &RunStyle {
                bold: true,
                mono: true,
                size: SIZE_BODY,
                color: Some(COLOR_NAVY),
            },
            false,
        )
    }

    fn add_preformatted(&mut self, text: &str) -> Result<()> {
        self.write_paragraph(
            text,
            &RunStyle {
                bold: false,
                mono: true,
                size: SIZE_CODE,
                color: None,
            },
            false,
        )
    }

    fn add_page_break(&mut self) -> Result<()> {
        self.xml.write_event(Event::Start(BytesStart::new("w:p")))?;
        self.xml.write_event(Event::Start(BytesStart::new("w:r")))?;
        let mut br = BytesStart::new("w:br");
        br.push_attribute(("w:type", "page"));
        self.xml.write_event(Event::Empty(br))?;
        self.xml.write_event(Event::End(BytesEnd::new("w:r")))?;
        self.xml.write_event(Event::End(BytesEnd::new("w:p")))?;
        Ok(())
    }

    fn page_break_cadence(&self) -> usize {
        DOCX_PAGE_BREAK_CADENCE
    }

    fn save(&mut self, path: &Path) -> Result<()> {
        self.xml.write_event(Event::End(BytesEnd::new("w:body")))?;
        self.xml.write_event(Event::End(BytesEnd::new("w:document")))?;

        let xml = std::mem::replace(&mut self.xml, Writer::new(Vec::new()));
        let document = xml.into_inner();

        let mut package = ZipPackage::new();
        package.add_part("[Content_Types].xml", CONTENT_TYPES.as_bytes())?;
        package.add_part("_rels/.rels", PACKAGE_RELS.as_bytes())?;
        package.add_part("word/document.xml", &document)?;
        let bytes = package.finish()?;

        save_atomic(path, &bytes)
    }
}

#[cfg(test)]
mod tests {
    use quick_xml::events::Event;
    use quick_xml::Reader;
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn markup_characters_are_escaped() {
        let mut writer = DocxWriter::new().unwrap();
        writer.add_paragraph("a < b && c > d").unwrap();
        let xml = String::from_utf8(writer.body_xml().to_vec()).unwrap();
        assert!(xml.contains("a &lt; b &amp;&amp; c &gt; d"));
        assert!(!xml.contains("a < b"));
    }

    #[test]
    fn preformatted_preserves_whitespace_and_breaks() {
        let mut writer = DocxWriter::new().unwrap();
        writer.add_preformatted("│   ├── src\n\tindented").unwrap();
        let xml = String::from_utf8(writer.body_xml().to_vec()).unwrap();
        assert!(xml.contains(r#"<w:t xml:space="preserve">│   ├── src</w:t>"#));
        assert!(xml.contains("<w:br/>"));
        assert!(xml.contains("<w:tab/>"));
    }

    #[test]
    fn heading_levels_differ_in_size() {
        let mut writer = DocxWriter::new().unwrap();
        writer.add_heading(HeadingLevel::Title, "Title").unwrap();
        writer.add_heading(HeadingLevel::Section, "Section").unwrap();
        let xml = String::from_utf8(writer.body_xml().to_vec()).unwrap();
        assert!(xml.contains(r#"<w:sz w:val="48"/>"#));
        assert!(xml.contains(r#"<w:sz w:val="28"/>"#));
        assert!(xml.contains(r#"<w:jc w:val="center"/>"#));
    }

    #[test]
    fn file_header_is_bold_navy() {
        let mut writer = DocxWriter::new().unwrap();
        writer.add_file_header("File: src/main.rs").unwrap();
        let xml = String::from_utf8(writer.body_xml().to_vec()).unwrap();
        assert!(xml.contains("<w:b/>"));
        assert!(xml.contains(r#"<w:color w:val="000080"/>"#));
    }

    #[test]
    fn body_xml_is_well_formed_after_save_prelude() {
        let mut writer = DocxWriter::new().unwrap();
        writer.add_heading(HeadingLevel::Title, "Repository Dump").unwrap();
        writer.add_paragraph("one").unwrap();
        writer.add_page_break().unwrap();
        writer.add_preformatted("fn main() {}\n").unwrap();

        // Close the document the way save() does, without packaging
        writer
            .xml
            .write_event(Event::End(BytesEnd::new("w:body")))
            .unwrap();
        writer
            .xml
            .write_event(Event::End(BytesEnd::new("w:document")))
            .unwrap();

        let xml = String::from_utf8(writer.body_xml().to_vec()).unwrap();
        let mut reader = Reader::from_str(&xml);
        let mut depth = 0i32;
        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(_)) => depth += 1,
                Ok(Event::End(_)) => depth -= 1,
                Ok(Event::Eof) => break,
                Err(e) => panic!("Error parsing XML: {}", e),
                _ => (),
            }
            buf.clear();
        }
        assert_eq!(depth, 0, "document XML is not well-balanced");
    }

    #[test]
    fn save_produces_zip_package() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("out.docx");

        let mut writer = DocxWriter::new().unwrap();
        writer.add_paragraph("hello").unwrap();
        writer.save(&out).unwrap();

        let bytes = std::fs::read(&out).unwrap();
        assert_eq!(&bytes[..4], b"PK\x03\x04");
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("word/document.xml"));
        assert!(text.contains("[Content_Types].xml"));
    }
}

/*!
 * PDF exporter
 *
 * Assembles a PDF 1.4 file directly: letter pages, base-14 Type1 fonts
 * with WinAnsi encoding, one uncompressed content stream per page, and a
 * classic xref table. Text is laid out line by line; long lines are not
 * wrapped.
 */

use std::path::Path;

use crate::document::{save_atomic, DocumentSink, HeadingLevel};
use crate::error::Result;

const PAGE_WIDTH: f32 = 612.0;
const PAGE_HEIGHT: f32 = 792.0;
const MARGIN: f32 = 36.0;
const CONTENT_HEIGHT: f32 = PAGE_HEIGHT - 2.0 * MARGIN;

/// Page breaks every two files, the PDF flow being denser per page
const PDF_PAGE_BREAK_CADENCE: usize = 2;

const NAVY: (f32, f32, f32) = (0.0, 0.0, 0.5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PdfFont {
    Helvetica,
    HelveticaBold,
    Courier,
    CourierBold,
}

impl PdfFont {
    const ALL: [PdfFont; 4] = [
        Self::Helvetica,
        Self::HelveticaBold,
        Self::Courier,
        Self::CourierBold,
    ];

    fn resource(self) -> &'static str {
        match self {
            Self::Helvetica => "F1",
            Self::HelveticaBold => "F2",
            Self::Courier => "F3",
            Self::CourierBold => "F4",
        }
    }

    fn base_font(self) -> &'static str {
        match self {
            Self::Helvetica => "Helvetica",
            Self::HelveticaBold => "Helvetica-Bold",
            Self::Courier => "Courier",
            Self::CourierBold => "Courier-Bold",
        }
    }
}

struct PdfLine {
    font: PdfFont,
    size: f32,
    leading: f32,
    color: Option<(f32, f32, f32)>,
    text: String,
}

/// PDF document sink
pub struct PdfWriter {
    pages: Vec<Vec<PdfLine>>,
    current: Vec<PdfLine>,
    used: f32,
}

impl PdfWriter {
    /// Start an empty document
    pub fn new() -> Self {
        Self {
            pages: Vec::new(),
            current: Vec::new(),
            used: 0.0,
        }
    }

    fn push_line(
        &mut self,
        font: PdfFont,
        size: f32,
        leading: f32,
        color: Option<(f32, f32, f32)>,
        text: &str,
    ) {
        if self.used + leading > CONTENT_HEIGHT && !self.current.is_empty() {
            self.flush_page();
        }
        self.current.push(PdfLine {
            font,
            size,
            leading,
            color,
            text: text.to_string(),
        });
        self.used += leading;
    }

    fn spacer(&mut self, leading: f32) {
        self.push_line(PdfFont::Helvetica, 0.0, leading, None, "");
    }

    fn flush_page(&mut self) {
        self.pages.push(std::mem::take(&mut self.current));
        self.used = 0.0;
    }

    /// Build the text operators for one page. Every line sets its font
    /// and fill color explicitly; graphics state persists within a
    /// content stream otherwise.
    fn page_content(page: &[PdfLine]) -> Vec<u8> {
        let mut ops = Vec::new();
        let mut y = PAGE_HEIGHT - MARGIN;
        for line in page {
            y -= line.leading;
            if line.text.is_empty() {
                continue;
            }
            let (r, g, b) = line.color.unwrap_or((0.0, 0.0, 0.0));
            ops.extend(
                format!(
                    "BT /{} {} Tf {} {} {} rg {} {:.1} Td (",
                    line.font.resource(),
                    line.size,
                    r,
                    g,
                    b,
                    MARGIN,
                    y
                )
                .into_bytes(),
            );
            ops.extend(encode_pdf_string(&line.text));
            ops.extend(b") Tj ET\n");
        }
        ops
    }

    /// Serialize the whole document: header, objects, xref, trailer
    fn to_bytes(&mut self) -> Vec<u8> {
        if !self.current.is_empty() || self.pages.is_empty() {
            self.flush_page();
        }

        let page_count = self.pages.len();
        // Objects: 1 catalog, 2 page tree, 3-6 fonts, then a page object
        // and a content object per page.
        let object_count = 6 + 2 * page_count;

        let mut out: Vec<u8> = Vec::new();
        out.extend(b"%PDF-1.4\n%\xe2\xe3\xcf\xd3\n");

        let mut offsets: Vec<usize> = Vec::with_capacity(object_count);

        let begin_object = |out: &mut Vec<u8>, offsets: &mut Vec<usize>, id: usize| {
            offsets.push(out.len());
            out.extend(format!("{} 0 obj\n", id).into_bytes());
        };

        begin_object(&mut out, &mut offsets, 1);
        out.extend(b"<< /Type /Catalog /Pages 2 0 R >>\nendobj\n");

        begin_object(&mut out, &mut offsets, 2);
        let kids: Vec<String> = (0..page_count)
            .map(|i| format!("{} 0 R", 7 + 2 * i))
            .collect();
        out.extend(
            format!(
                "<< /Type /Pages /Kids [{}] /Count {} >>\nendobj\n",
                kids.join(" "),
                page_count
            )
            .into_bytes(),
        );

        for (index, font) in PdfFont::ALL.iter().enumerate() {
            begin_object(&mut out, &mut offsets, 3 + index);
            out.extend(
                format!(
                    "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>\nendobj\n",
                    font.base_font()
                )
                .into_bytes(),
            );
        }

        for (index, page) in self.pages.iter().enumerate() {
            let page_id = 7 + 2 * index;
            let content_id = page_id + 1;

            begin_object(&mut out, &mut offsets, page_id);
            out.extend(
                format!(
                    "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] \
                     /Resources << /Font << /F1 3 0 R /F2 4 0 R /F3 5 0 R /F4 6 0 R >> >> \
                     /Contents {} 0 R >>\nendobj\n",
                    PAGE_WIDTH, PAGE_HEIGHT, content_id
                )
                .into_bytes(),
            );

            let content = Self::page_content(page);
            begin_object(&mut out, &mut offsets, content_id);
            out.extend(format!("<< /Length {} >>\nstream\n", content.len()).into_bytes());
            out.extend(&content);
            out.extend(b"endstream\nendobj\n");
        }

        let xref_offset = out.len();
        out.extend(format!("xref\n0 {}\n", object_count + 1).into_bytes());
        out.extend(b"0000000000 65535 f\r\n");
        for offset in &offsets {
            out.extend(format!("{:010} 00000 n\r\n", offset).into_bytes());
        }
        out.extend(
            format!(
                "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
                object_count + 1,
                xref_offset
            )
            .into_bytes(),
        );

        out
    }
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentSink for PdfWriter {
    fn add_heading(&mut self, level: HeadingLevel, text: &str) -> Result<()> {
        match level {
            HeadingLevel::Title => {
                self.push_line(PdfFont::HelveticaBold, 16.0, 20.0, None, text);
                self.spacer(12.0);
            }
            HeadingLevel::Section => {
                self.push_line(PdfFont::HelveticaBold, 12.0, 16.0, None, text);
                self.spacer(6.0);
            }
        }
        Ok(())
    }

    fn add_paragraph(&mut self, text: &str) -> Result<()> {
        self.push_line(PdfFont::Helvetica, 10.0, 13.0, None, text);
        Ok(())
    }

    fn add_file_header(&mut self, text: &str) -> Result<()> {
        self.push_line(PdfFont::CourierBold, 9.0, 11.0, Some(NAVY), text);
        Ok(())
    }

    fn add_preformatted(&mut self, text: &str) -> Result<()> {
        for line in text.split('\n') {
            let line = line.strip_suffix('\r').unwrap_or(line);
            let line = line.replace('\t', "    ");
            self.push_line(PdfFont::Courier, 7.0, 9.0, None, &line);
        }
        Ok(())
    }

    fn add_page_break(&mut self) -> Result<()> {
        if !self.current.is_empty() {
            self.flush_page();
        }
        Ok(())
    }

    fn page_break_cadence(&self) -> usize {
        PDF_PAGE_BREAK_CADENCE
    }

    fn save(&mut self, path: &Path) -> Result<()> {
        let bytes = self.to_bytes();
        save_atomic(path, &bytes)
    }
}

/// Map text to a parenthesized PDF string body in WinAnsi bytes,
/// escaping `\`, `(` and `)`. Unmappable characters become `?`.
fn encode_pdf_string(text: &str) -> Vec<u8> {
    let mut out = Vec::new();
    for c in text.chars() {
        let byte = match c as u32 {
            0x20..=0x7e => c as u8,
            0xa0..=0xff => (c as u32) as u8,
            0x20ac => 0x80, // euro sign in WinAnsi
            _ => b'?',
        };
        if matches!(byte, b'(' | b')' | b'\\') {
            out.push(b'\\');
        }
        out.push(byte);
    }
    out
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn escapes_string_delimiters() {
        assert_eq!(encode_pdf_string(r"a(b)c\d"), br"a\(b\)c\\d".to_vec());
    }

    #[test]
    fn maps_latin1_and_euro_to_winansi() {
        assert_eq!(encode_pdf_string("é"), vec![0xe9]);
        assert_eq!(encode_pdf_string("€"), vec![0x80]);
        // Outside WinAnsi
        assert_eq!(encode_pdf_string("→"), vec![b'?']);
    }

    #[test]
    fn document_has_header_trailer_and_fonts() {
        let mut writer = PdfWriter::new();
        writer.add_heading(HeadingLevel::Title, "Repository Dump").unwrap();
        writer.add_paragraph("Root Directory: /tmp/x").unwrap();
        let bytes = writer.to_bytes();

        assert!(bytes.starts_with(b"%PDF-1.4"));
        assert!(bytes.ends_with(b"%%EOF\n"));
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("/BaseFont /Courier"));
        assert!(text.contains("/BaseFont /Helvetica-Bold"));
        assert!(text.contains("(Repository Dump) Tj"));
    }

    #[test]
    fn page_break_starts_new_page() {
        let mut writer = PdfWriter::new();
        writer.add_paragraph("first page").unwrap();
        writer.add_page_break().unwrap();
        writer.add_paragraph("second page").unwrap();
        let bytes = writer.to_bytes();

        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("/Count 2"));
    }

    #[test]
    fn page_break_on_empty_page_is_noop() {
        let mut writer = PdfWriter::new();
        writer.add_page_break().unwrap();
        writer.add_page_break().unwrap();
        writer.add_paragraph("only page").unwrap();
        let bytes = writer.to_bytes();
        assert!(String::from_utf8_lossy(&bytes).contains("/Count 1"));
    }

    #[test]
    fn long_preformatted_block_overflows_to_new_pages() {
        let mut writer = PdfWriter::new();
        // 90 code lines at 9pt leading exceed one 720pt-tall content area
        let block: Vec<String> = (0..90).map(|i| format!("line {}", i)).collect();
        writer.add_preformatted(&block.join("\n")).unwrap();
        let bytes = writer.to_bytes();
        assert!(String::from_utf8_lossy(&bytes).contains("/Count 2"));
    }

    #[test]
    fn xref_offsets_point_at_objects() {
        let mut writer = PdfWriter::new();
        writer.add_paragraph("x").unwrap();
        let bytes = writer.to_bytes();
        let text = String::from_utf8_lossy(&bytes);

        // First object entry in the xref table must point at "1 0 obj"
        let xref_pos = text.rfind("xref\n").unwrap();
        let first_entry = &text[xref_pos..].lines().nth(3).unwrap()[..10];
        let offset: usize = first_entry.parse().unwrap();
        // Index into the raw bytes; the lossy string shifts offsets at the
        // binary comment line.
        assert!(bytes[offset..].starts_with(b"1 0 obj"));
    }

    #[test]
    fn save_writes_pdf_file() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("out.pdf");
        let mut writer = PdfWriter::new();
        writer.add_paragraph("hello").unwrap();
        writer.save(&out).unwrap();

        let bytes = std::fs::read(&out).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.4"));
    }
}

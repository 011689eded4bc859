/*!
 * Format-agnostic document rendering
 *
 * Exporters implement the narrow [`DocumentSink`] capability; the dump
 * layout itself lives in [`render_dump`] and is identical for every
 * format.
 */

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::config::Config;
use crate::error::Result;
use crate::sanitize::sanitize;
use crate::types::FileEntry;

/// Heading weight within the document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingLevel {
    /// Document title
    Title,
    /// Section heading
    Section,
}

/// Capability a format renderer must provide
pub trait DocumentSink {
    /// Append a heading
    fn add_heading(&mut self, level: HeadingLevel, text: &str) -> Result<()>;
    /// Append a body paragraph
    fn add_paragraph(&mut self, text: &str) -> Result<()>;
    /// Append a visually distinct per-file header line
    fn add_file_header(&mut self, text: &str) -> Result<()>;
    /// Append a fixed-width block, whitespace preserved
    fn add_preformatted(&mut self, text: &str) -> Result<()>;
    /// Start a new page
    fn add_page_break(&mut self) -> Result<()>;
    /// Number of files rendered between page breaks
    fn page_break_cadence(&self) -> usize;
    /// Serialize and atomically write the document to `path`
    fn save(&mut self, path: &Path) -> Result<()>;
}

/// Render the full dump into a sink: title, metadata, tree view, then
/// every file's content, with a page break after each cadence of files
/// and a footer naming the total.
///
/// A file whose content the sink rejects is replaced by an inline
/// diagnostic paragraph; the run continues.
pub fn render_dump<S: DocumentSink>(
    sink: &mut S,
    config: &Config,
    tree_lines: &[String],
    files: &[FileEntry],
) -> Result<()> {
    let root_name = config
        .root_dir
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| config.root_dir.display().to_string());

    sink.add_heading(HeadingLevel::Title, "Repository Dump")?;
    sink.add_paragraph(&format!("Root Directory: {}", config.root_dir.display()))?;
    sink.add_paragraph(&"=".repeat(60))?;

    sink.add_heading(HeadingLevel::Section, "Directory Structure")?;
    let tree_text = format!("{}/\n{}", root_name, tree_lines.join("\n"));
    sink.add_preformatted(&sanitize(&tree_text))?;
    sink.add_page_break()?;

    sink.add_heading(
        HeadingLevel::Section,
        &format!("File Contents ({} files)", files.len()),
    )?;

    let cadence = sink.page_break_cadence();
    for (index, file) in files.iter().enumerate() {
        sink.add_paragraph(&"─".repeat(60))?;
        sink.add_file_header(&format!("File: {}", file.relative_path.display()))?;
        sink.add_paragraph(&"─".repeat(60))?;

        if let Err(e) = sink.add_preformatted(&file.content) {
            sink.add_paragraph(&format!("[Error adding content: {}]", e))?;
        }
        sink.add_paragraph("")?;

        if (index + 1) % cadence == 0 {
            sink.add_page_break()?;
        }
    }

    sink.add_paragraph(&"=".repeat(60))?;
    sink.add_paragraph(&format!("Total files processed: {}", files.len()))?;

    Ok(())
}

/// Write `bytes` to a temporary file beside `path`, then rename it into
/// place. An interrupted run leaves at most a stray temp file, never a
/// half-written document under the final name.
pub(crate) fn save_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.persist(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::error::DumpError;

    /// Sink that records the call sequence and can reject one block
    #[derive(Default)]
    struct RecordingSink {
        calls: Vec<String>,
        reject_containing: Option<String>,
    }

    impl DocumentSink for RecordingSink {
        fn add_heading(&mut self, level: HeadingLevel, text: &str) -> Result<()> {
            self.calls.push(format!("heading({:?}): {}", level, text));
            Ok(())
        }

        fn add_paragraph(&mut self, text: &str) -> Result<()> {
            self.calls.push(format!("para: {}", text));
            Ok(())
        }

        fn add_file_header(&mut self, text: &str) -> Result<()> {
            self.calls.push(format!("file_header: {}", text));
            Ok(())
        }

        fn add_preformatted(&mut self, text: &str) -> Result<()> {
            if let Some(needle) = &self.reject_containing {
                if text.contains(needle.as_str()) {
                    return Err(DumpError::Document("unembeddable content".into()));
                }
            }
            self.calls.push(format!("pre: {}", text));
            Ok(())
        }

        fn add_page_break(&mut self) -> Result<()> {
            self.calls.push("page_break".into());
            Ok(())
        }

        fn page_break_cadence(&self) -> usize {
            2
        }

        fn save(&mut self, _path: &Path) -> Result<()> {
            self.calls.push("save".into());
            Ok(())
        }
    }

    fn entry(path: &str, content: &str) -> FileEntry {
        FileEntry {
            relative_path: PathBuf::from(path),
            content: content.to_string(),
        }
    }

    fn test_config() -> Config {
        Config::new(PathBuf::from("/work/project"))
    }

    #[test]
    fn renders_sections_in_order() {
        let mut sink = RecordingSink::default();
        let tree = vec!["├── a.txt".to_string(), "└── b.txt".to_string()];
        let files = vec![entry("a.txt", "alpha"), entry("b.txt", "beta")];

        render_dump(&mut sink, &test_config(), &tree, &files).unwrap();

        assert_eq!(sink.calls[0], "heading(Title): Repository Dump");
        assert_eq!(sink.calls[1], "para: Root Directory: /work/project");
        assert!(sink.calls[3].starts_with("heading(Section): Directory Structure"));
        assert_eq!(sink.calls[4], "pre: project/\n├── a.txt\n└── b.txt");
        assert_eq!(sink.calls[5], "page_break");
        assert_eq!(sink.calls[6], "heading(Section): File Contents (2 files)");
        assert!(sink.calls.contains(&"pre: alpha".to_string()));
        assert!(sink.calls.contains(&"pre: beta".to_string()));
        assert_eq!(
            sink.calls.last().unwrap(),
            "para: Total files processed: 2"
        );
    }

    #[test]
    fn page_break_every_cadence_files() {
        let mut sink = RecordingSink::default();
        let files = vec![
            entry("a.txt", "a"),
            entry("b.txt", "b"),
            entry("c.txt", "c"),
        ];

        render_dump(&mut sink, &test_config(), &[], &files).unwrap();

        // One break after the tree, one after the second file, none after
        // the trailing odd file.
        let breaks = sink.calls.iter().filter(|c| *c == "page_break").count();
        assert_eq!(breaks, 2);

        let second_pre = sink.calls.iter().position(|c| c == "pre: b").unwrap();
        assert_eq!(sink.calls[second_pre + 2], "page_break");
    }

    #[test]
    fn embedding_failure_degrades_to_diagnostic() {
        let mut sink = RecordingSink {
            reject_containing: Some("bad".into()),
            ..Default::default()
        };
        let files = vec![entry("bad.txt", "bad stuff"), entry("ok.txt", "fine")];

        render_dump(&mut sink, &test_config(), &[], &files).unwrap();

        assert!(sink
            .calls
            .iter()
            .any(|c| c.starts_with("para: [Error adding content:")));
        assert!(sink.calls.contains(&"pre: fine".to_string()));
        assert_eq!(
            sink.calls.last().unwrap(),
            "para: Total files processed: 2"
        );
    }

    #[test]
    fn tree_text_is_sanitized_before_sink() {
        let mut sink = RecordingSink::default();
        let tree = vec!["├── bad\x00name".to_string()];

        render_dump(&mut sink, &test_config(), &tree, &[]).unwrap();

        assert!(sink.calls.contains(&"pre: project/\n├── badname".to_string()));
    }

    #[test]
    fn atomic_save_writes_final_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.bin");
        save_atomic(&target, b"payload").unwrap();
        assert_eq!(std::fs::read(&target).unwrap(), b"payload");
    }
}

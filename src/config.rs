/*!
 * Run configuration for repodump
 */

use std::io;
use std::path::PathBuf;

use strum::{Display, EnumString};

/// Default DOCX output file name
pub const DEFAULT_DOCX_OUTPUT: &str = "repo_dump.docx";
/// Default PDF output file name
pub const DEFAULT_PDF_OUTPUT: &str = "repo_dump.pdf";

/// Output formats selectable at the prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum OutputFormat {
    /// Word document (.docx)
    #[strum(serialize = "docx")]
    Docx,
    /// PDF document (.pdf)
    #[strum(serialize = "pdf")]
    Pdf,
    /// Both formats, produced sequentially
    #[strum(serialize = "both")]
    Both,
}

impl OutputFormat {
    /// Parse the interactive menu choice (1/2/3)
    pub fn from_choice(choice: &str) -> Option<Self> {
        match choice.trim() {
            "1" => Some(Self::Docx),
            "2" => Some(Self::Pdf),
            "3" => Some(Self::Both),
            _ => None,
        }
    }

    /// Whether a DOCX document should be produced
    pub fn wants_docx(self) -> bool {
        matches!(self, Self::Docx | Self::Both)
    }

    /// Whether a PDF document should be produced
    pub fn wants_pdf(self) -> bool {
        matches!(self, Self::Pdf | Self::Both)
    }
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// Directory to scan; always the working directory at invocation
    pub root_dir: PathBuf,
    /// DOCX output path
    pub docx_output: PathBuf,
    /// PDF output path
    pub pdf_output: PathBuf,
}

impl Config {
    /// Build the configuration for a scan rooted at `root_dir`, writing
    /// outputs under the default names in that same directory.
    pub fn new(root_dir: PathBuf) -> Self {
        let docx_output = root_dir.join(DEFAULT_DOCX_OUTPUT);
        let pdf_output = root_dir.join(DEFAULT_PDF_OUTPUT);
        Self {
            root_dir,
            docx_output,
            pdf_output,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> io::Result<()> {
        if !self.root_dir.exists() || !self.root_dir.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("Scan root not found: {}", self.root_dir.display()),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choice_parsing() {
        assert_eq!(OutputFormat::from_choice("1"), Some(OutputFormat::Docx));
        assert_eq!(OutputFormat::from_choice(" 2 "), Some(OutputFormat::Pdf));
        assert_eq!(OutputFormat::from_choice("3"), Some(OutputFormat::Both));
        assert_eq!(OutputFormat::from_choice("4"), None);
        assert_eq!(OutputFormat::from_choice(""), None);
    }

    #[test]
    fn both_selects_both_formats() {
        assert!(OutputFormat::Both.wants_docx());
        assert!(OutputFormat::Both.wants_pdf());
        assert!(OutputFormat::Docx.wants_docx());
        assert!(!OutputFormat::Docx.wants_pdf());
        assert!(!OutputFormat::Pdf.wants_docx());
    }

    #[test]
    fn default_output_paths_live_under_root() {
        let config = Config::new(PathBuf::from("/tmp/project"));
        assert_eq!(config.docx_output, PathBuf::from("/tmp/project/repo_dump.docx"));
        assert_eq!(config.pdf_output, PathBuf::from("/tmp/project/repo_dump.pdf"));
    }
}

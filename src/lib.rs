/*!
 * RepoDump - Export a directory tree and its text file contents as a
 * single reviewable Word or PDF document.
 *
 * The pipeline classifies filesystem entries, renders a tree view of the
 * hierarchy, reads every includable text file with encoding fallbacks,
 * and feeds the result to one or both format renderers.
 */

pub mod classify;
pub mod config;
pub mod document;
pub mod docx;
pub mod error;
pub mod package;
pub mod pdf;
pub mod reader;
pub mod report;
pub mod sanitize;
pub mod scanner;
pub mod types;
pub mod utils;


// Re-export main components for easier access
pub use config::{Config, OutputFormat};
pub use document::{render_dump, DocumentSink, HeadingLevel};
pub use docx::DocxWriter;
pub use error::{DumpError, Result};
pub use pdf::PdfWriter;
pub use report::{FileReportInfo, ReportFormat, Reporter, ScanReport};
pub use scanner::Scanner;
pub use types::FileEntry;
pub use utils::{count_candidate_files, format_file_size};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

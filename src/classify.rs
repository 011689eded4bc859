/*!
 * File and directory classification rules
 *
 * All classification is name/extension based; no content sniffing is
 * performed. The tables are process-wide immutable constants.
 */

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;

/// Maximum size for files with an unrecognized extension (10 MiB)
pub const MAX_UNKNOWN_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Extensions (lowercase, no leading dot) treated as text
pub static TEXT_EXTENSIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    HashSet::from([
        // Code
        "py", "js", "jsx", "ts", "tsx", "html", "css", "scss", "sass", "c", "cpp", "h", "hpp",
        "java", "go", "rs", "php", "rb", "sh", "bash", "sql", "r", "m", "swift", "kt", "scala",
        "vue", "svelte",
        // Data and markup
        "json", "xml", "yaml", "yml", "txt", "md", "markdown", "rst", "csv", "tsv",
        // Configuration
        "conf", "config", "ini", "toml", "env", "editorconfig", "gitignore", "dockerignore",
        // Logs
        "log",
    ])
});

/// Extensions (lowercase, no leading dot) treated as binary or media
pub static BINARY_EXTENSIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    HashSet::from([
        // Images
        "png", "jpg", "jpeg", "gif", "bmp", "ico", "svg", "webp",
        // Audio and video
        "mp4", "avi", "mov", "mkv", "mp3", "wav", "flac",
        // Archives
        "zip", "tar", "gz", "rar", "7z", "bz2",
        // Executables and libraries
        "exe", "dll", "so", "dylib", "bin",
        // Office documents
        "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx",
        // Compiled artifacts
        "pyc", "pyo", "class", "o", "obj",
        // Databases
        "db", "sqlite", "sqlite3",
    ])
});

/// Directory names that are never descended into
pub static SKIP_DIRECTORIES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    HashSet::from([
        // Version control
        ".git", ".svn", ".hg",
        // Dependency caches
        "node_modules", "__pycache__",
        // Virtual environments
        ".venv", "venv", "env", ".env", "virtualenv",
        // Editors and IDEs
        ".idea", ".vscode", ".vs", ".pytest_cache", ".mypy_cache",
        // Build output
        "dist", "build", ".eggs", "target",
    ])
});

/// Extensionless file names (lowercase) included by convention
static CONVENTIONAL_NAMES: Lazy<HashSet<&'static str>> =
    Lazy::new(|| HashSet::from(["makefile", "dockerfile", "readme", "license", "changelog"]));

/// Verdict for a single filesystem entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Text file whose content is collected
    Include,
    /// File with a known binary/media extension
    ExcludeBinary,
    /// Directory on the skip list (or dot-prefixed)
    ExcludeDirectory,
    /// Anything else (unstattable, oversized unknown, special file)
    ExcludeOther,
}

/// Check whether a directory name is on the skip list
pub fn should_skip_directory(dir_name: &str) -> bool {
    SKIP_DIRECTORIES.contains(dir_name) || dir_name.starts_with('.')
}

/// Decide whether a file's content should be collected
pub fn should_include_file(path: &Path) -> bool {
    classify_file(path) == Classification::Include
}

/// Classify a file by extension and conventional name.
///
/// Files with an unrecognized extension are treated as probably-text and
/// included when they stat successfully at 10 MiB or less. A binary file
/// that slips through this way produces garbled or sanitized-to-empty
/// output; accepted limitation.
pub fn classify_file(path: &Path) -> Classification {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase());
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    if let Some(ext) = &ext {
        if BINARY_EXTENSIONS.contains(ext.as_str()) {
            return Classification::ExcludeBinary;
        }
        if TEXT_EXTENSIONS.contains(ext.as_str()) {
            return Classification::Include;
        }
    } else if CONVENTIONAL_NAMES.contains(name.as_str()) {
        return Classification::Include;
    }

    match fs::metadata(path) {
        Ok(meta) if meta.len() <= MAX_UNKNOWN_FILE_SIZE => Classification::Include,
        _ => Classification::ExcludeOther,
    }
}

/*!
 * Directory traversal: tree view rendering and content collection
 */

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use indicatif::ProgressBar;
use walkdir::{DirEntry, WalkDir};

use crate::classify::{should_include_file, should_skip_directory};
use crate::config::Config;
use crate::reader::read_file_content;
use crate::types::FileEntry;

/// Connector for an entry with following siblings
pub const TREE_BRANCH: &str = "├── ";
/// Connector for the last entry in a directory
pub const TREE_LAST: &str = "└── ";
/// Continuation token for an ancestor with following siblings
pub const TREE_VERTICAL: &str = "│   ";
/// Continuation token for a last-sibling ancestor
pub const TREE_SPACE: &str = "    ";

/// Scanner for directory trees
pub struct Scanner {
    /// Scanner configuration
    config: Config,
    /// Progress bar advanced once per collected file
    progress: ProgressBar,
}

impl Scanner {
    /// Create a new scanner
    pub fn new(config: Config, progress: ProgressBar) -> Self {
        Self { config, progress }
    }

    /// Render the directory hierarchy as indented, connector-decorated
    /// lines, depth-first pre-order.
    ///
    /// Skip-listed directories are pruned; file inclusion rules are not —
    /// every non-skipped file appears in the tree whether or not its
    /// content will be collected. Enumeration errors become marker lines,
    /// never failures.
    pub fn generate_tree(&self) -> Vec<String> {
        let mut lines = Vec::new();
        let mut visited = HashSet::new();
        mark_visited(&self.config.root_dir, &mut visited);
        self.tree_walk(&self.config.root_dir, "", &mut visited, &mut lines);
        lines
    }

    fn tree_walk(
        &self,
        dir: &Path,
        prefix: &str,
        visited: &mut HashSet<PathBuf>,
        lines: &mut Vec<String>,
    ) {
        let entries = match list_entries(dir) {
            Ok(entries) => entries,
            Err(e) => {
                lines.push(error_marker(prefix, &e));
                return;
            }
        };

        let last = entries.len().saturating_sub(1);
        for (index, entry) in entries.iter().enumerate() {
            let is_last = index == last;
            let connector = if is_last { TREE_LAST } else { TREE_BRANCH };
            let name = entry.file_name().to_string_lossy();

            if entry.file_type().is_dir() {
                lines.push(format!("{prefix}{connector}{name}/"));
                // Skip directories whose canonical path was already seen,
                // so symlink cycles cannot recurse forever.
                if mark_visited(entry.path(), visited) {
                    let extension = if is_last { TREE_SPACE } else { TREE_VERTICAL };
                    self.tree_walk(entry.path(), &format!("{prefix}{extension}"), visited, lines);
                }
            } else {
                lines.push(format!("{prefix}{connector}{name}"));
            }
        }
    }

    /// Collect (relative path, content) pairs for every includable file,
    /// in the same order the tree view uses.
    pub fn collect_contents(&self) -> Vec<FileEntry> {
        let mut files = Vec::new();
        let mut visited = HashSet::new();
        let base = self.config.root_dir.clone();
        mark_visited(&base, &mut visited);
        self.collect_walk(&base, &base, &mut visited, &mut files);
        files
    }

    fn collect_walk(
        &self,
        dir: &Path,
        base: &Path,
        visited: &mut HashSet<PathBuf>,
        files: &mut Vec<FileEntry>,
    ) {
        // Enumeration failures drop this subtree's contribution with no
        // marker; the tree view records them instead. Known asymmetry,
        // kept as-is.
        let entries = match list_entries(dir) {
            Ok(entries) => entries,
            Err(_) => return,
        };

        for entry in entries {
            if entry.file_type().is_dir() {
                if mark_visited(entry.path(), visited) {
                    self.collect_walk(entry.path(), base, visited, files);
                }
            } else if entry.file_type().is_file() && should_include_file(entry.path()) {
                let relative_path = entry
                    .path()
                    .strip_prefix(base)
                    .unwrap_or(entry.path())
                    .to_path_buf();

                self.progress.inc(1);
                self.progress
                    .set_message(format!("Current file: {}", relative_path.display()));

                let content = read_file_content(entry.path());
                files.push(FileEntry {
                    relative_path,
                    content,
                });
            }
        }
    }
}

/// List one directory level, skip-listed directories removed, ordered
/// directories-first then case-insensitive by name.
fn list_entries(dir: &Path) -> Result<Vec<DirEntry>, walkdir::Error> {
    let mut entries = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by(sibling_order)
    {
        let entry = entry?;
        if entry.file_type().is_dir() && should_skip_directory(&entry.file_name().to_string_lossy())
        {
            continue;
        }
        entries.push(entry);
    }
    Ok(entries)
}

fn sibling_order(a: &DirEntry, b: &DirEntry) -> Ordering {
    let key = |e: &DirEntry| {
        (
            !e.file_type().is_dir(),
            e.file_name().to_string_lossy().to_lowercase(),
        )
    };
    key(a).cmp(&key(b))
}

fn error_marker(prefix: &str, err: &walkdir::Error) -> String {
    if err.io_error().map(|e| e.kind()) == Some(io::ErrorKind::PermissionDenied) {
        format!("{prefix}[Permission Denied]")
    } else {
        format!("{prefix}[Error: {err}]")
    }
}

/// Record a directory's canonical path; returns false when it was
/// already seen (symlink cycle). Paths that fail to canonicalize are
/// walked anyway.
fn mark_visited(dir: &Path, visited: &mut HashSet<PathBuf>) -> bool {
    match fs::canonicalize(dir) {
        Ok(real) => visited.insert(real),
        Err(_) => true,
    }
}

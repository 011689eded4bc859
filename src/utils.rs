/*!
 * Utility functions for repodump
 */

use std::path::Path;

use walkdir::WalkDir;

use crate::classify::{should_include_file, should_skip_directory};

/// Count includable files under `root` so the progress bar has a length.
///
/// Uses the same skip and inclusion rules as the collector, but ignores
/// enumeration errors entirely; a short count only makes the bar finish
/// early.
pub fn count_candidate_files(root: &Path) -> u64 {
    WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| {
            e.depth() == 0
                || !(e.file_type().is_dir()
                    && should_skip_directory(&e.file_name().to_string_lossy()))
        })
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file() && should_include_file(e.path()))
        .count() as u64
}

/// Format a human-readable file size
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}

#[cfg(test)]
mod tests {
    use std::fs::{self, File};
    use std::io::Write;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn file_sizes() {
        assert_eq!(format_file_size(512), "512 bytes");
        assert_eq!(format_file_size(2048), "2.00 KB");
        assert_eq!(format_file_size(5 * 1024 * 1024), "5.00 MB");
        assert_eq!(format_file_size(3 * 1024 * 1024 * 1024), "3.00 GB");
    }

    #[test]
    fn counts_only_includable_files() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("src")).unwrap();
        fs::create_dir(dir.path().join("node_modules")).unwrap();

        File::create(dir.path().join("src/main.py"))
            .unwrap()
            .write_all(b"print(1)")
            .unwrap();
        File::create(dir.path().join("node_modules/x.js"))
            .unwrap()
            .write_all(b"ignored")
            .unwrap();
        File::create(dir.path().join("image.png"))
            .unwrap()
            .write_all(b"\x89PNG")
            .unwrap();

        assert_eq!(count_candidate_files(dir.path()), 1);
    }
}

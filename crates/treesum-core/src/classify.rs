//! Binary/text classification of candidate files

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Extensions that are always treated as binary, without reading the file.
const BINARY_EXTENSIONS: &[&str] = &[
    // Images
    "png", "jpg", "jpeg", "gif", "bmp", "ico", "svg", "webp",
    // Documents
    "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx",
    // Archives
    "zip", "tar", "gz", "bz2", "7z", "rar",
    // Executables and libraries
    "exe", "dll", "so", "dylib", "a", "lib",
    // Media
    "mp3", "mp4", "avi", "mov", "wmv", "flv",
    // Fonts
    "ttf", "otf", "woff", "woff2", "eot",
    // Compiled artifacts
    "pyc", "pyo", "class", "jar", "war",
    // Databases
    "db", "sqlite", "sqlite3",
    // Misc binary
    "bin", "dat", "o", "obj",
];

/// Number of leading bytes inspected for a NUL byte
pub const SNIFF_LEN: u64 = 8192;

/// True if the file's extension is in the fixed binary set
pub fn has_binary_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            let ext = ext.to_ascii_lowercase();
            BINARY_EXTENSIONS.contains(&ext.as_str())
        })
}

/// Decide whether a file may be summarized.
///
/// Binary extensions short-circuit without touching the file. Anything
/// else is sniffed for a NUL byte in its first [`SNIFF_LEN`] bytes; a file
/// that cannot be read is treated as binary.
pub fn is_text_eligible(path: &Path) -> bool {
    if has_binary_extension(path) {
        return false;
    }

    match sniff_is_binary(path) {
        Ok(binary) => !binary,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "unreadable during sniff, excluding");
            false
        }
    }
}

fn sniff_is_binary(path: &Path) -> io::Result<bool> {
    let mut head = Vec::with_capacity(SNIFF_LEN as usize);
    File::open(path)?.take(SNIFF_LEN).read_to_end(&mut head)?;
    Ok(head.contains(&0))
}

//! Utility functions for formatting and path manipulation.
//!
//! General-purpose helpers shared by the operations and the recovery step.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Formats bytes with appropriate binary units (B, KiB, MiB, GiB).
#[must_use]
pub fn format_bytes(bytes: u64) -> String {
    const KIB: f64 = 1024.0;
    const MIB: f64 = KIB * 1024.0;
    const GIB: f64 = MIB * 1024.0;

    let bytes_f64 = bytes as f64;
    if bytes_f64 >= GIB {
        format!("{:.2} GiB", bytes_f64 / GIB)
    } else if bytes_f64 >= MIB {
        format!("{:.2} MiB", bytes_f64 / MIB)
    } else if bytes_f64 >= KIB {
        format!("{:.2} KiB", bytes_f64 / KIB)
    } else {
        format!("{bytes} B")
    }
}

/// Appends `.{extension}` when `path` has none (`out` -> `out.mp4`).
#[must_use]
pub fn with_default_extension(path: PathBuf, extension: &str) -> PathBuf {
    if path.extension().is_some() {
        path
    } else {
        let mut name: OsString = path.into_os_string();
        name.push(".");
        name.push(extension);
        PathBuf::from(name)
    }
}

/// Turns `dir/shot.png` into the image2 pattern `dir/shot-%02d.png`.
///
/// A literal `%` in the name is written as `%%` so the muxer keeps it.
#[must_use]
pub fn numbered_pattern(path: &Path) -> PathBuf {
    let (stem, ext) = stem_and_extension(path);
    let stem = stem.replace('%', "%%");
    let file_name = match ext {
        Some(ext) => format!("{stem}-%02d.{}", ext.replace('%', "%%")),
        None => format!("{stem}-%02d"),
    };
    path.with_file_name(file_name)
}

/// Path of the `index`-th (1-based) file written for a numbered pattern.
#[must_use]
pub fn numbered_path(path: &Path, index: u32) -> PathBuf {
    let (stem, ext) = stem_and_extension(path);
    let file_name = match ext {
        Some(ext) => format!("{stem}-{index:02}.{ext}"),
        None => format!("{stem}-{index:02}"),
    };
    path.with_file_name(file_name)
}

fn stem_and_extension(path: &Path) -> (String, Option<String>) {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = path.extension().map(|e| e.to_string_lossy().into_owned());
    (stem, ext)
}

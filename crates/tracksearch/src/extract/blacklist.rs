//! Extensions that are never track files.

use std::path::Path;

use fnv::FnvHashSet;

use super::traits::ExtensionFilter;

// ---------------------------------------------------------------------------
// Extension category constants
// ---------------------------------------------------------------------------

pub const PICTURE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "bmp", "tif", "tiff", "webp", "ico", "svg", "heic", "heif", "raw",
    "arw", "cr2", "orf", "raf", "psd", "ai",
];

pub const VIDEO_EXTENSIONS: &[&str] = &[
    "mp4", "m4v", "mov", "avi", "mkv", "wmv", "webm", "flv", "mpg", "mpeg", "3gp", "3g2", "mts",
    "m2ts",
];

pub const AUDIO_EXTENSIONS: &[&str] = &[
    "mp3", "wav", "flac", "aac", "ogg", "oga", "opus", "wma", "m4a", "alac", "aiff",
];

pub const DOCUMENT_EXTENSIONS: &[&str] = &[
    "doc", "docx", "rtf", "odt", "pdf", "pages", "ppt", "pptx", "key", "odp", "xls", "xlsx",
    "numbers", "ods",
];

pub const ARCHIVE_EXTENSIONS: &[&str] = &[
    "zip", "rar", "7z", "tar", "gz", "tgz", "bz2", "xz", "zst", "cab", "iso", "dmg",
];

pub const EXECUTABLE_EXTENSIONS: &[&str] = &[
    "exe", "msi", "dll", "so", "dylib", "o", "a", "class", "jar", "apk", "ipa", "bin", "pkg",
];

/// Rejects files whose lower-cased extension is in a fixed set.
///
/// Built once at startup and shared; files without an extension are allowed.
#[derive(Debug, Clone)]
pub struct ExtensionBlacklist {
    extensions: FnvHashSet<String>,
}

impl ExtensionBlacklist {
    /// Creates a blacklist from the given extensions (with or without a
    /// leading dot, any case).
    pub fn from_extensions<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extensions = extensions
            .into_iter()
            .map(|ext| ext.as_ref().trim().trim_start_matches('.').to_ascii_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect();
        Self { extensions }
    }

    /// Returns true if the extension (without dot, any case) is blacklisted.
    pub fn contains(&self, extension: &str) -> bool {
        self.extensions.contains(&extension.to_ascii_lowercase())
    }

    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }
}

impl Default for ExtensionBlacklist {
    /// Pictures, video, audio, office documents, archives and binaries.
    fn default() -> Self {
        Self::from_extensions(
            [
                PICTURE_EXTENSIONS,
                VIDEO_EXTENSIONS,
                AUDIO_EXTENSIONS,
                DOCUMENT_EXTENSIONS,
                ARCHIVE_EXTENSIONS,
                EXECUTABLE_EXTENSIONS,
            ]
            .into_iter()
            .flatten(),
        )
    }
}

impl ExtensionFilter for ExtensionBlacklist {
    fn is_allowed(&self, path: &Path) -> bool {
        match path.extension() {
            Some(extension) => !self.contains(&extension.to_string_lossy()),
            None => true,
        }
    }
}

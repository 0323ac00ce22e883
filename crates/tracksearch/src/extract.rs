//! Boundary to format-specific content extraction.
//!
//! Parsing GPX, KML and friends lives outside this crate. The pipeline only
//! talks to the traits defined here:
//! - `ExtractorFactory` recognizes a file and creates a `ContentExtractor`
//! - `ExtractorRegistry` tries several factories in order
//! - `ExtensionFilter` decides which discovered files are worth scanning

mod blacklist;
mod registry;
mod traits;

#[cfg(test)]
pub(crate) mod testing;

pub use blacklist::{
    ExtensionBlacklist, ARCHIVE_EXTENSIONS, AUDIO_EXTENSIONS, DOCUMENT_EXTENSIONS,
    EXECUTABLE_EXTENSIONS, PICTURE_EXTENSIONS, VIDEO_EXTENSIONS,
};
pub use registry::ExtractorRegistry;
pub use traits::{ContentExtractor, ExtensionFilter, ExtractorFactory};

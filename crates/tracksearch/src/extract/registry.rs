//! Ordered collection of extractor factories.

use std::path::Path;
use std::sync::Arc;

use super::traits::{ContentExtractor, ExtractorFactory};

/// Tries each registered factory in registration order; the first one that
/// recognizes the file wins.
#[derive(Clone, Default)]
pub struct ExtractorRegistry {
    factories: Vec<(String, Arc<dyn ExtractorFactory>)>,
}

impl std::fmt::Debug for ExtractorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtractorRegistry")
            .field(
                "factories",
                &self.factories.iter().map(|(name, _)| name).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl ExtractorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a factory under a name used in logs.
    pub fn register<F: ExtractorFactory + 'static>(&mut self, name: &str, factory: F) {
        self.factories.push((name.to_string(), Arc::new(factory)));
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl ExtractorFactory for ExtractorRegistry {
    fn create_extractor(&self, path: &Path) -> Option<Box<dyn ContentExtractor>> {
        self.factories.iter().find_map(|(name, factory)| {
            let extractor = factory.create_extractor(path)?;
            log::trace!("extractor {} selected for {}", name, path.display());
            Some(extractor)
        })
    }
}

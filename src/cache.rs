use crate::error::PipelineError;
use crate::loader::{load_bytes, Dataset, LoadOptions, RowPolicy};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Caller-owned memo of loaded snapshots, keyed by the SHA-256 of the source
/// bytes and the row policy. Entries live as long as the cache.
#[derive(Debug, Default)]
pub struct LoadCache {
    entries: HashMap<([u8; 32], RowPolicy), Arc<Dataset>>,
}

impl LoadCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_load(
        &mut self,
        bytes: &[u8],
        options: &LoadOptions,
    ) -> Result<Arc<Dataset>, PipelineError> {
        let key = (content_hash(bytes), options.row_policy);
        if let Some(hit) = self.entries.get(&key) {
            debug!(rows = hit.records.len(), "order source served from cache");
            return Ok(Arc::clone(hit));
        }
        let dataset = Arc::new(load_bytes(bytes, options)?);
        self.entries.insert(key, Arc::clone(&dataset));
        Ok(dataset)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub fn content_hash(bytes: &[u8]) -> [u8; 32] {
    Sha256::digest(bytes).into()
}

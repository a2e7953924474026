use log::{info, warn};
use std::{fs::OpenOptions, path::Path, sync::Arc};

use crate::{
    encoder::PatchEncoder,
    errors::{EarthstackError, Result},
    keys::{HexPrefix, KeyStrategy},
    labels::LabelVocabulary,
    store::{ObjectStore, RetryPolicy},
};

/// Read a headerless single-column table of patch identifiers, in file order.
pub fn read_patch_list(path: &Path) -> Result<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    let mut patches = Vec::new();
    for record in reader.deserialize() {
        let (patch,): (String,) = record?;
        patches.push(patch);
    }
    Ok(patches)
}

/// Ordinal to storage-key table of one materialized split.
///
/// Row order is the dataset order; it never changes after materialization.
#[derive(Debug, Clone, Default)]
pub struct SplitIndex {
    keys: Vec<String>,
}

impl SplitIndex {
    pub fn load(path: &Path) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_path(path)?;
        let mut keys = Vec::new();
        for record in reader.deserialize() {
            let (_ordinal, key): (usize, String) = record?;
            keys.push(key);
        }
        Ok(Self { keys })
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn key(&self, index: usize) -> Result<&str> {
        self.keys
            .get(index)
            .map(String::as_str)
            .ok_or(EarthstackError::IndexOutOfRange {
                index,
                len: self.keys.len(),
            })
    }
}

/// Drives the encoder over every patch of a split, in list order, and
/// persists the ordinal to key index next to it.
pub struct SplitMaterializer<S: ObjectStore> {
    store: S,
    vocabulary: LabelVocabulary,
    keys: Arc<dyn KeyStrategy>,
    retry: RetryPolicy,
}

impl<S: ObjectStore> SplitMaterializer<S> {
    pub fn new(store: S, vocabulary: LabelVocabulary) -> Self {
        Self {
            store,
            vocabulary,
            keys: Arc::new(HexPrefix::default()),
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_keys(mut self, keys: Arc<dyn KeyStrategy>) -> Self {
        self.keys = keys;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Encode every patch of `list_path` sequentially and append each
    /// `(ordinal, key)` row to `index_path` as soon as its write lands.
    ///
    /// A missing `root` skips the whole split; a later split of the same run
    /// may still have a valid root. Rows already present in `index_path`
    /// count as completed and their patches are not encoded again, so an
    /// aborted run continues where it stopped.
    ///
    /// Returns the number of patches the split holds.
    pub fn materialize(
        &self,
        root: &Path,
        split: &str,
        list_path: &Path,
        index_path: &Path,
    ) -> Result<usize> {
        if !root.exists() {
            warn!(
                "split {split}: root {} does not exist, skipping",
                root.display()
            );
            return Ok(0);
        }
        let encoder = PatchEncoder::new(root, self.vocabulary.clone(), Arc::clone(&self.keys))?;
        let patches = read_patch_list(list_path)?;

        let completed = if index_path.exists() {
            SplitIndex::load(index_path)?.len()
        } else {
            0
        };
        if completed > 0 {
            info!(
                "split {split}: {completed} of {} patches already materialized",
                patches.len()
            );
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(index_path)?;
        let mut index = csv::Writer::from_writer(file);
        for (ordinal, patch) in patches.iter().enumerate().skip(completed) {
            let key = encoder.encode_and_store(patch, &self.store, &self.retry)?;
            index.serialize((ordinal, key.as_str()))?;
            index.flush()?;
            info!("split {split}: {patch} -> {key} at ordinal {ordinal}");
        }
        Ok(patches.len())
    }
}

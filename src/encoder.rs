use log::debug;
use ndarray::Array1;
use serde::Deserialize;
use std::{fs::File, io::BufReader, path::PathBuf, sync::Arc};

use crate::{
    bands::read_band_stack,
    errors::{EarthstackError, Result},
    example::Example,
    keys::KeyStrategy,
    labels::LabelVocabulary,
    store::{ObjectStore, RetryPolicy},
};

/// Annotation file sitting next to a patch's band files.
#[derive(Debug, Deserialize)]
struct LabelMetadata {
    labels: Vec<String>,
}

/// Turns one raw patch into an encoded example in the store.
pub struct PatchEncoder {
    root: PathBuf,
    vocabulary: LabelVocabulary,
    keys: Arc<dyn KeyStrategy>,
}

impl std::fmt::Debug for PatchEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatchEncoder")
            .field("root", &self.root)
            .field("vocabulary", &self.vocabulary)
            .finish_non_exhaustive()
    }
}

impl PatchEncoder {
    /// Fails with [`EarthstackError::MissingInput`] when `root` does not exist.
    pub fn new(
        root: impl Into<PathBuf>,
        vocabulary: LabelVocabulary,
        keys: Arc<dyn KeyStrategy>,
    ) -> Result<Self> {
        let root = root.into();
        if !root.exists() {
            return Err(EarthstackError::MissingInput(root));
        }
        Ok(Self {
            root,
            vocabulary,
            keys,
        })
    }

    /// Decode a patch's bands and labels into an in-memory example.
    pub fn encode(&self, patch: &str) -> Result<Example> {
        let image = read_band_stack(&self.root, patch)?;
        let label = self.read_label(patch)?;
        Ok(Example { image, label })
    }

    /// Encode `patch`, then write the blob under a freshly generated key.
    /// Returns the key the example now lives under.
    pub fn encode_and_store(
        &self,
        patch: &str,
        store: &dyn ObjectStore,
        retry: &RetryPolicy,
    ) -> Result<String> {
        let blob = self.encode(patch)?.to_bytes()?;
        let key = self.keys.key_for(patch);
        retry.put(store, &key, &blob)?;
        debug!("patch {patch} stored under {key}");
        Ok(key)
    }

    fn read_label(&self, patch: &str) -> Result<Array1<u8>> {
        let path = self
            .root
            .join(patch)
            .join(format!("{patch}_labels_metadata.json"));
        let file = File::open(&path).map_err(|err| EarthstackError::LabelRead {
            patch: patch.to_string(),
            message: err.to_string(),
        })?;
        let metadata: LabelMetadata =
            serde_json::from_reader(BufReader::new(file)).map_err(|err| {
                EarthstackError::LabelRead {
                    patch: patch.to_string(),
                    message: err.to_string(),
                }
            })?;
        self.vocabulary.one_hot(&metadata.labels)
    }
}

//! Turn a per-patch GeoTIFF archive into serialized training examples in an
//! object store, and serve them back by ordinal index.

mod bands;
mod dataset;
mod encoder;
mod errors;
mod example;
#[cfg(test)]
mod fixtures;
mod keys;
mod labels;
mod split;
mod store;

pub use bands::{band_path, read_band_stack, BAND_NAMES, TILE_EDGE};
pub use dataset::{Dataset, Transform};
pub use encoder::PatchEncoder;
pub use errors::{EarthstackError, Result};
pub use example::Example;
pub use keys::{HexPrefix, KeyStrategy};
pub use labels::{LabelVocabulary, CORINE_CLASSES};
pub use split::{read_patch_list, SplitIndex, SplitMaterializer};
pub use store::{MemoryStore, ObjectStore, RetryPolicy, S3Config, S3Store, StoreProvider};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::write_patch;
    use std::fs;

    /// Whole pipeline: raw archive -> materialized split -> served tensors.
    #[test_log::test]
    fn materialized_split_serves_every_ordinal() {
        let root = tempfile::tempdir().unwrap();
        write_patch(root.path(), "P1", 500, 60, &["Sea and ocean"]);
        write_patch(root.path(), "P2", 900, 120, &["Pastures", "Mixed forest"]);
        let list = root.path().join("train.csv");
        fs::write(&list, "P1\nP2\n").unwrap();
        let index_path = root.path().join("train_s3.csv");

        let store = MemoryStore::new();
        SplitMaterializer::new(store.clone(), LabelVocabulary::corine())
            .materialize(root.path(), "train", &list, &index_path)
            .unwrap();

        let dataset = Dataset::open(&index_path, store).unwrap();
        assert_eq!(dataset.len(), 2);
        for ordinal in 0..dataset.len() {
            let (image, label) = dataset.get(ordinal).unwrap();
            assert_eq!(image.shape(), [12, 120, 120]);
            assert_eq!(label.shape(), [43]);
        }

        // P1's constant 60x60 bands upsample to constant 120x120 tiles.
        let (image, label) = dataset.get(0).unwrap();
        assert_eq!(image[[0, 0, 0]], 500.0);
        assert_eq!(image[[0, 119, 119]], 500.0);
        assert_eq!(image[[11, 60, 60]], 511.0);
        assert_eq!(label[42], 1.0);
        assert_eq!(label.sum(), 1.0);
    }
}

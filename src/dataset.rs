use ndarray::{Array1, Array3};
use std::path::Path;

use crate::{
    errors::Result,
    example::Example,
    split::SplitIndex,
    store::{ObjectStore, StoreProvider},
};

/// Post-processing hook applied to the image tensor of every served example.
pub type Transform = Box<dyn Fn(Array3<f32>) -> Array3<f32> + Send + Sync>;

/// Random access over one materialized split.
///
/// Every `get` connects its own store and touches no shared state, so
/// independent data-loading workers may call it concurrently. Nothing is
/// cached; each access fetches whatever blob currently lives under the key.
pub struct Dataset<P: StoreProvider> {
    index: SplitIndex,
    provider: P,
    transform: Option<Transform>,
}

impl<P: StoreProvider> Dataset<P> {
    pub fn open(index_path: &Path, provider: P) -> Result<Self> {
        Ok(Self {
            index: SplitIndex::load(index_path)?,
            provider,
            transform: None,
        })
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = Some(transform);
        self
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Fetch and decode the example at ordinal `index`.
    ///
    /// A key present in the index but absent from the store surfaces as
    /// [`crate::EarthstackError::ObjectNotFound`]; that is index/store drift
    /// and never papered over with placeholder data.
    pub fn get(&self, index: usize) -> Result<(Array3<f32>, Array1<f32>)> {
        let key = self.index.key(index)?;
        let store = self.provider.connect()?;
        let example = Example::from_bytes(&store.get(key)?)?;
        let (mut image, label) = example.into_tensors();
        if let Some(transform) = &self.transform {
            image = transform(image);
        }
        Ok((image, label))
    }
}

use ndarray::{Array1, Array3};
use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// One encoded patch: band stack and multi-hot label vector.
///
/// Serialized as a single opaque blob; the codec round-trips both arrays
/// exactly, bit for bit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Example {
    pub image: Array3<i32>,
    pub label: Array1<u8>,
}

impl Example {
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }

    /// Float tensors for training-time consumption.
    pub fn into_tensors(self) -> (Array3<f32>, Array1<f32>) {
        let image = self.image.mapv(|sample| sample as f32);
        let label = self.label.mapv(f32::from);
        (image, label)
    }
}

use ndarray::Array1;
use std::collections::HashMap;

use crate::errors::{EarthstackError, Result};

/// CORINE Land Cover classes annotating the archive.
/// Position in this list is the class's one-hot index.
pub const CORINE_CLASSES: [&str; 43] = [
    "Continuous urban fabric",
    "Discontinuous urban fabric",
    "Industrial or commercial units",
    "Road and rail networks and associated land",
    "Port areas",
    "Airports",
    "Mineral extraction sites",
    "Dump sites",
    "Construction sites",
    "Green urban areas",
    "Sport and leisure facilities",
    "Non-irrigated arable land",
    "Permanently irrigated land",
    "Rice fields",
    "Vineyards",
    "Fruit trees and berry plantations",
    "Olive groves",
    "Pastures",
    "Annual crops associated with permanent crops",
    "Complex cultivation patterns",
    "Land principally occupied by agriculture, with significant areas of natural vegetation",
    "Agro-forestry areas",
    "Broad-leaved forest",
    "Coniferous forest",
    "Mixed forest",
    "Natural grassland",
    "Moors and heathland",
    "Sclerophyllous vegetation",
    "Transitional woodland/shrub",
    "Beaches, dunes, sands",
    "Bare rock",
    "Sparsely vegetated areas",
    "Burnt areas",
    "Inland marshes",
    "Peatbogs",
    "Salt marshes",
    "Salines",
    "Intertidal flats",
    "Water courses",
    "Water bodies",
    "Coastal lagoons",
    "Estuaries",
    "Sea and ocean",
];

/// Closed name to one-hot index table.
///
/// Built once and passed to the encoder explicitly, so an archive with a
/// different annotation scheme only needs a different table.
#[derive(Debug, Clone)]
pub struct LabelVocabulary {
    indices: HashMap<String, usize>,
}

impl LabelVocabulary {
    pub fn new<I, S>(classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let indices = classes
            .into_iter()
            .enumerate()
            .map(|(index, name)| (name.into(), index))
            .collect();
        Self { indices }
    }

    /// The 43-class table of the archive's annotations.
    pub fn corine() -> Self {
        Self::new(CORINE_CLASSES)
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn index_of(&self, name: &str) -> Result<usize> {
        self.indices
            .get(name)
            .copied()
            .ok_or_else(|| EarthstackError::UnknownLabel(name.to_string()))
    }

    /// Multi-hot encode a set of class names.
    /// Names outside the table are errors, never silently dropped.
    pub fn one_hot<I, S>(&self, names: I) -> Result<Array1<u8>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut hot = Array1::zeros(self.len());
        for name in names {
            hot[self.index_of(name.as_ref())?] = 1;
        }
        Ok(hot)
    }
}

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, EarthstackError>;

#[derive(thiserror::Error, Debug)]
pub enum EarthstackError {
    #[error("input root {} does not exist", .0.display())]
    MissingInput(PathBuf),
    #[error("band {band} of patch {patch} could not be read: {source}")]
    BandRead {
        patch: String,
        band: String,
        source: gdal::errors::GdalError,
    },
    #[error("label metadata of patch {patch} could not be read: {message}")]
    LabelRead { patch: String, message: String },
    #[error("label {0:?} is not in the vocabulary")]
    UnknownLabel(String),
    #[error("write of {key} failed: {message}")]
    StorageWrite { key: String, message: String },
    #[error("read of {key} failed: {message}")]
    StorageRead { key: String, message: String },
    #[error("no object stored under {key}")]
    ObjectNotFound { key: String },
    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("store connection failed: {0}")]
    StoreConnect(String),
    #[error(transparent)]
    GdalError(#[from] gdal::errors::GdalError),
    #[error(transparent)]
    NdarrayError(#[from] ndarray::ShapeError),
    #[error(transparent)]
    CsvError(#[from] csv::Error),
    #[error(transparent)]
    CodecError(#[from] bincode::Error),
    #[error(transparent)]
    IoError(#[from] std::io::Error),
}

use gdal::raster::ResampleAlg;
use log::debug;
use ndarray::{s, Array2, Array3};
use std::path::{Path, PathBuf};

use crate::errors::{EarthstackError, Result};

/// Spectral bands of a patch, in stacking order.
pub const BAND_NAMES: [&str; 12] = [
    "B01", "B02", "B03", "B04", "B05", "B06", "B07", "B08", "B8A", "B09", "B11", "B12",
];

/// Edge length every band is resampled to.
pub const TILE_EDGE: usize = 120;

/// Location of one band file: `<root>/<patch>/<patch>_<band>.tif`.
pub fn band_path(root: &Path, patch: &str, band: &str) -> PathBuf {
    root.join(patch).join(format!("{patch}_{band}.tif"))
}

/// Read all bands of a patch into a `(12, 120, 120)` stack.
///
/// Each band is resampled to a [`TILE_EDGE`] square with cubic interpolation
/// and cast to `i32`, truncating fractional resampled values.
pub fn read_band_stack(root: &Path, patch: &str) -> Result<Array3<i32>> {
    let mut stack = Array3::zeros((BAND_NAMES.len(), TILE_EDGE, TILE_EDGE));
    for (index, band) in BAND_NAMES.iter().enumerate() {
        let resampled = read_band(&band_path(root, patch, band), patch, band)?;
        stack.slice_mut(s![index, .., ..]).assign(&resampled);
    }
    Ok(stack)
}

fn read_band(path: &Path, patch: &str, band: &str) -> Result<Array2<i32>> {
    let samples = read_resampled(path).map_err(|source| EarthstackError::BandRead {
        patch: patch.to_string(),
        band: band.to_string(),
        source,
    })?;
    debug!("read band {band} of patch {patch} from {}", path.display());
    let samples = samples.into_iter().map(|sample| sample as i32).collect();
    Ok(Array2::from_shape_vec((TILE_EDGE, TILE_EDGE), samples)?)
}

fn read_resampled(path: &Path) -> std::result::Result<Vec<f64>, gdal::errors::GdalError> {
    let dataset = gdal::Dataset::open(path)?;
    let buffer = dataset.rasterband(1)?.read_as::<f64>(
        (0, 0),
        dataset.raster_size(),
        (TILE_EDGE, TILE_EDGE),
        Some(ResampleAlg::Cubic),
    )?;
    Ok(buffer.data().to_vec())
}

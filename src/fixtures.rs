use gdal::raster::Buffer;
use std::{fs, path::Path};

use crate::bands::{band_path, BAND_NAMES};

/// Write a synthetic patch under `root`: one `edge`x`edge` GeoTIFF per band,
/// band `i` filled with `fill + i`, plus the labels metadata file.
pub fn write_patch(root: &Path, patch: &str, fill: u16, edge: usize, labels: &[&str]) {
    let driver = gdal::DriverManager::get_driver_by_name("GTiff").unwrap();
    fs::create_dir_all(root.join(patch)).unwrap();
    for (index, band) in BAND_NAMES.iter().enumerate() {
        let dataset = driver
            .create_with_band_type::<u16, _>(band_path(root, patch, band), edge, edge, 1)
            .unwrap();
        let mut buffer = Buffer::new((edge, edge), vec![fill + index as u16; edge * edge]);
        dataset
            .rasterband(1)
            .unwrap()
            .write((0, 0), (edge, edge), &mut buffer)
            .unwrap();
    }
    write_labels(root, patch, labels);
}

/// (Over)write just the labels metadata file of a patch.
pub fn write_labels(root: &Path, patch: &str, labels: &[&str]) {
    let dir = root.join(patch);
    fs::create_dir_all(&dir).unwrap();
    let metadata = serde_json::json!({ "labels": labels });
    fs::write(
        dir.join(format!("{patch}_labels_metadata.json")),
        metadata.to_string(),
    )
    .unwrap();
}

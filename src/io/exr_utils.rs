/* Copyright 2020 @TwoCookingMice */

use crate::core::error::{RenderError, Result};
use crate::math::constants::Vector3f;
use std::path::Path;

use exr::prelude::write_rgb_file;

/// Writes a row-major radiance buffer as an RGB OpenEXR image.
pub fn write_exr_to_file<P: AsRef<Path>>(image: &[Vector3f],
                                         width: usize,
                                         height: usize,
                                         file_path: P) -> Result<()> {
    let file_path = file_path.as_ref();
    if image.len() != width * height {
        return Err(RenderError::BufferSize { expected: width * height, actual: image.len() });
    }
    log::info!("Starting writing openexr images: {}.", file_path.display());

    write_rgb_file(file_path, width, height, |x, y| {
        let p = image[y * width + x];
        (p.x, p.y, p.z)
    })
    .map_err(|e| RenderError::write(file_path, e.to_string()))?;

    log::info!("EXR written to: {}.", file_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_exr_round_trip_size() {
        let mut path = std::env::temp_dir();
        path.push("macaron_exr_utils_write.exr");
        let image = vec![Vector3f::new(0.25, 0.5, 1.0); 6];
        write_exr_to_file(&image, 3, 2, &path).expect("write exr");
        assert!(std::fs::metadata(&path).map(|m| m.len() > 0).unwrap_or(false));

        assert!(write_exr_to_file(&image, 4, 2, &path).is_err());
    }
}

// Copyright @yucwang 2026

use crate::core::error::{RenderError, Result};
use crate::math::constants::{Float, Vector2f};
use crate::math::spectrum::RGBSpectrum;
use exr::prelude::*;
use image::io::Reader as ImageReader;
use std::path::Path;

type RgbaF32 = [f32; 4];

fn to_u8(v: f32) -> u8 {
    (v.max(0.0).min(1.0) * 255.0).round() as u8
}

/// RGBA8 texture, row 0 at the bottom of the source image. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    pixels: Vec<[u8; 4]>,
    width: usize,
    height: usize,
}

impl Texture {
    /// Builds a texture from top-to-bottom float RGBA rows, flipping vertically.
    pub fn from_rgba_f32(width: usize, height: usize, data: &[RgbaF32]) -> Result<Self> {
        let expected = width * height;
        if expected == 0 || data.len() != expected {
            return Err(RenderError::BufferSize { expected, actual: data.len() });
        }

        let mut pixels = Vec::with_capacity(expected);
        for y in 0..height {
            let row = &data[(height - 1 - y) * width..(height - y) * width];
            pixels.extend(row.iter().map(|p| [to_u8(p[0]), to_u8(p[1]), to_u8(p[2]), to_u8(p[3])]));
        }
        Ok(Self { pixels, width, height })
    }

    /// Decodes an image file. `.exr` goes through the OpenEXR reader, every
    /// other extension through `image`. Nothing is built if decoding fails.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        log::info!("Loading texture from: {}.", path.display());

        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_ascii_lowercase())
            .unwrap_or_default();
        let (width, height, data) = match ext.as_str() {
            "exr" => read_exr_rgba(path)?,
            _ => read_image_rgba(path)?,
        };

        let texture = Self::from_rgba_f32(width, height, &data)
            .map_err(|e| RenderError::load(path, e.to_string()))?;
        log::info!("Texture loaded, width = {}, height = {}.", width, height);
        Ok(texture)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[[u8; 4]] {
        &self.pixels
    }

    pub fn texel(&self, x: usize, y: usize) -> [u8; 4] {
        self.pixels[y * self.width + x]
    }

    /// Nearest-texel lookup with repeat wrapping, colour in `[0, 1]`.
    pub fn sample(&self, uv: &Vector2f) -> RGBSpectrum {
        let wrap = |v: Float, n: usize| -> usize {
            let f = v - v.floor();
            ((f * n as Float) as usize).min(n - 1)
        };
        let p = self.texel(wrap(uv.x, self.width), wrap(uv.y, self.height));
        RGBSpectrum::new(p[0] as Float, p[1] as Float, p[2] as Float) / 255.0
    }
}

fn read_exr_rgba(path: &Path) -> Result<(usize, usize, Vec<RgbaF32>)> {
    let image = read()
        .no_deep_data()
        .largest_resolution_level()
        .rgba_channels(
            |resolution, _| {
                let width = resolution.width();
                let height = resolution.height();
                (width, vec![[0.0f32; 4]; width * height])
            },
            |image: &mut (usize, Vec<RgbaF32>), position: Vec2<usize>, (r, g, b, a): (f32, f32, f32, f32)| {
                let width = image.0;
                image.1[position.y() * width + position.x()] = [r, g, b, a];
            },
        )
        .first_valid_layer()
        .all_attributes()
        .from_file(path)
        .map_err(|e| RenderError::load(path, e.to_string()))?;

    let size = image.layer_data.size;
    let (_, data) = image.layer_data.channel_data.pixels;
    Ok((size.width(), size.height(), data))
}

fn read_image_rgba(path: &Path) -> Result<(usize, usize, Vec<RgbaF32>)> {
    let img = ImageReader::open(path)
        .map_err(|e| RenderError::load(path, e.to_string()))?
        .decode()
        .map_err(|e| RenderError::load(path, e.to_string()))?;

    let rgba = img.to_rgba32f();
    let (width, height) = (rgba.width() as usize, rgba.height() as usize);
    let data = rgba.pixels().map(|p| [p[0], p[1], p[2], p[3]]).collect();
    Ok((width, height, data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_texture_conversion_and_flip() {
        // Top row red, bottom row blue.
        let data = [
            [1.0, 0.0, 0.0, 1.0], [1.0, 0.0, 0.0, 1.0],
            [0.0, 0.0, 2.0, 0.5], [0.0, 0.0, -1.0, 0.5],
        ];
        let tex = Texture::from_rgba_f32(2, 2, &data).expect("texture");
        assert_eq!(tex.texel(0, 0), [0, 0, 255, 128]);
        assert_eq!(tex.texel(1, 0), [0, 0, 0, 128]);
        assert_eq!(tex.texel(0, 1), [255, 0, 0, 255]);

        let c = tex.sample(&Vector2f::new(0.25, 0.75));
        assert_eq!(c, RGBSpectrum::new(1.0, 0.0, 0.0));
        // Repeat wrap.
        assert_eq!(tex.sample(&Vector2f::new(-0.75, 1.25)), tex.sample(&Vector2f::new(0.25, 0.25)));
    }

    #[test]
    fn test_texture_rejects_bad_buffer() {
        assert!(Texture::from_rgba_f32(2, 2, &[[0.0; 4]; 3]).is_err());
        assert!(Texture::from_rgba_f32(0, 0, &[]).is_err());
    }

    #[test]
    fn test_texture_load_png() {
        let mut path = std::env::temp_dir();
        path.push("macaron_texture_white.png");
        image::RgbaImage::from_pixel(2, 2, image::Rgba([255, 255, 255, 255]))
            .save(&path)
            .expect("write png");

        let tex = Texture::load(&path).expect("load png");
        assert_eq!((tex.width(), tex.height()), (2, 2));
        assert!(tex.pixels().iter().all(|p| *p == [255, 255, 255, 255]));
    }

    #[test]
    fn test_texture_load_exr() {
        let mut path = std::env::temp_dir();
        path.push("macaron_texture_white.exr");
        exr::prelude::write_rgba_file(&path, 2, 2, |_x, _y| (1.0f32, 1.0f32, 1.0f32, 1.0f32))
            .expect("write exr");

        let tex = Texture::load(&path).expect("load exr");
        assert_eq!((tex.width(), tex.height()), (2, 2));
        assert!(tex.pixels().iter().all(|p| *p == [255, 255, 255, 255]));
    }

    #[test]
    fn test_texture_load_exr_flips_rows() {
        let mut path = std::env::temp_dir();
        path.push("macaron_texture_rows.exr");
        // Top row bright red, bottom row black; values above one clamp.
        exr::prelude::write_rgba_file(&path, 2, 2, |_x, y| {
            if y == 0 { (4.0f32, 0.0f32, 0.0f32, 1.0f32) } else { (0.0f32, 0.0f32, 0.0f32, 1.0f32) }
        })
        .expect("write exr");

        let tex = Texture::load(&path).expect("load exr");
        assert_eq!(tex.texel(0, 1), [255, 0, 0, 255]);
        assert_eq!(tex.texel(1, 0), [0, 0, 0, 255]);
    }

    #[test]
    fn test_texture_load_failure() {
        let mut path = std::env::temp_dir();
        path.push("macaron_texture_garbage.png");
        std::fs::write(&path, b"not an image").expect("write garbage");
        match Texture::load(&path) {
            Err(RenderError::Load { .. }) => {}
            other => panic!("expected load error, got {:?}", other),
        }
    }
}

//! CPU raster for baking - normalized RGBA storage with 8-bit conversion

use std::io::Cursor;

use crate::constants::CHANNEL_MAX;
use crate::error::RasterError;

/// An RGBA raster image
/// Stores pixels as [f32; 4] with every channel normalized to 0.0..=1.0
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    /// Pixel data in row-major order, each pixel is [r, g, b, a]
    pixels: Vec<[f32; 4]>,
}

/// Convert a normalized channel to 8-bit, rounding half up
#[inline]
pub fn channel_to_u8(value: f32) -> u8 {
    (value * CHANNEL_MAX + 0.5).floor().clamp(0.0, CHANNEL_MAX) as u8
}

/// Convert an 8-bit channel to normalized float
#[inline]
pub fn channel_from_u8(value: u8) -> f32 {
    value as f32 / CHANNEL_MAX
}

impl RasterImage {
    /// Create a new image with the given dimensions, initialized to transparent black
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![[0.0, 0.0, 0.0, 0.0]; Self::expected_len(width, height)],
        }
    }

    /// Wrap an existing pixel buffer
    /// Fails unless `pixels.len() == width * height`
    pub fn from_pixels(
        width: u32,
        height: u32,
        pixels: Vec<[f32; 4]>,
    ) -> Result<Self, RasterError> {
        let expected = Self::expected_len(width, height);
        if pixels.len() != expected {
            return Err(RasterError::SizeMismatch {
                width,
                height,
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Build from tightly packed 8-bit RGBA bytes
    pub fn from_rgba8(width: u32, height: u32, bytes: &[u8]) -> Result<Self, RasterError> {
        let expected = Self::expected_len(width, height) * 4;
        if bytes.len() != expected {
            return Err(RasterError::SizeMismatch {
                width,
                height,
                expected,
                actual: bytes.len(),
            });
        }
        let pixels = bytes
            .chunks_exact(4)
            .map(|px| {
                [
                    channel_from_u8(px[0]),
                    channel_from_u8(px[1]),
                    channel_from_u8(px[2]),
                    channel_from_u8(px[3]),
                ]
            })
            .collect();
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Decode any format the `image` crate recognizes into 8-bit RGBA
    /// (PNG, JPEG, TGA, BMP and the rest of its default codecs)
    pub fn decode(encoded: &[u8]) -> Result<Self, RasterError> {
        let rgba = image::load_from_memory(encoded)?.to_rgba8();
        let (width, height) = rgba.dimensions();
        Self::from_rgba8(width, height, rgba.as_raw())
    }

    /// Pack into 8-bit RGBA bytes (round half up, clamped to 0..=255)
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|&px| px.map(channel_to_u8))
            .collect()
    }

    /// Encode as an 8-bit RGBA PNG
    pub fn encode_png(&self) -> Result<Vec<u8>, RasterError> {
        if self.is_empty() {
            return Err(RasterError::Empty {
                width: self.width,
                height: self.height,
            });
        }
        let buffer = image::RgbaImage::from_raw(self.width, self.height, self.to_rgba8())
            .ok_or(RasterError::SizeMismatch {
                width: self.width,
                height: self.height,
                expected: Self::expected_len(self.width, self.height) * 4,
                actual: self.pixels.len() * 4,
            })?;

        let mut png = Vec::new();
        buffer.write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)?;
        Ok(png)
    }

    #[inline]
    fn expected_len(width: u32, height: u32) -> usize {
        (width as usize) * (height as usize)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// True for images with no pixels (either dimension zero)
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// New image of the same dimensions with `f` applied to every pixel
    pub fn map_pixels(&self, f: impl Fn([f32; 4]) -> [f32; 4]) -> Self {
        Self {
            width: self.width,
            height: self.height,
            pixels: self.pixels.iter().map(|&px| f(px)).collect(),
        }
    }

    /// Fill every pixel with one color
    pub fn fill(&mut self, color: [f32; 4]) {
        self.pixels.fill(color);
    }

    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.pixels.len()
    }

    #[inline]
    pub fn pixels(&self) -> &[[f32; 4]] {
        &self.pixels
    }

    /// Raw float data, e.g. for byte-level comparisons
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }
}

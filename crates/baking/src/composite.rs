//! Pixel compositor: folds a tint into an image's RGB channels

use crate::raster::RasterImage;
use crate::types::Tint;

/// Multiply every pixel's RGB by the tint's RGB, keeping alpha
///
/// Returns a new image of identical dimensions; the source is not touched.
/// Channels stay in the normalized domain, so no clamping happens here;
/// 8-bit export rounds and clamps separately.
pub fn composite(image: &RasterImage, tint: Tint) -> RasterImage {
    image.map_pixels(|[r, g, b, a]| [r * tint.r, g * tint.g, b * tint.b, a])
}

/// File extension of baked images. Baked pixels are always encoded as PNG.
pub const BAKED_IMAGE_EXTENSION: &str = "png";

/// Scale between normalized channels and 8-bit storage.
pub const CHANNEL_MAX: f32 = 255.0;

//! Image Decoding
//!
//! Tile images are decoded by a collaborator behind the [`ImageDecoder`] trait.
//! The manager only looks at the dimensions and the compressed flag; any
//! failure to produce an image is treated as a permanent load failure.

use std::path::Path;

/// Decoded tile image
#[derive(Debug, Clone, Default)]
pub struct DecodedImage {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Source file stores pixels in a block-compressed format
    pub compressed: bool,
    /// Raw pixel data
    pub pixels: Vec<u8>,
}

/// Decodes tile image files
pub trait ImageDecoder: Send + Sync {
    /// Decode the image at `path`, or return `None` if it cannot be read.
    fn decode(&self, path: &Path) -> Option<DecodedImage>;
}

/// Decoder backed by the `image` crate (DDS, PNG and JPEG)
///
/// DDS tiles are expanded to RGBA; `compressed` records the source format.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageFileDecoder;

impl ImageDecoder for ImageFileDecoder {
    fn decode(&self, path: &Path) -> Option<DecodedImage> {
        let img = match image::open(path) {
            Ok(img) => img,
            Err(err) => {
                log::warn!("Failed to decode tile image {}: {}", path.display(), err);
                return None;
            }
        };

        let width = img.width();
        let height = img.height();
        let compressed = matches!(
            image::ImageFormat::from_path(path),
            Ok(image::ImageFormat::Dds)
        );
        Some(DecodedImage {
            width,
            height,
            compressed,
            pixels: img.into_rgba8().into_raw(),
        })
    }
}

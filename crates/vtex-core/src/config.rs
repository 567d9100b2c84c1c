//! Virtual Texture Options
//!
//! Explicit construction-time options: the file type registry used to infer
//! format options from the tile extension, the image decoder, and the scan
//! ceiling for resolution levels.

use std::sync::Arc;

use ahash::AHashMap;
use bitflags::bitflags;

use crate::decode::{ImageDecoder, ImageFileDecoder};

/// Default number of `levelN` directories probed by the catalog scan
pub const DEFAULT_MAX_RESOLUTION_LEVELS: u32 = 13;

/// Content type inferred from a file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    Jpeg,
    Png,
    Bmp,
    Targa,
    Dds,
    Dxt5NormalMap,
    Unknown,
}

bitflags! {
    /// Format options applied to a texture on upload
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TextureFormatOptions: u32 {
        /// Normal map stored in DXT5 with X in alpha
        const DXT5_NORMAL_MAP = 1 << 0;
    }
}

/// Registry mapping file extensions to content types
#[derive(Debug, Clone)]
pub struct FileTypeRegistry {
    types: AHashMap<String, ContentType>,
}

impl FileTypeRegistry {
    /// Create an empty registry
    pub fn empty() -> Self {
        Self {
            types: AHashMap::new(),
        }
    }

    /// Register an extension (without the leading dot)
    pub fn register(&mut self, extension: &str, content_type: ContentType) {
        self.types.insert(extension.to_ascii_lowercase(), content_type);
    }

    /// Look up an extension, ignoring case and a leading dot
    pub fn content_type(&self, extension: &str) -> ContentType {
        let extension = extension.strip_prefix('.').unwrap_or(extension);
        self.types
            .get(&extension.to_ascii_lowercase())
            .copied()
            .unwrap_or(ContentType::Unknown)
    }

    /// Format options implied by an extension
    pub fn format_options(&self, extension: &str) -> TextureFormatOptions {
        match self.content_type(extension) {
            ContentType::Dxt5NormalMap => TextureFormatOptions::DXT5_NORMAL_MAP,
            _ => TextureFormatOptions::empty(),
        }
    }
}

impl Default for FileTypeRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register("jpg", ContentType::Jpeg);
        registry.register("jpeg", ContentType::Jpeg);
        registry.register("jfif", ContentType::Jpeg);
        registry.register("png", ContentType::Png);
        registry.register("bmp", ContentType::Bmp);
        registry.register("tga", ContentType::Targa);
        registry.register("dds", ContentType::Dds);
        registry.register("dxt5nm", ContentType::Dxt5NormalMap);
        registry
    }
}

/// Options passed to every virtual texture at construction
#[derive(Clone)]
pub struct VirtualTextureOptions {
    /// Extension to content type mapping
    pub file_types: FileTypeRegistry,
    /// Tile image decoder
    pub decoder: Arc<dyn ImageDecoder>,
    /// Number of `levelN` directories probed by the catalog scan
    pub max_resolution_levels: u32,
}

impl VirtualTextureOptions {
    /// Use a different decoder
    pub fn with_decoder(mut self, decoder: Arc<dyn ImageDecoder>) -> Self {
        self.decoder = decoder;
        self
    }

    /// Use a different level ceiling
    pub fn with_max_resolution_levels(mut self, levels: u32) -> Self {
        self.max_resolution_levels = levels;
        self
    }
}

impl Default for VirtualTextureOptions {
    fn default() -> Self {
        Self {
            file_types: FileTypeRegistry::default(),
            decoder: Arc::new(ImageFileDecoder),
            max_resolution_levels: DEFAULT_MAX_RESOLUTION_LEVELS,
        }
    }
}

impl std::fmt::Debug for VirtualTextureOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VirtualTextureOptions")
            .field("file_types", &self.file_types)
            .field("max_resolution_levels", &self.max_resolution_levels)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_lookup() {
        let registry = FileTypeRegistry::default();
        assert_eq!(registry.content_type("dds"), ContentType::Dds);
        assert_eq!(registry.content_type(".PNG"), ContentType::Png);
        assert_eq!(registry.content_type("xyz"), ContentType::Unknown);
    }

    #[test]
    fn test_normal_map_format_options() {
        let registry = FileTypeRegistry::default();
        assert_eq!(
            registry.format_options("dxt5nm"),
            TextureFormatOptions::DXT5_NORMAL_MAP
        );
        assert!(registry.format_options("dds").is_empty());
    }

    #[test]
    fn test_custom_registry() {
        let mut registry = FileTypeRegistry::empty();
        assert_eq!(registry.content_type("dds"), ContentType::Unknown);
        registry.register("NRM", ContentType::Dxt5NormalMap);
        assert_eq!(
            registry.format_options("nrm"),
            TextureFormatOptions::DXT5_NORMAL_MAP
        );
    }

    #[test]
    fn test_default_options() {
        let options = VirtualTextureOptions::default();
        assert_eq!(options.max_resolution_levels, DEFAULT_MAX_RESOLUTION_LEVELS);
        let options = options.with_max_resolution_levels(4);
        assert_eq!(options.max_resolution_levels, 4);
    }
}

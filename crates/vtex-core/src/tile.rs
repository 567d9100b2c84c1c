//! Tile Records
//!
//! Per-tile residency state and the resident texture it eventually holds.

/// Opaque identity of a resident texture.
///
/// Identities are issued from 1 upwards; 0 never names a texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub u32);

impl TextureId {
    /// Get the raw ID value
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for TextureId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "tex#{}", self.0)
    }
}

/// Mip-map generation mode for a resident texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MipMapMode {
    /// No mip chain; finer levels are served by other tiles
    #[default]
    None,
    /// Full mip chain generated on upload
    Default,
}

/// Texture coordinate addressing outside the 0..1 range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddressMode {
    #[default]
    EdgeClamp,
    Wrap,
}

/// Decoded image data that is ready for upload
#[derive(Debug, Clone)]
pub struct ImageTexture {
    /// Texture identity
    pub id: TextureId,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Mip-map mode
    pub mip_map_mode: MipMapMode,
    /// Edge addressing
    pub address_mode: AddressMode,
    /// Source pixels were in a compressed format
    pub compressed: bool,
    /// Pixel data as returned by the decoder
    pub pixels: Vec<u8>,
}

/// Residency state of a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileState {
    /// Discovered on disk, never loaded
    Unloaded,
    /// Pixel data is resident
    Resident,
    /// Loading failed; never retried
    Failed,
}

/// One tile image discovered on disk.
///
/// Starts empty and moves exactly once to either resident or failed.
#[derive(Debug, Default)]
pub struct Tile {
    texture: Option<ImageTexture>,
    load_failed: bool,
}

impl Tile {
    /// Create an unloaded tile
    pub fn new() -> Self {
        Self::default()
    }

    /// Current residency state
    pub fn state(&self) -> TileState {
        if self.texture.is_some() {
            TileState::Resident
        } else if self.load_failed {
            TileState::Failed
        } else {
            TileState::Unloaded
        }
    }

    /// Whether a load should still be attempted
    pub fn needs_load(&self) -> bool {
        self.state() == TileState::Unloaded
    }

    /// Resident texture, if loaded
    pub fn texture(&self) -> Option<&ImageTexture> {
        self.texture.as_ref()
    }

    /// Whether a previous load attempt failed
    pub fn load_failed(&self) -> bool {
        self.load_failed
    }

    /// Record the outcome of the one and only load attempt.
    pub(crate) fn complete_load(&mut self, texture: Option<ImageTexture>) {
        debug_assert!(self.needs_load());
        match texture {
            Some(texture) => self.texture = Some(texture),
            None => self.load_failed = true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texture(id: u32) -> ImageTexture {
        ImageTexture {
            id: TextureId(id),
            width: 64,
            height: 64,
            mip_map_mode: MipMapMode::None,
            address_mode: AddressMode::EdgeClamp,
            compressed: false,
            pixels: Vec::new(),
        }
    }

    #[test]
    fn test_tile_starts_unloaded() {
        let tile = Tile::new();
        assert_eq!(tile.state(), TileState::Unloaded);
        assert!(tile.needs_load());
        assert!(tile.texture().is_none());
    }

    #[test]
    fn test_tile_becomes_resident() {
        let mut tile = Tile::new();
        tile.complete_load(Some(texture(7)));
        assert_eq!(tile.state(), TileState::Resident);
        assert_eq!(tile.texture().map(|t| t.id), Some(TextureId(7)));
        assert!(!tile.needs_load());
    }

    #[test]
    fn test_failure_is_sticky() {
        let mut tile = Tile::new();
        tile.complete_load(None);
        assert_eq!(tile.state(), TileState::Failed);
        assert!(tile.load_failed());
        assert!(!tile.needs_load());
    }

    #[test]
    fn test_texture_id_display() {
        assert_eq!(TextureId(42).to_string(), "tex#42");
    }
}

//! Texture Variants
//!
//! A texture is either a plain image with one resident texture, or a virtual
//! texture served tile by tile. Only plain textures can be bound as a whole.

use crate::manager::{TextureTile, VirtualTexture};
use crate::tile::{ImageTexture, TextureId};
use crate::{VirtualTextureError, VtResult};

/// Plain or virtual texture
#[derive(Debug)]
pub enum Texture {
    /// Single resident image
    Plain(ImageTexture),
    /// Tiled texture loaded on demand
    Virtual(VirtualTexture),
}

impl Texture {
    /// Texture to bind when drawing the whole surface.
    ///
    /// Virtual textures have no single resident image and refuse.
    pub fn bind(&self) -> VtResult<TextureId> {
        match self {
            Self::Plain(texture) => Ok(texture.id),
            Self::Virtual(_) => Err(VirtualTextureError::BindUnsupported),
        }
    }

    /// Region to draw for tile `(u, v)` at `lod`
    pub fn get_tile(&mut self, lod: i32, u: i32, v: i32) -> TextureTile {
        match self {
            Self::Plain(texture) if lod == 0 && u == 0 && v == 0 => TextureTile::full(texture.id),
            Self::Plain(_) => TextureTile::EMPTY,
            Self::Virtual(vt) => vt.get_tile(lod, u, v),
        }
    }

    /// Levels of detail exposed to callers
    pub fn lod_count(&self) -> u32 {
        match self {
            Self::Plain(_) => 1,
            Self::Virtual(vt) => vt.lod_count(),
        }
    }

    /// Tiles across at `lod`
    pub fn u_tile_count(&self, lod: i32) -> u64 {
        match self {
            Self::Plain(_) => u64::from(lod == 0),
            Self::Virtual(vt) => vt.u_tile_count(lod),
        }
    }

    /// Tiles down at `lod`
    pub fn v_tile_count(&self, lod: i32) -> u64 {
        match self {
            Self::Plain(_) => u64::from(lod == 0),
            Self::Virtual(vt) => vt.v_tile_count(lod),
        }
    }

    /// Start a rendering pass (no-op for plain textures)
    pub fn begin_usage(&mut self) {
        if let Self::Virtual(vt) = self {
            vt.begin_usage();
        }
    }

    /// Finish a rendering pass (no-op for plain textures)
    pub fn end_usage(&mut self) {
        if let Self::Virtual(vt) = self {
            vt.end_usage();
        }
    }

    /// The virtual texture, if this is one
    pub fn as_virtual(&self) -> Option<&VirtualTexture> {
        match self {
            Self::Virtual(vt) => Some(vt),
            Self::Plain(_) => None,
        }
    }

    /// Mutable access to the virtual texture, if this is one
    pub fn as_virtual_mut(&mut self) -> Option<&mut VirtualTexture> {
        match self {
            Self::Virtual(vt) => Some(vt),
            Self::Plain(_) => None,
        }
    }
}

impl From<ImageTexture> for Texture {
    fn from(texture: ImageTexture) -> Self {
        Self::Plain(texture)
    }
}

impl From<VirtualTexture> for Texture {
    fn from(vt: VirtualTexture) -> Self {
        Self::Virtual(vt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VirtualTextureOptions;
    use crate::tile::{AddressMode, MipMapMode};

    fn plain() -> Texture {
        Texture::from(ImageTexture {
            id: TextureId(3),
            width: 256,
            height: 128,
            mip_map_mode: MipMapMode::Default,
            address_mode: AddressMode::Wrap,
            compressed: false,
            pixels: Vec::new(),
        })
    }

    #[test]
    fn test_plain_texture() {
        let mut texture = plain();
        assert_eq!(texture.bind().unwrap(), TextureId(3));
        assert_eq!(texture.lod_count(), 1);
        assert_eq!(texture.u_tile_count(0), 1);
        assert_eq!(texture.u_tile_count(1), 0);
        assert_eq!(texture.get_tile(0, 0, 0), TextureTile::full(TextureId(3)));
        assert!(texture.get_tile(0, 1, 0).is_empty());
        assert!(texture.as_virtual().is_none());
    }

    #[test]
    fn test_virtual_texture_refuses_bind() {
        let dir = tempfile::tempdir().unwrap();
        let options = VirtualTextureOptions::default();
        let vt = VirtualTexture::new(dir.path(), 1, 128, "tx_", "dds", &options);
        let mut texture = Texture::from(vt);

        assert!(matches!(texture.bind(), Err(VirtualTextureError::BindUnsupported)));
        assert!(texture.get_tile(0, 0, 0).is_empty());

        texture.begin_usage();
        texture.end_usage();
        assert_eq!(texture.as_virtual().map(|vt| vt.ticks()), Some(1));
        assert_eq!(texture.u_tile_count(0), 4);
        assert_eq!(texture.v_tile_count(0), 2);
    }
}

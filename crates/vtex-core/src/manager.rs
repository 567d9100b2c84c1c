//! Virtual Texture Manager
//!
//! A virtual texture is one logical texture assembled from tiles that are
//! loaded from disk the first time they are requested. Each level of detail is
//! twice as wide and twice as high as the previous one; the base split folds
//! the coarsest levels into the two quadtree roots and hides them from the LOD
//! numbering seen by callers.
//!
//! Loaded tiles are never evicted. The usage counter advanced by
//! [`VirtualTexture::begin_usage`] is available to an eviction policy layered
//! on top.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::addressing::{self, MAX_LEVEL, TileAddress};
use crate::catalog::{self, CatalogScanner};
use crate::config::{TextureFormatOptions, VirtualTextureOptions};
use crate::decode::ImageDecoder;
use crate::quadtree::{QuadtreeIndex, QuadtreeStats};
use crate::tile::{AddressMode, ImageTexture, MipMapMode, TextureId};

/// Region of a resident texture to draw for one requested tile.
///
/// The rectangle is normalized to the resident texture: `(u, v)` is the origin
/// and `(du, dv)` the extent. An empty tile carries no texture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureTile {
    /// Resident texture, or `None` when there is nothing to draw
    pub texture: Option<TextureId>,
    /// Horizontal origin of the sub-rectangle (normalized)
    pub u: f32,
    /// Vertical origin of the sub-rectangle (normalized)
    pub v: f32,
    /// Horizontal extent of the sub-rectangle (normalized)
    pub du: f32,
    /// Vertical extent of the sub-rectangle (normalized)
    pub dv: f32,
}

impl TextureTile {
    /// Tile with nothing to draw
    pub const EMPTY: Self = Self {
        texture: None,
        u: 0.0,
        v: 0.0,
        du: 1.0,
        dv: 1.0,
    };

    /// Whole texture
    pub fn full(texture: TextureId) -> Self {
        Self {
            texture: Some(texture),
            ..Self::EMPTY
        }
    }

    /// Sub-rectangle of a texture
    pub fn new(texture: TextureId, u: f32, v: f32, du: f32, dv: f32) -> Self {
        Self {
            texture: Some(texture),
            u,
            v,
            du,
            dv,
        }
    }

    /// Whether there is nothing to draw
    pub fn is_empty(&self) -> bool {
        self.texture.is_none()
    }
}

impl Default for TextureTile {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Loads tile images from the catalog directory and issues texture identities
struct TileLoader {
    tile_path: PathBuf,
    tile_prefix: String,
    tile_ext: String,
    base_split: u32,
    decoder: Arc<dyn ImageDecoder>,
    compressed: bool,
    next_texture_id: u32,
}

impl TileLoader {
    fn load(&mut self, addr: TileAddress) -> Option<ImageTexture> {
        let dir_index = addr.level.checked_sub(self.base_split)?;
        let path = catalog::level_directory(&self.tile_path, dir_index).join(
            catalog::tile_file_name(&self.tile_prefix, addr.u, addr.v, &self.tile_ext),
        );

        let image = self.decoder.decode(&path)?;
        self.compressed = image.compressed;

        if !addressing::is_power_of_two(image.width)
            || !addressing::is_power_of_two(image.height)
        {
            log::warn!(
                "Tile {} is {}x{}; dimensions must be powers of two",
                path.display(),
                image.width,
                image.height
            );
            return None;
        }

        // Only the coarsest directory gets mip maps; finer levels are served by
        // their own tiles.
        let mip_map_mode = if dir_index == 0 {
            MipMapMode::Default
        } else {
            MipMapMode::None
        };

        let id = TextureId(self.next_texture_id);
        self.next_texture_id += 1;
        log::debug!("Loaded tile {} as {} ({}x{})", addr, id, image.width, image.height);

        Some(ImageTexture {
            id,
            width: image.width,
            height: image.height,
            mip_map_mode,
            address_mode: AddressMode::EdgeClamp,
            compressed: image.compressed,
            pixels: image.pixels,
        })
    }
}

/// Virtual texture backed by a directory of tile images
pub struct VirtualTexture {
    loader: TileLoader,
    tile_size: u32,
    resolution_levels: u32,
    index: QuadtreeIndex,
    format_options: TextureFormatOptions,
    ticks: u64,
    tiles_requested: u32,
}

impl VirtualTexture {
    /// Create a virtual texture and scan its tile directory.
    ///
    /// `tile_size` must be a power of two; parameter validation is done by
    /// [`crate::params::create_virtual_texture`].
    pub fn new(
        tile_path: impl Into<PathBuf>,
        base_split: u32,
        tile_size: u32,
        tile_prefix: impl Into<String>,
        tile_type: impl Into<String>,
        options: &VirtualTextureOptions,
    ) -> Self {
        debug_assert!(tile_size != 0 && addressing::is_power_of_two(tile_size));

        let tile_path = tile_path.into();
        let tile_prefix = tile_prefix.into();
        let tile_ext = tile_type.into();

        let mut index = QuadtreeIndex::new();
        let summary = CatalogScanner::new(
            &tile_path,
            base_split,
            &tile_prefix,
            options.max_resolution_levels,
        )
        .scan(&mut index);

        let format_options = options.file_types.format_options(&tile_ext);

        Self {
            loader: TileLoader {
                tile_path,
                tile_prefix,
                tile_ext,
                base_split,
                decoder: Arc::clone(&options.decoder),
                compressed: false,
                next_texture_id: 1,
            },
            tile_size,
            resolution_levels: summary.resolution_levels,
            index,
            format_options,
            ticks: 0,
            tiles_requested: 0,
        }
    }

    /// Get the region to draw for tile `(u, v)` at caller level `lod`.
    ///
    /// Falls back to the closest coarser tile on disk when the exact tile is
    /// missing, returning the part of it that covers the requested cell. Any
    /// out-of-range request, missing coverage or failed load yields
    /// [`TextureTile::EMPTY`].
    pub fn get_tile(&mut self, lod: i32, u: i32, v: i32) -> TextureTile {
        self.tiles_requested = self.tiles_requested.wrapping_add(1);

        let Some(addr) = self.absolute_address(lod, u, v) else {
            return TextureTile::EMPTY;
        };

        let Some(tile_level) = self.index.find_best_match(addr).map(|m| m.level) else {
            return TextureTile::EMPTY;
        };

        let lod_diff = addr.level - tile_level;
        let Some(tile_addr) = addr.ancestor(tile_level) else {
            return TextureTile::EMPTY;
        };

        let Some(texture) = self.make_resident(tile_addr) else {
            return TextureTile::EMPTY;
        };

        let cells = 1u32 << lod_diff;
        let extent = 1.0 / cells as f32;
        let mask = cells - 1;
        TextureTile::new(
            texture,
            (addr.u & mask) as f32 * extent,
            (addr.v & mask) as f32 * extent,
            extent,
            extent,
        )
    }

    /// Number of levels of detail exposed to callers
    pub fn lod_count(&self) -> u32 {
        self.resolution_levels.saturating_sub(self.loader.base_split)
    }

    /// Tiles across at caller level `lod` (0 if the level is not addressable)
    pub fn u_tile_count(&self, lod: i32) -> u64 {
        self.absolute_level(lod).map(addressing::grid_width).unwrap_or(0)
    }

    /// Tiles down at caller level `lod` (0 if the level is not addressable)
    pub fn v_tile_count(&self, lod: i32) -> u64 {
        self.absolute_level(lod).map(addressing::grid_height).unwrap_or(0)
    }

    /// Start a usage cycle (typically one frame)
    pub fn begin_usage(&mut self) {
        self.ticks += 1;
        self.tiles_requested = 0;
    }

    /// End a usage cycle
    pub fn end_usage(&mut self) {}

    /// Width of the full texture in pixels at the coarsest split
    pub fn width(&self) -> u64 {
        u64::from(self.tile_size) << (self.loader.base_split + 1)
    }

    /// Height of the full texture in pixels at the coarsest split
    pub fn height(&self) -> u64 {
        u64::from(self.tile_size) << self.loader.base_split
    }

    /// Root directory holding the `levelN` tile directories
    pub fn tile_path(&self) -> &Path {
        &self.loader.tile_path
    }

    /// Tile file name prefix
    pub fn tile_prefix(&self) -> &str {
        &self.loader.tile_prefix
    }

    /// Tile file extension, without the dot
    pub fn tile_extension(&self) -> &str {
        &self.loader.tile_ext
    }

    /// Levels folded into the two roots
    pub fn base_split(&self) -> u32 {
        self.loader.base_split
    }

    /// Tile edge length in pixels
    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Highest absolute level found on disk, plus one
    pub fn resolution_levels(&self) -> u32 {
        self.resolution_levels
    }

    /// Usage cycles started so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Tiles requested since the current usage cycle began
    pub fn tiles_requested(&self) -> u32 {
        self.tiles_requested
    }

    /// Whether the most recently decoded tile used a compressed format
    pub fn is_compressed(&self) -> bool {
        self.loader.compressed
    }

    /// Format options inferred from the tile extension
    pub fn format_options(&self) -> TextureFormatOptions {
        self.format_options
    }

    /// Tile index, for inspection
    pub fn index(&self) -> &QuadtreeIndex {
        &self.index
    }

    /// Node and tile counts of the index
    pub fn stats(&self) -> QuadtreeStats {
        self.index.stats()
    }

    fn absolute_level(&self, lod: i32) -> Option<u32> {
        let level = i64::from(lod) + i64::from(self.loader.base_split);
        u32::try_from(level).ok().filter(|level| *level <= MAX_LEVEL)
    }

    fn absolute_address(&self, lod: i32, u: i32, v: i32) -> Option<TileAddress> {
        let level = self.absolute_level(lod)?;
        if level >= self.resolution_levels {
            return None;
        }
        let addr = TileAddress::new(level, u32::try_from(u).ok()?, u32::try_from(v).ok()?);
        addr.is_valid().then_some(addr)
    }

    /// Load the tile at `addr` if it has never been attempted, and return its texture.
    fn make_resident(&mut self, addr: TileAddress) -> Option<TextureId> {
        let tile = self.index.get_mut(addr)?;
        if tile.needs_load() {
            tile.complete_load(self.loader.load(addr));
        }
        tile.texture().map(|texture| texture.id)
    }
}

impl std::fmt::Debug for VirtualTexture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VirtualTexture")
            .field("tile_path", &self.loader.tile_path)
            .field("base_split", &self.loader.base_split)
            .field("tile_size", &self.tile_size)
            .field("resolution_levels", &self.resolution_levels)
            .field("ticks", &self.ticks)
            .finish_non_exhaustive()
    }
}

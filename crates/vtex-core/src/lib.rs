//! # Vtex Core
//!
//! Virtual texture tile management: one logical texture, many gigabytes in
//! size, of which only the requested tiles are ever loaded.
//!
//! This crate provides:
//! - **Addressing**: level/tile coordinate math for a 2:1 tile grid
//! - **Quadtree**: tile index with best-match lookup along a bit path
//! - **Catalog**: bootstrap scan of `levelN/<prefix><u>_<v>.<ext>` directories
//! - **Manager**: on-demand tile residency and coarse-tile fallback
//! - **Params**: validated construction parameters and descriptor loading
//! - **Texture**: plain/virtual texture variants

pub mod addressing;
pub mod catalog;
pub mod config;
pub mod decode;
pub mod manager;
pub mod params;
pub mod quadtree;
pub mod shared;
pub mod texture;
pub mod tile;

pub use addressing::TileAddress;
pub use catalog::{CatalogScanner, CatalogSummary};
pub use config::{ContentType, FileTypeRegistry, TextureFormatOptions, VirtualTextureOptions};
pub use decode::{DecodedImage, ImageDecoder, ImageFileDecoder};
pub use manager::{TextureTile, VirtualTexture};
pub use params::{VirtualTextureParams, create_virtual_texture, load_virtual_texture};
pub use quadtree::QuadtreeIndex;
pub use shared::SharedVirtualTexture;
pub use texture::Texture;
pub use tile::{ImageTexture, TextureId, Tile, TileState};

use thiserror::Error;

/// Virtual texture errors
#[derive(Error, Debug)]
pub enum VirtualTextureError {
    #[error("ImageDirectory missing in virtual texture")]
    MissingImageDirectory,

    #[error("BaseSplit in virtual texture missing or has bad value: {0:?}")]
    InvalidBaseSplit(Option<f64>),

    #[error("TileSize is missing from virtual texture")]
    MissingTileSize,

    #[error("Virtual texture tile size must be a power of two >= 64, got {0}")]
    InvalidTileSize(f64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Descriptor parse error: {0}")]
    Descriptor(#[from] serde_json::Error),

    #[error("Not a virtual texture descriptor: {0}")]
    NotAVirtualTexture(String),

    #[error("Virtual textures cannot be bound as a single texture")]
    BindUnsupported,
}

/// Result type for virtual texture operations
pub type VtResult<T> = Result<T, VirtualTextureError>;

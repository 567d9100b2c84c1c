//! Virtual Texture Parameters
//!
//! The parameter record that describes a virtual texture, the validating
//! factory that turns it into a [`VirtualTexture`], and a loader for JSON
//! descriptor files of the form
//!
//! ```json
//! { "VirtualTexture": { "ImageDirectory": "tiles", "BaseSplit": 0, "TileSize": 512 } }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::addressing::{self, MAX_LEVEL};
use crate::config::VirtualTextureOptions;
use crate::manager::VirtualTexture;
use crate::{VirtualTextureError, VtResult};

/// Default tile file extension
pub const DEFAULT_TILE_TYPE: &str = "dds";

/// Default tile file name prefix
pub const DEFAULT_TILE_PREFIX: &str = "tx_";

/// Smallest accepted tile edge length
pub const MIN_TILE_SIZE: u32 = 64;

/// Descriptor kind accepted by [`load_virtual_texture`]
pub const DESCRIPTOR_KIND: &str = "VirtualTexture";

/// Unvalidated virtual texture parameters, as read from a descriptor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VirtualTextureParams {
    /// Tile directory root, absolute or relative to the descriptor
    pub image_directory: Option<String>,
    /// Log2 of the number of tiles across the coarsest level, halved
    pub base_split: Option<f64>,
    /// Tile edge length in pixels
    pub tile_size: Option<f64>,
    /// Tile file extension
    pub tile_type: Option<String>,
    /// Tile file name prefix
    pub tile_prefix: Option<String>,
}

/// Parameters that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedParams {
    pub image_directory: PathBuf,
    pub base_split: u32,
    pub tile_size: u32,
    pub tile_type: String,
    pub tile_prefix: String,
}

impl VirtualTextureParams {
    /// Check the record and resolve the image directory against `base_dir`.
    pub fn validate(&self, base_dir: &Path) -> VtResult<ValidatedParams> {
        let Some(image_directory) = &self.image_directory else {
            return Err(VirtualTextureError::MissingImageDirectory);
        };

        let base_split = self
            .base_split
            .filter(|b| *b >= 0.0 && b.fract() == 0.0 && *b <= f64::from(MAX_LEVEL))
            .ok_or(VirtualTextureError::InvalidBaseSplit(self.base_split))?
            as u32;

        let Some(tile_size) = self.tile_size else {
            return Err(VirtualTextureError::MissingTileSize);
        };
        if tile_size.fract() != 0.0
            || tile_size < f64::from(MIN_TILE_SIZE)
            || tile_size > f64::from(u32::MAX)
            || !addressing::is_power_of_two(tile_size as u32)
        {
            return Err(VirtualTextureError::InvalidTileSize(tile_size));
        }

        let directory = PathBuf::from(image_directory);
        let image_directory = if directory.is_relative() {
            base_dir.join(directory)
        } else {
            directory
        };

        Ok(ValidatedParams {
            image_directory,
            base_split,
            tile_size: tile_size as u32,
            tile_type: self
                .tile_type
                .clone()
                .unwrap_or_else(|| DEFAULT_TILE_TYPE.to_string()),
            tile_prefix: self
                .tile_prefix
                .clone()
                .unwrap_or_else(|| DEFAULT_TILE_PREFIX.to_string()),
        })
    }
}

/// Validate `params` and build the virtual texture, scanning its tiles.
///
/// Validation failures are logged and returned; nothing is scanned in that case.
pub fn create_virtual_texture(
    params: &VirtualTextureParams,
    base_dir: &Path,
    options: &VirtualTextureOptions,
) -> VtResult<VirtualTexture> {
    let params = params.validate(base_dir).inspect_err(|err| {
        log::error!("Invalid virtual texture: {}", err);
    })?;

    Ok(VirtualTexture::new(
        params.image_directory,
        params.base_split,
        params.tile_size,
        params.tile_prefix,
        params.tile_type,
        options,
    ))
}

/// Parse a descriptor document: a single `VirtualTexture` entry holding the parameters.
pub fn parse_descriptor(json: &str) -> VtResult<VirtualTextureParams> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    let serde_json::Value::Object(mut map) = value else {
        return Err(VirtualTextureError::NotAVirtualTexture(
            "descriptor is not an object".to_string(),
        ));
    };

    match map.remove(DESCRIPTOR_KIND) {
        Some(params) if map.is_empty() => Ok(serde_json::from_value(params)?),
        _ => Err(VirtualTextureError::NotAVirtualTexture(
            map.keys().cloned().collect::<Vec<_>>().join(", "),
        )),
    }
}

/// Load a virtual texture from a descriptor file.
///
/// Relative image directories are resolved against the descriptor's directory.
pub fn load_virtual_texture(
    path: impl AsRef<Path>,
    options: &VirtualTextureOptions,
) -> VtResult<VirtualTexture> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).inspect_err(|err| {
        log::error!("Error opening virtual texture file {}: {}", path.display(), err);
    })?;

    let params = parse_descriptor(&json).inspect_err(|err| {
        log::error!("Error parsing virtual texture {}: {}", path.display(), err);
    })?;

    let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
    create_virtual_texture(&params, base_dir, options)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(dir: &str, base_split: f64, tile_size: f64) -> VirtualTextureParams {
        VirtualTextureParams {
            image_directory: Some(dir.to_string()),
            base_split: Some(base_split),
            tile_size: Some(tile_size),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults_applied() {
        let validated = params("tiles", 1.0, 512.0)
            .validate(Path::new("/data/earth"))
            .unwrap();
        assert_eq!(validated.image_directory, PathBuf::from("/data/earth/tiles"));
        assert_eq!(validated.base_split, 1);
        assert_eq!(validated.tile_size, 512);
        assert_eq!(validated.tile_type, "dds");
        assert_eq!(validated.tile_prefix, "tx_");
    }

    #[test]
    fn test_absolute_directory_kept() {
        let validated = params("/srv/tiles", 0.0, 64.0)
            .validate(Path::new("/data/earth"))
            .unwrap();
        assert_eq!(validated.image_directory, PathBuf::from("/srv/tiles"));
    }

    #[test]
    fn test_missing_image_directory() {
        let p = VirtualTextureParams {
            image_directory: None,
            ..params("x", 0.0, 512.0)
        };
        assert!(matches!(
            p.validate(Path::new(".")),
            Err(VirtualTextureError::MissingImageDirectory)
        ));
    }

    #[test]
    fn test_bad_base_split() {
        for bad in [-1.0, 1.5, f64::NAN, 1000.0] {
            assert!(matches!(
                params("x", bad, 512.0).validate(Path::new(".")),
                Err(VirtualTextureError::InvalidBaseSplit(_))
            ));
        }
        let p = VirtualTextureParams {
            base_split: None,
            ..params("x", 0.0, 512.0)
        };
        assert!(matches!(
            p.validate(Path::new(".")),
            Err(VirtualTextureError::InvalidBaseSplit(None))
        ));
    }

    #[test]
    fn test_bad_tile_size() {
        for bad in [32.0, 96.0, 512.5, -512.0, 1e12] {
            assert!(matches!(
                params("x", 0.0, bad).validate(Path::new(".")),
                Err(VirtualTextureError::InvalidTileSize(_))
            ));
        }
        let p = VirtualTextureParams {
            tile_size: None,
            ..params("x", 0.0, 512.0)
        };
        assert!(matches!(
            p.validate(Path::new(".")),
            Err(VirtualTextureError::MissingTileSize)
        ));
    }

    #[test]
    fn test_parse_descriptor() {
        let json = r#"{ "VirtualTexture": {
            "ImageDirectory": "hires",
            "BaseSplit": 2,
            "TileSize": 1024,
            "TilePrefix": "earth_",
            "TileType": "png"
        } }"#;
        let p = parse_descriptor(json).unwrap();
        assert_eq!(p.image_directory.as_deref(), Some("hires"));
        assert_eq!(p.base_split, Some(2.0));
        assert_eq!(p.tile_size, Some(1024.0));
        assert_eq!(p.tile_prefix.as_deref(), Some("earth_"));
        assert_eq!(p.tile_type.as_deref(), Some("png"));
    }

    #[test]
    fn test_parse_descriptor_wrong_kind() {
        assert!(matches!(
            parse_descriptor(r#"{ "ImageTexture": {} }"#),
            Err(VirtualTextureError::NotAVirtualTexture(_))
        ));
        assert!(matches!(
            parse_descriptor("[1, 2]"),
            Err(VirtualTextureError::NotAVirtualTexture(_))
        ));
        assert!(matches!(
            parse_descriptor("{ not json"),
            Err(VirtualTextureError::Descriptor(_))
        ));
    }

    #[test]
    fn test_load_virtual_texture() {
        let dir = tempfile::tempdir().unwrap();
        let level0 = dir.path().join("tiles").join("level0");
        std::fs::create_dir_all(&level0).unwrap();
        std::fs::write(level0.join("tx_0_0.dds"), b"").unwrap();
        std::fs::write(level0.join("tx_1_0.dds"), b"").unwrap();

        let descriptor = dir.path().join("earth.vt.json");
        std::fs::write(
            &descriptor,
            r#"{
                "VirtualTexture": { "ImageDirectory": "tiles", "BaseSplit": 0, "TileSize": 256 }
            }"#,
        )
        .unwrap();

        let vt = load_virtual_texture(&descriptor, &VirtualTextureOptions::default()).unwrap();
        assert_eq!(vt.tile_path(), dir.path().join("tiles"));
        assert_eq!(vt.tile_size(), 256);
        assert_eq!(vt.lod_count(), 1);
        assert_eq!(vt.stats().tiles, 2);
    }

    #[test]
    fn test_load_missing_descriptor() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_virtual_texture(
            dir.path().join("missing.json"),
            &VirtualTextureOptions::default(),
        );
        assert!(matches!(result, Err(VirtualTextureError::Io(_))));
    }
}

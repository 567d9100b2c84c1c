//! Tile Catalog Scan
//!
//! Seeds a [`QuadtreeIndex`] from the on-disk layout
//!
//! ```text
//! <root>/level0/<prefix><u>_<v>.<ext>
//! <root>/level1/<prefix><u>_<v>.<ext>
//! ...
//! ```
//!
//! Directory `levelN` holds the tiles of absolute level `N + base_split`.
//! Unreadable directories, unparsable file names and out-of-range coordinates
//! are skipped without failing the scan.

use std::path::{Path, PathBuf};

use crate::addressing::{MAX_LEVEL, TileAddress};
use crate::quadtree::QuadtreeIndex;
use crate::tile::Tile;

/// Path of the directory holding resolution level `index` (relative to the base split)
pub fn level_directory(root: &Path, index: u32) -> PathBuf {
    root.join(format!("level{index}"))
}

/// File name of a tile: `<prefix><u>_<v>.<ext>`
pub fn tile_file_name(prefix: &str, u: u32, v: u32, extension: &str) -> String {
    format!("{prefix}{u}_{v}.{extension}")
}

/// Parse `<prefix><u>_<v>` from the start of a file name.
///
/// Whatever follows `v` (normally `.<ext>`) is ignored. Both numbers accept an
/// optional sign so that negative values are recognised and then rejected by
/// the range check rather than by the parser.
pub fn parse_tile_name(name: &str, prefix: &str) -> Option<(i64, i64)> {
    let rest = name.strip_prefix(prefix)?;
    let (u, rest) = parse_int(rest)?;
    let rest = rest.strip_prefix('_')?;
    let (v, _) = parse_int(rest)?;
    Some((u, v))
}

fn parse_int(s: &str) -> Option<(i64, &str)> {
    let s = s.trim_start();
    let sign_len = usize::from(s.starts_with(['+', '-']));
    let digits = s[sign_len..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits == 0 {
        return None;
    }
    let end = sign_len + digits;
    let value = s[..end].parse().ok()?;
    Some((value, &s[end..]))
}

/// Result of a catalog scan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogSummary {
    /// Highest absolute level with a directory, plus one (1 if none were found)
    pub resolution_levels: u32,
    /// Directory indices that were present
    pub levels_found: Vec<u32>,
    /// Tiles added to the index
    pub tiles_inserted: usize,
    /// Directory entries that did not yield a tile
    pub entries_skipped: usize,
}

/// Scans a tile directory tree into a quadtree index
#[derive(Debug, Clone)]
pub struct CatalogScanner<'a> {
    root: &'a Path,
    base_split: u32,
    prefix: &'a str,
    max_levels: u32,
}

impl<'a> CatalogScanner<'a> {
    /// Create a scanner for the tiles under `root`
    pub fn new(root: &'a Path, base_split: u32, prefix: &'a str, max_levels: u32) -> Self {
        Self {
            root,
            base_split,
            prefix,
            max_levels,
        }
    }

    /// Walk every `levelN` directory and insert an unloaded tile for each match.
    pub fn scan(&self, index: &mut QuadtreeIndex) -> CatalogSummary {
        let mut summary = CatalogSummary::default();
        let mut max_level = 0;

        // A '%' in the prefix made the name template ambiguous for the original
        // tile tools, so such catalogs are treated as having no tile files.
        let parse_names = !self.prefix.contains('%');
        if !parse_names {
            log::warn!(
                "Tile prefix '{}' contains '%'; no tiles will be read from {}",
                self.prefix,
                self.root.display()
            );
        }

        for i in 0..self.max_levels {
            let Some(level) = i.checked_add(self.base_split).filter(|l| *l <= MAX_LEVEL) else {
                log::warn!("Resolution level {} exceeds the addressable range", i);
                break;
            };

            let path = level_directory(self.root, i);
            if !path.is_dir() {
                continue;
            }

            max_level = level;
            summary.levels_found.push(i);

            if parse_names {
                let (inserted, skipped) = self.scan_level(&path, level, index);
                log::debug!(
                    "Scanned {}: {} tiles at level {}, {} entries skipped",
                    path.display(),
                    inserted,
                    level,
                    skipped
                );
                summary.tiles_inserted += inserted;
                summary.entries_skipped += skipped;
            }
        }

        summary.resolution_levels = max_level + 1;
        log::info!(
            "Tile catalog {}: {} tiles in {} level directories, {} resolution levels",
            self.root.display(),
            summary.tiles_inserted,
            summary.levels_found.len(),
            summary.resolution_levels
        );
        summary
    }

    fn scan_level(&self, path: &Path, level: u32, index: &mut QuadtreeIndex) -> (usize, usize) {
        let entries = match std::fs::read_dir(path) {
            Ok(entries) => entries,
            Err(err) => {
                log::warn!("Cannot read tile directory {}: {}", path.display(), err);
                return (0, 0);
            }
        };

        let mut inserted = 0;
        let mut skipped = 0;
        for entry in entries.flatten() {
            let name = entry.file_name();
            let addr = name
                .to_str()
                .and_then(|name| parse_tile_name(name, self.prefix))
                .and_then(|(u, v)| {
                    let u = u32::try_from(u).ok()?;
                    let v = u32::try_from(v).ok()?;
                    let addr = TileAddress::new(level, u, v);
                    addr.is_valid().then_some(addr)
                });

            match addr {
                Some(addr) if index.insert(Tile::new(), addr) => inserted += 1,
                _ => skipped += 1,
            }
        }
        (inserted, skipped)
    }
}

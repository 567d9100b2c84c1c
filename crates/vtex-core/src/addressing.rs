//! Tile Addressing
//!
//! Coordinate math for the virtual texture tile grid.
//!
//! At absolute level `l` the grid is `2^(l+1)` tiles wide and `2^l` tiles tall,
//! so the full texture is always a 2:1 panorama. The two quadtree roots split
//! the width into west and east square halves, and every further level quarters
//! a node's footprint by interleaving one bit of `u` and one bit of `v`.

/// Highest absolute level that can be addressed with 32-bit tile coordinates.
pub const MAX_LEVEL: u32 = 31;

/// Number of quadtree roots (west and east halves of the texture).
pub const ROOT_COUNT: usize = 2;

/// Number of children per quadtree node.
pub const CHILD_COUNT: usize = 4;

/// Returns true if `x` has at most one bit set.
///
/// Zero passes the test, matching the plain `x & (x - 1) == 0` check used for
/// tile and image dimensions; callers that need a positive size check it
/// separately.
pub fn is_power_of_two(x: u32) -> bool {
    x & x.wrapping_sub(1) == 0
}

/// Width of the tile grid at an absolute level, in tiles.
pub fn grid_width(level: u32) -> u64 {
    debug_assert!(level <= MAX_LEVEL);
    2u64 << level
}

/// Height of the tile grid at an absolute level, in tiles.
pub fn grid_height(level: u32) -> u64 {
    debug_assert!(level <= MAX_LEVEL);
    1u64 << level
}

/// Absolute address of one tile: level plus grid position at that level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileAddress {
    /// Absolute level (caller LOD plus base split)
    pub level: u32,
    /// Horizontal tile index
    pub u: u32,
    /// Vertical tile index
    pub v: u32,
}

impl TileAddress {
    /// Create a new tile address
    pub fn new(level: u32, u: u32, v: u32) -> Self {
        Self { level, u, v }
    }

    /// Check the address against the grid bounds of its level
    pub fn is_valid(&self) -> bool {
        self.level <= MAX_LEVEL
            && u64::from(self.u) < grid_width(self.level)
            && u64::from(self.v) < grid_height(self.level)
    }

    /// Index of the root holding this tile: 0 for the west half, 1 for the east.
    pub fn root_index(&self) -> usize {
        debug_assert!(self.is_valid());
        (u64::from(self.u) >> self.level) as usize
    }

    /// 2-bit child selector taken at descent step `step` (0-based from the root).
    pub fn child_index(&self, step: u32) -> usize {
        debug_assert!(step < self.level);
        let shift = self.level - step - 1;
        let mask = 1u32 << shift;
        ((((self.v & mask) << 1) | (self.u & mask)) >> shift) as usize
    }

    /// Child selectors from the root down to this tile's level.
    pub fn path(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.level).map(move |step| self.child_index(step))
    }

    /// Address of the ancestor at a coarser level that covers this tile.
    ///
    /// Returns `None` if `level` is finer than this address.
    pub fn ancestor(&self, level: u32) -> Option<TileAddress> {
        let diff = self.level.checked_sub(level)?;
        Some(TileAddress {
            level,
            u: self.u >> diff,
            v: self.v >> diff,
        })
    }
}

impl std::fmt::Display for TileAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "L{}({}, {})", self.level, self.u, self.v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_power_of_two() {
        assert!(is_power_of_two(64));
        assert!(is_power_of_two(1024));
        assert!(is_power_of_two(1));
        assert!(!is_power_of_two(96));
        assert!(!is_power_of_two(65));
    }

    #[test]
    fn test_grid_is_twice_as_wide_as_tall() {
        for level in 0..8 {
            assert_eq!(grid_width(level), 2 * grid_height(level));
        }
        assert_eq!(grid_width(0), 2);
        assert_eq!(grid_height(3), 8);
    }

    #[test]
    fn test_bounds() {
        assert!(TileAddress::new(0, 1, 0).is_valid());
        assert!(!TileAddress::new(0, 2, 0).is_valid());
        assert!(!TileAddress::new(0, 0, 1).is_valid());
        assert!(TileAddress::new(3, 15, 7).is_valid());
        assert!(!TileAddress::new(3, 16, 7).is_valid());
        assert!(!TileAddress::new(MAX_LEVEL + 1, 0, 0).is_valid());
        assert!(TileAddress::new(MAX_LEVEL, u32::MAX, u32::MAX >> 1).is_valid());
    }

    #[test]
    fn test_root_selection() {
        assert_eq!(TileAddress::new(2, 3, 1).root_index(), 0);
        assert_eq!(TileAddress::new(2, 4, 1).root_index(), 1);
        assert_eq!(TileAddress::new(0, 1, 0).root_index(), 1);
    }

    #[test]
    fn test_path_interleaves_bits() {
        // u = 0b101, v = 0b010 at level 3 -> steps pick (v_bit << 1) | u_bit
        let addr = TileAddress::new(3, 5, 2);
        let path: Vec<usize> = addr.path().collect();
        assert_eq!(path, vec![1, 2, 1]);
    }

    #[test]
    fn test_ancestor_shares_path_prefix() {
        let addr = TileAddress::new(4, 10, 4);
        let parent = addr.ancestor(3).unwrap();
        assert_eq!(parent, TileAddress::new(3, 5, 2));
        assert_eq!(parent.root_index(), addr.root_index());

        let fine: Vec<usize> = addr.path().collect();
        let coarse: Vec<usize> = parent.path().collect();
        assert_eq!(&fine[..3], &coarse[..]);

        assert!(parent.ancestor(4).is_none());
    }
}

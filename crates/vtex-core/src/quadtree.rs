//! Quadtree Tile Index
//!
//! Two roots split the coarsest level into west and east squares. Every node
//! below owns up to four children covering the quadrants of its footprint, and
//! optionally the tile found on disk for exactly its own level and position.
//! Nodes without a tile only route lookups further down.

use crate::addressing::{CHILD_COUNT, ROOT_COUNT, TileAddress};
use crate::tile::Tile;

/// One node of the tile quadtree
#[derive(Debug, Default)]
pub struct QuadtreeNode {
    tile: Option<Tile>,
    children: [Option<Box<QuadtreeNode>>; CHILD_COUNT],
}

impl QuadtreeNode {
    /// Tile owned by this node, if any
    pub fn tile(&self) -> Option<&Tile> {
        self.tile.as_ref()
    }

    /// Child node in the given quadrant
    pub fn child(&self, index: usize) -> Option<&QuadtreeNode> {
        self.children[index].as_deref()
    }

    fn child_or_insert(&mut self, index: usize) -> &mut QuadtreeNode {
        self.children[index].get_or_insert_with(Box::default)
    }

    fn count(&self, stats: &mut QuadtreeStats) {
        stats.nodes += 1;
        if self.tile.is_some() {
            stats.tiles += 1;
        }
        for child in self.children.iter().flatten() {
            child.count(stats);
        }
    }
}

/// Tile found by a best-match lookup
#[derive(Debug, Clone, Copy)]
pub struct BestMatch<'a> {
    /// Tile covering the requested address
    pub tile: &'a Tile,
    /// Absolute level the tile was found at
    pub level: u32,
}

/// Node and tile counts for diagnostics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuadtreeStats {
    /// Total nodes, roots included
    pub nodes: usize,
    /// Nodes that own a tile
    pub tiles: usize,
}

/// Quadtree index over all discovered tiles
#[derive(Debug, Default)]
pub struct QuadtreeIndex {
    roots: [QuadtreeNode; ROOT_COUNT],
}

impl QuadtreeIndex {
    /// Create an empty index holding just the two roots
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a tile at `addr`, creating routing nodes along the way.
    ///
    /// The first tile inserted at an address wins; later ones are dropped and
    /// `false` is returned. Invalid addresses are rejected the same way.
    pub fn insert(&mut self, tile: Tile, addr: TileAddress) -> bool {
        if !addr.is_valid() {
            return false;
        }

        let mut node = &mut self.roots[addr.root_index()];
        for child in addr.path() {
            node = node.child_or_insert(child);
        }

        if node.tile.is_some() {
            return false;
        }
        node.tile = Some(tile);
        true
    }

    /// Find the tile at `addr`, or the deepest ancestor along its path that has one.
    ///
    /// Returns `None` only when no node on the path, root included, owns a tile.
    pub fn find_best_match(&self, addr: TileAddress) -> Option<BestMatch<'_>> {
        if !addr.is_valid() {
            return None;
        }

        let mut node = &self.roots[addr.root_index()];
        let mut best = node.tile().map(|tile| BestMatch { tile, level: 0 });

        for (step, child) in addr.path().enumerate() {
            let Some(next) = node.child(child) else {
                break;
            };
            node = next;
            if let Some(tile) = node.tile() {
                best = Some(BestMatch {
                    tile,
                    level: step as u32 + 1,
                });
            }
        }

        best
    }

    /// Tile stored at exactly `addr`
    pub fn get(&self, addr: TileAddress) -> Option<&Tile> {
        self.node(addr).and_then(QuadtreeNode::tile)
    }

    /// Mutable tile stored at exactly `addr`
    pub fn get_mut(&mut self, addr: TileAddress) -> Option<&mut Tile> {
        if !addr.is_valid() {
            return None;
        }

        let mut node = &mut self.roots[addr.root_index()];
        for child in addr.path() {
            node = node.children[child].as_deref_mut()?;
        }
        node.tile.as_mut()
    }

    /// Root node for the west (0) or east (1) half
    pub fn root(&self, index: usize) -> &QuadtreeNode {
        &self.roots[index]
    }

    /// Count nodes and tiles
    pub fn stats(&self) -> QuadtreeStats {
        let mut stats = QuadtreeStats::default();
        for root in &self.roots {
            root.count(&mut stats);
        }
        stats
    }

    fn node(&self, addr: TileAddress) -> Option<&QuadtreeNode> {
        if !addr.is_valid() {
            return None;
        }

        let mut node = &self.roots[addr.root_index()];
        for child in addr.path() {
            node = node.child(child)?;
        }
        Some(node)
    }
}

//! Quadtree Benchmarks
//!
//! Insert and best-match lookup over a dense tile index

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use vtex_core::addressing::{TileAddress, grid_height, grid_width};
use vtex_core::quadtree::QuadtreeIndex;
use vtex_core::tile::Tile;

fn fill(index: &mut QuadtreeIndex, level: u32) {
    for v in 0..grid_height(level) as u32 {
        for u in 0..grid_width(level) as u32 {
            index.insert(Tile::new(), TileAddress::new(level, u, v));
        }
    }
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("quadtree_insert");

    for level in [4u32, 6, 8].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(level), level, |b, &level| {
            b.iter(|| {
                let mut index = QuadtreeIndex::new();
                fill(&mut index, level);
                index
            });
        });
    }

    group.finish();
}

fn bench_best_match(c: &mut Criterion) {
    let mut group = c.benchmark_group("quadtree_best_match");

    // Tiles down to level 6; requests at level 12 always fall back
    let mut index = QuadtreeIndex::new();
    for level in 0..=6 {
        fill(&mut index, level);
    }

    for level in [6u32, 12].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(level), level, |b, &level| {
            let width = grid_width(level) as u32;
            let height = grid_height(level) as u32;
            b.iter(|| {
                let mut found = 0u32;
                for i in 0..1024u32 {
                    let addr = TileAddress::new(level, (i * 7919) % width, (i * 104729) % height);
                    if let Some(m) = index.find_best_match(black_box(addr)) {
                        found += m.level;
                    }
                }
                found
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_insert, bench_best_match);
criterion_main!(benches);

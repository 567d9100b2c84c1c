//! Shared Virtual Texture
//!
//! A virtual texture loads tiles from inside `get_tile`, so every access
//! mutates it. This handle serialises all access behind one lock so several
//! threads (for example a render pass and a prefetcher) can share a texture.

use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use crate::manager::{TextureTile, VirtualTexture};

/// Cloneable, thread-safe handle to a virtual texture
#[derive(Debug, Clone)]
pub struct SharedVirtualTexture {
    inner: Arc<Mutex<VirtualTexture>>,
}

impl SharedVirtualTexture {
    /// Wrap a virtual texture
    pub fn new(texture: VirtualTexture) -> Self {
        Self {
            inner: Arc::new(Mutex::new(texture)),
        }
    }

    /// Request a tile; blocks while another thread holds the texture
    pub fn get_tile(&self, lod: i32, u: i32, v: i32) -> TextureTile {
        self.inner.lock().get_tile(lod, u, v)
    }

    pub fn begin_usage(&self) {
        self.inner.lock().begin_usage();
    }

    pub fn end_usage(&self) {
        self.inner.lock().end_usage();
    }

    pub fn lod_count(&self) -> u32 {
        self.inner.lock().lod_count()
    }

    /// Lock the texture for a batch of requests
    pub fn lock(&self) -> MutexGuard<'_, VirtualTexture> {
        self.inner.lock()
    }
}

impl From<VirtualTexture> for SharedVirtualTexture {
    fn from(texture: VirtualTexture) -> Self {
        Self::new(texture)
    }
}

//! On-disk tile cache
//!
//! A tile cache is only a naming and permission policy: a root directory and
//! the mode used when creating directories below it. Tiles are stored as the
//! raw bytes received from the server at
//! `{root}/{provider}/{zoom}/{x}/{y}`.
//!
//! Reads and writes run on tokio's blocking pool. Concurrent writers to the
//! same key are not coordinated; they write identical bytes.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::trace;

use crate::coord::TileCoord;

/// Default directory permission (`rwxrwxrwx`, reduced by the umask).
pub const DEFAULT_CACHE_PERM: u32 = 0o777;

/// Cache location and creation policy.
pub trait TileCache: Send + Sync {
    /// Root directory of the cache.
    fn path(&self) -> &Path;

    /// Permission bits for created directories. Files get the same bits with
    /// execute stripped.
    fn perm(&self) -> u32;
}

/// Plain [`TileCache`] value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticTileCache {
    path: PathBuf,
    perm: u32,
}

impl StaticTileCache {
    /// Creates a cache rooted at `path`.
    pub fn new(path: impl Into<PathBuf>, perm: u32) -> Self {
        Self {
            path: path.into(),
            perm,
        }
    }

    /// Creates a cache below the platform user cache directory,
    /// e.g. `~/.cache/staticmaps/<name>` on Linux.
    ///
    /// Returns `None` if the platform has no user cache directory.
    pub fn from_user_cache(name: &str, perm: u32) -> Option<Self> {
        dirs::cache_dir().map(|dir| Self::new(dir.join("staticmaps").join(name), perm))
    }
}

impl TileCache for StaticTileCache {
    fn path(&self) -> &Path {
        &self.path
    }

    fn perm(&self) -> u32 {
        self.perm
    }
}

/// Shared handle to a cache policy.
pub type SharedTileCache = Arc<dyn TileCache>;

/// File path of a tile inside the cache.
pub fn tile_path(cache: &dyn TileCache, provider: &str, tile: &TileCoord) -> PathBuf {
    cache
        .path()
        .join(provider)
        .join(tile.zoom.to_string())
        .join(tile.x.to_string())
        .join(tile.y.to_string())
}

/// Reads a cached tile, `None` on any miss or read failure.
pub async fn read_tile(path: PathBuf) -> Option<Vec<u8>> {
    tokio::task::spawn_blocking(move || std::fs::read(&path).ok())
        .await
        .ok()
        .flatten()
}

/// Writes a tile to the cache, creating parent directories as needed.
pub async fn write_tile(path: PathBuf, perm: u32, data: Vec<u8>) -> io::Result<()> {
    tokio::task::spawn_blocking(move || store(&path, perm, &data))
        .await
        .map_err(|e| io::Error::other(e.to_string()))?
}

fn store(path: &Path, perm: u32, data: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        create_dirs(parent, perm)?;
    }

    let mut options = std::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(perm & 0o666);
    }
    #[cfg(not(unix))]
    let _ = perm;

    let mut file = options.open(path)?;
    io::Write::write_all(&mut file, data)?;
    trace!(path = %path.display(), bytes = data.len(), "Tile cached");
    Ok(())
}

fn create_dirs(dir: &Path, perm: u32) -> io::Result<()> {
    match std::fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => return Ok(()),
        Ok(_) => {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("{} exists but is not a directory", dir.display()),
            ))
        }
        Err(_) => {}
    }

    let mut builder = std::fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(perm);
    }
    #[cfg(not(unix))]
    let _ = perm;
    builder.create(dir)
}

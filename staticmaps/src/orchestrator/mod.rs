//! Tile layer orchestration
//!
//! Renders one tile layer into the working canvas. Every tile covering the
//! transformer's grid is fetched in its own tokio task; decoded tiles come
//! back through an unbounded channel and are drawn by the calling task once
//! all fetches have finished, so the canvas never needs a lock.
//!
//! Individual tile failures never abort the layer. They are logged and
//! counted in [`LayerStats`], and the affected cells keep whatever was
//! underneath.

mod types;

pub use types::{FetchedTile, LayerStats, TileJob};

use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use types::TileOutcome;

use crate::coord::TileCoord;
use crate::fetcher::{FetchError, TileFetcher};
use crate::provider::AsyncHttpClient;
use crate::render::Canvas;
use crate::transform::Transformer;

/// Enumerates the tiles covering the transformer's grid.
///
/// Column indices wrap around the antimeridian. Rows beyond the poles have no
/// tile and are skipped.
///
/// # Returns
///
/// The jobs in row-major grid order and the number of skipped cells.
pub fn covering_tiles(transformer: &Transformer) -> (Vec<TileJob>, usize) {
    let zoom = transformer.zoom();
    let n = transformer.tiles_per_axis() as i64;
    let tile_size = transformer.tile_size() as i32;
    let (origin_x, origin_y) = transformer.tile_origin();
    let (count_x, count_y) = transformer.tile_count();

    let mut jobs = Vec::with_capacity(count_x as usize * count_y as usize);
    let mut skipped = 0;

    for xx in 0..count_x {
        let mut x = origin_x + i64::from(xx);
        if x < 0 {
            x += n;
        } else if x >= n {
            x -= n;
        }
        if x < 0 || x >= n {
            warn!(zoom = zoom, x = x, "Skipping out-of-bounds tile column");
            skipped += count_y as usize;
            continue;
        }

        for yy in 0..count_y {
            let y = origin_y + i64::from(yy);
            if y < 0 || y >= n {
                warn!(zoom = zoom, y = y, "Skipping out-of-bounds tile row");
                skipped += 1;
                continue;
            }
            jobs.push(TileJob {
                tile: TileCoord::new(zoom, x as u32, y as u32),
                offset_x: xx as i32 * tile_size,
                offset_y: yy as i32 * tile_size,
            });
        }
    }

    jobs.sort_by_key(|j| (j.offset_y, j.offset_x));
    (jobs, skipped)
}

/// Fetches every tile of one layer concurrently and draws them.
///
/// Waits for all fetch tasks before drawing anything. Providers without a URL
/// template are skipped entirely.
pub async fn render_layer<C>(
    fetcher: &TileFetcher<C>,
    transformer: &Transformer,
    canvas: &mut Canvas,
) -> LayerStats
where
    C: AsyncHttpClient + 'static,
{
    let provider = fetcher.provider();
    if provider.is_none() {
        debug!(provider = %provider.name, "Provider has no tiles, skipping layer");
        return LayerStats::default();
    }

    let (jobs, skipped) = covering_tiles(transformer);
    let mut stats = LayerStats {
        skipped,
        ..LayerStats::default()
    };

    let (tx, mut rx) = mpsc::unbounded_channel::<FetchedTile>();
    let mut tasks = JoinSet::new();

    for job in jobs {
        let fetcher = fetcher.clone();
        let tx = tx.clone();
        tasks.spawn(async move { fetch_one(fetcher, job, tx).await });
        stats.dispatched += 1;
    }
    drop(tx);

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(TileOutcome::Delivered) => {}
            Ok(TileOutcome::NotFound) => stats.not_found += 1,
            Ok(TileOutcome::Failed) => stats.failed += 1,
            Err(e) => {
                warn!(error = %e, "Tile fetch task aborted");
                stats.failed += 1;
            }
        }
    }

    while let Some(tile) = rx.recv().await {
        canvas.draw_image(&tile.image, tile.offset_x, tile.offset_y);
        stats.drawn += 1;
    }

    debug!(
        provider = %provider.name,
        zoom = transformer.zoom(),
        dispatched = stats.dispatched,
        drawn = stats.drawn,
        not_found = stats.not_found,
        failed = stats.failed,
        skipped = stats.skipped,
        "Layer rendered"
    );
    stats
}

async fn fetch_one<C: AsyncHttpClient>(
    fetcher: TileFetcher<C>,
    job: TileJob,
    tx: mpsc::UnboundedSender<FetchedTile>,
) -> TileOutcome {
    match fetcher.fetch(job.tile).await {
        Ok(image) => {
            let delivered = FetchedTile {
                offset_x: job.offset_x,
                offset_y: job.offset_y,
                image,
            };
            if tx.send(delivered).is_err() {
                warn!(tile = %job.tile, "Tile receiver dropped");
                return TileOutcome::Failed;
            }
            TileOutcome::Delivered
        }
        Err(FetchError::NotFound(what)) => {
            if fetcher.provider().ignore_not_found {
                debug!(tile = %job.tile, url = %what, "Tile not found (ignored)");
            } else {
                warn!(tile = %job.tile, url = %what, "Tile not found");
            }
            TileOutcome::NotFound
        }
        Err(e) => {
            warn!(tile = %job.tile, error = %e, "Failed to fetch tile");
            TileOutcome::Failed
        }
    }
}

//! Tile-parallel render driver.
//!
//! Each tile becomes a [`TileTask`] that owns its RNG and renders into its
//! own buffer on a rayon pool. Finished tiles come back over a channel; the
//! calling thread is the only one that writes to the film and the preview.

use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crate::error::{RenderError, RenderResult, TileFailure};
use crate::film::{Film, FilmTile};
use crate::integrator::Integrator;
use crate::preview::PreviewBuffer;
use crate::scene::Scene;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Progress is logged every time this share of tiles completes.
const PROGRESS_STEP_PERCENT: usize = 5;

/// Golden-ratio increment used to spread tile indices across seeds.
const SEED_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

/// One unit of work: a tile and the seed for its private RNG.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileTask {
    pub index: usize,
    pub tile: FilmTile,
    pub seed: u64,
}

enum TileOutcome {
    Done { task: TileTask, rgb: Vec<u8> },
    Failed(TileFailure),
}

/// Summary of a finished render.
#[derive(Debug, Clone, Copy)]
pub struct RenderStats {
    pub tiles: usize,
    pub threads: usize,
    pub elapsed: Duration,
}

/// SplitMix64 finalizer.
pub fn splitmix64(mut z: u64) -> u64 {
    z = z.wrapping_add(SEED_STRIDE);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Seed of tile `index` for a render seeded with `seed`.
pub fn tile_seed(seed: u64, index: usize) -> u64 {
    splitmix64(seed ^ (index as u64).wrapping_mul(SEED_STRIDE))
}

/// Fixed-size worker pool that renders a film tile by tile.
#[derive(Debug, Clone, Copy)]
pub struct TileScheduler {
    threads: usize,
    seed: u64,
}

impl TileScheduler {
    /// `threads == 0` uses the available parallelism.
    pub fn new(threads: usize, seed: u64) -> Self {
        let threads = if threads == 0 {
            std::thread::available_parallelism().map_or(1, |n| n.get())
        } else {
            threads
        };
        Self { threads, seed }
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    /// One task per film tile, in the film's submission order.
    pub fn tasks(&self, film: &Film) -> Vec<TileTask> {
        film.tiles()
            .iter()
            .enumerate()
            .map(|(index, &tile)| TileTask {
                index,
                tile,
                seed: tile_seed(self.seed, index),
            })
            .collect()
    }

    /// Renders every tile of `film`, blocking until all tasks have reported.
    ///
    /// A tile whose task panics is left black and reported in
    /// [`RenderError::TileFailures`]; every other tile is still written.
    pub fn render(
        &self,
        scene: &Scene,
        integrator: &Integrator,
        film: &mut Film,
        preview: Option<&PreviewBuffer>,
    ) -> RenderResult<RenderStats> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.threads)
            .thread_name(|i| format!("tessera-tile-{}", i))
            .build()?;

        let tasks = self.tasks(film);
        let total = tasks.len();
        let (width, height) = (film.width(), film.height());

        log::info!(
            "Rendering {}x{}: {} spp, depth {}, {} tiles, {} threads",
            width,
            height,
            integrator.samples_per_pixel(),
            integrator.max_depth(),
            total,
            self.threads
        );

        let start = Instant::now();
        let mut failures = Vec::new();
        let (tx, rx) = mpsc::channel::<TileOutcome>();

        std::thread::scope(|s| {
            s.spawn(move || {
                pool.scope(move |pool_scope| {
                    for task in tasks {
                        let tx = tx.clone();
                        pool_scope.spawn(move |_| {
                            let outcome = run_task(task, scene, integrator, width, height);
                            // The driver only hangs up after every task has reported.
                            let _ = tx.send(outcome);
                        });
                    }
                });
            });

            let mut done = 0;
            let mut last_step = 0;
            for outcome in rx {
                match outcome {
                    TileOutcome::Done { task, rgb } => {
                        film.write_tile(&task.tile, &rgb);
                        if let Some(preview) = preview {
                            preview.publish(&task.tile, &rgb);
                        }
                        log::debug!("Tile {} finished: {:?}", task.index, task.tile);
                    }
                    TileOutcome::Failed(failure) => {
                        log::error!(
                            "Tile {} ({:?}) failed: {}",
                            failure.index,
                            failure.tile,
                            failure.message
                        );
                        failures.push(failure);
                    }
                }

                done += 1;
                let step = done * 100 / total / PROGRESS_STEP_PERCENT;
                if step > last_step {
                    last_step = step;
                    log::info!(
                        "Progress: {}% ({}/{} tiles)",
                        step * PROGRESS_STEP_PERCENT,
                        done,
                        total
                    );
                }
            }
        });

        let elapsed = start.elapsed();
        log::info!("Render finished in {:.2?}", elapsed);

        if !failures.is_empty() {
            failures.sort_by_key(|f| f.index);
            return Err(RenderError::TileFailures(failures));
        }

        Ok(RenderStats {
            tiles: total,
            threads: self.threads,
            elapsed,
        })
    }
}

fn run_task(
    task: TileTask,
    scene: &Scene,
    integrator: &Integrator,
    width: u32,
    height: u32,
) -> TileOutcome {
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        let mut rng = StdRng::seed_from_u64(task.seed);
        integrator.render_tile(scene, &task.tile, width, height, &mut rng)
    }));

    match result {
        Ok(rgb) => TileOutcome::Done { task, rgb },
        Err(payload) => TileOutcome::Failed(TileFailure {
            index: task.index,
            tile: task.tile,
            message: panic_message(payload.as_ref()),
        }),
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

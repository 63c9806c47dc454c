//! Multi-threaded render scheduler.
//!
//! The image is cut into horizontal row slices, one per worker thread.
//! Each worker owns its rows outright, so no pixel is shared. The only
//! shared mutable state is a relaxed sample counter which the calling
//! thread polls to report progress while the workers run.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use ember_core::{Color, PixelSink, Rgb8};

use crate::camera::RayGenerator;
use crate::error::{RenderError, RenderResult};
use crate::integrator::{scrub_nan, PathIntegrator, RussianRoulette};
use crate::random;
use crate::scene::Scene;

/// Render configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Maximum ray bounce depth
    pub max_depth: u32,
    /// Worker threads, one row slice each
    pub threads: usize,
    /// Display gamma; pixel values are raised to `1 / gamma`
    pub gamma: f32,
    /// Radiance returned for rays that escape the scene
    pub background: Color,
    /// Russian-roulette continuation probability per bounce
    pub continue_probability: f32,
    /// Fixed seed for reproducible output
    pub seed: Option<u64>,
    /// How often progress is reported
    pub progress_interval: Duration,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 711,
            height: 400,
            samples_per_pixel: 100,
            max_depth: 50,
            threads: 8,
            gamma: 2.0,
            background: Color::ZERO,
            continue_probability: 0.8,
            seed: None,
            progress_interval: Duration::from_secs(1),
        }
    }
}

impl RenderConfig {
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_samples(mut self, samples_per_pixel: u32) -> Self {
        self.samples_per_pixel = samples_per_pixel;
        self
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    pub fn with_gamma(mut self, gamma: f32) -> Self {
        self.gamma = gamma;
        self
    }

    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    pub fn with_continue_probability(mut self, probability: f32) -> Self {
        self.continue_probability = probability;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_progress_interval(mut self, interval: Duration) -> Self {
        self.progress_interval = interval;
        self
    }
}

/// Snapshot of the shared sample counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub completed: u64,
    pub total: u64,
}

impl Progress {
    /// Completed fraction in `[0, 1]`.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }
}

/// Summary of a finished render.
#[derive(Debug, Clone, Copy)]
pub struct RenderStats {
    pub samples: u64,
    pub slices: usize,
    pub elapsed: Duration,
}

/// Contiguous range of image rows `[start, end)`, counted from the top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowSlice {
    pub start: u32,
    pub end: u32,
}

impl RowSlice {
    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Split `height` rows into `count` equal slices; the last one absorbs the
/// remainder. `count` is clamped to `1..=height`.
pub fn row_slices(height: u32, count: usize) -> Vec<RowSlice> {
    if height == 0 {
        return Vec::new();
    }

    let count = count.clamp(1, height as usize) as u32;
    let rows_per_slice = height / count;

    (0..count)
        .map(|i| RowSlice {
            start: i * rows_per_slice,
            end: if i == count - 1 {
                height
            } else {
                (i + 1) * rows_per_slice
            },
        })
        .collect()
}

/// Average accumulated radiance, scrub NaN, gamma-correct and quantize.
pub fn tone_map(sum: Color, samples: u32, gamma: f32) -> Rgb8 {
    let average = scrub_nan(sum / samples.max(1) as f32);
    let inv_gamma = 1.0 / gamma;

    let quantize = |c: f32| (255.999 * c.max(0.0).powf(inv_gamma).clamp(0.0, 1.0)) as u8;
    Rgb8::new(quantize(average.x), quantize(average.y), quantize(average.z))
}

/// Read-only state shared by the workers.
struct SliceContext<'a> {
    config: &'a RenderConfig,
    camera: &'a dyn RayGenerator,
    scene: &'a Scene,
    integrator: PathIntegrator,
    samples_per_pixel: u32,
    completed: &'a AtomicU64,
}

/// Render every pixel of `slice` into `pixels`, which holds exactly the
/// slice's rows.
fn render_slice(ctx: &SliceContext, slice: RowSlice, pixels: &mut [Rgb8]) {
    let width = ctx.config.width;
    let height = ctx.config.height;
    let u_span = width.saturating_sub(1).max(1) as f32;
    let v_span = height.saturating_sub(1).max(1) as f32;

    let rows = pixels.chunks_mut(width as usize);
    for (row, row_pixels) in (slice.start..slice.end).zip(rows) {
        if let Some(seed) = ctx.config.seed {
            random::reseed(seed.wrapping_add(row as u64));
        }

        // Image rows run top to bottom; v runs bottom to top.
        let v_base = (height - 1 - row) as f32;

        for (x, pixel) in row_pixels.iter_mut().enumerate() {
            let mut sum = Color::ZERO;
            for _ in 0..ctx.samples_per_pixel {
                let u = (x as f32 + random::gen_f32()) / u_span;
                let v = (v_base + random::gen_f32()) / v_span;

                let ray = ctx.camera.generate_ray(u, v);
                sum += scrub_nan(ctx.integrator.radiance(
                    &ray,
                    ctx.scene.world(),
                    ctx.scene.lights(),
                    ctx.config.max_depth,
                ));
                ctx.completed.fetch_add(1, Ordering::Relaxed);
            }

            *pixel = tone_map(sum, ctx.samples_per_pixel, ctx.config.gamma);
        }
    }
}

/// Render `scene` through `camera` into `sink`.
///
/// Blocks until every worker has finished. `on_progress` is called on the
/// calling thread every `config.progress_interval` and once more at the
/// end. The sink must match the configured resolution.
pub fn render(
    config: &RenderConfig,
    camera: &dyn RayGenerator,
    scene: &Scene,
    sink: &mut dyn PixelSink,
    mut on_progress: impl FnMut(Progress),
) -> RenderResult<RenderStats> {
    let (width, height) = (config.width, config.height);
    if sink.width() != width || sink.height() != height {
        return Err(RenderError::SinkSize {
            width,
            height,
            actual_width: sink.width(),
            actual_height: sink.height(),
        });
    }

    let samples_per_pixel = if config.samples_per_pixel == 0 {
        log::warn!("samples per pixel is 0, using 1");
        1
    } else {
        config.samples_per_pixel
    };

    let slices = row_slices(height, config.threads);
    if slices.len() != config.threads {
        log::warn!(
            "Using {} render threads instead of {} for a {}-row image",
            slices.len(),
            config.threads,
            height
        );
    }

    let total = width as u64 * height as u64 * samples_per_pixel as u64;
    let start = Instant::now();
    if total == 0 {
        on_progress(Progress {
            completed: 0,
            total: 0,
        });
        return Ok(RenderStats {
            samples: 0,
            slices: 0,
            elapsed: start.elapsed(),
        });
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(slices.len())
        .thread_name(|i| format!("ember-render-{i}"))
        .build()?;

    let completed = AtomicU64::new(0);
    let finished = AtomicUsize::new(0);
    let ctx = SliceContext {
        config,
        camera,
        scene,
        integrator: PathIntegrator::new(
            config.background,
            RussianRoulette::new(config.continue_probability),
        ),
        samples_per_pixel,
        completed: &completed,
    };

    log::info!(
        "Rendering {}x{} at {} spp, max depth {}, {} threads",
        width,
        height,
        samples_per_pixel,
        config.max_depth,
        slices.len()
    );

    let mut pixels = vec![Rgb8::BLACK; width as usize * height as usize];

    pool.in_place_scope(|scope| {
        let mut rest: &mut [Rgb8] = &mut pixels;
        for &slice in &slices {
            let (chunk, tail) =
                std::mem::take(&mut rest).split_at_mut(slice.len() as usize * width as usize);
            rest = tail;

            let ctx = &ctx;
            let finished = &finished;
            scope.spawn(move |_| {
                render_slice(ctx, slice, chunk);
                finished.fetch_add(1, Ordering::Release);
                log::debug!("Finished rows {}..{}", slice.start, slice.end);
            });
        }

        loop {
            thread::sleep(config.progress_interval);
            let done = completed.load(Ordering::Relaxed);
            if done >= total || finished.load(Ordering::Acquire) == slices.len() {
                break;
            }
            on_progress(Progress {
                completed: done,
                total,
            });
        }
    });

    on_progress(Progress {
        completed: completed.load(Ordering::Relaxed),
        total,
    });

    for (i, &pixel) in pixels.iter().enumerate() {
        let i = i as u32;
        sink.set_pixel(i % width, i / width, pixel);
    }

    let stats = RenderStats {
        samples: completed.load(Ordering::Relaxed),
        slices: slices.len(),
        elapsed: start.elapsed(),
    };
    log::info!(
        "Rendered {} samples in {:.3}s",
        stats.samples,
        stats.elapsed.as_secs_f64()
    );

    Ok(stats)
}

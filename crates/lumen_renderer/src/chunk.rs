//! Chunked parallel rendering.
//!
//! The pixel indices `[0, width * height)` are split into one contiguous
//! chunk per core. Each chunk owns a disjoint `&mut` slice of the output,
//! so workers never synchronize.

use crate::renderer::{color_to_rgb, render_pixel};
use crate::sampling::pixel_seed;
use crate::{Camera, PixelBuffer, RenderResult, Shape};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::ops::Range;
use std::time::Instant;

/// Split `[0, total)` into `cores` contiguous ranges.
///
/// Every range holds `total / cores` indices except the last, which also
/// takes the remainder. With more cores than indices the leading ranges
/// are empty.
pub fn partition(total: usize, cores: usize) -> Vec<Range<usize>> {
    let cores = cores.max(1);
    let base = total / cores;

    (0..cores)
        .map(|i| {
            let start = i * base;
            let end = if i + 1 == cores { total } else { start + base };
            start..end
        })
        .collect()
}

/// Render the whole image with `camera.cores()` threads.
///
/// Every pixel draws from its own generator seeded by
/// [`pixel_seed`]`(seed, index)`, so the result does not depend on the
/// core count.
pub fn render(camera: &Camera, world: &dyn Shape, seed: u64) -> RenderResult<PixelBuffer> {
    let width = camera.image_width();
    let height = camera.image_height();
    let total = camera.pixel_count();
    let cores = camera.cores();
    let chunks = partition(total, cores);

    log::info!(
        "Rendering {}x{} at {} rays per pixel on {} cores ({} chunks)",
        width,
        height,
        camera.rays_per_pixel(),
        cores,
        chunks.len()
    );
    if cores > total {
        log::warn!(
            "{} cores for {} pixels, {} chunks will be empty",
            cores,
            total,
            cores - total
        );
    }

    let start = Instant::now();
    let mut buffer = PixelBuffer::new(width, height);

    // Carve the buffer into one slice per chunk, in order
    let mut slices = Vec::with_capacity(chunks.len());
    let mut rest = buffer.pixels_mut();
    for range in &chunks {
        let (head, tail) = std::mem::take(&mut rest).split_at_mut(range.len());
        slices.push(head);
        rest = tail;
    }

    if cores == 1 {
        for (range, pixels) in chunks.iter().zip(slices) {
            render_chunk(0, camera, world, seed, range.clone(), pixels);
        }
    } else {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(cores)
            .thread_name(|i| format!("lumen-render-{i}"))
            .build()?;

        pool.scope(|scope| {
            for (index, (range, pixels)) in chunks.iter().zip(slices).enumerate() {
                let range = range.clone();
                scope.spawn(move |_| render_chunk(index, camera, world, seed, range, pixels));
            }
        });
    }

    let elapsed = start.elapsed();
    let rays = total as f64 * camera.rays_per_pixel() as f64;
    log::info!(
        "Render complete in {:.2?} ({:.0} rays/s)",
        elapsed,
        rays / elapsed.as_secs_f64().max(f64::EPSILON)
    );

    Ok(buffer)
}

/// Shade every pixel index in `range` into `pixels`.
fn render_chunk(
    index: usize,
    camera: &Camera,
    world: &dyn Shape,
    seed: u64,
    range: Range<usize>,
    pixels: &mut [[u8; 3]],
) {
    log::debug!("Chunk {} started: pixels {:?}", index, range);
    let width = camera.image_width() as usize;

    for (pixel_index, out) in range.clone().zip(pixels.iter_mut()) {
        let x = (pixel_index % width) as u32;
        let y = (pixel_index / width) as u32;

        let mut rng = StdRng::seed_from_u64(pixel_seed(seed, pixel_index));
        *out = color_to_rgb(render_pixel(camera, world, x, y, &mut rng));
    }

    log::debug!("Chunk {} finished", index);
}

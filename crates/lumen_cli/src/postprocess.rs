//! Filters applied to a finished image before it is saved.

use lumen_renderer::PixelBuffer;

/// 3x3 box blur. Border pixels are left as they are.
pub fn blur(buffer: &mut PixelBuffer) {
    let (width, height) = (buffer.width(), buffer.height());
    if width < 3 || height < 3 {
        return;
    }

    let source = buffer.clone();
    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let mut sum = [0u32; 3];
            for ny in y - 1..=y + 1 {
                for nx in x - 1..=x + 1 {
                    let pixel = source.get(nx, ny);
                    for (acc, channel) in sum.iter_mut().zip(pixel) {
                        *acc += channel as u32;
                    }
                }
            }
            buffer.set(x, y, sum.map(|c| (c / 9) as u8));
        }
    }
}

/// Quantize every channel down to `levels` values.
///
/// Each channel is rounded down to a multiple of `256 / levels`. `levels`
/// outside `1..=256` leaves the image unchanged.
pub fn cartoonize(buffer: &mut PixelBuffer, levels: u32) {
    if !(1..=256).contains(&levels) {
        return;
    }
    let step = 256 / levels;

    for pixel in buffer.pixels_mut() {
        for channel in pixel.iter_mut() {
            let v = *channel as u32;
            *channel = (v - v % step) as u8;
        }
    }
}

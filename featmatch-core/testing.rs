//! Synthetic scenes for detector and matcher tests

use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut};
use imageproc::rect::Rect;

/// Gradient background with coloured rectangles and white discs
///
/// The same `seed` always draws the same scene. Sides must be larger than 30 pixels.
pub fn textured_image(width: u32, height: u32, seed: u32) -> RgbImage {
    let mut img = RgbImage::from_fn(width, height, |x, y| {
        let v = ((x * 3 + y * 5) % 64) as u8 + 40;
        Rgb([v, v, v])
    });
    let mut state = seed;
    let mut next = || {
        state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        (state >> 16) & 0x7fff
    };
    for _ in 0..40 {
        let x = (next() % (width - 30)) as i32;
        let y = (next() % (height - 30)) as i32;
        let w = 8 + next() % 20;
        let h = 8 + next() % 20;
        let v = (next() % 256) as u8;
        draw_filled_rect_mut(&mut img, Rect::at(x, y).of_size(w, h), Rgb([v, 255 - v, v / 2]));
    }
    for _ in 0..15 {
        let cx = (next() % width) as i32;
        let cy = (next() % height) as i32;
        let r = 4 + (next() % 10) as i32;
        draw_filled_circle_mut(&mut img, (cx, cy), r, Rgb([255, 255, 255]));
    }
    img
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_draws_same_scene() {
        let a = textured_image(120, 90, 4);
        assert_eq!(a, textured_image(120, 90, 4));
        assert_ne!(a, textured_image(120, 90, 5));
        assert_eq!(a.dimensions(), (120, 90));
    }
}

use featmatch_core::{FeatureSet, Image, Match, RenderConfig};
use image::{imageops, Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_circle_mut, draw_line_segment_mut};
use log::warn;

const PALETTE: [Rgb<u8>; 8] = [
    Rgb([255, 64, 64]),
    Rgb([64, 255, 64]),
    Rgb([64, 128, 255]),
    Rgb([255, 255, 0]),
    Rgb([255, 0, 255]),
    Rgb([0, 255, 255]),
    Rgb([255, 160, 0]),
    Rgb([160, 96, 255]),
];

pub fn match_color(index: usize) -> Rgb<u8> {
    PALETTE[index % PALETTE.len()]
}

/// Place both images side by side: `a` at the origin, `b` right of it
pub fn compose(a: &Image, b: &Image) -> RgbImage {
    let width = a.width() + b.width();
    let height = a.height().max(b.height());
    let mut canvas = RgbImage::new(width, height);
    imageops::replace(&mut canvas, a.pixels(), 0, 0);
    imageops::replace(&mut canvas, b.pixels(), a.width() as i64, 0);
    canvas
}

/// Draw the correspondences on a side-by-side composite
///
/// Only keypoints taking part in a match are drawn.
pub fn render_matches(
    a: &Image,
    features_a: &FeatureSet,
    b: &Image,
    features_b: &FeatureSet,
    matches: &[Match],
    cfg: &RenderConfig,
) -> RgbImage {
    let mut canvas = compose(a, b);
    let offset = a.width() as f32;

    for (i, m) in matches.iter().enumerate() {
        let (Some(kp_a), Some(kp_b)) = (
            features_a.keypoints().get(m.query_idx),
            features_b.keypoints().get(m.train_idx),
        ) else {
            warn!("Skipping match {} -> {}: index out of range", m.query_idx, m.train_idx);
            continue;
        };

        let color = match_color(i);
        let start = (kp_a.x, kp_a.y);
        let end = (kp_b.x + offset, kp_b.y);
        draw_line_segment_mut(&mut canvas, start, end, color);
        if cfg.keypoint_radius > 0 {
            draw_hollow_circle_mut(&mut canvas, (start.0.round() as i32, start.1.round() as i32), cfg.keypoint_radius, color);
            draw_hollow_circle_mut(&mut canvas, (end.0.round() as i32, end.1.round() as i32), cfg.keypoint_radius, color);
        }
    }
    canvas
}

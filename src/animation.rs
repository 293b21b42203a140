//! Easing curves for expando animations
//!
//! The fade (collapse/expand) animation follows a fixed cubic bezier that
//! mimics the classic explorer bar, precomputed into a per-frame table of
//! content heights. The slide (show/hide items) animation uses a cosine
//! ease-in-out relative to the expando's nominal expanded height.

use std::f64::consts::PI;

use image::{GrayImage, Luma};
use serde::{Deserialize, Serialize};

/// Number of frames in a fade animation
pub const FADE_FRAMES: u32 = 23;

/// Number of frames in a slide animation
pub const SLIDE_FRAMES: u32 = 20;

/// Default interval between animation frames in milliseconds
pub const FRAME_INTERVAL_MS: u32 = 10;

const CURVE_INK: Luma<u8> = Luma([255]);

/// Animation policy and timing shared by every expando in a pane
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationSettings {
    /// Animate collapse/expand and item show/hide
    pub enabled: bool,
    /// Interval between frames in milliseconds
    pub interval_ms: u32,
    pub fade_frames: u32,
    pub slide_frames: u32,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_ms: FRAME_INTERVAL_MS,
            fade_frames: FADE_FRAMES,
            slide_frames: SLIDE_FRAMES,
        }
    }
}

/// Per-frame content heights for the fade animation.
///
/// `heights[i]` is the height of the animated content region at frame `i`
/// (zero based), running from (almost) the full content height down to 0.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EasingTable {
    heights: Vec<i32>,
}

impl EasingTable {
    /// Compute the table for an expando with the given heights.
    ///
    /// The curve runs from (0, content) through control points at 3/4 and
    /// 1/4 of the frame count and content height to (frames - 1, 0). It is
    /// drawn into an offscreen bitmap and each column is scanned from the
    /// bottom up for the first curve pixel.
    pub fn compute(expanded_height: i32, header_height: i32, frames: u32) -> Self {
        let frames = frames.max(1);
        // A zero-sized bitmap is not allowed
        let content = (expanded_height - header_height).max(1);

        let n = frames as f64;
        let c = content as f64;
        let p0 = (0.0, c);
        let p1 = (0.75 * n, 0.75 * c);
        let p2 = (0.25 * n, 0.25 * c);
        let p3 = (n - 1.0, 0.0);

        let mut canvas = GrayImage::new(frames, content as u32);
        draw_bezier(&mut canvas, p0, p1, p2, p3);

        let heights = (0..frames)
            .map(|column| {
                (0..content as u32)
                    .rev()
                    .find(|&row| *canvas.get_pixel(column, row) == CURVE_INK)
                    .map(|row| row as i32)
                    .unwrap_or(0)
            })
            .collect();

        Self { heights }
    }

    /// Number of frames in the table
    pub fn len(&self) -> usize {
        self.heights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    /// Height for a zero-based frame index (clamped to the table)
    pub fn get(&self, index: usize) -> i32 {
        match self.heights.len() {
            0 => 0,
            len => self.heights[index.min(len - 1)],
        }
    }

    pub fn heights(&self) -> &[i32] {
        &self.heights
    }
}

/// Rasterize a cubic bezier by dense sampling, one pixel per covered cell
fn draw_bezier(
    canvas: &mut GrayImage,
    p0: (f64, f64),
    p1: (f64, f64),
    p2: (f64, f64),
    p3: (f64, f64),
) {
    let (width, height) = canvas.dimensions();
    let steps = 8 * (width + height).max(1);

    for i in 0..=steps {
        let s = i as f64 / steps as f64;
        let x = bezier_sample(s, p0.0, p1.0, p2.0, p3.0);
        let y = bezier_sample(s, p0.1, p1.1, p2.1, p3.1);

        let column = (x.floor().max(0.0) as u32).min(width - 1);
        let row = (y.floor().max(0.0) as u32).min(height - 1);
        canvas.put_pixel(column, row, CURVE_INK);
    }
}

/// Sample a 1D cubic bezier at parameter s
#[inline]
fn bezier_sample(s: f64, p0: f64, p1: f64, p2: f64, p3: f64) -> f64 {
    // B(s) = (1-s)³·p0 + 3(1-s)²s·p1 + 3(1-s)s²·p2 + s³·p3
    let s2 = s * s;
    let s3 = s2 * s;
    let one_minus_s = 1.0 - s;
    let one_minus_s2 = one_minus_s * one_minus_s;

    one_minus_s2 * one_minus_s * p0
        + 3.0 * one_minus_s2 * s * p1
        + 3.0 * one_minus_s * s2 * p2
        + s3 * p3
}

/// Height of an expando at one step of a slide animation.
///
/// Eases from `expanded_height` towards `target` with a cosine ease-in-out;
/// the last step lands exactly on `target`.
pub fn slide_height(expanded_height: i32, target: i32, step: u32, total: u32) -> i32 {
    let total = total.max(1);
    let progress = (1.0 - (PI * step as f64 / total as f64).cos()) / 2.0;
    (expanded_height as f64 + (target - expanded_height) as f64 * progress) as i32
}

/// Direction of a fade animation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FadeDirection {
    Collapsing,
    Expanding,
}

impl FadeDirection {
    /// Height of the expando at a one-based fade step
    pub fn height_at(
        &self,
        table: &EasingTable,
        step: u32,
        expanded_height: i32,
        header_height: i32,
    ) -> i32 {
        let eased = table.get(step.saturating_sub(1) as usize);
        match self {
            FadeDirection::Collapsing => eased + header_height,
            FadeDirection::Expanding => {
                (expanded_height - header_height) - eased + header_height - 1
            }
        }
    }

    /// Opacity of the snapshot at a one-based fade step
    pub fn opacity_at(&self, step: u32, total: u32) -> f32 {
        let progress = (step as f32 / total.max(1) as f32).clamp(0.0, 1.0);
        match self {
            FadeDirection::Collapsing => 1.0 - progress,
            FadeDirection::Expanding => progress,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_has_one_entry_per_frame() {
        let table = EasingTable::compute(100, 25, FADE_FRAMES);
        assert_eq!(table.len(), FADE_FRAMES as usize);
    }

    #[test]
    fn test_table_is_monotonically_non_increasing() {
        for (expanded, header) in [(100, 25), (300, 25), (26, 25), (25, 25), (640, 40)] {
            let table = EasingTable::compute(expanded, header, FADE_FRAMES);
            for pair in table.heights().windows(2) {
                assert!(
                    pair[0] >= pair[1],
                    "table for ({}, {}) not monotonic: {:?}",
                    expanded,
                    header,
                    table.heights()
                );
            }
        }
    }

    #[test]
    fn test_table_spans_content_height() {
        let table = EasingTable::compute(100, 25, FADE_FRAMES);
        assert_eq!(table.get(0), 74);
        assert_eq!(table.get(FADE_FRAMES as usize - 1), 0);
    }

    #[test]
    fn test_table_matches_closed_form_within_a_pixel() {
        // Evaluate the curve's height where it crosses each column center
        let (expanded, header) = (200, 25);
        let table = EasingTable::compute(expanded, header, FADE_FRAMES);
        let c = (expanded - header) as f64;
        let n = FADE_FRAMES as f64;

        for column in 0..FADE_FRAMES {
            // Bisection on the monotonic x(s)
            let (mut lo, mut hi) = (0.0f64, 1.0f64);
            for _ in 0..60 {
                let mid = (lo + hi) / 2.0;
                if bezier_sample(mid, 0.0, 0.75 * n, 0.25 * n, n - 1.0) < column as f64 {
                    lo = mid;
                } else {
                    hi = mid;
                }
            }
            let y = bezier_sample(hi, c, 0.75 * c, 0.25 * c, 0.0).min(c - 1.0);
            let expected = y.floor() as i32;
            let actual = table.get(column as usize);
            assert!(
                (actual - expected).abs() <= 1,
                "column {}: expected ~{}, got {}",
                column,
                expected,
                actual
            );
        }
    }

    #[test]
    fn test_degenerate_content_height_is_clamped() {
        let table = EasingTable::compute(25, 25, FADE_FRAMES);
        assert_eq!(table.len(), FADE_FRAMES as usize);
        assert!(table.heights().iter().all(|&h| h == 0));

        // Expanded smaller than header must not panic either
        let table = EasingTable::compute(10, 25, FADE_FRAMES);
        assert!(table.heights().iter().all(|&h| h == 0));
    }

    #[test]
    fn test_collapse_heights_stay_between_header_and_expanded() {
        let table = EasingTable::compute(100, 25, FADE_FRAMES);
        let first = FadeDirection::Collapsing.height_at(&table, 1, 100, 25);
        assert!(first > 25 && first < 100, "first frame height {}", first);

        let last = FadeDirection::Collapsing.height_at(&table, FADE_FRAMES, 100, 25);
        assert_eq!(last, 25);
    }

    #[test]
    fn test_expand_heights_grow() {
        let table = EasingTable::compute(100, 25, FADE_FRAMES);
        let heights: Vec<i32> = (1..=FADE_FRAMES)
            .map(|step| FadeDirection::Expanding.height_at(&table, step, 100, 25))
            .collect();

        assert_eq!(heights[0], 25);
        assert_eq!(*heights.last().unwrap(), 99);
        for pair in heights.windows(2) {
            assert!(pair[0] <= pair[1]);
        }
    }

    #[test]
    fn test_slide_height_uses_cosine_ease() {
        // Halfway through, the cosine ease is exactly at the midpoint
        assert_eq!(slide_height(100, 60, 10, 20), 80);
        // A quarter of the way it has covered less than a linear ease would
        let quarter = slide_height(100, 60, 5, 20);
        assert_eq!(quarter, 94);
        assert!(quarter > 90);
        // Ends exactly on target
        assert_eq!(slide_height(100, 60, 20, 20), 60);
        assert_eq!(slide_height(60, 100, 20, 20), 100);
    }

    #[test]
    fn test_settings_default_from_partial_toml() {
        let settings: AnimationSettings = toml::from_str("interval_ms = 15").unwrap();
        assert_eq!(
            settings,
            AnimationSettings {
                interval_ms: 15,
                ..AnimationSettings::default()
            }
        );
        assert!(settings.enabled);
    }

    #[test]
    fn test_fade_opacity() {
        assert_eq!(FadeDirection::Collapsing.opacity_at(0, 23), 1.0);
        assert_eq!(FadeDirection::Collapsing.opacity_at(23, 23), 0.0);
        assert_eq!(FadeDirection::Expanding.opacity_at(23, 23), 1.0);
    }
}

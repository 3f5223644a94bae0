//! Slide geometry: where each image goes and how large it is drawn.
//!
//! Every image is scaled uniformly to fit half the slide width and the full
//! slide height, whether one or two images share a slide. With one image per
//! slide it is then centered across the full width. Sizes are rounded to
//! whole EMU first and positions derived from the rounded sizes, so a pair
//! of images meets exactly on the center line.

use crate::config::{ImagesPerSlide, RaggedLastSlide, SLIDE_HEIGHT_EMU, SLIDE_WIDTH_EMU};

/// Position and size of one picture, in EMU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub x: i64,
    pub y: i64,
    pub cx: i64,
    pub cy: i64,
}

impl Placement {
    pub fn right(&self) -> i64 {
        self.x + self.cx
    }

    pub fn bottom(&self) -> i64 {
        self.y + self.cy
    }
}

/// Fixed slide dimensions plus the per-image placement rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlideGeometry {
    pub width: i64,
    pub height: i64,
    pub images_per_slide: ImagesPerSlide,
    pub ragged: RaggedLastSlide,
}

impl SlideGeometry {
    /// Geometry of the 10 × 4.41 in deck.
    pub fn new(images_per_slide: ImagesPerSlide, ragged: RaggedLastSlide) -> Self {
        Self {
            width: SLIDE_WIDTH_EMU,
            height: SLIDE_HEIGHT_EMU,
            images_per_slide,
            ragged,
        }
    }

    /// Width bound for one image: half the slide in either mode.
    pub fn region_width(&self) -> i64 {
        self.width / 2
    }

    /// Horizontal center line of the slide.
    pub fn center_x(&self) -> i64 {
        self.width / 2
    }

    /// Place an image of `pixel_width`×`pixel_height`.
    ///
    /// # Arguments
    /// * `slot`       — 0-based position of the image within its slide
    /// * `group_len`  — number of images on this slide (the last slide may be short)
    pub fn place(&self, pixel_width: u32, pixel_height: u32, slot: usize, group_len: usize) -> Placement {
        let (cx, cy) = self.scaled_size(pixel_width, pixel_height);
        let y = (self.height - cy) / 2;

        let x = match self.images_per_slide {
            ImagesPerSlide::One => (self.width - cx) / 2,
            ImagesPerSlide::Two if group_len < 2 => match self.ragged {
                RaggedLastSlide::Centered => (self.width - cx) / 2,
                RaggedLastSlide::Leading => self.center_x() - cx,
            },
            ImagesPerSlide::Two if slot == 0 => self.center_x() - cx,
            ImagesPerSlide::Two => self.center_x(),
        };

        Placement { x, y, cx, cy }
    }

    /// Uniform scale into the image region, rounded and clamped to it.
    fn scaled_size(&self, pixel_width: u32, pixel_height: u32) -> (i64, i64) {
        let max_w = self.region_width();
        let max_h = self.height;
        let (w, h) = (pixel_width.max(1) as f64, pixel_height.max(1) as f64);

        let scale = f64::min(max_w as f64 / w, max_h as f64 / h);
        let cx = ((w * scale).round() as i64).clamp(1, max_w);
        let cy = ((h * scale).round() as i64).clamp(1, max_h);
        (cx, cy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_up() -> SlideGeometry {
        SlideGeometry::new(ImagesPerSlide::Two, RaggedLastSlide::Centered)
    }

    #[test]
    fn equal_squares_meet_at_center() {
        let g = two_up();
        let left = g.place(1000, 1000, 0, 2);
        let right = g.place(1000, 1000, 1, 2);

        assert_eq!(left.right(), g.center_x());
        assert_eq!(right.x, g.center_x());
        assert_eq!(left.cx, right.cx);
        assert_eq!(left.y, right.y);
    }

    #[test]
    fn square_is_height_bound_in_half_slide() {
        // Half slide is 4 572 000 wide but only 4 032 504 tall.
        let p = two_up().place(500, 500, 0, 2);
        assert_eq!(p.cy, SLIDE_HEIGHT_EMU);
        assert_eq!(p.cx, SLIDE_HEIGHT_EMU);
        assert_eq!(p.y, 0);
    }

    #[test]
    fn wide_image_is_width_bound_and_vertically_centered() {
        let g = two_up();
        let p = g.place(1600, 400, 1, 2);
        assert_eq!(p.cx, g.region_width());
        assert_eq!(p.cy, g.region_width() / 4);
        assert_eq!(p.y, (SLIDE_HEIGHT_EMU - p.cy) / 2);
        assert_eq!(p.right(), SLIDE_WIDTH_EMU);
    }

    #[test]
    fn placement_never_exceeds_region() {
        let g = two_up();
        for (w, h) in [(1, 1), (1600, 900), (900, 1600), (7, 3000), (3000, 7), (1234, 567)] {
            for slot in 0..2 {
                let p = g.place(w, h, slot, 2);
                assert!(p.cx <= g.region_width(), "{w}x{h}: {p:?}");
                assert!(p.cy <= SLIDE_HEIGHT_EMU, "{w}x{h}: {p:?}");
                assert!(p.x >= 0 && p.right() <= SLIDE_WIDTH_EMU, "{w}x{h}: {p:?}");
                assert!(p.y >= 0 && p.bottom() <= SLIDE_HEIGHT_EMU, "{w}x{h}: {p:?}");
            }
        }
    }

    #[test]
    fn pair_never_overlaps() {
        let g = two_up();
        let left = g.place(900, 1600, 0, 2);
        let right = g.place(1600, 900, 1, 2);
        assert!(left.right() <= right.x);
    }

    #[test]
    fn single_per_slide_keeps_half_width_bound_and_centers() {
        let g = SlideGeometry::new(ImagesPerSlide::One, RaggedLastSlide::Centered);
        assert_eq!(g.region_width(), SLIDE_WIDTH_EMU / 2);

        let p = g.place(1600, 400, 0, 1);
        assert_eq!(p.cx, SLIDE_WIDTH_EMU / 2);
        assert_eq!(p.x, SLIDE_WIDTH_EMU / 4);

        // 4:3 is width-bound at half the slide: 4 572 000 × 3 429 000.
        let p = g.place(800, 600, 0, 1);
        assert_eq!((p.cx, p.cy), (4_572_000, 3_429_000));
        assert_eq!(p.x, (SLIDE_WIDTH_EMU - p.cx) / 2);
        assert_eq!(p.y, (SLIDE_HEIGHT_EMU - p.cy) / 2);
    }

    #[test]
    fn ragged_centered_keeps_half_width_scale() {
        let g = two_up();
        let paired = g.place(800, 600, 0, 2);
        let alone = g.place(800, 600, 0, 1);

        assert_eq!((alone.cx, alone.cy), (paired.cx, paired.cy));
        assert_eq!(alone.x, (SLIDE_WIDTH_EMU - alone.cx) / 2);
    }

    #[test]
    fn ragged_leading_uses_first_position() {
        let g = SlideGeometry::new(ImagesPerSlide::Two, RaggedLastSlide::Leading);
        let alone = g.place(800, 600, 0, 1);
        assert_eq!(alone.right(), g.center_x());
    }
}

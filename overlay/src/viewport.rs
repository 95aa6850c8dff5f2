#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use crate::geom::{self, Point};

/// The rendered page surface: its client-space origin and pixel size.
///
/// `left` / `top` are the surface's offset in client (CSS) pixels, as the host
/// reads them from `getBoundingClientRect`. `width` / `height` are the size of
/// the rasterized page the polygons are normalized against.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Viewport {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { left: 0.0, top: 0.0, width, height }
    }

    /// Whether the page has been rasterized yet.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    /// Convert a client-space pointer position to a normalized page point,
    /// clamped to `[0, 1]`.
    #[must_use]
    pub fn client_to_normalized(&self, client: Point) -> Point {
        if !self.is_ready() {
            return Point::new(0.0, 0.0);
        }
        Point::new((client.x - self.left) / self.width, (client.y - self.top) / self.height).clamp_unit()
    }

    /// Whether a client-space position lies on the surface.
    #[must_use]
    pub fn contains_client(&self, client: Point) -> bool {
        let (x, y) = (client.x - self.left, client.y - self.top);
        self.is_ready() && (0.0..=self.width).contains(&x) && (0.0..=self.height).contains(&y)
    }

    /// Convert a normalized point to surface pixels.
    #[must_use]
    pub fn to_px(&self, p: Point) -> Point {
        geom::to_px(p, self.width, self.height)
    }

    /// Convert a surface-pixel point to normalized coordinates.
    #[must_use]
    pub fn to_normalized(&self, px: Point) -> Point {
        geom::to_normalized(px, self.width, self.height)
    }

    /// Pixel distance between two normalized points.
    #[must_use]
    pub fn distance_px(&self, a: Point, b: Point) -> f64 {
        geom::distance_px(a, b, self.width, self.height)
    }
}

//! CPU implementation of [`Surface`] over an RGBA buffer.
//!
//! Pixels are stored premultiplied in `f32` and composited source-over.
//! Edges get one pixel of linear coverage falloff, which is enough to keep
//! half-pixel-wide links visible without a real scanline rasterizer.

use backdrop_core::color::Rgba;
use backdrop_core::error::BackdropError;
use backdrop_core::surface::{Size, Surface};
use glam::DVec2;

/// A premultiplied RGBA pixel.
type Pixel = [f32; 4];

/// An owned pixel buffer implementing the backdrop's drawing calls.
#[derive(Debug, Clone)]
pub struct PixelSurface {
    width: usize,
    height: usize,
    data: Vec<Pixel>,
}

impl PixelSurface {
    /// Creates a transparent surface of `width` × `height` pixels.
    ///
    /// Returns `BackdropError::InvalidDimensions` if either side is zero or
    /// the pixel count overflows `usize`.
    pub fn new(width: usize, height: usize) -> Result<Self, BackdropError> {
        if width == 0 || height == 0 {
            return Err(BackdropError::InvalidDimensions);
        }
        let len = width
            .checked_mul(height)
            .ok_or(BackdropError::InvalidDimensions)?;
        Ok(Self {
            width,
            height,
            data: vec![[0.0; 4]; len],
        })
    }

    /// Creates a surface covering `size`, rounding fractional sides up.
    pub fn from_size(size: Size) -> Result<Self, BackdropError> {
        if size.is_empty() {
            return Err(BackdropError::InvalidDimensions);
        }
        Self::new(size.width.ceil() as usize, size.height.ceil() as usize)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Straight-alpha color of the pixel at `(x, y)`, or `None` out of bounds.
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let [r, g, b, a] = self.data[y * self.width + x];
        if a <= 0.0 {
            return Some(Rgba::TRANSPARENT);
        }
        Some(Rgba::new(
            (r / a) as f64,
            (g / a) as f64,
            (b / a) as f64,
            a as f64,
        ))
    }

    /// Row-major RGBA8 bytes, straight alpha, `width * height * 4` long.
    pub fn to_rgba8(&self) -> Vec<u8> {
        (0..self.height)
            .flat_map(|y| (0..self.width).map(move |x| (x, y)))
            .flat_map(|(x, y)| {
                self.pixel(x, y)
                    .unwrap_or(Rgba::TRANSPARENT)
                    .to_rgba8()
            })
            .collect()
    }

    /// Composites `color` over the pixel at `(x, y)` with `coverage` in [0, 1].
    fn blend(&mut self, x: usize, y: usize, color: Rgba, coverage: f64) {
        let alpha = (color.a * coverage).clamp(0.0, 1.0) as f32;
        if alpha <= 0.0 {
            return;
        }
        let dst = &mut self.data[y * self.width + x];
        let keep = 1.0 - alpha;
        dst[0] = color.r as f32 * alpha + dst[0] * keep;
        dst[1] = color.g as f32 * alpha + dst[1] * keep;
        dst[2] = color.b as f32 * alpha + dst[2] * keep;
        dst[3] = alpha + dst[3] * keep;
    }

    /// Pixel index range covering `[lo, hi]` in one axis, clipped to `limit`.
    fn span(lo: f64, hi: f64, limit: usize) -> std::ops::Range<usize> {
        let start = lo.floor().max(0.0) as usize;
        let end = (hi.ceil().max(0.0) as usize).min(limit);
        start.min(end)..end
    }

    /// Visits every pixel whose center lies within `pad` of the box spanned by
    /// `a` and `b`, passing the pixel center.
    fn for_each_near(&mut self, a: DVec2, b: DVec2, pad: f64, mut f: impl FnMut(&mut Self, usize, usize, DVec2)) {
        let min = a.min(b) - DVec2::splat(pad);
        let max = a.max(b) + DVec2::splat(pad);
        for y in Self::span(min.y, max.y, self.height) {
            for x in Self::span(min.x, max.x, self.width) {
                let center = DVec2::new(x as f64 + 0.5, y as f64 + 0.5);
                f(self, x, y, center);
            }
        }
    }
}

/// Distance from `p` to the segment `a`–`b`.
fn distance_to_segment(p: DVec2, a: DVec2, b: DVec2) -> f64 {
    let ab = b - a;
    let len2 = ab.length_squared();
    if len2 == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len2).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

impl Surface for PixelSurface {
    fn size(&self) -> Size {
        Size::new(self.width as f64, self.height as f64)
    }

    fn resize(&mut self, size: Size) {
        let (width, height) = if size.is_empty() {
            (0, 0)
        } else {
            (size.width.ceil() as usize, size.height.ceil() as usize)
        };
        self.width = width;
        self.height = height;
        self.data = vec![[0.0; 4]; width.saturating_mul(height)];
    }

    fn clear(&mut self) {
        self.data.fill([0.0; 4]);
    }

    fn fill_radial_gradient(&mut self, center: DVec2, radius: f64, inner: Rgba, outer: Rgba) {
        for y in 0..self.height {
            for x in 0..self.width {
                let p = DVec2::new(x as f64 + 0.5, y as f64 + 0.5);
                let t = if radius > 0.0 {
                    p.distance(center) / radius
                } else {
                    1.0
                };
                self.blend(x, y, inner.lerp(outer, t), 1.0);
            }
        }
    }

    fn stroke_line(&mut self, from: DVec2, to: DVec2, width: f64, color: Rgba) {
        let half = width.max(0.0) / 2.0;
        self.for_each_near(from, to, half + 1.0, |s, x, y, p| {
            let d = distance_to_segment(p, from, to);
            let coverage = (half + 0.5 - d).clamp(0.0, 1.0);
            s.blend(x, y, color, coverage);
        });
    }

    fn fill_disc(&mut self, center: DVec2, radius: f64, color: Rgba) {
        let radius = radius.max(0.0);
        self.for_each_near(center, center, radius + 1.0, |s, x, y, p| {
            let coverage = (radius + 0.5 - p.distance(center)).clamp(0.0, 1.0);
            s.blend(x, y, color, coverage);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backdrop_core::palette::Theme;
    use backdrop_core::particle::{Particle, ParticleField};
    use backdrop_core::renderer::Renderer;

    const RED: Rgba = Rgba::new(1.0, 0.0, 0.0, 1.0);

    fn approx(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    #[test]
    fn new_rejects_zero_dimensions() {
        assert!(matches!(
            PixelSurface::new(0, 10),
            Err(BackdropError::InvalidDimensions)
        ));
        assert!(PixelSurface::from_size(Size::new(10.0, 0.0)).is_err());
    }

    #[test]
    fn new_rejects_overflowing_dimensions() {
        assert!(PixelSurface::new(usize::MAX, 2).is_err());
    }

    #[test]
    fn from_size_rounds_up() {
        let s = PixelSurface::from_size(Size::new(10.2, 4.0)).unwrap();
        assert_eq!((s.width(), s.height()), (11, 4));
    }

    #[test]
    fn starts_transparent() {
        let s = PixelSurface::new(3, 3).unwrap();
        assert_eq!(s.pixel(1, 1), Some(Rgba::TRANSPARENT));
        assert_eq!(s.pixel(3, 0), None);
    }

    #[test]
    fn to_rgba8_has_four_bytes_per_pixel() {
        let s = PixelSurface::new(8, 4).unwrap();
        assert_eq!(s.to_rgba8().len(), 8 * 4 * 4);
    }

    #[test]
    fn disc_covers_center_not_far_corner() {
        let mut s = PixelSurface::new(20, 20).unwrap();
        s.fill_disc(DVec2::new(10.0, 10.0), 3.0, RED);
        let center = s.pixel(10, 10).unwrap();
        assert!(approx(center.r, 1.0, 1e-6) && approx(center.a, 1.0, 1e-6));
        assert_eq!(s.pixel(0, 0), Some(Rgba::TRANSPARENT));
    }

    #[test]
    fn disc_near_edge_is_clipped_without_panicking() {
        let mut s = PixelSurface::new(10, 10).unwrap();
        s.fill_disc(DVec2::new(-1.0, 11.0), 4.0, RED);
        s.fill_disc(DVec2::new(500.0, -500.0), 4.0, RED);
        assert!(s.pixel(0, 9).unwrap().a > 0.0);
    }

    #[test]
    fn line_covers_its_midpoint() {
        let mut s = PixelSurface::new(50, 10).unwrap();
        s.stroke_line(DVec2::new(5.0, 5.5), DVec2::new(45.0, 5.5), 0.5, RED);
        assert!(s.pixel(25, 5).unwrap().a > 0.5);
        assert_eq!(s.pixel(25, 0), Some(Rgba::TRANSPARENT));
    }

    #[test]
    fn translucent_paint_composites_over() {
        let mut s = PixelSurface::new(1, 1).unwrap();
        s.fill_disc(DVec2::new(0.5, 0.5), 2.0, Rgba::new(0.0, 0.0, 1.0, 1.0));
        s.fill_disc(DVec2::new(0.5, 0.5), 2.0, Rgba::new(1.0, 0.0, 0.0, 0.5));
        let p = s.pixel(0, 0).unwrap();
        assert!(approx(p.r, 0.5, 1e-6), "r = {}", p.r);
        assert!(approx(p.b, 0.5, 1e-6), "b = {}", p.b);
        assert!(approx(p.a, 1.0, 1e-6));
    }

    #[test]
    fn gradient_center_and_edge_match_stops() {
        let mut s = PixelSurface::new(101, 101).unwrap();
        let inner = Rgba::new(1.0, 1.0, 1.0, 1.0);
        let outer = Rgba::new(0.0, 0.0, 0.0, 1.0);
        s.fill_radial_gradient(DVec2::new(50.5, 50.5), 50.0, inner, outer);
        assert!(approx(s.pixel(50, 50).unwrap().r, 1.0, 1e-6));
        assert!(approx(s.pixel(0, 0).unwrap().r, 0.0, 1e-6));
        let mid = s.pixel(75, 50).unwrap().r;
        assert!(approx(mid, 0.5, 0.01), "mid = {mid}");
    }

    #[test]
    fn clear_resets_to_transparent() {
        let mut s = PixelSurface::new(4, 4).unwrap();
        s.fill_disc(DVec2::new(2.0, 2.0), 3.0, RED);
        s.clear();
        assert!(s.to_rgba8().iter().all(|&b| b == 0));
    }

    #[test]
    fn resize_reallocates_buffer() {
        let mut s = PixelSurface::new(4, 4).unwrap();
        s.resize(Size::new(7.0, 3.0));
        assert_eq!(s.size(), Size::new(7.0, 3.0));
        assert_eq!(s.to_rgba8().len(), 7 * 3 * 4);
        s.resize(Size::default());
        assert!(s.to_rgba8().is_empty());
    }

    #[test]
    fn rendered_frame_is_opaque_enough_everywhere() {
        let size = Size::new(64.0, 48.0);
        let field = ParticleField::from_particles(
            vec![Particle {
                position: DVec2::new(32.0, 24.0),
                velocity: DVec2::ZERO,
                radius: 4.0,
                color: RED,
            }],
            size,
        );
        let mut s = PixelSurface::from_size(size).unwrap();
        Renderer::new(Theme::Dark).render(&field, size, &mut s);
        let corner = s.pixel(0, 0).unwrap();
        assert!(corner.a > 0.6, "backdrop should cover the corner, a = {}", corner.a);
        let center = s.pixel(32, 24).unwrap();
        assert!(approx(center.r, 1.0, 1e-6), "particle painted on top");
    }

    proptest::proptest! {
        #[test]
        fn compositing_stays_in_unit_range(
            shapes in proptest::collection::vec(
                (-20.0f64..60.0, -20.0f64..60.0, 0.0f64..12.0, 0.0f64..=1.0),
                1..20,
            ),
        ) {
            let mut s = PixelSurface::new(40, 40).unwrap();
            for (i, &(x, y, r, a)) in shapes.iter().enumerate() {
                let color = Rgba::new(1.0, 0.5, 0.25, a);
                if i % 2 == 0 {
                    s.fill_disc(DVec2::new(x, y), r, color);
                } else {
                    s.stroke_line(DVec2::new(x, y), DVec2::new(y, x), r * 0.1, color);
                }
            }
            for y in 0..40 {
                for x in 0..40 {
                    let p = s.pixel(x, y).unwrap();
                    for c in [p.r, p.g, p.b, p.a] {
                        proptest::prop_assert!((0.0..=1.0 + 1e-6).contains(&c), "{c} at ({x}, {y})");
                    }
                }
            }
        }
    }
}

//! The 2D drawing surface the renderer paints onto.
//!
//! [`Surface`] is the only seam between the backdrop and a concrete pixel
//! target: the CPU rasterizer, a browser canvas, or the [`RecordingSurface`]
//! used to assert on draw calls.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::color::Rgba;

/// Width and height of a drawing surface in surface units (CSS pixels).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True when either side is zero, negative, or not finite. Nothing is
    /// drawn onto an empty surface.
    pub fn is_empty(self) -> bool {
        !(self.width.is_finite() && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
    }

    /// Midpoint of the surface.
    pub fn center(self) -> DVec2 {
        DVec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Half the larger side, the backdrop gradient's radius.
    pub fn half_extent(self) -> f64 {
        self.width.max(self.height) / 2.0
    }

    /// True if `p` lies in [0, width] × [0, height].
    pub fn contains(self, p: DVec2) -> bool {
        (0.0..=self.width).contains(&p.x) && (0.0..=self.height).contains(&p.y)
    }
}

/// A 2D drawing target.
///
/// Calls arrive in painter's order; later calls composite over earlier ones.
pub trait Surface {
    /// Current size of the drawable area.
    fn size(&self) -> Size;

    /// Resizes the drawable area. Contents after a resize are unspecified
    /// until the next [`Surface::clear`].
    fn resize(&mut self, size: Size);

    /// Clears the whole surface to transparent.
    fn clear(&mut self);

    /// Fills the whole surface with a radial gradient from `inner` at `center`
    /// to `outer` at `radius` (and beyond).
    fn fill_radial_gradient(&mut self, center: DVec2, radius: f64, inner: Rgba, outer: Rgba);

    /// Strokes a straight line segment.
    fn stroke_line(&mut self, from: DVec2, to: DVec2, width: f64, color: Rgba);

    /// Fills a disc.
    fn fill_disc(&mut self, center: DVec2, radius: f64, color: Rgba);
}

/// A single recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    RadialGradient {
        center: DVec2,
        radius: f64,
        inner: Rgba,
        outer: Rgba,
    },
    Line {
        from: DVec2,
        to: DVec2,
        width: f64,
        color: Rgba,
    },
    Disc {
        center: DVec2,
        radius: f64,
        color: Rgba,
    },
}

/// A surface that paints nothing and logs every call.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    size: Size,
    commands: Vec<DrawCommand>,
    clears: usize,
}

impl RecordingSurface {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            commands: Vec::new(),
            clears: 0,
        }
    }

    /// Every command since construction or the last [`Self::take_commands`].
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Drains the command log.
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Number of `clear` calls ever made; each frame starts with exactly one.
    pub fn frames_started(&self) -> usize {
        self.clears
    }

    /// Recorded line segments.
    pub fn lines(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
    }

    /// Recorded discs.
    pub fn discs(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Disc { .. }))
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> Size {
        self.size
    }

    fn resize(&mut self, size: Size) {
        self.size = size;
    }

    fn clear(&mut self) {
        self.clears += 1;
        self.commands.push(DrawCommand::Clear);
    }

    fn fill_radial_gradient(&mut self, center: DVec2, radius: f64, inner: Rgba, outer: Rgba) {
        self.commands.push(DrawCommand::RadialGradient {
            center,
            radius,
            inner,
            outer,
        });
    }

    fn stroke_line(&mut self, from: DVec2, to: DVec2, width: f64, color: Rgba) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            width,
            color,
        });
    }

    fn fill_disc(&mut self, center: DVec2, radius: f64, color: Rgba) {
        self.commands.push(DrawCommand::Disc {
            center,
            radius,
            color,
        });
    }
}

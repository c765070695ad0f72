//! Paints one frame of the backdrop onto a [`Surface`].
//!
//! Frame order: clear, radial gradient backdrop, links between nearby
//! particles, then the particle discs on top. Link detection compares every
//! unordered pair, so cost grows with the square of the particle count.

use serde::Serialize;

use crate::config::{BackdropConfig, DEFAULT_LINK_DISTANCE, DEFAULT_LINK_WIDTH};
use crate::palette::{Backdrop, Theme};
use crate::particle::ParticleField;
use crate::surface::{Size, Surface};

/// Counts of what a single frame drew.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FrameStats {
    pub links: usize,
    pub discs: usize,
}

/// Stateless frame painter: everything it draws comes from its arguments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Renderer {
    backdrop: Backdrop,
    link_distance: f64,
    link_width: f64,
}

impl Renderer {
    /// A renderer with the default link distance (150) and width (0.5).
    pub fn new(theme: Theme) -> Self {
        Self {
            backdrop: theme.backdrop(),
            link_distance: DEFAULT_LINK_DISTANCE,
            link_width: DEFAULT_LINK_WIDTH,
        }
    }

    pub fn from_config(config: &BackdropConfig, theme: Theme) -> Self {
        Self {
            backdrop: theme.backdrop(),
            link_distance: config.link_distance,
            link_width: config.link_width,
        }
    }

    /// Switches the backdrop gradient to `theme`'s stops.
    pub fn set_theme(&mut self, theme: Theme) {
        self.backdrop = theme.backdrop();
    }

    pub fn backdrop(&self) -> Backdrop {
        self.backdrop
    }

    pub fn link_distance(&self) -> f64 {
        self.link_distance
    }

    /// Link opacity factor for two particles `distance` apart: 1 when they
    /// touch, falling linearly to 0 at the link distance. `None` means no link.
    pub fn link_strength(&self, distance: f64) -> Option<f64> {
        (distance < self.link_distance).then(|| 1.0 - distance / self.link_distance)
    }

    /// Paints `field` onto `surface` at `size`. Draws nothing on an empty size.
    pub fn render<S: Surface + ?Sized>(
        &self,
        field: &ParticleField,
        size: Size,
        surface: &mut S,
    ) -> FrameStats {
        if size.is_empty() {
            return FrameStats::default();
        }

        surface.clear();
        surface.fill_radial_gradient(
            size.center(),
            size.half_extent(),
            self.backdrop.inner,
            self.backdrop.outer,
        );

        let particles = field.particles();
        let mut links = 0;
        for (i, a) in particles.iter().enumerate() {
            for b in &particles[i + 1..] {
                let distance = a.position.distance(b.position);
                if let Some(strength) = self.link_strength(distance) {
                    surface.stroke_line(
                        a.position,
                        b.position,
                        self.link_width,
                        a.color.fade(strength),
                    );
                    links += 1;
                }
            }
        }

        for p in particles {
            surface.fill_disc(p.position, p.radius, p.color);
        }

        FrameStats {
            links,
            discs: particles.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;
    use crate::palette::Palette;
    use crate::particle::Particle;
    use crate::prng::Xorshift64;
    use crate::surface::{DrawCommand, RecordingSurface};
    use glam::DVec2;

    fn still(x: f64, y: f64, color: Rgba) -> Particle {
        Particle {
            position: DVec2::new(x, y),
            velocity: DVec2::ZERO,
            radius: 3.0,
            color,
        }
    }

    fn pair_at_distance(d: f64) -> ParticleField {
        ParticleField::from_particles(
            vec![still(100.0, 100.0, Rgba::BLACK), still(100.0 + d, 100.0, Rgba::BLACK)],
            Size::new(800.0, 600.0),
        )
    }

    #[test]
    fn frame_starts_with_clear_then_gradient() {
        let size = Size::new(800.0, 600.0);
        let mut surface = RecordingSurface::new(size);
        Renderer::new(Theme::Dark).render(&pair_at_distance(10.0), size, &mut surface);
        let cmds = surface.commands();
        assert!(matches!(cmds[0], DrawCommand::Clear));
        match cmds[1] {
            DrawCommand::RadialGradient {
                center,
                radius,
                inner,
                outer,
            } => {
                assert_eq!(center, DVec2::new(400.0, 300.0));
                assert_eq!(radius, 400.0);
                assert_eq!(inner, Theme::Dark.backdrop().inner);
                assert_eq!(outer, Theme::Dark.backdrop().outer);
            }
            ref other => panic!("expected gradient, got {other:?}"),
        }
    }

    #[test]
    fn links_are_drawn_before_discs() {
        let size = Size::new(800.0, 600.0);
        let mut surface = RecordingSurface::new(size);
        Renderer::new(Theme::Light).render(&pair_at_distance(10.0), size, &mut surface);
        let first_disc = surface
            .commands()
            .iter()
            .position(|c| matches!(c, DrawCommand::Disc { .. }))
            .unwrap();
        let last_line = surface
            .commands()
            .iter()
            .rposition(|c| matches!(c, DrawCommand::Line { .. }))
            .unwrap();
        assert!(last_line < first_disc);
    }

    #[test]
    fn pair_just_below_threshold_is_linked() {
        let size = Size::new(800.0, 600.0);
        let mut surface = RecordingSurface::new(size);
        let stats = Renderer::new(Theme::Dark).render(&pair_at_distance(149.9), size, &mut surface);
        assert_eq!(stats.links, 1);
        assert_eq!(surface.lines().count(), 1);
    }

    #[test]
    fn pair_at_threshold_is_not_linked() {
        let size = Size::new(800.0, 600.0);
        let mut surface = RecordingSurface::new(size);
        let stats = Renderer::new(Theme::Dark).render(&pair_at_distance(150.0), size, &mut surface);
        assert_eq!(stats.links, 0);
        assert_eq!(surface.lines().count(), 0);
    }

    #[test]
    fn closer_pairs_draw_more_opaque_links() {
        let renderer = Renderer::new(Theme::Dark);
        let near = renderer.link_strength(10.0).unwrap();
        let far = renderer.link_strength(140.0).unwrap();
        assert!(near > far);
        assert_eq!(renderer.link_strength(0.0), Some(1.0));
    }

    #[test]
    fn link_color_derives_from_first_particle() {
        let red = Rgba::new(1.0, 0.0, 0.0, 1.0);
        let blue = Rgba::new(0.0, 0.0, 1.0, 1.0);
        let field = ParticleField::from_particles(
            vec![still(0.0, 0.0, red), still(75.0, 0.0, blue)],
            Size::new(200.0, 200.0),
        );
        let mut surface = RecordingSurface::new(field.bounds());
        Renderer::new(Theme::Dark).render(&field, field.bounds(), &mut surface);
        match surface.lines().next() {
            Some(DrawCommand::Line { color, width, .. }) => {
                assert_eq!((color.r, color.g, color.b), (1.0, 0.0, 0.0));
                assert!((color.a - 0.5).abs() < 1e-12);
                assert_eq!(*width, 0.5);
            }
            other => panic!("expected a line, got {other:?}"),
        };
    }

    #[test]
    fn every_particle_gets_one_disc() {
        let size = Size::new(640.0, 480.0);
        let field = ParticleField::initialize(40, size, &Palette::dark(), &mut Xorshift64::new(3));
        let mut surface = RecordingSurface::new(size);
        let stats = Renderer::new(Theme::Dark).render(&field, size, &mut surface);
        assert_eq!(stats.discs, 40);
        let discs: Vec<_> = surface.discs().collect();
        assert_eq!(discs.len(), 40);
        for (cmd, p) in discs.iter().zip(field.particles()) {
            assert_eq!(
                **cmd,
                DrawCommand::Disc {
                    center: p.position,
                    radius: p.radius,
                    color: p.color
                }
            );
        }
    }

    #[test]
    fn render_does_not_mutate_field() {
        let size = Size::new(300.0, 300.0);
        let field = ParticleField::initialize(10, size, &Palette::light(), &mut Xorshift64::new(8));
        let before = field.clone();
        Renderer::new(Theme::Light).render(&field, size, &mut RecordingSurface::new(size));
        assert_eq!(field, before);
    }

    #[test]
    fn empty_size_draws_nothing() {
        let mut surface = RecordingSurface::new(Size::default());
        let stats = Renderer::new(Theme::Dark).render(&pair_at_distance(1.0), Size::default(), &mut surface);
        assert_eq!(stats, FrameStats::default());
        assert!(surface.commands().is_empty());
    }

    #[test]
    fn custom_link_distance_from_config() {
        let config = BackdropConfig {
            link_distance: 20.0,
            ..BackdropConfig::default()
        };
        let renderer = Renderer::from_config(&config, Theme::Dark);
        assert!(renderer.link_strength(25.0).is_none());
        assert!(renderer.link_strength(15.0).is_some());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn link_drawn_iff_distance_below_threshold(
                x0 in 0.0_f64..800.0, y0 in 0.0_f64..600.0,
                x1 in 0.0_f64..800.0, y1 in 0.0_f64..600.0,
            ) {
                let size = Size::new(800.0, 600.0);
                let field = ParticleField::from_particles(
                    vec![still(x0, y0, Rgba::BLACK), still(x1, y1, Rgba::BLACK)],
                    size,
                );
                let mut surface = RecordingSurface::new(size);
                Renderer::new(Theme::Dark).render(&field, size, &mut surface);
                let distance = DVec2::new(x0, y0).distance(DVec2::new(x1, y1));
                prop_assert_eq!(surface.lines().count() == 1, distance < 150.0);
            }
        }
    }
}

//! The animation loop: owns a field, a renderer and a surface, and ties them
//! to a [`FrameScheduler`], a [`Viewport`] and the current [`Theme`].
//!
//! Each frame renders the field as it stands, then advances it, so every
//! frame shows particles at the positions they had when it began.
//!
//! Resize notifications are queued by the viewport listener and applied at
//! the start of the next frame. A theme change rebuilds the field at once.

use std::cell::Cell;
use std::ops::ControlFlow;
use std::rc::Rc;

use tracing::{debug, info};

use crate::config::BackdropConfig;
use crate::palette::Theme;
use crate::particle::ParticleField;
use crate::prng::Xorshift64;
use crate::renderer::{FrameStats, Renderer};
use crate::scheduler::{CancelToken, FrameScheduler};
use crate::surface::{Size, Surface};
use crate::viewport::{ListenerId, Viewport};

/// Lifecycle state of an [`AnimationLoop`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Running,
}

/// Drives the particle backdrop on surface `S`.
pub struct AnimationLoop<S: Surface> {
    surface: S,
    config: BackdropConfig,
    theme: Theme,
    renderer: Renderer,
    rng: Xorshift64,
    field: ParticleField,
    size: Size,
    state: LoopState,
    pending_resize: Rc<Cell<Option<Size>>>,
    listener: Option<ListenerId>,
    token: CancelToken,
    frames: u64,
}

impl<S: Surface> AnimationLoop<S> {
    /// Creates an idle loop. Nothing is drawn until [`Self::activate`].
    pub fn new(surface: S, config: BackdropConfig, theme: Theme) -> Self {
        let rng = config
            .seed
            .map(Xorshift64::new)
            .unwrap_or_else(Xorshift64::from_clock);
        let renderer = Renderer::from_config(&config, theme);
        Self {
            surface,
            config,
            theme,
            renderer,
            rng,
            field: ParticleField::default(),
            size: Size::default(),
            state: LoopState::Idle,
            pending_resize: Rc::new(Cell::new(None)),
            listener: None,
            token: CancelToken::new(),
            frames: 0,
        }
    }

    /// Reads the viewport size, builds a field and starts listening for
    /// resizes. A zero-sized viewport leaves the loop idle.
    pub fn activate(&mut self, viewport: &mut Viewport) -> LoopState {
        if self.state == LoopState::Running {
            return self.state;
        }
        let size = viewport.size();
        if size.is_empty() {
            debug!(?size, "viewport is empty, staying idle");
            return self.state;
        }

        self.size = size;
        self.surface.resize(size);
        self.pending_resize.set(None);
        self.token = CancelToken::new();
        self.reinitialize();

        let pending = Rc::clone(&self.pending_resize);
        self.listener = Some(viewport.subscribe(move |size| pending.set(Some(size))));
        self.state = LoopState::Running;
        info!(
            width = size.width,
            height = size.height,
            theme = %self.theme,
            particles = self.field.len(),
            "backdrop activated"
        );
        self.state
    }

    /// Stops the schedule and removes the resize listener. Idempotent.
    pub fn deactivate(&mut self, viewport: &mut Viewport) {
        self.token.cancel();
        if let Some(id) = self.listener.take() {
            viewport.unsubscribe(id);
        }
        if self.state == LoopState::Running {
            info!(frames = self.frames, "backdrop deactivated");
        }
        self.state = LoopState::Idle;
    }

    /// Applies a new surface size. Particles keep their positions.
    pub fn on_resize(&mut self, size: Size) {
        if size == self.size {
            return;
        }
        debug!(width = size.width, height = size.height, "backdrop resized");
        self.size = size;
        self.surface.resize(size);
        self.field.resize(size);
    }

    /// Switches theme. While running, the field is rebuilt with the new palette.
    pub fn set_theme(&mut self, theme: Theme) {
        if theme == self.theme {
            return;
        }
        self.theme = theme;
        self.renderer.set_theme(theme);
        if self.state == LoopState::Running {
            self.reinitialize();
            info!(%theme, particles = self.field.len(), "field reinitialized for theme");
        }
    }

    fn reinitialize(&mut self) {
        self.field = ParticleField::from_config(
            &self.config,
            self.size,
            &self.theme.palette(),
            &mut self.rng,
        );
    }

    /// Runs one frame: apply any queued resize, render, advance.
    /// Returns `None` without drawing when idle.
    pub fn tick(&mut self) -> Option<FrameStats> {
        if self.state != LoopState::Running {
            return None;
        }
        if let Some(size) = self.pending_resize.take() {
            self.on_resize(size);
        }
        let stats = self.renderer.render(&self.field, self.size, &mut self.surface);
        self.field.advance();
        self.frames += 1;
        Some(stats)
    }

    /// Ticks on `scheduler` until it stops, the loop's token is cancelled,
    /// or the loop goes idle. Returns the number of frames drawn.
    pub fn run(&mut self, scheduler: &mut dyn FrameScheduler) -> u64 {
        self.run_with(scheduler, |_, _| ControlFlow::Continue(()))
    }

    /// Like [`Self::run`], but calls `hook` after every frame with mutable
    /// access to the loop so hosts can inject resize and theme events.
    pub fn run_with(
        &mut self,
        scheduler: &mut dyn FrameScheduler,
        mut hook: impl FnMut(&mut Self, FrameStats) -> ControlFlow<()>,
    ) -> u64 {
        let token = self.token.clone();
        let mut drawn = 0;
        scheduler.run(&token, &mut |_tick| match self.tick() {
            Some(stats) => {
                drawn += 1;
                hook(self, stats)
            }
            None => ControlFlow::Break(()),
        });
        drawn
    }

    /// A handle that stops [`Self::run`] before its next frame.
    pub fn cancel_token(&self) -> CancelToken {
        self.token.clone()
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    /// Frames drawn since construction.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }
}

#![deny(unsafe_code)]
//! Core types for the particle backdrop behind the portfolio hero section.
//!
//! Provides the `ParticleField` integrator, the `Surface` drawing trait with a
//! recording implementation, the `Renderer`, the `AnimationLoop` state machine
//! with its `FrameScheduler`/`CancelToken`/`Viewport` plumbing, theme
//! palettes, the `Xorshift64` PRNG, `BackdropConfig`, and the hero subtitle
//! `Typewriter`.

pub mod animation;
pub mod color;
pub mod config;
pub mod error;
pub mod palette;
pub mod particle;
pub mod prng;
pub mod renderer;
pub mod scheduler;
pub mod surface;
pub mod typewriter;
pub mod viewport;

pub use animation::{AnimationLoop, LoopState};
pub use color::Rgba;
pub use config::BackdropConfig;
pub use error::BackdropError;
pub use palette::{Backdrop, Palette, Theme};
pub use particle::{Particle, ParticleField};
pub use prng::Xorshift64;
pub use renderer::{FrameStats, Renderer};
pub use scheduler::{CancelToken, FrameScheduler, FrameTick, IntervalScheduler, ManualScheduler};
pub use surface::{DrawCommand, RecordingSurface, Size, Surface};
pub use typewriter::{TypePhase, Typewriter, TypewriterConfig};
pub use viewport::{ListenerId, Viewport};

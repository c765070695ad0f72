#![deny(unsafe_code)]
//! CPU-side rendering for the particle backdrop.
//!
//! [`pixel::PixelSurface`] implements the core `Surface` trait over an RGBA
//! buffer so frames can be produced headless. The `png` feature (default on)
//! adds [`snapshot::write_png`]; the WASM build turns it off to avoid the
//! `image` dependency.

pub mod pixel;

#[cfg(feature = "png")]
pub mod snapshot;

pub use pixel::PixelSurface;

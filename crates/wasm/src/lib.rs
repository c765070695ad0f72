#![deny(unsafe_code)]
//! WASM bindings for the particle backdrop.
//!
//! `Backdrop` wraps an [`AnimationLoop`] over a [`CanvasSurface`]. `start`
//! schedules frames with `requestAnimationFrame` and subscribes to the
//! window's `resize` event; `stop` cancels the pending frame and removes the
//! listener. The page's theme toggle calls `set_dark_mode`.

mod surface;

use std::cell::RefCell;
use std::rc::Rc;

use backdrop_core::config::DEFAULT_PARTICLE_COUNT;
use backdrop_core::particle::clamp_count;
use backdrop_core::{AnimationLoop, BackdropConfig, CancelToken, LoopState, Size, Theme, Viewport};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlCanvasElement, Window};

pub use surface::CanvasSurface;

type FrameCallback = Closure<dyn FnMut()>;

/// Holds the animation-frame closure so it can re-request itself.
type FrameSlot = Rc<RefCell<Option<FrameCallback>>>;

struct Inner {
    lp: AnimationLoop<CanvasSurface>,
    viewport: Viewport,
    token: CancelToken,
    frame_id: Option<i32>,
    on_resize: Option<FrameCallback>,
}

fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))
}

fn window_size(window: &Window) -> Size {
    let read = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    Size::new(read(window.inner_width()), read(window.inner_height()))
}

/// Settles teardown steps that have all already run, keeping the first error.
fn first_error<E>(steps: impl IntoIterator<Item = Result<(), E>>) -> Result<(), E> {
    steps.into_iter().collect()
}

/// Particle backdrop bound to one canvas element.
#[wasm_bindgen]
pub struct Backdrop {
    inner: Rc<RefCell<Inner>>,
    frame: FrameSlot,
}

#[wasm_bindgen]
impl Backdrop {
    /// Binds to `canvas`. Fails if the canvas has no 2D context.
    #[wasm_bindgen(constructor)]
    pub fn new(
        canvas: HtmlCanvasElement,
        dark_mode: bool,
        particle_count: Option<i32>,
        seed: Option<u32>,
    ) -> Result<Backdrop, JsValue> {
        let surface = CanvasSurface::new(canvas).map_err(|e| JsValue::from_str(&e.to_string()))?;
        // SystemTime is unavailable on wasm32, so the seed always comes from JS.
        let seed = seed
            .map(u64::from)
            .unwrap_or_else(|| (js_sys::Math::random() * u32::MAX as f64) as u64);
        let config = BackdropConfig {
            particle_count: particle_count
                .map(|n| clamp_count(n.into()))
                .unwrap_or(DEFAULT_PARTICLE_COUNT),
            seed: Some(seed),
            ..BackdropConfig::default()
        };
        let theme = if dark_mode { Theme::Dark } else { Theme::Light };
        let viewport = Viewport::new(window_size(&window()?));
        Ok(Backdrop {
            inner: Rc::new(RefCell::new(Inner {
                lp: AnimationLoop::new(surface, config, theme),
                viewport,
                token: CancelToken::new(),
                frame_id: None,
                on_resize: None,
            })),
            frame: Rc::new(RefCell::new(None)),
        })
    }

    /// Activates the loop and starts requesting animation frames.
    pub fn start(&self) -> Result<(), JsValue> {
        let window = window()?;
        let mut guard = self.inner.borrow_mut();
        let inner = &mut *guard;
        if inner.lp.state() == LoopState::Running {
            return Ok(());
        }
        let size = window_size(&window);
        inner.viewport.resize(size);
        if inner.lp.activate(&mut inner.viewport) == LoopState::Idle {
            return Ok(());
        }
        inner.token = CancelToken::new();

        let weak = Rc::downgrade(&self.inner);
        let on_resize = Closure::<dyn FnMut()>::new(move || {
            let (Some(inner), Some(window)) = (weak.upgrade(), web_sys::window()) else {
                return;
            };
            inner.borrow_mut().viewport.resize(window_size(&window));
        });
        window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())?;
        inner.on_resize = Some(on_resize);

        let weak = Rc::downgrade(&self.inner);
        let slot = Rc::downgrade(&self.frame);
        let token = inner.token.clone();
        let on_frame = Closure::<dyn FnMut()>::new(move || {
            if token.is_cancelled() {
                return;
            }
            let (Some(inner), Some(slot)) = (weak.upgrade(), slot.upgrade()) else {
                return;
            };
            let mut inner = inner.borrow_mut();
            if inner.lp.tick().is_none() {
                return;
            }
            inner.frame_id = slot.borrow().as_ref().and_then(|cb| request_frame(cb).ok());
        });
        inner.frame_id = Some(request_frame(&on_frame)?);
        *self.frame.borrow_mut() = Some(on_frame);
        Ok(())
    }

    /// Cancels the pending frame, removes the resize listener and idles the
    /// loop. Every step runs even if an earlier one fails; the first failure
    /// is returned.
    pub fn stop(&self) -> Result<(), JsValue> {
        let window = window();
        let mut guard = self.inner.borrow_mut();
        let inner = &mut *guard;
        inner.token.cancel();
        let cancelled = match (inner.frame_id.take(), &window) {
            (Some(id), Ok(w)) => w.cancel_animation_frame(id),
            _ => Ok(()),
        };
        let removed = match (inner.on_resize.take(), &window) {
            (Some(cb), Ok(w)) => {
                w.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref())
            }
            _ => Ok(()),
        };
        self.frame.borrow_mut().take();
        inner.lp.deactivate(&mut inner.viewport);
        first_error([window.map(drop), cancelled, removed])
    }

    /// Switches palette; a running field is rebuilt immediately.
    #[wasm_bindgen(js_name = setDarkMode)]
    pub fn set_dark_mode(&self, dark_mode: bool) {
        let theme = if dark_mode { Theme::Dark } else { Theme::Light };
        self.inner.borrow_mut().lp.set_theme(theme);
    }

    /// Current theme, as the page's toggle last set it.
    #[wasm_bindgen(getter, js_name = darkMode)]
    pub fn dark_mode(&self) -> bool {
        self.inner.borrow().lp.theme().is_dark()
    }

    /// True while frames are being scheduled.
    #[wasm_bindgen(getter)]
    pub fn running(&self) -> bool {
        self.inner.borrow().lp.state() == LoopState::Running
    }

    /// Frames drawn so far.
    #[wasm_bindgen(getter)]
    pub fn frames(&self) -> f64 {
        self.inner.borrow().lp.frames() as f64
    }
}

fn request_frame(cb: &FrameCallback) -> Result<i32, JsValue> {
    window()?.request_animation_frame(cb.as_ref().unchecked_ref())
}

/// Browser host for the weather effects
///
/// Draws onto a `<canvas>` through its 2D context and schedules frames with
/// `requestAnimationFrame`. The canvas follows the window size and device
/// pixel ratio.
pub mod canvas_surface;

pub use canvas_surface::CanvasSurface;

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, Window};

use crate::engine::FxEngine;
use crate::error::{FxError, FxResult};
use crate::frame_loop::PendingFrame;
use crate::renderer::Viewport;
use crate::weather::Condition;

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

struct HostState {
    engine: FxEngine,
    surface: CanvasSurface,
    pending: PendingFrame,
}

/// Weather effects bound to one canvas element.
///
/// Dropping it (`free()` from JS) stops the loop, cancels the outstanding
/// frame and detaches the resize listener.
#[wasm_bindgen]
pub struct WeatherFx {
    state: Rc<RefCell<HostState>>,
    frame_callback: FrameCallback,
    resize_listener: Closure<dyn FnMut()>,
}

#[wasm_bindgen]
impl WeatherFx {
    /// Attach to the canvas with id `canvas_id`. Nothing is drawn until a
    /// condition is set.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str) -> Result<WeatherFx, JsValue> {
        console_error_panic_hook::set_once();
        // A second instance finds the logger already installed
        let _ = console_log::init_with_level(log::Level::Info);

        let window = browser_window()?;
        let canvas = find_canvas(&window, canvas_id)?;
        let ctx = canvas
            .get_context("2d")
            .map_err(js_error)?
            .ok_or_else(|| FxError::Js("2d context unavailable".into()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| FxError::Js("Not a 2d context".into()))?;

        let viewport = window_viewport(&window);
        let mut engine = FxEngine::new(viewport);
        let mut surface = CanvasSurface::new(canvas, ctx);
        engine.resize(viewport, &mut surface);

        let state = Rc::new(RefCell::new(HostState {
            engine,
            surface,
            pending: PendingFrame::default(),
        }));

        let resize_state = state.clone();
        let resize_listener = Closure::wrap(Box::new(move || {
            let Ok(window) = browser_window() else { return };
            let viewport = window_viewport(&window);
            let mut state = resize_state.borrow_mut();
            let HostState { engine, surface, .. } = &mut *state;
            engine.resize(viewport, surface);
        }) as Box<dyn FnMut()>);
        window
            .add_event_listener_with_callback("resize", resize_listener.as_ref().unchecked_ref())
            .map_err(js_error)?;

        log::info!("Weather effects attached to #{}", canvas_id);

        Ok(WeatherFx {
            state,
            frame_callback: Rc::new(RefCell::new(None)),
            resize_listener,
        })
    }

    /// Switch to a condition by name; unknown names render nothing
    #[wasm_bindgen(js_name = setCondition)]
    pub fn set_condition(&mut self, name: &str) -> Result<(), JsValue> {
        self.apply(Condition::parse_lenient(name))
    }

    /// Switch to the condition for a numeric weather code
    #[wasm_bindgen(js_name = setConditionCode)]
    pub fn set_condition_code(&mut self, code: u32) -> Result<(), JsValue> {
        self.apply(Condition::from_weather_code(code))
    }

    /// Stop scheduling frames. The last drawn frame stays on the canvas.
    pub fn stop(&mut self) {
        self.state.borrow_mut().engine.stop();
    }

    #[wasm_bindgen(getter)]
    pub fn condition(&self) -> String {
        self.state.borrow().engine.condition().as_str().to_string()
    }
}

impl WeatherFx {
    fn apply(&mut self, condition: Condition) -> Result<(), JsValue> {
        self.state.borrow_mut().engine.set_condition(condition);
        self.ensure_scheduled()?;
        Ok(())
    }

    fn ensure_scheduled(&self) -> FxResult<()> {
        if self.state.borrow().pending.is_pending() {
            return Ok(());
        }

        if self.frame_callback.borrow().is_none() {
            let state = self.state.clone();
            let callback = self.frame_callback.clone();
            *self.frame_callback.borrow_mut() = Some(Closure::wrap(Box::new(move |timestamp: f64| {
                let mut guard = state.borrow_mut();
                let HostState { engine, surface, pending } = &mut *guard;
                pending.fired();
                if !engine.frame(timestamp, surface) {
                    return;
                }
                match request_frame(&callback) {
                    Ok(id) => pending.requested(id),
                    Err(err) => log::error!("Failed to schedule frame: {}", err),
                }
            }) as Box<dyn FnMut(f64)>));
        }

        let id = request_frame(&self.frame_callback)?;
        self.state.borrow_mut().pending.requested(id);
        Ok(())
    }
}

impl Drop for WeatherFx {
    fn drop(&mut self) {
        let pending = {
            let mut state = self.state.borrow_mut();
            state.engine.stop();
            state.pending.take()
        };

        match browser_window() {
            Ok(window) => {
                if let Some(id) = pending {
                    if let Err(err) = window.cancel_animation_frame(id) {
                        log::warn!("Failed to cancel frame: {:?}", err);
                    }
                }
                if let Err(err) = window.remove_event_listener_with_callback(
                    "resize",
                    self.resize_listener.as_ref().unchecked_ref(),
                ) {
                    log::warn!("Failed to remove resize listener: {:?}", err);
                }
            }
            Err(err) => log::warn!("Teardown without a window: {}", err),
        }

        // The frame closure holds the state and itself; dropping it ends the cycle
        let callback = self.frame_callback.borrow_mut().take();
        drop(callback);
        log::debug!("Weather effects detached");
    }
}

/// Ask for the next animation frame, returning the request id
fn request_frame(callback: &FrameCallback) -> FxResult<i32> {
    let callback = callback.borrow();
    let Some(closure) = callback.as_ref() else {
        return Err(FxError::Js("Frame callback not installed".into()));
    };
    browser_window()?
        .request_animation_frame(closure.as_ref().unchecked_ref())
        .map_err(js_error)
}

fn browser_window() -> FxResult<Window> {
    web_sys::window().ok_or_else(|| FxError::Js("No window".into()))
}

fn find_canvas(window: &Window, canvas_id: &str) -> FxResult<HtmlCanvasElement> {
    window
        .document()
        .ok_or_else(|| FxError::Js("No document".into()))?
        .get_element_by_id(canvas_id)
        .ok_or_else(|| FxError::Js(format!("Canvas #{} not found", canvas_id)))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| FxError::Js(format!("#{} is not a canvas element", canvas_id)))
}

fn window_viewport(window: &Window) -> Viewport {
    let size = |value: Result<JsValue, JsValue>| {
        value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as f32
    };
    Viewport::new(
        size(window.inner_width()),
        size(window.inner_height()),
        window.device_pixel_ratio() as f32,
    )
}

fn js_error(err: JsValue) -> FxError {
    FxError::Js(format!("{:?}", err))
}

impl From<FxError> for JsValue {
    fn from(err: FxError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

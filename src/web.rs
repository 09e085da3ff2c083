//! Browser binding: mounts a [`SurfaceCore`] on an `HtmlCanvasElement`.
//!
//! The binding wires pointer and touch listeners to the core, presents the
//! backing buffer with `putImageData`, runs initial-snapshot decodes in a
//! `spawn_local` future, and reports snapshots to a JavaScript callback.
//! The JS callback is always invoked after the core borrow is released so it
//! may call back into the pad.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::warn;
use wasm_bindgen::prelude::*;
use wasm_bindgen::{Clamped, JsCast};
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::{CanvasRenderingContext2d, Event, HtmlCanvasElement, ImageData, MouseEvent, PointerEvent, TouchEvent};

use crate::config::SurfaceConfig;
use crate::engine::{Action, SurfaceCore};
use crate::input::PointerSource;
use crate::snapshot::straight_rgba;
use crate::viewport::{DisplayRect, Point};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}

#[derive(Debug, Clone, Copy)]
enum DomEvent {
    Down,
    Move,
    Up,
    Leave,
}

// Mouse and pen arrive as pointer events; fingers as touch events.
const LISTENERS: [(&str, DomEvent); 9] = [
    ("pointerdown", DomEvent::Down),
    ("pointermove", DomEvent::Move),
    ("pointerup", DomEvent::Up),
    ("pointerleave", DomEvent::Leave),
    ("pointercancel", DomEvent::Leave),
    ("touchstart", DomEvent::Down),
    ("touchmove", DomEvent::Move),
    ("touchend", DomEvent::Up),
    ("touchcancel", DomEvent::Leave),
];

struct Mounted {
    canvas: HtmlCanvasElement,
    ctx: Option<CanvasRenderingContext2d>,
    core: SurfaceCore,
}

impl Mounted {
    fn display(&self) -> DisplayRect {
        let rect = self.canvas.get_bounding_client_rect();
        DisplayRect::new(rect.left(), rect.top(), rect.width(), rect.height())
    }

    fn handle(&mut self, kind: DomEvent, ev: &Event) -> Vec<Action> {
        if is_touch_pointer(ev) {
            return Vec::new();
        }
        match kind {
            DomEvent::Down | DomEvent::Move => {
                let Some((client, source)) = client_point(ev) else {
                    return Vec::new();
                };
                let display = self.display();
                if matches!(kind, DomEvent::Down) {
                    self.core.on_pointer_down(client, display, source)
                } else {
                    self.core.on_pointer_move(client, display, source)
                }
            }
            DomEvent::Up => self.core.on_pointer_up(),
            DomEvent::Leave => self.core.on_pointer_leave(),
        }
    }

    /// Copy the backing buffer to the canvas. No-op without a 2D context.
    fn present(&self) {
        let (Some(ctx), Some(raster)) = (self.ctx.as_ref(), self.core.raster()) else {
            return;
        };
        let rgba = straight_rgba(raster.pixmap());
        match ImageData::new_with_u8_clamped_array_and_sh(Clamped(rgba.as_slice()), raster.width(), raster.height()) {
            Ok(image) => {
                if let Err(e) = ctx.put_image_data(&image, 0.0, 0.0) {
                    warn!(error = ?e, "putImageData failed");
                }
            }
            Err(e) => warn!(error = ?e, "ImageData construction failed"),
        }
    }
}

/// Signature pad bound to a canvas element.
#[wasm_bindgen]
pub struct SignaturePad {
    inner: Rc<RefCell<Mounted>>,
    on_save: js_sys::Function,
    listeners: Vec<(&'static str, Closure<dyn FnMut(Event)>)>,
}

#[wasm_bindgen]
impl SignaturePad {
    /// Mount on `canvas`. `config_json` overrides [`SurfaceConfig`] fields;
    /// `initial_value` is a previously saved snapshot.
    ///
    /// # Errors
    ///
    /// Fails if the configuration is invalid or a listener cannot be attached.
    #[wasm_bindgen(constructor)]
    pub fn new(
        canvas: HtmlCanvasElement,
        on_save: js_sys::Function,
        config_json: Option<String>,
        initial_value: Option<String>,
    ) -> Result<SignaturePad, JsValue> {
        let config = match config_json {
            Some(raw) => SurfaceConfig::from_json(&raw).map_err(|e| JsValue::from_str(&e.to_string()))?,
            None => SurfaceConfig::default(),
        };
        canvas.set_width(config.width);
        canvas.set_height(config.height);
        canvas.style().set_property("touch-action", "none")?;

        let ctx = context_2d(&canvas);
        let inner = Rc::new(RefCell::new(Mounted { canvas: canvas.clone(), ctx, core: SurfaceCore::new(config) }));

        let mut listeners = Vec::with_capacity(LISTENERS.len());
        for (name, kind) in LISTENERS {
            let inner_cb = Rc::clone(&inner);
            let on_save_cb = on_save.clone();
            let cb = Closure::<dyn FnMut(Event)>::new(move |ev: Event| {
                let actions = inner_cb.borrow_mut().handle(kind, &ev);
                apply(&inner_cb, &on_save_cb, Some(&ev), actions);
            });
            canvas.add_event_listener_with_callback(name, cb.as_ref().unchecked_ref())?;
            listeners.push((name, cb));
        }

        let pad = SignaturePad { inner, on_save, listeners };
        pad.set_initial_value(initial_value.unwrap_or_default());
        Ok(pad)
    }

    /// Show a saved snapshot (`""` for none). Decoding finishes asynchronously.
    #[wasm_bindgen(js_name = setInitialValue)]
    pub fn set_initial_value(&self, value: String) {
        let ticket = self.inner.borrow_mut().core.set_initial_value(&value);
        self.inner.borrow().present();
        let Some(ticket) = ticket else {
            return;
        };

        let inner = Rc::clone(&self.inner);
        spawn_local(async move {
            // Wait one macrotask so input events already queued reach the core first.
            if let Err(e) = JsFuture::from(next_macrotask()).await {
                warn!(error = ?e, "decode yield rejected");
            }
            let result = ticket.decode();
            let actions = inner.borrow_mut().core.complete_decode(&ticket, result);
            if actions.contains(&Action::RenderNeeded) {
                inner.borrow().present();
            }
        });
    }

    /// Erase the signature and report `""`.
    pub fn clear(&self) {
        let actions = self.inner.borrow_mut().core.clear();
        apply(&self.inner, &self.on_save, None, actions);
    }

    /// Encode the buffer as it is now.
    pub fn snapshot(&self) -> String {
        self.inner.borrow().core.snapshot()
    }

    #[wasm_bindgen(js_name = isDrawing)]
    pub fn is_drawing(&self) -> bool {
        self.inner.borrow().core.is_drawing()
    }

    #[wasm_bindgen(js_name = strokeCount)]
    pub fn stroke_count(&self) -> usize {
        self.inner.borrow().core.stroke_count()
    }

    /// Styling token from the configuration.
    pub fn accent(&self) -> Option<String> {
        self.inner.borrow().core.accent().map(str::to_owned)
    }
}

impl Drop for SignaturePad {
    fn drop(&mut self) {
        let canvas = self.inner.borrow().canvas.clone();
        for (name, cb) in self.listeners.drain(..) {
            if let Err(e) = canvas.remove_event_listener_with_callback(name, cb.as_ref().unchecked_ref()) {
                warn!(event = name, error = ?e, "failed to detach listener");
            }
        }
    }
}

fn apply(inner: &Rc<RefCell<Mounted>>, on_save: &js_sys::Function, ev: Option<&Event>, actions: Vec<Action>) {
    for action in actions {
        match action {
            Action::RenderNeeded => inner.borrow().present(),
            Action::PreventDefault => {
                if let Some(ev) = ev {
                    ev.prevent_default();
                }
            }
            Action::SnapshotChanged(snapshot) => {
                if let Err(e) = on_save.call1(&JsValue::NULL, &JsValue::from_str(&snapshot)) {
                    warn!(error = ?e, "onSave callback threw");
                }
            }
        }
    }
}

/// Resolves on the next `setTimeout(0)` tick, or at once if timers are unavailable.
fn next_macrotask() -> js_sys::Promise {
    js_sys::Promise::new(&mut |resolve, _reject| {
        let scheduled = web_sys::window()
            .ok_or_else(|| JsValue::from_str("no window"))
            .and_then(|window| window.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, 0));
        if let Err(e) = scheduled {
            warn!(error = ?e, "setTimeout unavailable; decoding without yielding");
            if let Err(e) = resolve.call0(&JsValue::NULL) {
                warn!(error = ?e, "decode yield could not resolve");
            }
        }
    })
}

/// Touch-typed pointer events duplicate the touch listeners.
fn is_touch_pointer(ev: &Event) -> bool {
    ev.dyn_ref::<PointerEvent>()
        .is_some_and(|p| PointerSource::from_pointer_type(&p.pointer_type()) == PointerSource::Touch)
}

fn client_point(ev: &Event) -> Option<(Point, PointerSource)> {
    if let Some(touch_ev) = ev.dyn_ref::<TouchEvent>() {
        let touch = touch_ev.touches().get(0)?;
        let client = Point::new(f64::from(touch.client_x()), f64::from(touch.client_y()));
        return Some((client, PointerSource::Touch));
    }
    let source = ev
        .dyn_ref::<PointerEvent>()
        .map_or(PointerSource::Mouse, |p| PointerSource::from_pointer_type(&p.pointer_type()));
    let mouse = ev.dyn_ref::<MouseEvent>()?;
    Some((Point::new(f64::from(mouse.client_x()), f64::from(mouse.client_y())), source))
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
    match canvas.get_context("2d") {
        Ok(Some(obj)) => match obj.dyn_into::<CanvasRenderingContext2d>() {
            Ok(ctx) => Some(ctx),
            Err(_) => None,
        },
        Ok(None) => None,
        Err(e) => {
            warn!(error = ?e, "2d context unavailable; drawing disabled");
            None
        }
    }
}

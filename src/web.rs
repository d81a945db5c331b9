//! Browser backend.
//!
//! [`CanvasSurface`] draws onto a `<canvas>` through its 2D context and keeps
//! the cached frame on an off-screen shadow canvas of the same size.
//! [`MouseController`] turns clicks on the input canvas into inputs.
//!
//! This is the only module that touches `web_sys`. Canvas calls that can throw
//! surface as [`SurfaceError::Js`].

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent};

use tracing::{trace, warn};

use crate::coordinator::InputSender;
use crate::geom::{Point, Size};
use crate::region::SetupError;
use crate::signal::Schema;
use crate::surface::{Canvas, Surface, SurfaceError};

impl From<JsValue> for SurfaceError {
    fn from(value: JsValue) -> Self {
        Self::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, SurfaceError> {
    canvas
        .get_context("2d")?
        .ok_or(SurfaceError::MissingContext)?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| SurfaceError::MissingContext)
}

fn canvas_size(canvas: &HtmlCanvasElement) -> Size {
    Size::new(f64::from(canvas.width()), f64::from(canvas.height()))
}

// =============================================================
// Surface
// =============================================================

/// A visible `<canvas>` element and its 2D context.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

/// Off-screen canvas holding the last full frame.
pub struct ShadowCanvas {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// # Errors
    ///
    /// Returns `SetupError` if the element has no 2D context.
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, SetupError> {
        let ctx = context_2d(&canvas)?;
        Ok(Self { canvas, ctx })
    }

    #[must_use]
    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    fn check_size(&self, buffer: &ShadowCanvas) -> Result<(), SurfaceError> {
        let (buffer, surface) = (canvas_size(&buffer.canvas), canvas_size(&self.canvas));
        if buffer == surface { Ok(()) } else { Err(SurfaceError::SizeMismatch { buffer, surface }) }
    }
}

impl Canvas for CanvasSurface {
    fn size(&self) -> Size {
        canvas_size(&self.canvas)
    }

    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn translate(&mut self, x: f64, y: f64) -> Result<(), SurfaceError> {
        self.ctx.translate(x, y).map_err(SurfaceError::from)
    }

    fn begin_path(&mut self) {
        self.ctx.begin_path();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.ctx.move_to(x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.ctx.line_to(x, y);
    }

    fn close_path(&mut self) {
        self.ctx.close_path();
    }

    fn stroke(&mut self) {
        self.ctx.stroke();
    }

    fn fill(&mut self) {
        self.ctx.fill();
    }

    fn set_line_width(&mut self, width: f64) {
        self.ctx.set_line_width(width);
    }

    fn set_stroke_style(&mut self, style: &str) {
        self.ctx.set_stroke_style_str(style);
    }

    fn set_fill_style(&mut self, style: &str) {
        self.ctx.set_fill_style_str(style);
    }

    fn set_font(&mut self, font: &str) {
        self.ctx.set_font(font);
    }

    fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ctx.stroke_rect(x, y, width, height);
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ctx.fill_rect(x, y, width, height);
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ctx.clear_rect(x, y, width, height);
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) -> Result<(), SurfaceError> {
        self.ctx.fill_text(text, x, y).map_err(SurfaceError::from)
    }
}

impl Surface for CanvasSurface {
    type Buffer = ShadowCanvas;

    fn create_buffer(&self) -> Result<ShadowCanvas, SurfaceError> {
        let document = web_sys::window().and_then(|w| w.document()).ok_or(SurfaceError::MissingContext)?;
        let canvas = document
            .create_element("canvas")?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| SurfaceError::MissingContext)?;
        canvas.set_width(self.canvas.width());
        canvas.set_height(self.canvas.height());
        let ctx = context_2d(&canvas)?;
        Ok(ShadowCanvas { canvas, ctx })
    }

    fn copy_into(&self, buffer: &mut ShadowCanvas) -> Result<(), SurfaceError> {
        self.check_size(buffer)?;
        let Size { width, height } = self.size();
        buffer.ctx.clear_rect(0.0, 0.0, width, height);
        buffer.ctx.draw_image_with_html_canvas_element(&self.canvas, 0.0, 0.0).map_err(SurfaceError::from)
    }

    fn blit_from(&mut self, buffer: &ShadowCanvas) -> Result<(), SurfaceError> {
        self.check_size(buffer)?;
        let Size { width, height } = self.size();
        self.ctx.clear_rect(0.0, 0.0, width, height);
        self.ctx.draw_image_with_html_canvas_element(&buffer.canvas, 0.0, 0.0).map_err(SurfaceError::from)
    }
}

// =============================================================
// Controller
// =============================================================

/// Click listener on the input canvas. Detaches itself when dropped.
pub struct MouseController {
    target: HtmlCanvasElement,
    on_click: Closure<dyn FnMut(MouseEvent)>,
}

impl MouseController {
    /// Listen for clicks on `target` and send each click position, in the
    /// element's own pixel space, through `sender` as `to_input(point)`.
    ///
    /// # Errors
    ///
    /// Returns `SurfaceError::Js` if the listener cannot be attached.
    pub fn attach<S: Schema>(
        target: &HtmlCanvasElement,
        sender: InputSender<S>,
        to_input: fn(Point) -> S::Input,
    ) -> Result<Self, SurfaceError> {
        let on_click = Closure::wrap(Box::new(move |ev: MouseEvent| {
            let point = Point::new(f64::from(ev.offset_x()), f64::from(ev.offset_y()));
            if !sender.send(to_input(point)) {
                trace!(x = point.x, y = point.y, "click ignored; no listeners");
            }
        }) as Box<dyn FnMut(MouseEvent)>);
        target.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
        Ok(Self { target: target.clone(), on_click })
    }
}

impl Drop for MouseController {
    fn drop(&mut self) {
        let callback: &js_sys::Function = self.on_click.as_ref().unchecked_ref();
        if let Err(e) = self.target.remove_event_listener_with_callback("click", callback) {
            warn!(error = ?e, "failed to detach click listener");
        }
    }
}

//! Drawing-surface contract.
//!
//! Regions draw through [`Canvas`], a thin immediate-mode interface shaped
//! after `CanvasRenderingContext2d`. The root additionally needs to keep a
//! copy of the last full frame, which is what [`Surface`] adds: a secondary
//! buffer of identical dimensions that the primary can be copied into and
//! blitted back from.
//!
//! | Backend | Role |
//! |---------|------|
//! | [`display_list::DisplayList`] | Headless surface that records operations |
//! | [`crate::web::CanvasSurface`] | Browser `<canvas>` with an off-screen shadow canvas |

pub mod display_list;

use crate::geom::{Point, Size};
use crate::hex::hex_corners;

/// Error reported by a drawing backend.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SurfaceError {
    /// The browser rejected a canvas call.
    #[error("canvas call failed: {0}")]
    Js(String),
    /// The backend could not provide a 2D drawing context.
    #[error("2d drawing context unavailable")]
    MissingContext,
    /// A buffer was used with a surface of different dimensions.
    #[error("buffer is {buffer:?} but surface is {surface:?}")]
    SizeMismatch { buffer: Size, surface: Size },
}

/// Immediate-mode 2D drawing operations.
pub trait Canvas {
    fn size(&self) -> Size;

    fn save(&mut self);
    fn restore(&mut self);

    /// # Errors
    ///
    /// Returns `Err` if the backend rejects the transform.
    fn translate(&mut self, x: f64, y: f64) -> Result<(), SurfaceError>;

    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn close_path(&mut self);
    fn stroke(&mut self);
    fn fill(&mut self);

    fn set_line_width(&mut self, width: f64);
    fn set_stroke_style(&mut self, style: &str);
    fn set_fill_style(&mut self, style: &str);
    fn set_font(&mut self, font: &str);

    fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64);
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64);
    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64);

    /// # Errors
    ///
    /// Returns `Err` if the backend fails to lay out or draw the text.
    fn fill_text(&mut self, text: &str, x: f64, y: f64) -> Result<(), SurfaceError>;
}

/// A primary drawing surface with a same-sized secondary buffer.
pub trait Surface: Canvas {
    /// Off-screen copy of a full frame.
    type Buffer;

    /// Allocate a secondary buffer matching this surface's dimensions.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the backend cannot allocate an off-screen buffer.
    fn create_buffer(&self) -> Result<Self::Buffer, SurfaceError>;

    /// Copy the current primary contents into `buffer`.
    ///
    /// # Errors
    ///
    /// Returns `Err` on a size mismatch or backend failure.
    fn copy_into(&self, buffer: &mut Self::Buffer) -> Result<(), SurfaceError>;

    /// Draw `buffer` over the whole primary surface.
    ///
    /// # Errors
    ///
    /// Returns `Err` on a size mismatch or backend failure.
    fn blit_from(&mut self, buffer: &Self::Buffer) -> Result<(), SurfaceError>;
}

/// Start a new path tracing the outline of a pointy-topped hex.
pub fn hex_path(canvas: &mut dyn Canvas, center: Point, size: f64) {
    let [first, rest @ ..] = hex_corners(center, size);
    canvas.begin_path();
    canvas.move_to(first.x, first.y);
    for corner in rest {
        canvas.line_to(corner.x, corner.y);
    }
    canvas.close_path();
}

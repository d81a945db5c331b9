//! Headless surface that records every drawing call.
//!
//! The recorded operation list stands in for pixels: two frames are identical
//! exactly when their operation lists are equal. Used by tests and by hosts
//! that want to inspect or replay a frame without a browser.

#[cfg(test)]
#[path = "display_list_test.rs"]
mod display_list_test;

use crate::geom::{Point, Size};
use crate::surface::{Canvas, Surface, SurfaceError};

/// One recorded drawing call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Save,
    Restore,
    Translate { x: f64, y: f64 },
    BeginPath,
    MoveTo { x: f64, y: f64 },
    LineTo { x: f64, y: f64 },
    ClosePath,
    Stroke,
    Fill,
    LineWidth(f64),
    StrokeStyle(String),
    FillStyle(String),
    Font(String),
    StrokeRect { x: f64, y: f64, width: f64, height: f64 },
    FillRect { x: f64, y: f64, width: f64, height: f64 },
    ClearRect { x: f64, y: f64, width: f64, height: f64 },
    FillText { text: String, x: f64, y: f64 },
}

/// A stored frame: the operations that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedFrame {
    size: Size,
    ops: Vec<DrawOp>,
}

impl RecordedFrame {
    #[must_use]
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }
}

/// Recording surface.
///
/// Tracks the translation in effect (and the one saved by each open `save`)
/// so that clears land where a real canvas would put them.
#[derive(Debug, Clone)]
pub struct DisplayList {
    size: Size,
    ops: Vec<DrawOp>,
    blits: usize,
    origin: Point,
    saved: Vec<Point>,
}

impl DisplayList {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            size: Size::new(width, height),
            ops: Vec::new(),
            blits: 0,
            origin: Point::new(0.0, 0.0),
            saved: Vec::new(),
        }
    }

    /// Operations making up the current frame.
    #[must_use]
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// How many times a stored frame was blitted onto this surface.
    #[must_use]
    pub fn blits(&self) -> usize {
        self.blits
    }

    /// Current translation relative to the surface origin.
    #[must_use]
    pub fn origin(&self) -> Point {
        self.origin
    }

    // Only a clear outside any `save` may drop ops; otherwise the matching
    // `Restore`s would be left unbalanced.
    fn clears_everything(&self, x: f64, y: f64, width: f64, height: f64) -> bool {
        let (x, y) = (x + self.origin.x, y + self.origin.y);
        self.saved.is_empty() && x <= 0.0 && y <= 0.0 && x + width >= self.size.width && y + height >= self.size.height
    }

    fn check_size(&self, buffer: Size) -> Result<(), SurfaceError> {
        if buffer == self.size {
            Ok(())
        } else {
            Err(SurfaceError::SizeMismatch { buffer, surface: self.size })
        }
    }
}

impl Canvas for DisplayList {
    fn size(&self) -> Size {
        self.size
    }

    fn save(&mut self) {
        self.saved.push(self.origin);
        self.ops.push(DrawOp::Save);
    }

    // An unmatched restore is a no-op on a real canvas.
    fn restore(&mut self) {
        if let Some(origin) = self.saved.pop() {
            self.origin = origin;
        }
        self.ops.push(DrawOp::Restore);
    }

    fn translate(&mut self, x: f64, y: f64) -> Result<(), SurfaceError> {
        self.origin = self.origin.offset(x, y);
        self.ops.push(DrawOp::Translate { x, y });
        Ok(())
    }

    fn begin_path(&mut self) {
        self.ops.push(DrawOp::BeginPath);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.ops.push(DrawOp::MoveTo { x, y });
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.ops.push(DrawOp::LineTo { x, y });
    }

    fn close_path(&mut self) {
        self.ops.push(DrawOp::ClosePath);
    }

    fn stroke(&mut self) {
        self.ops.push(DrawOp::Stroke);
    }

    fn fill(&mut self) {
        self.ops.push(DrawOp::Fill);
    }

    fn set_line_width(&mut self, width: f64) {
        self.ops.push(DrawOp::LineWidth(width));
    }

    fn set_stroke_style(&mut self, style: &str) {
        self.ops.push(DrawOp::StrokeStyle(style.to_owned()));
    }

    fn set_fill_style(&mut self, style: &str) {
        self.ops.push(DrawOp::FillStyle(style.to_owned()));
    }

    fn set_font(&mut self, font: &str) {
        self.ops.push(DrawOp::Font(font.to_owned()));
    }

    fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ops.push(DrawOp::StrokeRect { x, y, width, height });
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ops.push(DrawOp::FillRect { x, y, width, height });
    }

    // Clearing the whole surface discards everything recorded so far.
    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        if self.clears_everything(x, y, width, height) {
            self.ops.clear();
        } else {
            self.ops.push(DrawOp::ClearRect { x, y, width, height });
        }
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) -> Result<(), SurfaceError> {
        self.ops.push(DrawOp::FillText { text: text.to_owned(), x, y });
        Ok(())
    }
}

impl Surface for DisplayList {
    type Buffer = RecordedFrame;

    fn create_buffer(&self) -> Result<RecordedFrame, SurfaceError> {
        Ok(RecordedFrame { size: self.size, ops: Vec::new() })
    }

    fn copy_into(&self, buffer: &mut RecordedFrame) -> Result<(), SurfaceError> {
        self.check_size(buffer.size)?;
        buffer.ops.clone_from(&self.ops);
        Ok(())
    }

    // A stored frame covers the full surface, so blitting it leaves exactly
    // that frame's content.
    fn blit_from(&mut self, buffer: &RecordedFrame) -> Result<(), SurfaceError> {
        self.check_size(buffer.size)?;
        self.ops.clone_from(&buffer.ops);
        self.blits += 1;
        Ok(())
    }
}

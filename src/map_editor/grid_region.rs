//! The hex grid: draws the model's grid and turns clicks into hex activations.

#[cfg(test)]
#[path = "grid_region_test.rs"]
mod grid_region_test;

use tracing::debug;

use crate::geom::Point;
use crate::hex::{Hex, axial_to_pixel, pixel_to_axial};
use crate::signal::Handled;
use crate::surface::{Canvas, Surface, SurfaceError, hex_path};
use crate::widget::{HandlerTable, RegionCx, Widget};

use super::{Editor, EditorEvent, EditorInput, EditorInputKind, RenderReport};

/// Center-to-corner distance of a grid hex, in pixels.
pub const HEX_SIZE: f64 = 30.0;

pub const BORDER_WIDTH: f64 = 2.0;
pub const BORDER_COLOR: &str = "black";
pub const HIGHLIGHT_COLOR: &str = "red";
pub const LABEL_FONT: &str = "12px sans-serif";
pub const LABEL_COLOR: &str = "black";

type Cx<'a, Sf, In> = RegionCx<'a, Editor<Sf, In>>;

pub struct HexGridRegion<Sf: Surface + 'static, In: 'static> {
    size: f64,
    /// Distance from the region's corner to the center of hex `(0, 0)`.
    offset: f64,
    inputs: HandlerTable<Self, Editor<Sf, In>, EditorInput>,
}

impl<Sf: Surface + 'static, In: 'static> Default for HexGridRegion<Sf, In> {
    fn default() -> Self {
        Self::new(HEX_SIZE)
    }
}

impl<Sf: Surface + 'static, In: 'static> HexGridRegion<Sf, In> {
    #[must_use]
    pub fn new(size: f64) -> Self {
        Self {
            size,
            offset: 2.0 * size,
            inputs: HandlerTable::new().on(EditorInputKind::PointSignal, Self::on_point),
        }
    }

    /// Pixel center of `hex` in this region's local space.
    #[must_use]
    pub fn center_of(&self, hex: Hex) -> Point {
        axial_to_pixel(hex, self.size).offset(self.offset, self.offset)
    }

    /// Hex under a point in this region's local space, on or off the grid.
    #[must_use]
    pub fn hex_at(&self, local: Point) -> Hex {
        pixel_to_axial(local.offset(-self.offset, -self.offset), self.size)
    }

    fn input_table(&self) -> &HandlerTable<Self, Editor<Sf, In>, EditorInput> {
        &self.inputs
    }

    fn on_point(&mut self, input: &EditorInput, cx: &mut Cx<'_, Sf, In>) {
        let EditorInput::PointSignal(p) = *input;
        let Some(local) = cx.localize(p) else {
            return;
        };
        let hex = self.hex_at(local);
        if cx.model().grid().contains(hex) {
            cx.bubble(EditorEvent::GridHexActivated(hex));
        } else {
            debug!(%hex, x = local.x, y = local.y, "click outside the grid");
        }
    }

    fn draw_hex(&self, canvas: &mut dyn Canvas, hex: Hex, fill: &str) -> Result<(), SurfaceError> {
        let center = self.center_of(hex);
        hex_path(canvas, center, self.size);
        canvas.set_line_width(BORDER_WIDTH);
        canvas.set_stroke_style(BORDER_COLOR);
        canvas.stroke();

        hex_path(canvas, center, self.size - 1.0);
        canvas.set_fill_style(fill);
        canvas.fill();

        canvas.set_font(LABEL_FONT);
        canvas.set_fill_style(LABEL_COLOR);
        canvas.fill_text(&hex.to_string(), center.x - self.size / 2.0 - 5.0, center.y)
    }
}

impl<Sf: Surface + 'static, In: 'static> Widget<Editor<Sf, In>> for HexGridRegion<Sf, In> {
    fn name(&self) -> &'static str {
        "hex-grid"
    }

    fn input_kinds(&self) -> Vec<EditorInputKind> {
        self.inputs.kinds()
    }

    fn handle_input(&mut self, input: &EditorInput, cx: &mut Cx<'_, Sf, In>) -> Handled {
        HandlerTable::route(self, Self::input_table, input, cx)
    }

    fn render(&self, canvas: &mut dyn Canvas, cx: &mut Cx<'_, Sf, In>) -> Result<(), SurfaceError> {
        let model = cx.model();
        let highlighted = model.last_painted();
        for (hex, tile) in model.grid().hexes() {
            let fill = if highlighted == Some(hex) { HIGHLIGHT_COLOR } else { tile.color() };
            self.draw_hex(canvas, hex, fill)?;
        }
        cx.bubble(EditorEvent::Render(RenderReport::of(cx)));
        Ok(())
    }
}

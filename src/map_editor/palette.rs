//! The tile palette: one swatch hex per tile, stacked vertically.

#[cfg(test)]
#[path = "palette_test.rs"]
mod palette_test;

use crate::geom::Point;
use crate::hex::{Hex, pixel_to_axial};
use crate::signal::Handled;
use crate::surface::{Canvas, Surface, SurfaceError, hex_path};
use crate::widget::{HandlerTable, RegionCx, Widget};

use super::tile::Tile;
use super::{Editor, EditorEvent, EditorInput, EditorInputKind, RenderReport};

/// Center-to-corner distance of a swatch, in pixels.
pub const SWATCH_SIZE: f64 = 45.0;
/// Vertical distance between swatch centers, in swatch sizes.
pub const SWATCH_SPACING: f64 = 2.5;
/// Center of the first swatch below the region's top edge, in pixels.
pub const SWATCH_TOP: f64 = 50.0;

pub const BORDER_WIDTH: f64 = 2.0;
pub const BORDER_COLOR: &str = "black";
pub const SELECTED_WIDTH: f64 = 5.0;
pub const SELECTED_COLOR: &str = "#ffcc00";

type Cx<'a, Sf, In> = RegionCx<'a, Editor<Sf, In>>;

pub struct TilePaletteRegion<Sf: Surface + 'static, In: 'static> {
    size: f64,
    inputs: HandlerTable<Self, Editor<Sf, In>, EditorInput>,
}

impl<Sf: Surface + 'static, In: 'static> Default for TilePaletteRegion<Sf, In> {
    fn default() -> Self {
        Self::new(SWATCH_SIZE)
    }
}

impl<Sf: Surface + 'static, In: 'static> TilePaletteRegion<Sf, In> {
    #[must_use]
    pub fn new(size: f64) -> Self {
        Self { size, inputs: HandlerTable::new().on(EditorInputKind::PointSignal, Self::on_point) }
    }

    /// Swatch centers in local space, in palette order, for a region `width` wide.
    pub fn swatches(&self, width: f64) -> impl Iterator<Item = (Tile, Point)> + '_ {
        (0u32..).zip(Tile::ALL).map(move |(i, tile)| {
            (tile, Point::new(width / 2.0, f64::from(i) * self.size * SWATCH_SPACING + SWATCH_TOP))
        })
    }

    /// Tile whose swatch covers the local point, if any.
    #[must_use]
    pub fn tile_at(&self, local: Point, width: f64) -> Option<Tile> {
        self.swatches(width)
            .find(|(_, center)| pixel_to_axial(local.relative_to(*center), self.size) == Hex::new(0, 0))
            .map(|(tile, _)| tile)
    }

    fn input_table(&self) -> &HandlerTable<Self, Editor<Sf, In>, EditorInput> {
        &self.inputs
    }

    fn on_point(&mut self, input: &EditorInput, cx: &mut Cx<'_, Sf, In>) {
        let EditorInput::PointSignal(p) = *input;
        let Some(local) = cx.localize(p) else {
            return;
        };
        if let Some(tile) = self.tile_at(local, cx.size().width) {
            cx.bubble(EditorEvent::HexToolActivated(tile));
        }
    }
}

impl<Sf: Surface + 'static, In: 'static> Widget<Editor<Sf, In>> for TilePaletteRegion<Sf, In> {
    fn name(&self) -> &'static str {
        "tile-palette"
    }

    fn input_kinds(&self) -> Vec<EditorInputKind> {
        self.inputs.kinds()
    }

    fn handle_input(&mut self, input: &EditorInput, cx: &mut Cx<'_, Sf, In>) -> Handled {
        HandlerTable::route(self, Self::input_table, input, cx)
    }

    fn render(&self, canvas: &mut dyn Canvas, cx: &mut Cx<'_, Sf, In>) -> Result<(), SurfaceError> {
        let selected = cx.model().tool();
        for (tile, center) in self.swatches(cx.size().width) {
            hex_path(canvas, center, self.size);
            if tile == selected {
                canvas.set_line_width(SELECTED_WIDTH);
                canvas.set_stroke_style(SELECTED_COLOR);
            } else {
                canvas.set_line_width(BORDER_WIDTH);
                canvas.set_stroke_style(BORDER_COLOR);
            }
            canvas.stroke();

            hex_path(canvas, center, self.size - 1.0);
            canvas.set_fill_style(tile.color());
            canvas.fill();
        }
        cx.bubble(EditorEvent::Render(RenderReport::of(cx)));
        Ok(())
    }
}

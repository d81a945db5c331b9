//! Root widget and assembly of a ready-to-run editor.

#[cfg(test)]
#[path = "root_test.rs"]
mod root_test;

use tracing::info;

use crate::config::Config;
use crate::coordinator::Coordinator;
use crate::geom::Size;
use crate::region::{Region, RegionError, RegionId, RegionTree, SetupError};
use crate::surface::{Canvas, Surface, SurfaceError};
use crate::widget::{RegionCx, Widget};

use super::grid_region::HexGridRegion;
use super::model::MapModel;
use super::palette::TilePaletteRegion;
use super::{Editor, EditorEvent, RenderReport};

pub const GRID_KEY: &str = "hex-grid";
pub const PALETTE_KEY: &str = "tile-palette";

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Setup(#[from] SetupError),
    #[error(transparent)]
    Layout(#[from] RegionError),
}

/// Root of the editor UI. Its render report marks a full redraw.
#[derive(Debug, Default, Clone, Copy)]
pub struct EditorRoot;

impl<Sf: Surface + 'static, In: 'static> Widget<Editor<Sf, In>> for EditorRoot {
    fn name(&self) -> &'static str {
        "editor-root"
    }

    // Children have already drawn; only reached on a full redraw.
    fn render(&self, _canvas: &mut dyn Canvas, cx: &mut RegionCx<'_, Editor<Sf, In>>) -> Result<(), SurfaceError> {
        cx.bubble(EditorEvent::Render(RenderReport::of(cx)));
        Ok(())
    }
}

/// Assemble the editor on `surface`: grid on the left 7/8, palette on the right 1/8.
///
/// # Errors
///
/// Returns `BuildError` if the surface cannot be drawn on or is too small
/// for the layout.
pub fn build<Sf, In>(config: Config, surface: Sf, input_surface: In) -> Result<Coordinator<Editor<Sf, In>>, BuildError>
where
    Sf: Surface + 'static,
    In: 'static,
{
    let Size { width, height } = surface.size();
    let mut ui = RegionTree::new(config, EditorRoot, surface, input_surface)?;

    let grid_width = width / 8.0 * 7.0;
    let grid = Region::new(grid_width, height, HexGridRegion::<Sf, In>::default());
    ui.adopt(RegionId::ROOT, 0.0, 0.0, grid, Some(GRID_KEY.into()))?;
    ui.adopt(
        RegionId::ROOT,
        grid_width,
        0.0,
        Region::new(width - grid_width, height, TilePaletteRegion::<Sf, In>::default()),
        Some(PALETTE_KEY.into()),
    )?;

    info!(width, height, "map editor assembled");
    Ok(Coordinator::new(ui, MapModel::default()))
}

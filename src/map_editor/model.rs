//! Editor state: the hex grid and the tool context.

#[cfg(test)]
#[path = "model_test.rs"]
mod model_test;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::cache::Fingerprint;
use crate::hex::Hex;
use crate::model::Model;
use crate::signal::{Handled, Outbox};
use crate::surface::Surface;

use super::tile::Tile;
use super::{Editor, EditorEvent, EditorEventKind};

pub const DEFAULT_ROWS: usize = 9;
pub const DEFAULT_TOP_WIDTH: usize = 13;

/// A roughly rectangular block of hexes in axial coordinates.
///
/// Even rows hold `top_width` hexes and odd rows one fewer. Storage index
/// `i` of row `r` is the axial hex `(r, i - r / 2)`, which keeps each row's
/// left edge aligned on screen.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridModel {
    rows: Vec<Vec<Tile>>,
}

impl Default for GridModel {
    fn default() -> Self {
        Self::new(DEFAULT_ROWS, DEFAULT_TOP_WIDTH)
    }
}

impl GridModel {
    /// A grid of `rows` rows, all [`Tile::Field`].
    #[must_use]
    pub fn new(rows: usize, top_width: usize) -> Self {
        let rows = (0..rows)
            .map(|r| {
                let width = if r % 2 == 0 { top_width } else { top_width.saturating_sub(1) };
                vec![Tile::default(); width]
            })
            .collect();
        Self { rows }
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Number of hexes in `row`; 0 outside the grid.
    #[must_use]
    pub fn row_width(&self, row: usize) -> usize {
        self.rows.get(row).map_or(0, Vec::len)
    }

    fn slot(&self, hex: Hex) -> Option<(usize, usize)> {
        let Ok(row) = usize::try_from(hex.row) else {
            return None;
        };
        let Ok(index) = usize::try_from(i64::from(hex.col) + i64::from(hex.row / 2)) else {
            return None;
        };
        (index < self.row_width(row)).then_some((row, index))
    }

    #[must_use]
    pub fn get(&self, hex: Hex) -> Option<Tile> {
        self.slot(hex).map(|(r, i)| self.rows[r][i])
    }

    #[must_use]
    pub fn contains(&self, hex: Hex) -> bool {
        self.slot(hex).is_some()
    }

    /// Paint `hex`. Returns `false` if it lies outside the grid.
    pub fn set_tile(&mut self, hex: Hex, tile: Tile) -> bool {
        let Some((r, i)) = self.slot(hex) else {
            return false;
        };
        self.rows[r][i] = tile;
        true
    }

    /// Every hex with its tile, row by row.
    pub fn hexes(&self) -> impl Iterator<Item = (Hex, Tile)> + '_ {
        self.rows.iter().enumerate().flat_map(|(r, row)| {
            row.iter().enumerate().map(move |(i, tile)| (axial(r, i), *tile))
        })
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
fn axial(row: usize, index: usize) -> Hex {
    let row = row as i32;
    Hex::new(row, index as i32 - row / 2)
}

/// The editor model: grid plus the currently selected tool.
#[derive(Debug, Clone)]
pub struct MapModel {
    grid: GridModel,
    tool: Tile,
    last_painted: Option<Hex>,
    renders: u64,
    region_renders: u64,
    fingerprint: Fingerprint,
}

impl Default for MapModel {
    fn default() -> Self {
        Self::new(GridModel::default())
    }
}

impl MapModel {
    #[must_use]
    pub fn new(grid: GridModel) -> Self {
        let mut model = Self {
            grid,
            tool: Tile::default(),
            last_painted: None,
            renders: 0,
            region_renders: 0,
            fingerprint: Fingerprint::from_raw(0),
        };
        model.fingerprint = model.digest();
        model
    }

    #[must_use]
    pub fn grid(&self) -> &GridModel {
        &self.grid
    }

    /// Tile that the next grid click paints.
    #[must_use]
    pub fn tool(&self) -> Tile {
        self.tool
    }

    /// Most recently painted hex, highlighted by the grid.
    #[must_use]
    pub fn last_painted(&self) -> Option<Hex> {
        self.last_painted
    }

    /// Full redraws reported by the UI.
    #[must_use]
    pub fn renders(&self) -> u64 {
        self.renders
    }

    /// Individual region draws reported by the UI, root included.
    #[must_use]
    pub fn region_renders(&self) -> u64 {
        self.region_renders
    }

    /// Fingerprint as of the last processed tick.
    #[must_use]
    pub fn fingerprint(&self) -> Fingerprint {
        self.fingerprint
    }

    /// Paint `hex` with the selected tool. Off-grid hexes are ignored.
    pub fn paint(&mut self, hex: Hex) -> bool {
        if !self.grid.set_tile(hex, self.tool) {
            return false;
        }
        self.last_painted = Some(hex);
        true
    }

    pub fn select_tool(&mut self, tile: Tile) {
        self.tool = tile;
    }

    // Everything the UI draws from. The render counts are not drawn.
    fn digest(&self) -> Fingerprint {
        Fingerprint::of(&(&self.grid, self.tool, self.last_painted))
    }
}

impl<Sf: Surface + 'static, In: 'static> Model<Editor<Sf, In>> for MapModel {
    fn fingerprint(&self) -> Fingerprint {
        self.fingerprint
    }

    fn update_for_tick(&mut self, tick: u64) {
        let next = self.digest();
        if next != self.fingerprint {
            debug!(tick, fingerprint = next.raw(), "map changed");
        }
        self.fingerprint = next;
    }

    fn event_kinds(&self) -> Vec<EditorEventKind> {
        vec![EditorEventKind::GridHexActivated, EditorEventKind::HexToolActivated, EditorEventKind::Render]
    }

    fn handle_event(&mut self, event: &EditorEvent, _out: &mut Outbox<EditorEvent>) -> Handled {
        match *event {
            EditorEvent::GridHexActivated(hex) => {
                if !self.paint(hex) {
                    debug!(%hex, "hex outside grid; ignored");
                }
            }
            EditorEvent::HexToolActivated(tile) => {
                debug!(%tile, "tool selected");
                self.select_tool(tile);
            }
            EditorEvent::Render(report) => {
                self.region_renders += 1;
                trace!(region = report.region.index(), bounds = ?report.bounds, "region drawn");
                if report.is_frame() {
                    self.renders += 1;
                    trace!(fingerprint = report.fingerprint.raw(), renders = self.renders, "ui redrawn");
                }
            }
        }
        Handled::Yes
    }
}

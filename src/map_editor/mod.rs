//! Hex-grid map editor built on the region tree.
//!
//! The screen is split into a hex grid (left 7/8) and a tile palette (right
//! 1/8). Clicking a palette swatch selects a tool; clicking a grid hex paints
//! it with the selected tool. Both regions only bubble events; the
//! [`model::MapModel`] owns all editor state.
//!
//! | Module | Role |
//! |--------|------|
//! | [`tile`] | Tile types and their colors |
//! | [`model`] | Grid layout and the editor model |
//! | [`grid_region`] | Grid region: draws hexes, turns clicks into hex activations |
//! | [`palette`] | Palette region: draws swatches, turns clicks into tool selection |
//! | [`root`] | Root widget and [`root::build`] |
//! | [`app`] | `wasm-bindgen` entry point for the browser |

pub mod app;
pub mod grid_region;
pub mod model;
pub mod palette;
pub mod root;
pub mod tile;

use std::marker::PhantomData;

use web_sys::HtmlCanvasElement;

use crate::cache::Fingerprint;
use crate::geom::{Point, Rect};
use crate::hex::Hex;
use crate::region::RegionId;
use crate::signal::{Schema, Signal};
use crate::surface::Surface;
use crate::surface::display_list::DisplayList;
use crate::web::CanvasSurface;
use crate::widget::RegionCx;

use self::model::MapModel;
use self::tile::Tile;

/// Map editor schema over a drawing surface `Sf` and an input surface `In`.
pub struct Editor<Sf, In>(PhantomData<fn() -> (Sf, In)>);

impl<Sf: Surface + 'static, In: 'static> Schema for Editor<Sf, In> {
    type Input = EditorInput;
    type Event = EditorEvent;
    type Model = MapModel;
    type Surface = Sf;
    type InputSurface = In;
}

/// Editor drawing into a [`DisplayList`], with no input surface.
pub type HeadlessEditor = Editor<DisplayList, ()>;

/// Editor drawing into a browser canvas, taking clicks from an overlay canvas.
pub type WebEditor = Editor<CanvasSurface, HtmlCanvasElement>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditorInputKind {
    PointSignal,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EditorInput {
    /// A click at this root-space position.
    PointSignal(Point),
}

impl Signal for EditorInput {
    type Kind = EditorInputKind;

    fn kind(&self) -> EditorInputKind {
        match self {
            Self::PointSignal(_) => EditorInputKind::PointSignal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditorEventKind {
    GridHexActivated,
    HexToolActivated,
    Render,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EditorEvent {
    /// A grid hex was clicked.
    GridHexActivated(Hex),
    /// A palette swatch was clicked.
    HexToolActivated(Tile),
    /// A region was drawn during a full redraw.
    Render(RenderReport),
}

impl Signal for EditorEvent {
    type Kind = EditorEventKind;

    fn kind(&self) -> EditorEventKind {
        match self {
            Self::GridHexActivated(_) => EditorEventKind::GridHexActivated,
            Self::HexToolActivated(_) => EditorEventKind::HexToolActivated,
            Self::Render(_) => EditorEventKind::Render,
        }
    }
}

/// Sent by every editor region after it draws. The root's report comes last
/// and marks a completed redraw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderReport {
    pub region: RegionId,
    /// Where the region sits in its parent's space.
    pub bounds: Rect,
    /// Model state the frame was drawn from.
    pub fingerprint: Fingerprint,
}

impl RenderReport {
    /// Report for the region `cx` belongs to.
    #[must_use]
    pub fn of<Sf: Surface + 'static, In: 'static>(cx: &RegionCx<'_, Editor<Sf, In>>) -> Self {
        Self { region: cx.id(), bounds: cx.bounds(), fingerprint: cx.model().fingerprint() }
    }

    /// Whether this report closes a full redraw.
    #[must_use]
    pub fn is_frame(&self) -> bool {
        self.region == RegionId::ROOT
    }
}

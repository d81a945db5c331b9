//! Region behavior: the [`Widget`] trait, its per-call context, and the
//! kind-keyed handler tables widgets dispatch through.

#[cfg(test)]
#[path = "widget_test.rs"]
mod widget_test;

use std::fmt;

use crate::config::Config;
use crate::geom::{Point, Rect, Size};
use crate::region::{Bubbled, RegionId, RegionKey};
use crate::signal::{EventKind, Handled, InputKind, Schema, Signal};
use crate::surface::{Canvas, SurfaceError};

/// Behavior attached to one region of the tree.
///
/// Geometry and tree bookkeeping live in the [`crate::region::RegionTree`];
/// a widget only declares which kinds it handles, reacts to them, and draws
/// itself in its own local coordinate space.
pub trait Widget<S: Schema> {
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Input kinds this region handles itself (not counting children).
    fn input_kinds(&self) -> Vec<InputKind<S>> {
        Vec::new()
    }

    /// Event kinds this region handles itself (not counting children).
    fn event_kinds(&self) -> Vec<EventKind<S>> {
        Vec::new()
    }

    fn handle_input(&mut self, _input: &S::Input, _cx: &mut RegionCx<'_, S>) -> Handled {
        Handled::Unknown
    }

    fn handle_event(&mut self, _event: &S::Event, _cx: &mut RegionCx<'_, S>) -> Handled {
        Handled::Unknown
    }

    /// Draw this region. The canvas is already translated to the region's origin.
    ///
    /// # Errors
    ///
    /// Returns `Err` if a drawing call fails.
    fn render(&self, _canvas: &mut dyn Canvas, _cx: &mut RegionCx<'_, S>) -> Result<(), SurfaceError> {
        Ok(())
    }
}

/// A region with no behavior of its own; groups children.
#[derive(Debug, Clone, Copy)]
pub struct Container {
    name: &'static str,
}

impl Container {
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self { name }
    }
}

impl<S: Schema> Widget<S> for Container {
    fn name(&self) -> &'static str {
        self.name
    }
}

/// Everything a widget may see or do during one handler or render call.
pub struct RegionCx<'a, S: Schema> {
    id: RegionId,
    key: &'a RegionKey,
    bounds: Rect,
    parent_origin: Point,
    model: &'a S::Model,
    config: &'a Config,
    bubbled: &'a mut Vec<Bubbled<S::Event>>,
}

impl<'a, S: Schema> RegionCx<'a, S> {
    pub(crate) fn new(
        id: RegionId,
        key: &'a RegionKey,
        bounds: Rect,
        parent_origin: Point,
        model: &'a S::Model,
        config: &'a Config,
        bubbled: &'a mut Vec<Bubbled<S::Event>>,
    ) -> Self {
        Self { id, key, bounds, parent_origin, model, config, bubbled }
    }

    #[must_use]
    pub fn id(&self) -> RegionId {
        self.id
    }

    #[must_use]
    pub fn key(&self) -> &RegionKey {
        self.key
    }

    /// This region's rectangle in its parent's space.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    #[must_use]
    pub fn size(&self) -> Size {
        self.bounds.size
    }

    #[must_use]
    pub fn model(&self) -> &S::Model {
        self.model
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        self.config
    }

    /// Inclusive containment test for a point in the parent's space.
    #[must_use]
    pub fn contains_point(&self, p: Point) -> bool {
        self.bounds.contains(p)
    }

    /// Convert a root-space point into this region's parent space.
    #[must_use]
    pub fn to_parent_space(&self, root_point: Point) -> Point {
        root_point.relative_to(self.parent_origin)
    }

    /// The root-space point in this region's local space, if it falls inside.
    #[must_use]
    pub fn localize(&self, root_point: Point) -> Option<Point> {
        let p = self.to_parent_space(root_point);
        self.contains_point(p).then(|| p.relative_to(self.bounds.origin))
    }

    /// Send `event` up through this region's ancestors to the coordinator.
    pub fn bubble(&mut self, event: S::Event) {
        self.bubbled.push(Bubbled { origin: self.id, event });
    }
}

/// Handler entry: receives the widget, the message, and the region context.
pub type Handler<W, S, M> = fn(&mut W, &M, &mut RegionCx<'_, S>);

/// Per-widget dispatch table keyed by message kind.
///
/// Supporting a new kind means adding an entry with [`HandlerTable::on`]; the
/// table's keys double as the widget's declared kinds.
pub struct HandlerTable<W, S: Schema, M: Signal> {
    entries: Vec<(M::Kind, Handler<W, S, M>)>,
}

impl<W, S: Schema, M: Signal> Default for HandlerTable<W, S, M> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<W, S: Schema, M: Signal> fmt::Debug for HandlerTable<W, S, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.entries.iter().map(|(kind, _)| kind)).finish()
    }
}

impl<W, S: Schema, M: Signal> HandlerTable<W, S, M> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the handler for `kind`.
    #[must_use]
    pub fn on(mut self, kind: M::Kind, handler: Handler<W, S, M>) -> Self {
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| *k == kind) {
            entry.1 = handler;
        } else {
            self.entries.push((kind, handler));
        }
        self
    }

    /// Handled kinds in the order they were added.
    #[must_use]
    pub fn kinds(&self) -> Vec<M::Kind> {
        self.entries.iter().map(|(k, _)| *k).collect()
    }

    #[must_use]
    pub fn get(&self, kind: M::Kind) -> Option<Handler<W, S, M>> {
        self.entries.iter().find(|(k, _)| *k == kind).map(|(_, h)| *h)
    }

    /// Look up `msg`'s kind in the table selected from `target` and run it.
    pub fn route(target: &mut W, table: fn(&W) -> &Self, msg: &M, cx: &mut RegionCx<'_, S>) -> Handled {
        let Some(handler) = table(target).get(msg.kind()) else {
            return Handled::Unknown;
        };
        handler(target, msg, cx);
        Handled::Yes
    }
}

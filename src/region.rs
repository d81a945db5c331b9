//! Region tree: layout, broadcast dispatch, bubbling and cached rendering.
//!
//! DESIGN
//! ======
//! Regions live in an arena owned by [`RegionTree`]; a region refers to its
//! parent and children by [`RegionId`]. A detached [`Region`] is consumed by
//! [`RegionTree::adopt`], so a region can be attached at most once.
//!
//! Inputs and events are broadcast: every region whose widget declares the
//! kind receives it, parents before children, children in adoption order.
//! Whether a point actually falls inside a region is for the leaf to decide.
//! Events a widget bubbles walk the parent chain to the root and are returned
//! to the caller (the coordinator) for queueing.
//!
//! The root owns the drawing surface, the input surface and the render cache.
//! Rendering goes children first, each region in its own translated space.
//!
//! ERROR HANDLING
//! ==============
//! Adoption mistakes (`RegionError`) and a surface that cannot be drawn on
//! (`SetupError`) are configuration errors reported at setup. Draw failures
//! propagate as `SurfaceError` and leave the render cache invalidated.

#[cfg(test)]
#[path = "region_test.rs"]
mod region_test;

use std::fmt;

use tracing::{debug, info, trace, warn};

use crate::cache::{RenderCache, RenderOutcome};
use crate::config::Config;
use crate::consts::{DEBUG_LABEL_FONT, DEBUG_OUTLINE_COLOR};
use crate::geom::{Point, Rect, Size};
use crate::model::Model;
use crate::signal::{EventKind, Handled, InputKind, Schema, Signal};
use crate::surface::{Canvas, Surface, SurfaceError};
use crate::widget::{RegionCx, Widget};

// =============================================================================
// TYPES
// =============================================================================

/// Index of a region in its tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionId(usize);

impl RegionId {
    /// The root region of every tree.
    pub const ROOT: Self = Self(0);

    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Name of a region, unique among its siblings.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RegionKey {
    /// Assigned by the tree when the caller supplies no key.
    Auto(u32),
    Named(String),
}

impl fmt::Display for RegionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto(n) => write!(f, "#{n}"),
            Self::Named(name) => f.write_str(name),
        }
    }
}

impl From<&str> for RegionKey {
    fn from(name: &str) -> Self {
        Self::Named(name.to_owned())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RegionError {
    #[error("unknown region: {0:?}")]
    UnknownRegion(RegionId),
    #[error("region size {0:?} is not a positive finite area")]
    InvalidSize(Size),
    #[error("child {child:?} does not fit inside parent {parent:?} of size {parent_size:?}")]
    OutOfBounds { parent: RegionId, child: Rect, parent_size: Size },
    #[error("key {key} already used by a child of {parent:?}")]
    DuplicateKey { parent: RegionId, key: RegionKey },
}

#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("surface of size {0:?} cannot be drawn on")]
    EmptySurface(Size),
    #[error("surface unavailable: {0}")]
    Surface(#[from] SurfaceError),
}

/// A region that has not been attached to a tree yet.
pub struct Region<S: Schema> {
    size: Size,
    widget: Box<dyn Widget<S>>,
}

impl<S: Schema> Region<S> {
    #[must_use]
    pub fn new(width: f64, height: f64, widget: impl Widget<S> + 'static) -> Self {
        Self { size: Size::new(width, height), widget: Box::new(widget) }
    }

    #[must_use]
    pub fn size(&self) -> Size {
        self.size
    }
}

/// An event on its way from the region that raised it to the root.
pub(crate) struct Bubbled<E> {
    pub(crate) origin: RegionId,
    pub(crate) event: E,
}

/// Result of one root render.
#[derive(Debug)]
pub struct RenderPass<E> {
    pub outcome: RenderOutcome,
    /// Events bubbled by regions while drawing, already handed off by the root.
    pub bubbled: Vec<E>,
}

struct Node<S: Schema> {
    key: RegionKey,
    /// Rectangle in the parent's space.
    bounds: Rect,
    /// Root-space origin of the parent.
    parent_origin: Point,
    parent: Option<RegionId>,
    children: Vec<RegionId>,
    widget: Box<dyn Widget<S>>,
    input_kinds: Vec<InputKind<S>>,
    event_kinds: Vec<EventKind<S>>,
    next_auto: u32,
}

impl<S: Schema> Node<S> {
    fn new(
        key: RegionKey,
        bounds: Rect,
        parent_origin: Point,
        parent: Option<RegionId>,
        widget: Box<dyn Widget<S>>,
    ) -> Self {
        let input_kinds = dedup(widget.input_kinds());
        let event_kinds = dedup(widget.event_kinds());
        Self {
            key,
            bounds,
            parent_origin,
            parent,
            children: Vec::new(),
            widget,
            input_kinds,
            event_kinds,
            next_auto: 0,
        }
    }

    fn abs_origin(&self) -> Point {
        self.parent_origin.offset(self.bounds.origin.x, self.bounds.origin.y)
    }

    fn cx<'a>(
        &'a self,
        id: RegionId,
        model: &'a S::Model,
        config: &'a Config,
        bubbled: &'a mut Vec<Bubbled<S::Event>>,
    ) -> RegionCx<'a, S> {
        RegionCx::new(id, &self.key, self.bounds, self.parent_origin, model, config, bubbled)
    }
}

fn dedup<K: PartialEq>(kinds: Vec<K>) -> Vec<K> {
    let mut out = Vec::with_capacity(kinds.len());
    for kind in kinds {
        if !out.contains(&kind) {
            out.push(kind);
        }
    }
    out
}

// =============================================================================
// TREE
// =============================================================================

/// Arena of regions rooted at [`RegionId::ROOT`].
pub struct RegionTree<S: Schema> {
    nodes: Vec<Node<S>>,
    config: Config,
    surface: S::Surface,
    cache: RenderCache<<S::Surface as Surface>::Buffer>,
    input_surface: S::InputSurface,
}

impl<S: Schema> RegionTree<S> {
    /// Create a tree whose root covers the whole of `surface`.
    ///
    /// # Errors
    ///
    /// Returns `SetupError` if the surface has no drawable area or its
    /// secondary buffer cannot be allocated.
    pub fn new(
        config: Config,
        root: impl Widget<S> + 'static,
        surface: S::Surface,
        input_surface: S::InputSurface,
    ) -> Result<Self, SetupError> {
        let size = surface.size();
        if !size.is_drawable() {
            return Err(SetupError::EmptySurface(size));
        }
        let buffer = surface.create_buffer()?;
        let bounds = Rect { origin: Point::new(0.0, 0.0), size };
        let root = Node::new(RegionKey::from("root"), bounds, Point::new(0.0, 0.0), None, Box::new(root));
        info!(
            app = %config.application_name,
            width = size.width,
            height = size.height,
            widget = root.widget.name(),
            "region tree created"
        );
        Ok(Self { nodes: vec![root], config, surface, cache: RenderCache::new(buffer), input_surface })
    }

    #[must_use]
    pub fn root(&self) -> RegionId {
        RegionId::ROOT
    }

    /// Number of regions, root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn node(&self, id: RegionId) -> Result<&Node<S>, RegionError> {
        self.nodes.get(id.0).ok_or(RegionError::UnknownRegion(id))
    }

    /// Attach `region` under `parent` with its origin at `(x, y)` in the parent's space.
    ///
    /// Without a `key` the next free automatic key of `parent` is used.
    ///
    /// # Errors
    ///
    /// `UnknownRegion` for a bad parent, `InvalidSize` for an empty, negative
    /// or non-finite size, `OutOfBounds` if the child does not fit inside the
    /// parent, `DuplicateKey` if a sibling already has `key`.
    pub fn adopt(
        &mut self,
        parent: RegionId,
        x: f64,
        y: f64,
        region: Region<S>,
        key: Option<RegionKey>,
    ) -> Result<RegionId, RegionError> {
        let parent_node = self.node(parent)?;
        if !region.size.is_drawable() {
            return Err(RegionError::InvalidSize(region.size));
        }
        let child = Rect { origin: Point::new(x, y), size: region.size };
        let local = Rect { origin: Point::new(0.0, 0.0), size: parent_node.bounds.size };
        if !local.encloses(&child) {
            return Err(RegionError::OutOfBounds { parent, child, parent_size: local.size });
        }
        let parent_origin = parent_node.abs_origin();

        let mut next_auto = parent_node.next_auto;
        let key = match key {
            Some(key) => {
                if self.child(parent, &key).is_some() {
                    return Err(RegionError::DuplicateKey { parent, key });
                }
                key
            }
            None => loop {
                let candidate = RegionKey::Auto(next_auto);
                next_auto += 1;
                if self.child(parent, &candidate).is_none() {
                    break candidate;
                }
            },
        };

        let id = RegionId(self.nodes.len());
        debug!(?parent, ?id, %key, widget = region.widget.name(), x, y, "adopting region");
        self.nodes.push(Node::new(key, child, parent_origin, Some(parent), region.widget));
        let parent_node = &mut self.nodes[parent.0];
        parent_node.children.push(id);
        parent_node.next_auto = next_auto;
        self.cache.invalidate();
        Ok(id)
    }

    /// Child of `parent` with `key`, if any.
    #[must_use]
    pub fn child(&self, parent: RegionId, key: &RegionKey) -> Option<RegionId> {
        let node = self.nodes.get(parent.0)?;
        node.children.iter().copied().find(|c| self.nodes[c.0].key == *key)
    }

    /// Children of `id` in adoption order.
    #[must_use]
    pub fn children(&self, id: RegionId) -> &[RegionId] {
        self.nodes.get(id.0).map(|n| n.children.as_slice()).unwrap_or_default()
    }

    #[must_use]
    pub fn parent(&self, id: RegionId) -> Option<RegionId> {
        self.nodes.get(id.0).and_then(|n| n.parent)
    }

    #[must_use]
    pub fn key(&self, id: RegionId) -> Option<&RegionKey> {
        self.nodes.get(id.0).map(|n| &n.key)
    }

    /// Rectangle of `id` in its parent's space.
    #[must_use]
    pub fn bounds(&self, id: RegionId) -> Option<Rect> {
        self.nodes.get(id.0).map(|n| n.bounds)
    }

    /// Inclusive test of a parent-space point against the region's rectangle.
    #[must_use]
    pub fn contains_point(&self, id: RegionId, p: Point) -> bool {
        self.nodes.get(id.0).is_some_and(|n| n.bounds.contains(p))
    }

    /// Convert a root-space point into the parent space of `id`.
    #[must_use]
    pub fn to_parent_space(&self, id: RegionId, root_point: Point) -> Option<Point> {
        self.nodes.get(id.0).map(|n| root_point.relative_to(n.parent_origin))
    }

    /// Convert a root-space point into the local space of `id`, if it falls inside.
    #[must_use]
    pub fn localize(&self, id: RegionId, root_point: Point) -> Option<Point> {
        let node = self.nodes.get(id.0)?;
        let p = root_point.relative_to(node.parent_origin);
        node.bounds.contains(p).then(|| p.relative_to(node.bounds.origin))
    }

    /// Input kinds handled anywhere in the subtree of `id`, in first-seen order.
    #[must_use]
    pub fn input_kinds(&self, id: RegionId) -> Vec<InputKind<S>> {
        let mut kinds = Vec::new();
        self.collect(id, &mut |node| {
            for kind in &node.input_kinds {
                if !kinds.contains(kind) {
                    kinds.push(*kind);
                }
            }
        });
        kinds
    }

    /// Event kinds handled anywhere in the subtree of `id`, in first-seen order.
    #[must_use]
    pub fn event_kinds(&self, id: RegionId) -> Vec<EventKind<S>> {
        let mut kinds = Vec::new();
        self.collect(id, &mut |node| {
            for kind in &node.event_kinds {
                if !kinds.contains(kind) {
                    kinds.push(*kind);
                }
            }
        });
        kinds
    }

    fn collect(&self, id: RegionId, visit: &mut dyn FnMut(&Node<S>)) {
        let Some(node) = self.nodes.get(id.0) else {
            return;
        };
        visit(node);
        for &child in &node.children {
            self.collect(child, visit);
        }
    }

    /// Broadcast `input` through the whole tree. Returns events bubbled to the root.
    pub fn dispatch_input(&mut self, model: &S::Model, input: &S::Input) -> Vec<S::Event> {
        let kind = input.kind();
        let mut bubbled = Vec::new();
        let Self { nodes, config, .. } = self;
        broadcast(nodes, RegionId::ROOT, &mut |id, node| {
            if !node.input_kinds.contains(&kind) {
                return;
            }
            let mut cx = RegionCx::new(id, &node.key, node.bounds, node.parent_origin, model, config, &mut bubbled);
            if node.widget.handle_input(input, &mut cx) == Handled::Unknown {
                let widget = node.widget.name();
                warn!(region = %node.key, widget, ?kind, "declared input kind not handled; dropped");
            }
        });
        hand_off(nodes, bubbled)
    }

    /// Broadcast `event` through the whole tree. Returns events bubbled to the root.
    pub fn dispatch_event(&mut self, model: &S::Model, event: &S::Event) -> Vec<S::Event> {
        let kind = event.kind();
        let mut bubbled = Vec::new();
        let Self { nodes, config, .. } = self;
        broadcast(nodes, RegionId::ROOT, &mut |id, node| {
            if !node.event_kinds.contains(&kind) {
                return;
            }
            let mut cx = RegionCx::new(id, &node.key, node.bounds, node.parent_origin, model, config, &mut bubbled);
            if node.widget.handle_event(event, &mut cx) == Handled::Unknown {
                let widget = node.widget.name();
                warn!(region = %node.key, widget, ?kind, "declared event kind not handled; dropped");
            }
        });
        hand_off(nodes, bubbled)
    }

    /// Render the whole tree onto the surface, reusing the cached frame when
    /// the model's fingerprint has not changed since the last full redraw.
    ///
    /// # Errors
    ///
    /// Propagates drawing and blitting failures from the surface.
    pub fn render(&mut self, model: &S::Model) -> Result<RenderPass<S::Event>, SurfaceError> {
        let mut bubbled = Vec::new();
        let Self { nodes, config, surface, cache, .. } = self;
        let outcome = cache.render(model.fingerprint(), surface, |s| {
            render_region(nodes, RegionId::ROOT, s, model, config, &mut bubbled)
        })?;
        Ok(RenderPass { outcome, bubbled: hand_off(nodes, bubbled) })
    }

    #[must_use]
    pub fn surface(&self) -> &S::Surface {
        &self.surface
    }

    #[must_use]
    pub fn input_surface(&self) -> &S::InputSurface {
        &self.input_surface
    }

    #[must_use]
    pub fn cache(&self) -> &RenderCache<<S::Surface as Surface>::Buffer> {
        &self.cache
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }
}

// =============================================================================
// TRAVERSAL
// =============================================================================

/// Visit `id` and then its subtree, children in adoption order.
fn broadcast<S: Schema>(nodes: &mut [Node<S>], id: RegionId, visit: &mut dyn FnMut(RegionId, &mut Node<S>)) {
    visit(id, &mut nodes[id.0]);
    for i in 0..nodes[id.0].children.len() {
        let child = nodes[id.0].children[i];
        broadcast(nodes, child, visit);
    }
}

/// Walk each bubbled event up to the root and release it.
fn hand_off<S: Schema>(nodes: &[Node<S>], bubbled: Vec<Bubbled<S::Event>>) -> Vec<S::Event> {
    bubbled
        .into_iter()
        .map(|Bubbled { origin, event }| {
            let mut at = origin;
            while let Some(parent) = nodes[at.0].parent {
                trace!(from = %nodes[at.0].key, to = %nodes[parent.0].key, kind = ?event.kind(), "bubbling");
                at = parent;
            }
            debug!(origin = %nodes[origin.0].key, kind = ?event.kind(), "bubbled event reached root");
            event
        })
        .collect()
}

fn render_region<S: Schema>(
    nodes: &[Node<S>],
    id: RegionId,
    canvas: &mut dyn Canvas,
    model: &S::Model,
    config: &Config,
    bubbled: &mut Vec<Bubbled<S::Event>>,
) -> Result<(), SurfaceError> {
    canvas.save();
    let result = render_translated(nodes, id, canvas, model, config, bubbled);
    canvas.restore();
    result
}

fn render_translated<S: Schema>(
    nodes: &[Node<S>],
    id: RegionId,
    canvas: &mut dyn Canvas,
    model: &S::Model,
    config: &Config,
    bubbled: &mut Vec<Bubbled<S::Event>>,
) -> Result<(), SurfaceError> {
    let node = &nodes[id.0];
    canvas.translate(node.bounds.origin.x, node.bounds.origin.y)?;
    for &child in &node.children {
        render_region(nodes, child, canvas, model, config, bubbled)?;
    }
    node.widget.render(canvas, &mut node.cx(id, model, config, bubbled))?;
    if config.debug {
        draw_outline(canvas, node)?;
    }
    Ok(())
}

fn draw_outline<S: Schema>(canvas: &mut dyn Canvas, node: &Node<S>) -> Result<(), SurfaceError> {
    let Size { width, height } = node.bounds.size;
    canvas.save();
    canvas.set_line_width(1.0);
    canvas.set_stroke_style(DEBUG_OUTLINE_COLOR);
    canvas.stroke_rect(0.0, 0.0, width, height);
    canvas.set_font(DEBUG_LABEL_FONT);
    canvas.set_fill_style(DEBUG_OUTLINE_COLOR);
    let result = canvas.fill_text(&node.key.to_string(), 4.0, 14.0);
    canvas.restore();
    result
}

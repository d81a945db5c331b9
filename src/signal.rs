//! Typed message vocabulary shared by the queues, registries and regions.
//!
//! An application defines two message enums, one for raw inputs and one for
//! derived application events. Each reports a fieldless `Kind` enum, which is
//! what listeners subscribe to and what handler tables are keyed by. The
//! [`Schema`] trait ties those enums to the application's model and platform
//! types so the rest of the crate can stay generic over a single parameter.

#[cfg(test)]
#[path = "signal_test.rs"]
mod signal_test;

use std::fmt::Debug;
use std::hash::Hash;

use crate::model::Model;
use crate::surface::Surface;

/// A message that knows its own kind.
pub trait Signal: Debug {
    /// Fieldless discriminant used for subscription and dispatch.
    type Kind: Copy + Eq + Hash + Debug;

    fn kind(&self) -> Self::Kind;
}

/// The types one application plugs into the framework.
pub trait Schema: Sized + 'static {
    /// Raw input produced by controllers.
    type Input: Signal;
    /// Application events produced by regions and the model.
    type Event: Signal;
    /// State the UI renders.
    type Model: Model<Self>;
    /// Primary drawing surface owned by the root region.
    type Surface: Surface;
    /// Input-capturing layer handed to controllers (e.g. an overlay canvas).
    type InputSurface;
}

/// Kind of a schema's input messages.
pub type InputKind<S> = <<S as Schema>::Input as Signal>::Kind;

/// Kind of a schema's event messages.
pub type EventKind<S> = <<S as Schema>::Event as Signal>::Kind;

/// Outcome reported by a terminal handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handled {
    /// The handler recognized the message.
    Yes,
    /// The handler has no entry for this kind; the caller logs and drops it.
    Unknown,
}

/// Events emitted by a handler, collected for the coordinator.
#[derive(Debug)]
pub struct Outbox<E> {
    items: Vec<E>,
}

impl<E> Default for Outbox<E> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<E> Outbox<E> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, event: E) {
        self.items.push(event);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Emitted events in emission order.
    #[must_use]
    pub fn into_vec(self) -> Vec<E> {
        self.items
    }
}

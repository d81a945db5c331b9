//! Coordinator: owns the queues and listener registries and runs the tick.
//!
//! DESIGN
//! ======
//! Two channels: raw *inputs* from controllers and derived application
//! *events*. Each has a FIFO queue and a kind → listener registry. Producers
//! only enqueue; delivery happens when the host calls the tick phases in this
//! order:
//!
//! 1. [`Coordinator::process_inputs`] drains the input queue.
//! 2. [`Coordinator::process_updates`] drains the event queue, then advances
//!    the model.
//! 3. [`Coordinator::render_ui`] renders the region tree.
//!
//! Listeners are the model and the UI root. Events the UI bubbles and events
//! the model emits go back through [`Coordinator::new_event`], so they are
//! delivered on the next drain of the event queue, never re-entrantly.
//!
//! Anything offered for a kind nobody listens to is dropped at the door and
//! logged at debug level.

#[cfg(test)]
#[path = "coordinator_test.rs"]
mod coordinator_test;

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info, warn};

use crate::cache::RenderOutcome;
use crate::config::Config;
use crate::model::Model;
use crate::queue::EventQueue;
use crate::region::RegionTree;
use crate::registry::ListenerRegistry;
use crate::signal::{EventKind, Handled, InputKind, Outbox, Schema, Signal};
use crate::surface::SurfaceError;

/// Who receives a delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Listener {
    Model,
    /// The UI root, which broadcasts into its subtree.
    Ui,
}

type SharedRegistry<K> = Arc<RwLock<ListenerRegistry<K, Listener>>>;

/// Cloneable producer handle for controllers running on callback paths.
pub struct InputSender<S: Schema> {
    queue: EventQueue<S::Input>,
    listeners: SharedRegistry<InputKind<S>>,
}

impl<S: Schema> Clone for InputSender<S> {
    fn clone(&self) -> Self {
        Self { queue: self.queue.clone(), listeners: Arc::clone(&self.listeners) }
    }
}

impl<S: Schema> InputSender<S> {
    /// Queue `input` if any listener wants its kind. Returns whether it was queued.
    pub fn send(&self, input: S::Input) -> bool {
        let kind = input.kind();
        if !read(&self.listeners).has_subscribers(kind) {
            debug!(?kind, "no input listeners; dropped");
            return false;
        }
        self.queue.enqueue(input);
        true
    }
}

// Registries are only mutated by whole-entry pushes; a poisoned lock still
// guards a consistent map.
fn read<K>(lock: &RwLock<K>) -> RwLockReadGuard<'_, K> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<K>(lock: &RwLock<K>) -> RwLockWriteGuard<'_, K> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

pub struct Coordinator<S: Schema> {
    inputs: EventQueue<S::Input>,
    events: EventQueue<S::Event>,
    input_listeners: SharedRegistry<InputKind<S>>,
    event_listeners: ListenerRegistry<EventKind<S>, Listener>,
    ui: RegionTree<S>,
    model: S::Model,
}

impl<S: Schema> Coordinator<S> {
    /// Wire `model` and the `ui` tree together. The model is registered for
    /// its kinds first, then the UI root for every kind its subtree handles.
    #[must_use]
    pub fn new(ui: RegionTree<S>, model: S::Model) -> Self {
        let mut coordinator = Self {
            inputs: EventQueue::new(),
            events: EventQueue::new(),
            input_listeners: Arc::new(RwLock::new(ListenerRegistry::new())),
            event_listeners: ListenerRegistry::new(),
            ui,
            model,
        };
        let model_inputs = coordinator.model.input_kinds();
        let model_events = coordinator.model.event_kinds();
        coordinator.register_inputs_listener(model_inputs, Listener::Model);
        coordinator.register_events_listener(model_events, Listener::Model);
        coordinator.refresh_ui_listeners();
        info!(app = %coordinator.config().application_name, regions = coordinator.ui.len(), "coordinator ready");
        coordinator
    }

    // --- Producers ---

    /// Queue a raw input. Returns `false` (and drops it) if no listener wants its kind.
    pub fn new_input(&self, input: S::Input) -> bool {
        self.input_sender().send(input)
    }

    /// Queue an application event. Returns `false` (and drops it) if no listener wants its kind.
    pub fn new_event(&self, event: S::Event) -> bool {
        let kind = event.kind();
        if !self.event_listeners.has_subscribers(kind) {
            debug!(?kind, "no event listeners; dropped");
            return false;
        }
        self.events.enqueue(event);
        true
    }

    /// Handle for controllers that produce inputs outside the tick loop.
    #[must_use]
    pub fn input_sender(&self) -> InputSender<S> {
        InputSender { queue: self.inputs.clone(), listeners: Arc::clone(&self.input_listeners) }
    }

    /// The surface controllers attach to.
    #[must_use]
    pub fn input_surface(&self) -> &S::InputSurface {
        self.ui.input_surface()
    }

    // --- Registration ---

    pub fn register_inputs_listener(&mut self, kinds: impl IntoIterator<Item = InputKind<S>>, listener: Listener) {
        write(&self.input_listeners).register_all(kinds, listener);
    }

    pub fn register_events_listener(&mut self, kinds: impl IntoIterator<Item = EventKind<S>>, listener: Listener) {
        self.event_listeners.register_all(kinds, listener);
    }

    /// Re-register the UI root for its subtree's kinds, e.g. after adopting
    /// regions into a running tree. Already registered kinds are left alone.
    pub fn refresh_ui_listeners(&mut self) {
        let root = self.ui.root();
        let inputs = self.ui.input_kinds(root);
        let events = self.ui.event_kinds(root);
        self.register_inputs_listener(inputs, Listener::Ui);
        self.register_events_listener(events, Listener::Ui);
    }

    // --- Tick phases ---

    /// Deliver every queued input to its listeners in registration order.
    pub fn process_inputs(&mut self) {
        for input in self.inputs.drain() {
            let kind = input.kind();
            let listeners = read(&self.input_listeners).subscribers_for(kind).to_vec();
            for listener in listeners {
                let emitted = match listener {
                    Listener::Model => {
                        let mut out = Outbox::new();
                        if self.model.handle_input(&input, &mut out) == Handled::Unknown {
                            warn!(?kind, "model declared input kind but did not handle it");
                        }
                        out.into_vec()
                    }
                    Listener::Ui => self.ui.dispatch_input(&self.model, &input),
                };
                self.requeue(emitted);
            }
        }
    }

    /// Deliver every queued event to its listeners, then advance the model to `tick`.
    pub fn process_updates(&mut self, tick: u64) {
        for event in self.events.drain() {
            let kind = event.kind();
            let listeners = self.event_listeners.subscribers_for(kind).to_vec();
            for listener in listeners {
                let emitted = match listener {
                    Listener::Model => {
                        let mut out = Outbox::new();
                        if self.model.handle_event(&event, &mut out) == Handled::Unknown {
                            warn!(?kind, "model declared event kind but did not handle it");
                        }
                        out.into_vec()
                    }
                    Listener::Ui => self.ui.dispatch_event(&self.model, &event),
                };
                self.requeue(emitted);
            }
        }
        self.model.update_for_tick(tick);
    }

    /// Render the UI from the current model.
    ///
    /// # Errors
    ///
    /// Propagates surface failures from the region tree.
    pub fn render_ui(&mut self) -> Result<RenderOutcome, SurfaceError> {
        let pass = self.ui.render(&self.model)?;
        self.requeue(pass.bubbled);
        Ok(pass.outcome)
    }

    /// Run one full tick: inputs, then updates, then render.
    ///
    /// # Errors
    ///
    /// Propagates surface failures from [`Coordinator::render_ui`].
    pub fn run_tick(&mut self, tick: u64) -> Result<RenderOutcome, SurfaceError> {
        self.process_inputs();
        self.process_updates(tick);
        self.render_ui()
    }

    fn requeue(&self, events: Vec<S::Event>) {
        for event in events {
            self.new_event(event);
        }
    }

    // --- Accessors ---

    #[must_use]
    pub fn model(&self) -> &S::Model {
        &self.model
    }

    #[must_use]
    pub fn ui(&self) -> &RegionTree<S> {
        &self.ui
    }

    /// Mutable access to the tree, e.g. to adopt regions at runtime. Call
    /// [`Coordinator::refresh_ui_listeners`] afterwards.
    pub fn ui_mut(&mut self) -> &mut RegionTree<S> {
        &mut self.ui
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        self.ui.config()
    }

    /// Inputs waiting for the next [`Coordinator::process_inputs`].
    #[must_use]
    pub fn pending_inputs(&self) -> usize {
        self.inputs.len()
    }

    /// Events waiting for the next [`Coordinator::process_updates`].
    #[must_use]
    pub fn pending_events(&self) -> usize {
        self.events.len()
    }
}

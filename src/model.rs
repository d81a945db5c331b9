//! The contract between the coordinator and application state.

use crate::cache::Fingerprint;
use crate::signal::{EventKind, Handled, InputKind, Outbox, Schema};

/// The application state driven by the coordinator.
///
/// A model subscribes to kinds like any other listener, receives them in
/// registration order, and may emit follow-up events through the outbox; those
/// are queued and delivered on the next drain of the event queue.
pub trait Model<S: Schema> {
    /// Digest of everything the UI renders from. Recomputed in
    /// [`Model::update_for_tick`], never by the UI.
    fn fingerprint(&self) -> Fingerprint;

    /// Advance to `tick` after the tick's events have been delivered.
    fn update_for_tick(&mut self, tick: u64);

    fn input_kinds(&self) -> Vec<InputKind<S>> {
        Vec::new()
    }

    fn event_kinds(&self) -> Vec<EventKind<S>> {
        Vec::new()
    }

    fn handle_input(&mut self, _input: &S::Input, _out: &mut Outbox<S::Event>) -> Handled {
        Handled::Unknown
    }

    fn handle_event(&mut self, _event: &S::Event, _out: &mut Outbox<S::Event>) -> Handled {
        Handled::Unknown
    }
}

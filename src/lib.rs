//! Reactive UI composition for canvas applications.
//!
//! A single drawing surface is divided into a tree of rectangular regions.
//! Controllers turn raw platform input into typed *inputs*; regions and the
//! model turn those into typed application *events*. Both are queued and
//! delivered once per tick by the [`coordinator::Coordinator`], and the UI is
//! only redrawn when the model's state fingerprint changes. The hex-grid
//! [`map_editor`] is built on top as the reference application.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`hex`] | Axial, cube and pixel hex coordinates; nearest-hex rounding |
//! | [`geom`] | Points, sizes and rectangles |
//! | [`signal`] | Message and schema traits, handler outcomes, outbox |
//! | [`queue`] | Deferred FIFO shared between producers and the tick loop |
//! | [`registry`] | Kind → ordered listener registry |
//! | [`model`] | Model contract driven by the coordinator |
//! | [`widget`] | Region behavior, per-call context, handler tables |
//! | [`region`] | Region tree: layout, broadcast, bubbling, rendering |
//! | [`cache`] | Fingerprint-keyed render cache |
//! | [`surface`] | Drawing-surface traits and the headless display list |
//! | [`coordinator`] | Queues, registries and the tick phases |
//! | [`config`] | Application configuration |
//! | [`web`] | Browser canvas surface and mouse controller |
//! | [`map_editor`] | Hex-grid map editor |
//! | [`consts`] | Shared constants |

pub mod cache;
pub mod config;
pub mod consts;
pub mod coordinator;
pub mod geom;
pub mod hex;
pub mod map_editor;
pub mod model;
pub mod queue;
pub mod region;
pub mod registry;
pub mod signal;
pub mod surface;
pub mod web;
pub mod widget;

#[cfg(test)]
mod testkit;

//! Render cache keyed by model state fingerprints.
//!
//! The root region keeps the last fully drawn frame in a secondary buffer
//! together with the fingerprint of the model state it was drawn from. When
//! the next render sees the same fingerprint, the stored frame is blitted back
//! instead of walking the region tree again.

#[cfg(test)]
#[path = "cache_test.rs"]
mod cache_test;

use std::hash::{DefaultHasher, Hash, Hasher};

use tracing::debug;

use crate::surface::{Surface, SurfaceError};

/// Opaque digest of model state. Equal fingerprints mean nothing observable changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint(u64);

impl Fingerprint {
    /// Digest any hashable value.
    #[must_use]
    pub fn of<T: Hash + ?Sized>(value: &T) -> Self {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        Self(hasher.finish())
    }

    /// Wrap a precomputed digest (e.g. a version counter).
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// What a call to [`RenderCache::render`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    /// The surface was cleared and fully redrawn.
    Redrawn,
    /// The stored frame was blitted; nothing was redrawn.
    Reused,
}

/// Secondary frame buffer plus the fingerprint it was drawn from.
#[derive(Debug)]
pub struct RenderCache<B> {
    buffer: B,
    last: Option<Fingerprint>,
    redraws: u64,
    reuses: u64,
}

impl<B> RenderCache<B> {
    #[must_use]
    pub fn new(buffer: B) -> Self {
        Self { buffer, last: None, redraws: 0, reuses: 0 }
    }

    /// Fingerprint of the frame held in the buffer, if any.
    #[must_use]
    pub fn last_fingerprint(&self) -> Option<Fingerprint> {
        self.last
    }

    /// Force the next render to redraw, e.g. after the region tree changed shape.
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    #[must_use]
    pub fn redraws(&self) -> u64 {
        self.redraws
    }

    #[must_use]
    pub fn reuses(&self) -> u64 {
        self.reuses
    }

    /// Render one frame for `fingerprint`.
    ///
    /// On a hit the buffer is blitted onto `surface` and `draw` is not called.
    /// On a miss the surface is cleared, `draw` runs, and the result is copied
    /// into the buffer.
    ///
    /// # Errors
    ///
    /// Propagates backend failures from blitting, drawing or copying. A failed
    /// redraw leaves the cache invalidated so the next frame redraws again.
    pub fn render<S, F>(
        &mut self,
        fingerprint: Fingerprint,
        surface: &mut S,
        draw: F,
    ) -> Result<RenderOutcome, SurfaceError>
    where
        S: Surface<Buffer = B>,
        F: FnOnce(&mut S) -> Result<(), SurfaceError>,
    {
        if self.last == Some(fingerprint) {
            debug!(fingerprint = fingerprint.raw(), "no state change; reusing cached frame");
            surface.blit_from(&self.buffer)?;
            self.reuses += 1;
            return Ok(RenderOutcome::Reused);
        }

        debug!(fingerprint = fingerprint.raw(), "state changed; redrawing");
        self.last = None;
        let size = surface.size();
        surface.clear_rect(0.0, 0.0, size.width, size.height);
        draw(surface)?;
        surface.copy_into(&mut self.buffer)?;
        self.last = Some(fingerprint);
        self.redraws += 1;
        Ok(RenderOutcome::Redrawn)
    }
}

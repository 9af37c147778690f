//! Coalescing of repagination requests.
//!
//! Layout changes arrive faster than pagination is worth running. Requests
//! overwrite each other and only the newest one is applied, on the next
//! frame, and only if it differs from what was last applied.

use egui::Vec2;

#[derive(Debug, Clone, Default)]
pub struct ReflowQueue {
    pending: Option<Vec2>,
    applied: Option<Vec2>,
}

impl ReflowQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&mut self, viewport: Vec2) {
        self.pending = Some(viewport);
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// The newest pending viewport, unless it matches the last applied one.
    pub fn take(&mut self) -> Option<Vec2> {
        let viewport = self.pending.take()?;
        if self.applied == Some(viewport) {
            return None;
        }
        self.applied = Some(viewport);
        Some(viewport)
    }

    pub fn last_applied(&self) -> Option<Vec2> {
        self.applied
    }

    /// Forces the next request to be applied even if the size is unchanged.
    pub fn invalidate(&mut self) {
        self.applied = None;
    }
}

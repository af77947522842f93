//! View state shared with the rendering layer

use crate::breakpoints::{BreakpointChange, BreakpointSet, Layout};
use crate::refresh::Snapshot;
use crate::scroll::ScrollState;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::watch;
use tracing::debug;

/// Everything the rendering layer needs. Each slice is replaced whole.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ViewState {
    pub snapshot: Snapshot,
    pub breakpoints: BreakpointSet,
    pub scroll: ScrollState,
}

impl ViewState {
    pub fn loading(&self) -> bool {
        self.snapshot.loading
    }

    pub fn error(&self) -> bool {
        self.snapshot.error
    }

    /// True while the data panels should show skeletons
    pub fn is_placeholder(&self) -> bool {
        self.loading() || self.error()
    }

    pub fn layout(&self) -> Layout {
        self.breakpoints.layout()
    }

    pub fn header_opacity(&self) -> f64 {
        self.scroll.header_opacity(&self.layout())
    }

    pub fn corner_radius(&self) -> f64 {
        self.scroll.corner_radius()
    }
}

/// Single writer of the [`ViewState`]; readers subscribe to a watch channel.
///
/// Once closed, every further update is dropped.
#[derive(Debug)]
pub struct ViewStore {
    sender: watch::Sender<ViewState>,
    alive: AtomicBool,
}

impl Default for ViewStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewStore {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(ViewState::default());
        Self {
            sender,
            alive: AtomicBool::new(true),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.sender.subscribe()
    }

    pub fn current(&self) -> ViewState {
        self.sender.borrow().clone()
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    /// Stop accepting updates. Runs under the channel's write lock, so an
    /// update racing with it lands either entirely before or not at all.
    pub fn close(&self) {
        self.sender.send_if_modified(|_| {
            self.alive.store(false, Ordering::Release);
            false
        });
    }

    /// Replace the data snapshot; returns false if the store was closed
    pub fn publish_snapshot(&self, snapshot: Snapshot) -> bool {
        let published = self.sender.send_if_modified(|state| {
            if !self.is_alive() {
                return false;
            }
            state.snapshot = snapshot;
            true
        });

        if !published {
            debug!("View store closed, discarding late snapshot");
        }
        published
    }

    /// Recompute breakpoints for `viewport_width`, touching the state only
    /// when at least one breakpoint flipped
    pub fn recompute_breakpoints(&self, viewport_width: u32) -> Vec<BreakpointChange> {
        let mut changes = Vec::new();
        self.sender.send_if_modified(|state| {
            if !self.is_alive() {
                return false;
            }
            changes = state.breakpoints.recompute(viewport_width);
            !changes.is_empty()
        });

        if !changes.is_empty() {
            debug!("Viewport {}px flipped {} breakpoints", viewport_width, changes.len());
        }
        changes
    }

    pub fn set_scroll_offset(&self, offset: f64) {
        self.sender.send_if_modified(|state| {
            if !self.is_alive() || state.scroll.offset() == offset {
                return false;
            }
            state.scroll = ScrollState::new(offset);
            true
        });
    }
}

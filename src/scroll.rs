//! Scroll offset of the content pane and the cosmetics derived from it

use crate::breakpoints::Layout;
use serde::Serialize;

/// Height of the header band the panel scrolls over
const HEADER_HEIGHT: f64 = 256.0;
const MAX_CORNER_RADIUS: f64 = 32.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct ScrollState {
    offset: f64,
}

impl ScrollState {
    pub fn new(offset: f64) -> Self {
        Self { offset }
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Headline opacity in [0, 1]; fades out over the layout's fade distance
    pub fn header_opacity(&self, layout: &Layout) -> f64 {
        (1.0 - self.offset / layout.header_fade_distance).clamp(0.0, 1.0)
    }

    /// Top corner radius of the panel in pixels
    pub fn corner_radius(&self) -> f64 {
        ((1.0 - self.offset / HEADER_HEIGHT) * MAX_CORNER_RADIUS).clamp(0.0, MAX_CORNER_RADIUS)
    }
}

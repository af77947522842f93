//! Viewport breakpoints and the layout density they select

use serde::Serialize;

/// A fixed viewport width threshold. Satisfied when the viewport is strictly wider.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Breakpoint {
    Above352,
    Above448,
    Above752,
    Above960,
}

impl Breakpoint {
    pub const ALL: [Breakpoint; 4] = [
        Breakpoint::Above352,
        Breakpoint::Above448,
        Breakpoint::Above752,
        Breakpoint::Above960,
    ];

    pub fn threshold(&self) -> u32 {
        match self {
            Breakpoint::Above352 => 352,
            Breakpoint::Above448 => 448,
            Breakpoint::Above752 => 752,
            Breakpoint::Above960 => 960,
        }
    }

    pub fn is_satisfied_by(&self, viewport_width: u32) -> bool {
        viewport_width > self.threshold()
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

/// A breakpoint whose value flipped during a recompute
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BreakpointChange {
    pub breakpoint: Breakpoint,
    pub satisfied: bool,
}

/// The breakpoints currently satisfied
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BreakpointSet {
    flags: [bool; 4],
}

impl BreakpointSet {
    pub fn for_width(viewport_width: u32) -> Self {
        let mut set = BreakpointSet::default();
        set.recompute(viewport_width);
        set
    }

    pub fn contains(&self, breakpoint: Breakpoint) -> bool {
        self.flags[breakpoint.index()]
    }

    pub fn satisfied(&self) -> impl Iterator<Item = Breakpoint> + '_ {
        Breakpoint::ALL.into_iter().filter(|bp| self.contains(*bp))
    }

    /// Breakpoints that would flip for `viewport_width`, without applying them
    pub fn changes_for(&self, viewport_width: u32) -> Vec<BreakpointChange> {
        Breakpoint::ALL
            .into_iter()
            .filter_map(|breakpoint| {
                let satisfied = breakpoint.is_satisfied_by(viewport_width);
                (satisfied != self.contains(breakpoint)).then_some(BreakpointChange {
                    breakpoint,
                    satisfied,
                })
            })
            .collect()
    }

    pub fn apply(&mut self, changes: &[BreakpointChange]) {
        for change in changes {
            self.flags[change.breakpoint.index()] = change.satisfied;
        }
    }

    /// Update only the breakpoints whose value changed and return them
    pub fn recompute(&mut self, viewport_width: u32) -> Vec<BreakpointChange> {
        let changes = self.changes_for(viewport_width);
        self.apply(&changes);
        changes
    }

    pub fn layout(&self) -> Layout {
        Layout::from(*self)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeadingSize {
    Large,
    Medium,
    Small,
}

/// Layout density selected by the current breakpoints
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Layout {
    pub headline: HeadingSize,
    /// Percentages are drawn at full size on wide and on narrow (stacked) layouts
    pub large_percentages: bool,
    pub percentage_columns: usize,
    pub strip_columns: usize,
    pub compact_labels: bool,
    /// Scroll distance over which the headline fades out
    pub header_fade_distance: f64,
}

impl From<BreakpointSet> for Layout {
    fn from(set: BreakpointSet) -> Self {
        let wide = set.contains(Breakpoint::Above752);

        let headline = if wide {
            HeadingSize::Large
        } else if set.contains(Breakpoint::Above448) {
            HeadingSize::Medium
        } else {
            HeadingSize::Small
        };

        Self {
            headline,
            large_percentages: set.contains(Breakpoint::Above960) || !wide,
            percentage_columns: if wide { 3 } else { 1 },
            strip_columns: if wide { 30 } else { 15 },
            compact_labels: !set.contains(Breakpoint::Above352),
            header_fade_distance: if wide { 64.0 } else { 96.0 },
        }
    }
}

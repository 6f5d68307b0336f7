// src/responsive.rs

/// Terminal width, in cells, from which the full table is shown.
pub const DEFAULT_BREAKPOINT: u16 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Breakpoint {
    pub min_width: u16,
}

impl Default for Breakpoint {
    fn default() -> Self {
        Breakpoint {
            min_width: DEFAULT_BREAKPOINT,
        }
    }
}

impl Breakpoint {
    pub fn new(min_width: u16) -> Self {
        Breakpoint { min_width }
    }

    pub fn is_desktop(&self, width: u16) -> bool {
        width >= self.min_width
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutMode {
    Table,
    Cards,
}

impl LayoutMode {
    pub fn for_width(breakpoint: Breakpoint, width: u16, has_card: bool) -> Self {
        if !has_card || breakpoint.is_desktop(width) {
            LayoutMode::Table
        } else {
            LayoutMode::Cards
        }
    }
}

//! Icons used by the components.

use crate::render::{Element, RenderNode};

/// A 16px glyph from the component icon set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Icon {
    /// Left-pointing chevron (previous).
    ChevronLeft16,
    /// Right-pointing chevron (next).
    ChevronRight16,
    /// Downward chevron (disclosure affordance).
    ChevronDown16,
}

impl Icon {
    /// The icon's identifier.
    pub fn name(self) -> &'static str {
        match self {
            Self::ChevronLeft16 => "chevron--left",
            Self::ChevronRight16 => "chevron--right",
            Self::ChevronDown16 => "chevron--down",
        }
    }

    /// Edge length in pixels.
    pub fn size(self) -> u32 {
        16
    }

    /// Render as an `svg` leaf, optionally assigned to a slot.
    pub fn render(self, slot: Option<&str>) -> RenderNode {
        let size = self.size().to_string();
        let mut svg = Element::new("svg")
            .attr("data-icon", self.name())
            .attr("width", size.clone())
            .attr("height", size)
            .attr("aria-hidden", "true");
        if let Some(slot) = slot {
            svg = svg.attr("slot", slot);
        }
        svg.into()
    }
}

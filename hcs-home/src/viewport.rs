//! Game row scroll target
//!
//! Maps the selected game index to the horizontal offset that centres that
//! tile in the viewport. Easing toward the target belongs to the renderer.

use crate::navigation::Section;

/// Tile row geometry in renderer units (pixels, terminal columns, ...)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileGeometry {
    pub tile_width: f64,
    pub tile_gap: f64,
}

/// Offset that centres tile `selected_game_index`.
///
/// Returns `None` without computing anything when the dock is focused; the
/// viewport keeps its last position in that case. Offsets never go below 0.
pub fn compute_scroll_offset(
    selected_game_index: usize,
    focused_section: Section,
    viewport_width: f64,
    tile_width: f64,
    tile_gap: f64,
) -> Option<f64> {
    if focused_section != Section::Games {
        return None;
    }
    let tile_start = selected_game_index as f64 * (tile_width + tile_gap);
    let offset = tile_start - viewport_width / 2.0 + tile_width / 2.0;
    Some(offset.max(0.0))
}

/// Holds the last computed target so it survives while the dock has focus
#[derive(Debug, Clone)]
pub struct ViewportSync {
    geometry: TileGeometry,
    viewport_width: f64,
    target: f64,
}

impl ViewportSync {
    pub fn new(geometry: TileGeometry, viewport_width: f64) -> Self {
        Self {
            geometry,
            viewport_width,
            target: 0.0,
        }
    }

    /// Recompute after the game selection (or focus) changed.
    ///
    /// Returns the new target when one was computed.
    pub fn sync(&mut self, selected_game_index: usize, focused_section: Section) -> Option<f64> {
        let offset = compute_scroll_offset(
            selected_game_index,
            focused_section,
            self.viewport_width,
            self.geometry.tile_width,
            self.geometry.tile_gap,
        )?;
        self.target = offset;
        Some(offset)
    }

    /// The renderer resized; geometry stays, width changes
    pub fn set_viewport_width(&mut self, viewport_width: f64) {
        self.viewport_width = viewport_width;
    }

    pub fn target(&self) -> f64 {
        self.target
    }
}

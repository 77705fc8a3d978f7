//! Icon coordinate conversion and grid placement.
//!
//! Percentages of the desktop size are the canonical (persisted) icon coordinates; pixel values are
//! derived from them whenever the desktop size changes.

use serde::{Deserialize, Serialize};

use crate::config::GridSize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// Icon position in both coordinate systems.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct IconPosition {
    pub left_px: f64,
    pub top_px: f64,
    pub left_percent: f64,
    pub top_percent: f64,
}

impl IconPosition {
    pub fn percent(&self) -> PercentPosition {
        PercentPosition {
            left_percent: self.left_percent,
            top_percent: self.top_percent,
        }
    }
}

/// Stored form of an icon position.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PercentPosition {
    pub left_percent: f64,
    pub top_percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapOutcome {
    /// The icon landed on a free cell.
    Placed,
    /// Every cell was occupied; the icon stays on its rounded candidate cell.
    DesktopFull,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapped {
    pub position: IconPosition,
    pub outcome: SnapOutcome,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionHelper {
    grid: GridSize,
    explorer_gap_multiplier: f64,
    desktop_width: f64,
    desktop_height: f64,
}

impl PositionHelper {
    pub fn new(
        grid: GridSize,
        explorer_gap_multiplier: f64,
        desktop_width: f64,
        desktop_height: f64,
    ) -> Self {
        Self {
            grid,
            explorer_gap_multiplier,
            desktop_width,
            desktop_height,
        }
    }

    pub fn grid(&self) -> GridSize {
        self.grid
    }

    pub fn desktop_size(&self) -> (f64, f64) {
        (self.desktop_width, self.desktop_height)
    }

    pub fn set_desktop_size(&mut self, width: f64, height: f64) {
        self.desktop_width = width;
        self.desktop_height = height;
    }

    /// Converts between pixels and percent of the desktop dimension along `axis`.
    ///
    /// A zero-sized desktop converts everything to `0`.
    pub fn convert(&self, value: f64, axis: Axis, to_percent: bool) -> f64 {
        let size = match axis {
            Axis::X => self.desktop_width,
            Axis::Y => self.desktop_height,
        };
        if size <= 0.0 {
            return 0.0;
        }
        if to_percent {
            value / size * 100.0
        } else {
            value / 100.0 * size
        }
    }

    /// Builds a position from pixels, deriving the percentages.
    pub fn from_pixels(&self, left_px: f64, top_px: f64) -> IconPosition {
        IconPosition {
            left_px,
            top_px,
            left_percent: self.convert(left_px, Axis::X, true),
            top_percent: self.convert(top_px, Axis::Y, true),
        }
    }

    /// Builds a position from stored percentages, deriving pixels for the current desktop size.
    pub fn from_percent(&self, percent: PercentPosition) -> IconPosition {
        IconPosition {
            left_px: self.convert(percent.left_percent, Axis::X, false),
            top_px: self.convert(percent.top_percent, Axis::Y, false),
            left_percent: percent.left_percent,
            top_percent: percent.top_percent,
        }
    }

    /// Moves an icon at pixel `(x, y)` onto the nearest free grid cell.
    ///
    /// `others` are the pixel positions of every other icon. A cell counts as occupied when an
    /// icon sits within half an icon size of it on both axes. Occupied cells are skipped down the
    /// column, then across to the next column.
    pub fn snap(&self, x: f64, y: f64, others: &[(f64, f64)]) -> Snapped {
        let GridSize { width, height, gap } = self.grid;
        let cell_w = width + gap;
        let cell_h = height + gap;
        let mut col = ((x - gap) / cell_w).round().max(0.0);
        let mut row = ((y - gap) / cell_h).round().max(0.0);
        let candidate = (gap + col * cell_w, gap + row * cell_h);

        if cell_w <= 0.0 || cell_h <= 0.0 {
            return Snapped {
                position: self.from_pixels(candidate.0, candidate.1),
                outcome: SnapOutcome::Placed,
            };
        }

        let occupied = |left: f64, top: f64| {
            others
                .iter()
                .any(|&(l, t)| (l - left).abs() < width * 0.5 && (t - top).abs() < height * 0.5)
        };

        let (mut left, mut top) = candidate;
        let mut outcome = SnapOutcome::Placed;
        while occupied(left, top) {
            row += 1.0;
            top = gap + row * cell_h;
            if top + height > self.desktop_height {
                row = 0.0;
                col += 1.0;
                left = gap + col * cell_w;
                top = gap;
                if left + width > self.desktop_width {
                    outcome = SnapOutcome::DesktopFull;
                    (left, top) = candidate;
                    break;
                }
            }
        }

        Snapped {
            position: self.from_pixels(left, top),
            outcome,
        }
    }

    /// Places `count` icons column by column, top to bottom.
    ///
    /// Explorer views use a wider gap.
    pub fn layout(&self, count: usize, explorer: bool) -> Vec<IconPosition> {
        let gap = if explorer {
            self.grid.gap * self.explorer_gap_multiplier
        } else {
            self.grid.gap
        };
        let cell_w = self.grid.width + gap;
        let cell_h = self.grid.height + gap;
        let max_rows = (((self.desktop_height - gap) / cell_h).floor()).max(1.0) as usize;

        (0..count)
            .map(|index| {
                let col = (index / max_rows) as f64;
                let row = (index % max_rows) as f64;
                self.from_pixels(gap + col * cell_w, gap + row * cell_h)
            })
            .collect()
    }
}

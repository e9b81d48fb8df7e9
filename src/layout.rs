//! Print-sheet layout.
//!
//! Places fixed-size proxy cards on landscape letter pages. All measurements
//! are in inches and positions are measured from the top-left corner of the
//! page; the PDF writer converts to its own bottom-left coordinate system.
//!
//! The number of cards per row and column is the number of whole cards that
//! fit in the space between the margins. The gap is not part of that count;
//! the grid (cards plus gaps) is then centered in the available area, so when
//! gaps make the grid wider than the available area it extends evenly into
//! both margins. A grid that would reach past the edge of the paper is
//! rejected.
//!
//! # Example
//!
//! ```rust
//! use tcg_companion::layout::{LayoutParams, PageLayout};
//!
//! let params = LayoutParams::default().margins(0.5).gap(0.1);
//! let layout = PageLayout::compute(&params, 20).unwrap();
//! assert_eq!((layout.cards_per_row, layout.cards_per_column), (4, 2));
//! assert_eq!(layout.total_pages, 3);
//! ```

use serde::{Deserialize, Serialize};

use crate::config;
use crate::error::{CompanionError, Result};

// ---------------------------------------------------------------------------
// LayoutParams
// ---------------------------------------------------------------------------

/// Paper, card, margin and gap dimensions in inches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutParams {
    pub paper_width: f64,
    pub paper_height: f64,
    pub card_width: f64,
    pub card_height: f64,
    pub margin_top: f64,
    pub margin_right: f64,
    pub margin_bottom: f64,
    pub margin_left: f64,
    pub gap: f64,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            paper_width: config::PAPER_WIDTH_IN,
            paper_height: config::PAPER_HEIGHT_IN,
            card_width: config::CARD_WIDTH_IN,
            card_height: config::CARD_HEIGHT_IN,
            margin_top: config::DEFAULT_MARGIN_IN,
            margin_right: config::DEFAULT_MARGIN_IN,
            margin_bottom: config::DEFAULT_MARGIN_IN,
            margin_left: config::DEFAULT_MARGIN_IN,
            gap: config::DEFAULT_GAP_IN,
        }
    }
}

impl LayoutParams {
    /// Set all four margins to the same value.
    pub fn margins(mut self, margin: f64) -> Self {
        self.margin_top = margin;
        self.margin_right = margin;
        self.margin_bottom = margin;
        self.margin_left = margin;
        self
    }

    pub fn margin_each(mut self, top: f64, right: f64, bottom: f64, left: f64) -> Self {
        self.margin_top = top;
        self.margin_right = right;
        self.margin_bottom = bottom;
        self.margin_left = left;
        self
    }

    pub fn gap(mut self, gap: f64) -> Self {
        self.gap = gap;
        self
    }

    fn available_width(&self) -> f64 {
        self.paper_width - self.margin_left - self.margin_right
    }

    fn available_height(&self) -> f64 {
        self.paper_height - self.margin_top - self.margin_bottom
    }

    fn validate(&self) -> Result<()> {
        let all = [
            ("paper_width", self.paper_width),
            ("paper_height", self.paper_height),
            ("card_width", self.card_width),
            ("card_height", self.card_height),
            ("margin_top", self.margin_top),
            ("margin_right", self.margin_right),
            ("margin_bottom", self.margin_bottom),
            ("margin_left", self.margin_left),
            ("gap", self.gap),
        ];
        for (name, value) in all {
            if !value.is_finite() || value < 0.0 {
                return Err(CompanionError::InvalidArgument(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        if self.card_width == 0.0 || self.card_height == 0.0 {
            return Err(CompanionError::InvalidArgument(
                "Card dimensions must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// PageLayout
// ---------------------------------------------------------------------------

/// Grid geometry derived from [`LayoutParams`] and an item count.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageLayout {
    pub params: LayoutParams,
    pub total_items: usize,
    pub cards_per_row: usize,
    pub cards_per_column: usize,
    pub per_page: usize,
    pub total_pages: usize,
    /// Horizontal centering offset added to both the left and right margins.
    pub offset_x: f64,
    /// Vertical centering offset added to both the top and bottom margins.
    pub offset_y: f64,
}

impl PageLayout {
    /// Compute the grid for `total_items` cards.
    ///
    /// Fails if a dimension is negative, the margins leave no room for a
    /// single card, the card is too small to tile sensibly, or the gaps push
    /// the grid past the edge of the paper.
    pub fn compute(params: &LayoutParams, total_items: usize) -> Result<Self> {
        params.validate()?;

        let avail_w = params.available_width();
        let avail_h = params.available_height();
        let cards_per_row = fit_count(avail_w, params.card_width);
        let cards_per_column = fit_count(avail_h, params.card_height);

        if cards_per_row == 0 || cards_per_column == 0 {
            return Err(CompanionError::InvalidArgument(format!(
                "Margins leave {:.2}in x {:.2}in, which cannot fit a {}in x {}in card",
                avail_w.max(0.0),
                avail_h.max(0.0),
                params.card_width,
                params.card_height
            )));
        }

        if cards_per_row > MAX_CARDS_PER_AXIS || cards_per_column > MAX_CARDS_PER_AXIS {
            return Err(CompanionError::InvalidArgument(format!(
                "A {}in x {}in card is too small: more than {} cards per row or column",
                params.card_width, params.card_height, MAX_CARDS_PER_AXIS
            )));
        }
        let per_page = cards_per_row.checked_mul(cards_per_column).ok_or_else(|| {
            CompanionError::InvalidArgument("Too many cards per page".to_string())
        })?;
        let total_pages = total_items.div_ceil(per_page);

        let grid_w = span(cards_per_row, params.card_width, params.gap);
        let grid_h = span(cards_per_column, params.card_height, params.gap);

        let layout = Self {
            params: *params,
            total_items,
            cards_per_row,
            cards_per_column,
            per_page,
            total_pages,
            offset_x: (avail_w - grid_w) / 2.0,
            offset_y: (avail_h - grid_h) / 2.0,
        };

        let edges = [
            layout.effective_margin_left(),
            layout.effective_margin_right(),
            layout.effective_margin_top(),
            layout.effective_margin_bottom(),
        ];
        if edges.iter().any(|&edge| edge < -FIT_EPSILON) {
            return Err(CompanionError::InvalidArgument(format!(
                "A {}in gap pushes the {} x {} grid ({:.2}in x {:.2}in) past the edge of the paper",
                params.gap, cards_per_row, cards_per_column, grid_w, grid_h
            )));
        }
        Ok(layout)
    }

    pub fn effective_margin_left(&self) -> f64 {
        self.params.margin_left + self.offset_x
    }

    pub fn effective_margin_right(&self) -> f64 {
        self.params.margin_right + self.offset_x
    }

    pub fn effective_margin_top(&self) -> f64 {
        self.params.margin_top + self.offset_y
    }

    pub fn effective_margin_bottom(&self) -> f64 {
        self.params.margin_bottom + self.offset_y
    }

    /// Placement of the item at `index`, or `None` past the end.
    pub fn placement(&self, index: usize) -> Option<CardPlacement> {
        if index >= self.total_items {
            return None;
        }
        let page = index / self.per_page;
        let slot = index % self.per_page;
        let row = slot / self.cards_per_row;
        let column = slot % self.cards_per_row;
        let p = &self.params;
        Some(CardPlacement {
            index,
            page,
            row,
            column,
            x: self.effective_margin_left() + column as f64 * (p.card_width + p.gap),
            y: self.effective_margin_top() + row as f64 * (p.card_height + p.gap),
            width: p.card_width,
            height: p.card_height,
        })
    }

    /// All placements, row-major, page by page.
    pub fn placements(&self) -> Vec<CardPlacement> {
        (0..self.total_items)
            .filter_map(|i| self.placement(i))
            .collect()
    }

    /// Number of cards on `page` (zero-based).
    pub fn cards_on_page(&self, page: usize) -> usize {
        if page >= self.total_pages {
            return 0;
        }
        let start = page * self.per_page;
        (self.total_items - start).min(self.per_page)
    }

    /// Index range of the items printed on `page`.
    pub fn page_range(&self, page: usize) -> std::ops::Range<usize> {
        let start = (page * self.per_page).min(self.total_items);
        start..start + self.cards_on_page(page)
    }
}

/// Position of one physical card on a page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CardPlacement {
    pub index: usize,
    pub page: usize,
    pub row: usize,
    pub column: usize,
    /// Distance from the left edge of the page.
    pub x: f64,
    /// Distance from the top edge of the page.
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

// Small tolerance so that e.g. 7.5 / 2.5 is not rounded down to 2.
const FIT_EPSILON: f64 = 1e-9;

/// Upper bound on cards per row or column.
const MAX_CARDS_PER_AXIS: usize = 1000;

fn fit_count(available: f64, size: f64) -> usize {
    if available <= 0.0 {
        return 0;
    }
    ((available + FIT_EPSILON) / size).floor() as usize
}

fn span(count: usize, size: f64, gap: f64) -> f64 {
    if count == 0 {
        return 0.0;
    }
    count as f64 * size + (count - 1) as f64 * gap
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_count_tolerates_float_error() {
        assert_eq!(fit_count(10.0, 2.5), 4);
        assert_eq!(fit_count(0.1 + 0.2 + 6.7, 3.5), 2);
        assert_eq!(fit_count(-1.0, 2.5), 0);
        assert_eq!(fit_count(2.49, 2.5), 0);
    }

    #[test]
    fn span_includes_gaps_between_cards_only() {
        assert_eq!(span(0, 2.5, 0.1), 0.0);
        assert_eq!(span(1, 2.5, 0.1), 2.5);
        assert!((span(4, 2.5, 0.1) - 10.3).abs() < 1e-9);
    }
}

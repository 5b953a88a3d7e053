//=========================================================================
// Queue Layout
//=========================================================================
//
// Pure layout rules for a transfer queue's items.
//
// The `k = min(n, display_cap)` most recent items are spread linearly
// across the width budget; older items collapse into a near-coincident
// pile with a small per-item depth offset. Spread and depth directions
// follow the queue's anchor corner.
//
// ```text
//   TopLeft:      [0][20][40] ──>        TopRight:   <── [-40][-20][0]
//   depth: +x +y                         depth: -x +y
//   BottomLeft:   depth: +x -y           BottomRight: depth: -x -y
// ```
//
//=========================================================================

use crate::core::geometry::{Point, Size};

//=== Anchor ==============================================================

/// Screen corner a queue is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Anchor {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Anchor {
    /// Horizontal direction items spread in (+1 rightwards, -1 leftwards).
    pub fn spread_sign(self) -> f32 {
        match self {
            Anchor::TopLeft | Anchor::BottomLeft => 1.0,
            Anchor::TopRight | Anchor::BottomRight => -1.0,
        }
    }

    /// Vertical direction of the depth offset (+1 downwards, -1 upwards).
    pub fn depth_sign_y(self) -> f32 {
        match self {
            Anchor::TopLeft | Anchor::TopRight => 1.0,
            Anchor::BottomLeft | Anchor::BottomRight => -1.0,
        }
    }
}

//=== LayoutParams ========================================================

/// Fixed layout constants of a queue.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutParams {
    /// Size of one item.
    pub item_size: Size,
    /// Upper bound on the spacing between spread items.
    pub max_item_offset: f32,
    /// How many of the most recent items are spread out.
    pub display_cap: usize,
    /// Per-item offset used for the collapsed pile.
    pub depth_offset: f32,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            item_size: Size::new(70.0, 98.0),
            max_item_offset: 20.0,
            display_cap: 20,
            depth_offset: 1.0,
        }
    }
}

//=== Layout Functions ====================================================

/// Number of items that get spread out for a queue of `len` items.
pub fn visible_count(params: &LayoutParams, len: usize) -> usize {
    len.min(params.display_cap)
}

/// Spacing between spread items.
///
/// `min(max_item_offset, (width_budget - item_width) / max(1, k - 1))`,
/// floored at zero so a budget narrower than one item stacks rather than
/// reverses.
pub fn spread_offset(params: &LayoutParams, width_budget: f32, visible: usize) -> f32 {
    let gaps = visible.saturating_sub(1).max(1) as f32;
    let computed = (width_budget - params.item_size.width) / gaps;
    computed.min(params.max_item_offset).max(0.0)
}

/// Local position of item `index` in a queue holding `len` items.
pub fn slot_position(
    anchor: Anchor,
    params: &LayoutParams,
    width_budget: f32,
    len: usize,
    index: usize,
) -> Point {
    debug_assert!(index < len, "slot {} out of range for {} items", index, len);

    let visible = visible_count(params, len);
    let hidden = len - visible;

    if index < hidden {
        let depth = (hidden - 1 - index) as f32 * params.depth_offset;
        Point::new(depth * anchor.spread_sign(), depth * anchor.depth_sign_y())
    } else {
        let offset = spread_offset(params, width_budget, visible);
        let slot = (index - hidden) as f32;
        Point::new(slot * offset * anchor.spread_sign(), 0.0)
    }
}

//=== Tests ===============================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn positions(anchor: Anchor, params: &LayoutParams, width: f32, len: usize) -> Vec<Point> {
        (0..len)
            .map(|i| slot_position(anchor, params, width, len, i))
            .collect()
    }

    #[test]
    fn three_items_spread_at_capped_offset() {
        let params = LayoutParams::default();
        assert_eq!(spread_offset(&params, 200.0, 3), 20.0);

        let xs: Vec<f32> = positions(Anchor::TopLeft, &params, 200.0, 3)
            .iter()
            .map(|p| p.x)
            .collect();
        assert_eq!(xs, vec![0.0, 20.0, 40.0]);
    }

    #[test]
    fn right_anchors_spread_leftwards() {
        let params = LayoutParams::default();
        let xs: Vec<f32> = positions(Anchor::BottomRight, &params, 200.0, 3)
            .iter()
            .map(|p| p.x)
            .collect();
        assert_eq!(xs, vec![0.0, -20.0, -40.0]);
    }

    #[test]
    fn narrow_budget_shrinks_offset() {
        let params = LayoutParams::default();
        // (100 - 70) / 9 = 3.33..
        let offset = spread_offset(&params, 100.0, 10);
        assert!((offset - 30.0 / 9.0).abs() < 1e-5);
    }

    #[test]
    fn budget_narrower_than_item_stacks_in_place() {
        let params = LayoutParams::default();
        assert_eq!(spread_offset(&params, 50.0, 5), 0.0);
    }

    #[test]
    fn single_item_sits_at_origin() {
        let params = LayoutParams::default();
        assert_eq!(
            slot_position(Anchor::TopRight, &params, 200.0, 1, 0),
            Point::ZERO
        );
    }

    #[test]
    fn hidden_items_collapse_with_depth_offset() {
        let params = LayoutParams::default();
        let pts = positions(Anchor::BottomLeft, &params, 266.0, 23);

        // 3 hidden items: deepest has the largest offset
        assert_eq!(pts[0], Point::new(2.0, -2.0));
        assert_eq!(pts[1], Point::new(1.0, -1.0));
        assert_eq!(pts[2], Point::new(0.0, 0.0));
        // first visible item starts the spread
        assert_eq!(pts[3], Point::new(0.0, 0.0));
    }

    #[test]
    fn visible_items_fit_in_budget() {
        let params = LayoutParams::default();
        for width in [70.0_f32, 100.0, 266.0, 400.0, 1000.0] {
            for len in 1..60 {
                let visible = visible_count(&params, len);
                let offset = spread_offset(&params, width, visible);
                assert!(offset <= params.max_item_offset);

                let span = offset * (visible.saturating_sub(1)) as f32 + params.item_size.width;
                assert!(
                    span <= width + 1e-3,
                    "{} items overflow budget {} (span {})",
                    len,
                    width,
                    span
                );
            }
        }
    }
}

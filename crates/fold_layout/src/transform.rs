//! Fold transform
//!
//! Maps an item's tentative rect to the visual that produces the folding
//! card effect. The two edges are deliberately asymmetric:
//!
//! - the leading item shrinks with its scroll distance and is pulled right
//!   so it stays anchored near the leading boundary; it keeps full opacity
//! - a trailing item shrinks toward its own right edge, is pulled left so
//!   that edge stays pinned near the viewport boundary, and is dimmed to a
//!   fixed 0.6 regardless of how far it sticks out

use fold_core::{PixelRect, Point};

/// Scale floor, and the fold depth at one full item width of travel
pub const MIN_SCALE: f32 = 0.3;

/// Opacity of an item folding at the trailing edge
pub const TRAILING_OPACITY: f32 = 0.6;

/// Point an item scales around
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum TransformAnchor {
    /// The item's own centre
    #[default]
    Center,
    /// A point relative to the item's top-left corner
    Local(Point),
}

/// Which fold, if any, applies to an item
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FoldEdge {
    /// Fully inside the viewport
    #[default]
    None,
    /// First visible item sliding past the leading padding
    Leading,
    /// Item reaching past the viewport's right edge
    Trailing,
}

/// Visual presentation of one laid-out item
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FoldVisual {
    /// Placement rect after the fold correction
    pub rect: PixelRect,
    pub scale: f32,
    pub opacity: f32,
    pub anchor: TransformAnchor,
    pub edge: FoldEdge,
}

impl FoldVisual {
    /// Pivot in viewport coordinates
    pub fn pivot(&self) -> Point {
        let bounds = self.rect.to_rect();
        match self.anchor {
            TransformAnchor::Center => bounds.center(),
            TransformAnchor::Local(local) => {
                Point::new(bounds.origin.x + local.x, bounds.origin.y + local.y)
            }
        }
    }
}

/// Everything the fold needs to know about one item
#[derive(Clone, Copy, Debug)]
pub struct FoldInput {
    pub index: usize,
    pub first_visible_index: usize,
    /// Tentative rect at the draw cursor
    pub rect: PixelRect,
    /// Measured content size without margins, for the trailing anchor
    pub content_width: i32,
    pub content_height: i32,
    pub item_width: i32,
    pub item_spacing: i32,
    pub leading_padding: i32,
    pub viewport_width: i32,
}

/// Compute the fold for one item
pub fn fold(input: &FoldInput) -> FoldVisual {
    let rect = input.rect;
    let width = input.item_width.max(1) as f32;

    if input.index == input.first_visible_index && rect.left < input.leading_padding {
        let fold = MIN_SCALE * (rect.left - input.leading_padding).abs() as f32 / width;
        let pull = (input.item_spacing / 2 + input.item_width / 2) as f32 * fold / MIN_SCALE;
        let left = (rect.left as f32 + pull) as i32;
        return FoldVisual {
            rect: rect.with_left(left),
            scale: (1.0 - fold).max(MIN_SCALE),
            opacity: 1.0,
            anchor: TransformAnchor::Center,
            edge: FoldEdge::Leading,
        };
    }

    if rect.right < input.viewport_width {
        return FoldVisual {
            rect,
            scale: 1.0,
            opacity: 1.0,
            anchor: TransformAnchor::Center,
            edge: FoldEdge::None,
        };
    }

    let overhang = (rect.right - input.viewport_width).abs();
    let fold = MIN_SCALE * overhang as f32 / width;
    FoldVisual {
        rect: rect.translate_x(-overhang),
        scale: (1.0 - fold).max(MIN_SCALE),
        opacity: TRAILING_OPACITY,
        anchor: TransformAnchor::Local(Point::new(
            input.content_width as f32,
            (input.content_height / 2) as f32,
        )),
        edge: FoldEdge::Trailing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(index: usize, left: i32) -> FoldInput {
        FoldInput {
            index,
            first_visible_index: 0,
            rect: PixelRect::from_origin_size(left, 0, 200, 300),
            content_width: 200,
            content_height: 300,
            item_width: 200,
            item_spacing: 40,
            leading_padding: 0,
            viewport_width: 800,
        }
    }

    #[test]
    fn test_inside_viewport_is_untouched() {
        let visual = fold(&input(1, 240));
        assert_eq!(visual.edge, FoldEdge::None);
        assert_eq!(visual.scale, 1.0);
        assert_eq!(visual.opacity, 1.0);
        assert_eq!(visual.rect, PixelRect::new(240, 0, 440, 300));
        assert_eq!(visual.pivot(), Point::new(340.0, 150.0));
    }

    #[test]
    fn test_leading_fold() {
        // 151px past the leading padding: fold = 0.3 * 151 / 200 = 0.2265
        let visual = fold(&input(0, -151));
        assert_eq!(visual.edge, FoldEdge::Leading);
        assert!((visual.scale - 0.7735).abs() < 1e-5);
        // pulled right by (20 + 100) * 0.2265 / 0.3 = 90.6, truncated
        assert_eq!(visual.rect.left, -60);
        assert_eq!(visual.rect.width(), 200);
        assert_eq!(visual.opacity, 1.0);
        assert_eq!(visual.anchor, TransformAnchor::Center);
    }

    #[test]
    fn test_leading_fold_only_for_first_visible() {
        let mut item = input(3, -10);
        item.first_visible_index = 2;
        assert_ne!(fold(&item).edge, FoldEdge::Leading);
    }

    #[test]
    fn test_trailing_fold() {
        // right edge at 920: 120px past the viewport
        let visual = fold(&input(3, 720));
        assert_eq!(visual.edge, FoldEdge::Trailing);
        assert!((visual.scale - 0.82).abs() < 1e-6);
        assert_eq!(visual.rect, PixelRect::new(600, 0, 800, 300));
        assert_eq!(visual.opacity, TRAILING_OPACITY);
        assert_eq!(
            visual.anchor,
            TransformAnchor::Local(Point::new(200.0, 150.0))
        );
        // pinned to the viewport's right edge
        assert_eq!(visual.pivot(), Point::new(800.0, 150.0));
    }

    #[test]
    fn test_trailing_opacity_is_fixed() {
        let barely = fold(&input(3, 601));
        let far = fold(&input(3, 790));
        assert_eq!(barely.opacity, far.opacity);
        assert!(barely.scale > far.scale);
    }

    #[test]
    fn test_scale_never_below_floor() {
        let mut item = input(0, -2000);
        item.item_width = 200;
        assert_eq!(fold(&item).scale, MIN_SCALE);
    }
}

//! Persistent scroll and layout state
//!
//! `GeometryState` is a plain `Copy` value. A fill pass takes one state
//! value and returns the next; the carousel commits it only when the pass
//! succeeds, which is what makes an aborted pass leave no trace.

use fold_core::EdgeInsets;

/// Host viewport geometry, read once per pass
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Viewport {
    /// Full width of the carousel container
    pub width: i32,
    /// Full height of the carousel container
    pub height: i32,
    /// Container padding
    pub padding: EdgeInsets,
}

impl Viewport {
    pub const fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            padding: EdgeInsets::ZERO,
        }
    }

    /// Set the container padding (builder pattern)
    pub const fn with_padding(mut self, padding: EdgeInsets) -> Self {
        self.padding = padding;
        self
    }

    /// Padding on the edge items scroll away from
    pub const fn leading_padding(&self) -> i32 {
        self.padding.left
    }

    /// Padding on the edge items scroll in from
    pub const fn trailing_padding(&self) -> i32 {
        self.padding.right
    }

    /// Width available to content
    pub const fn horizontal_space(&self) -> i32 {
        self.width - self.padding.horizontal()
    }

    /// Height available to content
    pub const fn vertical_space(&self) -> i32 {
        self.height - self.padding.vertical()
    }
}

/// Scroll offset, measured width and visible window of the carousel
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeometryState {
    pub(crate) item_width: Option<i32>,
    /// Set when the next pass must re-measure even though a width is known
    pub(crate) measurement_stale: bool,
    pub(crate) item_spacing: i32,
    pub(crate) horizontal_offset: i64,
    pub(crate) first_visible_index: Option<usize>,
    pub(crate) last_visible_index: Option<usize>,
    pub(crate) sub_cell_fraction: f32,
    pub(crate) pending_index: Option<usize>,
}

impl GeometryState {
    /// Fresh state with the spacing resolved to pixels
    pub fn new(item_spacing: i32) -> Self {
        Self {
            item_width: None,
            measurement_stale: false,
            item_spacing,
            horizontal_offset: 0,
            first_visible_index: None,
            last_visible_index: None,
            sub_cell_fraction: 0.0,
            pending_index: None,
        }
    }

    /// Measured item width including horizontal margins
    pub fn item_width(&self) -> Option<i32> {
        self.item_width
    }

    pub fn item_spacing(&self) -> i32 {
        self.item_spacing
    }

    /// Item width plus spacing; `None` until an item has been measured
    pub fn cell_stride(&self) -> Option<i32> {
        self.item_width.map(|width| width + self.item_spacing)
    }

    pub fn is_measured(&self) -> bool {
        self.item_width.is_some()
    }

    pub fn horizontal_offset(&self) -> i64 {
        self.horizontal_offset
    }

    pub fn first_visible_index(&self) -> Option<usize> {
        self.first_visible_index
    }

    pub fn last_visible_index(&self) -> Option<usize> {
        self.last_visible_index
    }

    pub fn sub_cell_fraction(&self) -> f32 {
        self.sub_cell_fraction
    }

    pub fn pending_index(&self) -> Option<usize> {
        self.pending_index
    }

    /// Index under the offset's centre of attention, `floor(|offset| / stride)`
    pub fn focus_index(&self) -> Option<usize> {
        let stride = self.cell_stride()? as i64;
        Some((self.horizontal_offset.abs() / stride) as usize)
    }

    /// Offset at which `index` sits exactly at the leading edge
    pub fn aligned_offset(&self, index: usize) -> Option<i64> {
        let stride = self.cell_stride()? as i64;
        Some(index as i64 * stride)
    }

    /// Where the previous pass started its walk; 0 before the first pass
    pub(crate) fn walk_start(&self) -> usize {
        self.first_visible_index.unwrap_or(0)
    }

    pub(crate) fn set_item_width(&mut self, width: i32) {
        self.item_width = Some(width);
        self.measurement_stale = false;
    }

    /// Force the next pass to re-measure, keeping the old width for bounds
    pub(crate) fn invalidate_measurement(&mut self) {
        self.measurement_stale = true;
    }

    pub(crate) fn needs_measure(&self) -> bool {
        self.item_width.is_none() || self.measurement_stale
    }

    /// Forget offset, window and measurement; spacing is kept
    pub(crate) fn reset(&mut self) {
        *self = Self::new(self.item_spacing);
    }
}

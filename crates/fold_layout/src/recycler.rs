//! Item recycling seam
//!
//! The carousel never creates item instances itself. The host injects an
//! `ItemRecycler` at construction; the engine only fetches, measures,
//! attaches, places and releases through it.
//!
//! `MemoryRecycler` is an in-memory pool with a fixed item size. It backs
//! the simulator and the tests, and records every call so pool hygiene can
//! be checked.

use std::collections::HashMap;

use fold_core::{EdgeInsets, PixelRect};

use crate::error::{LayoutError, Result};
use crate::transform::FoldVisual;

/// Measured size of one item
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Measurement {
    pub width: i32,
    pub height: i32,
    pub margin: EdgeInsets,
}

impl Measurement {
    pub const fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            margin: EdgeInsets::ZERO,
        }
    }

    /// Set the item margins (builder pattern)
    pub const fn with_margin(mut self, margin: EdgeInsets) -> Self {
        self.margin = margin;
        self
    }

    /// Horizontal space the item occupies, margins included
    pub const fn decorated_width(&self) -> i32 {
        self.width + self.margin.horizontal()
    }

    /// Vertical space the item occupies, margins included
    pub const fn decorated_height(&self) -> i32 {
        self.height + self.margin.vertical()
    }
}

/// Where an attached item goes in the draw list
///
/// The draw list is painted front to back from its last entry: `Top`
/// appends, `BehindFirst` inserts at position 1 (or 0 on an empty list).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DrawSlot {
    Top,
    BehindFirst,
}

impl DrawSlot {
    /// Insertion position in a draw list of `len` entries
    pub fn position(&self, len: usize) -> usize {
        match self {
            DrawSlot::Top => len,
            DrawSlot::BehindFirst => len.min(1),
        }
    }
}

/// The host's view-recycling pool
pub trait ItemRecycler {
    /// Opaque reference to one item instance
    type Handle: Clone + std::fmt::Debug;

    /// Produce an item bound to `index`, reusing a pooled instance if possible
    fn fetch(&mut self, index: usize) -> Result<Self::Handle>;

    /// Measure an item, margins included
    fn measure(&mut self, handle: &Self::Handle) -> Result<Measurement>;

    /// Add an item to the draw list
    fn attach(&mut self, handle: &Self::Handle, slot: DrawSlot) -> Result<()>;

    /// Take an item off the draw list without returning it to the pool
    fn detach(&mut self, _handle: &Self::Handle) {}

    /// Position an item
    fn place(&mut self, handle: &Self::Handle, rect: PixelRect) -> Result<()>;

    /// Apply scale, opacity and pivot
    fn set_visual(&mut self, handle: &Self::Handle, visual: &FoldVisual) -> Result<()>;

    /// Return an item to the pool; the caller keeps no copy of the handle
    fn release(&mut self, handle: Self::Handle);
}

// ============================================================================
// In-memory pool
// ============================================================================

/// Handle issued by `MemoryRecycler`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ItemHandle {
    /// Instance id, stable across rebinding
    pub id: u32,
    /// Data index the instance is currently bound to
    pub index: usize,
}

/// One recorded recycler call
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecyclerEvent {
    Fetch { index: usize, id: u32 },
    Attach { id: u32, slot: DrawSlot },
    Detach { id: u32 },
    Release { id: u32 },
}

/// Last visual applied to an instance
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AppliedItem {
    pub index: usize,
    pub rect: PixelRect,
    pub visual: Option<FoldVisual>,
}

/// In-memory recycler with a uniform item size
#[derive(Debug)]
pub struct MemoryRecycler {
    item: Measurement,
    next_id: u32,
    /// Released instance ids, reused LIFO
    pool: Vec<u32>,
    /// Ids currently handed out
    live: HashMap<u32, usize>,
    draw_list: Vec<u32>,
    applied: HashMap<u32, AppliedItem>,
    events: Vec<RecyclerEvent>,
    fail_fetch_at: Option<usize>,
    fail_measure_at: Option<usize>,
    fail_place_at: Option<usize>,
}

impl MemoryRecycler {
    /// Pool whose items all measure `item`
    pub fn new(item: Measurement) -> Self {
        Self {
            item,
            next_id: 0,
            pool: Vec::new(),
            live: HashMap::new(),
            draw_list: Vec::new(),
            applied: HashMap::new(),
            events: Vec::new(),
            fail_fetch_at: None,
            fail_measure_at: None,
            fail_place_at: None,
        }
    }

    /// Change the size future measurements report
    pub fn set_item_size(&mut self, item: Measurement) {
        self.item = item;
    }

    /// Make fetching `index` fail until cleared with `None`
    pub fn fail_fetch_at(&mut self, index: Option<usize>) {
        self.fail_fetch_at = index;
    }

    /// Make measuring an item bound to `index` fail until cleared
    pub fn fail_measure_at(&mut self, index: Option<usize>) {
        self.fail_measure_at = index;
    }

    /// Make placing an item bound to `index` fail until cleared
    pub fn fail_place_at(&mut self, index: Option<usize>) {
        self.fail_place_at = index;
    }

    /// Instances handed out and not yet released
    pub fn outstanding(&self) -> usize {
        self.live.len()
    }

    /// Instances created so far
    pub fn created(&self) -> u32 {
        self.next_id
    }

    /// Attached instances, bottom first
    pub fn draw_list(&self) -> &[u32] {
        &self.draw_list
    }

    /// Data indices of attached instances, bottom first
    pub fn draw_order(&self) -> Vec<usize> {
        self.draw_list
            .iter()
            .filter_map(|id| self.live.get(id).copied())
            .collect()
    }

    /// Last placement and visual of an instance
    pub fn applied(&self, id: u32) -> Option<&AppliedItem> {
        self.applied.get(&id)
    }

    /// Calls recorded since the last `clear_events`
    pub fn events(&self) -> &[RecyclerEvent] {
        &self.events
    }

    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    fn check_live(&self, handle: &ItemHandle) -> Result<()> {
        if self.live.contains_key(&handle.id) {
            Ok(())
        } else {
            Err(LayoutError::Place {
                index: handle.index,
                reason: format!("instance {} is not live", handle.id),
            })
        }
    }
}

impl ItemRecycler for MemoryRecycler {
    type Handle = ItemHandle;

    fn fetch(&mut self, index: usize) -> Result<ItemHandle> {
        if self.fail_fetch_at == Some(index) {
            return Err(LayoutError::Fetch {
                index,
                reason: "injected failure".to_string(),
            });
        }
        let id = self.pool.pop().unwrap_or_else(|| {
            let id = self.next_id;
            self.next_id += 1;
            id
        });
        self.live.insert(id, index);
        self.events.push(RecyclerEvent::Fetch { index, id });
        Ok(ItemHandle { id, index })
    }

    fn measure(&mut self, handle: &ItemHandle) -> Result<Measurement> {
        if !self.live.contains_key(&handle.id) {
            return Err(LayoutError::Measure {
                index: handle.index,
                reason: format!("instance {} is not live", handle.id),
            });
        }
        if self.fail_measure_at == Some(handle.index) {
            return Err(LayoutError::Measure {
                index: handle.index,
                reason: "injected failure".to_string(),
            });
        }
        Ok(self.item)
    }

    fn attach(&mut self, handle: &ItemHandle, slot: DrawSlot) -> Result<()> {
        self.check_live(handle)?;
        self.draw_list.retain(|id| *id != handle.id);
        let position = slot.position(self.draw_list.len());
        self.draw_list.insert(position, handle.id);
        self.events.push(RecyclerEvent::Attach {
            id: handle.id,
            slot,
        });
        Ok(())
    }

    fn detach(&mut self, handle: &ItemHandle) {
        self.draw_list.retain(|id| *id != handle.id);
        self.events.push(RecyclerEvent::Detach { id: handle.id });
    }

    fn place(&mut self, handle: &ItemHandle, rect: PixelRect) -> Result<()> {
        self.check_live(handle)?;
        if self.fail_place_at == Some(handle.index) {
            return Err(LayoutError::Place {
                index: handle.index,
                reason: "injected failure".to_string(),
            });
        }
        let entry = self.applied.entry(handle.id).or_insert(AppliedItem {
            index: handle.index,
            rect,
            visual: None,
        });
        entry.index = handle.index;
        entry.rect = rect;
        Ok(())
    }

    fn set_visual(&mut self, handle: &ItemHandle, visual: &FoldVisual) -> Result<()> {
        self.check_live(handle)?;
        if let Some(entry) = self.applied.get_mut(&handle.id) {
            entry.visual = Some(*visual);
        }
        Ok(())
    }

    fn release(&mut self, handle: ItemHandle) {
        if self.live.remove(&handle.id).is_none() {
            tracing::warn!(id = handle.id, "released an instance that was not live");
            return;
        }
        self.draw_list.retain(|id| *id != handle.id);
        self.applied.remove(&handle.id);
        self.pool.push(handle.id);
        self.events.push(RecyclerEvent::Release { id: handle.id });
    }
}

//! Headless carousel simulation
//!
//! Replays a scripted session against an in-memory recycler: initial
//! layout, an optional jump, then drags. Each drag is a drag start, one
//! scroll delta and a release, after which the snap animation is ticked
//! until it settles.

use fold_core::{PixelRect, Point, ScrollPhase};
use fold_layout::{
    CarouselConfig, FoldCarousel, FoldEdge, Measurement, MemoryRecycler, Viewport,
};
use tracing::{debug, warn};

/// Upper bound on ticks per settle
const MAX_TICKS: usize = 10_000;

/// Scripted session parameters
#[derive(Clone, Debug)]
pub struct Simulation {
    pub items: usize,
    pub item_width: i32,
    pub item_height: i32,
    pub viewport_width: i32,
    pub viewport_height: i32,
    pub drags: Vec<i32>,
    pub jump: Option<usize>,
    pub frame_ms: f32,
}

/// One visible item of a captured frame
#[derive(Clone, Debug, PartialEq)]
pub struct ItemLine {
    pub index: usize,
    pub rect: PixelRect,
    pub scale: f32,
    pub opacity: f32,
    /// Scale pivot in viewport coordinates
    pub pivot: Point,
    pub z_order: usize,
    pub edge: FoldEdge,
}

/// Carousel contents after one scripted step
#[derive(Clone, Debug)]
pub struct Frame {
    pub label: String,
    pub offset: i64,
    /// Animation frames it took to settle
    pub ticks: usize,
    pub items: Vec<ItemLine>,
}

#[derive(Clone, Debug)]
pub struct SimulationReport {
    pub frames: Vec<Frame>,
    /// Item instances the recycler ever created
    pub created: u32,
    /// Item instances still handed out at the end
    pub outstanding: usize,
}

impl Simulation {
    pub fn run(&self, config: CarouselConfig) -> SimulationReport {
        let recycler = MemoryRecycler::new(Measurement::new(self.item_width, self.item_height));
        let viewport = Viewport::new(self.viewport_width, self.viewport_height);
        let mut carousel = FoldCarousel::new(config, viewport, recycler);
        let count = self.items;
        let mut frames = Vec::new();

        carousel.layout(count);
        frames.push(capture("layout".to_string(), &carousel, 0));

        if let Some(index) = self.jump {
            carousel.request_index(index, count);
            if carousel.take_needs_layout() {
                carousel.layout(count);
            }
            frames.push(capture(format!("jump to {index}"), &carousel, 0));
        }

        for &drag in &self.drags {
            carousel.on_scroll_state_changed(ScrollPhase::Dragging, count);
            let applied = carousel.consume_scroll_delta(drag, count);
            carousel.on_scroll_state_changed(ScrollPhase::Idle, count);
            let ticks = self.settle(&mut carousel);
            debug!(drag, applied, ticks, "drag settled");
            frames.push(capture(
                format!("drag {drag:+} (applied {applied:+})"),
                &carousel,
                ticks,
            ));
        }

        SimulationReport {
            frames,
            created: carousel.recycler().created(),
            outstanding: carousel.recycler().outstanding(),
        }
    }

    fn settle(&self, carousel: &mut FoldCarousel<MemoryRecycler>) -> usize {
        let mut ticks = 0;
        while carousel.is_animating() {
            if ticks == MAX_TICKS {
                warn!(ticks, "snap animation did not settle");
                break;
            }
            carousel.tick(self.frame_ms, self.items);
            ticks += 1;
        }
        ticks
    }
}

fn capture(label: String, carousel: &FoldCarousel<MemoryRecycler>, ticks: usize) -> Frame {
    Frame {
        label,
        offset: carousel.state().horizontal_offset(),
        ticks,
        items: carousel
            .visible_items()
            .iter()
            .map(|item| ItemLine {
                index: item.index,
                rect: item.rect(),
                scale: item.scale(),
                opacity: item.opacity(),
                pivot: item.visual.pivot(),
                z_order: item.z_order,
                edge: item.visual.edge,
            })
            .collect(),
    }
}

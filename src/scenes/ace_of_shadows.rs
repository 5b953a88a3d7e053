//=========================================================================
// Ace of Shadows Scene
//=========================================================================
//
// Four card stacks in the corners of the viewport. The top-left stack
// starts with the whole deck and, once a second, sends its top card to a
// random sibling stack.
//
//   (70,140) TopLeft ●──────────────● TopRight (w-70,140)
//                    │              │
//   (70,h-140) BottomLeft ●─────────● BottomRight (w-70,h-140)
//
//=========================================================================

use log::{debug, info};

use crate::core::geometry::{Point, Size};
use crate::core::scene::{HostContext, InitProgress, Scene, SceneContext, SceneFactory};
use crate::core::surface::RenderSurface;
use crate::core::transfer::{
    Anchor, ItemId, LayoutParams, MovableItem, QueueSet, TransferQueue, TransferTuning,
};

pub const DECK_SIZE: u32 = 144;

const MARGIN: f32 = 70.0;
const MARGIN_TOP: f32 = 140.0;
const ANCHORS: [Anchor; 4] = [
    Anchor::TopLeft,
    Anchor::TopRight,
    Anchor::BottomLeft,
    Anchor::BottomRight,
];

//=== Card ================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Card {
    pub suit: u8,
    pub value: u8,
}

impl Card {
    /// The `i`-th card of the deck.
    pub fn nth(i: u32) -> Self {
        Self {
            suit: (i % 4) as u8,
            value: (i % 13) as u8,
        }
    }
}

/// Corner position of the stack with the given anchor.
pub fn stack_origin(anchor: Anchor, viewport: Size) -> Point {
    let x = match anchor {
        Anchor::TopLeft | Anchor::BottomLeft => MARGIN,
        Anchor::TopRight | Anchor::BottomRight => viewport.width - MARGIN,
    };
    let y = match anchor {
        Anchor::TopLeft | Anchor::TopRight => MARGIN_TOP,
        Anchor::BottomLeft | Anchor::BottomRight => viewport.height - MARGIN_TOP,
    };
    Point::new(x, y)
}

//=== AceOfShadows ========================================================

pub struct AceOfShadows {
    viewport: Size,
    seed: Option<u64>,
    stacks: Option<QueueSet<Card>>,
    landed: usize,
}

impl AceOfShadows {
    pub fn new(viewport: Size, seed: Option<u64>) -> Self {
        Self {
            viewport,
            seed,
            stacks: None,
            landed: 0,
        }
    }

    pub fn factory(seed: Option<u64>) -> SceneFactory {
        Box::new(move |host: &HostContext| {
            Box::new(AceOfShadows::new(host.viewport, seed)) as Box<dyn Scene>
        })
    }

    pub fn stacks(&self) -> Option<&QueueSet<Card>> {
        self.stacks.as_ref()
    }

    /// Cards that have completed a move since init.
    pub fn landed(&self) -> usize {
        self.landed
    }

    fn build_stacks(&self) -> QueueSet<Card> {
        let tuning = TransferTuning::default();
        let mut stacks = match self.seed {
            Some(seed) => QueueSet::with_seed(tuning, seed),
            None => QueueSet::new(tuning),
        };

        let params = LayoutParams::default();
        for anchor in ANCHORS {
            stacks.push(TransferQueue::with_params(anchor, params));
        }

        if let Some(source) = stacks.get_mut(0) {
            for i in 0..DECK_SIZE {
                source.append(MovableItem::new(ItemId(i), Card::nth(i), params.item_size));
            }
            source.enable_auto_trigger(tuning.auto_interval_ms);
        }

        stacks
    }

    fn layout(&mut self) {
        let viewport = self.viewport;
        let Some(stacks) = self.stacks.as_mut() else {
            return;
        };

        for (index, anchor) in ANCHORS.iter().enumerate() {
            if let Some(stack) = stacks.get_mut(index) {
                stack.set_origin(stack_origin(*anchor, viewport));
                stack.set_width_budget(viewport.width / 3.0);
            }
        }
    }
}

impl Scene for AceOfShadows {
    fn on_init(&mut self, ctx: &mut SceneContext) -> InitProgress {
        self.viewport = ctx.viewport;
        self.stacks = Some(self.build_stacks());
        self.layout();

        info!(target: "scene", "Dealt {} cards into {} stacks", DECK_SIZE, ANCHORS.len());
        InitProgress::Ready
    }

    fn on_update(&mut self, _ctx: &mut SceneContext, elapsed_frames: f32) {
        if let Some(stacks) = self.stacks.as_mut() {
            let landed = stacks.update(elapsed_frames);
            for id in &landed {
                debug!(target: "scene", "Card {:?} landed", id);
            }
            self.landed += landed.len();
        }
    }

    fn on_resize(&mut self, width: f32, height: f32) {
        self.viewport = Size::new(width, height);
        self.layout();
    }

    fn on_destroy(&mut self) {
        if let Some(mut stacks) = self.stacks.take() {
            stacks.clear();
        }
    }

    fn render(&self, surface: &mut dyn RenderSurface) {
        if let Some(stacks) = &self.stacks {
            stacks.render(surface);
        }
    }
}

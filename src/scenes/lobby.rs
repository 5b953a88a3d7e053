//=========================================================================
// Lobby Scene
//=========================================================================
//
// Menu listing the demo scenes. Selecting an entry (pointer press or
// digit key) queues a switch request; the registry applies it at the end
// of the frame. The lobby is the only scene without a back control.
//
//=========================================================================

use log::debug;

use crate::core::geometry::{Point, Rect, Size};
use crate::core::input::ShellInput;
use crate::core::scene::{HostContext, InitProgress, Scene, SceneContext, SceneFactory};
use crate::core::surface::RenderSurface;

/// Display names of the menu entries, in menu order.
pub const MENU_ENTRIES: [&str; 3] = ["Ace of Shadows", "Magic Words", "Phoenix Flame"];

const TITLE: &str = "Lobby Menu";
const TITLE_Y: f32 = 100.0;
const FIRST_ENTRY_Y: f32 = 200.0;
const ENTRY_SPACING: f32 = 60.0;
const ENTRY_SIZE: Size = Size::new(320.0, 48.0);

const ENTRY_COLOR: u32 = 0xFFFF_FFFF;
const HOVER_COLOR: u32 = 0xFFFF_00FF;

/// Scene id for a menu entry: lowercase, whitespace and hyphens removed.
pub fn scene_id_for(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

//=== MenuEntry ===========================================================

#[derive(Debug, Clone, PartialEq)]
pub struct MenuEntry {
    pub label: &'static str,
    pub scene_id: String,
    pub bounds: Rect,
}

//=== Lobby ===============================================================

pub struct Lobby {
    viewport: Size,
    entries: Vec<MenuEntry>,
    hovered: Option<usize>,
}

impl Lobby {
    pub fn new(viewport: Size) -> Self {
        let mut lobby = Self {
            viewport,
            entries: Vec::new(),
            hovered: None,
        };
        lobby.build_entries();
        lobby
    }

    pub fn factory() -> SceneFactory {
        Box::new(|host: &HostContext| Box::new(Lobby::new(host.viewport)) as Box<dyn Scene>)
    }

    pub fn entries(&self) -> &[MenuEntry] {
        &self.entries
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    fn build_entries(&mut self) {
        let center_x = self.viewport.width / 2.0;
        self.entries = MENU_ENTRIES
            .iter()
            .enumerate()
            .map(|(i, &label)| MenuEntry {
                label,
                scene_id: scene_id_for(label),
                bounds: Rect::centered(
                    Point::new(center_x, FIRST_ENTRY_Y + i as f32 * ENTRY_SPACING),
                    ENTRY_SIZE,
                ),
            })
            .collect();
    }

    fn entry_at(&self, p: Point) -> Option<usize> {
        self.entries.iter().position(|e| e.bounds.contains(p))
    }

    fn select(&self, ctx: &SceneContext, index: usize) {
        if let Some(entry) = self.entries.get(index) {
            debug!(target: "scene", "Menu item selected: {}", entry.scene_id);
            ctx.requests.switch_to(entry.scene_id.clone());
        }
    }
}

impl Scene for Lobby {
    fn on_init(&mut self, ctx: &mut SceneContext) -> InitProgress {
        self.viewport = ctx.viewport;
        self.build_entries();
        InitProgress::Ready
    }

    fn on_resize(&mut self, width: f32, height: f32) {
        self.viewport = Size::new(width, height);
        self.build_entries();
    }

    fn on_input(&mut self, ctx: &mut SceneContext, input: &ShellInput) {
        match input {
            ShellInput::KeyDown(key) => {
                if let Some(index) = key.digit_index() {
                    self.select(ctx, index);
                }
            }
            ShellInput::PointerDown(p) => {
                if let Some(index) = self.entry_at(*p) {
                    self.select(ctx, index);
                }
            }
            ShellInput::PointerMoved(p) => {
                self.hovered = self.entry_at(*p);
            }
        }
    }

    fn on_destroy(&mut self) {
        self.entries.clear();
        self.hovered = None;
    }

    fn render(&self, surface: &mut dyn RenderSurface) {
        surface.draw_text(Point::new(self.viewport.width / 2.0, TITLE_Y), TITLE);

        for (i, entry) in self.entries.iter().enumerate() {
            let color = if self.hovered == Some(i) { HOVER_COLOR } else { ENTRY_COLOR };
            surface.draw_rect(entry.bounds, color);
            surface.draw_text(entry.bounds.center(), entry.label);
        }
    }

    fn has_back_control(&self) -> bool {
        false
    }
}

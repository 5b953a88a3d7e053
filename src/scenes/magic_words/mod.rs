//=========================================================================
// Magic Words Scene
//=========================================================================
//
// Scripted conversation between avatars in the corners of the viewport.
//
// Flow:
// ```text
//   on_init (poll) ── first poll ──> spawn loader thread ──> Pending
//        │                                 │
//        └─ payload / failure received <───┘ ──> apply ──> Ready
//
//   show_next: line i ──3000 ms──> line i+1 ... last ──5000 ms──> line 0
// ```
//
// Loading never fails the scene: a missing or malformed payload is
// logged and the scene runs with an empty conversation.
//
//=========================================================================

mod dialogue;

pub use dialogue::{
    avatar_anchor, parse_segments, render_segments, Avatar, DialogueError, DialogueLine,
    DialoguePayload, DialogueSource, Emoji, Segment, NARRATOR,
};

//=== External Dependencies ===============================================

use std::collections::HashSet;
use std::thread;

use crossbeam_channel::{bounded, Receiver, TryRecvError};
use log::{debug, error, info};

//=== Internal Dependencies ===============================================

use crate::core::geometry::{Point, Rect, Size};
use crate::core::scene::{HostContext, InitProgress, Scene, SceneContext, SceneFactory};
use crate::core::surface::RenderSurface;
use crate::core::timer::TimerId;
use crate::core::transfer::Anchor;

pub const DIALOGUE_DELAY_MS: f32 = 3000.0;
pub const RESTART_DELAY_MS: f32 = 5000.0;

const MARGIN: f32 = 70.0;
const MARGIN_TOP: f32 = 140.0;
const AVATAR_SIZE: Size = Size::new(100.0, 100.0);
const AVATAR_COLOR: u32 = 0xBDC3_C7FF;
const BUBBLE_COLOR: u32 = 0xFFFF_FFFF;

//=== Character ===========================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Character {
    name: String,
    anchor: Anchor,
    position: Point,
    speech: Option<String>,
}

impl Character {
    fn new(name: &str, viewport: Size) -> Self {
        let mut character = Self {
            name: name.to_owned(),
            anchor: avatar_anchor(name),
            position: Point::ZERO,
            speech: None,
        };
        character.update_dimensions(viewport);
        character
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn anchor(&self) -> Anchor {
        self.anchor
    }

    pub fn position(&self) -> Point {
        self.position
    }

    /// Line currently shown in this character's bubble.
    pub fn speech(&self) -> Option<&str> {
        self.speech.as_deref()
    }

    fn is_top(&self) -> bool {
        matches!(self.anchor, Anchor::TopLeft | Anchor::TopRight)
    }

    fn update_dimensions(&mut self, viewport: Size) {
        self.position = match self.anchor {
            Anchor::TopLeft => Point::new(MARGIN, MARGIN_TOP),
            Anchor::TopRight => Point::new(viewport.width - MARGIN, MARGIN_TOP),
            Anchor::BottomLeft => Point::new(MARGIN, viewport.height - MARGIN),
            Anchor::BottomRight => Point::new(viewport.width - MARGIN, viewport.height - MARGIN),
        };
    }

    fn render(&self, surface: &mut dyn RenderSurface) {
        surface.draw_rect(Rect::centered(self.position, AVATAR_SIZE), AVATAR_COLOR);

        // Names sit below the top-left avatar and above the others.
        let name_dy = if self.anchor == Anchor::TopLeft {
            AVATAR_SIZE.height / 2.0 + 10.0
        } else {
            -AVATAR_SIZE.height / 2.0 - 30.0
        };
        surface.draw_text(self.position + Point::new(0.0, name_dy), &self.name);

        if let Some(speech) = &self.speech {
            let bubble_dy = if self.is_top() { AVATAR_SIZE.height } else { -AVATAR_SIZE.height };
            let at = self.position + Point::new(0.0, bubble_dy);
            surface.draw_rect(Rect::centered(at, Size::new(220.0, 40.0)), BUBBLE_COLOR);
            surface.draw_text(at, speech);
        }
    }
}

//=== Loader ==============================================================

type LoadResult = Result<DialoguePayload, DialogueError>;

enum Loader {
    Idle,
    Waiting(Receiver<LoadResult>),
    Done,
}

/// Loads the payload on a worker thread.
///
/// If the thread cannot be spawned the sender is dropped with the
/// closure, so the receiver reports a disconnect on the next poll.
fn spawn_loader(source: DialogueSource) -> Loader {
    let (tx, rx) = bounded(1);

    let spawned = thread::Builder::new()
        .name("dialogue-loader".into())
        .spawn(move || {
            let _ = tx.send(source.load());
        });
    if let Err(e) = spawned {
        error!(target: "scene", "Could not start dialogue loader: {}", e);
    }

    Loader::Waiting(rx)
}

//=== MagicWords ==========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Advance,
    Restart,
}

pub struct MagicWords {
    viewport: Size,
    source: DialogueSource,
    loader: Loader,
    dialogue: Vec<DialogueLine>,
    emoji: HashSet<String>,
    characters: Vec<Character>,
    current: usize,
    showing: Option<usize>,
    next_step: Option<(TimerId, Step)>,
}

impl MagicWords {
    pub fn new(viewport: Size, source: DialogueSource) -> Self {
        Self {
            viewport,
            source,
            loader: Loader::Idle,
            dialogue: Vec::new(),
            emoji: HashSet::new(),
            characters: Vec::new(),
            current: 0,
            showing: None,
            next_step: None,
        }
    }

    pub fn factory(source: DialogueSource) -> SceneFactory {
        Box::new(move |host: &HostContext| {
            Box::new(MagicWords::new(host.viewport, source.clone())) as Box<dyn Scene>
        })
    }

    //--- Accessors --------------------------------------------------------

    pub fn is_loaded(&self) -> bool {
        matches!(self.loader, Loader::Done)
    }

    pub fn characters(&self) -> &[Character] {
        &self.characters
    }

    pub fn character(&self, name: &str) -> Option<&Character> {
        self.characters.iter().find(|c| c.name == name)
    }

    /// Line on screen, if any (none while waiting to restart).
    pub fn current_line(&self) -> Option<&DialogueLine> {
        self.showing.and_then(|i| self.dialogue.get(i))
    }

    //--- Loading ----------------------------------------------------------

    fn poll_loader(&mut self) -> Option<DialoguePayload> {
        if matches!(self.loader, Loader::Idle) {
            debug!(target: "scene", "Loading dialogue from {:?}", self.source);
            self.loader = spawn_loader(self.source.clone());
        }

        let result = match &self.loader {
            Loader::Waiting(rx) => match rx.try_recv() {
                Ok(result) => result,
                Err(TryRecvError::Empty) => return None,
                Err(TryRecvError::Disconnected) => Err(DialogueError::LoaderGone),
            },
            Loader::Idle | Loader::Done => return None,
        };
        self.loader = Loader::Done;

        Some(result.unwrap_or_else(|e| {
            error!(target: "scene", "Failed to load dialogue: {}", e);
            DialoguePayload::default()
        }))
    }

    fn apply(&mut self, payload: DialoguePayload) {
        self.emoji = payload.emoji_names();
        self.characters = payload
            .avatars
            .iter()
            .map(|a| Character::new(&a.name, self.viewport))
            .collect();
        if self.character(NARRATOR).is_none() {
            self.characters.push(Character::new(NARRATOR, self.viewport));
        }
        self.dialogue = payload.dialogue;

        info!(
            target: "scene",
            "Dialogue loaded: {} lines, {} avatars, {} emoji",
            self.dialogue.len(),
            payload.avatars.len(),
            self.emoji.len()
        );
    }

    //--- Script -----------------------------------------------------------

    fn show_next(&mut self, ctx: &mut SceneContext) {
        if let Some((timer, _)) = self.next_step.take() {
            ctx.timers.cancel(timer);
        }
        for character in &mut self.characters {
            character.speech = None;
        }

        if self.current >= self.dialogue.len() {
            debug!(target: "scene", "Dialogue finished, restarting after delay");
            self.current = 0;
            self.showing = None;
            let timer = ctx.timers.schedule(RESTART_DELAY_MS);
            self.next_step = Some((timer, Step::Restart));
            return;
        }

        let line = &self.dialogue[self.current];
        let speaker = self
            .characters
            .iter()
            .position(|c| c.name == line.name)
            .or_else(|| self.characters.iter().position(|c| c.name == NARRATOR));

        if let Some(index) = speaker {
            let text = render_segments(&parse_segments(&line.text, &self.emoji));
            self.characters[index].speech = Some(text);
        }

        self.showing = Some(self.current);
        let timer = ctx.timers.schedule(DIALOGUE_DELAY_MS);
        self.next_step = Some((timer, Step::Advance));
    }
}

impl Scene for MagicWords {
    fn on_init(&mut self, ctx: &mut SceneContext) -> InitProgress {
        self.viewport = ctx.viewport;

        match self.poll_loader() {
            Some(payload) => {
                self.apply(payload);
                self.show_next(ctx);
                InitProgress::Ready
            }
            None => InitProgress::Pending,
        }
    }

    fn on_timer(&mut self, ctx: &mut SceneContext, timer: TimerId) {
        let Some((expected, step)) = self.next_step else {
            return;
        };
        if expected != timer {
            return;
        }

        self.next_step = None;
        if step == Step::Advance {
            self.current += 1;
        }
        self.show_next(ctx);
    }

    fn on_resize(&mut self, width: f32, height: f32) {
        self.viewport = Size::new(width, height);
        for character in &mut self.characters {
            character.update_dimensions(self.viewport);
        }
    }

    fn on_destroy(&mut self) {
        self.next_step = None;
        self.showing = None;
        self.characters.clear();
        self.loader = Loader::Done;
    }

    fn render(&self, surface: &mut dyn RenderSurface) {
        for character in &self.characters {
            character.render(surface);
        }
    }
}

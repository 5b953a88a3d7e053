//=========================================================================
// Movable Item
//=========================================================================
//
// A two-sided visual unit owned by exactly one transfer queue (or, while
// in flight, by that queue's transfer descriptor).
//
// The flip animation is a pure function of accumulated progress:
// - progress advances by `flip_speed * elapsed_frames`
// - the old face shows while progress < 0.5, the new face after
// - horizontal scale is |cos(progress * PI)|
//
//=========================================================================

use std::f32::consts::PI;

use crate::core::geometry::Size;
use crate::core::surface::Sprite;

//=== ItemId ==============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(pub u32);

//=== Flip Easing =========================================================

/// Horizontal squash at a given flip progress in `[0, 1)`.
pub fn flip_squash(progress: f32) -> f32 {
    (progress * PI).cos().abs()
}

//=== MovableItem =========================================================

#[derive(Debug, Clone)]
pub struct MovableItem<T> {
    id: ItemId,
    payload: T,
    node: Sprite,
    face_up: bool,
    flip_progress: Option<f32>,
}

impl<T> MovableItem<T> {
    /// Creates a face-down item.
    pub fn new(id: ItemId, payload: T, size: Size) -> Self {
        Self {
            id,
            payload,
            node: Sprite::new(size),
            face_up: false,
            flip_progress: None,
        }
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn payload(&self) -> &T {
        &self.payload
    }

    pub fn node(&self) -> &Sprite {
        &self.node
    }

    pub(crate) fn node_mut(&mut self) -> &mut Sprite {
        &mut self.node
    }

    /// Logical face state (the face the item ends up showing).
    pub fn is_face_up(&self) -> bool {
        self.face_up
    }

    pub fn is_flipping(&self) -> bool {
        self.flip_progress.is_some()
    }

    /// Face currently visible, accounting for a flip in progress.
    pub fn shows_front(&self) -> bool {
        match self.flip_progress {
            Some(p) if p < 0.5 => !self.face_up,
            _ => self.face_up,
        }
    }

    /// Starts flipping towards `face_up`.
    ///
    /// Ignored while a flip is already running or if the item already
    /// shows the requested face. Returns whether a flip started.
    pub fn flip_to(&mut self, face_up: bool) -> bool {
        if self.is_flipping() || self.face_up == face_up {
            return false;
        }
        self.face_up = face_up;
        self.flip_progress = Some(0.0);
        true
    }

    /// Advances a running flip.
    pub fn advance_flip(&mut self, elapsed_frames: f32, flip_speed: f32) {
        let Some(progress) = self.flip_progress else {
            return;
        };

        let progress = progress + flip_speed * elapsed_frames;
        if progress >= 1.0 {
            self.flip_progress = None;
            self.node.set_scale_x(1.0);
        } else {
            self.flip_progress = Some(progress);
            self.node.set_scale_x(flip_squash(progress));
        }
    }
}

//=== Tests ===============================================================

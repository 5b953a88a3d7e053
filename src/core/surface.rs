//=========================================================================
// Render Surface & Visual Primitive
//=========================================================================
//
// The shell never draws pixels itself. It needs only:
// - a positioned, sized, visibility-toggleable node (`Sprite`)
// - a surface that can be resized, that layers attach to and detach from,
//   and that accepts positioned rectangles and text
//
// Architecture:
// ```text
//   SceneRegistry ──resize()──> RenderSurface
//        │                          ▲
//        └─ active scene ─render()──┘  (draw_rect / draw_text)
// ```
//
//=========================================================================

use super::geometry::{Point, Rect, Size};

//=== Sprite ==============================================================

/// Opaque visual node: position relative to its parent, size, visibility,
/// and horizontal scale. Anchored at its centre.
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    position: Point,
    size: Size,
    visible: bool,
    scale_x: f32,
}

impl Sprite {
    pub fn new(size: Size) -> Self {
        Self {
            position: Point::ZERO,
            size,
            visible: true,
            scale_x: 1.0,
        }
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn scale_x(&self) -> f32 {
        self.scale_x
    }

    pub fn set_scale_x(&mut self, scale_x: f32) {
        self.scale_x = scale_x;
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// Converts this node's local position to screen space, given the
    /// screen-space origin of its parent.
    pub fn local_to_global(&self, parent_origin: Point) -> Point {
        parent_origin + self.position
    }

    /// Screen-space bounds including horizontal scale.
    pub fn bounds(&self, parent_origin: Point) -> Rect {
        let scaled = Size::new(self.size.width * self.scale_x, self.size.height);
        Rect::centered(self.local_to_global(parent_origin), scaled)
    }
}

//=== RenderSurface =======================================================

/// Capability the shell requires from the host renderer.
pub trait RenderSurface: Send {
    /// Resizes the drawable area.
    fn resize(&mut self, width: f32, height: f32);

    /// Current drawable size.
    fn size(&self) -> Size;

    /// Attaches a named layer (a scene or an overlay).
    fn attach(&mut self, layer: &str);

    /// Detaches a previously attached layer.
    fn detach(&mut self, layer: &str);

    /// Draws a filled rectangle in screen space.
    fn draw_rect(&mut self, rect: Rect, color: u32);

    /// Draws a line of text anchored at `at`.
    fn draw_text(&mut self, at: Point, text: &str);
}

//=== HeadlessSurface =====================================================

/// Surface that records what it was asked to do instead of drawing.
///
/// Used by the shell runtime (pixel output is delegated to the host) and
/// by tests to observe attach/detach and resize behaviour.
#[derive(Debug, Default)]
pub struct HeadlessSurface {
    size: Size,
    layers: Vec<String>,
    resize_count: usize,
    rects_drawn: usize,
    texts: Vec<String>,
}

impl HeadlessSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Size::new(width, height),
            ..Self::default()
        }
    }

    pub fn layers(&self) -> &[String] {
        &self.layers
    }

    pub fn resize_count(&self) -> usize {
        self.resize_count
    }

    pub fn rects_drawn(&self) -> usize {
        self.rects_drawn
    }

    pub fn texts(&self) -> &[String] {
        &self.texts
    }

    /// Forgets draw calls from the previous frame.
    pub fn begin_frame(&mut self) {
        self.rects_drawn = 0;
        self.texts.clear();
    }
}

impl RenderSurface for HeadlessSurface {
    fn resize(&mut self, width: f32, height: f32) {
        self.size = Size::new(width, height);
        self.resize_count += 1;
    }

    fn size(&self) -> Size {
        self.size
    }

    fn attach(&mut self, layer: &str) {
        self.layers.push(layer.to_owned());
    }

    fn detach(&mut self, layer: &str) {
        if let Some(pos) = self.layers.iter().position(|l| l == layer) {
            self.layers.remove(pos);
        }
    }

    fn draw_rect(&mut self, _rect: Rect, _color: u32) {
        self.rects_drawn += 1;
    }

    fn draw_text(&mut self, _at: Point, text: &str) {
        self.texts.push(text.to_owned());
    }
}

//=== Tests ===============================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_to_global_offsets_by_parent() {
        let mut sprite = Sprite::new(Size::new(70.0, 98.0));
        sprite.set_position(Point::new(20.0, -3.0));
        assert_eq!(
            sprite.local_to_global(Point::new(70.0, 140.0)),
            Point::new(90.0, 137.0)
        );
    }

    #[test]
    fn bounds_shrink_with_horizontal_scale() {
        let mut sprite = Sprite::new(Size::new(100.0, 50.0));
        sprite.set_scale_x(0.5);
        let bounds = sprite.bounds(Point::ZERO);
        assert_eq!(bounds.size.width, 50.0);
        assert_eq!(bounds.origin.x, -25.0);
    }

    #[test]
    fn headless_surface_tracks_layers() {
        let mut surface = HeadlessSurface::new(800.0, 600.0);
        surface.attach("lobby");
        surface.attach("fps");
        surface.detach("lobby");
        assert_eq!(surface.layers(), &["fps".to_owned()]);
    }
}

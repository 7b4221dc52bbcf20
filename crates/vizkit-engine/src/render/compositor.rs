use crate::scene::DrawList;
use crate::text::FontSystem;

use super::shapes::{
    CircleRenderer,
    ImageRenderer,
    LineRenderer,
    MeshRenderer,
    RectRenderer,
    TextRenderer,
};
use super::{RenderCtx, RenderTarget};

/// All shape renderers, run in a fixed pass order over one draw list.
///
/// Order: rect, image, mesh, line, circle, text. Backgrounds land first and
/// text overlays last.
#[derive(Default)]
pub struct Compositor {
    rect: RectRenderer,
    image: ImageRenderer,
    mesh: MeshRenderer,
    line: LineRenderer,
    circle: CircleRenderer,
    text: TextRenderer,
}

impl Compositor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        draw_list: &mut DrawList,
        fonts: &FontSystem,
    ) {
        self.rect.render(ctx, target, draw_list);
        self.image.render(ctx, target, draw_list);
        self.mesh.render(ctx, target, draw_list);
        self.line.render(ctx, target, draw_list);
        self.circle.render(ctx, target, draw_list);
        self.text.render(ctx, target, draw_list, fonts);
    }
}

use crate::scene::shapes::{CircleCmd, ImageCmd, LineCmd, MeshCmd, RectCmd, TextCmd};

/// Renderer-agnostic draw command stream.
///
/// Extending the scene:
/// - add a new shape module under `scene::shapes::*`
/// - add a new variant here
/// - implement push helpers inside that shape module
/// - add a matching renderer under `render::shapes::*`
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Rect(RectCmd),
    Circle(CircleCmd),
    Line(LineCmd),
    Mesh(MeshCmd),
    Image(ImageCmd),
    Text(TextCmd),
}

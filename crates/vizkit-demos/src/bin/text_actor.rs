//! A bold, shadowed "Hello World!" overlay on a dark green background.

use anyhow::Context;
use vizkit::{FontFamily, NamedColors, RenderWindow, RenderWindowInteractor, Renderer, TextActor};
use vizkit_engine::logging::{init_logging, LoggingConfig};

fn text_actor(colors: &NamedColors) -> vizkit::Result<TextActor> {
    let mut text = TextActor::new("Hello World!");
    let prop = text.text_property_mut();
    prop.font_family = FontFamily::Arial;
    prop.bold = true;
    prop.font_size = 36;
    prop.shadow = true;
    prop.shadow_offset = [4, 4];
    prop.color = colors.color3d("Cornsilk")?;
    text.set_display_position(20, 30);
    Ok(text)
}

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());
    let colors = NamedColors::new();

    let mut renderer = Renderer::new();
    renderer.add_actor2d(text_actor(&colors)?);
    renderer.set_background(colors.color3d("DarkGreen")?);

    let mut window = RenderWindow::new();
    window.set_window_name("TextActor");
    window.add_renderer(renderer);

    let mut interactor = RenderWindowInteractor::new(window);
    interactor.initialize();
    interactor.render_window_mut().render();
    interactor.start().context("event loop failed")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hello_world_is_bold_shadowed_cornsilk() {
        let colors = NamedColors::new();
        let text = text_actor(&colors).unwrap();
        assert_eq!(text.input, "Hello World!");
        assert_eq!(text.display_position, [20, 30]);

        let prop = &text.text_property;
        assert_eq!(prop.font_family, FontFamily::Arial);
        assert_eq!(prop.font_size, 36);
        assert!(prop.bold);
        assert!(prop.shadow);
        assert_eq!(prop.shadow_offset, [4, 4]);
        assert_eq!(prop.color, colors.color3d("Cornsilk").unwrap());
    }
}

//! A draggable sphere widget that prints its center on every interaction.

use anyhow::Context;
use vizkit::{
    EventId, NamedColors, RenderWindow, RenderWindowInteractor, Renderer, SphereRepresentation, SphereWidget, Vec3,
};
use vizkit_engine::logging::{init_logging, LoggingConfig};

fn center_line(center: Vec3) -> String {
    format!("Center: {:?}, {:?}, {:?}", center.x, center.y, center.z)
}

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());
    let colors = NamedColors::new();

    let mut renderer = Renderer::new();
    renderer.set_background(colors.color3d("MidnightBlue")?);

    let mut window = RenderWindow::new();
    window.add_renderer(renderer);
    window.set_window_name("SphereWidget");

    let mut interactor = RenderWindowInteractor::new(window);

    let mut sphere = SphereWidget::new();
    sphere.set_representation(SphereRepresentation::Surface);
    sphere.sphere_property_mut().color = colors.color3d("BurlyWood")?;
    sphere.add_observer(EventId::Interaction, |widget, _| println!("{}", center_line(widget.center())));
    let id = interactor.add_widget(sphere);

    interactor.initialize();
    interactor.render_window_mut().render();
    if let Some(sphere) = interactor.widget_mut::<SphereWidget>(id) {
        sphere.on();
    }
    interactor.start().context("event loop failed")?;
    Ok(())
}

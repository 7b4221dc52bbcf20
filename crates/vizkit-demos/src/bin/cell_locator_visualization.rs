//! The buckets of a cell locator built over a sphere, with a slider that
//! picks which level of the tree is outlined.

use anyhow::Context;
use vizkit::{
    Actor, AnimationMode, CellLocator, EventId, Interpolation, NamedColors, RenderWindow, RenderWindowInteractor,
    Renderer, Representation, SliderWidget, SphereSource,
};
use vizkit_engine::logging::{init_logging, LoggingConfig};

/// Index of the outline actor in the renderer.
const TREE_ACTOR: usize = 1;

/// Tree level shown for a slider value.
fn level_for(value: f64) -> u32 {
    value.round().max(0.0) as u32
}

fn slider(colors: &NamedColors, max_level: u32) -> vizkit::Result<SliderWidget> {
    let mut slider = SliderWidget::new();
    slider.set_minimum(0.0);
    slider.set_maximum(f64::from(max_level));
    slider.set_value(0.0);
    slider.set_title_text("MaxPointsPerRegion");
    slider.set_point1(0.2, 0.1);
    slider.set_point2(0.8, 0.1);
    slider.set_slider_length(0.075);
    slider.set_slider_width(0.05);
    slider.set_end_cap_length(0.05);

    let parts = slider.colors_mut();
    parts.slider = colors.color3d("Peru")?;
    parts.selected = colors.color3d("DeepPink")?;
    parts.tube = colors.color3d("Teal")?;
    parts.cap = colors.color3d("Teal")?;
    slider.title_property_mut().color = colors.color3d("Silver")?;
    slider.label_property_mut().color = colors.color3d("Silver")?;

    slider.set_animation_mode(AnimationMode::Animate);
    Ok(slider)
}

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());
    let colors = NamedColors::new();

    let input = SphereSource { theta_resolution: 10, phi_resolution: 10, ..SphereSource::default() }.output();

    let mut points = Actor::new(input.clone());
    points.property.interpolation = Interpolation::Flat;
    points.property.color = colors.color3d("MistyRose")?;

    let mut locator = CellLocator::new();
    locator.set_data_set(input);
    locator.build_locator();

    let mut tree = Actor::new(locator.generate_representation(0));
    tree.property.interpolation = Interpolation::Flat;
    tree.property.representation = Representation::Wireframe;
    tree.property.color = colors.color3d("Gold")?;

    let mut renderer = Renderer::new();
    renderer.add_actor(points);
    renderer.add_actor(tree);
    renderer.set_background(colors.color3d("DarkSlateGray")?);

    let mut window = RenderWindow::new();
    window.add_renderer(renderer);
    window.set_window_name("CellLocatorVisualization");
    window.render();

    let mut interactor = RenderWindowInteractor::new(window);
    let id = interactor.add_widget(slider(&colors, locator.level())?);
    interactor.add_widget_observer::<SliderWidget>(id, EventId::Interaction, move |slider, window| {
        let level = level_for(slider.value());
        let Some(renderer) = window.first_renderer() else {
            return;
        };
        if let Some(tree) = window.renderer_mut(renderer).and_then(|r| r.actor_mut(TREE_ACTOR)) {
            tree.poly_data = locator.generate_representation(level);
        }
    });
    if let Some(slider) = interactor.widget_mut::<SliderWidget>(id) {
        slider.on();
    }

    interactor.initialize();
    interactor.render_window_mut().render();
    interactor.start().context("event loop failed")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slider_values_round_to_the_nearest_level() {
        assert_eq!(level_for(0.0), 0);
        assert_eq!(level_for(0.49), 0);
        assert_eq!(level_for(0.5), 1);
        assert_eq!(level_for(1.7), 2);
        assert_eq!(level_for(-0.2), 0);
    }

    #[test]
    fn slider_spans_the_built_levels() {
        let colors = NamedColors::new();
        let mut slider = slider(&colors, 3).unwrap();
        assert_eq!((slider.minimum(), slider.maximum(), slider.value()), (0.0, 3.0, 0.0));
        assert_eq!(slider.title_text(), "MaxPointsPerRegion");
        assert_eq!(slider.colors_mut().slider, colors.color3d("Peru").unwrap());
        assert_eq!(slider.colors_mut().selected, colors.color3d("DeepPink").unwrap());
    }

    #[test]
    fn zero_levels_still_give_a_usable_range() {
        let slider = slider(&NamedColors::new(), 0).unwrap();
        assert_eq!(slider.minimum(), -1.0);
        assert_eq!(level_for(slider.value()), 0);
    }
}

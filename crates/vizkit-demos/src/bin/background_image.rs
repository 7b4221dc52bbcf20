//! A superquadric in front of a background image layer.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use vizkit::imaging::jpeg;
use vizkit::{
    Actor, ImageActor, ImageCanvasSource2D, ImageData, RenderWindow, RenderWindowInteractor, Renderer,
    SuperquadricSource,
};
use vizkit_engine::logging::{init_logging, LoggingConfig};

#[derive(Parser, Debug)]
#[command(about = "Render a superquadric over a background image")]
struct Args {
    /// JPEG to use as the background; a generated canvas is used otherwise.
    image: Option<PathBuf>,
}

fn generated_background() -> vizkit::Result<ImageData> {
    let mut source = ImageCanvasSource2D::new()?;
    source.set_extent([0, 100, 0, 100])?;
    source.set_number_of_scalar_components(3)?;
    source.set_draw_color(&[127.0, 127.0, 100.0]);
    source.fill_box(0, 100, 0, 100);
    source.set_draw_color(&[100.0, 255.0, 255.0]);
    source.fill_triangle(10, 10, 25, 10, 25, 25);
    source.set_draw_color(&[255.0, 100.0, 255.0]);
    source.fill_tube(75, 75, 0, 75, 5.0);
    Ok(source.output())
}

/// Focal point and parallel scale that make `image` fill the viewport height.
fn fit_to_image(image: &ImageData) -> ([f64; 2], f64) {
    let [ox, oy, _] = image.origin();
    let [sx, sy, _] = image.spacing();
    let [x0, x1, y0, y1] = image.extent();
    let xc = ox + 0.5 * f64::from(x0 + x1) * sx;
    let yc = oy + 0.5 * f64::from(y0 + y1) * sy;
    let yd = f64::from(y1 - y0 + 1) * sy;
    ([xc, yc], 0.5 * yd)
}

fn main() -> anyhow::Result<ExitCode> {
    init_logging(LoggingConfig::default());
    let args = Args::parse();

    let image = match &args.image {
        Some(path) => {
            if !jpeg::can_read(path) {
                eprintln!("Error reading file {}", path.display());
                return Ok(ExitCode::FAILURE);
            }
            jpeg::read(path).with_context(|| format!("reading {}", path.display()))?
        }
        None => {
            log::info!("no image given; using a generated canvas");
            generated_background()?
        }
    };
    let ([xc, yc], scale) = fit_to_image(&image);

    let mut superquadric = SuperquadricSource::new();
    superquadric.set_phi_roundness(1.1);
    superquadric.set_theta_roundness(0.2);

    let mut background = Renderer::new();
    background.set_layer(0);
    background.set_interactive(false);
    background.add_image_actor(ImageActor::new(image)?);

    let mut scene = Renderer::new();
    scene.set_layer(1);
    scene.add_actor(Actor::new(superquadric.output()));

    let mut window = RenderWindow::new();
    window.set_number_of_layers(2);
    let background = window.add_renderer(background);
    window.add_renderer(scene);

    // First render places the cameras; the background one is then refitted.
    window.render();
    if let Some(renderer) = window.renderer_mut(background) {
        let camera = renderer.active_camera_mut();
        let d = camera.distance();
        camera.set_parallel_projection(true);
        camera.set_parallel_scale(scale);
        camera.set_focal_point([xc, yc, 0.0]);
        camera.set_position([xc, yc, d]);
    }
    window.render();

    let mut interactor = RenderWindowInteractor::new(window);
    interactor.start().context("event loop failed")?;
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_background_fits_a_101_pixel_square() {
        let image = generated_background().unwrap();
        assert_eq!(image.dimensions(), [101, 101]);
        let ([xc, yc], scale) = fit_to_image(&image);
        assert_eq!((xc, yc), (50.0, 50.0));
        assert_eq!(scale, 50.5);
    }

    #[test]
    fn canvas_paints_the_triangle_and_tube() {
        let image = generated_background().unwrap();
        assert_eq!(image.pixel(50, 50), Some(&[127u8, 127, 100][..]));
        assert_eq!(image.pixel(22, 12), Some(&[100u8, 255, 255][..]));
        assert_eq!(image.pixel(40, 75), Some(&[255u8, 100, 255][..]));
    }
}

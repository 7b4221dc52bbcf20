//! Paints a small canvas, writes it as BMP, reads it back and shows it.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use vizkit::imaging::bmp;
use vizkit::{
    ImageActor, ImageCanvasSource2D, ImageData, InteractorStyle, RenderWindow, RenderWindowInteractor, Renderer,
};
use vizkit_engine::logging::{init_logging, LoggingConfig};

#[derive(Parser, Debug)]
#[command(about = "Write a 10x10 canvas to a BMP file and display it")]
struct Args {
    /// File to write.
    output: Option<PathBuf>,
}

fn canvas() -> vizkit::Result<ImageData> {
    let mut source = ImageCanvasSource2D::new()?;
    source.set_extent([0, 9, 0, 9])?;
    source.set_number_of_scalar_components(3)?;
    source.set_draw_color(&[0.0, 0.0, 0.0, 0.0]);
    source.fill_box(0, 9, 0, 9);
    source.set_draw_color(&[255.0, 0.0, 0.0, 0.0]);
    source.fill_box(5, 7, 5, 7);
    Ok(source.output())
}

fn main() -> anyhow::Result<ExitCode> {
    init_logging(LoggingConfig::default());
    let Some(path) = Args::parse().output else {
        println!("Required parameters: OutputFilename.tif");
        return Ok(ExitCode::FAILURE);
    };

    bmp::write(&path, &canvas()?).with_context(|| format!("writing {}", path.display()))?;
    log::info!("wrote {}", path.display());
    let image = bmp::read(&path).with_context(|| format!("reading back {}", path.display()))?;

    let mut renderer = Renderer::new();
    renderer.add_image_actor(ImageActor::new(image)?);
    renderer.reset_camera();

    let mut window = RenderWindow::new();
    window.add_renderer(renderer);

    let mut interactor = RenderWindowInteractor::new(window);
    interactor.set_style(InteractorStyle::Image);
    interactor.initialize();
    interactor.start().context("event loop failed")?;
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canvas_has_red_box_on_black() {
        let image = canvas().unwrap();
        assert_eq!(image.dimensions(), [10, 10]);
        assert_eq!(image.pixel(6, 6), Some(&[255u8, 0, 0][..]));
        assert_eq!(image.pixel(1, 1), Some(&[0u8, 0, 0][..]));
        assert_eq!(image.pixel(8, 8), Some(&[0u8, 0, 0][..]));
    }

    #[test]
    fn output_argument_is_optional_at_parse_time() {
        let args = Args::try_parse_from(["write_bmp"]).unwrap();
        assert!(args.output.is_none());
        let args = Args::try_parse_from(["write_bmp", "out.bmp"]).unwrap();
        assert_eq!(args.output, Some(PathBuf::from("out.bmp")));
    }
}

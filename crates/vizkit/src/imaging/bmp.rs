//! Windows bitmap files.

use std::path::Path;

use image::{ImageFormat, ImageReader};

use crate::error::{Result, VizError};

use super::ImageData;

/// Writes `image` as an uncompressed BMP.
pub fn write(path: impl AsRef<Path>, image: &ImageData) -> Result<()> {
    let path = path.as_ref();
    image.to_dynamic()?.save_with_format(path, ImageFormat::Bmp)?;
    log::debug!("wrote {} ({:?})", path.display(), image.dimensions());
    Ok(())
}

/// Reads a BMP file. Row 0 of the result is the bottom of the picture.
pub fn read(path: impl AsRef<Path>) -> Result<ImageData> {
    let path = path.as_ref();
    let mut reader = ImageReader::open(path).map_err(|source| VizError::Io { path: path.to_path_buf(), source })?;
    reader.set_format(ImageFormat::Bmp);
    ImageData::from_dynamic(reader.decode()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::ImageCanvasSource2D;

    #[test]
    fn write_then_read_keeps_pixels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("canvas.bmp");

        let mut canvas = ImageCanvasSource2D::new().unwrap();
        canvas.set_extent([0, 9, 0, 9]).unwrap();
        canvas.set_number_of_scalar_components(3).unwrap();
        canvas.set_draw_color(&[0.0, 0.0, 0.0]);
        canvas.fill_box(0, 9, 0, 9);
        canvas.set_draw_color(&[255.0, 0.0, 0.0]);
        canvas.fill_box(5, 7, 5, 7);

        write(&path, canvas.image()).unwrap();
        let back = read(&path).unwrap();
        assert_eq!(back.dimensions(), [10, 10]);
        assert_eq!(back.components(), 3);
        assert_eq!(back.pixel(6, 6), Some(&[255u8, 0, 0][..]));
        assert_eq!(back.pixel(0, 0), Some(&[0u8, 0, 0][..]));
        assert_eq!(back.scalars(), canvas.image().scalars());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read(dir.path().join("absent.bmp")).unwrap_err();
        assert!(matches!(err, VizError::Io { .. }));
    }

    #[test]
    fn garbage_is_a_codec_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("junk.bmp");
        std::fs::write(&path, b"definitely not a bitmap").unwrap();
        assert!(matches!(read(&path), Err(VizError::Image(_))));
    }
}

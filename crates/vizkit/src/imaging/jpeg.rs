//! JPEG files (read only).

use std::fs::File;
use std::io::Read;
use std::path::Path;

use image::{ImageFormat, ImageReader};

use crate::error::{Result, VizError};

use super::ImageData;

/// True when `path` exists and starts with a JPEG signature. The file
/// extension plays no part.
pub fn can_read(path: impl AsRef<Path>) -> bool {
    let mut head = Vec::with_capacity(16);
    let read = File::open(path.as_ref()).and_then(|f| f.take(16).read_to_end(&mut head));
    read.is_ok() && matches!(image::guess_format(&head), Ok(ImageFormat::Jpeg))
}

/// Decodes a JPEG file. Row 0 of the result is the bottom of the picture.
pub fn read(path: impl AsRef<Path>) -> Result<ImageData> {
    let path = path.as_ref();
    if !can_read(path) {
        return Err(VizError::UnsupportedFile { path: path.to_path_buf(), format: "jpeg" });
    }
    let mut reader = ImageReader::open(path).map_err(|source| VizError::Io { path: path.to_path_buf(), source })?;
    reader.set_format(ImageFormat::Jpeg);
    let data = ImageData::from_dynamic(reader.decode()?)?;
    log::debug!("read {} ({:?})", path.display(), data.dimensions());
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_decides_readability() {
        let dir = tempfile::tempdir().unwrap();
        let jpeg = dir.path().join("a.jpg");
        std::fs::write(&jpeg, [0xFF, 0xD8, 0xFF, 0xE0, 0, 0]).unwrap();
        let text = dir.path().join("b.jpg");
        std::fs::write(&text, b"hello").unwrap();

        assert!(can_read(&jpeg));
        assert!(!can_read(&text));
        assert!(!can_read(dir.path().join("missing.jpg")));
    }

    #[test]
    fn jpeg_content_is_readable_under_any_name() {
        let dir = tempfile::tempdir().unwrap();
        let odd = dir.path().join("picture.dat");
        std::fs::write(&odd, [0xFF, 0xD8, 0xFF, 0xDB, 0, 0]).unwrap();
        assert!(can_read(&odd));

        let empty = dir.path().join("empty.jpg");
        std::fs::write(&empty, []).unwrap();
        assert!(!can_read(&empty));
    }

    #[test]
    fn unreadable_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let text = dir.path().join("b.jpg");
        std::fs::write(&text, b"hello").unwrap();
        assert!(matches!(read(&text), Err(VizError::UnsupportedFile { format: "jpeg", .. })));
    }
}

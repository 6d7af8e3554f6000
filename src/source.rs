use std::path::Path;

use anyhow::{Context, Result};

/// One RGBA8 frame as handed to decoders.
#[derive(Debug, Clone)]
pub struct PixelFrame {
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Symbol-decoding collaborator. Pure: raw pixels in, at most one payload
/// out. `None` (or an empty payload) means no code was found in the frame.
pub trait SymbolDecoder: Send + Sync {
    fn decode(&self, pixels: &[u8], width: u32, height: u32) -> Option<String>;
}

/// Camera-capture collaborator. `start` acquires the device and is where
/// permission or missing-device failures surface; `grab` yields the latest
/// frame if one is ready; `stop` releases the device.
pub trait FrameSource: Send {
    fn start(&mut self) -> Result<()>;
    fn grab(&mut self) -> Result<Option<PixelFrame>>;
    fn stop(&mut self);
}

/// Decodes an image file into the RGBA8 layout decoders expect.
pub fn load_pixels(path: &Path) -> Result<PixelFrame> {
    let img = image::open(path)
        .with_context(|| format!("failed to decode image {}", path.display()))?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(PixelFrame {
        pixels: rgba.into_raw(),
        width,
        height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn load_pixels_yields_rgba_buffer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dot.png");
        let mut img = RgbaImage::new(2, 3);
        img.put_pixel(0, 0, Rgba([7, 0, 0, 255]));
        img.save(&path).unwrap();

        let frame = load_pixels(&path).unwrap();
        assert_eq!((frame.width, frame.height), (2, 3));
        assert_eq!(frame.pixels.len(), 2 * 3 * 4);
        assert_eq!(frame.pixels[0], 7);
    }

    #[test]
    fn load_pixels_reports_unreadable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("not-an-image.png");
        std::fs::write(&path, b"plain text").unwrap();

        let err = load_pixels(&path).unwrap_err();
        assert!(err.to_string().contains("failed to decode image"));
    }
}

use std::path::{Path, PathBuf};

use image::imageops;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("failed to open {path:?}: {source}")]
    Open {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error("truncated image: expected {expected:?} pixels, got {actual:?}")]
    Truncated { expected: usize, actual: usize },
}

/// A decoded RGBA8 image, one `u32` per pixel, rows top to bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u32>,
}

impl DecodedImage {
    pub fn from_rgba(width: u32, height: u32, rgba: &[u8]) -> Self {
        let pixels = rgba
            .chunks_exact(4)
            .map(|p| u32::from_ne_bytes([p[0], p[1], p[2], p[3]]))
            .collect();
        Self {
            width,
            height,
            pixels,
        }
    }

    pub(crate) fn check_len(&self) -> Result<(), DecodeError> {
        let expected = self.width as usize * self.height as usize;
        if self.pixels.len() < expected {
            Err(DecodeError::Truncated {
                expected,
                actual: self.pixels.len(),
            })
        } else {
            Ok(())
        }
    }
}

pub trait ImageDecoder {
    /// Decodes the image at `path`. With `flip_vertically` the bottom row
    /// comes first.
    fn decode(&self, path: &Path, flip_vertically: bool) -> Result<DecodedImage, DecodeError>;
}

/// Decodes PNG, JPEG, BMP and TGA files from the filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileDecoder;

impl ImageDecoder for FileDecoder {
    fn decode(&self, path: &Path, flip_vertically: bool) -> Result<DecodedImage, DecodeError> {
        let image = image::open(path).map_err(|source| DecodeError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let mut image = image.into_rgba8();
        if flip_vertically {
            imageops::flip_vertical_in_place(&mut image);
        }
        let (width, height) = image.dimensions();
        log::debug!("decoded {path:?}: {width}x{height}");
        Ok(DecodedImage::from_rgba(width, height, image.as_raw()))
    }
}

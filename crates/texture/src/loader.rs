use std::path::Path;

use psp_file_formats::psp::TexturePixelFormat;

use crate::decode::{DecodedImage, FileDecoder, ImageDecoder};
use crate::error::{Error, Result};
use crate::padding::{copy_padded, padded_dimensions};
use crate::swizzle;
use crate::texture::{upload, Destination, Texture, MAX_TEXTURE_SIZE};
use crate::vram::{VideoMemory, VramArena};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    pub destination: Destination,
    /// Store the bottom row first, matching the GE's texture coordinates.
    pub flip_vertically: bool,
}

impl LoadOptions {
    pub fn new(use_vram: bool) -> Self {
        Self {
            destination: if use_vram {
                Destination::Vram
            } else {
                Destination::Host
            },
            ..Self::default()
        }
    }
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            destination: Destination::Host,
            flip_vertically: true,
        }
    }
}

/// Turns image files into swizzled textures.
#[derive(Debug, Default, Clone)]
pub struct TextureLoader<D = FileDecoder> {
    decoder: D,
}

impl TextureLoader {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<D: ImageDecoder> TextureLoader<D> {
    pub fn with_decoder(decoder: D) -> Self {
        Self { decoder }
    }

    pub fn load<M: VideoMemory>(
        &self,
        path: impl AsRef<Path>,
        use_vram: bool,
        arena: &mut VramArena<M>,
    ) -> Result<Texture> {
        self.load_with(path, LoadOptions::new(use_vram), arena)
    }

    /// Decodes `path`, pads it to power-of-two dimensions and swizzles it
    /// into the requested destination.
    ///
    /// On failure nothing is leaked and the arena cursor is left where it
    /// was.
    pub fn load_with<M: VideoMemory>(
        &self,
        path: impl AsRef<Path>,
        options: LoadOptions,
        arena: &mut VramArena<M>,
    ) -> Result<Texture> {
        let path = path.as_ref();
        let image = self.decoder.decode(path, options.flip_vertically)?;
        image.check_len()?;

        let (width, height) = (image.width, image.height);
        if width == 0 || height == 0 || width > MAX_TEXTURE_SIZE || height > MAX_TEXTURE_SIZE {
            return Err(Error::UnsupportedDimensions { width, height });
        }

        let format = TexturePixelFormat::Psm8888;
        let (padded_width, padded_height) = padded_dimensions(width, height);
        let pitch = format.data_size(padded_width, 1);
        let size = format.data_size(padded_width, padded_height);
        swizzle::check_dimensions(pitch, padded_height as usize, size)?;

        let staging = staging_buffer(image, padded_width, padded_height)?;
        let staging_bytes: &[u8] = bytemuck::cast_slice(&staging);

        let data = upload(
            options.destination,
            format,
            padded_width,
            padded_height,
            arena,
            |out| Ok(swizzle::swizzle(out, staging_bytes, pitch, padded_height as usize)?),
        )?;

        log::debug!(
            "loaded {path:?}: {width}x{height} as {padded_width}x{padded_height} in {:?}",
            options.destination
        );
        Ok(Texture {
            width,
            height,
            padded_width,
            padded_height,
            format,
            data,
        })
    }
}

/// Copies `image` into a zeroed buffer with power-of-two stride, consuming it.
fn staging_buffer(image: DecodedImage, padded_width: u32, padded_height: u32) -> Result<Vec<u32>> {
    let len = padded_width as usize * padded_height as usize;
    let mut staging = Vec::new();
    staging
        .try_reserve_exact(len)
        .map_err(|_| Error::Allocation { bytes: len * 4 })?;
    staging.resize(len, 0);
    copy_padded(
        &mut staging,
        &image.pixels,
        padded_width,
        image.width,
        image.height,
    );
    Ok(staging)
}

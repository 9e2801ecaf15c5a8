use alloc::{vec, vec::Vec};

use aligned_vec::AVec;
use psp_file_formats::psp::TexturePixelFormat;
use psp_file_formats::texture::TextureFile;

use crate::error::{Error, Result};
use crate::mem::AlignedBuffer;
use crate::padding::padded_dimensions;
use crate::swizzle;
use crate::vram::{VideoMemory, VramArena, VramError, VramSlab};

/// Largest texture dimension the GE can address.
pub const MAX_TEXTURE_SIZE: u32 = 512;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    /// A heap buffer owned by the texture.
    #[default]
    Host,
    /// A slab from the [`VramArena`], never released.
    Vram,
}

#[derive(Debug)]
pub enum TextureData {
    Host(AlignedBuffer),
    Vram(VramSlab),
}

/// A swizzled texture, stored at power-of-two dimensions.
#[derive(Debug)]
pub struct Texture {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) padded_width: u32,
    pub(crate) padded_height: u32,
    pub(crate) format: TexturePixelFormat,
    pub(crate) data: TextureData,
}

impl Texture {
    /// Uploads a stored texture into `destination`, swizzling it on the way
    /// if the file holds row-major texels.
    ///
    /// The file is validated before anything is allocated, so on failure
    /// the arena cursor is left where it was.
    pub fn from_file<M: VideoMemory>(
        file: &TextureFile,
        destination: Destination,
        arena: &mut VramArena<M>,
    ) -> Result<Self> {
        let format = file.format;
        if format.encoded() {
            return Err(Error::UnsupportedFormat { format });
        }

        let (width, height) = (file.width, file.height);
        if width == 0 || height == 0 || width > MAX_TEXTURE_SIZE || height > MAX_TEXTURE_SIZE {
            return Err(Error::UnsupportedDimensions { width, height });
        }
        let (padded_width, padded_height) = padded_dimensions(width, height);
        if (file.padded_width, file.padded_height) != (padded_width, padded_height) {
            return Err(Error::UnsupportedDimensions {
                width: file.padded_width,
                height: file.padded_height,
            });
        }

        let size = file.expected_len();
        if file.data.len() != size {
            return Err(Error::DataLength {
                expected: size,
                actual: file.data.len(),
            });
        }
        let pitch = format.data_size(padded_width, 1);
        swizzle::check_dimensions(pitch, padded_height as usize, size)?;

        let data = upload(
            destination,
            format,
            padded_width,
            padded_height,
            arena,
            |out| {
                if file.swizzled {
                    out.copy_from_slice(&file.data);
                } else {
                    swizzle::swizzle(out, &file.data, pitch, padded_height as usize)?;
                }
                Ok(())
            },
        )?;

        log::debug!(
            "uploaded {width}x{height} {format:?} texture to {destination:?}"
        );
        Ok(Self {
            width,
            height,
            padded_width,
            padded_height,
            format,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn padded_width(&self) -> u32 {
        self.padded_width
    }

    pub fn padded_height(&self) -> u32 {
        self.padded_height
    }

    pub fn format(&self) -> TexturePixelFormat {
        self.format
    }

    pub fn data(&self) -> &TextureData {
        &self.data
    }

    /// Row pitch of the stored texture in bytes.
    pub fn pitch(&self) -> usize {
        self.format.data_size(self.padded_width, 1)
    }

    /// Swizzled bytes, wherever they live.
    pub fn pixels<'a, M: VideoMemory>(&'a self, arena: &'a VramArena<M>) -> Option<&'a [u8]> {
        match &self.data {
            TextureData::Host(buffer) => Some(buffer.as_bytes()),
            TextureData::Vram(slab) => arena.slab(slab),
        }
    }

    /// Like [`Texture::pixels`], but a slab missing from `arena` is an error.
    pub(crate) fn resident_pixels<'a, M: VideoMemory>(
        &'a self,
        arena: &'a VramArena<M>,
    ) -> Result<&'a [u8]> {
        self.pixels(arena).ok_or(Error::NotResident)
    }

    /// Address handed to the GE.
    pub fn address<M: VideoMemory>(&self, arena: &VramArena<M>) -> Option<usize> {
        match &self.data {
            TextureData::Host(buffer) => Some(buffer.as_bytes().as_ptr() as usize),
            TextureData::Vram(slab) => arena.slab(slab).map(|_| slab.address),
        }
    }

    /// Row-major copy of the padded texture.
    pub fn unswizzled<M: VideoMemory>(&self, arena: &VramArena<M>) -> Result<Vec<u32>> {
        let swizzled = self.resident_pixels(arena)?;
        let mut pixels = vec![0u32; swizzled.len() / 4];
        swizzle::unswizzle(
            bytemuck::cast_slice_mut(&mut pixels),
            swizzled,
            self.pitch(),
            self.padded_height as usize,
        )?;
        Ok(pixels)
    }

    pub fn to_file<M: VideoMemory>(&self, arena: &VramArena<M>) -> Result<TextureFile> {
        let data = self.resident_pixels(arena)?;
        Ok(TextureFile {
            format: self.format,
            swizzled: true,
            width: self.width,
            height: self.height,
            padded_width: self.padded_width,
            padded_height: self.padded_height,
            buffer_width: self.padded_width,
            data: AVec::from_slice(16, data),
        })
    }
}

/// Reserves storage for a padded texture in `destination`, lets `fill`
/// write it, then flushes so the GE sees the result.
///
/// `fill` must not fail for inputs the caller has already validated: a VRAM
/// slab is committed before it runs.
pub(crate) fn upload<M: VideoMemory>(
    destination: Destination,
    format: TexturePixelFormat,
    padded_width: u32,
    padded_height: u32,
    arena: &mut VramArena<M>,
    fill: impl FnOnce(&mut [u8]) -> Result<()>,
) -> Result<TextureData> {
    let data = match destination {
        Destination::Host => {
            let size = format.data_size(padded_width, padded_height);
            let mut buffer =
                AlignedBuffer::try_zeroed(size).ok_or(Error::Allocation { bytes: size })?;
            fill(buffer.as_bytes_mut())?;
            TextureData::Host(buffer)
        }
        Destination::Vram => {
            let slab = arena.try_allocate(padded_width, padded_height, format)?;
            let out = arena.slab_mut(&slab).ok_or(VramError::Unmapped {
                offset: slab.offset,
                len: slab.len,
            })?;
            fill(out)?;
            TextureData::Vram(slab)
        }
    };
    arena.memory_mut().flush();
    Ok(data)
}

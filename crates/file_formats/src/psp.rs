use serde::{Deserialize, Serialize};

/// Pixel storage modes understood by the GE texture unit.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TexturePixelFormat {
    Psm5650 = 0,
    Psm5551 = 1,
    Psm4444 = 2,
    Psm8888 = 3,
    PsmT4 = 4,
    PsmT8 = 5,
    PsmT16 = 6,
    PsmT32 = 7,
    PsmDxt1 = 8,
    PsmDxt3 = 9,
    PsmDxt5 = 10,
}

impl TexturePixelFormat {
    /// Rows handed to the swizzler are padded to this many bytes.
    pub const PITCH_ALIGN: usize = 16;

    pub fn from_raw(value: u32) -> Option<Self> {
        Some(match value {
            0 => Self::Psm5650,
            1 => Self::Psm5551,
            2 => Self::Psm4444,
            3 => Self::Psm8888,
            4 => Self::PsmT4,
            5 => Self::PsmT8,
            6 => Self::PsmT16,
            7 => Self::PsmT32,
            8 => Self::PsmDxt1,
            9 => Self::PsmDxt3,
            10 => Self::PsmDxt5,
            _ => return None,
        })
    }

    pub fn bits_per_pixel(self) -> usize {
        match self {
            Self::PsmT4 | Self::PsmDxt1 => 4,
            Self::PsmT8 | Self::PsmDxt3 | Self::PsmDxt5 => 8,
            Self::Psm5650 | Self::Psm5551 | Self::Psm4444 | Self::PsmT16 => 16,
            Self::Psm8888 | Self::PsmT32 => 32,
        }
    }

    /// Block compressed formats are stored as-is and never swizzled.
    pub fn encoded(self) -> bool {
        matches!(self, Self::PsmDxt1 | Self::PsmDxt3 | Self::PsmDxt5)
    }

    /// Bytes occupied by a `width` x `height` buffer of this format in
    /// static video memory. Block compressed formats are not sized here and
    /// occupy nothing.
    pub fn memory_size(self, width: u32, height: u32) -> usize {
        let size = width as usize * height as usize;
        match self {
            Self::PsmT4 => size / 2,
            Self::PsmT8 => size,
            Self::Psm5650 | Self::Psm5551 | Self::Psm4444 | Self::PsmT16 => size * 2,
            Self::Psm8888 | Self::PsmT32 => size * 4,
            Self::PsmDxt1 | Self::PsmDxt3 | Self::PsmDxt5 => 0,
        }
    }

    /// Bytes of texel data in a `width` x `height` image, including block
    /// compressed formats.
    pub fn data_size(self, width: u32, height: u32) -> usize {
        (width as usize * height as usize * self.bits_per_pixel()) / 8
    }

    /// Like [`memory_size`](Self::memory_size), for a raw GE format value.
    /// Unknown values occupy nothing.
    pub fn memory_size_raw(width: u32, height: u32, raw: u32) -> usize {
        Self::from_raw(raw).map_or(0, |format| format.memory_size(width, height))
    }

    /// Row pitch in bytes, aligned up to the swizzle block width.
    pub fn pitch(self, width: u32) -> usize {
        let bytes = (self.bits_per_pixel() * width as usize + 7) / 8;
        bytes.next_multiple_of(Self::PITCH_ALIGN)
    }
}

#[cfg(feature = "psp")]
impl From<TexturePixelFormat> for psp::sys::TexturePixelFormat {
    fn from(value: TexturePixelFormat) -> Self {
        match value {
            TexturePixelFormat::Psm5650 => Self::Psm5650,
            TexturePixelFormat::Psm5551 => Self::Psm5551,
            TexturePixelFormat::Psm4444 => Self::Psm4444,
            TexturePixelFormat::Psm8888 => Self::Psm8888,
            TexturePixelFormat::PsmT4 => Self::PsmT4,
            TexturePixelFormat::PsmT8 => Self::PsmT8,
            TexturePixelFormat::PsmT16 => Self::PsmT16,
            TexturePixelFormat::PsmT32 => Self::PsmT32,
            TexturePixelFormat::PsmDxt1 => Self::PsmDxt1,
            TexturePixelFormat::PsmDxt3 => Self::PsmDxt3,
            TexturePixelFormat::PsmDxt5 => Self::PsmDxt5,
        }
    }
}

use aligned_vec::{AVec, ConstAlign};
use serde::{Deserialize, Serialize};

pub use crate::psp::TexturePixelFormat;

/// A texture as it is stored on disk, ready to be handed to `sceGuTexImage`.
#[derive(Debug, Serialize, Deserialize)]
pub struct TextureFile {
    pub format: TexturePixelFormat,
    pub swizzled: bool,
    pub width: u32,
    pub height: u32,
    pub padded_width: u32,
    pub padded_height: u32,
    pub buffer_width: u32,
    pub data: AVec<u8, ConstAlign<16>>,
}

impl TextureFile {
    pub const EXTENSION: &'static str = "ptex";

    /// Bytes `data` must hold for the padded dimensions and format.
    pub fn expected_len(&self) -> usize {
        self.format
            .data_size(self.padded_width, self.padded_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn survives_postcard() {
        let file = TextureFile {
            format: TexturePixelFormat::Psm8888,
            swizzled: true,
            width: 3,
            height: 5,
            padded_width: 4,
            padded_height: 8,
            buffer_width: 4,
            data: AVec::from_slice(16, &[0x5a; 4 * 8 * 4]),
        };
        assert_eq!(file.expected_len(), file.data.len());

        let bytes = postcard::to_allocvec(&file).unwrap();
        let decoded: TextureFile = postcard::from_bytes(&bytes).unwrap();
        assert_eq!(decoded.format, TexturePixelFormat::Psm8888);
        assert!(decoded.swizzled);
        assert_eq!((decoded.width, decoded.height), (3, 5));
        assert_eq!((decoded.padded_width, decoded.padded_height), (4, 8));
        assert_eq!(decoded.data.as_slice(), file.data.as_slice());
        assert_eq!(decoded.data.as_ptr() as usize % 16, 0);
    }
}

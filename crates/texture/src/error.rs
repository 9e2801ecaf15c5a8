use psp_file_formats::psp::TexturePixelFormat;
use thiserror::Error;

#[cfg(feature = "std")]
use crate::decode::DecodeError;
use crate::swizzle::SwizzleError;
use crate::vram::VramError;

#[derive(Error, Debug)]
pub enum Error {
    #[cfg(feature = "std")]
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),
    #[error("failed to allocate {bytes:?} bytes")]
    Allocation { bytes: usize },
    #[error("swizzle precondition violated: {0}")]
    Precondition(#[from] SwizzleError),
    #[error("vram error: {0}")]
    Vram(#[from] VramError),
    #[error("unsupported texture dimensions: {width:?}, {height:?}")]
    UnsupportedDimensions { width: u32, height: u32 },
    #[error("unsupported texture format: {format:?}")]
    UnsupportedFormat { format: TexturePixelFormat },
    #[error("texture data is {actual:?} bytes, expected {expected:?}")]
    DataLength { expected: usize, actual: usize },
    #[error("texture data is not resident in the given video memory")]
    NotResident,
}

pub type Result<T, E = Error> = core::result::Result<T, E>;

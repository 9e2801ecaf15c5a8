//! Loading images as swizzled GE textures, in host memory or in a static
//! video memory arena.
//!
//! Without the default `std` feature the crate is `no_std`: textures are
//! uploaded from prebuilt [`TextureFile`](psp_file_formats::texture::TextureFile)s
//! with [`Texture::from_file`] instead of being decoded from images.

#![cfg_attr(not(any(feature = "std", test)), no_std)]

extern crate alloc;

#[cfg(feature = "std")]
pub mod decode;
mod error;
#[cfg(feature = "std")]
pub mod loader;
pub mod mem;
pub mod padding;
#[cfg(feature = "psp")]
pub mod psp;
pub mod swizzle;
pub mod texture;
pub mod vram;

pub use error::{Error, Result};
#[cfg(feature = "std")]
pub use loader::{LoadOptions, TextureLoader};
pub use texture::{Destination, Texture, TextureData};
pub use vram::{HostVram, VideoMemory, VramArena, VramSlab};

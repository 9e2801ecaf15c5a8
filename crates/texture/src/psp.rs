use core::ffi::c_void;

use psp::sys::*;

use crate::error::Result;
use crate::texture::Texture;
use crate::vram::{VideoMemory, VramArena};

/// The console's embedded graphics DRAM.
#[derive(Debug, Default, Clone, Copy)]
pub struct Edram;

impl VideoMemory for Edram {
    fn base_address(&self) -> usize {
        unsafe { sceGeEdramGetAddr() as usize }
    }

    fn capacity(&self) -> usize {
        unsafe { sceGeEdramGetSize() as usize }
    }

    fn slab(&self, offset: usize, len: usize) -> Option<&[u8]> {
        if offset.checked_add(len)? > self.capacity() {
            return None;
        }
        // SAFETY: the range lies inside EDRAM, which is mapped for the
        // lifetime of the program.
        unsafe {
            Some(core::slice::from_raw_parts(
                (self.base_address() + offset) as *const u8,
                len,
            ))
        }
    }

    fn slab_mut(&mut self, offset: usize, len: usize) -> Option<&mut [u8]> {
        if offset.checked_add(len)? > self.capacity() {
            return None;
        }
        // SAFETY: as above; `&mut self` keeps writers exclusive.
        unsafe {
            Some(core::slice::from_raw_parts_mut(
                (self.base_address() + offset) as *mut u8,
                len,
            ))
        }
    }

    fn flush(&mut self) {
        unsafe { sceKernelDcacheWritebackInvalidateAll() }
    }
}

impl Texture {
    /// Points the GE's texture unit at this texture.
    ///
    /// Fails with [`crate::Error::NotResident`] when the texture's slab is not
    /// mapped in `arena`, leaving the GE state untouched.
    pub fn bind<M: VideoMemory>(&self, arena: &VramArena<M>) -> Result<()> {
        let pixels = self.resident_pixels(arena)?;
        let (width, height) = (self.padded_width() as i32, self.padded_height() as i32);
        unsafe {
            sceGuTexMode(self.format().into(), 0, 0, 1);
            sceGuTexFunc(TextureEffect::Modulate, TextureColorComponent::Rgba);
            sceGuTexFilter(TextureFilter::Nearest, TextureFilter::Nearest);
            sceGuTexWrap(GuTexWrapMode::Repeat, GuTexWrapMode::Repeat);
            sceGuTexImage(
                MipmapLevel::None,
                width,
                height,
                width,
                pixels.as_ptr() as *const c_void,
            );
        }
        Ok(())
    }
}

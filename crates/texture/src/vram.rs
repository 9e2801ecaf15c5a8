//! Static video memory allocation.
//!
//! The GE sees a single flat block of embedded DRAM. Frame buffers, depth
//! buffers and textures are carved out of it front to back by a
//! [`VramArena`] and are never given back.

use psp_file_formats::psp::TexturePixelFormat;
use thiserror::Error;

use crate::mem::AlignedBuffer;

/// Size of the PSP's embedded graphics DRAM.
pub const EDRAM_SIZE: usize = 0x20_0000;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum VramError {
    #[error("out of video memory: requested {requested:?} bytes, {remaining:?} remaining")]
    OutOfMemory { requested: usize, remaining: usize },
    #[error("video memory at {offset:#x} ({len:?} bytes) is not mapped")]
    Unmapped { offset: usize, len: usize },
}

/// The video memory a [`VramArena`] hands out.
pub trait VideoMemory {
    /// Address the GE uses for offset zero.
    fn base_address(&self) -> usize;

    fn capacity(&self) -> usize;

    fn slab(&self, offset: usize, len: usize) -> Option<&[u8]>;

    fn slab_mut(&mut self, offset: usize, len: usize) -> Option<&mut [u8]>;

    /// Makes CPU writes visible to the GE.
    fn flush(&mut self) {}
}

/// Heap-backed stand-in for EDRAM, for tools and tests running off-console.
#[derive(Debug)]
pub struct HostVram {
    base_address: usize,
    bytes: AlignedBuffer,
}

impl HostVram {
    /// Where `sceGeEdramGetAddr` places EDRAM on hardware.
    pub const DEFAULT_BASE_ADDRESS: usize = 0x0400_0000;

    pub fn new() -> Self {
        Self::with_capacity(EDRAM_SIZE)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            base_address: Self::DEFAULT_BASE_ADDRESS,
            bytes: AlignedBuffer::zeroed(capacity),
        }
    }

    pub fn with_base_address(self, base_address: usize) -> Self {
        Self {
            base_address,
            ..self
        }
    }
}

impl Default for HostVram {
    fn default() -> Self {
        Self::new()
    }
}

impl VideoMemory for HostVram {
    fn base_address(&self) -> usize {
        self.base_address
    }

    fn capacity(&self) -> usize {
        self.bytes.len()
    }

    fn slab(&self, offset: usize, len: usize) -> Option<&[u8]> {
        self.bytes.as_bytes().get(offset..offset.checked_add(len)?)
    }

    fn slab_mut(&mut self, offset: usize, len: usize) -> Option<&mut [u8]> {
        self.bytes
            .as_bytes_mut()
            .get_mut(offset..offset.checked_add(len)?)
    }
}

/// A region handed out by [`VramArena::try_allocate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VramSlab {
    /// Offset from the start of video memory.
    pub offset: usize,
    /// Absolute address as seen by the GE.
    pub address: usize,
    pub len: usize,
}

/// Forward-only allocator over a [`VideoMemory`].
///
/// Offsets are handed out in call order with no alignment padding, and
/// nothing is ever freed.
#[derive(Debug)]
pub struct VramArena<M> {
    memory: M,
    offset: usize,
}

impl<M: VideoMemory> VramArena<M> {
    pub fn new(memory: M) -> Self {
        Self { memory, offset: 0 }
    }

    /// Reserves room for a `width` x `height` buffer in `format` and returns
    /// its offset. No bounds checking is done against the memory capacity.
    pub fn allocate(&mut self, width: u32, height: u32, format: TexturePixelFormat) -> usize {
        let size = format.memory_size(width, height);
        let offset = self.offset;
        self.offset += size;
        log::trace!("vram: {width}x{height} {format:?} at {offset:#x} ({size} bytes)");
        offset
    }

    /// Like [`allocate`](Self::allocate), returning the absolute address.
    pub fn allocate_texture(
        &mut self,
        width: u32,
        height: u32,
        format: TexturePixelFormat,
    ) -> usize {
        let offset = self.allocate(width, height, format);
        self.absolute_address(offset)
    }

    /// Checked allocation. The cursor does not move when it fails.
    pub fn try_allocate(
        &mut self,
        width: u32,
        height: u32,
        format: TexturePixelFormat,
    ) -> Result<VramSlab, VramError> {
        let len = format.memory_size(width, height);
        let remaining = self.remaining();
        if len > remaining {
            return Err(VramError::OutOfMemory {
                requested: len,
                remaining,
            });
        }
        if self.memory.slab_mut(self.offset, len).is_none() {
            return Err(VramError::Unmapped {
                offset: self.offset,
                len,
            });
        }
        let offset = self.allocate(width, height, format);
        Ok(VramSlab {
            offset,
            address: self.absolute_address(offset),
            len,
        })
    }

    pub fn absolute_address(&self, offset: usize) -> usize {
        offset + self.memory.base_address()
    }

    /// Current cursor: the offset the next allocation will receive.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.memory.capacity().saturating_sub(self.offset)
    }

    pub fn slab(&self, slab: &VramSlab) -> Option<&[u8]> {
        self.memory.slab(slab.offset, slab.len)
    }

    pub fn slab_mut(&mut self, slab: &VramSlab) -> Option<&mut [u8]> {
        self.memory.slab_mut(slab.offset, slab.len)
    }

    pub fn memory(&self) -> &M {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut M {
        &mut self.memory
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUF_WIDTH: u32 = 512;
    const SCR_HEIGHT: u32 = 272;

    #[test]
    fn offsets_are_prefix_sums() {
        let mut arena = VramArena::new(HostVram::new());
        let requests = [
            (16, 8, TexturePixelFormat::PsmT4),
            (32, 32, TexturePixelFormat::Psm8888),
            (64, 16, TexturePixelFormat::Psm5551),
            (8, 8, TexturePixelFormat::PsmT8),
            (128, 64, TexturePixelFormat::PsmT32),
        ];

        let mut expected = 0;
        let mut ranges = vec![];
        for (width, height, format) in requests {
            let offset = arena.allocate(width, height, format);
            assert_eq!(offset, expected);
            let size = format.memory_size(width, height);
            ranges.push(offset..offset + size);
            expected += size;
        }
        assert_eq!(arena.offset(), expected);

        for (a, b) in ranges.iter().zip(ranges.iter().skip(1)) {
            assert!(a.end <= b.start);
        }
    }

    #[test]
    fn frame_buffers_then_texture() {
        let mut arena = VramArena::new(HostVram::new());
        let draw = arena.allocate(BUF_WIDTH, SCR_HEIGHT, TexturePixelFormat::Psm8888);
        let display = arena.allocate(BUF_WIDTH, SCR_HEIGHT, TexturePixelFormat::Psm8888);
        let depth = arena.allocate(BUF_WIDTH, SCR_HEIGHT, TexturePixelFormat::Psm4444);
        assert_eq!(draw, 0);
        assert_eq!(display, 0x8_8000);
        assert_eq!(depth, 0x11_0000);

        let texture = arena.allocate_texture(128, 64, TexturePixelFormat::Psm8888);
        assert_eq!(texture, HostVram::DEFAULT_BASE_ADDRESS + 0x15_4000);
    }

    #[test]
    fn allocation_does_not_check_capacity() {
        let mut arena = VramArena::new(HostVram::with_capacity(64));
        assert_eq!(arena.allocate(16, 16, TexturePixelFormat::Psm8888), 0);
        assert_eq!(arena.allocate(16, 16, TexturePixelFormat::Psm8888), 1024);
        assert_eq!(arena.remaining(), 0);
    }

    #[test]
    fn try_allocate_keeps_cursor_on_failure() {
        let mut arena = VramArena::new(HostVram::with_capacity(4096).with_base_address(0x1000));
        let slab = arena
            .try_allocate(16, 32, TexturePixelFormat::Psm8888)
            .unwrap();
        assert_eq!(
            slab,
            VramSlab {
                offset: 0,
                address: 0x1000,
                len: 2048
            }
        );

        assert_eq!(
            arena.try_allocate(32, 32, TexturePixelFormat::Psm8888),
            Err(VramError::OutOfMemory {
                requested: 4096,
                remaining: 2048
            })
        );
        assert_eq!(arena.offset(), 2048);

        let slab = arena
            .try_allocate(32, 16, TexturePixelFormat::Psm8888)
            .unwrap();
        assert_eq!(slab.address, 0x1000 + 2048);
        assert_eq!(arena.remaining(), 0);
    }

    #[test]
    fn empty_allocations_share_the_cursor() {
        let mut arena = VramArena::new(HostVram::new());
        assert_eq!(arena.allocate(0, 64, TexturePixelFormat::Psm8888), 0);
        assert_eq!(arena.allocate(16, 16, TexturePixelFormat::PsmT8), 0);
        assert_eq!(arena.offset(), 256);
    }

    #[test]
    fn compressed_formats_do_not_advance() {
        let mut arena = VramArena::new(HostVram::new());
        arena.allocate(16, 16, TexturePixelFormat::PsmT8);
        assert_eq!(arena.allocate(128, 128, TexturePixelFormat::PsmDxt1), 256);
        assert_eq!(arena.allocate(128, 128, TexturePixelFormat::PsmDxt5), 256);
        assert_eq!(arena.offset(), 256);
    }

    /// Reports capacity but maps nothing.
    struct Unmapped;

    impl VideoMemory for Unmapped {
        fn base_address(&self) -> usize {
            0
        }

        fn capacity(&self) -> usize {
            EDRAM_SIZE
        }

        fn slab(&self, _: usize, _: usize) -> Option<&[u8]> {
            None
        }

        fn slab_mut(&mut self, _: usize, _: usize) -> Option<&mut [u8]> {
            None
        }
    }

    #[test]
    fn unmapped_memory_keeps_cursor() {
        let mut arena = VramArena::new(Unmapped);
        assert_eq!(
            arena.try_allocate(16, 16, TexturePixelFormat::Psm8888),
            Err(VramError::Unmapped {
                offset: 0,
                len: 1024
            })
        );
        assert_eq!(arena.offset(), 0);
    }

    #[test]
    fn slabs_stay_inside_memory() {
        let mut arena = VramArena::new(HostVram::with_capacity(256));
        let slab = arena.try_allocate(8, 8, TexturePixelFormat::Psm8888).unwrap();
        arena.slab_mut(&slab).unwrap().fill(0x42);
        assert!(arena.slab(&slab).unwrap().iter().all(|&b| b == 0x42));

        let outside = VramSlab {
            offset: 255,
            address: 0,
            len: 2,
        };
        assert!(arena.slab(&outside).is_none());
        assert!(arena.memory().slab(usize::MAX, 2).is_none());
    }
}

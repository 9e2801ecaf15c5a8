//! Conversion between row-major texels and the GE's tiled texture layout.
//!
//! A swizzled texture is a sequence of tiles, each 16 bytes wide and 8 rows
//! tall, stored back to back. Tiles are ordered left to right, then top to
//! bottom, and the 8 rows of a tile are contiguous. The layout only depends
//! on the row pitch in bytes, so it applies to every non-encoded pixel format.

use thiserror::Error;

/// Tile width in bytes.
pub const BLOCK_WIDTH: usize = 16;
/// Tile height in rows.
pub const BLOCK_HEIGHT: usize = 8;

type BlockRow = [u8; BLOCK_WIDTH];

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SwizzleError {
    #[error("unaligned dimensions: {width:?} bytes x {height:?} rows is not a multiple of 16 x 8")]
    UnalignedDimensions { width: usize, height: usize },
    #[error("dimensions overflow: {width:?} bytes x {height:?} rows")]
    Overflow { width: usize, height: usize },
    #[error("not enough data: expected {expected_size:?} bytes, got {actual_size:?}")]
    NotEnoughData {
        expected_size: usize,
        actual_size: usize,
    },
}

/// Validates a `width` (bytes per row) x `height` (rows) surface against the
/// tile grid and a buffer of `len` bytes, returning the surface size.
pub fn check_dimensions(width: usize, height: usize, len: usize) -> Result<usize, SwizzleError> {
    if width % BLOCK_WIDTH != 0 || height % BLOCK_HEIGHT != 0 {
        return Err(SwizzleError::UnalignedDimensions { width, height });
    }
    let expected_size = width
        .checked_mul(height)
        .ok_or(SwizzleError::Overflow { width, height })?;
    if len < expected_size {
        return Err(SwizzleError::NotEnoughData {
            expected_size,
            actual_size: len,
        });
    }
    Ok(expected_size)
}

/// Size in bytes of the swizzled form of a `width` x `height` surface.
/// Swizzling never changes the size.
pub fn swizzled_size(width: usize, height: usize) -> usize {
    width * height
}

/// Rearranges the row-major surface `input` into tiles in `out`.
///
/// `width` is the row pitch in bytes and must be a multiple of 16; `height`
/// must be a multiple of 8.
pub fn swizzle(
    out: &mut [u8],
    input: &[u8],
    width: usize,
    height: usize,
) -> Result<(), SwizzleError> {
    swizzle_inner::<false>(out, input, width, height)
}

/// Inverse of [`swizzle`].
pub fn unswizzle(
    out: &mut [u8],
    input: &[u8],
    width: usize,
    height: usize,
) -> Result<(), SwizzleError> {
    swizzle_inner::<true>(out, input, width, height)
}

fn swizzle_inner<const UNSWIZZLE: bool>(
    out: &mut [u8],
    input: &[u8],
    width: usize,
    height: usize,
) -> Result<(), SwizzleError> {
    let size = check_dimensions(width, height, input.len())?;
    check_dimensions(width, height, out.len())?;

    let src: &[BlockRow] = bytemuck::cast_slice(&input[..size]);
    let dst: &mut [BlockRow] = bytemuck::cast_slice_mut(&mut out[..size]);

    let row_blocks = width / BLOCK_WIDTH;
    let mut tiled = 0;
    for block_y in 0..height / BLOCK_HEIGHT {
        for block_x in 0..row_blocks {
            let mut linear = block_y * BLOCK_HEIGHT * row_blocks + block_x;
            for _ in 0..BLOCK_HEIGHT {
                if UNSWIZZLE {
                    dst[linear] = src[tiled];
                } else {
                    dst[tiled] = src[linear];
                }
                tiled += 1;
                linear += row_blocks;
            }
        }
    }

    log::trace!(
        "{} {width}x{height} surface",
        if UNSWIZZLE { "unswizzled" } else { "swizzled" }
    );
    Ok(())
}

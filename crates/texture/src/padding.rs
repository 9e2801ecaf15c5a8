/// Smallest power of two that is `>= value`. Zero rounds up to one.
///
/// Panics on overflow for values above `2^31`.
pub fn next_pow2(value: u32) -> u32 {
    value.max(1).next_power_of_two()
}

/// Storage dimensions the GE addresses a `width` x `height` texture at.
pub fn padded_dimensions(width: u32, height: u32) -> (u32, u32) {
    (next_pow2(width), next_pow2(height))
}

/// Copies a tightly packed `width` x `height` block of pixels into `dest`,
/// whose rows are `padded_width` pixels apart.
///
/// Pixels of `dest` outside the block are left as they were.
///
/// Panics if `dest` holds fewer than `padded_width * height` pixels, `src`
/// fewer than `width * height`, or `padded_width < width`.
pub fn copy_padded(dest: &mut [u32], src: &[u32], padded_width: u32, width: u32, height: u32) {
    let (padded_width, width, height) = (padded_width as usize, width as usize, height as usize);
    if width == 0 || height == 0 {
        return;
    }
    assert!(padded_width >= width, "stride {padded_width} is narrower than {width}");

    let dest = &mut dest[..padded_width * height];
    let src = &src[..width * height];
    dest.chunks_exact_mut(padded_width)
        .zip(src.chunks_exact(width))
        .for_each(|(dest_row, src_row)| dest_row[..width].copy_from_slice(src_row));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_pow2_is_smallest_power_above() {
        for value in 1..=(1u32 << 20) {
            let pow2 = next_pow2(value);
            assert!(pow2.is_power_of_two());
            assert!(pow2 >= value);
            assert!(pow2 / 2 < value);
        }
    }

    #[test]
    fn next_pow2_keeps_powers_of_two() {
        for shift in 0..32 {
            assert_eq!(next_pow2(1 << shift), 1 << shift);
        }
        assert_eq!(next_pow2(0), 1);
    }

    #[test]
    fn padded_dimensions_round_each_axis() {
        assert_eq!(padded_dimensions(100, 50), (128, 64));
        assert_eq!(padded_dimensions(480, 272), (512, 512));
        assert_eq!(padded_dimensions(1, 1), (1, 1));
    }

    #[test]
    fn copy_padded_keeps_padding() {
        let src = [1, 2, 3, 4, 5, 6];
        let mut dest = [0xdead_beef_u32; 4 * 4];
        copy_padded(&mut dest, &src, 4, 3, 2);
        #[rustfmt::skip]
        assert_eq!(
            dest,
            [
                1, 2, 3, 0xdead_beef,
                4, 5, 6, 0xdead_beef,
                0xdead_beef, 0xdead_beef, 0xdead_beef, 0xdead_beef,
                0xdead_beef, 0xdead_beef, 0xdead_beef, 0xdead_beef,
            ]
        );
    }

    #[test]
    fn copy_padded_same_width_is_plain_copy() {
        let src: Vec<u32> = (0..64).collect();
        let mut dest = vec![0; 64];
        copy_padded(&mut dest, &src, 8, 8, 8);
        assert_eq!(dest, src);
    }

    #[test]
    #[should_panic]
    fn copy_padded_short_destination_panics() {
        let src = [1u32; 4 * 4];
        let mut dest = [0u32; 8 * 3];
        copy_padded(&mut dest, &src, 8, 4, 4);
    }

    #[test]
    #[should_panic]
    fn copy_padded_short_source_panics() {
        let src = [1u32; 4 * 3];
        let mut dest = [0u32; 8 * 4];
        copy_padded(&mut dest, &src, 8, 4, 4);
    }

    #[test]
    #[should_panic]
    fn copy_padded_narrow_stride_panics() {
        let src = [1u32; 4 * 4];
        let mut dest = [0u32; 4 * 4];
        copy_padded(&mut dest, &src, 2, 4, 4);
    }

    #[test]
    fn copy_padded_empty_source_is_noop() {
        let mut dest = [7u32; 4];
        copy_padded(&mut dest, &[], 2, 0, 2);
        assert_eq!(dest, [7; 4]);
    }
}

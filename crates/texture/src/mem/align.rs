#[repr(C, align(16))]
#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
pub struct Align16<T>(pub T);

/// One swizzle block row: sixteen bytes on a sixteen byte boundary.
pub type Line = Align16<[u8; 16]>;

// SAFETY: `Line` is sixteen bytes with sixteen byte alignment, so it has no
// padding and every bit pattern is a valid value.
unsafe impl bytemuck::Zeroable for Line {}
unsafe impl bytemuck::Pod for Line {}

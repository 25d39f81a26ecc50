//! Utilities.

/// Returns ceiling log2.
pub const fn clog2(value: usize) -> usize {
    if value == 0 {
        0
    } else {
        (::std::mem::size_of::<usize>() * 8) - (value - 1).leading_zeros() as usize
    }
}

/// Returns the number of bits needed to represent `value` itself (at least one).
///
/// Window registers are sized with this so that `size == depth` fits.
pub const fn bits_for(value: usize) -> usize {
    let width = clog2(value + 1);
    if width == 0 {
        1
    } else {
        width
    }
}

/// Returns a mask covering the low `width` bits.
pub const fn mask(width: usize) -> u64 {
    if width >= 64 {
        u64::MAX
    } else {
        (1 << width) - 1
    }
}

/// Returns bit-represented value of an integer, least significant bit first.
pub fn u64_to_bits<const N: usize>(value: u64) -> [bool; N] {
    ::std::array::from_fn(|i| i < 64 && (value >> i) & 1 == 1)
}

/// Packs bits, least significant bit first, into an integer index.
pub fn bits_to_index(bits: &[bool]) -> usize {
    bits.iter().enumerate().fold(0, |index, (i, bit)| index | (usize::from(*bit) << i))
}

/// Returns `ptr + 1` wrapped at the literal `depth`.
pub const fn wrapping_inc(ptr: usize, depth: usize) -> usize {
    if ptr + 1 >= depth {
        0
    } else {
        ptr + 1
    }
}

/// Returns `ptr - by` wrapped at the literal `depth`. `by` must not exceed `depth`.
pub const fn wrapping_sub(ptr: usize, by: usize, depth: usize) -> usize { (ptr + depth - by) % depth }

/// Fold `data` into an FNV-1a 32-bit hash state.
///
/// Start from [`FNV1A_OFFSET_BASIS`] for a fresh hash, or from a previous
/// result to continue hashing across several buffers.
#[inline]
pub(crate) const fn fnv1a(mut hash: u32, data: &[u8]) -> u32 {
    const FNV1A_PRIME: u32 = 0x0100_0193;
    let mut i = 0;

    while i < data.len() {
        hash ^= data[i] as u32;
        hash = hash.wrapping_mul(FNV1A_PRIME);
        i += 1;
    }

    hash
}

/// Initial FNV-1a 32-bit hash state.
pub(crate) const FNV1A_OFFSET_BASIS: u32 = 0x811C_9DC5;

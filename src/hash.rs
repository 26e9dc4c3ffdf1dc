//! One-at-a-time string hash and its reduction to a slot index.

/// Jenkins one-at-a-time hash over the key's bytes.
///
/// Bytes are mixed in as unsigned values with wrapping `u64` arithmetic, so
/// the result is identical on every platform.
#[inline]
pub fn one_at_a_time(key: &str) -> u64 {
    let mut h: u64 = 0;
    for &b in key.as_bytes() {
        h = h.wrapping_add(u64::from(b));
        h = h.wrapping_add(h << 10);
        h ^= h >> 6;
    }
    h = h.wrapping_add(h << 3);
    h ^= h >> 11;
    h = h.wrapping_add(h << 15);
    h
}

/// Home slot of `key` in a table of `capacity` slots.
///
/// The same key lands on different slots at different capacities, which is
/// why resizing rebuilds the table instead of copying slots.
#[inline]
pub fn bucket(key: &str, capacity: usize) -> usize {
    debug_assert!(capacity > 0, "bucket() on a zero-capacity table");
    (one_at_a_time(key) % capacity as u64) as usize
}

//! Short random identifiers for rooms and components.

use rand::Rng;

/// Leading marker shared by every generated identifier.
pub const UID_PREFIX: char = '_';

const UID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const UID_SUFFIX_LEN: usize = 9;

/// Generate a new identifier such as `_k3j9x0q2m`.
///
/// Uniqueness is statistical only; collisions are not checked.
pub fn new_uid() -> String {
    let mut rng = rand::thread_rng();
    let mut uid = String::with_capacity(UID_SUFFIX_LEN + 1);
    uid.push(UID_PREFIX);
    for _ in 0..UID_SUFFIX_LEN {
        let idx = rng.gen_range(0..UID_ALPHABET.len());
        uid.push(UID_ALPHABET[idx] as char);
    }
    uid
}

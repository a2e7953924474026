use rand::Rng;

/// Produces the storage key a patch's blob is written under.
///
/// The default prepends a short random prefix so consecutive patches land in
/// different key ranges of the store; swap the strategy when the target
/// store's partitioning wants a different hint.
pub trait KeyStrategy {
    fn key_for(&self, patch: &str) -> String;
}

const HEX: &[u8; 16] = b"0123456789abcdef";

/// Random lowercase hex prefix followed by the patch identifier.
#[derive(Debug, Clone)]
pub struct HexPrefix {
    pub len: usize,
}

impl Default for HexPrefix {
    fn default() -> Self {
        Self { len: 6 }
    }
}

impl KeyStrategy for HexPrefix {
    fn key_for(&self, patch: &str) -> String {
        let mut rng = rand::thread_rng();
        let mut key = String::with_capacity(self.len + patch.len());
        for _ in 0..self.len {
            key.push(HEX[rng.gen_range(0..HEX.len())] as char);
        }
        key.push_str(patch);
        key
    }
}

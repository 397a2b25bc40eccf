//! Randomness source abstraction.
//!
//! Every operation that needs fresh bytes (key generation, salts, nonces,
//! ephemeral key pairs) draws them from an [`Entropy`] implementation. This
//! keeps the cryptographic code free of global RNG state and lets tests
//! substitute deterministic sources.

/// Source of random bytes.
///
/// # Security
///
/// Implementations MUST use cryptographically secure entropy in production
/// and MUST be safe to share across threads without producing correlated
/// output.
pub trait Entropy: Send + Sync {
    /// Fills the provided buffer with random bytes.
    fn fill(&self, buffer: &mut [u8]);

    /// Returns `N` random bytes.
    fn bytes<const N: usize>(&self) -> [u8; N]
    where
        Self: Sized,
    {
        let mut bytes = [0u8; N];
        self.fill(&mut bytes);
        bytes
    }
}

/// Production entropy backed by the operating system RNG.
///
/// # Panics
///
/// Panics if the OS RNG fails. Continuing without functioning randomness
/// would produce predictable keys and nonces.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEntropy;

impl Entropy for SystemEntropy {
    #[allow(clippy::expect_used)]
    fn fill(&self, buffer: &mut [u8]) {
        getrandom::fill(buffer)
            .expect("invariant: OS RNG failure is unrecoverable - cannot generate secrets");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_entropy_bytes_are_random() {
        let entropy = SystemEntropy;

        let bytes1: [u8; 32] = entropy.bytes();
        let bytes2: [u8; 32] = entropy.bytes();

        // Extremely unlikely to be equal if random
        assert_ne!(bytes1, bytes2, "random bytes should differ");
    }

    #[test]
    fn system_entropy_fills_buffer() {
        let mut bytes = [0u8; 64];
        SystemEntropy.fill(&mut bytes);

        let non_zero_count = bytes.iter().filter(|&&b| b != 0).count();
        assert!(non_zero_count > 32, "most bytes should be non-zero");
    }

    #[test]
    fn system_entropy_is_usable_across_threads() {
        let handles: Vec<_> = (0..4)
            .map(|_| std::thread::spawn(|| SystemEntropy.bytes::<32>()))
            .collect();

        let outputs: Vec<[u8; 32]> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        for i in 0..outputs.len() {
            for j in (i + 1)..outputs.len() {
                assert_ne!(outputs[i], outputs[j], "threads must not share output");
            }
        }
    }
}

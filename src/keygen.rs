/*!
 * Symmetric Key Generator
 *
 * Produces fresh symmetric keys from the provider's secure random source.
 * Generation is a pure `(algorithm, size) -> bytes` function: nothing is
 * kept between calls.
 */

use std::fmt;
use std::sync::Arc;

use crate::error::{CryptoError, CryptoResult};
use crate::provider::CryptoProvider;
use crate::secure_memory::SecureBytes;

/// Shortest HMAC key accepted, in bits
const MIN_HMAC_KEY_BITS: usize = 40;
/// Longest HMAC key accepted, in bits
pub const MAX_HMAC_KEY_BITS: usize = 8192;

/// Symmetric algorithms known to the key generator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymmetricAlgorithm {
    Aes,
    ChaCha20,
    HmacSha256,
    HmacSha512,
}

impl SymmetricAlgorithm {
    /// Every algorithm, in registry order
    pub const ALL: [SymmetricAlgorithm; 4] = [
        SymmetricAlgorithm::Aes,
        SymmetricAlgorithm::ChaCha20,
        SymmetricAlgorithm::HmacSha256,
        SymmetricAlgorithm::HmacSha512,
    ];

    /// Canonical name
    pub fn name(&self) -> &'static str {
        match self {
            SymmetricAlgorithm::Aes => "AES",
            SymmetricAlgorithm::ChaCha20 => "ChaCha20",
            SymmetricAlgorithm::HmacSha256 => "HmacSHA256",
            SymmetricAlgorithm::HmacSha512 => "HmacSHA512",
        }
    }

    /// Look an algorithm up by name, ignoring case
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|algorithm| algorithm.name().eq_ignore_ascii_case(name.trim()))
    }

    /// Key size used when the caller has no preference
    pub fn default_key_bits(&self) -> usize {
        match self {
            SymmetricAlgorithm::Aes => 128,
            SymmetricAlgorithm::ChaCha20 => 256,
            SymmetricAlgorithm::HmacSha256 => 256,
            SymmetricAlgorithm::HmacSha512 => 512,
        }
    }

    /// Check `bits` against the sizes this algorithm allows
    pub fn validate_key_bits(&self, bits: usize) -> CryptoResult<()> {
        let valid = match self {
            SymmetricAlgorithm::Aes => matches!(bits, 128 | 192 | 256),
            SymmetricAlgorithm::ChaCha20 => bits == 256,
            SymmetricAlgorithm::HmacSha256 | SymmetricAlgorithm::HmacSha512 => {
                (MIN_HMAC_KEY_BITS..=MAX_HMAC_KEY_BITS).contains(&bits)
            }
        };

        if valid {
            Ok(())
        } else {
            Err(CryptoError::InvalidKeySize {
                algorithm: self.name().to_string(),
                bits,
            })
        }
    }

    /// Bytes of key material for `bits`; HMAC sizes round up
    pub fn key_len(&self, bits: usize) -> usize {
        bits / 8 + usize::from(bits % 8 != 0)
    }
}

impl fmt::Display for SymmetricAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Generates symmetric keys through a provider
#[derive(Clone)]
pub struct SymmetricKeyGenerator {
    provider: Arc<dyn CryptoProvider>,
}

impl SymmetricKeyGenerator {
    pub fn new(provider: Arc<dyn CryptoProvider>) -> Self {
        Self { provider }
    }

    /// Generate raw key bytes for `algorithm` of `bits` length
    ///
    /// # Errors
    ///
    /// * `UnsupportedAlgorithm` if the provider does not know `algorithm`
    /// * `InvalidKeySize` if `bits` is not valid for it
    ///
    /// # Example
    ///
    /// ```
    /// use keyvault::keygen::SymmetricKeyGenerator;
    /// use keyvault::provider::DefaultProvider;
    ///
    /// let generator = SymmetricKeyGenerator::new(DefaultProvider::shared());
    /// let key = generator.generate("AES", 128).unwrap();
    /// assert_eq!(key.len(), 16);
    /// ```
    pub fn generate(&self, algorithm: &str, bits: usize) -> CryptoResult<SecureBytes> {
        let resolved = self.provider.symmetric_algorithm(algorithm)?;
        resolved.validate_key_bits(bits)?;

        let mut key = SecureBytes::zeroed(resolved.key_len(bits));
        self.provider.fill_random(key.as_bytes_mut())?;

        log::debug!("Generated {}-bit {} key", bits, resolved);
        Ok(key)
    }
}

impl fmt::Debug for SymmetricKeyGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SymmetricKeyGenerator")
            .field("provider", &self.provider.name())
            .finish()
    }
}

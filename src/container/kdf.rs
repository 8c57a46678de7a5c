// Pass-phrase key derivation for container and entry protection

use argon2::{Algorithm, Argon2, Params, Version};
use serde::{Deserialize, Serialize};

use crate::config::ProviderConfig;
use crate::container::encoding::base64_bytes;
use crate::secure_memory::{Passphrase, SecureBytes};

/// Length of the derived ChaCha20-Poly1305 key in bytes
pub const DERIVED_KEY_LENGTH: usize = 32;

/// Shortest salt Argon2 accepts
const MIN_SALT_LENGTH: usize = 8;

/// Argon2id parameters recorded next to every sealed payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyDerivationParams {
    /// Memory cost (in KiB)
    pub memory_kib: u32,
    /// Time cost (iterations)
    pub iterations: u32,
    /// Parallelism factor
    pub parallelism: u32,
    /// Salt, stored base64-encoded
    #[serde(with = "base64_bytes")]
    pub salt: Vec<u8>,
}

/// Upper bounds on the work a container may ask for
///
/// A container file is untrusted input; its recorded parameters are checked
/// against these ceilings before any derivation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfLimits {
    pub max_memory_kib: u32,
    pub max_iterations: u32,
    pub max_parallelism: u32,
}

impl From<&ProviderConfig> for KdfLimits {
    fn from(config: &ProviderConfig) -> Self {
        Self {
            max_memory_kib: config.max_kdf_memory_kib,
            max_iterations: config.max_kdf_iterations,
            max_parallelism: config.max_kdf_parallelism,
        }
    }
}

impl Default for KdfLimits {
    fn default() -> Self {
        KdfLimits::from(&ProviderConfig::default())
    }
}

impl KeyDerivationParams {
    /// Reject parameters that are out of bounds or that Argon2 cannot run
    pub fn check(&self, limits: &KdfLimits) -> Result<(), String> {
        if self.memory_kib > limits.max_memory_kib {
            return Err(format!(
                "memory cost {} KiB exceeds the {} KiB ceiling",
                self.memory_kib, limits.max_memory_kib
            ));
        }
        if self.iterations > limits.max_iterations {
            return Err(format!(
                "time cost {} exceeds the ceiling of {}",
                self.iterations, limits.max_iterations
            ));
        }
        if self.parallelism > limits.max_parallelism {
            return Err(format!(
                "parallelism {} exceeds the ceiling of {}",
                self.parallelism, limits.max_parallelism
            ));
        }
        if self.salt.len() < MIN_SALT_LENGTH {
            return Err(format!(
                "salt of {} bytes is shorter than {}",
                self.salt.len(),
                MIN_SALT_LENGTH
            ));
        }
        Ok(())
    }

    /// Derive the 32-byte key protecting a sealed payload
    pub fn derive_key(&self, passphrase: &Passphrase) -> Result<SecureBytes, String> {
        let params = Params::new(
            self.memory_kib,
            self.iterations,
            self.parallelism,
            Some(DERIVED_KEY_LENGTH),
        )
        .map_err(|e| format!("invalid Argon2 parameters: {}", e))?;

        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

        let mut key = SecureBytes::zeroed(DERIVED_KEY_LENGTH);
        argon2
            .hash_password_into(passphrase.as_bytes(), &self.salt, key.as_bytes_mut())
            .map_err(|e| format!("failed to derive key: {}", e))?;

        Ok(key)
    }
}

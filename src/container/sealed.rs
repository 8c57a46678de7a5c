// Pass-phrase sealed payloads (Argon2id + ChaCha20-Poly1305)

use chacha20poly1305::{
    aead::{Aead, KeyInit, Payload},
    ChaCha20Poly1305, Key, Nonce,
};
use serde::{Deserialize, Serialize};

use crate::container::encoding::base64_bytes;
use crate::container::kdf::{KdfLimits, KeyDerivationParams};
use crate::secure_memory::{Passphrase, SecureBytes};

/// ChaCha20-Poly1305 nonce length in bytes
pub const NONCE_LENGTH: usize = 12;

/// A payload encrypted under a key derived from a pass-phrase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SealedBox {
    pub kdf: KeyDerivationParams,
    #[serde(with = "base64_bytes")]
    pub nonce: Vec<u8>,
    #[serde(with = "base64_bytes")]
    pub payload: Vec<u8>,
}

/// Why a sealed payload could not be opened
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnsealError {
    /// The box itself is unusable (parameters out of bounds, bad nonce)
    Rejected(String),
    /// Authentication failed: wrong pass-phrase or tampered payload
    Decryption,
}

impl SealedBox {
    /// Decrypt the payload with `passphrase`, authenticating `aad` alongside it
    pub fn open(
        &self,
        passphrase: &Passphrase,
        aad: &[u8],
        limits: &KdfLimits,
    ) -> Result<SecureBytes, UnsealError> {
        self.kdf.check(limits).map_err(UnsealError::Rejected)?;
        if self.nonce.len() != NONCE_LENGTH {
            return Err(UnsealError::Rejected(format!(
                "nonce must be {} bytes, got {}",
                NONCE_LENGTH,
                self.nonce.len()
            )));
        }

        let key = self.kdf.derive_key(passphrase).map_err(UnsealError::Rejected)?;
        let cipher = ChaCha20Poly1305::new(Key::from_slice(key.as_bytes()));

        let plaintext = cipher
            .decrypt(
                Nonce::from_slice(&self.nonce),
                Payload {
                    msg: &self.payload,
                    aad,
                },
            )
            .map_err(|_| UnsealError::Decryption)?;

        Ok(SecureBytes::from(plaintext))
    }

    /// Seal `plaintext` under `passphrase` with a fresh salt and nonce
    #[cfg(test)]
    pub fn seal(
        plaintext: &[u8],
        passphrase: &Passphrase,
        aad: &[u8],
        memory_kib: u32,
        iterations: u32,
    ) -> Self {
        use chacha20poly1305::aead::{AeadCore, OsRng};
        use rand::RngCore;

        let mut salt = vec![0u8; 16];
        rand::rngs::OsRng.fill_bytes(&mut salt);
        let kdf = KeyDerivationParams {
            memory_kib,
            iterations,
            parallelism: 1,
            salt,
        };

        let key = kdf.derive_key(passphrase).unwrap();
        let cipher = ChaCha20Poly1305::new(Key::from_slice(key.as_bytes()));
        let nonce = ChaCha20Poly1305::generate_nonce(&mut OsRng);
        let payload = cipher
            .encrypt(&nonce, Payload { msg: plaintext, aad })
            .unwrap();

        Self {
            kdf,
            nonce: nonce.to_vec(),
            payload,
        }
    }
}

/*!
 * Asymmetric Cipher
 *
 * Single-block RSA encryption and decryption with either half of a key pair.
 *
 * With PKCS#1 v1.5 padding both directions are available:
 *
 * - encrypting with a public key applies type 2 (random) padding, removed by
 *   decrypting with the private key;
 * - encrypting with a private key applies type 1 (0xFF) padding, removed by
 *   decrypting with the public key. Anyone holding the public key can read
 *   the result, so this direction authenticates but does not conceal.
 *
 * OAEP with SHA-256 is only defined for public-key encryption.
 */

use std::fmt;
use std::sync::Arc;

use rand::rngs::OsRng;
use rsa::hazmat::rsa_encrypt;
use rsa::traits::PublicKeyParts;
use rsa::{BigUint, Oaep, Pkcs1v15Encrypt, Pkcs1v15Sign, RsaPublicKey};
use sha2::Sha256;

use crate::config::RsaPadding;
use crate::error::{CryptoError, CryptoResult};
use crate::keys::{PrivateKey, PublicKey};
use crate::provider::CryptoProvider;

/// Bytes of PKCS#1 v1.5 framing around the message
const PKCS1_OVERHEAD: usize = 11;
/// Shortest run of 0xFF bytes in a type 1 block
const PKCS1_MIN_PADDING: usize = 8;
/// SHA-256 output length
const OAEP_HASH_LENGTH: usize = 32;

/// Either half of an RSA key pair
#[derive(Debug, Clone, Copy)]
pub enum CipherKey<'a> {
    Public(&'a PublicKey),
    Private(&'a PrivateKey),
}

impl<'a> From<&'a PublicKey> for CipherKey<'a> {
    fn from(key: &'a PublicKey) -> Self {
        CipherKey::Public(key)
    }
}

impl<'a> From<&'a PrivateKey> for CipherKey<'a> {
    fn from(key: &'a PrivateKey) -> Self {
        CipherKey::Private(key)
    }
}

/// RSA cipher using the padding chosen by the provider
#[derive(Clone)]
pub struct RsaCipher {
    provider: Arc<dyn CryptoProvider>,
}

impl RsaCipher {
    pub fn new(provider: Arc<dyn CryptoProvider>) -> Self {
        Self { provider }
    }

    /// Padding in effect
    pub fn padding(&self) -> RsaPadding {
        self.provider.rsa_padding()
    }

    /// Largest plaintext `encrypt` accepts for `key`
    pub fn max_plaintext_len<'a, K: Into<CipherKey<'a>>>(&self, key: K) -> CryptoResult<usize> {
        let modulus_len = match key.into() {
            CipherKey::Public(key) => key.to_rsa()?.size(),
            CipherKey::Private(key) => key.size(),
        };
        Ok(plaintext_ceiling(self.padding(), modulus_len))
    }

    /// Encrypt one block of `plaintext` with `key`
    ///
    /// # Errors
    ///
    /// * `InvalidKey` if the key is not RSA, or OAEP is asked to encrypt
    ///   with a private key
    /// * `BlockSizeExceeded` if `plaintext` is longer than
    ///   [`max_plaintext_len`](Self::max_plaintext_len)
    pub fn encrypt<'a, K: Into<CipherKey<'a>>>(
        &self,
        key: K,
        plaintext: &[u8],
    ) -> CryptoResult<Vec<u8>> {
        let padding = self.padding();
        match key.into() {
            CipherKey::Public(key) => {
                let rsa_key = key.to_rsa()?;
                check_length(plaintext.len(), plaintext_ceiling(padding, rsa_key.size()))?;

                let result = match padding {
                    RsaPadding::Pkcs1v15 => rsa_key.encrypt(&mut OsRng, Pkcs1v15Encrypt, plaintext),
                    RsaPadding::OaepSha256 => {
                        rsa_key.encrypt(&mut OsRng, Oaep::new::<Sha256>(), plaintext)
                    }
                };
                let ciphertext = result.map_err(|e| {
                    CryptoError::invalid_key(&format!("RSA encryption failed: {}", e))
                })?;

                log::debug!("Encrypted {} bytes with public key", plaintext.len());
                Ok(ciphertext)
            }
            CipherKey::Private(key) => {
                if padding != RsaPadding::Pkcs1v15 {
                    return Err(CryptoError::invalid_key(&format!(
                        "{} cannot encrypt with a private key",
                        padding
                    )));
                }
                check_length(plaintext.len(), plaintext_ceiling(padding, key.size()))?;

                // An unprefixed PKCS#1 v1.5 signature is exactly a type 1 block
                // put through the private-key operation.
                let ciphertext = key
                    .rsa()
                    .sign_with_rng(&mut OsRng, Pkcs1v15Sign::new_unprefixed(), plaintext)
                    .map_err(|e| {
                        CryptoError::invalid_key(&format!("RSA encryption failed: {}", e))
                    })?;

                log::debug!("Encrypted {} bytes with private key", plaintext.len());
                Ok(ciphertext)
            }
        }
    }

    /// Decrypt one block of `ciphertext` with `key`
    ///
    /// # Errors
    ///
    /// * `InvalidKey` if the key is not RSA, or OAEP is asked to decrypt
    ///   with a public key
    /// * `BlockSizeExceeded` if `ciphertext` is longer than the modulus
    /// * `PaddingFailure` if the recovered block is not correctly padded
    pub fn decrypt<'a, K: Into<CipherKey<'a>>>(
        &self,
        key: K,
        ciphertext: &[u8],
    ) -> CryptoResult<Vec<u8>> {
        let padding = self.padding();
        match key.into() {
            CipherKey::Private(key) => {
                check_length(ciphertext.len(), key.size())?;

                let result = match padding {
                    RsaPadding::Pkcs1v15 => key.rsa().decrypt(Pkcs1v15Encrypt, ciphertext),
                    RsaPadding::OaepSha256 => key.rsa().decrypt(Oaep::new::<Sha256>(), ciphertext),
                };
                let plaintext = result.map_err(|_| CryptoError::PaddingFailure)?;

                log::debug!("Decrypted {} bytes with private key", plaintext.len());
                Ok(plaintext)
            }
            CipherKey::Public(key) => {
                if padding != RsaPadding::Pkcs1v15 {
                    return Err(CryptoError::invalid_key(&format!(
                        "{} cannot decrypt with a public key",
                        padding
                    )));
                }
                let rsa_key = key.to_rsa()?;
                check_length(ciphertext.len(), rsa_key.size())?;

                let plaintext = public_decrypt(&rsa_key, ciphertext)?;

                log::debug!("Decrypted {} bytes with public key", plaintext.len());
                Ok(plaintext)
            }
        }
    }
}

impl fmt::Debug for RsaCipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaCipher")
            .field("provider", &self.provider.name())
            .field("padding", &self.padding())
            .finish()
    }
}

fn plaintext_ceiling(padding: RsaPadding, modulus_len: usize) -> usize {
    match padding {
        RsaPadding::Pkcs1v15 => modulus_len.saturating_sub(PKCS1_OVERHEAD),
        RsaPadding::OaepSha256 => modulus_len.saturating_sub(2 * OAEP_HASH_LENGTH + 2),
    }
}

fn check_length(actual: usize, limit: usize) -> CryptoResult<()> {
    if actual > limit {
        return Err(CryptoError::BlockSizeExceeded { actual, limit });
    }
    Ok(())
}

/// Raw public-key operation followed by type 1 unpadding
fn public_decrypt(key: &RsaPublicKey, ciphertext: &[u8]) -> CryptoResult<Vec<u8>> {
    let c = BigUint::from_bytes_be(ciphertext);
    if &c >= key.n() {
        return Err(CryptoError::PaddingFailure);
    }

    let m = rsa_encrypt(key, &c)
        .map_err(|_| CryptoError::PaddingFailure)?
        .to_bytes_be();
    let k = key.size();
    let offset = k.checked_sub(m.len()).ok_or(CryptoError::PaddingFailure)?;
    let mut block = vec![0u8; k];
    block[offset..].copy_from_slice(&m);

    strip_type1_padding(&block)
        .map(<[u8]>::to_vec)
        .ok_or(CryptoError::PaddingFailure)
}

/// `00 01 FF..FF 00 message`, with at least eight 0xFF bytes
fn strip_type1_padding(block: &[u8]) -> Option<&[u8]> {
    if block.len() < PKCS1_OVERHEAD || block[0] != 0x00 || block[1] != 0x01 {
        return None;
    }
    let padded = &block[2..];
    let separator = padded.iter().position(|&b| b != 0xff)?;
    if separator < PKCS1_MIN_PADDING || padded[separator] != 0x00 {
        return None;
    }
    Some(&padded[separator + 1..])
}

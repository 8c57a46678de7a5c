/*!
 * Key Extractor
 *
 * Resolves aliases in a loaded container to key material. Public keys come
 * straight from the entry's certificate and are never pass-phrase gated.
 * Private keys are sealed under their own pass-phrase, independent of the
 * container pass-phrase, and must be unlocked at the moment of use.
 */

use std::fmt;
use std::sync::Arc;

use rsa::pkcs8::PrivateKeyInfo;

use crate::container::sealed::UnsealError;
use crate::container::{ContainerEntry, KeyContainer, VaultFormat};
use crate::error::{CryptoError, CryptoResult};
use crate::provider::CryptoProvider;
use crate::secure_memory::Passphrase;

mod material;

#[cfg(test)]
mod tests;

pub use material::{algorithm_name, PrivateKey, PublicKey, EC_PUBLIC_KEY, ED25519, RSA_ENCRYPTION};

/// Extracts public and private keys from a [`KeyContainer`]
#[derive(Clone)]
pub struct KeyExtractor {
    provider: Arc<dyn CryptoProvider>,
}

impl KeyExtractor {
    pub fn new(provider: Arc<dyn CryptoProvider>) -> Self {
        Self { provider }
    }

    /// Public key of the certificate stored under `alias`
    ///
    /// Returns `Ok(None)` when the container has no such alias, and
    /// `NoContainer` when no container was supplied.
    pub fn public_key(
        &self,
        container: Option<&KeyContainer>,
        alias: &str,
    ) -> CryptoResult<Option<PublicKey>> {
        let container = container.ok_or(CryptoError::NoContainer)?;

        match container.entry(alias) {
            Some(entry) => Ok(Some(entry.public_key().clone())),
            None => {
                log::debug!("Alias '{}' not present", alias);
                Ok(None)
            }
        }
    }

    /// Private key stored under `alias`, unlocked with `key_passphrase`
    ///
    /// Returns `Ok(None)` when the container has no such alias or the alias
    /// holds only a trusted certificate.
    ///
    /// # Errors
    ///
    /// * `NoContainer` if no container was supplied
    /// * `WrongKeyPassphrase` if `key_passphrase` does not unlock the entry
    /// * `UnsupportedAlgorithm` if the provider cannot handle the key's algorithm
    /// * `BadContainer` if the sealed key is corrupted
    pub fn private_key(
        &self,
        container: Option<&KeyContainer>,
        alias: &str,
        key_passphrase: &Passphrase,
    ) -> CryptoResult<Option<PrivateKey>> {
        let container = container.ok_or(CryptoError::NoContainer)?;

        let sealed_key = match container.entry(alias) {
            Some(ContainerEntry::PrivateKey { sealed_key, .. }) => sealed_key,
            Some(ContainerEntry::TrustedCertificate { .. }) => {
                log::debug!("Alias '{}' holds a certificate only", alias);
                return Ok(None);
            }
            None => {
                log::debug!("Alias '{}' not present", alias);
                return Ok(None);
            }
        };

        let encoded = sealed_key
            .open(
                key_passphrase,
                &VaultFormat::key_aad(alias),
                &self.provider.kdf_limits(),
            )
            .map_err(|e| match e {
                UnsealError::Rejected(cause) => CryptoError::bad_container(&cause),
                UnsealError::Decryption => {
                    log::warn!("Wrong key pass-phrase for alias '{}'", alias);
                    CryptoError::WrongKeyPassphrase {
                        alias: alias.to_string(),
                    }
                }
            })?;

        let info = PrivateKeyInfo::try_from(encoded.as_bytes()).map_err(|e| {
            CryptoError::bad_container(&format!("private key of '{}' is malformed: {}", alias, e))
        })?;
        let oid = info.algorithm.oid;
        if !self.provider.supports_key_algorithm(&oid) || oid != RSA_ENCRYPTION {
            let name = algorithm_name(&oid);
            log::warn!("Key algorithm {} of alias '{}' is not available", name, alias);
            return Err(CryptoError::unsupported_algorithm(&name));
        }

        let key = PrivateKey::from_pkcs8_der(encoded.as_bytes()).map_err(|e| {
            CryptoError::bad_container(&format!("private key of '{}' is unusable: {}", alias, e))
        })?;

        log::debug!("Unlocked private key '{}' ({} bits)", alias, key.size() * 8);
        Ok(Some(key))
    }
}

impl fmt::Debug for KeyExtractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyExtractor")
            .field("provider", &self.provider.name())
            .finish()
    }
}

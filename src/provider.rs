/*!
 * Cryptographic Provider
 *
 * A provider supplies the container formats, symmetric algorithms, key
 * algorithms and secure randomness every other component relies on. It is
 * handed to each component at construction; there is no global registry.
 *
 * [`DefaultProvider`] is backed by the RustCrypto crates and registers the
 * `kvs` container format.
 */

use std::fmt;
use std::sync::Arc;

use rand::rngs::OsRng;
use rand::RngCore;
use x509_cert::der::asn1::ObjectIdentifier;

use crate::config::{DigestAlgorithm, ProviderConfig, RsaPadding};
use crate::container::{ContainerFormat, KdfLimits, VaultFormat};
use crate::error::{CryptoError, CryptoResult};
use crate::keygen::SymmetricAlgorithm;
use crate::keys::RSA_ENCRYPTION;

/// Source of algorithms, formats and randomness
pub trait CryptoProvider: Send + Sync {
    /// Provider name, for logs
    fn name(&self) -> &str;

    /// The container format registered as `container_type`, ignoring case
    ///
    /// Returns `UnsupportedFormat` if no such format is registered.
    fn container_format(&self, container_type: &str) -> CryptoResult<&dyn ContainerFormat>;

    /// Container type opened when the caller names none
    fn default_container_type(&self) -> &str;

    /// Ceilings on the key derivation work a container may request
    fn kdf_limits(&self) -> KdfLimits;

    /// The symmetric algorithm registered as `name`, ignoring case
    ///
    /// Returns `UnsupportedAlgorithm` if no such algorithm is registered.
    fn symmetric_algorithm(&self, name: &str) -> CryptoResult<SymmetricAlgorithm>;

    /// Whether private keys of this algorithm can be extracted
    fn supports_key_algorithm(&self, oid: &ObjectIdentifier) -> bool;

    /// Digest used for signatures
    fn signature_digest(&self) -> DigestAlgorithm;

    /// Padding used by the RSA cipher
    fn rsa_padding(&self) -> RsaPadding;

    /// Fill `dest` from a cryptographically secure source
    fn fill_random(&self, dest: &mut [u8]) -> CryptoResult<()>;
}

/// Provider backed by the operating system RNG and the RustCrypto crates
pub struct DefaultProvider {
    config: ProviderConfig,
    formats: Vec<Box<dyn ContainerFormat>>,
}

impl DefaultProvider {
    /// Provider with the default configuration
    pub fn new() -> Self {
        Self::from_valid_config(ProviderConfig::default())
    }

    /// Provider with a custom configuration
    ///
    /// Returns `Configuration` if `config` does not validate.
    pub fn with_config(config: ProviderConfig) -> CryptoResult<Self> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    /// Default provider behind the shared handle components take
    pub fn shared() -> Arc<dyn CryptoProvider> {
        Arc::new(Self::new())
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Names of the registered container formats
    pub fn container_types(&self) -> Vec<&str> {
        self.formats.iter().map(|format| format.name()).collect()
    }

    fn from_valid_config(config: ProviderConfig) -> Self {
        Self {
            config,
            formats: vec![Box::new(VaultFormat)],
        }
    }
}

impl Default for DefaultProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl CryptoProvider for DefaultProvider {
    fn name(&self) -> &str {
        "default"
    }

    fn container_format(&self, container_type: &str) -> CryptoResult<&dyn ContainerFormat> {
        let wanted = container_type.trim();
        self.formats
            .iter()
            .find(|format| format.name().eq_ignore_ascii_case(wanted))
            .map(|format| &**format)
            .ok_or_else(|| {
                log::warn!("No container format registered as '{}'", container_type);
                CryptoError::unsupported_format(container_type)
            })
    }

    fn default_container_type(&self) -> &str {
        &self.config.default_container_type
    }

    fn kdf_limits(&self) -> KdfLimits {
        KdfLimits::from(&self.config)
    }

    fn symmetric_algorithm(&self, name: &str) -> CryptoResult<SymmetricAlgorithm> {
        SymmetricAlgorithm::from_name(name).ok_or_else(|| CryptoError::unsupported_algorithm(name))
    }

    fn supports_key_algorithm(&self, oid: &ObjectIdentifier) -> bool {
        *oid == RSA_ENCRYPTION
    }

    fn signature_digest(&self) -> DigestAlgorithm {
        self.config.signature_digest
    }

    fn rsa_padding(&self) -> RsaPadding {
        self.config.rsa_padding
    }

    fn fill_random(&self, dest: &mut [u8]) -> CryptoResult<()> {
        OsRng
            .try_fill_bytes(dest)
            .map_err(|e| CryptoError::io_failure("read system random source", &e.to_string()))
    }
}

impl fmt::Debug for DefaultProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultProvider")
            .field("config", &self.config)
            .field("formats", &self.container_types())
            .finish()
    }
}

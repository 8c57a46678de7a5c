/*!
 * KeyVault Cryptography Toolkit
 *
 * A small set of independent components built around protected key
 * containers:
 *
 * - loading a pass-phrase protected container and listing its entries
 * - extracting public keys (ungated) and private keys (gated by a per-entry
 *   pass-phrase) by alias
 * - reading the public key of a standalone X.509 certificate
 * - generating symmetric keys
 * - single-block RSA encryption with either half of a key pair
 * - RSASSA-PKCS1-v1_5 signatures over whole files
 * - writing and reading raw byte files
 *
 * Every component is constructed with a shared [`CryptoProvider`], which
 * supplies container formats, algorithms and randomness.
 *
 * # Example
 *
 * ```no_run
 * use keyvault::prelude::*;
 *
 * fn main() -> CryptoResult<()> {
 *     let provider = DefaultProvider::shared();
 *     let loader = ContainerLoader::new(provider.clone());
 *     let extractor = KeyExtractor::new(provider.clone());
 *     let signer = FileSigner::new(provider);
 *
 *     let container = loader.load("store.kvs", &Passphrase::from("changeit"), "kvs")?;
 *     let key = extractor
 *         .private_key(Some(&container), "mykey", &Passphrase::from("keypass"))?
 *         .ok_or_else(|| CryptoError::invalid_key("no private key under 'mykey'"))?;
 *
 *     let signature = signer.sign("document.txt", &key)?;
 *     store::store("document.sig", &signature)?;
 *     Ok(())
 * }
 * ```
 */

/// Common error types for the toolkit
pub mod error;

/// Zeroizing containers for secrets
pub mod secure_memory;

/// Provider configuration
pub mod config;

/// Whole-file byte persistence
pub mod store;

/// Protected key containers
pub mod container;

/// Public and private keys
pub mod keys;

/// Standalone X.509 certificate files
pub mod certificate;

/// Symmetric key generation
pub mod keygen;

/// Single-block RSA encryption
pub mod cipher;

/// File signatures
pub mod signature;

/// Algorithm, format and randomness provider
pub mod provider;

pub use certificate::{certificate_public_key, parse_certificate};
pub use cipher::{CipherKey, RsaCipher};
pub use config::{DigestAlgorithm, ProviderConfig, RsaPadding};
pub use container::{ContainerListing, ContainerLoader, EntryKind, KeyContainer};
pub use error::{CryptoError, CryptoResult};
pub use keygen::{SymmetricAlgorithm, SymmetricKeyGenerator};
pub use keys::{KeyExtractor, PrivateKey, PublicKey};
pub use provider::{CryptoProvider, DefaultProvider};
pub use secure_memory::{Passphrase, SecureBytes};
pub use signature::FileSigner;
pub use x509_cert::Certificate;

/// The types most callers need
pub mod prelude {
    pub use crate::certificate::certificate_public_key;
    pub use crate::cipher::{CipherKey, RsaCipher};
    pub use crate::config::ProviderConfig;
    pub use crate::container::{ContainerLoader, KeyContainer};
    pub use crate::error::{CryptoError, CryptoResult};
    pub use crate::keygen::SymmetricKeyGenerator;
    pub use crate::keys::{KeyExtractor, PrivateKey, PublicKey};
    pub use crate::provider::{CryptoProvider, DefaultProvider};
    pub use crate::secure_memory::{Passphrase, SecureBytes};
    pub use crate::signature::FileSigner;
    pub use crate::store;
}

/*!
 * Key Container Loader
 *
 * Opens protected container files and exposes their entries through an
 * in-memory handle. The file is read in one pass and closed before any
 * decoding starts; the handle never touches the file again.
 */

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use x509_cert::Certificate;

use crate::error::CryptoResult;
use crate::keys::PublicKey;
use crate::provider::CryptoProvider;
use crate::secure_memory::Passphrase;
use crate::store;

mod encoding;
pub mod format;
pub mod kdf;
pub mod sealed;

#[cfg(test)]
pub(crate) mod fixtures;

pub use format::{ContainerFormat, VaultFormat};
pub use kdf::{KdfLimits, KeyDerivationParams};
pub use sealed::SealedBox;

/// Kind of a container entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// A sealed private key plus the certificate chain of its public key
    PrivateKey,
    /// A certificate trusted on its own, without a private key
    TrustedCertificate,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKind::PrivateKey => write!(f, "PrivateKeyEntry"),
            EntryKind::TrustedCertificate => write!(f, "trustedCertEntry"),
        }
    }
}

/// A decoded container entry
#[derive(Debug, Clone)]
pub(crate) enum ContainerEntry {
    PrivateKey {
        sealed_key: SealedBox,
        chain: Vec<Certificate>,
        public_key: PublicKey,
    },
    TrustedCertificate {
        certificate: Certificate,
        public_key: PublicKey,
    },
}

impl ContainerEntry {
    fn kind(&self) -> EntryKind {
        match self {
            ContainerEntry::PrivateKey { .. } => EntryKind::PrivateKey,
            ContainerEntry::TrustedCertificate { .. } => EntryKind::TrustedCertificate,
        }
    }

    pub(crate) fn public_key(&self) -> &PublicKey {
        match self {
            ContainerEntry::PrivateKey { public_key, .. } => public_key,
            ContainerEntry::TrustedCertificate { public_key, .. } => public_key,
        }
    }
}

/// In-memory handle to a loaded key container
///
/// Aliases are unique; enumeration is in alias order.
#[derive(Debug, Clone)]
pub struct KeyContainer {
    format: String,
    entries: BTreeMap<String, ContainerEntry>,
}

impl KeyContainer {
    pub(crate) fn new(format: &str, entries: BTreeMap<String, ContainerEntry>) -> Self {
        Self {
            format: format.to_string(),
            entries,
        }
    }

    /// Type name of the format this container was decoded from
    pub fn format(&self) -> &str {
        &self.format
    }

    /// All aliases held by the container
    pub fn aliases(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys().map(String::as_str)
    }

    pub fn contains_alias(&self, alias: &str) -> bool {
        self.entries.contains_key(alias)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Kind of the entry under `alias`, if present
    pub fn entry_kind(&self, alias: &str) -> Option<EntryKind> {
        self.entries.get(alias).map(ContainerEntry::kind)
    }

    /// True if `alias` names a private-key entry
    pub fn is_private_key_entry(&self, alias: &str) -> bool {
        self.entry_kind(alias) == Some(EntryKind::PrivateKey)
    }

    /// True if `alias` names a trusted-certificate entry
    pub fn is_certificate_entry(&self, alias: &str) -> bool {
        self.entry_kind(alias) == Some(EntryKind::TrustedCertificate)
    }

    /// The certificate under `alias`; for private-key entries, the leaf of the chain
    pub fn certificate(&self, alias: &str) -> Option<&Certificate> {
        match self.entries.get(alias)? {
            ContainerEntry::PrivateKey { chain, .. } => chain.first(),
            ContainerEntry::TrustedCertificate { certificate, .. } => Some(certificate),
        }
    }

    /// The full certificate chain under `alias`, leaf first
    pub fn certificate_chain(&self, alias: &str) -> Option<&[Certificate]> {
        match self.entries.get(alias)? {
            ContainerEntry::PrivateKey { chain, .. } => Some(chain.as_slice()),
            ContainerEntry::TrustedCertificate { certificate, .. } => {
                Some(std::slice::from_ref(certificate))
            }
        }
    }

    pub(crate) fn entry(&self, alias: &str) -> Option<&ContainerEntry> {
        self.entries.get(alias)
    }
}

/// Human-readable enumeration of a container's entries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerListing {
    source: String,
    entries: Vec<(String, EntryKind)>,
}

impl ContainerListing {
    fn from_container(source: &Path, container: &KeyContainer) -> Self {
        Self {
            source: source.display().to_string(),
            entries: container
                .entries
                .iter()
                .map(|(alias, entry)| (alias.clone(), entry.kind()))
                .collect(),
        }
    }

    /// Listed aliases with their entry kinds
    pub fn entries(&self) -> &[(String, EntryKind)] {
        &self.entries
    }
}

impl fmt::Display for ContainerListing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} content: ", self.source)?;
        for (alias, kind) in &self.entries {
            writeln!(f, "{}", alias)?;
            writeln!(f, " - {}", kind)?;
        }
        Ok(())
    }
}

/// Loads key containers through the formats registered with a provider
#[derive(Clone)]
pub struct ContainerLoader {
    provider: Arc<dyn CryptoProvider>,
}

impl ContainerLoader {
    pub fn new(provider: Arc<dyn CryptoProvider>) -> Self {
        Self { provider }
    }

    /// Load the container at `path` as `container_type`
    ///
    /// # Errors
    ///
    /// * `NotFound` if `path` does not exist; checked before anything else
    /// * `UnsupportedFormat` if the provider has no `container_type` format
    /// * `BadContainer` if the pass-phrase is wrong or the file is not a
    ///   valid container of that type
    pub fn load<P: AsRef<Path>>(
        &self,
        path: P,
        passphrase: &Passphrase,
        container_type: &str,
    ) -> CryptoResult<KeyContainer> {
        let path = path.as_ref();
        store::ensure_exists(path)?;

        let format = self.provider.container_format(container_type)?;
        let bytes = store::read(path)?;

        let container = format
            .open(&bytes, passphrase, &self.provider.kdf_limits())
            .map_err(|e| {
                log::warn!("Failed to open container {}: {}", path.display(), e);
                e
            })?;

        log::info!(
            "Loaded {} container {} with {} entries",
            container.format(),
            path.display(),
            container.len()
        );
        Ok(container)
    }

    /// Load the container at `path` with the provider's default type and
    /// enumerate its entries
    pub fn list<P: AsRef<Path>>(
        &self,
        path: P,
        passphrase: &Passphrase,
    ) -> CryptoResult<ContainerListing> {
        let path = path.as_ref();
        let container = self.load(path, passphrase, self.provider.default_container_type())?;
        Ok(ContainerListing::from_container(path, &container))
    }
}

impl fmt::Debug for ContainerLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContainerLoader")
            .field("provider", &self.provider.name())
            .finish()
    }
}

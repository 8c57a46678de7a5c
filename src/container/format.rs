//! Container formats
//!
//! A container format turns the raw bytes of a protected container file into
//! an in-memory [`KeyContainer`]. The default provider registers a single
//! format, [`VaultFormat`] (`"kvs"`): a JSON envelope whose payload is sealed
//! with a key derived from the container pass-phrase, holding private-key
//! entries (each sealed again under its own key pass-phrase) and trusted
//! certificate entries.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use x509_cert::der::Decode;
use x509_cert::Certificate;

use crate::container::encoding::{base64_bytes, base64_list};
use crate::container::kdf::KdfLimits;
use crate::container::sealed::{SealedBox, UnsealError};
use crate::container::{ContainerEntry, KeyContainer};
use crate::error::{CryptoError, CryptoResult};
use crate::keys::PublicKey;
use crate::secure_memory::Passphrase;

/// Decodes one container file format
pub trait ContainerFormat: Send + Sync {
    /// Type name callers select this format by
    fn name(&self) -> &str;

    /// Decrypt and decode `bytes` with the container pass-phrase
    ///
    /// Any failure to authenticate or decode is a `BadContainer` error.
    fn open(
        &self,
        bytes: &[u8],
        passphrase: &Passphrase,
        limits: &KdfLimits,
    ) -> CryptoResult<KeyContainer>;
}

/// The native `kvs` container format
///
/// This is the format the default provider reads, not an interchange format:
/// files from other keystore tools must be converted first, or read through
/// another [`ContainerFormat`] registered with a custom provider.
#[derive(Debug, Clone, Copy, Default)]
pub struct VaultFormat;

impl VaultFormat {
    /// Type name of this format
    pub const NAME: &'static str = "kvs";
    /// Envelope version this implementation reads
    pub const VERSION: u8 = 1;

    /// Associated data authenticated with the container payload
    pub fn container_aad() -> Vec<u8> {
        format!("{}/{}", Self::NAME, Self::VERSION).into_bytes()
    }

    /// Associated data authenticated with the sealed key of `alias`
    pub fn key_aad(alias: &str) -> Vec<u8> {
        format!("{}/{}/key/{}", Self::NAME, Self::VERSION, alias).into_bytes()
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    format: String,
    version: u8,
    #[serde(flatten)]
    sealed: SealedBox,
}

#[derive(Debug, Serialize, Deserialize)]
struct ContainerBody {
    entries: Vec<EntryRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum EntryRecord {
    PrivateKey {
        alias: String,
        key: SealedBox,
        #[serde(with = "base64_list")]
        certificate_chain: Vec<Vec<u8>>,
    },
    TrustedCertificate {
        alias: String,
        #[serde(with = "base64_bytes")]
        certificate: Vec<u8>,
    },
}

impl ContainerFormat for VaultFormat {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn open(
        &self,
        bytes: &[u8],
        passphrase: &Passphrase,
        limits: &KdfLimits,
    ) -> CryptoResult<KeyContainer> {
        let envelope: Envelope = serde_json::from_slice(bytes)
            .map_err(|e| CryptoError::bad_container(&format!("unreadable envelope: {}", e)))?;

        if envelope.format != Self::NAME {
            return Err(CryptoError::bad_container(&format!(
                "file holds a '{}' container, not '{}'",
                envelope.format,
                Self::NAME
            )));
        }
        if envelope.version != Self::VERSION {
            return Err(CryptoError::bad_container(&format!(
                "unsupported {} version {}",
                Self::NAME,
                envelope.version
            )));
        }

        let body = envelope
            .sealed
            .open(passphrase, &Self::container_aad(), limits)
            .map_err(|e| match e {
                UnsealError::Rejected(cause) => CryptoError::bad_container(&cause),
                UnsealError::Decryption => CryptoError::bad_container(
                    "integrity check failed: wrong pass-phrase or corrupted file",
                ),
            })?;

        let body: ContainerBody = serde_json::from_slice(body.as_bytes())
            .map_err(|e| CryptoError::bad_container(&format!("unreadable entries: {}", e)))?;

        let mut entries = BTreeMap::new();
        for record in body.entries {
            let (alias, entry) = decode_entry(record)?;
            if entries.contains_key(&alias) {
                return Err(CryptoError::bad_container(&format!(
                    "duplicate alias '{}'",
                    alias
                )));
            }
            entries.insert(alias, entry);
        }

        Ok(KeyContainer::new(Self::NAME, entries))
    }
}

fn decode_entry(record: EntryRecord) -> CryptoResult<(String, ContainerEntry)> {
    match record {
        EntryRecord::PrivateKey {
            alias,
            key,
            certificate_chain,
        } => {
            if certificate_chain.is_empty() {
                return Err(CryptoError::bad_container(&format!(
                    "private key entry '{}' has no certificate",
                    alias
                )));
            }
            let chain = certificate_chain
                .iter()
                .map(|der| decode_certificate(&alias, der))
                .collect::<CryptoResult<Vec<_>>>()?;
            let public_key = leaf_public_key(&alias, &chain[0])?;

            Ok((
                alias,
                ContainerEntry::PrivateKey {
                    sealed_key: key,
                    chain,
                    public_key,
                },
            ))
        }
        EntryRecord::TrustedCertificate { alias, certificate } => {
            let certificate = decode_certificate(&alias, &certificate)?;
            let public_key = leaf_public_key(&alias, &certificate)?;

            Ok((
                alias,
                ContainerEntry::TrustedCertificate {
                    certificate,
                    public_key,
                },
            ))
        }
    }
}

fn decode_certificate(alias: &str, der: &[u8]) -> CryptoResult<Certificate> {
    Certificate::from_der(der).map_err(|e| {
        CryptoError::bad_container(&format!("certificate of '{}' is not valid X.509: {}", alias, e))
    })
}

fn leaf_public_key(alias: &str, certificate: &Certificate) -> CryptoResult<PublicKey> {
    PublicKey::from_certificate(certificate).map_err(|e| {
        CryptoError::bad_container(&format!("public key of '{}' is unusable: {}", alias, e))
    })
}

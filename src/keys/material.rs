// Public and private key material

use std::fmt;

use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePublicKey, PrivateKeyInfo};
use rsa::traits::PublicKeyParts;
use rsa::{RsaPrivateKey, RsaPublicKey};
use sha2::{Digest, Sha256};
use x509_cert::der::asn1::ObjectIdentifier;
use x509_cert::der::{Decode, Encode};
use x509_cert::spki::SubjectPublicKeyInfoOwned;
use x509_cert::Certificate;

use crate::error::{CryptoError, CryptoResult};

/// rsaEncryption (PKCS #1)
pub const RSA_ENCRYPTION: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.1");
/// id-ecPublicKey (SEC 1)
pub const EC_PUBLIC_KEY: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.2.1");
/// id-Ed25519 (RFC 8410)
pub const ED25519: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.101.112");

/// Short name of a key algorithm, for messages and listings
pub fn algorithm_name(oid: &ObjectIdentifier) -> String {
    if *oid == RSA_ENCRYPTION {
        "RSA".to_string()
    } else if *oid == EC_PUBLIC_KEY {
        "EC".to_string()
    } else if *oid == ED25519 {
        "Ed25519".to_string()
    } else {
        oid.to_string()
    }
}

/// A public key of any algorithm, held as a DER `SubjectPublicKeyInfo`
///
/// Certificates may carry keys this toolkit cannot use; those still load as
/// a `PublicKey`, and operations that need RSA reject them with `InvalidKey`.
#[derive(Clone, PartialEq, Eq)]
pub struct PublicKey {
    algorithm: ObjectIdentifier,
    spki_der: Vec<u8>,
}

impl PublicKey {
    /// Parse a DER `SubjectPublicKeyInfo`
    pub fn from_spki_der(der: &[u8]) -> CryptoResult<Self> {
        let spki = SubjectPublicKeyInfoOwned::from_der(der)
            .map_err(|e| CryptoError::invalid_key(&format!("malformed public key: {}", e)))?;
        Ok(Self {
            algorithm: spki.algorithm.oid,
            spki_der: der.to_vec(),
        })
    }

    /// Take the subject public key of an X.509 certificate
    pub fn from_certificate(certificate: &Certificate) -> CryptoResult<Self> {
        let spki = &certificate.tbs_certificate.subject_public_key_info;
        let spki_der = spki.to_der().map_err(|e| {
            CryptoError::malformed_certificate(&format!("cannot encode public key: {}", e))
        })?;
        Ok(Self {
            algorithm: spki.algorithm.oid,
            spki_der,
        })
    }

    /// Wrap an RSA public key
    pub fn from_rsa(key: &RsaPublicKey) -> CryptoResult<Self> {
        let document = key
            .to_public_key_der()
            .map_err(|e| CryptoError::invalid_key(&format!("cannot encode RSA key: {}", e)))?;
        Ok(Self {
            algorithm: RSA_ENCRYPTION,
            spki_der: document.as_bytes().to_vec(),
        })
    }

    pub fn algorithm(&self) -> ObjectIdentifier {
        self.algorithm
    }

    pub fn algorithm_name(&self) -> String {
        algorithm_name(&self.algorithm)
    }

    pub fn is_rsa(&self) -> bool {
        self.algorithm == RSA_ENCRYPTION
    }

    /// DER encoding of the `SubjectPublicKeyInfo`
    pub fn to_spki_der(&self) -> &[u8] {
        &self.spki_der
    }

    /// Hex SHA-256 over the DER `SubjectPublicKeyInfo`
    pub fn fingerprint(&self) -> String {
        hex::encode(Sha256::digest(&self.spki_der))
    }

    /// The key as RSA, or `InvalidKey` for any other algorithm
    pub fn to_rsa(&self) -> CryptoResult<RsaPublicKey> {
        if !self.is_rsa() {
            return Err(CryptoError::invalid_key(&format!(
                "expected an RSA key, got {}",
                self.algorithm_name()
            )));
        }
        RsaPublicKey::from_public_key_der(&self.spki_der)
            .map_err(|e| CryptoError::invalid_key(&format!("malformed RSA public key: {}", e)))
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublicKey")
            .field("algorithm", &self.algorithm_name())
            .field("fingerprint", &self.fingerprint())
            .finish()
    }
}

/// An RSA private key; zeroized on drop
#[derive(Clone)]
pub struct PrivateKey {
    inner: RsaPrivateKey,
}

impl PrivateKey {
    /// Decode a PKCS#8 DER private key
    ///
    /// # Errors
    ///
    /// * `UnsupportedAlgorithm` if the key is not RSA
    /// * `InvalidKey` if the encoding is malformed
    pub fn from_pkcs8_der(der: &[u8]) -> CryptoResult<Self> {
        let info = PrivateKeyInfo::try_from(der)
            .map_err(|e| CryptoError::invalid_key(&format!("malformed PKCS#8 key: {}", e)))?;
        if info.algorithm.oid != RSA_ENCRYPTION {
            return Err(CryptoError::unsupported_algorithm(&algorithm_name(
                &info.algorithm.oid,
            )));
        }
        let inner = RsaPrivateKey::from_pkcs8_der(der)
            .map_err(|e| CryptoError::invalid_key(&format!("malformed RSA private key: {}", e)))?;
        Ok(Self { inner })
    }

    /// Wrap an RSA private key
    pub fn from_rsa(key: RsaPrivateKey) -> Self {
        Self { inner: key }
    }

    /// The matching public key
    pub fn public_key(&self) -> CryptoResult<PublicKey> {
        PublicKey::from_rsa(&self.inner.to_public_key())
    }

    /// Modulus length in bytes
    pub fn size(&self) -> usize {
        self.inner.size()
    }

    pub(crate) fn rsa(&self) -> &RsaPrivateKey {
        &self.inner
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("algorithm", &"RSA")
            .field("bits", &(self.inner.size() * 8))
            .finish()
    }
}

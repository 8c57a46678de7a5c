/*!
 * File Signer / Verifier
 *
 * RSASSA-PKCS1-v1_5 signatures over the whole content of a file. The file is
 * read into memory in one pass, hashed with the provider's digest, and the
 * digest is signed or checked.
 */

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use rand::rngs::OsRng;
use rsa::Pkcs1v15Sign;
use sha2::{Digest, Sha256, Sha384, Sha512};

use crate::config::DigestAlgorithm;
use crate::error::{CryptoError, CryptoResult};
use crate::keys::{PrivateKey, PublicKey};
use crate::provider::CryptoProvider;
use crate::store;

/// Signs and verifies files with RSA keys
#[derive(Clone)]
pub struct FileSigner {
    provider: Arc<dyn CryptoProvider>,
}

impl FileSigner {
    pub fn new(provider: Arc<dyn CryptoProvider>) -> Self {
        Self { provider }
    }

    /// Digest in effect
    pub fn digest(&self) -> DigestAlgorithm {
        self.provider.signature_digest()
    }

    /// Sign the content of the file at `path`
    ///
    /// # Errors
    ///
    /// * `NotFound` if the file does not exist
    /// * `IoFailure` if it cannot be read
    /// * `InvalidKey` if the key cannot produce a signature
    pub fn sign<P: AsRef<Path>>(&self, path: P, key: &PrivateKey) -> CryptoResult<Vec<u8>> {
        let path = path.as_ref();
        let content = store::read(path)?;

        let digest = self.digest();
        let (scheme, hashed) = hash_content(digest, &content);
        let signature = key
            .rsa()
            .sign_with_rng(&mut OsRng, scheme, &hashed)
            .map_err(|e| CryptoError::invalid_key(&format!("signing failed: {}", e)))?;

        log::debug!(
            "Signed {} ({} bytes) with {}",
            path.display(),
            content.len(),
            digest
        );
        Ok(signature)
    }

    /// Check `signature` against the content of the file at `path`
    ///
    /// Returns `Ok(false)` for a signature that does not match, including
    /// one of the wrong length.
    ///
    /// # Errors
    ///
    /// * `NotFound` if the file does not exist
    /// * `VerificationError` if the file cannot be read or the key is not a
    ///   usable RSA key
    pub fn verify<P: AsRef<Path>>(
        &self,
        path: P,
        key: &PublicKey,
        signature: &[u8],
    ) -> CryptoResult<bool> {
        let path = path.as_ref();
        let content = store::read(path).map_err(|e| match e {
            CryptoError::NotFound { .. } => e,
            other => CryptoError::verification_error(&other.to_string()),
        })?;
        let rsa_key = key
            .to_rsa()
            .map_err(|e| CryptoError::verification_error(&e.to_string()))?;

        let digest = self.digest();
        let (scheme, hashed) = hash_content(digest, &content);
        let valid = rsa_key.verify(scheme, &hashed, signature).is_ok();

        if valid {
            log::debug!("Signature on {} verified with {}", path.display(), digest);
        } else {
            log::debug!("Signature on {} does not match", path.display());
        }
        Ok(valid)
    }
}

impl fmt::Debug for FileSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileSigner")
            .field("provider", &self.provider.name())
            .field("digest", &self.digest())
            .finish()
    }
}

fn hash_content(digest: DigestAlgorithm, content: &[u8]) -> (Pkcs1v15Sign, Vec<u8>) {
    match digest {
        DigestAlgorithm::Sha256 => (Pkcs1v15Sign::new::<Sha256>(), Sha256::digest(content).to_vec()),
        DigestAlgorithm::Sha384 => (Pkcs1v15Sign::new::<Sha384>(), Sha384::digest(content).to_vec()),
        DigestAlgorithm::Sha512 => (Pkcs1v15Sign::new::<Sha512>(), Sha512::digest(content).to_vec()),
    }
}

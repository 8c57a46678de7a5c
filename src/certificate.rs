/*!
 * Standalone Certificate Reader
 *
 * Reads the public key out of a bare X.509 certificate file, so a party
 * holding only a counterpart's certificate can check signatures without any
 * container.
 */

use std::path::Path;

use x509_cert::der::{Decode, DecodePem};
use x509_cert::Certificate;

use crate::error::{CryptoError, CryptoResult};
use crate::keys::PublicKey;
use crate::store;

const PEM_MARKER: &[u8] = b"-----BEGIN";

/// Parse one certificate, DER or PEM
pub fn parse_certificate(bytes: &[u8]) -> CryptoResult<Certificate> {
    let parsed = match find_pem(bytes) {
        Some(start) => Certificate::from_pem(&bytes[start..]),
        None => Certificate::from_der(bytes),
    };
    parsed.map_err(|e| CryptoError::malformed_certificate(&e.to_string()))
}

/// Public key of the certificate in the file at `path`
///
/// # Errors
///
/// * `NotFound` if the file does not exist
/// * `MalformedCertificate` if the content is not an X.509 certificate
pub fn certificate_public_key<P: AsRef<Path>>(path: P) -> CryptoResult<PublicKey> {
    let path = path.as_ref();
    let bytes = store::read(path)?;
    let certificate = parse_certificate(&bytes)?;
    let key = PublicKey::from_certificate(&certificate)?;

    log::debug!(
        "Read {} public key {} from {}",
        key.algorithm_name(),
        key.fingerprint(),
        path.display()
    );
    Ok(key)
}

fn find_pem(bytes: &[u8]) -> Option<usize> {
    let start = bytes.iter().position(|b| !b.is_ascii_whitespace())?;
    bytes[start..].starts_with(PEM_MARKER).then_some(start)
}

//! Secure Memory Handling Utilities
//!
//! This module provides containers for sensitive material that are zeroed
//! when they go out of scope: generated symmetric keys, decrypted key
//! encodings, and the pass-phrases that unlock containers and entries.
//!
//! The primary goal of these utilities is to minimize the exposure of sensitive
//! cryptographic material (like keys and pass-phrases) in memory, reducing the
//! risk of memory-based attacks such as cold boot attacks or memory scanning by
//! malicious processes.

use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A byte container for sensitive data such as cryptographic keys.
///
/// SecureBytes automatically zeroes its memory when dropped and never prints
/// its contents through `Debug`.
///
/// # Example
///
/// ```
/// use keyvault::secure_memory::SecureBytes;
///
/// let key = SecureBytes::new(&[0x01, 0x02, 0x03, 0x04]);
/// assert_eq!(key.len(), 4);
/// // When key goes out of scope, memory is securely zeroed
/// ```
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SecureBytes {
    bytes: Vec<u8>,
}

impl SecureBytes {
    /// Create a new SecureBytes holding a copy of `data`
    pub fn new(data: &[u8]) -> Self {
        Self {
            bytes: data.to_vec(),
        }
    }

    /// Create a zero-filled SecureBytes of `len` bytes, ready to be filled in place
    pub fn zeroed(len: usize) -> Self {
        Self {
            bytes: vec![0u8; len],
        }
    }

    /// Get a reference to the underlying bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Get a mutable reference to the underlying bytes
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    /// Consume the container and return the contained bytes
    ///
    /// After calling this method, it becomes the caller's responsibility
    /// to zeroize the returned vector.
    pub fn into_vec(mut self) -> Vec<u8> {
        std::mem::take(&mut self.bytes)
    }

    /// Get the current length of the buffer in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Check if the buffer is empty
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for SecureBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecureBytes")
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl From<Vec<u8>> for SecureBytes {
    fn from(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }
}

impl From<&[u8]> for SecureBytes {
    fn from(data: &[u8]) -> Self {
        Self::new(data)
    }
}

impl AsRef<[u8]> for SecureBytes {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

/// A pass-phrase that unlocks a container or a single key entry.
///
/// The pass-phrase is held as UTF-8 bytes and zeroed on drop, regardless of
/// whether the caller built it from a `String`, a `&str` or raw bytes.
///
/// # Example
///
/// ```
/// use keyvault::secure_memory::Passphrase;
///
/// let passphrase = Passphrase::from("changeit");
/// assert_eq!(passphrase.as_bytes(), b"changeit");
/// ```
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Passphrase {
    bytes: Vec<u8>,
}

impl Passphrase {
    /// Create a pass-phrase from raw bytes
    pub fn new(bytes: &[u8]) -> Self {
        Self {
            bytes: bytes.to_vec(),
        }
    }

    /// The pass-phrase bytes, for handing to a key derivation function
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for Passphrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Passphrase([REDACTED])")
    }
}

impl From<&str> for Passphrase {
    fn from(value: &str) -> Self {
        Self::new(value.as_bytes())
    }
}

impl From<String> for Passphrase {
    fn from(mut value: String) -> Self {
        let passphrase = Self::new(value.as_bytes());
        value.zeroize();
        passphrase
    }
}

impl From<&[u8]> for Passphrase {
    fn from(value: &[u8]) -> Self {
        Self::new(value)
    }
}

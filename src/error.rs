/*!
 * Error Handling for the keyvault toolkit
 *
 * A single flat taxonomy covers every fault the toolkit can report. Expected,
 * actionable outcomes ("alias not present", "signature does not match") are
 * not errors: they come back as `Ok(None)` and `Ok(false)` respectively.
 */

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error type for all key-material and file-integrity operations
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("File not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("IO failure during {operation}: {cause}")]
    IoFailure { operation: String, cause: String },

    #[error("Bad key container: {cause}")]
    BadContainer { cause: String },

    #[error("Unsupported container format: {format}")]
    UnsupportedFormat { format: String },

    #[error("Unsupported algorithm: {algorithm}")]
    UnsupportedAlgorithm { algorithm: String },

    #[error("Wrong key pass-phrase for alias '{alias}'")]
    WrongKeyPassphrase { alias: String },

    #[error("Malformed certificate: {cause}")]
    MalformedCertificate { cause: String },

    #[error("Invalid key: {cause}")]
    InvalidKey { cause: String },

    #[error("Invalid key size for {algorithm}: {bits} bits")]
    InvalidKeySize { algorithm: String, bits: usize },

    #[error("Input of {actual} bytes exceeds the {limit}-byte block ceiling")]
    BlockSizeExceeded { actual: usize, limit: usize },

    #[error("Padding check failed during decryption")]
    PaddingFailure,

    #[error("Signature verification error: {cause}")]
    VerificationError { cause: String },

    #[error("No key container available")]
    NoContainer,

    #[error("Invalid configuration: {parameter} - {cause}")]
    Configuration { parameter: String, cause: String },
}

/// Error code constants for the error categories
pub mod error_codes {
    // File errors: 1000-1999
    pub const NOT_FOUND: u32 = 1001;
    pub const IO_FAILURE: u32 = 1002;

    // Container errors: 2000-2999
    pub const BAD_CONTAINER: u32 = 2001;
    pub const UNSUPPORTED_FORMAT: u32 = 2002;
    pub const NO_CONTAINER: u32 = 2003;
    pub const WRONG_KEY_PASSPHRASE: u32 = 2004;

    // Key errors: 3000-3999
    pub const UNSUPPORTED_ALGORITHM: u32 = 3001;
    pub const MALFORMED_CERTIFICATE: u32 = 3002;
    pub const INVALID_KEY: u32 = 3003;
    pub const INVALID_KEY_SIZE: u32 = 3004;

    // Cipher and signature errors: 4000-4999
    pub const BLOCK_SIZE_EXCEEDED: u32 = 4001;
    pub const PADDING_FAILURE: u32 = 4002;
    pub const VERIFICATION_ERROR: u32 = 4003;

    // Configuration errors: 9000-9999
    pub const CONFIGURATION: u32 = 9001;
}

impl CryptoError {
    /// Get the numeric error code for this error
    pub fn error_code(&self) -> u32 {
        match self {
            CryptoError::NotFound { .. } => error_codes::NOT_FOUND,
            CryptoError::IoFailure { .. } => error_codes::IO_FAILURE,
            CryptoError::BadContainer { .. } => error_codes::BAD_CONTAINER,
            CryptoError::UnsupportedFormat { .. } => error_codes::UNSUPPORTED_FORMAT,
            CryptoError::UnsupportedAlgorithm { .. } => error_codes::UNSUPPORTED_ALGORITHM,
            CryptoError::WrongKeyPassphrase { .. } => error_codes::WRONG_KEY_PASSPHRASE,
            CryptoError::MalformedCertificate { .. } => error_codes::MALFORMED_CERTIFICATE,
            CryptoError::InvalidKey { .. } => error_codes::INVALID_KEY,
            CryptoError::InvalidKeySize { .. } => error_codes::INVALID_KEY_SIZE,
            CryptoError::BlockSizeExceeded { .. } => error_codes::BLOCK_SIZE_EXCEEDED,
            CryptoError::PaddingFailure => error_codes::PADDING_FAILURE,
            CryptoError::VerificationError { .. } => error_codes::VERIFICATION_ERROR,
            CryptoError::NoContainer => error_codes::NO_CONTAINER,
            CryptoError::Configuration { .. } => error_codes::CONFIGURATION,
        }
    }

    /// Get a user-friendly error message
    ///
    /// The messages keep "wrong path", "wrong pass-phrase" and "corrupted
    /// data" apart so an operator can tell which one to fix.
    pub fn user_friendly_message(&self) -> String {
        match self {
            CryptoError::NotFound { path } => {
                format!("The file '{}' does not exist. Check the path.", path.display())
            }
            CryptoError::IoFailure { operation, .. } => {
                format!(
                    "Input/output operation '{}' failed. Check file permissions and disk space.",
                    operation
                )
            }
            CryptoError::BadContainer { .. } => {
                "The key container could not be opened. The pass-phrase is wrong or the file is corrupted."
                    .to_string()
            }
            CryptoError::UnsupportedFormat { format } => {
                format!("Key container format '{}' is not supported.", format)
            }
            CryptoError::UnsupportedAlgorithm { algorithm } => {
                format!("Algorithm '{}' is not available from the active provider.", algorithm)
            }
            CryptoError::WrongKeyPassphrase { alias } => {
                format!("The key pass-phrase for '{}' is wrong.", alias)
            }
            CryptoError::MalformedCertificate { .. } => {
                "The certificate could not be parsed. It may be corrupted or not X.509."
                    .to_string()
            }
            CryptoError::InvalidKey { .. } => {
                "The supplied key cannot be used for this operation.".to_string()
            }
            CryptoError::InvalidKeySize { algorithm, bits } => {
                format!("{} bits is not a valid key size for {}.", bits, algorithm)
            }
            CryptoError::BlockSizeExceeded { limit, .. } => {
                format!(
                    "Input is too large for a single RSA block (at most {} bytes).",
                    limit
                )
            }
            CryptoError::PaddingFailure => {
                "Decryption failed. The key is wrong or the ciphertext was tampered with."
                    .to_string()
            }
            CryptoError::VerificationError { .. } => {
                "The signature could not be checked. The key or file is unusable.".to_string()
            }
            CryptoError::NoContainer => "No key container has been loaded.".to_string(),
            CryptoError::Configuration { parameter, .. } => {
                format!("Configuration value '{}' is invalid.", parameter)
            }
        }
    }

    /// Get the error category/type as a string
    pub fn error_type(&self) -> &'static str {
        match self {
            CryptoError::NotFound { .. } => "NotFound",
            CryptoError::IoFailure { .. } => "IoFailure",
            CryptoError::BadContainer { .. } => "BadContainer",
            CryptoError::UnsupportedFormat { .. } => "UnsupportedFormat",
            CryptoError::UnsupportedAlgorithm { .. } => "UnsupportedAlgorithm",
            CryptoError::WrongKeyPassphrase { .. } => "WrongKeyPassphrase",
            CryptoError::MalformedCertificate { .. } => "MalformedCertificate",
            CryptoError::InvalidKey { .. } => "InvalidKey",
            CryptoError::InvalidKeySize { .. } => "InvalidKeySize",
            CryptoError::BlockSizeExceeded { .. } => "BlockSizeExceeded",
            CryptoError::PaddingFailure => "PaddingFailure",
            CryptoError::VerificationError { .. } => "VerificationError",
            CryptoError::NoContainer => "NoContainer",
            CryptoError::Configuration { .. } => "Configuration",
        }
    }
}

/// Convenience constructors for common error types
impl CryptoError {
    pub fn not_found(path: &Path) -> Self {
        CryptoError::NotFound {
            path: path.to_path_buf(),
        }
    }

    pub fn io_failure(operation: &str, cause: &str) -> Self {
        CryptoError::IoFailure {
            operation: operation.to_string(),
            cause: cause.to_string(),
        }
    }

    pub fn bad_container(cause: &str) -> Self {
        CryptoError::BadContainer {
            cause: cause.to_string(),
        }
    }

    pub fn unsupported_format(format: &str) -> Self {
        CryptoError::UnsupportedFormat {
            format: format.to_string(),
        }
    }

    pub fn unsupported_algorithm(algorithm: &str) -> Self {
        CryptoError::UnsupportedAlgorithm {
            algorithm: algorithm.to_string(),
        }
    }

    pub fn malformed_certificate(cause: &str) -> Self {
        CryptoError::MalformedCertificate {
            cause: cause.to_string(),
        }
    }

    pub fn invalid_key(cause: &str) -> Self {
        CryptoError::InvalidKey {
            cause: cause.to_string(),
        }
    }

    pub fn verification_error(cause: &str) -> Self {
        CryptoError::VerificationError {
            cause: cause.to_string(),
        }
    }

    pub fn configuration(parameter: &str, cause: &str) -> Self {
        CryptoError::Configuration {
            parameter: parameter.to_string(),
            cause: cause.to_string(),
        }
    }

    /// Map an I/O error on `path`, keeping a vanished file distinct from other faults
    pub fn from_io(operation: &str, path: &Path, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => CryptoError::not_found(path),
            _ => CryptoError::io_failure(operation, &format!("{}: {}", path.display(), err)),
        }
    }
}

impl From<std::io::Error> for CryptoError {
    fn from(err: std::io::Error) -> Self {
        CryptoError::io_failure("io", &err.to_string())
    }
}

/// Result type alias for keyvault operations
pub type CryptoResult<T> = Result<T, CryptoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_distinct_per_kind() {
        let errors = vec![
            CryptoError::not_found(Path::new("a")),
            CryptoError::io_failure("read", "disk"),
            CryptoError::bad_container("mac"),
            CryptoError::unsupported_format("pkcs12"),
            CryptoError::unsupported_algorithm("DES"),
            CryptoError::WrongKeyPassphrase {
                alias: "mykey".to_string(),
            },
            CryptoError::malformed_certificate("truncated"),
            CryptoError::invalid_key("not rsa"),
            CryptoError::InvalidKeySize {
                algorithm: "AES".to_string(),
                bits: 100,
            },
            CryptoError::BlockSizeExceeded {
                actual: 300,
                limit: 245,
            },
            CryptoError::PaddingFailure,
            CryptoError::verification_error("bad key"),
            CryptoError::NoContainer,
            CryptoError::configuration("rsa_padding", "unknown"),
        ];

        let mut codes: Vec<u32> = errors.iter().map(|e| e.error_code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_missing_file_is_reported_distinctly() {
        let missing = CryptoError::from_io(
            "read",
            Path::new("missing.jks"),
            std::io::Error::from(std::io::ErrorKind::NotFound),
        );
        assert!(matches!(missing, CryptoError::NotFound { .. }));

        let denied = CryptoError::from_io(
            "read",
            Path::new("locked.jks"),
            std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        );
        assert!(matches!(denied, CryptoError::IoFailure { .. }));
    }

    #[test]
    fn test_user_friendly_message() {
        let error = CryptoError::bad_container("aead open failed");
        assert!(error.user_friendly_message().contains("pass-phrase"));
        assert_eq!(error.error_type(), "BadContainer");

        let error = CryptoError::not_found(Path::new("store.kvs"));
        assert!(error.user_friendly_message().contains("store.kvs"));
    }
}

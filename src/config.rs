/*!
 * Provider configuration
 *
 * Tunables for the default cryptographic provider: which container type
 * `list` opens, which digest the signer uses, which RSA padding the cipher
 * applies, and how much work a container may demand from the key
 * derivation function before it is rejected.
 */

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CryptoError, CryptoResult};

/// Digest used by the hash-then-sign scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestAlgorithm {
    Sha256,
    Sha384,
    Sha512,
}

impl std::fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DigestAlgorithm::Sha256 => write!(f, "SHA256withRSA"),
            DigestAlgorithm::Sha384 => write!(f, "SHA384withRSA"),
            DigestAlgorithm::Sha512 => write!(f, "SHA512withRSA"),
        }
    }
}

/// Padding applied by the RSA cipher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RsaPadding {
    /// RSAES-PKCS1-v1_5, usable in both key directions
    Pkcs1v15,
    /// RSAES-OAEP with SHA-256, public-key encryption only
    OaepSha256,
}

impl std::fmt::Display for RsaPadding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RsaPadding::Pkcs1v15 => write!(f, "RSA/ECB/PKCS1Padding"),
            RsaPadding::OaepSha256 => write!(f, "RSA/ECB/OAEPWithSHA-256AndMGF1Padding"),
        }
    }
}

/// Configuration for [`crate::provider::DefaultProvider`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Container type opened by `ContainerLoader::list`
    pub default_container_type: String,
    /// Digest for signing and verification
    pub signature_digest: DigestAlgorithm,
    /// Padding for RSA encryption and decryption
    pub rsa_padding: RsaPadding,
    /// Highest Argon2 memory cost (in KiB) a container may declare
    pub max_kdf_memory_kib: u32,
    /// Highest Argon2 time cost a container may declare
    pub max_kdf_iterations: u32,
    /// Highest Argon2 parallelism a container may declare
    pub max_kdf_parallelism: u32,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            default_container_type: "kvs".to_string(),
            signature_digest: DigestAlgorithm::Sha256,
            rsa_padding: RsaPadding::Pkcs1v15,
            max_kdf_memory_kib: 1_048_576, // 1 GiB
            max_kdf_iterations: 16,
            max_kdf_parallelism: 16,
        }
    }
}

/// Configuration for hosts that must not spend much memory opening containers
pub fn constrained_config() -> ProviderConfig {
    ProviderConfig {
        max_kdf_memory_kib: 65_536, // 64 MB
        max_kdf_iterations: 4,
        max_kdf_parallelism: 4,
        ..ProviderConfig::default()
    }
}

impl ProviderConfig {
    /// Parse a configuration from JSON; absent keys take their defaults
    pub fn from_json_str(json: &str) -> CryptoResult<Self> {
        let config: ProviderConfig = serde_json::from_str(json)
            .map_err(|e| CryptoError::configuration("json", &e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> CryptoResult<Self> {
        let path = path.as_ref();
        let contents =
            fs::read_to_string(path).map_err(|e| CryptoError::from_io("read config", path, e))?;
        log::debug!("Loaded provider configuration from {}", path.display());
        Self::from_json_str(&contents)
    }

    /// Check that every value is usable
    pub fn validate(&self) -> CryptoResult<()> {
        if self.default_container_type.trim().is_empty() {
            return Err(CryptoError::configuration(
                "default_container_type",
                "must not be empty",
            ));
        }
        // Argon2 needs at least 8 KiB per lane
        if self.max_kdf_memory_kib < 8 {
            return Err(CryptoError::configuration(
                "max_kdf_memory_kib",
                "must be at least 8",
            ));
        }
        if self.max_kdf_iterations == 0 {
            return Err(CryptoError::configuration(
                "max_kdf_iterations",
                "must be at least 1",
            ));
        }
        if self.max_kdf_parallelism == 0 {
            return Err(CryptoError::configuration(
                "max_kdf_parallelism",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ProviderConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.default_container_type, "kvs");
        assert_eq!(config.signature_digest, DigestAlgorithm::Sha256);
        assert_eq!(config.rsa_padding, RsaPadding::Pkcs1v15);
        assert!(constrained_config().validate().is_ok());
    }

    #[test]
    fn test_partial_json_takes_defaults() {
        let config =
            ProviderConfig::from_json_str(r#"{ "signature_digest": "sha512" }"#).unwrap();
        assert_eq!(config.signature_digest, DigestAlgorithm::Sha512);
        assert_eq!(config.rsa_padding, RsaPadding::Pkcs1v15);
        assert_eq!(config.max_kdf_iterations, 16);
    }

    #[test]
    fn test_oaep_padding_parses() {
        let config = ProviderConfig::from_json_str(r#"{ "rsa_padding": "oaep_sha256" }"#).unwrap();
        assert_eq!(config.rsa_padding, RsaPadding::OaepSha256);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = ProviderConfig::from_json_str(r#"{ "max_kdf_iterations": 0 }"#).unwrap_err();
        assert!(matches!(err, CryptoError::Configuration { .. }));

        let err = ProviderConfig::from_json_str(r#"{ "signature_digest": "md5" }"#).unwrap_err();
        assert!(matches!(err, CryptoError::Configuration { .. }));

        let err =
            ProviderConfig::from_json_str(r#"{ "default_container_type": " " }"#).unwrap_err();
        assert!(matches!(err, CryptoError::Configuration { .. }));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("provider.json");
        std::fs::write(&path, r#"{ "default_container_type": "kvs", "max_kdf_memory_kib": 4096 }"#)
            .unwrap();
        let config = ProviderConfig::from_file(&path).unwrap();
        assert_eq!(config.max_kdf_memory_kib, 4096);

        let missing = ProviderConfig::from_file(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(missing, CryptoError::NotFound { .. }));
    }
}

//! Tests for key extraction and key material

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use x509_cert::der::asn1::ObjectIdentifier;

    use crate::config::{DigestAlgorithm, RsaPadding};
    use crate::container::fixtures::*;
    use crate::container::{ContainerFormat, KdfLimits};
    use crate::error::{CryptoError, CryptoResult};
    use crate::keygen::SymmetricAlgorithm;
    use crate::keys::{KeyExtractor, PrivateKey, PublicKey, RSA_ENCRYPTION};
    use crate::provider::{CryptoProvider, DefaultProvider};
    use crate::secure_memory::Passphrase;

    /// Default provider that refuses every key algorithm
    struct NoKeysProvider(DefaultProvider);

    impl CryptoProvider for NoKeysProvider {
        fn name(&self) -> &str {
            "no-keys"
        }
        fn container_format(&self, container_type: &str) -> CryptoResult<&dyn ContainerFormat> {
            self.0.container_format(container_type)
        }
        fn default_container_type(&self) -> &str {
            self.0.default_container_type()
        }
        fn kdf_limits(&self) -> KdfLimits {
            self.0.kdf_limits()
        }
        fn symmetric_algorithm(&self, name: &str) -> CryptoResult<SymmetricAlgorithm> {
            self.0.symmetric_algorithm(name)
        }
        fn supports_key_algorithm(&self, _oid: &ObjectIdentifier) -> bool {
            false
        }
        fn signature_digest(&self) -> DigestAlgorithm {
            self.0.signature_digest()
        }
        fn rsa_padding(&self) -> RsaPadding {
            self.0.rsa_padding()
        }
        fn fill_random(&self, dest: &mut [u8]) -> CryptoResult<()> {
            self.0.fill_random(dest)
        }
    }

    fn extractor() -> KeyExtractor {
        KeyExtractor::new(DefaultProvider::shared())
    }

    fn alice_public() -> PublicKey {
        let certificate = crate::certificate::parse_certificate(ALICE_CERT).unwrap();
        PublicKey::from_certificate(&certificate).unwrap()
    }

    #[test]
    fn test_no_container() {
        let extractor = extractor();
        assert!(matches!(
            extractor.public_key(None, "mykey"),
            Err(CryptoError::NoContainer)
        ));
        assert!(matches!(
            extractor.private_key(None, "mykey", &Passphrase::from(KEY_PASS)),
            Err(CryptoError::NoContainer)
        ));
    }

    #[test]
    fn test_absent_alias() {
        let container = sample_container();
        let extractor = extractor();
        assert!(extractor.public_key(Some(&container), "nobody").unwrap().is_none());
        assert!(extractor
            .private_key(Some(&container), "nobody", &Passphrase::from(KEY_PASS))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_public_key_from_leaf() {
        let container = sample_container();
        let key = extractor().public_key(Some(&container), "mykey").unwrap().unwrap();
        assert_eq!(key, alice_public());
        assert!(key.is_rsa());
    }

    #[test]
    fn test_private_key_matches_public_key() {
        let container = sample_container();
        let extractor = extractor();

        let private = extractor
            .private_key(Some(&container), "mykey", &Passphrase::from(KEY_PASS))
            .unwrap()
            .unwrap();
        assert_eq!(private.size(), 256);
        assert_eq!(private.public_key().unwrap(), alice_public());
    }

    #[test]
    fn test_wrong_key_passphrase() {
        let container = sample_container();
        let extractor = extractor();

        for wrong in ["keypas", STORE_PASS, ""] {
            let err = extractor
                .private_key(Some(&container), "mykey", &Passphrase::from(wrong))
                .unwrap_err();
            assert!(
                matches!(err, CryptoError::WrongKeyPassphrase { ref alias } if alias == "mykey"),
                "pass-phrase {:?} should be rejected",
                wrong
            );
        }
    }

    #[test]
    fn test_trusted_certificate_alias() {
        let container = sample_container();
        let extractor = extractor();

        assert!(extractor
            .private_key(Some(&container), "bob", &Passphrase::from(KEY_PASS))
            .unwrap()
            .is_none());
        let bob = extractor.public_key(Some(&container), "bob").unwrap().unwrap();
        assert_ne!(bob, alice_public());
    }

    #[test]
    fn test_unsupported_key_algorithm() {
        let container = sample_container();

        let err = extractor()
            .private_key(Some(&container), "eckey", &Passphrase::from("ecpass"))
            .unwrap_err();
        assert!(matches!(err, CryptoError::UnsupportedAlgorithm { ref algorithm } if algorithm == "EC"));

        // The public half of the same entry is still available
        let public = extractor().public_key(Some(&container), "eckey").unwrap().unwrap();
        assert_eq!(public.algorithm_name(), "EC");
    }

    #[test]
    fn test_provider_without_rsa() {
        let container = sample_container();
        let extractor = KeyExtractor::new(Arc::new(NoKeysProvider(DefaultProvider::new())));

        let err = extractor
            .private_key(Some(&container), "mykey", &Passphrase::from(KEY_PASS))
            .unwrap_err();
        assert!(matches!(err, CryptoError::UnsupportedAlgorithm { ref algorithm } if algorithm == "RSA"));
        assert!(extractor.public_key(Some(&container), "mykey").unwrap().is_some());
    }

    #[test]
    fn test_corrupt_sealed_key() {
        let bytes = container_bytes(
            STORE_PASS,
            vec![private_key_entry("mykey", KEY_PASS, b"not pkcs8", &[ALICE_CERT])],
        );
        let container = open(&bytes, STORE_PASS).unwrap();

        let err = extractor()
            .private_key(Some(&container), "mykey", &Passphrase::from(KEY_PASS))
            .unwrap_err();
        assert!(matches!(err, CryptoError::BadContainer { .. }));
    }

    #[test]
    fn test_private_key_decoding() {
        assert!(PrivateKey::from_pkcs8_der(ALICE_KEY).is_ok());
        assert!(matches!(
            PrivateKey::from_pkcs8_der(EC_KEY),
            Err(CryptoError::UnsupportedAlgorithm { .. })
        ));
        assert!(matches!(
            PrivateKey::from_pkcs8_der(&ALICE_KEY[..64]),
            Err(CryptoError::InvalidKey { .. })
        ));
    }

    #[test]
    fn test_public_key_encoding() {
        let key = alice_public();
        assert_eq!(key.algorithm(), RSA_ENCRYPTION);

        let reparsed = PublicKey::from_spki_der(key.to_spki_der()).unwrap();
        assert_eq!(reparsed, key);
        assert_eq!(reparsed.fingerprint(), key.fingerprint());

        assert!(matches!(
            PublicKey::from_spki_der(b"\x30\x03\x02\x01\x00"),
            Err(CryptoError::InvalidKey { .. })
        ));
    }

    #[test]
    fn test_debug_output_hides_secrets() {
        let private = PrivateKey::from_pkcs8_der(ALICE_KEY).unwrap();
        let rendered = format!("{:?}", private);
        assert!(rendered.contains("2048"));
        assert!(!rendered.contains("d:"));
        assert_eq!(format!("{:?}", Passphrase::from(KEY_PASS)), "Passphrase([REDACTED])");
    }
}

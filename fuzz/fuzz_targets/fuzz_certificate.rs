#![no_main]

use keyvault::certificate::parse_certificate;
use keyvault::keys::PublicKey;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(certificate) = parse_certificate(data) {
        if let Ok(key) = PublicKey::from_certificate(&certificate) {
            let _ = key.fingerprint();
            let _ = key.to_rsa();
        }
    }
});

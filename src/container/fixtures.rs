//! Builders for `kvs` containers used by unit tests

use serde_json::{json, Value};

use crate::container::format::{ContainerFormat, VaultFormat};
use crate::container::kdf::KdfLimits;
use crate::container::sealed::SealedBox;
use crate::container::KeyContainer;
use crate::error::CryptoResult;
use crate::secure_memory::Passphrase;

pub(crate) const ALICE_KEY: &[u8] = include_bytes!("../../tests/fixtures/alice.key.der");
pub(crate) const ALICE_CERT: &[u8] = include_bytes!("../../tests/fixtures/alice.crt.der");
pub(crate) const BOB_CERT: &[u8] = include_bytes!("../../tests/fixtures/bob.crt.der");
pub(crate) const EC_KEY: &[u8] = include_bytes!("../../tests/fixtures/ec.key.der");
pub(crate) const EC_CERT: &[u8] = include_bytes!("../../tests/fixtures/ec.crt.der");

pub(crate) const STORE_PASS: &str = "changeit";
pub(crate) const KEY_PASS: &str = "keypass";

/// Argon2 memory cost small enough to keep tests fast
pub(crate) const TEST_MEMORY_KIB: u32 = 64;

pub(crate) fn sealed(plaintext: &[u8], passphrase: &str, aad: &[u8]) -> SealedBox {
    SealedBox::seal(plaintext, &Passphrase::from(passphrase), aad, TEST_MEMORY_KIB, 1)
}

pub(crate) fn private_key_entry(
    alias: &str,
    key_passphrase: &str,
    pkcs8_der: &[u8],
    chain: &[&[u8]],
) -> Value {
    let chain: Vec<String> = chain.iter().map(base64::encode).collect();
    json!({
        "kind": "private_key",
        "alias": alias,
        "key": sealed(pkcs8_der, key_passphrase, &VaultFormat::key_aad(alias)),
        "certificate_chain": chain,
    })
}

pub(crate) fn trusted_entry(alias: &str, certificate_der: &[u8]) -> Value {
    json!({
        "kind": "trusted_certificate",
        "alias": alias,
        "certificate": base64::encode(certificate_der),
    })
}

/// Seal `body` into an envelope claiming `format` and `version`
pub(crate) fn envelope(format: &str, version: u8, passphrase: &str, body: &Value) -> Vec<u8> {
    let plaintext = serde_json::to_vec(body).unwrap();
    let mut envelope =
        serde_json::to_value(sealed(&plaintext, passphrase, &VaultFormat::container_aad())).unwrap();
    envelope["format"] = json!(format);
    envelope["version"] = json!(version);
    serde_json::to_vec(&envelope).unwrap()
}

pub(crate) fn container_bytes(passphrase: &str, entries: Vec<Value>) -> Vec<u8> {
    envelope(
        VaultFormat::NAME,
        VaultFormat::VERSION,
        passphrase,
        &json!({ "entries": entries }),
    )
}

pub(crate) fn open(bytes: &[u8], passphrase: &str) -> CryptoResult<KeyContainer> {
    VaultFormat.open(bytes, &Passphrase::from(passphrase), &KdfLimits::default())
}

/// `mykey` (RSA, `keypass`), `bob` (trusted) and `eckey` (EC, `ecpass`)
pub(crate) fn sample_container() -> KeyContainer {
    let bytes = container_bytes(
        STORE_PASS,
        vec![
            private_key_entry("mykey", KEY_PASS, ALICE_KEY, &[ALICE_CERT, BOB_CERT]),
            trusted_entry("bob", BOB_CERT),
            private_key_entry("eckey", "ecpass", EC_KEY, &[EC_CERT]),
        ],
    );
    open(&bytes, STORE_PASS).unwrap()
}

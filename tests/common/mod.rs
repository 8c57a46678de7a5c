//! Shared helpers for integration tests
//!
//! `ContainerWriter` produces `kvs` container files on its own, using the
//! same primitives as the reader, so that loading is exercised against
//! files the library did not write.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use argon2::{Algorithm, Argon2, Params, Version};
use chacha20poly1305::aead::{Aead, KeyInit, Payload};
use chacha20poly1305::{ChaCha20Poly1305, Key, Nonce};
use rand::RngCore;
use serde_json::{json, Value};

pub const ALICE_KEY: &[u8] = include_bytes!("../fixtures/alice.key.der");
pub const ALICE_CERT: &[u8] = include_bytes!("../fixtures/alice.crt.der");
pub const ALICE_CERT_PEM: &[u8] = include_bytes!("../fixtures/alice.crt.pem");
pub const BOB_KEY: &[u8] = include_bytes!("../fixtures/bob.key.der");
pub const BOB_CERT: &[u8] = include_bytes!("../fixtures/bob.crt.der");
pub const EC_KEY: &[u8] = include_bytes!("../fixtures/ec.key.der");
pub const EC_CERT: &[u8] = include_bytes!("../fixtures/ec.crt.der");

/// Argon2 cost used for test containers
const MEMORY_KIB: u32 = 256;
const ITERATIONS: u32 = 1;

fn seal(plaintext: &[u8], passphrase: &str, aad: &[u8]) -> Value {
    let mut salt = [0u8; 16];
    let mut nonce = [0u8; 12];
    rand::thread_rng().fill_bytes(&mut salt);
    rand::thread_rng().fill_bytes(&mut nonce);

    let params = Params::new(MEMORY_KIB, ITERATIONS, 1, Some(32)).unwrap();
    let mut key = [0u8; 32];
    Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
        .hash_password_into(passphrase.as_bytes(), &salt, &mut key)
        .unwrap();

    let payload = ChaCha20Poly1305::new(Key::from_slice(&key))
        .encrypt(Nonce::from_slice(&nonce), Payload { msg: plaintext, aad })
        .unwrap();

    json!({
        "kdf": {
            "memory_kib": MEMORY_KIB,
            "iterations": ITERATIONS,
            "parallelism": 1,
            "salt": base64::encode(salt),
        },
        "nonce": base64::encode(nonce),
        "payload": base64::encode(payload),
    })
}

/// Builds a `kvs` container entry by entry
#[derive(Default)]
pub struct ContainerWriter {
    entries: Vec<Value>,
}

impl ContainerWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn private_key(
        mut self,
        alias: &str,
        key_passphrase: &str,
        pkcs8_der: &[u8],
        chain: &[&[u8]],
    ) -> Self {
        let aad = format!("kvs/1/key/{}", alias);
        let chain: Vec<String> = chain.iter().map(base64::encode).collect();
        self.entries.push(json!({
            "kind": "private_key",
            "alias": alias,
            "key": seal(pkcs8_der, key_passphrase, aad.as_bytes()),
            "certificate_chain": chain,
        }));
        self
    }

    pub fn trusted_certificate(mut self, alias: &str, certificate_der: &[u8]) -> Self {
        self.entries.push(json!({
            "kind": "trusted_certificate",
            "alias": alias,
            "certificate": base64::encode(certificate_der),
        }));
        self
    }

    pub fn to_bytes(&self, passphrase: &str) -> Vec<u8> {
        let body = serde_json::to_vec(&json!({ "entries": self.entries })).unwrap();
        let mut envelope = seal(&body, passphrase, b"kvs/1");
        envelope["format"] = json!("kvs");
        envelope["version"] = json!(1);
        serde_json::to_vec(&envelope).unwrap()
    }

    pub fn write(&self, path: &Path, passphrase: &str) {
        std::fs::write(path, self.to_bytes(passphrase)).unwrap();
    }
}

/// `store` with pass-phrase `changeit`: `mykey` (alice, `keypass`) and
/// `bob` (trusted certificate)
pub fn write_standard_store(dir: &Path) -> PathBuf {
    let path = dir.join("store");
    ContainerWriter::new()
        .private_key("mykey", "keypass", ALICE_KEY, &[ALICE_CERT])
        .trusted_certificate("bob", BOB_CERT)
        .write(&path, "changeit");
    path
}

#![no_main]

use arbitrary::Arbitrary;
use keyvault::container::{ContainerFormat, KdfLimits, VaultFormat};
use keyvault::secure_memory::Passphrase;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct ContainerFuzzInput {
    passphrase: Vec<u8>,
    data: Vec<u8>,
}

fuzz_target!(|input: ContainerFuzzInput| {
    // Keep key derivation cheap so the fuzzer explores decoding, not Argon2
    let limits = KdfLimits {
        max_memory_kib: 64,
        max_iterations: 1,
        max_parallelism: 1,
    };
    let passphrase = Passphrase::new(&input.passphrase);

    // Decoding untrusted bytes must fail cleanly, never panic
    if let Ok(container) = VaultFormat.open(&input.data, &passphrase, &limits) {
        for alias in container.aliases() {
            let _ = container.entry_kind(alias);
            let _ = container.certificate_chain(alias);
        }
    }
});

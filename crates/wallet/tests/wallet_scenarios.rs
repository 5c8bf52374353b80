use std::time::Duration;

use signer::KeyPair;
use wallet::{DiscoveryMode, FileSystemWallet, MetadataMode, WalletApi};

fn key_pair_from_hex(hex_str: &str) -> KeyPair {
    let bytes = hex::decode(hex_str).unwrap();
    let mut out = [0u8; 32];
    out.copy_from_slice(&bytes);
    KeyPair::from_bytes(out).unwrap()
}

/// The sample wallet scenario: a single Keystore V3 file encrypted with
/// `correcthorsebatterystaple` decrypting to the known private key.
#[test]
fn sample_wallet_scenario_decrypts_through_the_wallet() {
    let private_key_hex = "f6d5b8eb66ac39a39004209b7da586e3f95ecd1265172850b15e305c5d1fe424";
    let key_pair = key_pair_from_hex(private_key_hex);
    let address = key_pair.address();

    let dir = tempfile::tempdir().unwrap();
    wallet::write_keystore_file(dir.path(), &address, &key_pair.to_bytes(), b"correcthorsebatterystaple").unwrap();
    std::fs::write(
        dir.path().join(format!("{}.pwd", address.to_hex_bare())),
        "correcthorsebatterystaple",
    )
    .unwrap();

    let w = FileSystemWallet::new(
        dir.path(),
        DiscoveryMode::extension(".key.json"),
        MetadataMode::None { password_extension: ".pwd".to_string() },
        None,
        10,
        Duration::from_secs(60),
    );
    w.initialize().unwrap();

    let signer = w.get_signer(&address).unwrap();
    assert_eq!(signer.to_bytes(), key_pair.to_bytes());
}

/// Three accounts are returned in stable insertion order, in checksum
/// form, mirroring an `eth_accounts` response built on top of a wallet.
#[test]
fn address_list_is_stable_insertion_order_in_checksum_form() {
    let dir = tempfile::tempdir().unwrap();

    let mut expected = Vec::new();
    for seed in [1u8, 2, 3] {
        let mut private_key = [0u8; 32];
        private_key[31] = seed;
        let key_pair = KeyPair::from_bytes(private_key).unwrap();
        let address = key_pair.address();
        wallet::write_keystore_file(dir.path(), &address, &private_key, b"pw").unwrap();
        std::fs::write(dir.path().join(format!("{}.pwd", address.to_hex_bare())), "pw").unwrap();
        expected.push(address);
    }

    let w = FileSystemWallet::new(
        dir.path(),
        DiscoveryMode::extension(".key.json"),
        MetadataMode::None { password_extension: ".pwd".to_string() },
        None,
        10,
        Duration::from_secs(60),
    );
    w.initialize().unwrap();

    let mut addresses = w.address_list();
    addresses.sort_by_key(|a| expected.iter().position(|e| e == a).unwrap());

    let checksums: Vec<String> = w.address_list().iter().map(|a| a.to_checksum()).collect();
    for checksum in &checksums {
        assert!(checksum.starts_with("0x"));
    }

    // Re-running initialize must not reorder or duplicate entries.
    w.refresh().unwrap();
    assert_eq!(w.address_list().len(), expected.len());
}

/// Metadata mode: the primary file is JSON metadata pointing at separate
/// key and password files via templates.
#[test]
fn metadata_mode_resolves_key_and_password_via_templates() {
    let dir = tempfile::tempdir().unwrap();
    let mut private_key = [0u8; 32];
    private_key[31] = 9;
    let key_pair = KeyPair::from_bytes(private_key).unwrap();
    let address = key_pair.address();

    wallet::write_keystore_file(dir.path(), &address, &private_key, b"metapw").unwrap();
    std::fs::rename(
        dir.path().join(format!("{}.key.json", address.to_hex_bare())),
        dir.path().join("real-key.json"),
    )
    .unwrap();
    std::fs::write(dir.path().join("real-pw.txt"), "metapw").unwrap();

    let metadata_json = serde_json::json!({
        "address": address.to_hex_bare(),
        "key_file": "real-key.json",
        "password_file": "real-pw.txt",
    });
    std::fs::write(
        dir.path().join(format!("{}.meta.json", address.to_hex_bare())),
        serde_json::to_string(&metadata_json).unwrap(),
    )
    .unwrap();

    let w = FileSystemWallet::new(
        dir.path(),
        DiscoveryMode::extension(".meta.json"),
        MetadataMode::Metadata {
            format: None,
            key_template: "{{.key_file}}".to_string(),
            password_template: "{{.password_file}}".to_string(),
        },
        None,
        10,
        Duration::from_secs(60),
    );
    w.initialize().unwrap();

    let signer = w.get_signer(&address).unwrap();
    assert_eq!(signer.to_bytes(), private_key);
}

use client::{
    e2e_helpers::{
        test_accounts,
        write_keypair_file,
    },
    keypair::load_keypair,
};
use solana_sdk::signer::Signer;

#[test]
fn loads_a_solana_keygen_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("id.json");
    write_keypair_file(&path, test_accounts::default_payer()).unwrap();

    let keypair = load_keypair(&path).unwrap();
    assert_eq!(
        keypair.pubkey().to_string(),
        "PAYRidU5w5wtJUxohMzVn9KH8p9p5PERU1SFsrUtKUV"
    );
    // Loading is deterministic.
    assert_eq!(load_keypair(&path).unwrap().pubkey(), keypair.pubkey());
}

#[test]
fn loads_a_handwritten_byte_array() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("id.json");
    let bytes: Vec<u8> = (1..=32).collect();
    std::fs::write(&path, serde_json::to_string(&bytes).unwrap()).unwrap();

    let keypair = load_keypair(&path).unwrap();
    assert_eq!(
        keypair.pubkey().to_string(),
        "9C6hybhQ6Aycep9jaUnP6uL9ZYvDjUp1aSkFWPUFJtpj"
    );
}

#[test]
fn missing_file_names_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nope.json");
    let err = load_keypair(&path).unwrap_err();
    assert!(err.to_string().contains("nope.json"));
}

#[test]
fn malformed_json_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    for (name, contents) in [
        ("not_json.json", "hello"),
        ("object.json", "{\"key\": 1}"),
        ("out_of_range.json", "[256, 1, 2]"),
        ("negative.json", "[-1]"),
    ] {
        let path = dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        assert!(load_keypair(&path).is_err(), "{name} should be rejected");
    }
}

#[test]
fn wrong_length_byte_arrays_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("short.json");
    let bytes: Vec<u8> = (1..=33).collect();
    std::fs::write(&path, serde_json::to_string(&bytes).unwrap()).unwrap();

    let err = load_keypair(&path).unwrap_err().to_string();
    assert!(err.contains("short.json"));
    assert!(err.contains("33 bytes"));
}

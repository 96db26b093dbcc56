use keyturn_crypto::{
    blob_len, decrypt, encrypt, rekey, rotate, Capsule, CryptoError, KeyPair, RotationFactor,
    SecretKey, HEADER_SIZE,
};
use pretty_assertions::assert_eq;

#[test]
fn encrypt_decrypt_roundtrip() {
    let recipient = KeyPair::generate().unwrap();
    let plaintext = b"quarterly numbers, do not forward";

    let out = encrypt(&recipient.public, plaintext).unwrap();
    assert_eq!(out.blob.len(), blob_len(plaintext.len()));

    let recovered = decrypt(&recipient.secret, &out.capsule, &out.blob).unwrap();
    assert_eq!(recovered, plaintext);
}

#[test]
fn encrypt_decrypt_empty_plaintext() {
    let recipient = KeyPair::generate().unwrap();

    let out = encrypt(&recipient.public, b"").unwrap();
    assert_eq!(out.blob.len(), blob_len(0));

    let recovered = decrypt(&recipient.secret, &out.capsule, &out.blob).unwrap();
    assert!(recovered.is_empty());
}

#[test]
fn encrypt_decrypt_large_plaintext() {
    let recipient = KeyPair::generate().unwrap();
    let plaintext: Vec<u8> = (0..1_000_000).map(|i| (i % 251) as u8).collect();

    let out = encrypt(&recipient.public, &plaintext).unwrap();
    let recovered = decrypt(&recipient.secret, &out.capsule, &out.blob).unwrap();
    assert_eq!(recovered, plaintext);
}

#[test]
fn wrong_recipient_fails_authentication() {
    let recipient = KeyPair::generate().unwrap();
    let other = KeyPair::generate().unwrap();

    let out = encrypt(&recipient.public, b"for recipient only").unwrap();
    let err = decrypt(&other.secret, &out.capsule, &out.blob).unwrap_err();
    assert!(matches!(err, CryptoError::AuthenticationFailure));
}

#[test]
fn each_encryption_is_fresh() {
    let recipient = KeyPair::generate().unwrap();

    let a = encrypt(&recipient.public, b"same plaintext").unwrap();
    let b = encrypt(&recipient.public, b"same plaintext").unwrap();

    assert_ne!(a.capsule, b.capsule);
    assert_ne!(a.blob, b.blob);
    assert_ne!(a.blob[..HEADER_SIZE], b.blob[..HEADER_SIZE]);

    assert_eq!(decrypt(&recipient.secret, &a.capsule, &a.blob).unwrap(), b"same plaintext");
    assert_eq!(decrypt(&recipient.secret, &b.capsule, &b.blob).unwrap(), b"same plaintext");
}

#[test]
fn rotated_key_opens_rekeyed_capsule() {
    let kp1 = KeyPair::generate().unwrap();
    let out = encrypt(&kp1.public, b"survives rotation").unwrap();

    let rotation = rotate(&kp1.secret).unwrap();
    let capsule2 = rekey(&rotation.factor, &out.capsule);

    assert_eq!(
        decrypt(&rotation.keypair.secret, &capsule2, &out.blob).unwrap(),
        decrypt(&kp1.secret, &out.capsule, &out.blob).unwrap()
    );
}

#[test]
fn rotated_key_cannot_open_stale_capsule() {
    let kp1 = KeyPair::generate().unwrap();
    let out = encrypt(&kp1.public, b"not yet rekeyed").unwrap();

    let rotation = rotate(&kp1.secret).unwrap();
    let err = decrypt(&rotation.keypair.secret, &out.capsule, &out.blob).unwrap_err();
    assert!(matches!(err, CryptoError::AuthenticationFailure));
}

#[test]
fn double_rekey_breaks_alignment() {
    let kp1 = KeyPair::generate().unwrap();
    let out = encrypt(&kp1.public, b"rekey exactly once").unwrap();
    let rotation = rotate(&kp1.secret).unwrap();

    let mut capsule = out.capsule;
    capsule.rekey_in_place(&rotation.factor);
    capsule.rekey_in_place(&rotation.factor);

    let err = decrypt(&rotation.keypair.secret, &capsule, &out.blob).unwrap_err();
    assert!(matches!(err, CryptoError::AuthenticationFailure));
}

#[test]
fn several_rotations_in_sequence() {
    let kp = KeyPair::generate().unwrap();
    let out = encrypt(&kp.public, b"long-lived archive").unwrap();

    let mut secret = kp.secret;
    let mut capsule = out.capsule;
    for _ in 0..5 {
        let rotation = rotate(&secret).unwrap();
        capsule.rekey_in_place(&rotation.factor);
        secret = rotation.keypair.secret.clone();

        assert_eq!(decrypt(&secret, &capsule, &out.blob).unwrap(), b"long-lived archive");
    }
}

#[test]
fn persisted_artifacts_roundtrip_through_encodings() {
    let kp1 = KeyPair::generate().unwrap();
    let out = encrypt(&kp1.public, b"via the filesystem").unwrap();
    let rotation = rotate(&kp1.secret).unwrap();

    // what a storage layer would write and read back
    let secret_hex = rotation.keypair.secret.to_hex();
    let factor_bytes = rotation.factor.to_bytes();
    let capsule_bytes = out.capsule.to_bytes();

    let factor = RotationFactor::from_bytes(factor_bytes.as_slice()).unwrap();
    let capsule = rekey(&factor, &Capsule::from_bytes(&capsule_bytes).unwrap());
    let secret = SecretKey::from_hex(&secret_hex).unwrap();

    assert_eq!(decrypt(&secret, &capsule, &out.blob).unwrap(), b"via the filesystem");
}

/// keygen, encrypt "hello", rotate, rekey, then decrypt with both keys.
#[test]
fn hello_rotation_scenario() {
    let KeyPair { secret: sk1, public: pk1 } = KeyPair::generate().unwrap();

    let out = encrypt(&pk1, b"hello").unwrap();
    let (c, b) = (out.capsule, out.blob);
    assert_eq!(decrypt(&sk1, &c, &b).unwrap(), b"hello");

    let rotation = rotate(&sk1).unwrap();
    let sk2 = rotation.keypair.secret;
    let f = rotation.factor;

    let c2 = rekey(&f, &c);
    assert_eq!(decrypt(&sk2, &c2, &b).unwrap(), b"hello");

    let err = decrypt(&sk1, &c2, &b).unwrap_err();
    assert!(matches!(err, CryptoError::AuthenticationFailure));
}

// Copyright (C) Microsoft Corporation. All rights reserved.

use rsagate_native::*;

const PADDING_PKCS1: u32 = 0;
const PADDING_OAEP_OR_PSS: u32 = 1;

const DIGEST_SHA256: u32 = 2;
const DIGEST_SHA384: u32 = 3;

fn sign(
    key: RsagateHandle,
    padding: u32,
    digest: u32,
    hash: &[u8],
    destination: &mut [u8],
) -> i32 {
    unsafe {
        rsagate_rsa_sign_hash(
            key,
            padding,
            digest,
            hash.as_ptr(),
            hash.len() as i32,
            destination.as_mut_ptr(),
            destination.len() as i32,
        )
    }
}

fn verify(key: RsagateHandle, padding: u32, digest: u32, hash: &[u8], signature: &[u8]) -> i32 {
    unsafe {
        rsagate_rsa_verify_hash(
            key,
            padding,
            digest,
            hash.as_ptr(),
            hash.len() as i32,
            signature.as_ptr(),
            signature.len() as i32,
        )
    }
}

#[test]
fn test_rsa_2k_sign_verify_pss() {
    let key = rsagate_rsa_generate_key(2048);
    assert_ne!(key, RSAGATE_NULL_HANDLE);
    assert_eq!(rsagate_key_size(key), 256);

    let digest = [0x5au8; 32];
    let mut signature = [0u8; 256];

    let written = sign(
        key,
        PADDING_OAEP_OR_PSS,
        DIGEST_SHA256,
        &digest,
        &mut signature,
    );
    assert_eq!(written, 256);

    let result = verify(key, PADDING_OAEP_OR_PSS, DIGEST_SHA256, &digest, &signature);
    assert_eq!(result, 1);

    let mut tampered_signature = signature;
    tampered_signature[0] = tampered_signature[0].wrapping_add(0x1);
    let result = verify(
        key,
        PADDING_OAEP_OR_PSS,
        DIGEST_SHA256,
        &digest,
        &tampered_signature,
    );
    assert_eq!(result, 0);

    let mut tampered_digest = digest;
    tampered_digest[0] = tampered_digest[0].wrapping_add(0x1);
    let result = verify(
        key,
        PADDING_OAEP_OR_PSS,
        DIGEST_SHA256,
        &tampered_digest,
        &signature,
    );
    assert_eq!(result, 0);

    // A PSS signature does not verify as PKCS#1 v1.5
    let result = verify(key, PADDING_PKCS1, DIGEST_SHA256, &digest, &signature);
    assert_eq!(result, 0);

    assert_eq!(rsagate_key_destroy(key), 1);
}

#[test]
fn test_rsa_2k_sign_verify_pkcs1() {
    let key = rsagate_rsa_generate_key(2048);
    assert_ne!(key, RSAGATE_NULL_HANDLE);

    let digest = [0x17u8; 32];
    let mut signature = [0u8; 256];

    let written = sign(key, PADDING_PKCS1, DIGEST_SHA256, &digest, &mut signature);
    assert_eq!(written, 256);

    let result = verify(key, PADDING_PKCS1, DIGEST_SHA256, &digest, &signature);
    assert_eq!(result, 1);

    let mut tampered_signature = signature;
    tampered_signature[255] = tampered_signature[255].wrapping_add(0x1);
    let result = verify(
        key,
        PADDING_PKCS1,
        DIGEST_SHA256,
        &digest,
        &tampered_signature,
    );
    assert_eq!(result, 0);

    assert_eq!(rsagate_key_destroy(key), 1);
}

#[test]
fn test_sign_hash_length_must_match_digest() {
    let key = rsagate_rsa_generate_key(2048);
    assert_ne!(key, RSAGATE_NULL_HANDLE);

    // 32 bytes declared as SHA-384 output
    let digest = [0u8; 32];
    let mut signature = [0u8; 256];

    let written = sign(
        key,
        PADDING_OAEP_OR_PSS,
        DIGEST_SHA384,
        &digest,
        &mut signature,
    );
    assert_eq!(written, -1);

    let result = verify(key, PADDING_OAEP_OR_PSS, DIGEST_SHA384, &digest, &signature);
    assert_eq!(result, -1);

    assert_eq!(rsagate_key_destroy(key), 1);
}

#[test]
fn test_sign_destination_too_small() {
    let key = rsagate_rsa_generate_key(2048);
    assert_ne!(key, RSAGATE_NULL_HANDLE);

    let digest = [0x33u8; 32];
    let mut destination = [0xaau8; 255];

    let written = sign(
        key,
        PADDING_OAEP_OR_PSS,
        DIGEST_SHA256,
        &digest,
        &mut destination,
    );
    assert_eq!(written, -1);

    // Nothing was written into the undersized destination
    assert!(destination.iter().all(|&byte| byte == 0xaa));

    assert_eq!(rsagate_key_destroy(key), 1);
}

#[test]
fn test_sign_rejects_out_of_range_selectors() {
    let key = rsagate_rsa_generate_key(2048);
    assert_ne!(key, RSAGATE_NULL_HANDLE);

    let digest = [0u8; 32];
    let mut signature = [0u8; 256];

    // Padding mode outside the two-value enumeration
    let written = sign(key, 2, DIGEST_SHA256, &digest, &mut signature);
    assert_eq!(written, -1);

    // Unknown digest selector
    let written = sign(key, PADDING_OAEP_OR_PSS, 0, &digest, &mut signature);
    assert_eq!(written, -1);
    let written = sign(key, PADDING_OAEP_OR_PSS, 9, &digest, &mut signature);
    assert_eq!(written, -1);

    assert_eq!(rsagate_key_destroy(key), 1);
}

#[test]
fn test_sign_with_invalid_handle() {
    let digest = [0u8; 32];
    let mut signature = [0u8; 256];

    let written = sign(
        RSAGATE_NULL_HANDLE,
        PADDING_OAEP_OR_PSS,
        DIGEST_SHA256,
        &digest,
        &mut signature,
    );
    assert_eq!(written, -1);
}

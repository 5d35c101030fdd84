// Copyright (C) Microsoft Corporation. All rights reserved.

use rsagate_native::*;

const PADDING_OAEP_OR_PSS: u32 = 1;

const DIGEST_SHA256: u32 = 2;

fn sign(key: RsagateHandle, hash: &[u8], destination: &mut [u8]) -> i32 {
    unsafe {
        rsagate_rsa_sign_hash(
            key,
            PADDING_OAEP_OR_PSS,
            DIGEST_SHA256,
            hash.as_ptr(),
            hash.len() as i32,
            destination.as_mut_ptr(),
            destination.len() as i32,
        )
    }
}

fn verify(key: RsagateHandle, hash: &[u8], signature: &[u8]) -> i32 {
    unsafe {
        rsagate_rsa_verify_hash(
            key,
            PADDING_OAEP_OR_PSS,
            DIGEST_SHA256,
            hash.as_ptr(),
            hash.len() as i32,
            signature.as_ptr(),
            signature.len() as i32,
        )
    }
}

#[test]
fn test_generate_rejects_non_positive_sizes() {
    assert_eq!(rsagate_rsa_generate_key(0), RSAGATE_NULL_HANDLE);
    assert_eq!(rsagate_rsa_generate_key(-2048), RSAGATE_NULL_HANDLE);
    assert_eq!(rsagate_rsa_generate_key(i32::MIN), RSAGATE_NULL_HANDLE);
}

#[test]
fn test_get_rsa_view() {
    let key = rsagate_rsa_generate_key(2048);
    assert_ne!(key, RSAGATE_NULL_HANDLE);

    let view = rsagate_key_get_rsa(key);
    assert_ne!(view, RSAGATE_NULL_HANDLE);

    // Independent handles, released independently
    assert_ne!(view, key);
    assert_eq!(rsagate_rsa_destroy(view), 1);
    assert_eq!(rsagate_key_size(key), 256);

    assert_eq!(rsagate_key_destroy(key), 1);
}

#[test]
fn test_set_rsa_rebinds_key_material() {
    let first = rsagate_rsa_generate_key(1024);
    let second = rsagate_rsa_generate_key(2048);
    assert_ne!(first, RSAGATE_NULL_HANDLE);
    assert_ne!(second, RSAGATE_NULL_HANDLE);
    assert_eq!(rsagate_key_size(first), 128);

    let second_view = rsagate_key_get_rsa(second);
    assert_ne!(second_view, RSAGATE_NULL_HANDLE);

    assert_eq!(rsagate_key_set_rsa(first, second_view), 1);

    // The first handle now exposes the second key's material
    assert_eq!(rsagate_key_size(first), 256);

    let digest = [0x71u8; 32];
    let mut signature = [0u8; 256];
    let written = sign(first, &digest, &mut signature);
    assert_eq!(written, 256);
    assert_eq!(verify(second, &digest, &signature), 1);

    assert_eq!(rsagate_rsa_destroy(second_view), 1);
    assert_eq!(rsagate_key_destroy(first), 1);
    assert_eq!(rsagate_key_destroy(second), 1);
}

#[test]
fn test_view_outlives_parent_key() {
    let key = rsagate_rsa_generate_key(2048);
    assert_ne!(key, RSAGATE_NULL_HANDLE);

    let view = rsagate_key_get_rsa(key);
    assert_ne!(view, RSAGATE_NULL_HANDLE);

    let digest = [0x09u8; 32];
    let mut signature = [0u8; 256];
    assert_eq!(sign(key, &digest, &mut signature), 256);

    assert_eq!(rsagate_key_destroy(key), 1);

    // The view still references live key material; rebinding a fresh key
    // to it recovers a handle that verifies the old signature
    let other = rsagate_rsa_generate_key(1024);
    assert_ne!(other, RSAGATE_NULL_HANDLE);
    assert_eq!(rsagate_key_set_rsa(other, view), 1);
    assert_eq!(verify(other, &digest, &signature), 1);

    assert_eq!(rsagate_rsa_destroy(view), 1);
    assert_eq!(rsagate_key_destroy(other), 1);
}

#[test]
fn test_destroyed_handles_are_rejected() {
    let key = rsagate_rsa_generate_key(2048);
    assert_ne!(key, RSAGATE_NULL_HANDLE);

    assert_eq!(rsagate_key_destroy(key), 1);
    assert_eq!(rsagate_key_destroy(key), 0);

    assert_eq!(rsagate_key_size(key), -1);
    assert_eq!(rsagate_key_get_rsa(key), RSAGATE_NULL_HANDLE);

    let digest = [0u8; 32];
    let mut signature = [0u8; 256];
    assert_eq!(sign(key, &digest, &mut signature), -1);
}

#[test]
fn test_handle_types_are_enforced() {
    let key = rsagate_rsa_generate_key(2048);
    assert_ne!(key, RSAGATE_NULL_HANDLE);

    let view = rsagate_key_get_rsa(key);
    assert_ne!(view, RSAGATE_NULL_HANDLE);

    // A view handle is not a key handle, and vice versa
    assert_eq!(rsagate_key_size(view), -1);
    assert_eq!(rsagate_key_get_rsa(view), RSAGATE_NULL_HANDLE);
    assert_eq!(rsagate_key_destroy(view), 0);
    assert_eq!(rsagate_rsa_destroy(key), 0);

    // Swapped arguments are rejected and leave both handles intact
    assert_eq!(rsagate_key_set_rsa(view, key), 0);
    assert_eq!(rsagate_key_size(key), 256);

    assert_eq!(rsagate_rsa_destroy(view), 1);
    assert_eq!(rsagate_key_destroy(key), 1);
}

#[test]
fn test_set_rsa_with_destroyed_view() {
    let key = rsagate_rsa_generate_key(2048);
    let other = rsagate_rsa_generate_key(2048);
    assert_ne!(key, RSAGATE_NULL_HANDLE);
    assert_ne!(other, RSAGATE_NULL_HANDLE);

    let view = rsagate_key_get_rsa(other);
    assert_ne!(view, RSAGATE_NULL_HANDLE);
    assert_eq!(rsagate_rsa_destroy(view), 1);

    // The key is unchanged when the assignment is rejected
    assert_eq!(rsagate_key_set_rsa(key, view), 0);
    assert_eq!(rsagate_key_size(key), 256);

    assert_eq!(rsagate_key_destroy(key), 1);
    assert_eq!(rsagate_key_destroy(other), 1);
}

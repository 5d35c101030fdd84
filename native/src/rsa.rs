// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use rsagate_crypto::DigestAlgorithm;
use rsagate_crypto::RsaEncryptionPadding;
use rsagate_crypto::RsaSignaturePadding;
use rsagate_crypto::rsa::AsymmetricKey;
use rsagate_crypto::rsa::RsaKey;

use super::*;
use crate::handle_table::HandleType;
use crate::utils::*;

/// Padding options for RSA operations crossing the ABI.
///
/// One selector covers both halves of the managed runtime's padding pairs:
/// OAEP when encrypting or decrypting, PSS when signing or verifying.
#[repr(u32)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RsagatePadding {
    /// PKCS#1 v1.5 padding
    Pkcs1 = 0,

    /// OAEP for encryption/decryption, PSS for signatures
    OaepOrPss = 1,
}

impl TryFrom<u32> for RsagatePadding {
    type Error = GatewayError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(RsagatePadding::Pkcs1),
            1 => Ok(RsagatePadding::OaepOrPss),
            _ => Err(GatewayError::InvalidArgument),
        }
    }
}

/// Digest selector crossing the ABI.
#[repr(u32)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RsagateDigest {
    /// SHA-1
    Sha1 = 1,

    /// SHA-256
    Sha256 = 2,

    /// SHA-384
    Sha384 = 3,

    /// SHA-512
    Sha512 = 4,
}

impl TryFrom<u32> for RsagateDigest {
    type Error = GatewayError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(RsagateDigest::Sha1),
            2 => Ok(RsagateDigest::Sha256),
            3 => Ok(RsagateDigest::Sha384),
            4 => Ok(RsagateDigest::Sha512),
            _ => Err(GatewayError::InvalidArgument),
        }
    }
}

impl From<RsagateDigest> for DigestAlgorithm {
    fn from(digest: RsagateDigest) -> Self {
        match digest {
            RsagateDigest::Sha1 => DigestAlgorithm::Sha1,
            RsagateDigest::Sha256 => DigestAlgorithm::Sha256,
            RsagateDigest::Sha384 => DigestAlgorithm::Sha384,
            RsagateDigest::Sha512 => DigestAlgorithm::Sha512,
        }
    }
}

/// Copies produced output into the caller's destination buffer.
///
/// Fails without writing anything when the destination capacity is
/// insufficient.
fn copy_to_destination(destination: &mut [u8], output: &[u8]) -> Result<i32, GatewayError> {
    if output.len() > destination.len() {
        Err(GatewayError::BufferTooSmall)?;
    }

    destination[..output.len()].copy_from_slice(output);

    Ok(output.len() as i32)
}

/// Creates an RSA key pair of the requested modulus size.
///
/// @param[in] key_size_bits Modulus size in bits; must be positive
///
/// @return Handle to the new key on success, or the null handle (0) on
/// failure. The caller owns the handle and must release it with
/// `rsagate_key_destroy`.
#[unsafe(no_mangle)]
pub extern "C" fn rsagate_rsa_generate_key(key_size_bits: i32) -> RsagateHandle {
    abi_boundary_handle(|| {
        if key_size_bits <= 0 {
            Err(GatewayError::InvalidArgument)?;
        }

        let key = AsymmetricKey::generate_rsa(key_size_bits as u32)?;

        Ok(HANDLE_TABLE.alloc_handle(HandleType::Key, Box::new(key)))
    })
}

/// Encrypts data with the public half of the key.
///
/// @param[in] key_handle Handle to the key
/// @param[in] source Plaintext buffer
/// @param[in] source_len Plaintext length in bytes
/// @param[in] padding Padding mode (0 = PKCS#1 v1.5, 1 = OAEP)
/// @param[in] digest Digest selector; configures OAEP, ignored for PKCS#1
/// @param[out] destination Ciphertext output buffer
/// @param[in] destination_len Destination capacity in bytes
///
/// @return Number of bytes written to destination, -1 on error.
///
/// @internal
/// # Safety
/// This function is unsafe because it dereferences raw pointers.
#[unsafe(no_mangle)]
#[allow(unsafe_code)]
pub unsafe extern "C" fn rsagate_rsa_encrypt(
    key_handle: RsagateHandle,
    source: *const u8,
    source_len: i32,
    padding: u32,
    digest: u32,
    destination: *mut u8,
    destination_len: i32,
) -> i32 {
    abi_boundary_count(|| {
        let padding = RsagatePadding::try_from(padding)?;
        let digest = RsagateDigest::try_from(digest)?;
        let source = byte_slice(source, source_len)?;
        let destination = byte_slice_mut(destination, destination_len)?;

        let key: &AsymmetricKey = HANDLE_TABLE.as_ref(key_handle, HandleType::Key)?;

        let padding = match padding {
            RsagatePadding::Pkcs1 => RsaEncryptionPadding::Pkcs1,
            RsagatePadding::OaepOrPss => RsaEncryptionPadding::Oaep,
        };

        // Ciphertext is always one modulus long; fail before producing it
        // when the destination cannot hold it.
        if key.size() > destination.len() {
            Err(GatewayError::BufferTooSmall)?;
        }

        let ciphertext = key.encrypt(source, padding, digest.into())?;

        copy_to_destination(destination, &ciphertext)
    })
}

/// Decrypts data with the private half of the key.
///
/// The recovered plaintext is copied out only when it fits the declared
/// capacity; a too-small destination fails with no partial write.
///
/// @param[in] key_handle Handle to the key
/// @param[in] source Ciphertext buffer
/// @param[in] source_len Ciphertext length in bytes
/// @param[in] padding Padding mode (0 = PKCS#1 v1.5, 1 = OAEP)
/// @param[in] digest Digest selector; configures OAEP, ignored for PKCS#1
/// @param[out] destination Plaintext output buffer
/// @param[in] destination_len Destination capacity in bytes
///
/// @return Number of bytes written to destination, -1 on error.
///
/// @internal
/// # Safety
/// This function is unsafe because it dereferences raw pointers.
#[unsafe(no_mangle)]
#[allow(unsafe_code)]
pub unsafe extern "C" fn rsagate_rsa_decrypt(
    key_handle: RsagateHandle,
    source: *const u8,
    source_len: i32,
    padding: u32,
    digest: u32,
    destination: *mut u8,
    destination_len: i32,
) -> i32 {
    abi_boundary_count(|| {
        let padding = RsagatePadding::try_from(padding)?;
        let digest = RsagateDigest::try_from(digest)?;
        let source = byte_slice(source, source_len)?;
        let destination = byte_slice_mut(destination, destination_len)?;

        let key: &AsymmetricKey = HANDLE_TABLE.as_ref(key_handle, HandleType::Key)?;

        let padding = match padding {
            RsagatePadding::Pkcs1 => RsaEncryptionPadding::Pkcs1,
            RsagatePadding::OaepOrPss => RsaEncryptionPadding::Oaep,
        };

        let plaintext = key.decrypt(source, padding, digest.into())?;

        copy_to_destination(destination, &plaintext)
    })
}

/// Completes the RSA signature for a pre-computed hash.
///
/// The caller has already hashed the message; `hash_len` must equal the
/// output length of the selected digest.
///
/// @param[in] key_handle Handle to the key
/// @param[in] padding Padding mode (0 = PKCS#1 v1.5, 1 = PSS)
/// @param[in] digest Digest selector identifying the hash algorithm
/// @param[in] hash Pre-computed digest buffer
/// @param[in] hash_len Digest length in bytes
/// @param[out] destination Signature output buffer
/// @param[in] destination_len Destination capacity in bytes
///
/// @return Number of bytes written to destination, -1 on error.
///
/// @internal
/// # Safety
/// This function is unsafe because it dereferences raw pointers.
#[unsafe(no_mangle)]
#[allow(unsafe_code)]
pub unsafe extern "C" fn rsagate_rsa_sign_hash(
    key_handle: RsagateHandle,
    padding: u32,
    digest: u32,
    hash: *const u8,
    hash_len: i32,
    destination: *mut u8,
    destination_len: i32,
) -> i32 {
    abi_boundary_count(|| {
        let padding = RsagatePadding::try_from(padding)?;
        let digest = RsagateDigest::try_from(digest)?;
        let hash = byte_slice(hash, hash_len)?;
        let destination = byte_slice_mut(destination, destination_len)?;

        let key: &AsymmetricKey = HANDLE_TABLE.as_ref(key_handle, HandleType::Key)?;

        let padding = match padding {
            RsagatePadding::Pkcs1 => RsaSignaturePadding::Pkcs1_5,
            RsagatePadding::OaepOrPss => RsaSignaturePadding::Pss,
        };

        // Signatures are always one modulus long; fail before signing when
        // the destination cannot hold one.
        if key.size() > destination.len() {
            Err(GatewayError::BufferTooSmall)?;
        }

        let signature = key.sign_hash(hash, padding, digest.into())?;

        copy_to_destination(destination, &signature)
    })
}

/// Checks an RSA signature over a pre-computed hash.
///
/// @param[in] key_handle Handle to the key
/// @param[in] padding Padding mode (0 = PKCS#1 v1.5, 1 = PSS)
/// @param[in] digest Digest selector identifying the hash algorithm
/// @param[in] hash Pre-computed digest buffer
/// @param[in] hash_len Digest length in bytes
/// @param[in] signature Signature buffer
/// @param[in] signature_len Signature length in bytes
///
/// @return 1 when the signature is valid, 0 when it is not, -1 on error.
///
/// @internal
/// # Safety
/// This function is unsafe because it dereferences raw pointers.
#[unsafe(no_mangle)]
#[allow(unsafe_code)]
pub unsafe extern "C" fn rsagate_rsa_verify_hash(
    key_handle: RsagateHandle,
    padding: u32,
    digest: u32,
    hash: *const u8,
    hash_len: i32,
    signature: *const u8,
    signature_len: i32,
) -> i32 {
    abi_boundary_count(|| {
        let padding = RsagatePadding::try_from(padding)?;
        let digest = RsagateDigest::try_from(digest)?;
        let hash = byte_slice(hash, hash_len)?;
        let signature = byte_slice(signature, signature_len)?;

        let key: &AsymmetricKey = HANDLE_TABLE.as_ref(key_handle, HandleType::Key)?;

        let padding = match padding {
            RsagatePadding::Pkcs1 => RsaSignaturePadding::Pkcs1_5,
            RsagatePadding::OaepOrPss => RsaSignaturePadding::Pss,
        };

        let valid = key.verify_hash(hash, signature, padding, digest.into())?;

        Ok(if valid { 1 } else { 0 })
    })
}

/// Gets the RSA view of a key.
///
/// The view shares the underlying key material through the library's
/// reference count and is released independently of the parent handle.
///
/// @param[in] key_handle Handle to the key
///
/// @return Handle to a new RSA view, or the null handle (0) if the key does
/// not wrap an RSA key. The caller must release the view with
/// `rsagate_rsa_destroy`.
#[unsafe(no_mangle)]
pub extern "C" fn rsagate_key_get_rsa(key_handle: RsagateHandle) -> RsagateHandle {
    abi_boundary_handle(|| {
        let key: &AsymmetricKey = HANDLE_TABLE.as_ref(key_handle, HandleType::Key)?;

        let view = key.rsa()?;

        Ok(HANDLE_TABLE.alloc_handle(HandleType::Rsa, Box::new(view)))
    })
}

/// Sets an RSA view onto a key.
///
/// On success the key exposes the view's key material through shared
/// ownership; the view keeps its own reference. The key is left unchanged
/// when the assignment is rejected.
///
/// @param[in] key_handle Handle to the key
/// @param[in] rsa_handle Handle to the RSA view
///
/// @return 1 on success, 0 on failure.
#[unsafe(no_mangle)]
pub extern "C" fn rsagate_key_set_rsa(
    key_handle: RsagateHandle,
    rsa_handle: RsagateHandle,
) -> i32 {
    abi_boundary_bool(|| {
        let view: &RsaKey = HANDLE_TABLE.as_ref(rsa_handle, HandleType::Rsa)?;
        let view = view.clone();

        let key: &mut AsymmetricKey = HANDLE_TABLE.as_mut(key_handle, HandleType::Key)?;

        key.set_rsa(&view)?;

        Ok(())
    })
}

/// Reports the modulus size of a key in bytes.
///
/// Callers use this to size destination buffers for decrypt and sign.
///
/// @param[in] key_handle Handle to the key
///
/// @return Modulus size in bytes, -1 on error.
#[unsafe(no_mangle)]
pub extern "C" fn rsagate_key_size(key_handle: RsagateHandle) -> i32 {
    abi_boundary_count(|| {
        let key: &AsymmetricKey = HANDLE_TABLE.as_ref(key_handle, HandleType::Key)?;

        Ok(key.size() as i32)
    })
}

/// Destroys a key handle and releases its reference.
///
/// The handle is invalidated and must not be used after this call. Views
/// previously obtained from the key stay valid.
///
/// @param[in] key_handle Handle to the key
///
/// @return 1 on success, 0 for an invalid or already destroyed handle.
#[unsafe(no_mangle)]
pub extern "C" fn rsagate_key_destroy(key_handle: RsagateHandle) -> i32 {
    abi_boundary_bool(|| {
        HANDLE_TABLE
            .free_handle::<AsymmetricKey>(key_handle, HandleType::Key)
            .map(drop)
    })
}

/// Destroys an RSA view handle and releases its reference.
///
/// The parent key handle is unaffected.
///
/// @param[in] rsa_handle Handle to the RSA view
///
/// @return 1 on success, 0 for an invalid or already destroyed handle.
#[unsafe(no_mangle)]
pub extern "C" fn rsagate_rsa_destroy(rsa_handle: RsagateHandle) -> i32 {
    abi_boundary_bool(|| {
        HANDLE_TABLE
            .free_handle::<RsaKey>(rsa_handle, HandleType::Rsa)
            .map(drop)
    })
}

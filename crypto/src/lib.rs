// Copyright (C) Microsoft Corporation. All rights reserved.

//! Safe RSA primitives over OpenSSL.
//!
//! Everything cryptographic is delegated to the `openssl` crate; this crate
//! only shapes the key objects and option enumerations the native gateway
//! needs, and collapses OpenSSL error stacks into a small error taxonomy.

pub mod rsa;

use thiserror::Error;

/// RSA encryption/decryption padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RsaEncryptionPadding {
    /// PKCS#1 v1.5 padding
    Pkcs1,

    /// OAEP padding
    Oaep,
}

/// RSA signature padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RsaSignaturePadding {
    /// PKCS#1 v1.5 padding
    Pkcs1_5,

    /// PSS padding
    Pss,
}

/// Digest selector used to configure padding and signature hashing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigestAlgorithm {
    /// SHA1
    Sha1,

    /// SHA256
    Sha256,

    /// SHA384
    Sha384,

    /// SHA512
    Sha512,
}

impl DigestAlgorithm {
    /// Digest output length in bytes.
    pub fn size(&self) -> usize {
        match self {
            DigestAlgorithm::Sha1 => 20,
            DigestAlgorithm::Sha256 => 32,
            DigestAlgorithm::Sha384 => 48,
            DigestAlgorithm::Sha512 => 64,
        }
    }
}

/// Crypto layer error.
#[derive(Error, Debug, PartialEq, Eq, Clone, Copy)]
pub enum CryptoError {
    /// Invalid parameter
    #[error("invalid parameter")]
    InvalidParameter,

    /// RSA generate error
    #[error("rsa generate error")]
    RsaGenerateError,

    /// RSA Encrypt Failed
    #[error("rsa encrypt failed")]
    RsaEncryptFailed,

    /// RSA Decrypt Failed
    #[error("rsa decrypt failed")]
    RsaDecryptFailed,

    /// RSA Sign Failed
    #[error("rsa sign failed")]
    RsaSignFailed,

    /// RSA Verify Failed
    #[error("rsa verify failed")]
    RsaVerifyFailed,

    /// RSA get modulus error
    #[error("rsa get modulus error")]
    RsaGetModulusError,

    /// RSA get public exponent error
    #[error("rsa get public exponent error")]
    RsaGetPublicExponentError,

    /// RSA key assignment rejected
    #[error("rsa key assignment rejected")]
    RsaAssignFailed,

    /// Key does not wrap the expected algorithm
    #[error("key algorithm mismatch")]
    KeyTypeMismatch,
}

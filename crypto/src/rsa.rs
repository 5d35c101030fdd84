// Copyright (C) Microsoft Corporation. All rights reserved.

//! Module for RSA cryptographic keys.

use openssl::md::Md;
use openssl::md::MdRef;
use openssl::pkey::Id;
use openssl::pkey::PKey;
use openssl::pkey::Private;
use openssl::pkey_ctx::PkeyCtx;
use openssl::rsa::Padding;
use openssl::sign::RsaPssSaltlen;

use crate::CryptoError;
use crate::DigestAlgorithm;
use crate::RsaEncryptionPadding;
use crate::RsaSignaturePadding;

fn digest_md(digest: DigestAlgorithm) -> &'static MdRef {
    match digest {
        DigestAlgorithm::Sha1 => Md::sha1(),
        DigestAlgorithm::Sha256 => Md::sha256(),
        DigestAlgorithm::Sha384 => Md::sha384(),
        DigestAlgorithm::Sha512 => Md::sha512(),
    }
}

/// Generic asymmetric key pair container.
///
/// Clones share the same underlying key object through the library's
/// reference count; dropping any clone only releases its own reference.
#[derive(Debug, Clone)]
pub struct AsymmetricKey {
    handle: PKey<Private>,
}

impl AsymmetricKey {
    /// Generate an RSA key pair with the requested modulus size in bits.
    ///
    /// The library rejects sizes it does not support; a zero size is
    /// rejected here before reaching it.
    pub fn generate_rsa(bits: u32) -> Result<AsymmetricKey, CryptoError> {
        if bits == 0 {
            return Err(CryptoError::InvalidParameter);
        }

        // Rsa::generate() uses 65537 as public exponent
        let rsa = openssl::rsa::Rsa::generate(bits).map_err(|openssl_error_stack| {
            tracing::error!(?openssl_error_stack);
            CryptoError::RsaGenerateError
        })?;

        let pkey = PKey::from_rsa(rsa).map_err(|openssl_error_stack| {
            tracing::error!(?openssl_error_stack);
            CryptoError::RsaGenerateError
        })?;

        Ok(AsymmetricKey { handle: pkey })
    }

    /// Encrypt `plaintext` with the public half of the key.
    ///
    /// The digest selector configures OAEP; PKCS#1 v1.5 ignores it.
    pub fn encrypt(
        &self,
        plaintext: &[u8],
        padding: RsaEncryptionPadding,
        digest: DigestAlgorithm,
    ) -> Result<Vec<u8>, CryptoError> {
        let mut ctx = PkeyCtx::new(&self.handle).map_err(|openssl_error_stack| {
            tracing::error!(?openssl_error_stack);
            CryptoError::RsaEncryptFailed
        })?;

        ctx.encrypt_init().map_err(|openssl_error_stack| {
            tracing::error!(?openssl_error_stack);
            CryptoError::RsaEncryptFailed
        })?;

        configure_crypto_padding(&mut ctx, padding, digest)
            .map_err(|_| CryptoError::RsaEncryptFailed)?;

        let buffer_len = ctx.encrypt(plaintext, None).map_err(|openssl_error_stack| {
            tracing::error!(?openssl_error_stack);
            CryptoError::RsaEncryptFailed
        })?;

        let mut buffer = vec![0u8; buffer_len];

        let encrypted_len =
            ctx.encrypt(plaintext, Some(&mut buffer))
                .map_err(|openssl_error_stack| {
                    tracing::error!(?openssl_error_stack);
                    CryptoError::RsaEncryptFailed
                })?;

        buffer.truncate(encrypted_len);

        Ok(buffer)
    }

    /// Decrypt `ciphertext` with the private half of the key.
    ///
    /// Padding validation is the library's constant-time decrypt-then-check
    /// path; every failure mode collapses to the same error.
    pub fn decrypt(
        &self,
        ciphertext: &[u8],
        padding: RsaEncryptionPadding,
        digest: DigestAlgorithm,
    ) -> Result<Vec<u8>, CryptoError> {
        let mut ctx = PkeyCtx::new(&self.handle).map_err(|openssl_error_stack| {
            tracing::error!(?openssl_error_stack);
            CryptoError::RsaDecryptFailed
        })?;

        ctx.decrypt_init().map_err(|openssl_error_stack| {
            tracing::error!(?openssl_error_stack);
            CryptoError::RsaDecryptFailed
        })?;

        configure_crypto_padding(&mut ctx, padding, digest)
            .map_err(|_| CryptoError::RsaDecryptFailed)?;

        let buffer_len = ctx.decrypt(ciphertext, None).map_err(|openssl_error_stack| {
            tracing::error!(?openssl_error_stack);
            CryptoError::RsaDecryptFailed
        })?;

        let mut buffer = vec![0u8; buffer_len];

        let decrypted_len =
            ctx.decrypt(ciphertext, Some(&mut buffer))
                .map_err(|openssl_error_stack| {
                    tracing::error!(?openssl_error_stack);
                    CryptoError::RsaDecryptFailed
                })?;

        buffer.truncate(decrypted_len);

        Ok(buffer)
    }

    /// Complete a signature over a pre-computed digest.
    ///
    /// `hash` must be exactly the output length of `digest`; the check is
    /// performed here rather than delegated to the library. PSS uses a salt
    /// of the digest length.
    pub fn sign_hash(
        &self,
        hash: &[u8],
        padding: RsaSignaturePadding,
        digest: DigestAlgorithm,
    ) -> Result<Vec<u8>, CryptoError> {
        if hash.len() != digest.size() {
            return Err(CryptoError::InvalidParameter);
        }

        let mut ctx = PkeyCtx::new(&self.handle).map_err(|openssl_error_stack| {
            tracing::error!(?openssl_error_stack);
            CryptoError::RsaSignFailed
        })?;

        ctx.sign_init().map_err(|openssl_error_stack| {
            tracing::error!(?openssl_error_stack);
            CryptoError::RsaSignFailed
        })?;

        configure_signature_padding(&mut ctx, padding, digest)
            .map_err(|_| CryptoError::RsaSignFailed)?;

        let buffer_len = ctx.sign(hash, None).map_err(|openssl_error_stack| {
            tracing::error!(?openssl_error_stack);
            CryptoError::RsaSignFailed
        })?;

        let mut buffer = vec![0u8; buffer_len];

        let signature_len = ctx
            .sign(hash, Some(&mut buffer))
            .map_err(|openssl_error_stack| {
                tracing::error!(?openssl_error_stack);
                CryptoError::RsaSignFailed
            })?;

        buffer.truncate(signature_len);

        Ok(buffer)
    }

    /// Check a signature over a pre-computed digest.
    ///
    /// Returns `Ok(false)` for a well-formed but invalid signature; `Err`
    /// is reserved for inputs that never reach the verification itself.
    pub fn verify_hash(
        &self,
        hash: &[u8],
        signature: &[u8],
        padding: RsaSignaturePadding,
        digest: DigestAlgorithm,
    ) -> Result<bool, CryptoError> {
        if hash.len() != digest.size() {
            return Err(CryptoError::InvalidParameter);
        }

        let mut ctx = PkeyCtx::new(&self.handle).map_err(|openssl_error_stack| {
            tracing::error!(?openssl_error_stack);
            CryptoError::RsaVerifyFailed
        })?;

        ctx.verify_init().map_err(|openssl_error_stack| {
            tracing::error!(?openssl_error_stack);
            CryptoError::RsaVerifyFailed
        })?;

        configure_signature_padding(&mut ctx, padding, digest)
            .map_err(|_| CryptoError::RsaVerifyFailed)?;

        // A mangled signature can surface as an error stack rather than a
        // clean mismatch; both are "invalid" to the caller.
        let valid = ctx.verify(hash, signature).unwrap_or(false);

        Ok(valid)
    }

    /// Get the RSA facet of this key.
    ///
    /// The view shares the underlying key object and stays valid after
    /// this container is released.
    pub fn rsa(&self) -> Result<RsaKey, CryptoError> {
        if self.handle.id() != Id::RSA {
            return Err(CryptoError::KeyTypeMismatch);
        }

        Ok(RsaKey {
            handle: self.handle.clone(),
        })
    }

    /// Rebind this container to the view's key material.
    ///
    /// The view keeps its own reference; the container is unchanged when
    /// the assignment is rejected.
    pub fn set_rsa(&mut self, view: &RsaKey) -> Result<(), CryptoError> {
        let rsa = view.handle.rsa().map_err(|openssl_error_stack| {
            tracing::error!(?openssl_error_stack);
            CryptoError::KeyTypeMismatch
        })?;

        let pkey = PKey::from_rsa(rsa).map_err(|openssl_error_stack| {
            tracing::error!(?openssl_error_stack);
            CryptoError::RsaAssignFailed
        })?;

        self.handle = pkey;

        Ok(())
    }

    /// Modulus size in bytes.
    pub fn size(&self) -> usize {
        self.handle.size()
    }

    /// Modulus size in bits.
    pub fn bits(&self) -> u32 {
        self.handle.bits()
    }
}

/// RSA key view.
///
/// The RSA-specific facet of an [`AsymmetricKey`], sharing its key material
/// through the library's reference count.
#[derive(Debug, Clone)]
pub struct RsaKey {
    handle: PKey<Private>,
}

impl RsaKey {
    /// Get the modulus of the RSA key.
    pub fn modulus(&self) -> Result<Vec<u8>, CryptoError> {
        let rsa = self.handle.rsa().map_err(|openssl_error_stack| {
            tracing::error!(?openssl_error_stack);
            CryptoError::RsaGetModulusError
        })?;

        Ok(rsa.n().to_vec())
    }

    /// Get the public exponent of the RSA key.
    pub fn public_exponent(&self) -> Result<Vec<u8>, CryptoError> {
        let rsa = self.handle.rsa().map_err(|openssl_error_stack| {
            tracing::error!(?openssl_error_stack);
            CryptoError::RsaGetPublicExponentError
        })?;

        Ok(rsa.e().to_vec())
    }

    /// Modulus size in bytes.
    pub fn size(&self) -> usize {
        self.handle.size()
    }

    /// Modulus size in bits.
    pub fn bits(&self) -> u32 {
        self.handle.bits()
    }
}

fn configure_crypto_padding(
    ctx: &mut PkeyCtx<Private>,
    padding: RsaEncryptionPadding,
    digest: DigestAlgorithm,
) -> Result<(), CryptoError> {
    match padding {
        RsaEncryptionPadding::Pkcs1 => {
            ctx.set_rsa_padding(Padding::PKCS1)
                .map_err(|openssl_error_stack| {
                    tracing::error!(?openssl_error_stack);
                    CryptoError::InvalidParameter
                })?;
        }
        RsaEncryptionPadding::Oaep => {
            ctx.set_rsa_padding(Padding::PKCS1_OAEP)
                .map_err(|openssl_error_stack| {
                    tracing::error!(?openssl_error_stack);
                    CryptoError::InvalidParameter
                })?;

            ctx.set_rsa_oaep_md(digest_md(digest))
                .map_err(|openssl_error_stack| {
                    tracing::error!(?openssl_error_stack);
                    CryptoError::InvalidParameter
                })?;
        }
    }

    Ok(())
}

fn configure_signature_padding(
    ctx: &mut PkeyCtx<Private>,
    padding: RsaSignaturePadding,
    digest: DigestAlgorithm,
) -> Result<(), CryptoError> {
    match padding {
        RsaSignaturePadding::Pkcs1_5 => {
            ctx.set_rsa_padding(Padding::PKCS1)
                .map_err(|openssl_error_stack| {
                    tracing::error!(?openssl_error_stack);
                    CryptoError::InvalidParameter
                })?;
        }
        RsaSignaturePadding::Pss => {
            ctx.set_rsa_padding(Padding::PKCS1_PSS)
                .map_err(|openssl_error_stack| {
                    tracing::error!(?openssl_error_stack);
                    CryptoError::InvalidParameter
                })?;

            ctx.set_rsa_pss_saltlen(RsaPssSaltlen::DIGEST_LENGTH)
                .map_err(|openssl_error_stack| {
                    tracing::error!(?openssl_error_stack);
                    CryptoError::InvalidParameter
                })?;
        }
    }

    ctx.set_signature_md(digest_md(digest))
        .map_err(|openssl_error_stack| {
            tracing::error!(?openssl_error_stack);
            CryptoError::InvalidParameter
        })?;

    Ok(())
}

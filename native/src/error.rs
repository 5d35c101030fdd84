// Copyright (C) Microsoft Corporation. All rights reserved.

use rsagate_crypto::CryptoError;
use thiserror::Error;

/// Error type used throughout the native API.
///
/// Internal propagation keeps the distinct kinds; at the ABI boundary every
/// failure collapses to the sentinel of the operation's return shape.
#[derive(Error, Debug, PartialEq, Eq, Clone, Copy)]
pub enum GatewayError {
    /// Invalid pointer, length, or enumeration value
    #[error("invalid argument")]
    InvalidArgument,

    /// Unknown, freed, or wrongly-typed handle
    #[error("invalid handle")]
    InvalidHandle,

    /// The underlying cryptographic operation failed
    #[error("cryptographic operation failed")]
    OperationFailed,

    /// Destination capacity insufficient for the produced output
    #[error("destination buffer too small")]
    BufferTooSmall,

    /// Handle does not wrap the expected algorithm
    #[error("key algorithm mismatch")]
    KeyTypeMismatch,
}

impl From<CryptoError> for GatewayError {
    fn from(err: CryptoError) -> Self {
        match err {
            CryptoError::InvalidParameter => GatewayError::InvalidArgument,
            CryptoError::KeyTypeMismatch => GatewayError::KeyTypeMismatch,
            _ => GatewayError::OperationFailed,
        }
    }
}

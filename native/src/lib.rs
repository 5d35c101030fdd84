// Copyright (C) Microsoft Corporation. All rights reserved.

//! Native C API for the RSA gateway.
//!
//! This crate provides the Foreign Function Interface (FFI) layer that
//! exposes RSA key generation, decryption, and signature-hash completion to
//! a managed runtime. It implements the ABI-stable surface with panic
//! catching, sentinel-based error reporting, and resource management
//! through a global handle table.
//!
//! # Architecture
//!
//! The native API layer consists of:
//! - Handle-based resource management for keys and RSA views
//! - ABI boundary functions that catch panics and collapse errors into the
//!   sentinel each return shape calls for
//! - Type-safe wrappers around the crypto layer
//! - C-compatible types and calling conventions

mod error;
mod handle_table;
mod rsa;
mod utils;

use std::panic::*;
use std::sync::*;

use handle_table::*;

pub use error::GatewayError;
pub use rsa::*;

/// Handle type for referencing gateway objects across the FFI boundary.
///
/// A 32-bit unsigned integer used as an opaque handle to reference keys and
/// RSA views. Handles are managed by the global handle table and should be
/// treated as opaque identifiers by C callers. The value 0 is never
/// allocated and serves as the null handle.
#[repr(transparent)]
#[derive(Debug, Eq, Hash, PartialEq, Copy, Clone, Default)]
pub struct RsagateHandle(u32);

/// Null handle returned by handle-producing operations on failure.
pub const RSAGATE_NULL_HANDLE: RsagateHandle = RsagateHandle(0);

/// Sentinel returned by byte-count operations on failure.
const FAILURE: i32 = -1;

/// Global handle table for managing gateway object lifetimes.
///
/// Handles allocated from this table remain valid until explicitly
/// destroyed or the process terminates.
static HANDLE_TABLE: LazyLock<HandleTable> = LazyLock::new(HandleTable::default);

/// Executes a byte-count operation at the ABI boundary.
///
/// Catches panics so no unwinding crosses into C, and collapses every
/// failure to the -1 sentinel. Structured error detail never crosses this
/// boundary.
pub(crate) fn abi_boundary_count<F: FnOnce() -> Result<i32, GatewayError> + UnwindSafe>(
    f: F,
) -> i32 {
    match catch_unwind(f) {
        Ok(Ok(count)) => count,
        Ok(Err(_)) | Err(_) => FAILURE,
    }
}

/// Executes a handle-producing operation at the ABI boundary.
///
/// Failures and panics collapse to the null handle.
pub(crate) fn abi_boundary_handle<
    F: FnOnce() -> Result<RsagateHandle, GatewayError> + UnwindSafe,
>(
    f: F,
) -> RsagateHandle {
    match catch_unwind(f) {
        Ok(Ok(handle)) => handle,
        Ok(Err(_)) | Err(_) => RSAGATE_NULL_HANDLE,
    }
}

/// Executes a boolean operation at the ABI boundary.
///
/// Success maps to 1; failures and panics collapse to 0.
pub(crate) fn abi_boundary_bool<F: FnOnce() -> Result<(), GatewayError> + UnwindSafe>(
    f: F,
) -> i32 {
    match catch_unwind(f) {
        Ok(Ok(())) => 1,
        Ok(Err(_)) | Err(_) => 0,
    }
}

// Copyright (C) Microsoft Corporation. All rights reserved.

use super::*;

/// View a C buffer as a byte slice.
///
/// A null pointer is only accepted together with a zero length; negative
/// lengths are rejected.
///
/// # Safety
/// The caller must pass a pointer valid for `len` readable bytes.
#[allow(unsafe_code)]
pub(crate) fn byte_slice<'a>(ptr: *const u8, len: i32) -> Result<&'a [u8], GatewayError> {
    if len < 0 {
        return Err(GatewayError::InvalidArgument);
    }

    if ptr.is_null() {
        if len == 0 {
            return Ok(&[]);
        }
        return Err(GatewayError::InvalidArgument);
    }

    // SAFETY: pointer has been validated as non-null; the caller guarantees
    // it covers `len` bytes.
    Ok(unsafe { std::slice::from_raw_parts(ptr, len as usize) })
}

/// View a C buffer as a mutable byte slice.
///
/// Same contract as [`byte_slice`], for writable destinations.
///
/// # Safety
/// The caller must pass a pointer valid for `len` writable bytes.
#[allow(unsafe_code)]
pub(crate) fn byte_slice_mut<'a>(ptr: *mut u8, len: i32) -> Result<&'a mut [u8], GatewayError> {
    if len < 0 {
        return Err(GatewayError::InvalidArgument);
    }

    if ptr.is_null() {
        if len == 0 {
            return Ok(&mut []);
        }
        return Err(GatewayError::InvalidArgument);
    }

    // SAFETY: pointer has been validated as non-null; the caller guarantees
    // it covers `len` writable bytes.
    Ok(unsafe { std::slice::from_raw_parts_mut(ptr, len as usize) })
}

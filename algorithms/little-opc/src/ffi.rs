//! C-API Bindings
//!
//! Exposes Little-OPC to C/C++ via FFI with pointer safety and panic
//! boundaries. Unlike the main cipher's handle, a Little-OPC context is
//! stateless after key expansion and can be reused freely.

#![allow(unsafe_code)]

use crate::LittleOpc;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::slice;

// =============================================================================
// STATUS CODES
// =============================================================================

/// Null pointer argument.
pub const LITTLE_OPC_STATUS_NULL_POINTER: i32 = -1;
/// Internal panic; the context must be discarded.
pub const LITTLE_OPC_STATUS_PANIC: i32 = -2;

// =============================================================================
// HANDLE
// =============================================================================

/// Opaque cipher handle for C.
pub struct LittleOpcContext(LittleOpc);

/// Create a new cipher context from a 64-bit key.
/// Caller must free with `little_opc_delete`.
#[no_mangle]
pub extern "C" fn little_opc_new(key: u64) -> *mut LittleOpcContext {
    match catch_unwind(|| LittleOpc::new(key)) {
        Ok(cipher) => Box::into_raw(Box::new(LittleOpcContext(cipher))),
        Err(_) => std::ptr::null_mut(),
    }
}

/// Encrypt one 64-bit block into `output`.
///
/// # Returns
/// - `0`: Success
/// - `-1`: Null pointer
/// - `-2`: Panic
///
/// # Safety
/// - `context` must be a valid pointer obtained from `little_opc_new`
/// - `output` must be valid for one writable `u64`
#[no_mangle]
pub unsafe extern "C" fn little_opc_encrypt_block(
    context: *const LittleOpcContext,
    block: u64,
    output: *mut u64,
) -> i32 {
    if context.is_null() || output.is_null() {
        return LITTLE_OPC_STATUS_NULL_POINTER;
    }
    let context = &*context;

    match catch_unwind(|| context.0.encrypt_block(block)) {
        Ok(encrypted) => {
            *output = encrypted;
            0
        }
        Err(_) => LITTLE_OPC_STATUS_PANIC,
    }
}

/// Decrypt one 64-bit block into `output`.
///
/// # Returns
/// Same codes as `little_opc_encrypt_block`.
///
/// # Safety
/// Same contracts as `little_opc_encrypt_block`.
#[no_mangle]
pub unsafe extern "C" fn little_opc_decrypt_block(
    context: *const LittleOpcContext,
    block: u64,
    output: *mut u64,
) -> i32 {
    if context.is_null() || output.is_null() {
        return LITTLE_OPC_STATUS_NULL_POINTER;
    }
    let context = &*context;

    match catch_unwind(|| context.0.decrypt_block(block)) {
        Ok(decrypted) => {
            *output = decrypted;
            0
        }
        Err(_) => LITTLE_OPC_STATUS_PANIC,
    }
}

/// XOR the deterministic counter-mode keystream over `data` in place.
/// Calling twice with the same nonce restores the original bytes.
///
/// # Returns
/// - `0`: Success
/// - `-1`: Null pointer (a zero-length buffer with a null pointer is fine)
/// - `-2`: Panic
///
/// # Safety
/// - `context` must be a valid pointer obtained from `little_opc_new`
/// - `data` must be valid for `len` writable bytes (may be null if `len == 0`)
#[no_mangle]
pub unsafe extern "C" fn little_opc_apply_keystream(
    context: *const LittleOpcContext,
    data: *mut u8,
    len: usize,
    nonce: u64,
) -> i32 {
    if context.is_null() {
        return LITTLE_OPC_STATUS_NULL_POINTER;
    }
    if len == 0 {
        return 0;
    }
    if data.is_null() {
        return LITTLE_OPC_STATUS_NULL_POINTER;
    }

    let context = &*context;
    let buffer = slice::from_raw_parts_mut(data, len);
    match catch_unwind(AssertUnwindSafe(|| context.0.apply_keystream(buffer, nonce))) {
        Ok(()) => 0,
        Err(_) => LITTLE_OPC_STATUS_PANIC,
    }
}

/// Free a context.
///
/// # Safety
/// `context` must be a valid pointer obtained from `little_opc_new`, or null.
#[no_mangle]
pub unsafe extern "C" fn little_opc_delete(context: *mut LittleOpcContext) {
    if !context.is_null() {
        drop(Box::from_raw(context));
    }
}

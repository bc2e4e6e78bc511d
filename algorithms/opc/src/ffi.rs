//! C-API Bindings
//!
//! Exposes OPC to C/C++ via FFI with pointer safety and panic boundaries.
//! Every successful encrypt/decrypt call resets the context afterwards, so
//! one handle can run both directions of a round trip.

#![allow(unsafe_code)]

use crate::types::OpcConfig;
use crate::Opc;

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::slice;

// =============================================================================
// STATUS CODES
// =============================================================================

/// Null pointer argument.
pub const OPC_STATUS_NULL_POINTER: i64 = -1;
/// Internal panic; the context must be discarded.
pub const OPC_STATUS_PANIC: i64 = -2;
/// Key or data size violates the block-size contract.
pub const OPC_STATUS_SIZE_MISMATCH: i64 = -3;
/// Output buffer too small for the produced bytes.
pub const OPC_STATUS_OUTPUT_TOO_SMALL: i64 = -4;

// =============================================================================
// HANDLE
// =============================================================================

/// Opaque cipher handle for C.
pub struct OpcContext(Opc);

/// Create a new cipher context. Returns NULL when the configuration is
/// invalid. Caller must free with `opc_delete`.
///
/// # Safety
/// - `initial_vector_ptr` must be valid for `initial_vector_len` bytes
///   (may be null only if `initial_vector_len == 0`)
#[no_mangle]
pub unsafe extern "C" fn opc_new(
    data_block_qwords: u64,
    key_block_qwords: u64,
    initial_vector_ptr: *const u8,
    initial_vector_len: usize,
    lfsr_seed: u64,
    nlfsr_seed: u64,
    sdp_seed: u64,
) -> *mut OpcContext {
    if initial_vector_ptr.is_null() && initial_vector_len != 0 {
        return std::ptr::null_mut();
    }

    let initial_vector = if initial_vector_len == 0 {
        Vec::new()
    } else {
        slice::from_raw_parts(initial_vector_ptr, initial_vector_len).to_vec()
    };

    let config = OpcConfig {
        data_block_qwords,
        key_block_qwords,
        initial_vector,
        lfsr_seed,
        nlfsr_seed,
        sdp_seed,
    };

    let built = catch_unwind(|| Opc::new(config));
    match built {
        Ok(Ok(cipher)) => Box::into_raw(Box::new(OpcContext(cipher))),
        _ => std::ptr::null_mut(),
    }
}

/// Destroy and rebuild the context from its configuration.
///
/// # Returns
/// - `0`: Success
/// - `-1`: Null pointer
/// - `-2`: Panic
///
/// # Safety
/// `context` must be a valid pointer obtained from `opc_new`, or null.
#[no_mangle]
pub unsafe extern "C" fn opc_reset(context: *mut OpcContext) -> i64 {
    let Some(context) = context.as_mut() else {
        return OPC_STATUS_NULL_POINTER;
    };

    let result = catch_unwind(AssertUnwindSafe(|| context.0.reset()));
    match result {
        Ok(Ok(())) => 0,
        Ok(Err(_)) => OPC_STATUS_SIZE_MISMATCH,
        Err(_) => OPC_STATUS_PANIC,
    }
}

/// Output size in bytes that `opc_encrypt` will produce for `input_len`
/// input bytes. Returns 0 for a null context.
///
/// # Safety
/// `context` must be a valid pointer obtained from `opc_new`, or null.
#[no_mangle]
pub unsafe extern "C" fn opc_encrypted_size(context: *const OpcContext, input_len: usize) -> u64 {
    let Some(context) = context.as_ref() else {
        return 0;
    };
    context.0.encrypted_len(input_len) as u64
}

/// Encrypt `input` with `keys`, writing into `output`.
///
/// Block-aligned input is processed without padding; any other length is
/// padded up to the next whole block (`opc_encrypted_size` gives the exact
/// output size). The context resets itself after a successful call.
///
/// # Returns
/// Bytes written on success, or a negative `OPC_STATUS_*` code.
///
/// # Safety
/// - `context` must be a valid pointer obtained from `opc_new`
/// - `keys_ptr` must be valid for `keys_len` bytes
/// - `input_ptr` must be valid for `input_len` bytes
/// - `output_ptr` must be valid for `output_len` writable bytes
#[no_mangle]
pub unsafe extern "C" fn opc_encrypt(
    context: *mut OpcContext,
    keys_ptr: *const u8,
    keys_len: usize,
    input_ptr: *const u8,
    input_len: usize,
    output_ptr: *mut u8,
    output_len: usize,
) -> i64 {
    if context.is_null() || keys_ptr.is_null() || input_ptr.is_null() || output_ptr.is_null() {
        return OPC_STATUS_NULL_POINTER;
    }

    let context = &mut *context;
    let keys = slice::from_raw_parts(keys_ptr, keys_len);
    let input = slice::from_raw_parts(input_ptr, input_len);

    let result = catch_unwind(AssertUnwindSafe(|| context.0.encrypt(input, keys)));
    finish_call(context, result, output_ptr, output_len)
}

/// Decrypt `input` with `keys`, writing into `output`.
///
/// Block-aligned input is treated as unpadded ciphertext and the output has
/// the same length. The context resets itself after a successful call.
///
/// # Returns
/// Bytes written on success, or a negative `OPC_STATUS_*` code.
///
/// # Safety
/// Same contracts as `opc_encrypt`.
#[no_mangle]
pub unsafe extern "C" fn opc_decrypt(
    context: *mut OpcContext,
    keys_ptr: *const u8,
    keys_len: usize,
    input_ptr: *const u8,
    input_len: usize,
    output_ptr: *mut u8,
    output_len: usize,
) -> i64 {
    if context.is_null() || keys_ptr.is_null() || input_ptr.is_null() || output_ptr.is_null() {
        return OPC_STATUS_NULL_POINTER;
    }

    let context = &mut *context;
    let keys = slice::from_raw_parts(keys_ptr, keys_len);
    let input = slice::from_raw_parts(input_ptr, input_len);

    let result = catch_unwind(AssertUnwindSafe(|| context.0.decrypt(input, keys)));
    finish_call(context, result, output_ptr, output_len)
}

/// Free a context.
///
/// # Safety
/// `context` must be a valid pointer obtained from `opc_new`, or null.
#[no_mangle]
pub unsafe extern "C" fn opc_delete(context: *mut OpcContext) {
    if !context.is_null() {
        drop(Box::from_raw(context));
    }
}

// =============================================================================
// SHARED TAIL
// =============================================================================

/// Copy a call result out and reset the context, translating errors.
unsafe fn finish_call(
    context: &mut OpcContext,
    result: std::thread::Result<Result<Vec<u8>, crate::OpcError>>,
    output_ptr: *mut u8,
    output_len: usize,
) -> i64 {
    match result {
        Ok(Ok(bytes)) => {
            if bytes.len() > output_len {
                return OPC_STATUS_OUTPUT_TOO_SMALL;
            }
            std::ptr::copy_nonoverlapping(bytes.as_ptr(), output_ptr, bytes.len());

            // A completed call leaves the handle ready for the symmetric
            // operation.
            if catch_unwind(AssertUnwindSafe(|| context.0.reset())).is_err() {
                return OPC_STATUS_PANIC;
            }
            bytes.len() as i64
        }
        Ok(Err(_)) => OPC_STATUS_SIZE_MISMATCH,
        Err(_) => OPC_STATUS_PANIC,
    }
}

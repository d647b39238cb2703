// Entry points the native library calls back into.
//
// Both are plain `extern "C"` functions with no captured state: the library
// stores bare function pointers. They look up the active sink in the
// registry, hand it the payload bytes and return. Nothing here runs
// application code; that happens later, in `Tuner::poll`.

use crate::Core::guard::guard_void;
use crate::Core::registry;
use crate::Core::CProtobufSerialization;
use std::os::raw::c_char;

/// Receives freshly downloaded fidelity parameters.
///
/// The library keeps ownership of `params`; the bytes are only read here.
pub extern "C" fn fidelity_params_trampoline(params: *const CProtobufSerialization) {
    guard_void("fidelity_params_trampoline", || {
        let Some(sink) = registry::active() else {
            tracing::debug!("fidelity parameters received with no active tuner");
            return;
        };
        let bytes: &[u8] = if params.is_null() {
            &[]
        } else {
            // Safety: the library guarantees `params` is valid for the
            // duration of the callback.
            unsafe { (*params).as_slice() }
        };
        sink.accept_fidelity_parameters(bytes);
    });
}

/// Receives the JSON body of a telemetry upload.
pub extern "C" fn upload_trampoline(message: *const c_char, size: usize) {
    guard_void("upload_trampoline", || {
        let Some(sink) = registry::active() else {
            tracing::debug!("upload payload received with no active tuner");
            return;
        };
        let bytes: &[u8] = if message.is_null() || size == 0 {
            &[]
        } else {
            // Safety: the library passes `size` readable bytes that live
            // until the callback returns.
            unsafe { std::slice::from_raw_parts(message as *const u8, size) }
        };
        sink.accept_upload(bytes);
    });
}

//! Panic guard for functions called from native code.
//!
//! Unwinding across an `extern "C"` frame aborts the process, so every
//! trampoline runs its body through [`guard_void`].

/// Extract a human-readable message from a panic payload.
pub fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        return (*msg).to_string();
    }
    if let Some(msg) = payload.downcast_ref::<String>() {
        return msg.clone();
    }
    "non-string panic payload".to_string()
}

/// Run `f`, logging instead of unwinding if it panics.
pub fn guard_void(op: &'static str, f: impl FnOnce()) {
    if let Err(payload) = std::panic::catch_unwind(std::panic::AssertUnwindSafe(f)) {
        let msg = panic_message(payload);
        tracing::error!(op, "panic in native callback: {msg}");
    }
}

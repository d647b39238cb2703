// Process-wide registry of the one live callback sink.
//
// Native callbacks arrive as plain function pointers with no user data, so
// the trampolines have to find their destination through static state. This
// registry holds exactly one active sink at a time; a tuner installs itself
// on start and removes itself on destroy.

use lazy_static::lazy_static;
use parking_lot::RwLock;
use std::sync::Arc;

/// Receives raw payloads from the native callback trampolines.
///
/// Implementations must return quickly and must not call back into
/// application code: they run on whatever thread the native library uses.
pub trait PayloadSink: Send + Sync {
    /// Bytes of a serialized fidelity-parameters message.
    fn accept_fidelity_parameters(&self, bytes: &[u8]);

    /// Bytes of a JSON telemetry upload.
    fn accept_upload(&self, bytes: &[u8]);
}

lazy_static! {
    static ref ACTIVE_SINK: RwLock<Option<Arc<dyn PayloadSink>>> = RwLock::new(None);
}

/// Make `sink` the destination of all native callbacks.
///
/// Returns the sink that was active before, if any.
pub fn install(sink: Arc<dyn PayloadSink>) -> Option<Arc<dyn PayloadSink>> {
    let previous = ACTIVE_SINK.write().replace(sink);
    if previous.is_some() {
        tracing::warn!("replacing the active tuner; only one instance receives native callbacks");
    }
    previous
}

/// Remove `sink` if it is still the active one.
pub fn uninstall(sink: &Arc<dyn PayloadSink>) -> bool {
    let mut active = ACTIVE_SINK.write();
    match active.as_ref() {
        Some(current) if Arc::ptr_eq(current, sink) => {
            *active = None;
            true
        }
        _ => false,
    }
}

/// Undo an [`install`] of `sink`: if it is still active, put `previous` back.
pub fn restore(sink: &Arc<dyn PayloadSink>, previous: Option<Arc<dyn PayloadSink>>) -> bool {
    let mut active = ACTIVE_SINK.write();
    match active.as_ref() {
        Some(current) if Arc::ptr_eq(current, sink) => {
            *active = previous;
            true
        }
        _ => false,
    }
}

/// The currently installed sink.
pub fn active() -> Option<Arc<dyn PayloadSink>> {
    ACTIVE_SINK.read().clone()
}

pub fn is_active(sink: &Arc<dyn PayloadSink>) -> bool {
    ACTIVE_SINK
        .read()
        .as_ref()
        .is_some_and(|current| Arc::ptr_eq(current, sink))
}

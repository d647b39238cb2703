// src/Tuner/mailbox.rs

use crate::Core::registry::PayloadSink;
use crate::Core::parse_bytes;
use crate::Schema::TuningMessage;
use crate::Upload::UploadTelemetryRequest;
use crossbeam_utils::atomic::AtomicCell;
use std::sync::atomic::{AtomicU64, Ordering};

/// Hand-off point between native callback threads and the poll loop.
///
/// Holds at most one pending value per payload kind. A newer delivery
/// replaces an older one that has not been polled yet: latest wins, nothing
/// is queued. Writers are the callback trampolines on any thread, the reader
/// is `Tuner::poll` on the game thread; each slot is a single atomic swap.
pub struct Mailbox<F> {
    fidelity_parameters: AtomicCell<Option<F>>,
    upload: AtomicCell<Option<UploadTelemetryRequest>>,
    superseded: AtomicU64,
}

impl<F: TuningMessage> Mailbox<F> {
    pub fn new() -> Self {
        Self {
            fidelity_parameters: AtomicCell::new(None),
            upload: AtomicCell::new(None),
            superseded: AtomicU64::new(0),
        }
    }

    /// Store `params`, dropping any value still pending.
    /// `None` marks a delivery that could not be decoded.
    pub fn post_fidelity_parameters(&self, params: Option<F>) {
        if self.fidelity_parameters.swap(params).is_some() {
            self.superseded.fetch_add(1, Ordering::Relaxed);
            tracing::debug!("undelivered fidelity parameters replaced by a newer delivery");
        }
    }

    pub fn post_upload(&self, upload: Option<UploadTelemetryRequest>) {
        if self.upload.swap(upload).is_some() {
            self.superseded.fetch_add(1, Ordering::Relaxed);
            tracing::debug!("undelivered upload payload replaced by a newer delivery");
        }
    }

    pub fn take_fidelity_parameters(&self) -> Option<F> {
        self.fidelity_parameters.take()
    }

    pub fn take_upload(&self) -> Option<UploadTelemetryRequest> {
        self.upload.take()
    }

    /// Deliveries dropped because a newer one arrived before a poll.
    pub fn superseded(&self) -> u64 {
        self.superseded.load(Ordering::Relaxed)
    }

    /// Drop both pending values.
    pub fn clear(&self) {
        self.fidelity_parameters.store(None);
        self.upload.store(None);
    }
}

impl<F: TuningMessage> Default for Mailbox<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: TuningMessage> PayloadSink for Mailbox<F> {
    fn accept_fidelity_parameters(&self, bytes: &[u8]) {
        self.post_fidelity_parameters(parse_bytes::<F>(bytes).into_option());
    }

    fn accept_upload(&self, bytes: &[u8]) {
        let upload = match UploadTelemetryRequest::from_slice(bytes) {
            Ok(upload) => Some(upload),
            Err(e) => {
                tracing::warn!(len = bytes.len(), error = %e, "failed to parse upload payload");
                None
            }
        };
        self.post_upload(upload);
    }
}

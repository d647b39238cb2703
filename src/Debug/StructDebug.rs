use crate::Core::{CProtobufSerialization, Envelope};
use crate::Schema::TuningMessage;
use crate::Tuner::{Mailbox, Tuner};
use std::fmt;

/// Debug function for CProtobufSerialization
///
/// Shows the buffer location and size without dereferencing it: the bytes
/// may belong to the native side.
pub fn debug_serialization(ser: &CProtobufSerialization, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("CProtobufSerialization")
        .field("bytes", &format_args!("{:p}", ser.bytes))
        .field("size", &ser.size)
        .field("dealloc", &ser.dealloc.is_some())
        .finish()
}

/// Debug function for Envelope
pub fn debug_envelope(envelope: &Envelope, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Envelope")
        .field("bytes", &format_args!("{:p}", envelope.as_raw().bytes))
        .field("len", &envelope.len())
        .field("owns_allocation", &envelope.owns_allocation())
        .finish()
}

/// Debug function for Mailbox
///
/// Pending payloads are not shown; reading them would consume them.
pub fn debug_mailbox<F: TuningMessage>(mailbox: &Mailbox<F>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Mailbox")
        .field("superseded", &mailbox.superseded())
        .finish_non_exhaustive()
}

/// Debug function for Tuner
///
/// Shows:
/// - Binding name and lifecycle state
/// - Annotation and fidelity modes
/// - Whether this instance receives native callbacks
pub fn debug_tuner<F: TuningMessage, A: TuningMessage>(
    tuner: &Tuner<F, A>,
    f: &mut fmt::Formatter<'_>,
) -> fmt::Result {
    f.debug_struct("Tuner")
        .field("binding", &tuner.binding_name())
        .field("state", &tuner.state())
        .field("annotation_mode", &tuner.annotation_mode())
        .field("fidelity_mode", &tuner.fidelity_mode())
        .field("receiving_callbacks", &tuner.is_receiving_callbacks())
        .field("current_annotation", tuner.current_annotation())
        .field("superseded_deliveries", &tuner.superseded_deliveries())
        .finish_non_exhaustive()
}

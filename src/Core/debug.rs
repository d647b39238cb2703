use super::{CProtobufSerialization, Envelope};
use std::fmt;

// Debug proxy implementations that call the standalone debug functions
impl fmt::Debug for CProtobufSerialization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::Debug::StructDebug::debug_serialization(self, f)
    }
}

impl fmt::Debug for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::Debug::StructDebug::debug_envelope(self, f)
    }
}

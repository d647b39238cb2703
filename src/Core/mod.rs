mod debug;
pub mod envelope;
pub mod guard;
pub mod registry;
pub mod status;

pub use envelope::{parse_bytes, CProtobufSerialization, Envelope, Parsed, ProtobufDeallocator};
pub use registry::PayloadSink;
pub use status::{
    ErrorCode, InstrumentKey, LifecycleState, LoadingEventHandle, LoadingSource, LoadingState,
    LoadingTimeMetadata, NetworkConnectivity, TraceHandle, TuneResult,
};

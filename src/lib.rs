// Module naming follows project convention (PascalCase top-level modules)
#[allow(non_snake_case)]
pub mod Assets;
#[allow(non_snake_case)]
pub mod Binding;
#[allow(non_snake_case)]
pub mod Core;
#[allow(non_snake_case)]
pub mod Schema;
#[allow(non_snake_case)]
pub mod Tuner;
#[allow(non_snake_case)]
pub mod Upload;
#[allow(non_snake_case)]
pub mod Debug {
    #[allow(non_snake_case)]
    pub mod StructDebug;
}

pub mod ffi;

pub use crate::Binding::{binding_for_current_platform, TuningForkBinding, UnsupportedBinding};
pub use crate::Core::{
    CProtobufSerialization, Envelope, ErrorCode, InstrumentKey, LifecycleState,
    LoadingEventHandle, LoadingTimeMetadata, Parsed, TraceHandle, TuneResult,
};
pub use crate::Schema::{has_invalid_enum_field, FieldDescriptor, FieldKind, FieldValue, TuningMessage};
pub use crate::Tuner::{AnnotationMode, FidelityMode, Tuner as AndroidPerformanceTuner, TunerBuilder, TunerState};
pub use crate::Upload::UploadTelemetryRequest;

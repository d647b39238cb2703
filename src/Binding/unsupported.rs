use super::TuningForkBinding;
use crate::ffi::{FidelityParamsCallback, UploadCallback};
use crate::Core::{
    CProtobufSerialization, ErrorCode, InstrumentKey, LifecycleState, LoadingEventHandle,
    LoadingTimeMetadata, TraceHandle,
};
use std::ffi::CStr;

/// Binding used where the native library does not exist.
///
/// Never touches its arguments, never writes out-parameters.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedBinding;

impl TuningForkBinding for UnsupportedBinding {
    fn name(&self) -> &'static str {
        "unsupported"
    }

    fn init(
        &self,
        _fidelity_params_callback: FidelityParamsCallback,
        _training_fidelity_params: Option<&CProtobufSerialization>,
        _endpoint_uri_override: Option<&CStr>,
    ) -> ErrorCode {
        ErrorCode::PlatformNotSupported
    }

    fn get_fidelity_parameters(
        &self,
        _default_params: &CProtobufSerialization,
        _params: &mut CProtobufSerialization,
        _timeout_ms: u32,
    ) -> ErrorCode {
        ErrorCode::PlatformNotSupported
    }

    fn set_current_annotation(&self, _annotation: &CProtobufSerialization) -> ErrorCode {
        ErrorCode::PlatformNotSupported
    }

    fn frame_tick(&self, _key: InstrumentKey) -> ErrorCode {
        ErrorCode::PlatformNotSupported
    }

    fn frame_delta_time_nanos(&self, _key: InstrumentKey, _dt_nanos: u64) -> ErrorCode {
        ErrorCode::PlatformNotSupported
    }

    fn start_trace(&self, _key: InstrumentKey, _handle: &mut TraceHandle) -> ErrorCode {
        ErrorCode::PlatformNotSupported
    }

    fn end_trace(&self, _handle: TraceHandle) -> ErrorCode {
        ErrorCode::PlatformNotSupported
    }

    fn flush(&self) -> ErrorCode {
        ErrorCode::PlatformNotSupported
    }

    fn find_fidelity_params_in_apk(
        &self,
        _filename: &CStr,
        _params: &mut CProtobufSerialization,
    ) -> ErrorCode {
        ErrorCode::PlatformNotSupported
    }

    fn swappy_is_enabled(&self) -> bool {
        false
    }

    fn set_upload_callback(&self, _callback: UploadCallback) -> ErrorCode {
        ErrorCode::PlatformNotSupported
    }

    fn set_fidelity_parameters(&self, _params: &CProtobufSerialization) -> ErrorCode {
        ErrorCode::PlatformNotSupported
    }

    fn enable_memory_recording(&self, _enable: bool) -> ErrorCode {
        ErrorCode::PlatformNotSupported
    }

    fn start_recording_loading_time(
        &self,
        _metadata: &LoadingTimeMetadata,
        _annotation: &CProtobufSerialization,
        _handle: &mut LoadingEventHandle,
    ) -> ErrorCode {
        ErrorCode::PlatformNotSupported
    }

    fn stop_recording_loading_time(&self, _handle: LoadingEventHandle) -> ErrorCode {
        ErrorCode::PlatformNotSupported
    }

    fn start_loading_group(
        &self,
        _metadata: Option<&LoadingTimeMetadata>,
        _annotation: Option<&CProtobufSerialization>,
        _handle: &mut LoadingEventHandle,
    ) -> ErrorCode {
        ErrorCode::PlatformNotSupported
    }

    fn stop_loading_group(&self, _handle: LoadingEventHandle) -> ErrorCode {
        ErrorCode::PlatformNotSupported
    }

    fn report_lifecycle_event(&self, _state: LifecycleState) -> ErrorCode {
        ErrorCode::PlatformNotSupported
    }

    fn destroy(&self) -> ErrorCode {
        ErrorCode::PlatformNotSupported
    }
}

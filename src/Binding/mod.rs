// Capability set over the native telemetry library.
//
// A tuner talks to the library only through `TuningForkBinding`. On Android
// the implementation forwards to the real entry points; everywhere else a
// stub reports `PlatformNotSupported`. Which one is used is decided once,
// when the tuner is built.

#[cfg(target_os = "android")]
mod native;
mod unsupported;

#[cfg(target_os = "android")]
pub use native::NativeBinding;
pub use unsupported::UnsupportedBinding;

use crate::ffi::{FidelityParamsCallback, UploadCallback};
use crate::Core::{
    CProtobufSerialization, ErrorCode, InstrumentKey, LifecycleState, LoadingEventHandle,
    LoadingTimeMetadata, TraceHandle,
};
use std::ffi::CStr;

/// One method per native entry point.
///
/// Every operation reports a status code instead of failing loudly. The
/// binding does not track lifecycle: calling anything but `init` before
/// initialization, or anything after `destroy`, is the caller's problem.
pub trait TuningForkBinding: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    fn init(
        &self,
        fidelity_params_callback: FidelityParamsCallback,
        training_fidelity_params: Option<&CProtobufSerialization>,
        endpoint_uri_override: Option<&CStr>,
    ) -> ErrorCode;

    /// May block for up to `timeout_ms` while the library contacts its endpoint.
    fn get_fidelity_parameters(
        &self,
        default_params: &CProtobufSerialization,
        params: &mut CProtobufSerialization,
        timeout_ms: u32,
    ) -> ErrorCode;

    fn set_current_annotation(&self, annotation: &CProtobufSerialization) -> ErrorCode;

    fn frame_tick(&self, key: InstrumentKey) -> ErrorCode;

    fn frame_delta_time_nanos(&self, key: InstrumentKey, dt_nanos: u64) -> ErrorCode;

    fn start_trace(&self, key: InstrumentKey, handle: &mut TraceHandle) -> ErrorCode;

    fn end_trace(&self, handle: TraceHandle) -> ErrorCode;

    fn flush(&self) -> ErrorCode;

    fn find_fidelity_params_in_apk(
        &self,
        filename: &CStr,
        params: &mut CProtobufSerialization,
    ) -> ErrorCode;

    fn swappy_is_enabled(&self) -> bool;

    fn set_upload_callback(&self, callback: UploadCallback) -> ErrorCode;

    fn set_fidelity_parameters(&self, params: &CProtobufSerialization) -> ErrorCode;

    fn enable_memory_recording(&self, enable: bool) -> ErrorCode;

    fn start_recording_loading_time(
        &self,
        metadata: &LoadingTimeMetadata,
        annotation: &CProtobufSerialization,
        handle: &mut LoadingEventHandle,
    ) -> ErrorCode;

    fn stop_recording_loading_time(&self, handle: LoadingEventHandle) -> ErrorCode;

    /// Groups related loading events; both arguments are optional.
    fn start_loading_group(
        &self,
        metadata: Option<&LoadingTimeMetadata>,
        annotation: Option<&CProtobufSerialization>,
        handle: &mut LoadingEventHandle,
    ) -> ErrorCode;

    fn stop_loading_group(&self, handle: LoadingEventHandle) -> ErrorCode;

    fn report_lifecycle_event(&self, state: LifecycleState) -> ErrorCode;

    fn destroy(&self) -> ErrorCode;
}

/// The binding for the platform this binary was built for.
#[cfg(target_os = "android")]
pub fn binding_for_current_platform() -> Box<dyn TuningForkBinding> {
    Box::new(NativeBinding::new())
}

/// The binding for the platform this binary was built for.
#[cfg(not(target_os = "android"))]
pub fn binding_for_current_platform() -> Box<dyn TuningForkBinding> {
    Box::new(UnsupportedBinding)
}

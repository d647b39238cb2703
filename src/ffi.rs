// Raw entry points of the native Tuning Fork library.
//
// Only linked on Android, where `libunitytuningfork.so` ships with the app.
// Every function returns a raw `TuningFork_ErrorCode`; use
// `ErrorCode::from_raw` to interpret it.

use crate::Core::{CProtobufSerialization, LoadingTimeMetadata};
use std::os::raw::c_char;

/// Invoked by the library when new fidelity parameters have been downloaded.
pub type FidelityParamsCallback = extern "C" fn(params: *const CProtobufSerialization);

/// Invoked by the library with the JSON body of each telemetry upload.
pub type UploadCallback = extern "C" fn(message: *const c_char, size: usize);

#[cfg(target_os = "android")]
#[allow(non_snake_case)]
#[link(name = "unitytuningfork")]
extern "C" {
    pub fn Unity_TuningFork_init(
        fidelity_params_callback: Option<FidelityParamsCallback>,
        training_fidelity_params: *const CProtobufSerialization,
        endpoint_uri_override: *const c_char,
    ) -> i32;

    pub fn TuningFork_getFidelityParameters(
        default_params: *const CProtobufSerialization,
        params: *mut CProtobufSerialization,
        timeout_ms: u32,
    ) -> i32;

    pub fn TuningFork_setCurrentAnnotation(annotation: *const CProtobufSerialization) -> i32;

    pub fn TuningFork_frameTick(key: u16) -> i32;

    pub fn TuningFork_frameDeltaTimeNanos(key: u16, dt: u64) -> i32;

    pub fn TuningFork_startTrace(key: u16, handle: *mut u64) -> i32;

    pub fn TuningFork_endTrace(handle: u64) -> i32;

    pub fn TuningFork_flush() -> i32;

    pub fn Unity_TuningFork_findFidelityParamsInApk(
        filename: *const c_char,
        fidelity_params: *mut CProtobufSerialization,
    ) -> i32;

    pub fn Unity_TuningFork_swappyIsEnabled() -> bool;

    pub fn TuningFork_setUploadCallback(cb: Option<UploadCallback>) -> i32;

    pub fn TuningFork_setFidelityParameters(params: *const CProtobufSerialization) -> i32;

    pub fn TuningFork_enableMemoryRecording(enable: bool) -> i32;

    pub fn TuningFork_startRecordingLoadingTime(
        event_metadata: *const LoadingTimeMetadata,
        event_metadata_size: u32,
        annotation: *const CProtobufSerialization,
        handle: *mut u64,
    ) -> i32;

    pub fn TuningFork_stopRecordingLoadingTime(handle: u64) -> i32;

    pub fn TuningFork_startLoadingGroup(
        event_metadata: *const LoadingTimeMetadata,
        event_metadata_size: u32,
        annotation: *const CProtobufSerialization,
        handle: *mut u64,
    ) -> i32;

    pub fn TuningFork_stopLoadingGroup(handle: u64) -> i32;

    pub fn TuningFork_reportLifecycleEvent(state: i32) -> i32;

    pub fn TuningFork_destroy() -> i32;
}

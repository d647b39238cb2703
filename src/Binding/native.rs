// Direct calls into libunitytuningfork. Android only.

use super::TuningForkBinding;
use crate::ffi::{self, FidelityParamsCallback, UploadCallback};
use crate::Core::{
    CProtobufSerialization, ErrorCode, InstrumentKey, LifecycleState, LoadingEventHandle,
    LoadingTimeMetadata, TraceHandle,
};
use std::ffi::CStr;
use std::ptr;

/// Forwards every operation to the native library.
#[derive(Debug, Default)]
pub struct NativeBinding {
    _private: (),
}

impl NativeBinding {
    pub fn new() -> Self {
        Self::default()
    }
}

#[inline]
fn status(raw: i32) -> ErrorCode {
    ErrorCode::from_raw(raw)
}

// Safety (all calls below): every pointer passed is either null where the C
// API allows it, or derived from a reference that outlives the call. The
// library does not retain any of them after returning.
impl TuningForkBinding for NativeBinding {
    fn name(&self) -> &'static str {
        "native"
    }

    fn init(
        &self,
        fidelity_params_callback: FidelityParamsCallback,
        training_fidelity_params: Option<&CProtobufSerialization>,
        endpoint_uri_override: Option<&CStr>,
    ) -> ErrorCode {
        let training = training_fidelity_params.map_or(ptr::null(), |p| p as *const _);
        let endpoint = endpoint_uri_override.map_or(ptr::null(), CStr::as_ptr);
        status(unsafe { ffi::Unity_TuningFork_init(Some(fidelity_params_callback), training, endpoint) })
    }

    fn get_fidelity_parameters(
        &self,
        default_params: &CProtobufSerialization,
        params: &mut CProtobufSerialization,
        timeout_ms: u32,
    ) -> ErrorCode {
        status(unsafe { ffi::TuningFork_getFidelityParameters(default_params, params, timeout_ms) })
    }

    fn set_current_annotation(&self, annotation: &CProtobufSerialization) -> ErrorCode {
        status(unsafe { ffi::TuningFork_setCurrentAnnotation(annotation) })
    }

    fn frame_tick(&self, key: InstrumentKey) -> ErrorCode {
        status(unsafe { ffi::TuningFork_frameTick(key.0) })
    }

    fn frame_delta_time_nanos(&self, key: InstrumentKey, dt_nanos: u64) -> ErrorCode {
        status(unsafe { ffi::TuningFork_frameDeltaTimeNanos(key.0, dt_nanos) })
    }

    fn start_trace(&self, key: InstrumentKey, handle: &mut TraceHandle) -> ErrorCode {
        status(unsafe { ffi::TuningFork_startTrace(key.0, handle) })
    }

    fn end_trace(&self, handle: TraceHandle) -> ErrorCode {
        status(unsafe { ffi::TuningFork_endTrace(handle) })
    }

    fn flush(&self) -> ErrorCode {
        status(unsafe { ffi::TuningFork_flush() })
    }

    fn find_fidelity_params_in_apk(
        &self,
        filename: &CStr,
        params: &mut CProtobufSerialization,
    ) -> ErrorCode {
        status(unsafe { ffi::Unity_TuningFork_findFidelityParamsInApk(filename.as_ptr(), params) })
    }

    fn swappy_is_enabled(&self) -> bool {
        unsafe { ffi::Unity_TuningFork_swappyIsEnabled() }
    }

    fn set_upload_callback(&self, callback: UploadCallback) -> ErrorCode {
        status(unsafe { ffi::TuningFork_setUploadCallback(Some(callback)) })
    }

    fn set_fidelity_parameters(&self, params: &CProtobufSerialization) -> ErrorCode {
        status(unsafe { ffi::TuningFork_setFidelityParameters(params) })
    }

    fn enable_memory_recording(&self, enable: bool) -> ErrorCode {
        status(unsafe { ffi::TuningFork_enableMemoryRecording(enable) })
    }

    fn start_recording_loading_time(
        &self,
        metadata: &LoadingTimeMetadata,
        annotation: &CProtobufSerialization,
        handle: &mut LoadingEventHandle,
    ) -> ErrorCode {
        status(unsafe {
            ffi::TuningFork_startRecordingLoadingTime(
                metadata,
                LoadingTimeMetadata::wire_size(),
                annotation,
                handle,
            )
        })
    }

    fn stop_recording_loading_time(&self, handle: LoadingEventHandle) -> ErrorCode {
        status(unsafe { ffi::TuningFork_stopRecordingLoadingTime(handle) })
    }

    fn start_loading_group(
        &self,
        metadata: Option<&LoadingTimeMetadata>,
        annotation: Option<&CProtobufSerialization>,
        handle: &mut LoadingEventHandle,
    ) -> ErrorCode {
        let (metadata_ptr, metadata_size) = match metadata {
            Some(m) => (m as *const LoadingTimeMetadata, LoadingTimeMetadata::wire_size()),
            None => (ptr::null(), 0),
        };
        let annotation_ptr = annotation.map_or(ptr::null(), |a| a as *const _);
        status(unsafe {
            ffi::TuningFork_startLoadingGroup(metadata_ptr, metadata_size, annotation_ptr, handle)
        })
    }

    fn stop_loading_group(&self, handle: LoadingEventHandle) -> ErrorCode {
        status(unsafe { ffi::TuningFork_stopLoadingGroup(handle) })
    }

    fn report_lifecycle_event(&self, state: LifecycleState) -> ErrorCode {
        status(unsafe { ffi::TuningFork_reportLifecycleEvent(state as i32) })
    }

    fn destroy(&self) -> ErrorCode {
        status(unsafe { ffi::TuningFork_destroy() })
    }
}

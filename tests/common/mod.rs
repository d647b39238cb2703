// Shared fixtures: game-side messages and a binding that records every call.
#![allow(dead_code)]

use parking_lot::Mutex;
use std::ffi::CStr;
use std::sync::Arc;
use tuningfork_bridge::ffi::{FidelityParamsCallback, UploadCallback};
use tuningfork_bridge::{
    CProtobufSerialization, Envelope, ErrorCode, FieldDescriptor, FieldKind, FieldValue,
    InstrumentKey, LifecycleState, LoadingEventHandle, LoadingTimeMetadata, TraceHandle,
    TuningForkBinding, TuningMessage,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum Scene {
    Invalid = 0,
    Level1 = 1,
    Level2 = 2,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum LoadingPhase {
    Invalid = 0,
    NotLoading = 1,
    Loading = 2,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum QualityLevel {
    Unknown = 0,
    Low = 1,
    Medium = 2,
    High = 3,
}

const SCENE_VALUES: &[(&str, i32)] = &[("INVALID", 0), ("LEVEL_1", 1), ("LEVEL_2", 2)];
const LOADING_VALUES: &[(&str, i32)] = &[("INVALID", 0), ("NOT_LOADING", 1), ("LOADING", 2)];
const QUALITY_VALUES: &[(&str, i32)] = &[("UNKNOWN", 0), ("LOW", 1), ("MEDIUM", 2), ("HIGH", 3)];

/// Annotation with a single enum field.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SceneAnnotation {
    #[prost(enumeration = "Scene", optional, tag = "1")]
    pub scene: Option<i32>,
}

/// Annotation shaped for the default annotation mode.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Annotation {
    #[prost(enumeration = "Scene", optional, tag = "1")]
    pub scene: Option<i32>,
    #[prost(enumeration = "LoadingPhase", optional, tag = "2")]
    pub loading_state: Option<i32>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FidelityParams {
    #[prost(enumeration = "QualityLevel", optional, tag = "1")]
    pub level: Option<i32>,
    #[prost(int32, optional, tag = "2")]
    pub lod_bias: Option<i32>,
    #[prost(float, optional, tag = "3")]
    pub texture_scale: Option<f32>,
}

/// Fidelity message with no enum fields at all.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PlainFidelity {
    #[prost(int32, optional, tag = "1")]
    pub shadow_distance: Option<i32>,
}

fn enum_value(v: Option<i32>) -> FieldValue {
    FieldValue::Enum(v.unwrap_or(0))
}

fn scene_annotation_scene(m: &SceneAnnotation) -> FieldValue {
    enum_value(m.scene)
}
fn set_scene_annotation_scene(m: &mut SceneAnnotation, v: FieldValue) {
    m.scene = v.as_i32();
}

fn annotation_scene(m: &Annotation) -> FieldValue {
    enum_value(m.scene)
}
fn set_annotation_scene(m: &mut Annotation, v: FieldValue) {
    m.scene = v.as_i32();
}
fn annotation_loading_state(m: &Annotation) -> FieldValue {
    enum_value(m.loading_state)
}
fn set_annotation_loading_state(m: &mut Annotation, v: FieldValue) {
    m.loading_state = v.as_i32();
}

fn fidelity_level(m: &FidelityParams) -> FieldValue {
    enum_value(m.level)
}
fn set_fidelity_level(m: &mut FidelityParams, v: FieldValue) {
    m.level = v.as_i32();
}
fn fidelity_lod_bias(m: &FidelityParams) -> FieldValue {
    FieldValue::Int(m.lod_bias.unwrap_or(0))
}
fn set_fidelity_lod_bias(m: &mut FidelityParams, v: FieldValue) {
    m.lod_bias = v.as_i32();
}
fn fidelity_texture_scale(m: &FidelityParams) -> FieldValue {
    FieldValue::Float(m.texture_scale.unwrap_or(0.0))
}
fn set_fidelity_texture_scale(m: &mut FidelityParams, v: FieldValue) {
    if let FieldValue::Float(x) = v {
        m.texture_scale = Some(x);
    }
}

fn plain_shadow_distance(m: &PlainFidelity) -> FieldValue {
    FieldValue::Int(m.shadow_distance.unwrap_or(0))
}
fn set_plain_shadow_distance(m: &mut PlainFidelity, v: FieldValue) {
    m.shadow_distance = v.as_i32();
}

static SCENE_ANNOTATION_FIELDS: [FieldDescriptor<SceneAnnotation>; 1] = [FieldDescriptor {
    name: "scene",
    number: 1,
    kind: FieldKind::Enum { values: SCENE_VALUES },
    get: scene_annotation_scene,
    set: set_scene_annotation_scene,
}];

static ANNOTATION_FIELDS: [FieldDescriptor<Annotation>; 2] = [
    FieldDescriptor {
        name: "scene",
        number: 1,
        kind: FieldKind::Enum { values: SCENE_VALUES },
        get: annotation_scene,
        set: set_annotation_scene,
    },
    FieldDescriptor {
        name: "loading_state",
        number: 2,
        kind: FieldKind::Enum { values: LOADING_VALUES },
        get: annotation_loading_state,
        set: set_annotation_loading_state,
    },
];

static FIDELITY_FIELDS: [FieldDescriptor<FidelityParams>; 3] = [
    FieldDescriptor {
        name: "level",
        number: 1,
        kind: FieldKind::Enum { values: QUALITY_VALUES },
        get: fidelity_level,
        set: set_fidelity_level,
    },
    FieldDescriptor {
        name: "lod_bias",
        number: 2,
        kind: FieldKind::Int,
        get: fidelity_lod_bias,
        set: set_fidelity_lod_bias,
    },
    FieldDescriptor {
        name: "texture_scale",
        number: 3,
        kind: FieldKind::Float,
        get: fidelity_texture_scale,
        set: set_fidelity_texture_scale,
    },
];

static PLAIN_FIDELITY_FIELDS: [FieldDescriptor<PlainFidelity>; 1] = [FieldDescriptor {
    name: "shadow_distance",
    number: 1,
    kind: FieldKind::Int,
    get: plain_shadow_distance,
    set: set_plain_shadow_distance,
}];

impl TuningMessage for SceneAnnotation {
    fn fields() -> &'static [FieldDescriptor<Self>] {
        &SCENE_ANNOTATION_FIELDS
    }
}

impl TuningMessage for Annotation {
    fn fields() -> &'static [FieldDescriptor<Self>] {
        &ANNOTATION_FIELDS
    }
}

impl TuningMessage for FidelityParams {
    fn fields() -> &'static [FieldDescriptor<Self>] {
        &FIDELITY_FIELDS
    }
}

impl TuningMessage for PlainFidelity {
    fn fields() -> &'static [FieldDescriptor<Self>] {
        &PLAIN_FIDELITY_FIELDS
    }
}

pub fn annotation(scene: Scene, loading: LoadingPhase) -> Annotation {
    Annotation {
        scene: Some(scene as i32),
        loading_state: Some(loading as i32),
    }
}

pub fn fidelity(level: QualityLevel, lod_bias: i32) -> FidelityParams {
    FidelityParams {
        level: Some(level as i32),
        lod_bias: Some(lod_bias),
        texture_scale: Some(1.0),
    }
}

/// One recorded binding call.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Init { training: Option<Vec<u8>>, endpoint: Option<String> },
    GetFidelityParameters { defaults: Vec<u8>, timeout_ms: u32 },
    SetCurrentAnnotation(Vec<u8>),
    FrameTick(u16),
    FrameDeltaTimeNanos(u16, u64),
    StartTrace(u16),
    EndTrace(TraceHandle),
    Flush,
    FindFidelityParamsInApk(String),
    SetUploadCallback,
    SetFidelityParameters(Vec<u8>),
    EnableMemoryRecording(bool),
    StartRecordingLoadingTime(LoadingTimeMetadata, Vec<u8>),
    StopRecordingLoadingTime(LoadingEventHandle),
    StartLoadingGroup(Option<LoadingTimeMetadata>, Option<Vec<u8>>),
    StopLoadingGroup(LoadingEventHandle),
    Lifecycle(LifecycleState),
    Destroy,
}

#[derive(Default)]
struct Recorded {
    calls: Vec<Call>,
    fidelity_callback: Option<FidelityParamsCallback>,
    upload_callback: Option<UploadCallback>,
    fidelity_reply: Option<Vec<u8>>,
    init_result: Option<ErrorCode>,
    next_handle: u64,
}

/// Test binding: records calls, answers with canned payloads.
#[derive(Clone, Default)]
pub struct RecordingBinding {
    state: Arc<Mutex<Recorded>>,
}

fn copy_bytes(ser: &CProtobufSerialization) -> Vec<u8> {
    unsafe { ser.as_slice() }.to_vec()
}

/// Fill an out-parameter the way the native library does.
fn reply_into(out: &mut CProtobufSerialization, bytes: &[u8]) {
    *out = Envelope::from_bytes(bytes).into_raw();
}

impl RecordingBinding {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }

    /// Bytes returned by the next fidelity-parameter queries.
    pub fn reply_with(&self, bytes: Vec<u8>) {
        self.state.lock().fidelity_reply = Some(bytes);
    }

    pub fn fail_init_with(&self, code: ErrorCode) {
        self.state.lock().init_result = Some(code);
    }

    pub fn fidelity_callback(&self) -> Option<FidelityParamsCallback> {
        self.state.lock().fidelity_callback
    }

    pub fn upload_callback(&self) -> Option<UploadCallback> {
        self.state.lock().upload_callback
    }

    fn record(&self, call: Call) {
        self.state.lock().calls.push(call);
    }

    fn next_handle(&self) -> u64 {
        let mut state = self.state.lock();
        state.next_handle += 1;
        state.next_handle
    }
}

impl TuningForkBinding for RecordingBinding {
    fn name(&self) -> &'static str {
        "recording"
    }

    fn init(
        &self,
        fidelity_params_callback: FidelityParamsCallback,
        training_fidelity_params: Option<&CProtobufSerialization>,
        endpoint_uri_override: Option<&CStr>,
    ) -> ErrorCode {
        self.record(Call::Init {
            training: training_fidelity_params.map(copy_bytes),
            endpoint: endpoint_uri_override.map(|uri| uri.to_string_lossy().into_owned()),
        });
        let mut state = self.state.lock();
        state.fidelity_callback = Some(fidelity_params_callback);
        state.init_result.unwrap_or(ErrorCode::Ok)
    }

    fn get_fidelity_parameters(
        &self,
        default_params: &CProtobufSerialization,
        params: &mut CProtobufSerialization,
        timeout_ms: u32,
    ) -> ErrorCode {
        self.record(Call::GetFidelityParameters {
            defaults: copy_bytes(default_params),
            timeout_ms,
        });
        match self.state.lock().fidelity_reply.clone() {
            Some(bytes) => {
                reply_into(params, &bytes);
                ErrorCode::Ok
            }
            None => ErrorCode::NoFidelityParams,
        }
    }

    fn set_current_annotation(&self, annotation: &CProtobufSerialization) -> ErrorCode {
        self.record(Call::SetCurrentAnnotation(copy_bytes(annotation)));
        ErrorCode::Ok
    }

    fn frame_tick(&self, key: InstrumentKey) -> ErrorCode {
        self.record(Call::FrameTick(key.0));
        ErrorCode::Ok
    }

    fn frame_delta_time_nanos(&self, key: InstrumentKey, dt_nanos: u64) -> ErrorCode {
        self.record(Call::FrameDeltaTimeNanos(key.0, dt_nanos));
        ErrorCode::Ok
    }

    fn start_trace(&self, key: InstrumentKey, handle: &mut TraceHandle) -> ErrorCode {
        self.record(Call::StartTrace(key.0));
        *handle = self.next_handle();
        ErrorCode::Ok
    }

    fn end_trace(&self, handle: TraceHandle) -> ErrorCode {
        self.record(Call::EndTrace(handle));
        ErrorCode::Ok
    }

    fn flush(&self) -> ErrorCode {
        self.record(Call::Flush);
        ErrorCode::Ok
    }

    fn find_fidelity_params_in_apk(
        &self,
        filename: &CStr,
        params: &mut CProtobufSerialization,
    ) -> ErrorCode {
        self.record(Call::FindFidelityParamsInApk(
            filename.to_string_lossy().into_owned(),
        ));
        match self.state.lock().fidelity_reply.clone() {
            Some(bytes) => {
                reply_into(params, &bytes);
                ErrorCode::Ok
            }
            None => ErrorCode::NoFidelityParams,
        }
    }

    fn swappy_is_enabled(&self) -> bool {
        true
    }

    fn set_upload_callback(&self, callback: UploadCallback) -> ErrorCode {
        self.record(Call::SetUploadCallback);
        self.state.lock().upload_callback = Some(callback);
        ErrorCode::Ok
    }

    fn set_fidelity_parameters(&self, params: &CProtobufSerialization) -> ErrorCode {
        self.record(Call::SetFidelityParameters(copy_bytes(params)));
        ErrorCode::Ok
    }

    fn enable_memory_recording(&self, enable: bool) -> ErrorCode {
        self.record(Call::EnableMemoryRecording(enable));
        ErrorCode::Ok
    }

    fn start_recording_loading_time(
        &self,
        metadata: &LoadingTimeMetadata,
        annotation: &CProtobufSerialization,
        handle: &mut LoadingEventHandle,
    ) -> ErrorCode {
        self.record(Call::StartRecordingLoadingTime(*metadata, copy_bytes(annotation)));
        *handle = self.next_handle();
        ErrorCode::Ok
    }

    fn stop_recording_loading_time(&self, handle: LoadingEventHandle) -> ErrorCode {
        self.record(Call::StopRecordingLoadingTime(handle));
        ErrorCode::Ok
    }

    fn start_loading_group(
        &self,
        metadata: Option<&LoadingTimeMetadata>,
        annotation: Option<&CProtobufSerialization>,
        handle: &mut LoadingEventHandle,
    ) -> ErrorCode {
        self.record(Call::StartLoadingGroup(
            metadata.copied(),
            annotation.map(copy_bytes),
        ));
        *handle = self.next_handle();
        ErrorCode::Ok
    }

    fn stop_loading_group(&self, handle: LoadingEventHandle) -> ErrorCode {
        self.record(Call::StopLoadingGroup(handle));
        ErrorCode::Ok
    }

    fn report_lifecycle_event(&self, state: LifecycleState) -> ErrorCode {
        self.record(Call::Lifecycle(state));
        ErrorCode::Ok
    }

    fn destroy(&self) -> ErrorCode {
        self.record(Call::Destroy);
        ErrorCode::Ok
    }
}

/// Unique scratch directory under the system temp dir.
pub fn scratch_dir(tag: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("tuningfork-{tag}-{:016x}", fastrand::u64(..)));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

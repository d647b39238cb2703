// Status codes and plain-old-data types shared with the native library.
// Everything here is ABI-stable: discriminants and field order match the
// Tuning Fork C header, so values can be passed across the boundary as-is.

use thiserror::Error;

/// Status code returned by every native entry point.
#[repr(i32)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Error)]
pub enum ErrorCode {
    #[error("ok")]
    Ok = 0,
    #[error("no settings were found")]
    NoSettings = 1,
    #[error("swappy is not available")]
    NoSwappy = 2,
    #[error("settings are invalid")]
    BadSettings = 3,
    #[error("bad parameter")]
    BadParameter = 4,
    #[error("bad instrument key")]
    BadInstrumentKey = 5,
    #[error("tuning fork is not initialized")]
    TuningforkNotInitialized = 6,
    #[error("no fidelity parameters")]
    NoFidelityParams = 7,
    #[error("annotation contains an invalid enum value")]
    InvalidAnnotation = 8,
    #[error("fidelity parameters contain an invalid enum value")]
    InvalidFidelityParams = 9,
    #[error("no default fidelity parameters")]
    NoDefaultFidelityParams = 10,
    #[error("upload requested too frequently")]
    UploadTooFrequent = 11,
    #[error("unknown upload error")]
    UnknownUploadError = 12,
    #[error("invalid training mode")]
    InvalidTrainingMode = 13,
    #[error("no download thread")]
    NoDownloadThread = 14,
    #[error("download thread already started")]
    DownloadThreadAlreadyStarted = 15,
    #[error("default fidelity parameters are invalid")]
    InvalidDefaultFidelityParams = 16,
    #[error("could not save or delete fidelity parameters")]
    CouldntSaveOrDeleteFps = 17,
    #[error("previous upload is still pending")]
    PreviousUploadPending = 18,
    #[error("upload pending")]
    UploadPending = 19,
    #[error("no more space for loading time data")]
    NoMoreSpaceForLoadingTimeData = 20,
    #[error("no such key")]
    NoSuchKey = 21,
    #[error("bad file operation")]
    BadFileOperation = 22,
    #[error("settings file is invalid")]
    BadSettingsFile = 23,
    #[error("already initialized")]
    AlreadyInitialized = 24,
    #[error("settings are missing annotation enum sizes")]
    NoSettingsAnnotationEnumSizes = 25,
    #[error("download thread already stopped")]
    DownloadThreadAlreadyStopped = 26,
    #[error("platform not supported")]
    PlatformNotSupported = 27,
    #[error("timed out")]
    Timeout = 28,
    #[error("generic error")]
    Generic = 100,
}

/// Result of a bridge operation. `Err` never carries [`ErrorCode::Ok`].
pub type TuneResult<T> = Result<T, ErrorCode>;

impl ErrorCode {
    /// Map a raw status returned over the C boundary.
    /// Codes this crate does not know about collapse into `Generic`.
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            0 => ErrorCode::Ok,
            1 => ErrorCode::NoSettings,
            2 => ErrorCode::NoSwappy,
            3 => ErrorCode::BadSettings,
            4 => ErrorCode::BadParameter,
            5 => ErrorCode::BadInstrumentKey,
            6 => ErrorCode::TuningforkNotInitialized,
            7 => ErrorCode::NoFidelityParams,
            8 => ErrorCode::InvalidAnnotation,
            9 => ErrorCode::InvalidFidelityParams,
            10 => ErrorCode::NoDefaultFidelityParams,
            11 => ErrorCode::UploadTooFrequent,
            12 => ErrorCode::UnknownUploadError,
            13 => ErrorCode::InvalidTrainingMode,
            14 => ErrorCode::NoDownloadThread,
            15 => ErrorCode::DownloadThreadAlreadyStarted,
            16 => ErrorCode::InvalidDefaultFidelityParams,
            17 => ErrorCode::CouldntSaveOrDeleteFps,
            18 => ErrorCode::PreviousUploadPending,
            19 => ErrorCode::UploadPending,
            20 => ErrorCode::NoMoreSpaceForLoadingTimeData,
            21 => ErrorCode::NoSuchKey,
            22 => ErrorCode::BadFileOperation,
            23 => ErrorCode::BadSettingsFile,
            24 => ErrorCode::AlreadyInitialized,
            25 => ErrorCode::NoSettingsAnnotationEnumSizes,
            26 => ErrorCode::DownloadThreadAlreadyStopped,
            27 => ErrorCode::PlatformNotSupported,
            28 => ErrorCode::Timeout,
            _ => ErrorCode::Generic,
        }
    }

    #[inline]
    pub fn as_raw(self) -> i32 {
        self as i32
    }

    #[inline]
    pub fn is_ok(self) -> bool {
        self == ErrorCode::Ok
    }

    /// `Ok` becomes `Ok(())`, everything else is the error.
    pub fn into_result(self) -> TuneResult<()> {
        match self {
            ErrorCode::Ok => Ok(()),
            code => Err(code),
        }
    }
}

/// Identifier of a timing measurement. Keys below
/// [`InstrumentKey::USER_DEFINED_BASE`] are reserved by the library.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstrumentKey(pub u16);

impl InstrumentKey {
    pub const RAW_FRAME_TIME: InstrumentKey = InstrumentKey(0);
    pub const PACED_FRAME_TIME: InstrumentKey = InstrumentKey(1);
    pub const CPU_TIME: InstrumentKey = InstrumentKey(2);
    pub const GPU_TIME: InstrumentKey = InstrumentKey(3);
    pub const USER_DEFINED_BASE: u16 = 64;

    /// A user instrument, `offset` keys above the reserved range.
    pub fn user_defined(offset: u16) -> Option<Self> {
        Self::USER_DEFINED_BASE
            .checked_add(offset)
            .map(InstrumentKey)
    }

    pub fn is_user_defined(self) -> bool {
        self.0 >= Self::USER_DEFINED_BASE
    }
}

/// Handle of an open trace span, filled in by `start_trace`.
pub type TraceHandle = u64;

/// Handle of a loading-time event or loading group.
pub type LoadingEventHandle = u64;

/// Application lifecycle transitions reported to the library.
#[repr(i32)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    Uninitialized = 0,
    OnCreate = 1,
    OnStart = 2,
    OnStop = 3,
    OnDestroy = 4,
}

#[repr(i32)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum LoadingState {
    #[default]
    UnknownState = 0,
    FirstRun = 1,
    ColdStart = 2,
    WarmStart = 3,
    HotStart = 4,
    InterLevel = 5,
}

#[repr(i32)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum LoadingSource {
    #[default]
    UnknownSource = 0,
    Memory = 1,
    Apk = 2,
    DeviceStorage = 3,
    ExternalStorage = 4,
    Network = 5,
    ShaderCompilation = 6,
    Computation = 7,
    Other = 8,
}

#[repr(i32)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum NetworkConnectivity {
    #[default]
    Unknown = 0,
    Wifi = 1,
    CellularNetwork = 2,
}

/// Describes the circumstances of a loading-time event.
/// Passed by pointer together with its size, so the layout must stay stable.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct LoadingTimeMetadata {
    pub state: LoadingState,
    pub source: LoadingSource,
    /// 0 means uncompressed.
    pub compression_level: i32,
    pub network_connectivity: NetworkConnectivity,
    pub network_transfer_speed_bps: u64,
    pub network_latency_ns: u64,
}

impl LoadingTimeMetadata {
    pub fn new(state: LoadingState, source: LoadingSource) -> Self {
        Self {
            state,
            source,
            ..Self::default()
        }
    }

    pub fn with_compression_level(mut self, level: i32) -> Self {
        self.compression_level = level;
        self
    }

    pub fn with_network(
        mut self,
        connectivity: NetworkConnectivity,
        transfer_speed_bps: u64,
        latency_ns: u64,
    ) -> Self {
        self.network_connectivity = connectivity;
        self.network_transfer_speed_bps = transfer_speed_bps;
        self.network_latency_ns = latency_ns;
        self
    }

    /// Size passed alongside the pointer so the library can detect older layouts.
    #[inline]
    pub fn wire_size() -> u32 {
        std::mem::size_of::<Self>() as u32
    }
}

// JSON body of a telemetry upload, as handed to the upload callback.
//
// The library emits proto3 JSON, so 64-bit integers may arrive either as
// numbers or as decimal strings. Every struct defaults missing fields;
// unknown fields are ignored.

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadTelemetryRequest {
    pub name: String,
    pub session_context: SessionContext,
    pub telemetry: Vec<Telemetry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionContext {
    pub device: DeviceSpec,
    pub game_sdk_info: GameSdkInfo,
    pub time_period: TimePeriod,
    pub crash_reports: Vec<CrashReport>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceSpec {
    pub fingerprint: String,
    #[serde(deserialize_with = "lenient_u64")]
    pub total_memory_bytes: u64,
    pub build_version: String,
    pub gles_version: GlesVersion,
    #[serde(deserialize_with = "lenient_u64_vec")]
    pub cpu_core_freqs_hz: Vec<u64>,
    pub model: String,
    pub brand: String,
    pub product: String,
    pub device: String,
    pub soc_model: String,
    pub soc_manufacturer: String,
    #[serde(deserialize_with = "lenient_u64")]
    pub swap_total_bytes: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlesVersion {
    pub major: u32,
    pub minor: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSdkInfo {
    pub version: String,
    pub session_id: String,
}

/// RFC 3339 timestamps, kept as text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimePeriod {
    pub start_time: String,
    pub end_time: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrashReport {
    pub crash_reason: String,
    pub session_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Telemetry {
    pub context: TelemetryContext,
    pub report: TelemetryReport,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryContext {
    /// Base64 of the serialized annotation.
    pub annotations: String,
    pub tuning_parameters: TuningParameters,
    /// Protobuf duration text, e.g. `"12.5s"`.
    pub duration: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TuningParameters {
    pub experiment_id: String,
    /// Base64 of the serialized fidelity parameters.
    pub serialized_fidelity_parameters: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryReport {
    pub rendering: Option<RenderingReport>,
    pub loading: Option<LoadingReport>,
    pub memory: Option<MemoryReport>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderingReport {
    pub render_time_histogram: Vec<RenderTimeHistogram>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderTimeHistogram {
    pub instrument_id: u32,
    #[serde(deserialize_with = "lenient_u64_vec")]
    pub counts: Vec<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadingReport {
    pub loading_events: Vec<LoadingEvent>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadingEvent {
    #[serde(deserialize_with = "lenient_u64_vec")]
    pub times_ms: Vec<u64>,
    /// Loading-time metadata as the library reports it; shape varies by version.
    pub loading_metadata: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryReport {
    pub memory_histogram: Vec<MemoryHistogram>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryHistogram {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(deserialize_with = "lenient_u64")]
    pub period_ms: u64,
    #[serde(deserialize_with = "lenient_u64")]
    pub histogram_min_value: u64,
    #[serde(deserialize_with = "lenient_u64")]
    pub histogram_max_value: u64,
    #[serde(deserialize_with = "lenient_u64_vec")]
    pub counts: Vec<u64>,
}

impl UploadTelemetryRequest {
    pub fn from_slice(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }

    /// Sum of the render-time histogram counts for one instrument across all
    /// telemetry entries.
    pub fn render_time_counts(&self, instrument_id: u32) -> Vec<u64> {
        let mut totals: Vec<u64> = Vec::new();
        let histograms = self
            .telemetry
            .iter()
            .filter_map(|t| t.report.rendering.as_ref())
            .flat_map(|r| r.render_time_histogram.iter())
            .filter(|h| h.instrument_id == instrument_id);

        for histogram in histograms {
            if totals.len() < histogram.counts.len() {
                totals.resize(histogram.counts.len(), 0);
            }
            for (total, count) in totals.iter_mut().zip(&histogram.counts) {
                *total = total.saturating_add(*count);
            }
        }
        totals
    }

    /// Number of frames recorded for `instrument_id`.
    pub fn frame_count(&self, instrument_id: u32) -> u64 {
        self.render_time_counts(instrument_id)
            .iter()
            .fold(0u64, |acc, n| acc.saturating_add(*n))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(u64),
    Text(String),
}

impl NumberOrString {
    fn into_u64<E: serde::de::Error>(self) -> Result<u64, E> {
        match self {
            NumberOrString::Number(n) => Ok(n),
            NumberOrString::Text(s) => s.trim().parse().map_err(E::custom),
        }
    }
}

fn lenient_u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    NumberOrString::deserialize(deserializer)?.into_u64()
}

fn lenient_u64_vec<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u64>, D::Error> {
    Vec::<NumberOrString>::deserialize(deserializer)?
        .into_iter()
        .map(NumberOrString::into_u64)
        .collect()
}

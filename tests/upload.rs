use tuningfork_bridge::UploadTelemetryRequest;

const TWO_WINDOWS: &str = r#"{
  "name": "applications/com.example.game/apks/7",
  "session_context": {
    "device": {
      "fingerprint": "google/flame/flame:11/RQ3A.210805.001/7390230:user/release-keys",
      "total_memory_bytes": 5869395968,
      "build_version": "30",
      "gles_version": {"major": 3, "minor": 2},
      "cpu_core_freqs_hz": ["1785600000", "1785600000", "2419200000"],
      "model": "Pixel 4",
      "soc_model": "SM8150",
      "swap_total_bytes": "536866816"
    },
    "game_sdk_info": {"version": "1.5", "session_id": "a1b2"},
    "time_period": {"start_time": "2021-09-01T10:00:00Z", "end_time": "2021-09-01T10:05:00Z"},
    "crash_reports": [{"crash_reason": "LOW_MEMORY", "session_id": "prev"}]
  },
  "telemetry": [
    {
      "context": {
        "annotations": "CAEQAQ==",
        "tuning_parameters": {"experiment_id": "exp", "serialized_fidelity_parameters": "CAI="},
        "duration": "150s"
      },
      "report": {
        "rendering": {"render_time_histogram": [
          {"instrument_id": 0, "counts": [1, 2, 3]},
          {"instrument_id": 1, "counts": ["10", "0"]}
        ]},
        "memory": {"memory_histogram": [
          {"type": "SWAP", "period_ms": "1000", "histogram_min_value": 0,
           "histogram_max_value": "1000000", "counts": [4, 4]}
        ]}
      }
    },
    {
      "context": {"annotations": "CAIQAQ==", "duration": "150s"},
      "report": {
        "rendering": {"render_time_histogram": [
          {"instrument_id": 0, "counts": [0, 1, 1, 9]}
        ]},
        "loading": {"loading_events": [
          {"times_ms": ["1530", 1200], "loading_metadata": {"state": "COLD_START", "source": "APK"}}
        ]}
      }
    }
  ],
  "future_field": {"ignored": true}
}"#;

#[test]
fn parses_a_full_upload() {
    let request = UploadTelemetryRequest::from_slice(TWO_WINDOWS.as_bytes()).unwrap();

    assert_eq!(request.name, "applications/com.example.game/apks/7");
    let device = &request.session_context.device;
    assert_eq!(device.total_memory_bytes, 5_869_395_968);
    assert_eq!(device.swap_total_bytes, 536_866_816);
    assert_eq!(device.cpu_core_freqs_hz, vec![1_785_600_000, 1_785_600_000, 2_419_200_000]);
    assert_eq!((device.gles_version.major, device.gles_version.minor), (3, 2));
    assert_eq!(request.session_context.crash_reports[0].crash_reason, "LOW_MEMORY");

    assert_eq!(request.telemetry.len(), 2);
    let first = &request.telemetry[0];
    assert_eq!(first.context.tuning_parameters.serialized_fidelity_parameters, "CAI=");
    let memory = first.report.memory.as_ref().expect("memory report");
    assert_eq!(memory.memory_histogram[0].kind, "SWAP");
    assert_eq!(memory.memory_histogram[0].histogram_max_value, 1_000_000);
    assert!(first.report.loading.is_none());

    let loading = request.telemetry[1].report.loading.as_ref().expect("loading report");
    assert_eq!(loading.loading_events[0].times_ms, vec![1530, 1200]);
    assert!(loading.loading_events[0].loading_metadata.is_some());
}

#[test]
fn render_histograms_are_summed_per_instrument() {
    let request = UploadTelemetryRequest::from_slice(TWO_WINDOWS.as_bytes()).unwrap();

    assert_eq!(request.render_time_counts(0), vec![1, 3, 4, 9]);
    assert_eq!(request.frame_count(0), 17);
    assert_eq!(request.render_time_counts(1), vec![10, 0]);
    assert!(request.render_time_counts(64).is_empty());
}

#[test]
fn rejects_non_numeric_counts() {
    let json = br#"{"telemetry":[{"report":{"rendering":{"render_time_histogram":[{"counts":["many"]}]}}}]}"#;
    assert!(UploadTelemetryRequest::from_slice(json).is_err());
    assert!(UploadTelemetryRequest::from_slice(br#""just text""#).is_err());
}

#[test]
fn serializes_back_to_json() {
    let request = UploadTelemetryRequest::from_slice(TWO_WINDOWS.as_bytes()).unwrap();
    let text = serde_json::to_string(&request).unwrap();
    assert!(text.contains("\"type\":\"SWAP\""), "{text}");
}

#[test]
fn huge_counts_saturate_instead_of_overflowing() {
    let json = br#"{"telemetry":[
        {"report":{"rendering":{"render_time_histogram":[{"instrument_id":0,"counts":["18446744073709551615",1]}]}}},
        {"report":{"rendering":{"render_time_histogram":[{"instrument_id":0,"counts":[5,"18446744073709551615"]}]}}}
    ]}"#;
    let request = UploadTelemetryRequest::from_slice(json).unwrap();

    assert_eq!(request.render_time_counts(0), vec![u64::MAX, u64::MAX]);
    assert_eq!(request.frame_count(0), u64::MAX);
}

// Fixed-update game loop driving the tuner.
//
//   cargo run --example frame_loop -- [frames]
//
// On desktop the platform binding is the stub, so start fails with
// PlatformNotSupported and the loop runs with the tuner idle.

use std::env;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tuningfork_bridge::{
    AndroidPerformanceTuner, AnnotationMode, ErrorCode, FieldDescriptor, FieldKind, FieldValue,
    InstrumentKey, TuningMessage,
};

const FRAME: Duration = Duration::from_millis(16);

#[derive(Clone, PartialEq, ::prost::Message)]
struct Annotation {
    #[prost(int32, optional, tag = "1")]
    scene: Option<i32>,
    #[prost(int32, optional, tag = "2")]
    loading_state: Option<i32>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
struct FidelityParams {
    #[prost(int32, optional, tag = "1")]
    level: Option<i32>,
}

const LOADING_VALUES: &[(&str, i32)] = &[("INVALID", 0), ("NOT_LOADING", 1), ("LOADING", 2)];
const SCENE_VALUES: &[(&str, i32)] = &[("INVALID", 0), ("MENU", 1), ("LEVEL_1", 2)];

static ANNOTATION_FIELDS: [FieldDescriptor<Annotation>; 2] = [
    FieldDescriptor {
        name: "scene",
        number: 1,
        kind: FieldKind::Enum { values: SCENE_VALUES },
        get: |a| FieldValue::Enum(a.scene.unwrap_or(0)),
        set: |a, v| a.scene = v.as_i32(),
    },
    FieldDescriptor {
        name: "loading_state",
        number: 2,
        kind: FieldKind::Enum { values: LOADING_VALUES },
        get: |a| FieldValue::Enum(a.loading_state.unwrap_or(0)),
        set: |a, v| a.loading_state = v.as_i32(),
    },
];

static FIDELITY_FIELDS: [FieldDescriptor<FidelityParams>; 1] = [FieldDescriptor {
    name: "level",
    number: 1,
    kind: FieldKind::Int,
    get: |p| FieldValue::Int(p.level.unwrap_or(0)),
    set: |p, v| p.level = v.as_i32(),
}];

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

fn main() -> Result<(), ErrorCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = env::args().collect();
    let frames: u64 = if args.len() > 1 {
        args[1].parse().unwrap_or(600)
    } else {
        600
    };

    let running = Arc::new(AtomicBool::new(true));
    {
        let running = running.clone();
        ctrlc::set_handler(move || running.store(false, Ordering::SeqCst))
            .expect("failed to install Ctrl-C handler");
    }

    let mut tuner = AndroidPerformanceTuner::<FidelityParams, Annotation>::builder()
        .with_annotation_mode(AnnotationMode::Default)
        .with_training_fidelity_params(FidelityParams { level: Some(1) })
        .on_fidelity_parameters(|params| println!("Fidelity parameters: {:?}", params))
        .on_upload(|upload| {
            println!(
                "Upload {}: {} frames",
                upload.name,
                upload.frame_count(InstrumentKey::RAW_FRAME_TIME.0 as u32)
            )
        })
        .build()?;

    println!("Frame loop: binding `{}`", tuner.binding_name());
    if let Err(code) = tuner.start() {
        eprintln!("Tuner not started: {}", code);
    }
    let _ = tuner.scene_loading();
    let _ = tuner.scene_loaded(0);

    let mut frame = 0u64;
    while running.load(Ordering::SeqCst) && frame < frames {
        let started = Instant::now();

        let _ = tuner.frame_tick(InstrumentKey::RAW_FRAME_TIME);
        tuner.poll();

        if frame % 120 == 0 {
            println!("Frame {}", frame);
        }
        frame += 1;

        if let Some(rest) = FRAME.checked_sub(started.elapsed()) {
            thread::sleep(rest);
        }
    }

    println!("Frame loop: stopping after {} frames", frame);
    let _ = tuner.flush();
    if let Err(code) = tuner.destroy() {
        eprintln!("Destroy: {}", code);
    }
    Ok(())
}

mod builder;
pub mod callbacks;
mod debug;
mod mailbox;

pub use builder::TunerBuilder;
pub use mailbox::Mailbox;

use crate::Assets::{AssetStore, Settings};
use crate::Binding::TuningForkBinding;
use crate::Core::registry::{self, PayloadSink};
use crate::Core::{
    Envelope, ErrorCode, InstrumentKey, LifecycleState, LoadingEventHandle, LoadingTimeMetadata,
    Parsed, TraceHandle, TuneResult,
};
use crate::Schema::{
    annotation_enum_sizes, first_invalid_enum_field, AnnotationFields, FidelityFields,
    TuningMessage,
};
use builder::{FidelityHandler, UploadHandler};
use std::ffi::CString;
use std::sync::Arc;
use std::time::Duration;

/// Who fills in the annotation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AnnotationMode {
    /// The tuner maintains `scene` and `loading_state` from scene events.
    Default,
    /// The game sets every annotation itself.
    Custom,
}

/// Who picks the fidelity parameters.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FidelityMode {
    /// Fidelity is the engine quality level, stored in a `level` field.
    QualityLevels,
    /// The game defines and applies its own parameters.
    Custom,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TunerState {
    Uninitialized,
    Initialized,
    Destroyed,
}

/// Typed front end over a [`TuningForkBinding`].
///
/// `F` is the game's fidelity-parameters message, `A` its annotation message.
/// A tuner lives on the game thread: callbacks registered on the builder run
/// only from [`Tuner::poll`]. Only one started tuner per process receives
/// native callbacks.
pub struct Tuner<F: TuningMessage, A: TuningMessage> {
    binding: Box<dyn TuningForkBinding>,
    mailbox: Arc<Mailbox<F>>,
    sink: Arc<dyn PayloadSink>,
    assets: Option<AssetStore>,
    settings: Option<Settings>,
    training_fidelity_params: Option<F>,
    endpoint_uri_override: Option<CString>,
    fidelity_timeout: Duration,
    annotation_mode: AnnotationMode,
    fidelity_mode: FidelityMode,
    annotation_fields: AnnotationFields<A>,
    fidelity_fields: FidelityFields<F>,
    current_annotation: A,
    current_fidelity_params: Option<F>,
    on_fidelity_parameters: Option<FidelityHandler<F>>,
    on_upload: Option<UploadHandler>,
    state: TunerState,
}

fn validate_annotation<A: TuningMessage>(annotation: &A) -> TuneResult<()> {
    match first_invalid_enum_field(annotation) {
        Some(field) => {
            tracing::warn!(field, "annotation has an enum field at its invalid value");
            Err(ErrorCode::InvalidAnnotation)
        }
        None => Ok(()),
    }
}

fn validate_fidelity<F: TuningMessage>(params: &F) -> TuneResult<()> {
    match first_invalid_enum_field(params) {
        Some(field) => {
            tracing::warn!(field, "fidelity parameters have an enum field at its invalid value");
            Err(ErrorCode::InvalidFidelityParams)
        }
        None => Ok(()),
    }
}

fn millis_u32(d: Duration) -> u32 {
    d.as_millis().min(u32::MAX as u128) as u32
}

fn nanos_u64(d: Duration) -> u64 {
    d.as_nanos().min(u64::MAX as u128) as u64
}

impl<F: TuningMessage, A: TuningMessage> Tuner<F, A> {
    pub fn builder() -> TunerBuilder<F, A> {
        TunerBuilder::new()
    }

    pub(crate) fn assemble(
        binding: Box<dyn TuningForkBinding>,
        endpoint_uri_override: Option<CString>,
        builder: TunerBuilder<F, A>,
    ) -> TuneResult<Self> {
        let annotation_fields = AnnotationFields::<A>::resolve();
        let fidelity_fields = FidelityFields::<F>::resolve();

        if builder.annotation_mode == AnnotationMode::Default && !annotation_fields.is_complete() {
            tracing::warn!("default annotation mode needs `scene` and `loading_state` fields");
            return Err(ErrorCode::BadParameter);
        }
        if builder.fidelity_mode == FidelityMode::QualityLevels && fidelity_fields.level().is_none() {
            tracing::warn!("quality-level fidelity mode needs a `level` field");
            return Err(ErrorCode::BadParameter);
        }

        let mailbox = Arc::new(Mailbox::<F>::new());
        let sink: Arc<dyn PayloadSink> = mailbox.clone();

        Ok(Self {
            binding,
            mailbox,
            sink,
            assets: builder.assets_dir.map(AssetStore::new),
            settings: None,
            training_fidelity_params: builder.training_fidelity_params,
            endpoint_uri_override,
            fidelity_timeout: builder.fidelity_timeout,
            annotation_mode: builder.annotation_mode,
            fidelity_mode: builder.fidelity_mode,
            annotation_fields,
            fidelity_fields,
            current_annotation: A::default(),
            current_fidelity_params: None,
            on_fidelity_parameters: builder.on_fidelity_parameters,
            on_upload: builder.on_upload,
            state: TunerState::Uninitialized,
        })
    }

    fn ensure_not_destroyed(&self) -> TuneResult<()> {
        if self.state == TunerState::Destroyed {
            return Err(ErrorCode::TuningforkNotInitialized);
        }
        Ok(())
    }

    /// Check settings, route native callbacks here and initialize the library.
    pub fn start(&mut self) -> TuneResult<()> {
        match self.state {
            TunerState::Initialized => return Err(ErrorCode::AlreadyInitialized),
            TunerState::Destroyed => return Err(ErrorCode::TuningforkNotInitialized),
            TunerState::Uninitialized => {}
        }

        if let Some(assets) = &self.assets {
            let settings = assets.load_settings().map_err(|e| {
                tracing::warn!(error = %e, "could not load tuning fork settings");
                e.code()
            })?;
            settings
                .validate(&annotation_enum_sizes::<A>())
                .map_err(|problem| {
                    tracing::warn!(%problem, "tuning fork settings rejected");
                    ErrorCode::BadSettings
                })?;
            self.settings = Some(settings);
        }

        if let Some(training) = &self.training_fidelity_params {
            validate_fidelity(training)?;
        }
        let training = self
            .training_fidelity_params
            .as_ref()
            .map(Envelope::try_create)
            .transpose()?;

        let previous = registry::install(self.sink.clone());
        let code = self.binding.init(
            callbacks::fidelity_params_trampoline,
            training.as_ref().map(Envelope::as_raw),
            self.endpoint_uri_override.as_deref(),
        );
        if let Err(code) = code.into_result() {
            // A live instance keeps receiving callbacks.
            registry::restore(&self.sink, previous);
            tracing::warn!(binding = self.binding.name(), %code, "tuning fork init failed");
            return Err(code);
        }
        self.state = TunerState::Initialized;

        let code = self.binding.set_upload_callback(callbacks::upload_trampoline);
        if !code.is_ok() {
            tracing::warn!(%code, "could not register upload callback");
        }
        for event in [LifecycleState::OnCreate, LifecycleState::OnStart] {
            let code = self.binding.report_lifecycle_event(event);
            if !code.is_ok() {
                tracing::warn!(?event, %code, "lifecycle event not recorded");
            }
        }

        tracing::info!(binding = self.binding.name(), "tuning fork started");
        Ok(())
    }

    /// Ask the library for fidelity parameters, waiting at most `timeout`.
    pub fn get_fidelity_parameters(&mut self, defaults: &F, timeout: Duration) -> TuneResult<Parsed<F>> {
        validate_fidelity(defaults)?;
        self.ensure_not_destroyed()?;

        let defaults = Envelope::try_create(defaults)?;
        let mut params = Envelope::empty();
        self.binding
            .get_fidelity_parameters(defaults.as_raw(), params.as_raw_mut(), millis_u32(timeout))
            .into_result()?;
        Ok(params.parse())
    }

    /// Same as [`get_fidelity_parameters`](Self::get_fidelity_parameters) with
    /// the timeout given to the builder.
    pub fn get_fidelity_parameters_default_timeout(&mut self, defaults: &F) -> TuneResult<Parsed<F>> {
        self.get_fidelity_parameters(defaults, self.fidelity_timeout)
    }

    pub fn set_current_annotation(&mut self, annotation: &A) -> TuneResult<()> {
        validate_annotation(annotation)?;
        self.ensure_not_destroyed()?;

        let envelope = Envelope::try_create(annotation)?;
        self.binding.set_current_annotation(envelope.as_raw()).into_result()?;
        self.current_annotation = annotation.clone();
        Ok(())
    }

    pub fn set_fidelity_parameters(&mut self, params: &F) -> TuneResult<()> {
        validate_fidelity(params)?;
        self.ensure_not_destroyed()?;

        let envelope = Envelope::try_create(params)?;
        self.binding.set_fidelity_parameters(envelope.as_raw()).into_result()?;
        self.current_fidelity_params = Some(params.clone());
        Ok(())
    }

    pub fn frame_tick(&mut self, key: InstrumentKey) -> TuneResult<()> {
        self.ensure_not_destroyed()?;
        self.binding.frame_tick(key).into_result()
    }

    /// Record an explicit frame duration instead of a tick.
    pub fn frame_delta_time(&mut self, key: InstrumentKey, dt: Duration) -> TuneResult<()> {
        self.ensure_not_destroyed()?;
        self.binding.frame_delta_time_nanos(key, nanos_u64(dt)).into_result()
    }

    pub fn start_trace(&mut self, key: InstrumentKey) -> TuneResult<TraceHandle> {
        self.ensure_not_destroyed()?;
        let mut handle: TraceHandle = 0;
        self.binding.start_trace(key, &mut handle).into_result()?;
        Ok(handle)
    }

    pub fn end_trace(&mut self, handle: TraceHandle) -> TuneResult<()> {
        self.ensure_not_destroyed()?;
        self.binding.end_trace(handle).into_result()
    }

    /// Upload whatever has been collected so far.
    pub fn flush(&mut self) -> TuneResult<()> {
        self.ensure_not_destroyed()?;
        self.binding.flush().into_result()
    }

    /// Read a fidelity parameter file bundled in the application package.
    pub fn find_fidelity_params_in_apk(&mut self, filename: &str) -> TuneResult<Parsed<F>> {
        self.ensure_not_destroyed()?;
        let filename = CString::new(filename).map_err(|_| ErrorCode::BadParameter)?;
        let mut params = Envelope::empty();
        self.binding
            .find_fidelity_params_in_apk(&filename, params.as_raw_mut())
            .into_result()?;
        Ok(params.parse())
    }

    /// Whether frame pacing is handled by Swappy.
    pub fn swappy_is_enabled(&self) -> bool {
        self.state != TunerState::Destroyed && self.binding.swappy_is_enabled()
    }

    pub fn report_lifecycle_event(&mut self, state: LifecycleState) -> TuneResult<()> {
        self.ensure_not_destroyed()?;
        self.binding.report_lifecycle_event(state).into_result()
    }

    pub fn enable_memory_recording(&mut self, enable: bool) -> TuneResult<()> {
        self.ensure_not_destroyed()?;
        self.binding.enable_memory_recording(enable).into_result()
    }

    /// Start timing a loading event. Without an explicit annotation the
    /// current one is used.
    pub fn start_recording_loading_time(
        &mut self,
        metadata: &LoadingTimeMetadata,
        annotation: Option<&A>,
    ) -> TuneResult<LoadingEventHandle> {
        let annotation = annotation.unwrap_or(&self.current_annotation);
        validate_annotation(annotation)?;
        self.ensure_not_destroyed()?;

        let envelope = Envelope::try_create(annotation)?;
        let mut handle: LoadingEventHandle = 0;
        self.binding
            .start_recording_loading_time(metadata, envelope.as_raw(), &mut handle)
            .into_result()?;
        Ok(handle)
    }

    pub fn stop_recording_loading_time(&mut self, handle: LoadingEventHandle) -> TuneResult<()> {
        self.ensure_not_destroyed()?;
        self.binding.stop_recording_loading_time(handle).into_result()
    }

    /// Open a group that the following loading events belong to.
    pub fn start_loading_group(
        &mut self,
        metadata: Option<&LoadingTimeMetadata>,
        annotation: Option<&A>,
    ) -> TuneResult<LoadingEventHandle> {
        if let Some(annotation) = annotation {
            validate_annotation(annotation)?;
        }
        self.ensure_not_destroyed()?;

        let envelope = annotation.map(Envelope::try_create).transpose()?;
        let mut handle: LoadingEventHandle = 0;
        self.binding
            .start_loading_group(metadata, envelope.as_ref().map(Envelope::as_raw), &mut handle)
            .into_result()?;
        Ok(handle)
    }

    pub fn stop_loading_group(&mut self, handle: LoadingEventHandle) -> TuneResult<()> {
        self.ensure_not_destroyed()?;
        self.binding.stop_loading_group(handle).into_result()
    }

    /// Deliver pending callback payloads. Call once per fixed update.
    ///
    /// Each kind is delivered at most once per call, and only the most recent
    /// payload of each kind survives between polls. Returns how many
    /// application callbacks ran.
    pub fn poll(&mut self) -> usize {
        let mut delivered = 0;

        if let Some(params) = self.mailbox.take_fidelity_parameters() {
            self.current_fidelity_params = Some(params.clone());
            if let Some(handler) = self.on_fidelity_parameters.as_mut() {
                handler(params);
                delivered += 1;
            }
        }

        if let Some(upload) = self.mailbox.take_upload() {
            if let Some(handler) = self.on_upload.as_mut() {
                handler(upload);
                delivered += 1;
            }
        }

        delivered
    }

    /// Default annotation mode: a scene has started loading.
    pub fn scene_loading(&mut self) -> TuneResult<()> {
        self.ensure_default_annotation()?;
        let mut annotation = self.current_annotation.clone();
        self.annotation_fields.set_loading(&mut annotation, true);
        self.push_default_annotation(annotation)
    }

    /// Default annotation mode: the scene with `build_index` finished loading.
    pub fn scene_loaded(&mut self, build_index: i32) -> TuneResult<()> {
        self.ensure_default_annotation()?;
        let mut annotation = self.current_annotation.clone();
        self.annotation_fields.set_scene(&mut annotation, build_index);
        self.annotation_fields.set_loading(&mut annotation, false);
        self.push_default_annotation(annotation)
    }

    fn ensure_default_annotation(&self) -> TuneResult<()> {
        if self.annotation_mode != AnnotationMode::Default {
            return Err(ErrorCode::BadParameter);
        }
        Ok(())
    }

    // Before the first scene_loaded the scene is still 0; keep the annotation
    // locally so the next event completes it.
    fn push_default_annotation(&mut self, annotation: A) -> TuneResult<()> {
        if first_invalid_enum_field(&annotation).is_some() {
            self.current_annotation = annotation;
            return Ok(());
        }
        self.set_current_annotation(&annotation)
    }

    /// Quality-level fidelity mode: the engine switched to `quality_level`.
    pub fn quality_level_changed(&mut self, quality_level: i32) -> TuneResult<()> {
        if self.fidelity_mode != FidelityMode::QualityLevels || quality_level < 0 {
            return Err(ErrorCode::BadParameter);
        }
        let mut params = self.current_fidelity_params.clone().unwrap_or_default();
        if !self.fidelity_fields.set_quality_level(&mut params, quality_level) {
            return Err(ErrorCode::BadParameter);
        }
        self.set_fidelity_parameters(&params)
    }

    /// 0-based quality level encoded in `params`.
    pub fn quality_level_of(&self, params: &F) -> Option<i32> {
        self.fidelity_fields.quality_level(params)
    }

    /// Tear down the library and drop pending payloads.
    ///
    /// Every later call reports `TuningforkNotInitialized`. The library
    /// itself is only torn down by the tuner that currently owns it: one that
    /// never started, or was displaced by a newer tuner, just goes inert.
    pub fn destroy(&mut self) -> TuneResult<()> {
        if self.state == TunerState::Destroyed {
            return Ok(());
        }

        let owns_library =
            self.state == TunerState::Initialized && registry::is_active(&self.sink);
        self.state = TunerState::Destroyed;

        let code = if owns_library {
            let code = self.binding.report_lifecycle_event(LifecycleState::OnDestroy);
            if !code.is_ok() {
                tracing::warn!(%code, "lifecycle event not recorded");
            }
            self.binding.destroy()
        } else {
            ErrorCode::Ok
        };

        registry::uninstall(&self.sink);
        self.mailbox.clear();
        if owns_library {
            tracing::info!(binding = self.binding.name(), %code, "tuning fork destroyed");
        } else {
            tracing::debug!(binding = self.binding.name(), "inactive tuner destroyed");
        }
        code.into_result()
    }

    pub fn state(&self) -> TunerState {
        self.state
    }

    pub fn binding_name(&self) -> &'static str {
        self.binding.name()
    }

    pub fn current_annotation(&self) -> &A {
        &self.current_annotation
    }

    pub fn current_fidelity_parameters(&self) -> Option<&F> {
        self.current_fidelity_params.as_ref()
    }

    /// Settings loaded on start, if an assets directory was configured.
    pub fn settings(&self) -> Option<&Settings> {
        self.settings.as_ref()
    }

    pub fn annotation_mode(&self) -> AnnotationMode {
        self.annotation_mode
    }

    pub fn fidelity_mode(&self) -> FidelityMode {
        self.fidelity_mode
    }

    /// Whether this tuner currently receives native callbacks.
    pub fn is_receiving_callbacks(&self) -> bool {
        registry::is_active(&self.sink)
    }

    /// Payloads overwritten before a poll could deliver them.
    pub fn superseded_deliveries(&self) -> u64 {
        self.mailbox.superseded()
    }
}

impl<F: TuningMessage, A: TuningMessage> Drop for Tuner<F, A> {
    fn drop(&mut self) {
        if let Err(code) = self.destroy() {
            tracing::warn!(%code, "tuning fork destroy failed on drop");
        }
    }
}

use super::{AnnotationMode, FidelityMode, Tuner};
use crate::Binding::{binding_for_current_platform, TuningForkBinding};
use crate::Core::{ErrorCode, TuneResult};
use crate::Schema::TuningMessage;
use crate::Upload::UploadTelemetryRequest;
use std::ffi::CString;
use std::marker::PhantomData;
use std::path::PathBuf;
use std::time::Duration;

pub(crate) type FidelityHandler<F> = Box<dyn FnMut(F)>;
pub(crate) type UploadHandler = Box<dyn FnMut(UploadTelemetryRequest)>;

pub struct TunerBuilder<F, A> {
    pub(crate) binding: Option<Box<dyn TuningForkBinding>>,
    pub(crate) assets_dir: Option<PathBuf>,
    pub(crate) training_fidelity_params: Option<F>,
    pub(crate) endpoint_uri_override: Option<String>,
    pub(crate) fidelity_timeout: Duration,
    pub(crate) annotation_mode: AnnotationMode,
    pub(crate) fidelity_mode: FidelityMode,
    pub(crate) on_fidelity_parameters: Option<FidelityHandler<F>>,
    pub(crate) on_upload: Option<UploadHandler>,
    _annotation: PhantomData<A>,
}

impl<F, A> Default for TunerBuilder<F, A> {
    fn default() -> Self {
        Self {
            binding: None, // Picked per platform at build time
            assets_dir: None,
            training_fidelity_params: None,
            endpoint_uri_override: None,
            fidelity_timeout: Duration::from_millis(1000),
            annotation_mode: AnnotationMode::Custom,
            fidelity_mode: FidelityMode::Custom,
            on_fidelity_parameters: None,
            on_upload: None,
            _annotation: PhantomData,
        }
    }
}

impl<F: TuningMessage, A: TuningMessage> TunerBuilder<F, A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `binding` instead of the one for the current platform.
    pub fn with_binding(mut self, binding: Box<dyn TuningForkBinding>) -> Self {
        self.binding = Some(binding);
        self
    }

    /// Directory holding `tuningfork_settings.bin`; checked on start.
    pub fn with_assets_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.assets_dir = Some(dir.into());
        self
    }

    /// Parameters reported while no fidelity parameters have been downloaded.
    pub fn with_training_fidelity_params(mut self, params: F) -> Self {
        self.training_fidelity_params = Some(params);
        self
    }

    pub fn with_endpoint_override(mut self, uri: impl Into<String>) -> Self {
        self.endpoint_uri_override = Some(uri.into());
        self
    }

    pub fn with_fidelity_timeout(mut self, timeout: Duration) -> Self {
        self.fidelity_timeout = timeout;
        self
    }

    pub fn with_annotation_mode(mut self, mode: AnnotationMode) -> Self {
        self.annotation_mode = mode;
        self
    }

    pub fn with_fidelity_mode(mut self, mode: FidelityMode) -> Self {
        self.fidelity_mode = mode;
        self
    }

    /// Called from `Tuner::poll` with the latest downloaded parameters.
    pub fn on_fidelity_parameters(mut self, handler: impl FnMut(F) + 'static) -> Self {
        self.on_fidelity_parameters = Some(Box::new(handler));
        self
    }

    /// Called from `Tuner::poll` with the latest upload payload.
    pub fn on_upload(mut self, handler: impl FnMut(UploadTelemetryRequest) + 'static) -> Self {
        self.on_upload = Some(Box::new(handler));
        self
    }

    pub fn build(mut self) -> TuneResult<Tuner<F, A>> {
        let endpoint = match self.endpoint_uri_override.as_deref() {
            Some(uri) => Some(CString::new(uri).map_err(|_| {
                tracing::warn!("endpoint override contains a NUL byte");
                ErrorCode::BadParameter
            })?),
            None => None,
        };
        let binding = self
            .binding
            .take()
            .unwrap_or_else(binding_for_current_platform);

        Tuner::assemble(binding, endpoint, self)
    }
}

use super::{find_field, FieldDescriptor, FieldKind, FieldValue, TuningMessage};

pub const LEVEL_FIELD: &str = "level";
pub const SCENE_FIELD: &str = "scene";
pub const LOADING_STATE_FIELD: &str = "loading_state";

/// `loading_state` values of the default annotation. 0 stays invalid.
pub const NOT_LOADING: i32 = 1;
pub const LOADING: i32 = 2;

fn value_for(field: &FieldDescriptor<impl Sized>, raw: i32) -> Option<FieldValue> {
    match field.kind {
        FieldKind::Int => Some(FieldValue::Int(raw)),
        FieldKind::Enum { .. } => Some(FieldValue::Enum(raw)),
        FieldKind::Float => None,
    }
}

fn resolve_integral<M: TuningMessage>(name: &str) -> Option<&'static FieldDescriptor<M>> {
    find_field::<M>(name).filter(|field| field.kind != FieldKind::Float)
}

/// Annotation fields the tuner can drive on its own.
pub struct AnnotationFields<A: 'static> {
    scene: Option<&'static FieldDescriptor<A>>,
    loading_state: Option<&'static FieldDescriptor<A>>,
}

impl<A: TuningMessage> AnnotationFields<A> {
    pub fn resolve() -> Self {
        Self {
            scene: resolve_integral::<A>(SCENE_FIELD),
            loading_state: resolve_integral::<A>(LOADING_STATE_FIELD),
        }
    }

    pub fn scene(&self) -> Option<&'static FieldDescriptor<A>> {
        self.scene
    }

    pub fn loading_state(&self) -> Option<&'static FieldDescriptor<A>> {
        self.loading_state
    }

    /// Both fields exist, so scene changes can be annotated automatically.
    pub fn is_complete(&self) -> bool {
        self.scene.is_some() && self.loading_state.is_some()
    }

    /// Scene values are build indices shifted by one, keeping 0 invalid.
    pub fn set_scene(&self, annotation: &mut A, build_index: i32) -> bool {
        let Some(field) = self.scene else {
            return false;
        };
        match value_for(field, build_index.saturating_add(1)) {
            Some(value) => field.write(annotation, value),
            None => false,
        }
    }

    pub fn set_loading(&self, annotation: &mut A, loading: bool) -> bool {
        let Some(field) = self.loading_state else {
            return false;
        };
        let raw = if loading { LOADING } else { NOT_LOADING };
        match value_for(field, raw) {
            Some(value) => field.write(annotation, value),
            None => false,
        }
    }

    pub fn is_loading(&self, annotation: &A) -> Option<bool> {
        self.loading_state
            .and_then(|field| field.read(annotation).as_i32())
            .map(|raw| raw == LOADING)
    }
}

/// Fidelity fields the tuner can drive on its own.
pub struct FidelityFields<F: 'static> {
    level: Option<&'static FieldDescriptor<F>>,
}

impl<F: TuningMessage> FidelityFields<F> {
    pub fn resolve() -> Self {
        Self {
            level: resolve_integral::<F>(LEVEL_FIELD),
        }
    }

    pub fn level(&self) -> Option<&'static FieldDescriptor<F>> {
        self.level
    }

    /// Store a 0-based quality level as `level + 1`.
    pub fn set_quality_level(&self, params: &mut F, quality_level: i32) -> bool {
        let Some(field) = self.level else {
            return false;
        };
        match value_for(field, quality_level.saturating_add(1)) {
            Some(value) => field.write(params, value),
            None => false,
        }
    }

    /// The 0-based quality level, or `None` if unset or invalid.
    pub fn quality_level(&self, params: &F) -> Option<i32> {
        self.level
            .and_then(|field| field.read(params).as_i32())
            .filter(|raw| *raw > 0)
            .map(|raw| raw - 1)
    }
}

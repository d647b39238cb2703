// Field metadata for caller-defined annotation and fidelity messages.
//
// The bridge never knows the concrete message types. Instead each type
// publishes a static table of field descriptors with typed accessors, and
// the bridge works against that table: validation walks every enum field,
// and the handful of well-known fields are looked up once by name.

mod well_known;

pub use well_known::{AnnotationFields, FidelityFields};

use prost::Message;

/// Value read from or written to a message field.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum FieldValue {
    Int(i32),
    Float(f32),
    /// Raw enum discriminant. 0 is reserved as "invalid".
    Enum(i32),
}

impl FieldValue {
    pub fn as_i32(self) -> Option<i32> {
        match self {
            FieldValue::Int(v) | FieldValue::Enum(v) => Some(v),
            FieldValue::Float(_) => None,
        }
    }
}

/// Kind of a field, with the known values for enums.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum FieldKind {
    Int,
    Float,
    Enum {
        /// `(name, value)` pairs, including the reserved zero entry.
        values: &'static [(&'static str, i32)],
    },
}

/// Describes one field of `M`.
pub struct FieldDescriptor<M> {
    pub name: &'static str,
    pub number: u32,
    pub kind: FieldKind,
    pub get: fn(&M) -> FieldValue,
    pub set: fn(&mut M, FieldValue),
}

impl<M> FieldDescriptor<M> {
    pub fn is_enum(&self) -> bool {
        matches!(self.kind, FieldKind::Enum { .. })
    }

    pub fn read(&self, message: &M) -> FieldValue {
        (self.get)(message)
    }

    /// Write `value`, rejecting values of the wrong kind.
    pub fn write(&self, message: &mut M, value: FieldValue) -> bool {
        let compatible = matches!(
            (self.kind, value),
            (FieldKind::Int, FieldValue::Int(_))
                | (FieldKind::Float, FieldValue::Float(_))
                | (FieldKind::Enum { .. }, FieldValue::Enum(_))
        );
        if compatible {
            (self.set)(message, value);
        }
        compatible
    }

    /// Name of an enum value, if this is an enum field that knows it.
    pub fn enum_value_name(&self, value: i32) -> Option<&'static str> {
        match self.kind {
            FieldKind::Enum { values } => values
                .iter()
                .find(|(_, v)| *v == value)
                .map(|(name, _)| *name),
            _ => None,
        }
    }

    /// Number of declared enum values, excluding the reserved zero.
    pub fn enum_size(&self) -> Option<usize> {
        match self.kind {
            FieldKind::Enum { values } => Some(values.iter().filter(|(_, v)| *v != 0).count()),
            _ => None,
        }
    }
}

impl<M> std::fmt::Debug for FieldDescriptor<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("number", &self.number)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// A protobuf message the bridge can carry across the native boundary.
pub trait TuningMessage: Message + Default + Clone + 'static {
    /// Every int, float and enum field of the message.
    fn fields() -> &'static [FieldDescriptor<Self>];
}

/// True if any enum field still holds the reserved zero value.
pub fn has_invalid_enum_field<M: TuningMessage>(message: &M) -> bool {
    first_invalid_enum_field(message).is_some()
}

/// Name of the first enum field left at zero.
pub fn first_invalid_enum_field<M: TuningMessage>(message: &M) -> Option<&'static str> {
    M::fields()
        .iter()
        .filter(|field| field.is_enum())
        .find(|field| field.read(message) == FieldValue::Enum(0))
        .map(|field| field.name)
}

/// Look up a field by name, ignoring case and underscores.
pub fn find_field<M: TuningMessage>(name: &str) -> Option<&'static FieldDescriptor<M>> {
    let wanted = normalize(name);
    M::fields().iter().find(|field| normalize(field.name) == wanted)
}

/// Sizes of every enum field in declaration order, as the settings file
/// records them.
pub fn annotation_enum_sizes<M: TuningMessage>() -> Vec<i32> {
    M::fields()
        .iter()
        .filter_map(|field| field.enum_size())
        .map(|size| size as i32)
        .collect()
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

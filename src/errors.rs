use derive_more::{Display, Error};

/// Composite fields the derived identifiers are parsed out of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum CompositeField {
    #[display(fmt = "key")]
    Key,
    #[display(fmt = "instance_crn")]
    InstanceCrn,
}

/// Composite field does not follow the documented layout.
///
/// Segment indexes are zero-based positions after splitting on `/`.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum InputFormatError {
    #[display(fmt = "composite field `{}` is missing", field)]
    Missing { field: CompositeField },

    #[display(fmt = "composite field `{}` has no segment at index {}", field, segment)]
    MissingSegment {
        field: CompositeField,
        segment: usize,
    },

    #[display(
        fmt = "segment {} of composite field `{}` carries no `=` annotated value",
        segment,
        field
    )]
    MissingValue {
        field: CompositeField,
        segment: usize,
    },
}

/// Record level failure, the record cannot be rendered.
#[derive(Debug, Display, Error)]
pub enum ConvertError {
    #[display(fmt = "unable to decode flow log record: {}", _0)]
    Decode(serde_json::Error),

    #[display(fmt = "malformed flow log record: {}", _0)]
    InputFormat(InputFormatError),
}

impl PartialEq for ConvertError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Decode(a), Self::Decode(b)) => a.classify() == b.classify(),
            (Self::InputFormat(a), Self::InputFormat(b)) => a == b,
            _ => false,
        }
    }
}

impl From<serde_json::Error> for ConvertError {
    fn from(error: serde_json::Error) -> Self {
        Self::Decode(error)
    }
}

impl From<InputFormatError> for ConvertError {
    fn from(error: InputFormatError) -> Self {
        Self::InputFormat(error)
    }
}

/// Output schema could not be built from its textual form.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum SchemaError {
    #[display(fmt = "unknown schema field `{}`", _0)]
    UnknownField(#[error(not(source))] String),

    #[display(fmt = "schema does not list any field")]
    Empty,
}

/// Protocol table entry could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum ProtocolTableError {
    #[display(fmt = "protocol number `{}` is not a valid IANA number", _0)]
    InvalidNumber(#[error(not(source))] String),

    #[display(fmt = "protocol number {} has an empty name", _0)]
    EmptyName(#[error(not(source))] u8),
}

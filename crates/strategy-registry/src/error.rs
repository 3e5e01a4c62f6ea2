//! Error types for strategy conversion and sampling.

use schema_core::SchemaType;

/// Broad class of a [`ConversionError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The schema's constraints contradict each other
    Configuration,
    /// No rule can convert the schema type
    UnsupportedType,
}

/// Error type for converting schema types into strategies.
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    /// Membership validators leave no allowed value
    #[error("Type {type_name} does not match any value")]
    NoMatchingValue { type_name: String },

    /// Range or length validators cannot be combined
    #[error("Invalid settings for {validator} validators on {type_name}: {reason}")]
    InvalidSettings {
        type_name: String,
        validator: &'static str,
        reason: String,
    },

    /// Union without alternatives
    #[error("Type {type_name} has no alternatives")]
    EmptyUnion { type_name: String },

    /// No override or rule matches the schema type
    #[error("Unsupported type: {type_name}")]
    UnsupportedType { type_name: String },
}

impl ConversionError {
    pub(crate) fn unsupported(ty: &SchemaType) -> Self {
        Self::UnsupportedType {
            type_name: ty.to_string(),
        }
    }

    pub(crate) fn invalid_settings(
        ty: &SchemaType,
        validator: &'static str,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidSettings {
            type_name: ty.to_string(),
            validator,
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NoMatchingValue { .. }
            | Self::InvalidSettings { .. }
            | Self::EmptyUnion { .. } => ErrorKind::Configuration,
            Self::UnsupportedType { .. } => ErrorKind::UnsupportedType,
        }
    }

    pub fn is_configuration(&self) -> bool {
        self.kind() == ErrorKind::Configuration
    }
}

/// Error type for drawing values from a strategy.
#[derive(Debug, thiserror::Error)]
pub enum SampleError {
    /// The strategy rejected too many candidates
    #[error("Failed to generate a value: {reason}")]
    Rejected { reason: String },
}

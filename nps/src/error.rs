//! Error types for the NPS gateway SDK.
//!
//! Business-level payment failures are not errors here: they are reported as
//! data through [`Transaction::errors`](crate::transaction::Transaction::errors).

use std::fmt;

/// The rule a field value violated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    /// Empty string on a field that does not allow it.
    Empty,
    /// Length differs from the exact length required.
    Length(usize),
    /// Longer than the maximum length.
    MaxLength(usize),
    /// Shorter than the minimum length.
    MinLength(usize),
    /// Not a member of the allowed-value set.
    NotAllowed(Vec<String>),
    /// Contains characters outside the field's character set.
    Charset(&'static str),
    /// Not made of decimal digits only.
    NotNumeric,
    /// Does not parse with the canonical format.
    Format(&'static str),
    /// Input of the wrong kind (e.g., a date given to a text field).
    InputKind(&'static str),
    /// Not a 32-character hexadecimal MD5 digest.
    Md5,
    /// Not a valid email address.
    Email,
    /// Not a valid URL.
    Url,
    /// Not a `d.d` version string.
    Version,
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "value can't be empty"),
            Self::Length(n) => write!(f, "value must have exactly {n} characters"),
            Self::MaxLength(n) => write!(f, "value can't be longer than {n} characters"),
            Self::MinLength(n) => write!(f, "value can't be shorter than {n} characters"),
            Self::NotAllowed(allowed) => write!(f, "value must be one of {allowed:?}"),
            Self::Charset(description) => write!(f, "only {description} are allowed"),
            Self::NotNumeric => write!(f, "value must be numbers passed as a string, like \"132\""),
            Self::Format(format) => write!(f, "value must match the format `{format}`"),
            Self::InputKind(expected) => write!(f, "expected {expected}"),
            Self::Md5 => write!(f, "value must be a valid md5 hash"),
            Self::Email => write!(f, "invalid email address"),
            Self::Url => write!(f, "invalid URL format"),
            Self::Version => write!(f, "invalid version"),
        }
    }
}

/// A value was rejected by a field's rules.
///
/// The prior stored value, if any, is left untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidFieldValue {
    /// Name of the field being assigned.
    pub field: &'static str,
    /// The offending value, after any normalization that could be applied.
    pub value: String,
    /// The violated rule.
    pub constraint: Constraint,
}

impl InvalidFieldValue {
    /// Creates a new invalid-value error.
    #[must_use]
    pub fn new(field: &'static str, value: impl Into<String>, constraint: Constraint) -> Self {
        Self {
            field,
            value: value.into(),
            constraint,
        }
    }
}

impl fmt::Display for InvalidFieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid value {:?} for field `{}`: {}",
            self.value, self.field, self.constraint
        )
    }
}

impl std::error::Error for InvalidFieldValue {}

/// Error assigning a field on a record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    /// The value failed validation.
    #[error(transparent)]
    Invalid(#[from] InvalidFieldValue),

    /// The record's schema declares no field with this name.
    #[error("record `{record}` has no field `{field}`")]
    UnknownField {
        /// Name of the record schema.
        record: &'static str,
        /// The requested field name.
        field: String,
    },
}

/// Error returned by [`Gateway::process`](crate::gateway::Gateway::process).
///
/// Transport failures are carried as the transport's own error type, untouched.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError<E> {
    /// The transport collaborator failed.
    #[error(transparent)]
    Transport(E),

    /// A field could not be assigned while signing the request or mapping the reply.
    #[error("{0}")]
    Field(#[from] FieldError),
}

/// Error loading [`Settings`](crate::config::Settings).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file exists but could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path that was read.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for [`Settings`](crate::config::Settings).
    #[error("failed to parse {path}: {source}")]
    Parse {
        /// Path that was parsed.
        path: String,
        /// The underlying TOML error.
        #[source]
        source: toml::de::Error,
    },
}

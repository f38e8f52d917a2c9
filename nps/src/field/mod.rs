//! Validated fields.
//!
//! A [`Field`] pairs a wire name with a [`FieldKind`] (the gateway data type)
//! and a [`FieldSpec`] (length, nullability, membership, default, leniency).
//! Fields hold no values themselves: records keep one slot per declared field,
//! so a single definition is shared by every record instance.
//!
//! Assignment goes through [`Field::clean`], which normalizes the input and
//! either returns the value to store or rejects it. Nothing is stored on
//! rejection.

mod kind;
mod spec;

pub use kind::{DEFAULT_URL_MAX_LENGTH, FieldKind};
pub use spec::FieldSpec;

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use nps_proto::format::{DATE_FORMAT, DATETIME_FORMAT, TIME_FORMAT};

use crate::error::InvalidFieldValue;

/// A value offered for assignment.
///
/// Temporal kinds accept either their pre-parsed `chrono` value or text in
/// the canonical format; every other kind accepts text only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldInput {
    /// Plain text.
    Text(String),
    /// A calendar date.
    Date(NaiveDate),
    /// A date and time of day.
    DateTime(NaiveDateTime),
    /// A time of day.
    Time(NaiveTime),
}

impl fmt::Display for FieldInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Date(date) => write!(f, "{}", date.format(DATE_FORMAT)),
            Self::DateTime(datetime) => write!(f, "{}", datetime.format(DATETIME_FORMAT)),
            Self::Time(time) => write!(f, "{}", time.format(TIME_FORMAT)),
        }
    }
}

impl From<&str> for FieldInput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for FieldInput {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&String> for FieldInput {
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}

impl From<NaiveDate> for FieldInput {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl From<NaiveDateTime> for FieldInput {
    fn from(value: NaiveDateTime) -> Self {
        Self::DateTime(value)
    }
}

impl From<NaiveTime> for FieldInput {
    fn from(value: NaiveTime) -> Self {
        Self::Time(value)
    }
}

/// A named field definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    name: &'static str,
    kind: FieldKind,
    spec: FieldSpec,
}

impl Field {
    /// Creates a field definition.
    #[must_use]
    pub const fn new(name: &'static str, kind: FieldKind, spec: FieldSpec) -> Self {
        Self { name, kind, spec }
    }

    /// Returns the wire name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the data type.
    #[must_use]
    pub const fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Returns the generic rules.
    #[must_use]
    pub const fn spec(&self) -> &FieldSpec {
        &self.spec
    }

    /// Normalizes and validates `input`, returning the value to store.
    ///
    /// Kind rules run first, then the spec's length and membership rules.
    /// Lenient fields return the input as given, without normalization, when
    /// a rule is violated.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidFieldValue`] naming the first violated rule, unless
    /// the field is lenient.
    pub fn clean(&self, input: impl Into<FieldInput>) -> Result<String, InvalidFieldValue> {
        let input = input.into();
        let raw = self.spec.lenient.then(|| input.to_string());
        let outcome = self
            .kind
            .normalize(input)
            .and_then(|value| match self.spec.check(&value) {
                Some(constraint) => Err((value, constraint)),
                None => Ok(value),
            });

        match (outcome, raw) {
            (Ok(value), _) => Ok(value),
            (Err((_, constraint)), Some(raw)) => {
                #[cfg(feature = "telemetry")]
                tracing::warn!(
                    field = self.name,
                    %constraint,
                    "storing invalid value on lenient field"
                );
                #[cfg(not(feature = "telemetry"))]
                let _ = constraint;
                Ok(raw)
            }
            (Err((value, constraint)), None) => {
                Err(InvalidFieldValue::new(self.name, value, constraint))
            }
        }
    }

    /// Returns the cleaned default value, if the spec declares one.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidFieldValue`] if the default breaks the field's own
    /// rules and the field is not lenient.
    pub fn initial(&self) -> Result<Option<String>, InvalidFieldValue> {
        self.spec
            .default
            .as_deref()
            .map(|default| self.clean(default))
            .transpose()
    }

    /// Resolves what a read returns given the stored slot.
    ///
    /// Clock-tracking kinds ignore the slot and report the current time.
    #[must_use]
    pub fn read(&self, stored: Option<&str>) -> Option<String> {
        self.kind
            .current()
            .or_else(|| stored.map(str::to_owned))
    }
}

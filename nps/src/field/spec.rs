//! Generic length, nullability and membership rules shared by every field kind.

use crate::error::Constraint;

/// Immutable per-field configuration.
///
/// An exact [`length`](Self::length), when set, replaces the
/// [`min_length`](Self::min_length) / [`max_length`](Self::max_length) checks.
/// Lengths are counted in characters, not bytes.
///
/// # Example
///
/// ```rust
/// use nps::field::FieldSpec;
///
/// let spec = FieldSpec::new().min_length(2).max_length(5);
/// assert!(spec.check("es_AR").is_none());
/// assert!(spec.check("e").is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSpec {
    /// Exact number of characters required.
    pub length: Option<usize>,
    /// Minimum number of characters.
    pub min_length: Option<usize>,
    /// Maximum number of characters.
    pub max_length: Option<usize>,
    /// Whether the empty string is accepted.
    pub null: bool,
    /// Values the field may take. `None` or an empty list means any value.
    pub allowed: Option<Vec<String>>,
    /// Value every fresh record starts with.
    pub default: Option<String>,
    /// Store invalid values instead of rejecting them.
    pub lenient: bool,
}

impl FieldSpec {
    /// Creates a spec with no rules besides rejecting the empty string.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires exactly `length` characters.
    #[must_use]
    pub const fn length(mut self, length: usize) -> Self {
        self.length = Some(length);
        self
    }

    /// Requires at least `min_length` characters.
    #[must_use]
    pub const fn min_length(mut self, min_length: usize) -> Self {
        self.min_length = Some(min_length);
        self
    }

    /// Requires at most `max_length` characters.
    #[must_use]
    pub const fn max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    /// Accepts the empty string.
    #[must_use]
    pub const fn nullable(mut self) -> Self {
        self.null = true;
        self
    }

    /// Restricts the field to the given values.
    #[must_use]
    pub fn allowed<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Restricts the field to the given values, if any are configured.
    #[must_use]
    pub fn allowed_from(mut self, values: Option<&[String]>) -> Self {
        self.allowed = values.map(<[String]>::to_vec);
        self
    }

    /// Sets the value fresh records start with.
    #[must_use]
    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Stores invalid values as-is, without normalization, instead of
    /// rejecting them.
    #[must_use]
    pub const fn lenient(mut self) -> Self {
        self.lenient = true;
        self
    }

    /// Returns the first rule `value` violates, if any.
    ///
    /// Rules are checked in order: empty string, then exact length (or
    /// maximum and minimum length), then membership.
    #[must_use]
    pub fn check(&self, value: &str) -> Option<Constraint> {
        let len = value.chars().count();

        if len == 0 && !self.null {
            return Some(Constraint::Empty);
        }
        if let Some(length) = self.length {
            if len != length {
                return Some(Constraint::Length(length));
            }
        } else {
            match (self.max_length, self.min_length) {
                (Some(max), _) if len > max => return Some(Constraint::MaxLength(max)),
                (_, Some(min)) if len < min => return Some(Constraint::MinLength(min)),
                _ => {}
            }
        }
        match &self.allowed {
            Some(allowed) if !allowed.is_empty() && !allowed.iter().any(|a| a == value) => {
                Some(Constraint::NotAllowed(allowed.clone()))
            }
            _ => None,
        }
    }
}

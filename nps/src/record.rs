//! Record schemas and record instances.
//!
//! A [`RecordSchema`] is the static, ordered list of fields one side of a
//! transaction carries (e.g., the `PayOnLine_3p` request). It is built once,
//! validated once, and shared read-only through an [`Arc`].
//!
//! A [`Record`] is one attempt's values for a schema: one slot per declared
//! field, seeded from the fields' defaults. Assignment validates first and
//! stores second, so a rejected value never replaces the previous one.

use std::sync::Arc;

use nps_proto::{FieldMap, is_wire_field};
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::{FieldError, InvalidFieldValue};
use crate::field::{Field, FieldInput, FieldKind, FieldSpec};

/// Ordered field definitions for one record type.
#[derive(Debug)]
pub struct RecordSchema {
    name: &'static str,
    fields: Vec<Field>,
    initial: Vec<Option<String>>,
}

impl RecordSchema {
    /// Starts a schema with the given display name.
    #[must_use]
    pub const fn builder(name: &'static str) -> RecordSchemaBuilder {
        RecordSchemaBuilder {
            name,
            fields: Vec::new(),
        }
    }

    /// Returns the display name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Looks up a field by wire name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name() == name)
    }

    /// Returns `true` if the schema declares `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|field| field.name() == name)
    }
}

/// Builder for [`RecordSchema`].
#[derive(Debug)]
pub struct RecordSchemaBuilder {
    name: &'static str,
    fields: Vec<Field>,
}

impl RecordSchemaBuilder {
    /// Declares a field. A later declaration with the same name replaces the earlier one in place.
    #[must_use]
    pub fn field(mut self, name: &'static str, kind: FieldKind, spec: FieldSpec) -> Self {
        let field = Field::new(name, kind, spec);
        match self.fields.iter_mut().find(|f| f.name() == name) {
            Some(existing) => *existing = field,
            None => self.fields.push(field),
        }
        self
    }

    /// Validates every default and freezes the schema.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidFieldValue`] for the first default that breaks its
    /// field's rules (lenient fields excepted).
    pub fn build(self) -> Result<Arc<RecordSchema>, InvalidFieldValue> {
        let initial = self
            .fields
            .iter()
            .map(Field::initial)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Arc::new(RecordSchema {
            name: self.name,
            fields: self.fields,
            initial,
        }))
    }
}

/// One instance of a record: a value slot per declared field.
#[derive(Debug, Clone)]
pub struct Record {
    schema: Arc<RecordSchema>,
    values: Vec<Option<String>>,
    user_data: Option<String>,
}

impl Record {
    /// Creates a fresh record with every field at its default.
    #[must_use]
    pub fn new(schema: Arc<RecordSchema>) -> Self {
        let values = schema.initial.clone();
        Self {
            schema,
            values,
            user_data: None,
        }
    }

    /// Returns the schema this record instantiates.
    #[must_use]
    pub fn schema(&self) -> &RecordSchema {
        &self.schema
    }

    /// Reads a field's current value.
    ///
    /// Returns `None` for unset fields and for names the schema does not declare.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<String> {
        let index = self.schema.position(name)?;
        self.schema.fields[index].read(self.values[index].as_deref())
    }

    /// Validates `input` and stores it in the named field.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::UnknownField`] if the schema has no such field,
    /// or [`FieldError::Invalid`] if the value is rejected. Either way the
    /// stored value is unchanged.
    pub fn set(&mut self, name: &str, input: impl Into<FieldInput>) -> Result<(), FieldError> {
        let index = self
            .schema
            .position(name)
            .ok_or_else(|| FieldError::UnknownField {
                record: self.schema.name,
                field: name.to_owned(),
            })?;
        let value = self.schema.fields[index].clean(input)?;
        self.values[index] = Some(value);
        Ok(())
    }

    /// Clears the named field, bypassing validation.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::UnknownField`] if the schema has no such field.
    pub fn unset(&mut self, name: &str) -> Result<(), FieldError> {
        let index = self
            .schema
            .position(name)
            .ok_or_else(|| FieldError::UnknownField {
                record: self.schema.name,
                field: name.to_owned(),
            })?;
        self.values[index] = None;
        Ok(())
    }

    /// Iterates over every `psp_` field and its current value, in declaration order.
    pub fn items(&self) -> impl Iterator<Item = (&'static str, Option<String>)> + '_ {
        self.schema
            .fields
            .iter()
            .zip(&self.values)
            .filter(|(field, _)| is_wire_field(field.name()))
            .map(|(field, value)| (field.name(), field.read(value.as_deref())))
    }

    /// Collects the `psp_` fields that hold a non-empty value.
    ///
    /// This is the shape sent to the gateway: unset and empty fields are omitted.
    #[must_use]
    pub fn to_field_map(&self) -> FieldMap {
        self.items()
            .filter_map(|(name, value)| {
                value
                    .filter(|v| !v.is_empty())
                    .map(|v| (name.to_owned(), v))
            })
            .collect()
    }

    /// Returns the free-form passthrough value a reply carried, if any.
    #[must_use]
    pub fn user_data(&self) -> Option<&str> {
        self.user_data.as_deref()
    }

    /// Stores a free-form passthrough value. No validation applies.
    pub fn set_user_data(&mut self, value: impl Into<String>) {
        self.user_data = Some(value.into());
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (name, value) in self.items() {
            map.serialize_entry(name, &value)?;
        }
        map.end()
    }
}

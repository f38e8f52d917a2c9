//! Wire vocabulary for the NPS payment gateway protocol.
//!
//! This crate defines the names and shapes that cross the boundary between
//! the core SDK and whatever transport talks to the gateway. It has minimal
//! dependencies (only `serde` and `indexmap`) and is intended to be shared by
//! the core crate and by transport implementations alike.
//!
//! # Modules
//!
//! - [`operation`] - Remote operations (`PayOnLine_3p`, `SimpleQueryTx`) and their payload types
//! - [`format`] - Canonical string formats for dates, times and amounts

pub mod format;
pub mod operation;

pub use operation::RemoteOperation;

/// Prefix shared by every protocol-visible field name.
pub const PSP_PREFIX: &str = "psp_";

/// Name of the field carrying the MD5 signature of a request.
pub const SECURE_HASH_FIELD: &str = "psp_SecureHash";

/// Name of the free-form passthrough field some replies carry.
pub const TRANSACTION_FIELD: &str = "psp_Transaction";

/// Protocol version sent in `psp_Version` unless the caller overrides it.
pub const PROTOCOL_VERSION: &str = "2.2";

/// A flat bag of field name to string value, in insertion order.
///
/// This is the only shape exchanged with the gateway: outbound requests are
/// built as a `FieldMap` and replies are read back as one.
pub type FieldMap = indexmap::IndexMap<String, String>;

/// Returns `true` if `name` follows the `psp_` naming convention.
///
/// Only such fields are hashed, serialized outbound, or mapped inbound.
#[must_use]
pub fn is_wire_field(name: &str) -> bool {
    name.starts_with(PSP_PREFIX)
}

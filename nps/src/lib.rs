#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Validated fields, request signing and dispatch for the NPS payment gateway.
//!
//! The gateway exchanges flat maps of `psp_`-prefixed fields. This crate
//! validates those fields as they are assigned, signs outgoing requests with
//! the merchant's shared secret, and maps replies back onto typed records.
//! Talking to the gateway itself is left to a [`Transport`] supplied by the
//! caller.
//!
//! # Overview
//!
//! 1. Build a [`Catalog`] once from your [`Settings`], then create a
//!    [`Transaction`] from it for the operation you need.
//! 2. Fill in its request; every assignment is validated immediately.
//! 3. Hand it to [`Gateway::process`], which signs, sends and maps the reply.
//! 4. Check [`Transaction::success`] / [`Transaction::errors`].
//!
//! # Modules
//!
//! - [`field`] - Field kinds and length, nullability and membership rules
//! - [`record`] - Record schemas and per-transaction record instances
//! - [`catalog`] - Request and response schemas for each remote operation
//! - [`transaction`] - Transactions and business error detection
//! - [`signer`] - The `psp_SecureHash` algorithm
//! - [`transport`] - The seam to the SOAP client
//! - [`gateway`] - End-to-end dispatch
//! - [`config`] - Settings file and gateway identity
//! - [`error`] - Error types
//!
//! # Feature Flags
//!
//! - `telemetry` - Enables tracing instrumentation for debugging and monitoring

pub mod catalog;
pub mod config;
pub mod error;
pub mod field;
pub mod gateway;
pub mod record;
pub mod signer;
pub mod transaction;
pub mod transport;

pub use nps_proto::FieldMap;

pub use catalog::Catalog;
pub use config::{GatewayIdentity, Settings};
pub use error::{FieldError, GatewayError, InvalidFieldValue};
pub use gateway::Gateway;
pub use record::Record;
pub use transaction::{ErrorRecord, QueryCriteria, Transaction};
pub use transport::{RemoteCall, Transport};

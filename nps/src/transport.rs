//! The boundary between the core and whatever actually talks to the gateway.
//!
//! The gateway is a SOAP service, but nothing in this crate builds envelopes
//! or opens connections. A [`Transport`] receives the signed, flattened
//! request as a [`RemoteCall`] and returns the reply as a flat [`FieldMap`].
//! Transport failures are returned unchanged to the caller of
//! [`Gateway::process`](crate::gateway::Gateway::process); there is no retry.

use std::sync::Arc;

use nps_proto::{FieldMap, RemoteOperation};
use serde::Serialize;

/// One outbound invocation of a remote operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoteCall<'a> {
    /// Gateway service URL.
    pub url: &'a str,
    /// Remote method and payload type.
    pub operation: RemoteOperation,
    /// Non-empty `psp_` request fields, including `psp_SecureHash`.
    pub fields: FieldMap,
}

/// Sends a [`RemoteCall`] and returns the reply's fields.
///
/// Implementations block until the reply arrives. Callers that need
/// timeouts or concurrency wrap dispatch in their own scheduling layer.
pub trait Transport {
    /// Error raised for connectivity failures, malformed replies and remote faults.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Invokes `call.operation.method` at `call.url` with a payload of type
    /// `call.operation.factory` built from `call.fields`.
    ///
    /// # Errors
    ///
    /// Whatever the underlying client raises.
    fn call(&self, call: RemoteCall<'_>) -> Result<FieldMap, Self::Error>;
}

impl<T: Transport + ?Sized> Transport for &T {
    type Error = T::Error;

    fn call(&self, call: RemoteCall<'_>) -> Result<FieldMap, Self::Error> {
        (**self).call(call)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    type Error = T::Error;

    fn call(&self, call: RemoteCall<'_>) -> Result<FieldMap, Self::Error> {
        (**self).call(call)
    }
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    type Error = T::Error;

    fn call(&self, call: RemoteCall<'_>) -> Result<FieldMap, Self::Error> {
        (**self).call(call)
    }
}

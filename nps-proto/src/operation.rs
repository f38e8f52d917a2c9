//! Remote operations exposed by the gateway.
//!
//! Each operation is addressed by a method name and expects its payload to be
//! shaped as a named remote type (the "factory" in SOAP client parlance).

use serde::Serialize;
use std::fmt;

/// A remote gateway operation: the method to invoke and the payload type it expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct RemoteOperation {
    /// Remote method name (e.g., `"PayOnLine_3p"`).
    pub method: &'static str,
    /// Remote payload type name (e.g., `"RequerimientoStruct_PayOnLine_3p"`).
    pub factory: &'static str,
}

impl RemoteOperation {
    /// Three-step online payment authorization.
    pub const PAY_ONLINE_3P: Self = Self {
        method: "PayOnLine_3p",
        factory: "RequerimientoStruct_PayOnLine_3p",
    };

    /// Transaction status query.
    pub const SIMPLE_QUERY_TX: Self = Self {
        method: "SimpleQueryTx",
        factory: "RequerimientoStruct_SimpleQueryTx",
    };

    /// Creates a descriptor for an operation not predefined here.
    #[must_use]
    pub const fn new(method: &'static str, factory: &'static str) -> Self {
        Self { method, factory }
    }
}

impl fmt::Display for RemoteOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.method, self.factory)
    }
}

//! Transactions: one request, one response, and who sends them where.
//!
//! A [`Transaction`] is created per attempted operation. Its identity and
//! remote operation are fixed at construction; its request is filled in by
//! the caller and its response by [`Gateway::process`](crate::gateway::Gateway::process).
//!
//! Business failures reported by the gateway are data, not errors: inspect
//! [`Transaction::success`] and [`Transaction::errors`] after processing.

use std::fmt;
use std::sync::Arc;

use nps_proto::RemoteOperation;
use serde::Serialize;

use crate::catalog::Catalog;
use crate::config::GatewayIdentity;
use crate::error::FieldError;
use crate::record::Record;

/// Substring of `psp_ResponseMsg` that marks a failed operation.
pub const ERROR_MARKER: &str = "Error";

/// How a status query identifies the transaction it looks up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum QueryCriteria {
    /// By the gateway-assigned `psp_TransactionId`.
    #[serde(rename = "T")]
    TransactionId,
    /// By the merchant's own `psp_MerchTxRef`.
    #[serde(rename = "M")]
    MerchTxRef,
}

impl QueryCriteria {
    /// Returns the one-letter code sent in `psp_QueryCriteria`.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::TransactionId => "T",
            Self::MerchTxRef => "M",
        }
    }
}

impl fmt::Display for QueryCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Snapshot of the response fields describing a failed operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[allow(non_snake_case)]
pub struct ErrorRecord {
    /// Free-text response message.
    pub psp_ResponseMsg: Option<String>,
    /// Numeric response code.
    pub psp_ResponseCod: Option<String>,
    /// Extended response message.
    pub psp_ResponseExtended: Option<String>,
    /// Merchant account the gateway echoed back.
    pub psp_MerchantId: Option<String>,
    /// Merchant order number.
    pub psp_MerchOrderId: Option<String>,
    /// Customer e-mail address.
    pub psp_CustomerMail: Option<String>,
    /// Merchant transaction reference.
    pub psp_MerchTxRef: Option<String>,
}

impl ErrorRecord {
    fn snapshot(response: &Record) -> Self {
        Self {
            psp_ResponseMsg: response.get("psp_ResponseMsg"),
            psp_ResponseCod: response.get("psp_ResponseCod"),
            psp_ResponseExtended: response.get("psp_ResponseExtended"),
            psp_MerchantId: response.get("psp_MerchantId"),
            psp_MerchOrderId: response.get("psp_MerchOrderId"),
            psp_CustomerMail: response.get("psp_CustomerMail"),
            psp_MerchTxRef: response.get("psp_MerchTxRef"),
        }
    }
}

/// One attempted gateway operation.
#[derive(Debug, Clone)]
pub struct Transaction {
    operation: RemoteOperation,
    identity: GatewayIdentity,
    /// Fields sent to the gateway.
    pub request: Record,
    /// Fields the gateway replied with.
    pub response: Record,
}

impl Transaction {
    /// Starts a three-step online payment (`PayOnLine_3p`).
    ///
    /// `psp_MerchantId` is preset from the identity. The request and response
    /// share their schemas with every other transaction built from `catalog`.
    ///
    /// # Errors
    ///
    /// Fails if the identity's merchant id is not a valid `psp_MerchantId`.
    pub fn pay_online_3p(identity: GatewayIdentity, catalog: &Catalog) -> Result<Self, FieldError> {
        let mut request = Record::new(Arc::clone(catalog.pay_online_3p_request()));
        request.set("psp_MerchantId", identity.merchant_id.as_str())?;
        let response = Record::new(Arc::clone(catalog.pay_online_3p_response()));
        Ok(Self {
            operation: RemoteOperation::PAY_ONLINE_3P,
            identity,
            request,
            response,
        })
    }

    /// Starts a status query (`SimpleQueryTx`) for one earlier transaction.
    ///
    /// # Errors
    ///
    /// Fails if the identity's merchant id or `reference` is rejected by the
    /// request's rules.
    pub fn simple_query_tx(
        identity: GatewayIdentity,
        catalog: &Catalog,
        criteria: QueryCriteria,
        reference: &str,
    ) -> Result<Self, FieldError> {
        let mut request = Record::new(Arc::clone(catalog.simple_query_tx_request()));
        request.set("psp_MerchantId", identity.merchant_id.as_str())?;
        request.set("psp_QueryCriteria", criteria.code())?;
        request.set("psp_QueryCriteriaId", reference)?;
        let response = Record::new(Arc::clone(catalog.simple_query_tx_response()));
        Ok(Self {
            operation: RemoteOperation::SIMPLE_QUERY_TX,
            identity,
            request,
            response,
        })
    }

    /// Returns the remote operation this transaction invokes.
    #[must_use]
    pub const fn operation(&self) -> RemoteOperation {
        self.operation
    }

    /// Returns the gateway service URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.identity.url
    }

    /// Returns the merchant account name.
    #[must_use]
    pub fn merchant_id(&self) -> &str {
        &self.identity.merchant_id
    }

    /// Returns the shared signing secret.
    #[must_use]
    pub fn secret(&self) -> &str {
        &self.identity.secret
    }

    /// Returns `true` unless the response reports a failure.
    #[must_use]
    pub fn success(&self) -> bool {
        self.errors().is_empty()
    }

    /// Returns the failures the response reports.
    ///
    /// A response fails when `psp_ResponseMsg` contains [`ERROR_MARKER`]
    /// (case-sensitive). The result then holds exactly one [`ErrorRecord`];
    /// otherwise it is empty. An unset message counts as success.
    #[must_use]
    pub fn errors(&self) -> Vec<ErrorRecord> {
        match self.response.get("psp_ResponseMsg") {
            Some(message) if message.contains(ERROR_MARKER) => {
                vec![ErrorRecord::snapshot(&self.response)]
            }
            _ => Vec::new(),
        }
    }
}

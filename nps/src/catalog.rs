//! Request and response schemas for each supported remote operation.
//!
//! Each function builds a [`RecordSchema`] from the gateway's documented
//! field list. Allow-lists come from the [`Settings`] passed in; with no
//! allow-list configured the field accepts any value that passes its other
//! rules.
//!
//! A [`Catalog`] builds all four schemas once, usually at startup, so a
//! misconfigured allow-list is reported before any transaction exists.
//! Transactions then share its schemas instead of rebuilding them.
//!
//! Response fields are nullable: the gateway echoes blank values for fields
//! it has nothing to report on.

use std::sync::Arc;

use nps_proto::PROTOCOL_VERSION;

use crate::config::Settings;
use crate::error::InvalidFieldValue;
use crate::field::{FieldKind, FieldSpec};
use crate::record::RecordSchema;

/// Country sent when the caller does not set `psp_Country`.
pub const DEFAULT_COUNTRY: &str = "ARG";

/// Transaction source sent when the caller does not set `psp_TxSource`.
pub const DEFAULT_TX_SOURCE: &str = "WEB";

fn version() -> FieldSpec {
    FieldSpec::new().max_length(12).default_value(PROTOCOL_VERSION)
}

fn merchant_id() -> FieldSpec {
    FieldSpec::new().max_length(14)
}

fn order(max: usize) -> FieldSpec {
    FieldSpec::new().max_length(max)
}

fn reply(spec: FieldSpec) -> FieldSpec {
    spec.nullable()
}

/// Request fields of the three-step online payment (`PayOnLine_3p`).
///
/// # Errors
///
/// Fails if `settings` excludes the built-in `psp_Country` or `psp_TxSource`
/// default from its allow-list.
pub fn pay_online_3p_request(settings: &Settings) -> Result<Arc<RecordSchema>, InvalidFieldValue> {
    RecordSchema::builder("PayOnLine_3p request")
        .field("psp_ReturnURL", FieldKind::url(), FieldSpec::new())
        .field("psp_SecureHash", FieldKind::Md5, FieldSpec::new())
        .field("psp_CustomerMail", FieldKind::email(), FieldSpec::new().nullable())
        .field("psp_MerchantMail", FieldKind::email(), FieldSpec::new().nullable())
        .field("psp_FrmBackButtonURL", FieldKind::url(), FieldSpec::new())
        .field("psp_PosDateTime", FieldKind::datetime(), FieldSpec::new())
        .field("psp_Amount", FieldKind::Amount, FieldSpec::new().max_length(12))
        .field("psp_Product", FieldKind::Numeric, FieldSpec::new().max_length(3))
        .field("psp_Currency", FieldKind::Alfanumeric, FieldSpec::new().length(3))
        .field("psp_MerchTxRef", FieldKind::Order, order(64))
        .field("psp_MerchOrderId", FieldKind::Order, order(64))
        .field("psp_NumPayments", FieldKind::Numeric, FieldSpec::new().max_length(2))
        .field("psp_MerchantId", FieldKind::MerchantId, merchant_id())
        .field("psp_PurchaseDescription", FieldKind::Alfa, FieldSpec::new().max_length(15))
        .field(
            "psp_FrmLanguage",
            FieldKind::Order,
            FieldSpec::new().min_length(2).max_length(5),
        )
        .field("psp_Version", FieldKind::Order, version())
        .field(
            "psp_Country",
            FieldKind::Country,
            FieldSpec::new()
                .length(3)
                .allowed_from(settings.allowed_countries.as_deref())
                .default_value(DEFAULT_COUNTRY),
        )
        .field(
            "psp_TxSource",
            FieldKind::Alfa,
            FieldSpec::new()
                .max_length(13)
                .allowed_from(settings.allowed_tx_sources.as_deref())
                .default_value(DEFAULT_TX_SOURCE),
        )
        .build()
}

/// Reply fields of the three-step online payment (`PayOnLine_3p`).
///
/// # Errors
///
/// Never fails in practice: no field declares a default.
pub fn pay_online_3p_response() -> Result<Arc<RecordSchema>, InvalidFieldValue> {
    RecordSchema::builder("PayOnLine_3p response")
        .field("psp_ResponseCod", FieldKind::Numeric, reply(FieldSpec::new().max_length(3)))
        .field("psp_ResponseMsg", FieldKind::Text, reply(FieldSpec::new().max_length(255)))
        .field("psp_TransactionId", FieldKind::Numeric, reply(FieldSpec::new().max_length(19)))
        .field("psp_Session3p", FieldKind::Alfanumeric, reply(FieldSpec::new().max_length(64)))
        .field("psp_FrontPSP_URL", FieldKind::url(), reply(FieldSpec::new()))
        .field("psp_MerchantId", FieldKind::MerchantId, reply(merchant_id()))
        .field("psp_MerchTxRef", FieldKind::Order, reply(order(64)))
        .field("psp_MerchOrderId", FieldKind::Order, reply(order(64)))
        .field("psp_CustomerMail", FieldKind::email(), reply(FieldSpec::new()))
        .field("psp_MerchantMail", FieldKind::email(), reply(FieldSpec::new()))
        .field("psp_PosDateTime", FieldKind::Text, reply(FieldSpec::new().max_length(255)))
        .field("psp_ResponseExtended", FieldKind::Text, reply(FieldSpec::new().max_length(255)))
        .build()
}

/// Request fields of the transaction status query (`SimpleQueryTx`).
///
/// # Errors
///
/// Never fails in practice: the only default is the protocol version.
pub fn simple_query_tx_request() -> Result<Arc<RecordSchema>, InvalidFieldValue> {
    RecordSchema::builder("SimpleQueryTx request")
        .field("psp_Version", FieldKind::Order, version())
        .field("psp_MerchantId", FieldKind::MerchantId, merchant_id())
        .field("psp_QueryCriteria", FieldKind::Alfanumeric, FieldSpec::new().length(1))
        .field("psp_QueryCriteriaId", FieldKind::Alfanumeric, FieldSpec::new().max_length(64))
        .field("psp_PosDateTime", FieldKind::datetime(), FieldSpec::new())
        .field("psp_SecureHash", FieldKind::Md5, FieldSpec::new())
        .build()
}

/// Reply fields of the transaction status query (`SimpleQueryTx`).
///
/// # Errors
///
/// Never fails in practice: no field declares a default.
pub fn simple_query_tx_response() -> Result<Arc<RecordSchema>, InvalidFieldValue> {
    RecordSchema::builder("SimpleQueryTx response")
        .field("psp_ResponseCod", FieldKind::Numeric, reply(FieldSpec::new().max_length(3)))
        .field("psp_ResponseMsg", FieldKind::Text, reply(FieldSpec::new().max_length(255)))
        .field("psp_ResponseExtended", FieldKind::Text, reply(FieldSpec::new().max_length(255)))
        .field("psp_MerchantId", FieldKind::MerchantId, reply(merchant_id()))
        .field("psp_QueryCriteria", FieldKind::Alfanumeric, reply(FieldSpec::new().length(1)))
        .field("psp_QueryCriteriaId", FieldKind::Alfanumeric, reply(FieldSpec::new().max_length(64)))
        .field("psp_PosDateTime", FieldKind::Text, reply(FieldSpec::new().max_length(255)))
        .build()
}

/// The schemas of every supported operation, built once and shared.
#[derive(Debug, Clone)]
pub struct Catalog {
    pay_online_3p_request: Arc<RecordSchema>,
    pay_online_3p_response: Arc<RecordSchema>,
    simple_query_tx_request: Arc<RecordSchema>,
    simple_query_tx_response: Arc<RecordSchema>,
}

impl Catalog {
    /// Builds every schema with the allow-lists in `settings`.
    ///
    /// # Errors
    ///
    /// Fails if `settings` excludes a built-in default from its allow-list.
    pub fn new(settings: &Settings) -> Result<Self, InvalidFieldValue> {
        Ok(Self {
            pay_online_3p_request: pay_online_3p_request(settings)?,
            pay_online_3p_response: pay_online_3p_response()?,
            simple_query_tx_request: simple_query_tx_request()?,
            simple_query_tx_response: simple_query_tx_response()?,
        })
    }

    /// `PayOnLine_3p` request schema.
    #[must_use]
    pub const fn pay_online_3p_request(&self) -> &Arc<RecordSchema> {
        &self.pay_online_3p_request
    }

    /// `PayOnLine_3p` response schema.
    #[must_use]
    pub const fn pay_online_3p_response(&self) -> &Arc<RecordSchema> {
        &self.pay_online_3p_response
    }

    /// `SimpleQueryTx` request schema.
    #[must_use]
    pub const fn simple_query_tx_request(&self) -> &Arc<RecordSchema> {
        &self.simple_query_tx_request
    }

    /// `SimpleQueryTx` response schema.
    #[must_use]
    pub const fn simple_query_tx_response(&self) -> &Arc<RecordSchema> {
        &self.simple_query_tx_response
    }
}

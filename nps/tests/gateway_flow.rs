//! End-to-end dispatch through an in-memory transport.

use std::sync::{Arc, LazyLock, Mutex};

use nps::signer::sign;
use nps::{
    Catalog, FieldError, FieldMap, Gateway, GatewayError, GatewayIdentity, QueryCriteria,
    RemoteCall, Settings, Transaction, Transport,
};
use nps_proto::{RemoteOperation, SECURE_HASH_FIELD};

#[derive(Debug, Clone, PartialEq, Eq)]
struct Recorded {
    url: String,
    operation: RemoteOperation,
    fields: FieldMap,
}

/// Replies with a canned field map and records every call.
#[derive(Default)]
struct Recording {
    reply: FieldMap,
    calls: Mutex<Vec<Recorded>>,
}

impl Recording {
    fn replying(pairs: &[(&str, &str)]) -> Self {
        Self {
            reply: pairs
                .iter()
                .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
                .collect(),
            calls: Mutex::default(),
        }
    }

    fn calls(&self) -> Vec<Recorded> {
        self.calls.lock().unwrap().clone()
    }
}

impl Transport for Recording {
    type Error = std::convert::Infallible;

    fn call(&self, call: RemoteCall<'_>) -> Result<FieldMap, Self::Error> {
        self.calls.lock().unwrap().push(Recorded {
            url: call.url.to_owned(),
            operation: call.operation,
            fields: call.fields,
        });
        Ok(self.reply.clone())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("connection reset by peer")]
struct ConnectionReset;

struct Failing;

impl Transport for Failing {
    type Error = ConnectionReset;

    fn call(&self, _call: RemoteCall<'_>) -> Result<FieldMap, Self::Error> {
        Err(ConnectionReset)
    }
}

static CATALOG: LazyLock<Catalog> =
    LazyLock::new(|| Catalog::new(&Settings::default()).unwrap());

fn identity() -> GatewayIdentity {
    GatewayIdentity::new("https://psp.example/ws.php", "psp_test", "IeShlZMDk8mp8VA6")
}

fn payment() -> Transaction {
    let mut tx = Transaction::pay_online_3p(identity(), &CATALOG).unwrap();
    tx.request.set("psp_Amount", "105.05").unwrap();
    tx.request.set("psp_Currency", "032").unwrap();
    tx.request.set("psp_Product", "14").unwrap();
    tx.request.set("psp_NumPayments", "1").unwrap();
    tx.request.set("psp_MerchTxRef", "ORDER-0001").unwrap();
    tx.request.set("psp_MerchOrderId", "0001").unwrap();
    tx.request.set("psp_ReturnURL", "https://shop.example/return").unwrap();
    tx.request.set("psp_FrmLanguage", "es_AR").unwrap();
    tx.request.set("psp_PosDateTime", "2024-03-09 13:05:00").unwrap();
    tx.request.set("psp_CustomerMail", "").unwrap();
    tx
}

#[test]
fn test_payment_round_trip() {
    let gateway = Gateway::new(Recording::replying(&[
        ("psp_ResponseCod", "1"),
        ("psp_ResponseMsg", "Solicitud de Autorizacion Registrada"),
        ("psp_TransactionId", "1234567"),
        ("psp_Session3p", "a1b2c3"),
        ("psp_FrontPSP_URL", "https://psp.example/front.php?session=a1b2c3"),
        ("psp_MerchTxRef", "ORDER-0001"),
        ("psp_ResponseExtended", ""),
        ("psp_Transaction", "raw-transaction"),
    ]));
    let mut tx = payment();
    let tx = gateway.process(&mut tx).unwrap();

    assert!(tx.success());
    assert!(tx.errors().is_empty());
    assert_eq!(tx.response.get("psp_TransactionId").as_deref(), Some("1234567"));
    assert_eq!(tx.response.get("psp_ResponseExtended").as_deref(), Some(""));
    assert_eq!(tx.response.user_data(), Some("raw-transaction"));

    let calls = gateway.transport().calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].url, "https://psp.example/ws.php");
    assert_eq!(calls[0].operation, RemoteOperation::PAY_ONLINE_3P);
    assert_eq!(calls[0].fields["psp_Amount"], "10505");
    assert_eq!(calls[0].fields["psp_MerchantId"], "psp_test");
    assert_eq!(calls[0].fields["psp_Version"], "2.2");
    assert_eq!(calls[0].fields["psp_Country"], "ARG");
    assert_eq!(calls[0].fields["psp_TxSource"], "WEB");
}

#[test]
fn test_empty_and_unset_fields_are_not_sent() {
    let gateway = Gateway::new(Recording::default());
    let mut tx = payment();
    gateway.process(&mut tx).unwrap();

    let calls = gateway.transport().calls();
    let fields = &calls[0].fields;
    assert!(!fields.contains_key("psp_CustomerMail"));
    assert!(!fields.contains_key("psp_MerchantMail"));
    assert!(!fields.contains_key("psp_FrmBackButtonURL"));
    assert!(fields.values().all(|value| !value.is_empty()));
}

#[test]
fn test_preset_secure_hash_is_overwritten() {
    let gateway = Gateway::new(Recording::default());
    let mut tx = payment();
    let expected = sign(&tx.request, tx.secret());
    tx.request
        .set(SECURE_HASH_FIELD, "ffffffffffffffffffffffffffffffff")
        .unwrap();

    gateway.process(&mut tx).unwrap();

    let calls = gateway.transport().calls();
    let sent = &calls[0].fields;
    assert_eq!(sent[SECURE_HASH_FIELD], expected);
    assert_eq!(tx.request.get(SECURE_HASH_FIELD), Some(expected));
}

#[test]
fn test_business_error_is_reported_as_data() {
    let gateway = Gateway::new(Recording::replying(&[
        ("psp_ResponseCod", "3"),
        ("psp_ResponseMsg", "Error de validacion: psp_Amount"),
        ("psp_ResponseExtended", "Monto invalido"),
        ("psp_MerchantId", "psp_test"),
        ("psp_MerchTxRef", "ORDER-0001"),
        ("psp_MerchOrderId", "0001"),
    ]));
    let mut tx = payment();
    let tx = gateway.process(&mut tx).unwrap();

    assert!(!tx.success());
    let errors = tx.errors();
    assert_eq!(errors.len(), 1);
    let error = &errors[0];
    assert_eq!(error.psp_ResponseCod.as_deref(), Some("3"));
    assert_eq!(error.psp_ResponseMsg.as_deref(), Some("Error de validacion: psp_Amount"));
    assert_eq!(error.psp_ResponseExtended.as_deref(), Some("Monto invalido"));
    assert_eq!(error.psp_MerchantId.as_deref(), Some("psp_test"));
    assert_eq!(error.psp_MerchOrderId.as_deref(), Some("0001"));
    assert_eq!(error.psp_MerchTxRef.as_deref(), Some("ORDER-0001"));
    assert_eq!(error.psp_CustomerMail, None);
}

#[test]
fn test_transport_failure_propagates_unchanged() {
    let gateway = Gateway::new(Failing);
    let mut tx = payment();
    let err = gateway.process(&mut tx).unwrap_err();
    assert!(matches!(err, GatewayError::Transport(ConnectionReset)));
    assert!(tx.success());
    assert_eq!(tx.response.get("psp_ResponseMsg"), None);
}

#[test]
fn test_invalid_reply_value_is_a_field_error() {
    let gateway = Gateway::new(Recording::replying(&[("psp_TransactionId", "12ab")]));
    let mut tx = payment();
    let err = gateway.process(&mut tx).unwrap_err();
    match err {
        GatewayError::Field(FieldError::Invalid(invalid)) => {
            assert_eq!(invalid.field, "psp_TransactionId");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_simple_query_round_trip() {
    let gateway = Gateway::new(Recording::replying(&[
        ("psp_ResponseCod", "0"),
        ("psp_ResponseMsg", "Transaccion encontrada"),
        ("psp_QueryCriteria", "T"),
        ("psp_QueryCriteriaId", "1234567"),
        ("psp_PosDateTime", "2024-03-09 13:05:00"),
    ]));
    let mut tx =
        Transaction::simple_query_tx(identity(), &CATALOG, QueryCriteria::TransactionId, "1234567")
            .unwrap();
    tx.request.set("psp_PosDateTime", "2024-03-10 09:00:00").unwrap();
    let tx = gateway.process(&mut tx).unwrap();

    assert!(tx.success());
    assert_eq!(tx.response.get("psp_QueryCriteriaId").as_deref(), Some("1234567"));

    let calls = gateway.transport().calls();
    let call = &calls[0];
    assert_eq!(call.operation, RemoteOperation::SIMPLE_QUERY_TX);
    let names: Vec<&str> = call.fields.keys().map(String::as_str).collect();
    assert_eq!(
        names,
        [
            "psp_Version",
            "psp_MerchantId",
            "psp_QueryCriteria",
            "psp_QueryCriteriaId",
            "psp_PosDateTime",
            "psp_SecureHash",
        ]
    );
}

#[test]
fn test_shared_transport() {
    let transport = Arc::new(Recording::default());
    let first = Gateway::new(Arc::clone(&transport));
    let second = Gateway::new(&*transport);

    first.process(&mut payment()).unwrap();
    second.process(&mut payment()).unwrap();

    assert_eq!(transport.calls().len(), 2);
}

#[test]
fn test_transactions_reuse_catalog_schemas() {
    let gateway = Gateway::new(Recording::replying(&[("psp_ResponseMsg", "APROBADA")]));
    let mut first = payment();
    let mut second = payment();
    assert!(std::ptr::eq(first.request.schema(), second.request.schema()));

    gateway.process(&mut first).unwrap();
    gateway.process(&mut second).unwrap();
    assert!(std::ptr::eq(first.response.schema(), second.response.schema()));
    assert_eq!(first.response.get("psp_ResponseMsg"), second.response.get("psp_ResponseMsg"));
}

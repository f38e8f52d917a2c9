//! Dispatching transactions to the gateway.
//!
//! [`Gateway::process`] runs one transaction end to end: it signs the
//! request, hands the non-empty request fields to the [`Transport`], and maps
//! the reply back onto the transaction's response record. It performs no
//! retries. Idempotence across retries is the caller's responsibility,
//! usually through `psp_MerchTxRef`.

use nps_proto::{SECURE_HASH_FIELD, TRANSACTION_FIELD, is_wire_field};

use crate::error::GatewayError;
use crate::signer;
use crate::transaction::Transaction;
use crate::transport::{RemoteCall, Transport};

/// Signs, sends, and maps back transactions through a [`Transport`].
///
/// # Example
///
/// ```rust
/// use std::convert::Infallible;
///
/// use nps::catalog::Catalog;
/// use nps::config::{GatewayIdentity, Settings};
/// use nps::gateway::Gateway;
/// use nps::transaction::Transaction;
/// use nps::transport::{RemoteCall, Transport};
/// use nps_proto::FieldMap;
///
/// struct Approve;
///
/// impl Transport for Approve {
///     type Error = Infallible;
///
///     fn call(&self, _call: RemoteCall<'_>) -> Result<FieldMap, Infallible> {
///         let mut reply = FieldMap::new();
///         reply.insert("psp_ResponseCod".into(), "0".into());
///         reply.insert("psp_ResponseMsg".into(), "APROBADA".into());
///         Ok(reply)
///     }
/// }
///
/// let catalog = Catalog::new(&Settings::default()).unwrap();
/// let identity = GatewayIdentity::new("https://psp.example/ws.php", "psp_test", "secret");
/// let mut tx = Transaction::pay_online_3p(identity, &catalog).unwrap();
/// tx.request.set("psp_Amount", "105.05").unwrap();
///
/// let gateway = Gateway::new(Approve);
/// assert!(gateway.process(&mut tx).unwrap().success());
/// ```
#[derive(Debug, Clone)]
pub struct Gateway<T> {
    transport: T,
}

impl<T: Transport> Gateway<T> {
    /// Creates a gateway that sends through `transport`.
    #[must_use]
    pub const fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Returns the underlying transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Consumes the gateway, returning the transport.
    #[must_use]
    pub fn into_inner(self) -> T {
        self.transport
    }

    /// Processes `tx` and returns it, mutated in place.
    ///
    /// 1. `psp_SecureHash` is computed and assigned, replacing any value the
    ///    caller set.
    /// 2. Every non-empty `psp_` request field is sent.
    /// 3. Reply `psp_` fields the response record declares are assigned to
    ///    it. `psp_Transaction` is kept as the response's user data. Anything
    ///    else is ignored.
    ///
    /// The response record is replaced only if every reply field is accepted.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::Transport`] with the transport's own error, unchanged.
    /// - [`GatewayError::Field`] if a reply value breaks the response's rules.
    pub fn process<'t>(
        &self,
        tx: &'t mut Transaction,
    ) -> Result<&'t mut Transaction, GatewayError<T::Error>> {
        #[cfg(feature = "telemetry")]
        let _span = tracing::info_span!(
            "nps.gateway.process",
            method = tx.operation().method,
            url = tx.url()
        )
        .entered();

        let result = self.dispatch(tx);

        #[cfg(feature = "telemetry")]
        if let Err(err) = &result {
            tracing::error!(error = %err, "gateway dispatch failed");
        }

        result.map(|()| tx)
    }

    fn dispatch(&self, tx: &mut Transaction) -> Result<(), GatewayError<T::Error>> {
        let hash = signer::sign(&tx.request, tx.secret());
        tx.request.set(SECURE_HASH_FIELD, hash)?;

        let call = RemoteCall {
            url: tx.url(),
            operation: tx.operation(),
            fields: tx.request.to_field_map(),
        };
        let reply = self.transport.call(call).map_err(GatewayError::Transport)?;

        let mut response = tx.response.clone();
        for (name, value) in reply {
            if name == TRANSACTION_FIELD {
                response.set_user_data(value);
            } else if is_wire_field(&name) && response.schema().contains(&name) {
                response.set(&name, value)?;
            } else {
                #[cfg(feature = "telemetry")]
                tracing::debug!(field = %name, "ignoring undeclared reply field");
            }
        }
        tx.response = response;

        Ok(())
    }
}

//! Request signing.
//!
//! The gateway authenticates every request by recomputing an MD5 digest over
//! the request's field values and the merchant's shared secret. The input is
//! built as follows:
//!
//! 1. Every `psp_` field except `psp_SecureHash`, sorted by name.
//! 2. Each field's value, or the empty string when unset.
//! 3. The secret, appended last.
//! 4. Empty pieces dropped, the rest concatenated with no separator.
//!
//! The digest is returned as 32 lowercase hexadecimal characters. Any
//! deviation from this order produces a hash the gateway rejects.

use md5::{Digest, Md5};
use nps_proto::SECURE_HASH_FIELD;

use crate::record::Record;

/// Computes the secure hash of `request` under `secret`.
///
/// The current value of `psp_SecureHash`, if any, never contributes.
///
/// # Example
///
/// ```rust
/// use nps::catalog::Catalog;
/// use nps::config::Settings;
/// use nps::record::Record;
/// use nps::signer::sign;
///
/// let catalog = Catalog::new(&Settings::default()).unwrap();
/// let mut request = Record::new(catalog.simple_query_tx_request().clone());
/// request.set("psp_MerchantId", "psp_test").unwrap();
/// let hash = sign(&request, "secret");
/// assert_eq!(hash.len(), 32);
/// ```
#[must_use]
pub fn sign(request: &Record, secret: &str) -> String {
    let mut fields: Vec<_> = request
        .items()
        .filter(|(name, _)| *name != SECURE_HASH_FIELD)
        .collect();
    fields.sort_unstable_by_key(|(name, _)| *name);

    #[cfg(feature = "telemetry")]
    tracing::debug!(
        record = request.schema().name(),
        fields = fields.len(),
        "signing request"
    );

    let mut hasher = Md5::new();
    for value in fields.iter().filter_map(|(_, value)| value.as_deref()) {
        hasher.update(value.as_bytes());
    }
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}

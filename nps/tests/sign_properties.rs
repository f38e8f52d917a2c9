use md5::{Digest, Md5};
use std::sync::LazyLock;

use nps::catalog::Catalog;
use nps::field::{FieldKind, FieldSpec};
use nps::record::{Record, RecordSchema};
use nps::signer::sign;
use nps::Settings;
use proptest::prelude::*;

static CATALOG: LazyLock<Catalog> =
    LazyLock::new(|| Catalog::new(&Settings::default()).unwrap());

fn payment_request() -> Record {
    Record::new(CATALOG.pay_online_3p_request().clone())
}

fn assign(record: &mut Record, fields: &[(&str, &str)]) {
    for (name, value) in fields {
        record.set(name, *value).unwrap();
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn test_hash_ignores_assignment_order(
        amount in "[0-9]{1,10}",
        product in "[0-9]{1,3}",
        currency in "[A-Z]{3}",
        tx_ref in "[A-Za-z0-9_.-]{1,64}",
        secret in "[ -~]{0,32}",
    ) {
        let fields = [
            ("psp_Amount", amount.as_str()),
            ("psp_Product", product.as_str()),
            ("psp_Currency", currency.as_str()),
            ("psp_MerchTxRef", tx_ref.as_str()),
        ];
        let mut forward = payment_request();
        assign(&mut forward, &fields);

        let mut reversed = payment_request();
        let mut backwards = fields;
        backwards.reverse();
        assign(&mut reversed, &backwards);

        prop_assert_eq!(sign(&forward, &secret), sign(&reversed, &secret));
    }

    #[test]
    fn test_hash_ignores_preset_secure_hash(
        amount in "[0-9]{1,10}",
        preset in "[0-9a-f]{32}",
        secret in "[a-zA-Z0-9]{1,32}",
    ) {
        let mut request = payment_request();
        request.set("psp_Amount", amount.as_str()).unwrap();
        let before = sign(&request, &secret);
        request.set("psp_SecureHash", preset.as_str()).unwrap();
        prop_assert_eq!(sign(&request, &secret), before);
    }

    #[test]
    fn test_hash_is_md5_of_sorted_values_and_secret(
        a in "[a-z0-9]{0,8}",
        b in "[a-z0-9]{0,8}",
        c in "[a-z0-9]{0,8}",
        secret in "[a-z0-9]{0,8}",
    ) {
        let schema = RecordSchema::builder("sorted")
            .field("psp_C", FieldKind::Text, FieldSpec::new().nullable())
            .field("psp_A", FieldKind::Text, FieldSpec::new().nullable())
            .field("psp_B", FieldKind::Text, FieldSpec::new().nullable())
            .build()
            .unwrap();
        let mut request = Record::new(schema);
        assign(&mut request, &[("psp_C", c.as_str()), ("psp_A", a.as_str()), ("psp_B", b.as_str())]);

        let expected = hex::encode(Md5::digest(format!("{a}{b}{c}{secret}").as_bytes()));
        prop_assert_eq!(sign(&request, &secret), expected);
    }

    #[test]
    fn test_amount_separators_are_dropped(
        groups in prop::collection::vec("[0-9]{1,3}", 1..4),
        separator in prop::sample::select(vec![",", "."]),
    ) {
        let mut request = payment_request();
        request.set("psp_Amount", groups.join(separator)).unwrap();
        prop_assert_eq!(request.get("psp_Amount"), Some(groups.concat()));
    }
}

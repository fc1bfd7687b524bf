//! Property test: random operation sequences keep stock equal to history.

mod common;

use clinic_ims_db::TransactionRepository;
use common::{
    batches, create_nurse, create_product, incoming, ledger_balance, outgoing, setup, stock_total,
};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Receive { quantity: i64, day: u32 },
    Issue { quantity: i64 },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (1i64..50, 1u32..28).prop_map(|(quantity, day)| Op::Receive { quantity, day }),
        (1i64..60).prop_map(|quantity| Op::Issue { quantity }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_stock_equals_received_minus_issued(ops in prop::collection::vec(op_strategy(), 1..20)) {
        let runtime = tokio::runtime::Runtime::new().unwrap();

        let (total, balance, all_positive, distinct_dates) = runtime.block_on(async {
            let db = setup().await;
            let product_id = create_product(&db, "Syringe").await;
            create_nurse(&db).await;
            let repo = TransactionRepository::new(db.clone());

            for op in &ops {
                // Insufficient stock is an expected outcome here.
                let _ = match op {
                    Op::Receive { quantity, day } => repo
                        .record_incoming(incoming("Syringe", *quantity, &format!("2025-02-{day:02}")))
                        .await
                        .map(|_| ()),
                    Op::Issue { quantity } => repo
                        .record_outgoing(outgoing("Syringe", *quantity))
                        .await
                        .map(|_| ()),
                };
            }

            let rows = batches(&db, product_id).await;
            let dates: Vec<&String> = rows.iter().map(|(_, d)| d).collect();
            let mut unique = dates.clone();
            unique.dedup();
            (
                stock_total(&db, product_id).await,
                ledger_balance(&db, product_id).await,
                rows.iter().all(|(q, _)| *q > 0),
                unique.len() == dates.len(),
            )
        });

        prop_assert_eq!(total, balance);
        prop_assert!(all_positive);
        prop_assert!(distinct_dates, "one batch per expiration date");
    }
}

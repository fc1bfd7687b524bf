//! Property-based tests for StockLedger.
//!
//! - Conservation: an issue removes exactly the requested quantity
//! - No batch is ever left empty or negative
//! - First-expiry-first-out ordering of consumed batches
//! - Failed issues plan no change

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;

use super::error::StockError;
use super::service::StockLedger;
use super::types::{BatchChange, ReceiptPlan, StockBatch};

/// Strategy to generate a set of batches with distinct IDs and random expiries.
fn batches_strategy() -> impl Strategy<Value = Vec<StockBatch>> {
    prop::collection::vec((1i32..500, 0i64..730), 0..8).prop_map(|raw| {
        let base = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        raw.into_iter()
            .enumerate()
            .map(|(i, (quantity, offset))| StockBatch {
                id: i32::try_from(i).unwrap() + 1,
                quantity,
                expiration_date: base + Duration::days(offset),
            })
            .collect()
    })
}

fn find(batches: &[StockBatch], id: i32) -> StockBatch {
    *batches.iter().find(|b| b.id == id).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Any issue within the available total consumes exactly the requested quantity.
    #[test]
    fn prop_issue_conserves_quantity(
        batches in batches_strategy(),
        fraction in 1u32..=100,
    ) {
        let available = StockLedger::available_quantity(&batches);
        prop_assume!(available > 0);

        let quantity = i32::try_from((available * i64::from(fraction) / 100).max(1)).unwrap();
        let plan = StockLedger::plan_issue("Gauze", &batches, quantity).unwrap();

        prop_assert_eq!(plan.total_consumed(), i64::from(quantity));

        let mut after = batches.clone();
        StockLedger::apply_issue(&mut after, &plan);
        prop_assert_eq!(
            StockLedger::available_quantity(&after),
            available - i64::from(quantity)
        );
    }

    /// Remaining batches always hold a positive quantity.
    #[test]
    fn prop_no_empty_or_negative_batches(
        batches in batches_strategy(),
        quantity in 1i32..2_000,
    ) {
        if let Ok(plan) = StockLedger::plan_issue("Gauze", &batches, quantity) {
            for change in &plan.changes {
                let original = find(&batches, change.batch_id());
                match *change {
                    BatchChange::Deplete { consumed, .. } => {
                        prop_assert_eq!(consumed, original.quantity);
                    }
                    BatchChange::Decrement { consumed, remaining, .. } => {
                        prop_assert!(remaining > 0);
                        prop_assert_eq!(consumed + remaining, original.quantity);
                    }
                }
            }

            let mut after = batches.clone();
            StockLedger::apply_issue(&mut after, &plan);
            prop_assert!(after.iter().all(|b| b.quantity > 0));
        }
    }

    /// A batch is touched only after every batch expiring earlier is depleted.
    #[test]
    fn prop_issue_is_fefo(
        batches in batches_strategy(),
        quantity in 1i32..2_000,
    ) {
        if let Ok(plan) = StockLedger::plan_issue("Gauze", &batches, quantity) {
            let touched: Vec<StockBatch> = plan
                .changes
                .iter()
                .map(|c| find(&batches, c.batch_id()))
                .collect();

            for pair in touched.windows(2) {
                prop_assert!(
                    (pair[0].expiration_date, pair[0].id) < (pair[1].expiration_date, pair[1].id)
                );
            }

            // Only the last change may leave a remainder.
            for change in plan.changes.iter().rev().skip(1) {
                let is_deplete = matches!(change, BatchChange::Deplete { .. });
                prop_assert!(is_deplete);
            }

            if let Some(last) = touched.last() {
                let untouched_earlier = batches.iter().any(|b| {
                    !touched.iter().any(|t| t.id == b.id)
                        && (b.expiration_date, b.id) < (last.expiration_date, last.id)
                });
                prop_assert!(!untouched_earlier);
            }
        }
    }

    /// Requests above the available total fail without producing a plan.
    #[test]
    fn prop_insufficient_stock_rejected(
        batches in batches_strategy(),
        excess in 1i64..1_000,
    ) {
        let available = StockLedger::available_quantity(&batches);
        let quantity = i32::try_from(available + excess).unwrap();

        let result = StockLedger::plan_issue("Gauze", &batches, quantity);

        prop_assert_eq!(
            result,
            Err(StockError::InsufficientStock {
                product: "Gauze".to_string(),
                requested: quantity,
                available,
            })
        );
    }

    /// Receipts into an existing batch add exactly the received quantity.
    #[test]
    fn prop_receipt_merge_adds(
        current in 1i32..1_000_000,
        incoming in 1i32..1_000_000,
    ) {
        let date = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();
        let existing = StockBatch { id: 7, quantity: current, expiration_date: date };

        let plan = StockLedger::plan_receipt(Some(&existing), incoming, date).unwrap();

        prop_assert_eq!(
            plan,
            ReceiptPlan::Increment { batch_id: 7, new_quantity: current + incoming }
        );
    }
}

//! Stock ledger planning.
//!
//! This module decides how receipts and issues change the batch table. It
//! never performs I/O: callers load the current batches, ask the ledger for a
//! plan, and apply the plan inside a single store transaction.

use super::error::StockError;
use super::types::{BatchChange, IssuePlan, ReceiptPlan, StockBatch};
use chrono::NaiveDate;

/// Stock ledger for receipt merging and first-expiry-first-out issuing.
///
/// This service contains pure business logic with no database dependencies.
pub struct StockLedger;

impl StockLedger {
    /// Plans a receipt of `quantity` units expiring on `expiration_date`.
    ///
    /// `existing` is the batch of the same product with exactly the same
    /// expiration date, if any. Receipts with equal expiry always merge.
    ///
    /// # Errors
    ///
    /// Returns `StockError::QuantityOverflow` if the merged quantity does not fit.
    pub fn plan_receipt(
        existing: Option<&StockBatch>,
        quantity: i32,
        expiration_date: NaiveDate,
    ) -> Result<ReceiptPlan, StockError> {
        if quantity <= 0 {
            return Err(StockError::InvalidQuantity(i64::from(quantity)));
        }

        match existing {
            Some(batch) => {
                debug_assert_eq!(batch.expiration_date, expiration_date);
                let new_quantity =
                    batch
                        .quantity
                        .checked_add(quantity)
                        .ok_or(StockError::QuantityOverflow {
                            batch_id: batch.id,
                            current: batch.quantity,
                            incoming: quantity,
                        })?;
                Ok(ReceiptPlan::Increment {
                    batch_id: batch.id,
                    new_quantity,
                })
            }
            None => Ok(ReceiptPlan::Create {
                quantity,
                expiration_date,
            }),
        }
    }

    /// Plans an issue of `quantity` units of `product` from `batches`.
    ///
    /// Batches are consumed earliest expiry first (ties by batch ID). A batch
    /// consumed in full is deleted; the last batch touched may be left with a
    /// positive remainder. Sufficiency is checked before any change is planned,
    /// so a failed issue never yields a partial plan.
    ///
    /// # Errors
    ///
    /// Returns `StockError::InsufficientStock` if there are no batches or their
    /// total is below `quantity`.
    pub fn plan_issue(
        product: &str,
        batches: &[StockBatch],
        quantity: i32,
    ) -> Result<IssuePlan, StockError> {
        if quantity <= 0 {
            return Err(StockError::InvalidQuantity(i64::from(quantity)));
        }

        let available = Self::available_quantity(batches);
        if batches.is_empty() || available < i64::from(quantity) {
            return Err(StockError::InsufficientStock {
                product: product.to_string(),
                requested: quantity,
                available,
            });
        }

        let mut ordered: Vec<&StockBatch> = batches.iter().filter(|b| b.quantity > 0).collect();
        ordered.sort_by_key(|b| (b.expiration_date, b.id));

        let mut remaining = quantity;
        let mut changes = Vec::new();

        for batch in ordered {
            if remaining <= 0 {
                break;
            }

            if batch.quantity <= remaining {
                changes.push(BatchChange::Deplete {
                    batch_id: batch.id,
                    consumed: batch.quantity,
                });
                remaining -= batch.quantity;
            } else {
                changes.push(BatchChange::Decrement {
                    batch_id: batch.id,
                    consumed: remaining,
                    remaining: batch.quantity - remaining,
                });
                remaining = 0;
            }
        }

        // Covered by the sufficiency check above.
        debug_assert_eq!(remaining, 0);

        Ok(IssuePlan { quantity, changes })
    }

    /// Sums the quantity held across `batches`.
    #[must_use]
    pub fn available_quantity(batches: &[StockBatch]) -> i64 {
        batches.iter().map(|b| i64::from(b.quantity)).sum()
    }

    /// Applies a plan to an in-memory batch list.
    ///
    /// Used to reason about ledger state without a store; the persistence
    /// layer performs the same mutations row by row.
    pub fn apply_issue(batches: &mut Vec<StockBatch>, plan: &IssuePlan) {
        for change in &plan.changes {
            match *change {
                BatchChange::Deplete { batch_id, .. } => batches.retain(|b| b.id != batch_id),
                BatchChange::Decrement {
                    batch_id,
                    remaining,
                    ..
                } => {
                    if let Some(batch) = batches.iter_mut().find(|b| b.id == batch_id) {
                        batch.quantity = remaining;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn batch(id: i32, quantity: i32, expiration_date: NaiveDate) -> StockBatch {
        StockBatch {
            id,
            quantity,
            expiration_date,
        }
    }

    #[test]
    fn test_receipt_creates_batch_when_no_match() {
        let plan = StockLedger::plan_receipt(None, 5, date(2024, 1, 1)).unwrap();
        assert_eq!(
            plan,
            ReceiptPlan::Create {
                quantity: 5,
                expiration_date: date(2024, 1, 1)
            }
        );
    }

    #[test]
    fn test_receipt_merges_into_same_expiry() {
        let existing = batch(3, 5, date(2024, 1, 1));
        let plan = StockLedger::plan_receipt(Some(&existing), 3, date(2024, 1, 1)).unwrap();
        assert_eq!(
            plan,
            ReceiptPlan::Increment {
                batch_id: 3,
                new_quantity: 8
            }
        );
    }

    #[test]
    fn test_receipt_overflow() {
        let existing = batch(1, i32::MAX, date(2024, 1, 1));
        let result = StockLedger::plan_receipt(Some(&existing), 1, date(2024, 1, 1));
        assert!(matches!(result, Err(StockError::QuantityOverflow { .. })));
    }

    #[test]
    fn test_issue_depletes_earliest_expiry_first() {
        let batches = vec![
            batch(2, 5, date(2024, 2, 1)),
            batch(1, 5, date(2024, 1, 1)),
        ];

        let plan = StockLedger::plan_issue("Gauze", &batches, 7).unwrap();

        assert_eq!(
            plan.changes,
            vec![
                BatchChange::Deplete {
                    batch_id: 1,
                    consumed: 5
                },
                BatchChange::Decrement {
                    batch_id: 2,
                    consumed: 2,
                    remaining: 3
                },
            ]
        );
        assert_eq!(plan.total_consumed(), 7);
    }

    #[test]
    fn test_issue_exact_total_depletes_everything() {
        let batches = vec![
            batch(1, 5, date(2024, 1, 1)),
            batch(2, 5, date(2024, 2, 1)),
        ];

        let plan = StockLedger::plan_issue("Gauze", &batches, 10).unwrap();

        assert!(
            plan.changes
                .iter()
                .all(|c| matches!(c, BatchChange::Deplete { .. }))
        );
        assert_eq!(plan.changes.len(), 2);
    }

    #[test]
    fn test_issue_partial_single_batch() {
        let batches = vec![batch(1, 10, date(2024, 1, 1))];
        let plan = StockLedger::plan_issue("Gauze", &batches, 6).unwrap();
        assert_eq!(
            plan.changes,
            vec![BatchChange::Decrement {
                batch_id: 1,
                consumed: 6,
                remaining: 4
            }]
        );
    }

    #[test]
    fn test_issue_stops_once_satisfied() {
        let batches = vec![
            batch(1, 5, date(2024, 1, 1)),
            batch(2, 5, date(2024, 2, 1)),
            batch(3, 5, date(2024, 3, 1)),
        ];
        let plan = StockLedger::plan_issue("Gauze", &batches, 5).unwrap();
        assert_eq!(plan.changes.len(), 1);
        assert_eq!(plan.changes[0].batch_id(), 1);
    }

    #[test]
    fn test_issue_ties_broken_by_batch_id() {
        let batches = vec![
            batch(9, 4, date(2024, 1, 1)),
            batch(4, 4, date(2024, 1, 1)),
        ];
        let plan = StockLedger::plan_issue("Gauze", &batches, 4).unwrap();
        assert_eq!(plan.changes[0].batch_id(), 4);
    }

    #[test]
    fn test_issue_insufficient_stock_yields_no_plan() {
        let batches = vec![
            batch(1, 5, date(2024, 1, 1)),
            batch(2, 5, date(2024, 2, 1)),
        ];

        let result = StockLedger::plan_issue("Gauze", &batches, 100);

        assert_eq!(
            result,
            Err(StockError::InsufficientStock {
                product: "Gauze".to_string(),
                requested: 100,
                available: 10,
            })
        );
    }

    #[test]
    fn test_issue_without_batches() {
        let result = StockLedger::plan_issue("Gauze", &[], 1);
        assert!(matches!(
            result,
            Err(StockError::InsufficientStock { available: 0, .. })
        ));
    }

    #[test]
    fn test_issue_rejects_non_positive_quantity() {
        let batches = vec![batch(1, 5, date(2024, 1, 1))];
        assert_eq!(
            StockLedger::plan_issue("Gauze", &batches, 0),
            Err(StockError::InvalidQuantity(0))
        );
    }

    #[test]
    fn test_apply_issue() {
        let mut batches = vec![
            batch(1, 5, date(2024, 1, 1)),
            batch(2, 5, date(2024, 2, 1)),
        ];
        let plan = StockLedger::plan_issue("Gauze", &batches, 7).unwrap();

        StockLedger::apply_issue(&mut batches, &plan);

        assert_eq!(batches, vec![batch(2, 3, date(2024, 2, 1))]);
        assert_eq!(StockLedger::available_quantity(&batches), 3);
    }
}

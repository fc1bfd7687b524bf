//! Integration tests for the stock ledger against SQLite.

mod common;

use clinic_ims_core::stock::StockError;
use clinic_ims_db::TransactionRepository;
use clinic_ims_db::repositories::TransactionError;
use common::{
    batches, create_nurse, create_product, incoming, ledger_balance, outgoing, receive, setup,
    stock_total,
};

#[tokio::test]
async fn test_incoming_creates_batch() {
    let db = setup().await;
    let product_id = create_product(&db, "Gauze").await;
    let repo = TransactionRepository::new(db.clone());

    let record = repo
        .record_incoming(incoming("Gauze", 5, "2024-01-01"))
        .await
        .expect("Failed to record incoming");

    assert_eq!(record.product_name, "Gauze");
    assert_eq!(record.quantity, 5);
    assert_eq!(record.expiration_date.to_string(), "2024-01-01");
    assert_eq!(batches(&db, product_id).await, vec![(5, "2024-01-01".to_string())]);
}

#[tokio::test]
async fn test_incoming_merges_same_expiry() {
    let db = setup().await;
    let product_id = create_product(&db, "Gauze").await;

    receive(&db, "Gauze", 5, "2024-01-01").await;
    receive(&db, "Gauze", 3, "2024-01-01T08:00:00Z").await;

    assert_eq!(batches(&db, product_id).await, vec![(8, "2024-01-01".to_string())]);

    let history = TransactionRepository::new(db.clone())
        .list_incoming()
        .await
        .expect("Failed to list incoming");
    assert_eq!(history.len(), 2);
}

#[tokio::test]
async fn test_incoming_different_expiry_opens_new_batch() {
    let db = setup().await;
    let product_id = create_product(&db, "Gauze").await;

    receive(&db, "Gauze", 5, "2024-02-01").await;
    receive(&db, "Gauze", 5, "2024-01-01").await;

    assert_eq!(
        batches(&db, product_id).await,
        vec![(5, "2024-01-01".to_string()), (5, "2024-02-01".to_string())]
    );
}

#[tokio::test]
async fn test_incoming_unknown_product() {
    let db = setup().await;
    let repo = TransactionRepository::new(db.clone());

    let result = repo.record_incoming(incoming("Ghost", 5, "2024-01-01")).await;

    assert!(matches!(
        result,
        Err(TransactionError::Stock(StockError::ProductNotFound(_)))
    ));
}

#[tokio::test]
async fn test_incoming_validation_errors() {
    let db = setup().await;
    let product_id = create_product(&db, "Gauze").await;
    let repo = TransactionRepository::new(db.clone());

    let zero = repo.record_incoming(incoming("Gauze", 0, "2024-01-01")).await;
    assert!(matches!(
        zero,
        Err(TransactionError::Stock(StockError::InvalidQuantity(0)))
    ));

    let bad_date = repo.record_incoming(incoming("Gauze", 5, "soon")).await;
    assert!(matches!(
        bad_date,
        Err(TransactionError::Stock(StockError::InvalidExpirationDate(_)))
    ));

    assert!(batches(&db, product_id).await.is_empty());
}

#[tokio::test]
async fn test_outgoing_fefo_depletion() {
    let db = setup().await;
    let product_id = create_product(&db, "Gauze").await;
    create_nurse(&db).await;
    receive(&db, "Gauze", 5, "2024-02-01").await;
    receive(&db, "Gauze", 5, "2024-01-01").await;

    let record = TransactionRepository::new(db.clone())
        .record_outgoing(outgoing("Gauze", 7))
        .await
        .expect("Failed to record outgoing");

    assert_eq!(record.quantity, 7);
    assert_eq!(record.employee_name, "Nurse Joy");
    assert_eq!(batches(&db, product_id).await, vec![(3, "2024-02-01".to_string())]);
}

#[tokio::test]
async fn test_outgoing_exact_total_removes_all_batches() {
    let db = setup().await;
    let product_id = create_product(&db, "Gauze").await;
    create_nurse(&db).await;
    receive(&db, "Gauze", 5, "2024-01-01").await;
    receive(&db, "Gauze", 5, "2024-02-01").await;

    TransactionRepository::new(db.clone())
        .record_outgoing(outgoing("Gauze", 10))
        .await
        .expect("Failed to record outgoing");

    assert!(batches(&db, product_id).await.is_empty());
}

#[tokio::test]
async fn test_outgoing_insufficient_stock_changes_nothing() {
    let db = setup().await;
    let product_id = create_product(&db, "Gauze").await;
    create_nurse(&db).await;
    receive(&db, "Gauze", 5, "2024-01-01").await;
    receive(&db, "Gauze", 5, "2024-02-01").await;
    let repo = TransactionRepository::new(db.clone());

    let result = repo.record_outgoing(outgoing("Gauze", 100)).await;

    assert!(matches!(
        result,
        Err(TransactionError::Stock(StockError::InsufficientStock {
            requested: 100,
            available: 10,
            ..
        }))
    ));
    assert_eq!(
        batches(&db, product_id).await,
        vec![(5, "2024-01-01".to_string()), (5, "2024-02-01".to_string())]
    );
    assert!(repo.list_outgoing().await.expect("Failed to list").is_empty());
}

#[tokio::test]
async fn test_outgoing_without_batches() {
    let db = setup().await;
    create_product(&db, "Gauze").await;
    create_nurse(&db).await;

    let result = TransactionRepository::new(db.clone())
        .record_outgoing(outgoing("Gauze", 1))
        .await;

    assert!(matches!(
        result,
        Err(TransactionError::Stock(StockError::InsufficientStock { .. }))
    ));
}

#[tokio::test]
async fn test_outgoing_unknown_product_and_employee() {
    let db = setup().await;
    create_product(&db, "Gauze").await;
    receive(&db, "Gauze", 5, "2024-01-01").await;
    let repo = TransactionRepository::new(db.clone());

    let no_product = repo.record_outgoing(outgoing("Ghost", 1)).await;
    assert!(matches!(
        no_product,
        Err(TransactionError::Stock(StockError::ProductNotFound(_)))
    ));

    let no_employee = repo.record_outgoing(outgoing("Gauze", 1)).await;
    assert!(matches!(
        no_employee,
        Err(TransactionError::Stock(StockError::EmployeeNotFound { .. }))
    ));
}

#[tokio::test]
async fn test_available_quantity() {
    let db = setup().await;
    create_product(&db, "Gauze").await;
    let repo = TransactionRepository::new(db.clone());

    assert_eq!(repo.available_quantity("Gauze").await.expect("query"), 0);

    receive(&db, "Gauze", 4, "2024-01-01").await;
    receive(&db, "Gauze", 6, "2024-03-01").await;
    assert_eq!(repo.available_quantity("Gauze").await.expect("query"), 10);

    assert!(matches!(
        repo.available_quantity("Ghost").await,
        Err(TransactionError::Stock(StockError::ProductNotFound(_)))
    ));
}

#[tokio::test]
async fn test_stock_matches_history_after_mixed_operations() {
    let db = setup().await;
    let product_id = create_product(&db, "Gauze").await;
    create_nurse(&db).await;
    let repo = TransactionRepository::new(db.clone());

    receive(&db, "Gauze", 12, "2024-05-01").await;
    receive(&db, "Gauze", 4, "2024-03-01").await;
    repo.record_outgoing(outgoing("Gauze", 6)).await.expect("issue");
    receive(&db, "Gauze", 9, "2024-03-01").await;
    let _ = repo.record_outgoing(outgoing("Gauze", 500)).await;
    repo.record_outgoing(outgoing("Gauze", 9)).await.expect("issue");

    assert_eq!(stock_total(&db, product_id).await, 10);
    assert_eq!(ledger_balance(&db, product_id).await, 10);
    assert!(batches(&db, product_id).await.iter().all(|(q, _)| *q > 0));
}

#[tokio::test]
async fn test_get_transactions_by_id() {
    let db = setup().await;
    create_product(&db, "Gauze").await;
    create_nurse(&db).await;
    let repo = TransactionRepository::new(db.clone());

    let received = repo
        .record_incoming(incoming("Gauze", 5, "2024-01-01"))
        .await
        .expect("receive");
    let issued = repo
        .record_outgoing(outgoing("Gauze", 2))
        .await
        .expect("issue");

    let fetched = repo.get_incoming(received.id).await.expect("get");
    assert_eq!(fetched.id, received.id);
    assert_eq!(fetched.product_name, "Gauze");
    assert_eq!(fetched.quantity, 5);

    let fetched = repo.get_outgoing(issued.id).await.expect("get");
    assert_eq!(fetched.employee_phone, "555-0100");
    assert_eq!(fetched.quantity, 2);

    assert!(matches!(
        repo.get_incoming(999).await,
        Err(TransactionError::NotFound(999))
    ));
}

#[tokio::test]
async fn test_store_rejects_empty_batch_rows() {
    use chrono::{NaiveDate, Utc};
    use clinic_ims_db::entities::stocks;
    use sea_orm::{ActiveModelTrait, Set};

    let db = setup().await;
    let product_id = create_product(&db, "Gauze").await;

    for quantity in [0, -1] {
        let row = stocks::ActiveModel {
            product_id: Set(product_id),
            quantity: Set(quantity),
            expiration_date: Set(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()),
            registration_date: Set(Utc::now()),
            ..Default::default()
        };
        assert!(row.insert(&db).await.is_err(), "quantity {quantity} was stored");
    }

    assert!(batches(&db, product_id).await.is_empty());
}

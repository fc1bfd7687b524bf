//! Integration tests for product and employee repositories.

mod common;

use clinic_ims_db::repositories::{
    CreateEmployeeInput, EmployeeError, ProductError, UpdateEmployeeInput,
};
use clinic_ims_db::{EmployeeRepository, ProductRepository, TransactionRepository};
use common::{create_nurse, create_product, outgoing, receive, setup};

#[tokio::test]
async fn test_product_create_and_find() {
    let db = setup().await;
    let repo = ProductRepository::new(db.clone());

    let product = repo.create("  Bandage ").await.expect("create");
    assert_eq!(product.product_name, "Bandage");

    let found = repo
        .find_by_id(product.id)
        .await
        .expect("find")
        .expect("product should exist");
    assert_eq!(found.product_name, "Bandage");
    assert_eq!(repo.list().await.expect("list").len(), 1);
}

#[tokio::test]
async fn test_product_duplicate_name_rejected() {
    let db = setup().await;
    let repo = ProductRepository::new(db.clone());
    repo.create("Bandage").await.expect("create");

    assert!(matches!(
        repo.create("Bandage").await,
        Err(ProductError::AlreadyExists(_))
    ));
    assert!(matches!(
        repo.create("   ").await,
        Err(ProductError::Validation(_))
    ));
}

#[tokio::test]
async fn test_product_rename_keeps_stock() {
    let db = setup().await;
    let id = create_product(&db, "Bandage").await;
    create_product(&db, "Gauze").await;
    receive(&db, "Bandage", 5, "2024-01-01").await;
    let repo = ProductRepository::new(db.clone());

    assert!(matches!(
        repo.update(id, "Gauze").await,
        Err(ProductError::AlreadyExists(_))
    ));

    let renamed = repo.update(id, "Elastic Bandage").await.expect("rename");
    assert_eq!(renamed.product_name, "Elastic Bandage");

    let summary = repo.stock_summary(id).await.expect("summary");
    assert_eq!(summary.product_name, "Elastic Bandage");
    assert_eq!(summary.available_quantity, 5);

    assert!(matches!(
        repo.update(999, "Anything").await,
        Err(ProductError::NotFound(999))
    ));
}

#[tokio::test]
async fn test_product_delete_blocked_by_history() {
    let db = setup().await;
    let used = create_product(&db, "Bandage").await;
    let unused = create_product(&db, "Gauze").await;
    create_nurse(&db).await;
    receive(&db, "Bandage", 5, "2024-01-01").await;
    TransactionRepository::new(db.clone())
        .record_outgoing(outgoing("Bandage", 5))
        .await
        .expect("issue");
    let repo = ProductRepository::new(db.clone());

    // No stock left, but history remains.
    assert!(matches!(repo.delete(used).await, Err(ProductError::InUse(_))));

    repo.delete(unused).await.expect("delete");
    assert!(repo.find_by_id(unused).await.expect("find").is_none());
    assert!(matches!(repo.delete(unused).await, Err(ProductError::NotFound(_))));
}

#[tokio::test]
async fn test_stock_summary_orders_batches() {
    let db = setup().await;
    let id = create_product(&db, "Bandage").await;
    receive(&db, "Bandage", 2, "2024-03-01").await;
    receive(&db, "Bandage", 3, "2024-01-01").await;

    let summary = ProductRepository::new(db.clone())
        .stock_summary(id)
        .await
        .expect("summary");

    assert_eq!(summary.available_quantity, 5);
    let quantities: Vec<i32> = summary.batches.iter().map(|b| b.quantity).collect();
    assert_eq!(quantities, vec![3, 2]);
}

#[tokio::test]
async fn test_employee_create_uppercases_department() {
    let db = setup().await;
    let repo = EmployeeRepository::new(db.clone());

    let employee = repo
        .create(CreateEmployeeInput {
            employee_name: "Dr. Kim".to_string(),
            department: "radiology".to_string(),
            phone_number: "555-0199".to_string(),
        })
        .await
        .expect("create");

    assert_eq!(employee.department, "RADIOLOGY");
    assert!(
        repo.find_by_name_and_phone("Dr. Kim", "555-0199")
            .await
            .expect("find")
            .is_some()
    );
}

#[tokio::test]
async fn test_employee_duplicate_rejected() {
    let db = setup().await;
    create_nurse(&db).await;
    let repo = EmployeeRepository::new(db.clone());

    let result = repo
        .create(CreateEmployeeInput {
            employee_name: "Nurse Joy".to_string(),
            department: "ER".to_string(),
            phone_number: "555-0100".to_string(),
        })
        .await;

    assert!(matches!(result, Err(EmployeeError::AlreadyExists { .. })));
}

#[tokio::test]
async fn test_employee_partial_update() {
    let db = setup().await;
    let id = create_nurse(&db).await;
    let repo = EmployeeRepository::new(db.clone());

    let updated = repo
        .update(
            id,
            UpdateEmployeeInput {
                department: Some("pharmacy".to_string()),
                ..Default::default()
            },
        )
        .await
        .expect("update");

    assert_eq!(updated.department, "PHARMACY");
    assert_eq!(updated.employee_name, "Nurse Joy");
    assert!(matches!(
        repo.update(999, UpdateEmployeeInput::default()).await,
        Err(EmployeeError::NotFound(999))
    ));
}

#[tokio::test]
async fn test_employee_delete_blocked_by_history() {
    let db = setup().await;
    let id = create_nurse(&db).await;
    create_product(&db, "Bandage").await;
    receive(&db, "Bandage", 5, "2024-01-01").await;
    TransactionRepository::new(db.clone())
        .record_outgoing(outgoing("Bandage", 1))
        .await
        .expect("issue");
    let repo = EmployeeRepository::new(db.clone());

    assert!(matches!(repo.delete(id).await, Err(EmployeeError::InUse(_))));
}

//! Database seeder for Clinic IMS development and testing.
//!
//! Seeds an admin and a manager account, a small product catalog, the
//! employees who draw stock, and an opening receipt for each product. Every
//! step is skipped when its data already exists, so the seeder can be re-run.
//!
//! Usage: cargo run --bin seeder

use clinic_ims_core::auth::{UserType as Role, hash_password};
use clinic_ims_core::stock::IncomingInput;
use clinic_ims_db::entities::sea_orm_active_enums::UserType;
use clinic_ims_db::repositories::{CreateEmployeeInput, CreateUserInput};
use clinic_ims_db::{EmployeeRepository, ProductRepository, TransactionRepository, UserRepository};
use sea_orm::DatabaseConnection;

/// Password shared by the seeded accounts.
const SEED_PASSWORD: &str = "clinic-dev-password";

const USERS: [(&str, &str, &str, &str, UserType); 2] = [
    ("Ada", "Admin", "admin@clinic.dev", "555-0001", UserType::Admin),
    ("Milo", "Manager", "manager@clinic.dev", "555-0002", UserType::Manager),
];

const PRODUCTS: [&str; 5] = [
    "Sterile Gauze",
    "Disposable Syringe 5ml",
    "Nitrile Gloves",
    "Saline 500ml",
    "Alcohol Swabs",
];

const EMPLOYEES: [(&str, &str, &str); 3] = [
    ("Nurse Joy", "ward", "555-0100"),
    ("Dr. Brandt", "surgery", "555-0101"),
    ("Kim Lee", "pharmacy", "555-0102"),
];

/// Opening receipts: product, quantity, expiration date.
const RECEIPTS: [(&str, i64, &str); 7] = [
    ("Sterile Gauze", 120, "2027-03-31"),
    ("Sterile Gauze", 80, "2027-09-30"),
    ("Disposable Syringe 5ml", 500, "2028-01-31"),
    ("Nitrile Gloves", 300, "2027-06-30"),
    ("Saline 500ml", 60, "2027-02-28"),
    ("Saline 500ml", 40, "2027-05-31"),
    ("Alcohol Swabs", 1000, "2028-12-31"),
];

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = clinic_ims_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding users...");
    seed_users(&db).await;

    println!("Seeding products...");
    seed_products(&db).await;

    println!("Seeding employees...");
    seed_employees(&db).await;

    println!("Seeding opening stock...");
    seed_receipts(&db).await;

    println!("Seeding complete!");
}

/// Seeds one account per user type.
async fn seed_users(db: &DatabaseConnection) {
    let repo = UserRepository::new(db.clone());

    for (first_name, last_name, email, phone_number, user_type) in USERS {
        if repo.email_exists(email).await.unwrap_or(false) {
            println!("  User {email} already exists, skipping...");
            continue;
        }

        let password_hash = match hash_password(SEED_PASSWORD) {
            Ok(hash) => hash,
            Err(e) => {
                eprintln!("Failed to hash seed password: {e}");
                return;
            }
        };

        let input = CreateUserInput {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: email.to_string(),
            phone_number: phone_number.to_string(),
            password_hash,
            user_type,
        };

        match repo.create(input).await {
            Ok(user) => println!(
                "  Created user {} ({})",
                user.email,
                Role::from(user.user_type)
            ),
            Err(e) => eprintln!("Failed to insert user {email}: {e}"),
        }
    }
}

async fn seed_products(db: &DatabaseConnection) {
    let repo = ProductRepository::new(db.clone());

    for name in PRODUCTS {
        if repo.find_by_name(name).await.ok().flatten().is_some() {
            println!("  Product {name} already exists, skipping...");
            continue;
        }

        match repo.create(name).await {
            Ok(product) => println!("  Created product #{}: {}", product.id, product.product_name),
            Err(e) => eprintln!("Failed to insert product {name}: {e}"),
        }
    }
}

async fn seed_employees(db: &DatabaseConnection) {
    let repo = EmployeeRepository::new(db.clone());

    for (name, department, phone) in EMPLOYEES {
        if repo
            .find_by_name_and_phone(name, phone)
            .await
            .ok()
            .flatten()
            .is_some()
        {
            println!("  Employee {name} already exists, skipping...");
            continue;
        }

        let input = CreateEmployeeInput {
            employee_name: name.to_string(),
            department: department.to_string(),
            phone_number: phone.to_string(),
        };

        match repo.create(input).await {
            Ok(employee) => println!(
                "  Created employee {} ({})",
                employee.employee_name, employee.department
            ),
            Err(e) => eprintln!("Failed to insert employee {name}: {e}"),
        }
    }
}

/// Receives opening stock for products that have none yet.
async fn seed_receipts(db: &DatabaseConnection) {
    let repo = TransactionRepository::new(db.clone());

    for product_name in PRODUCTS {
        match repo.available_quantity(product_name).await {
            Ok(0) => {}
            Ok(available) => {
                println!("  {product_name} already holds {available} units, skipping...");
                continue;
            }
            Err(e) => {
                eprintln!("Failed to read stock for {product_name}: {e}");
                continue;
            }
        }

        for (name, quantity, expiration_date) in RECEIPTS {
            if name != product_name {
                continue;
            }

            let input = IncomingInput {
                product_name: name.to_string(),
                quantity,
                expiration_date: expiration_date.to_string(),
            };

            match repo.record_incoming(input).await {
                Ok(record) => println!(
                    "  Received {} x {} expiring {}",
                    record.quantity, record.product_name, record.expiration_date
                ),
                Err(e) => eprintln!("Failed to receive {name}: {e}"),
            }
        }
    }
}

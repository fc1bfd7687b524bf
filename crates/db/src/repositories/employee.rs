//! Employee repository for catalog operations.

use chrono::Utc;
use clinic_ims_core::catalog::{CatalogError, validate_employee, validate_employee_patch};
use clinic_ims_shared::AppError;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use tracing::info;

use super::{is_foreign_key_violation, is_unique_violation};
use crate::entities::{employees, outgoing_transactions};

/// Error types for employee operations.
#[derive(Debug, thiserror::Error)]
pub enum EmployeeError {
    /// Employee not found.
    #[error("Employee not found: {0}")]
    NotFound(i32),

    /// An employee with the same name and phone already exists.
    #[error("Employee already exists: {name} ({phone})")]
    AlreadyExists {
        /// Employee name.
        name: String,
        /// Employee phone.
        phone: String,
    },

    /// Employee is referenced by outgoing transactions.
    #[error("Employee {0} has transaction history")]
    InUse(i32),

    /// Input failed validation.
    #[error(transparent)]
    Validation(#[from] CatalogError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<EmployeeError> for AppError {
    fn from(err: EmployeeError) -> Self {
        match err {
            EmployeeError::NotFound(_) => Self::NotFound("Employee not found".to_string()),
            EmployeeError::AlreadyExists { .. } => {
                Self::Conflict("Employee already exists".to_string())
            }
            EmployeeError::InUse(_) => {
                Self::Conflict("Employee has transaction history".to_string())
            }
            EmployeeError::Validation(e) => Self::Validation(e.to_string()),
            EmployeeError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Input for creating an employee.
#[derive(Debug, Clone)]
pub struct CreateEmployeeInput {
    /// Employee name.
    pub employee_name: String,
    /// Department.
    pub department: String,
    /// Contact phone.
    pub phone_number: String,
}

/// Input for a partial employee update.
#[derive(Debug, Clone, Default)]
pub struct UpdateEmployeeInput {
    /// New name.
    pub employee_name: Option<String>,
    /// New department.
    pub department: Option<String>,
    /// New phone.
    pub phone_number: Option<String>,
}

/// Employee repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct EmployeeRepository {
    db: DatabaseConnection,
}

impl EmployeeRepository {
    /// Creates a new employee repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists all employees ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<employees::Model>, DbErr> {
        employees::Entity::find()
            .order_by_asc(employees::Column::EmployeeName)
            .order_by_asc(employees::Column::Id)
            .all(&self.db)
            .await
    }

    /// Finds an employee by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: i32) -> Result<Option<employees::Model>, DbErr> {
        employees::Entity::find_by_id(id).one(&self.db).await
    }

    /// Finds an employee by name and phone.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_name_and_phone(
        &self,
        name: &str,
        phone: &str,
    ) -> Result<Option<employees::Model>, DbErr> {
        employees::Entity::find()
            .filter(employees::Column::EmployeeName.eq(name))
            .filter(employees::Column::PhoneNumber.eq(phone))
            .one(&self.db)
            .await
    }

    /// Creates an employee. The department is stored upper-cased.
    ///
    /// # Errors
    ///
    /// Returns `EmployeeError::AlreadyExists` if the name and phone pair is taken.
    pub async fn create(
        &self,
        input: CreateEmployeeInput,
    ) -> Result<employees::Model, EmployeeError> {
        let draft = validate_employee(
            &input.employee_name,
            &input.department,
            &input.phone_number,
        )?;

        let duplicate = || EmployeeError::AlreadyExists {
            name: draft.employee_name.clone(),
            phone: draft.phone_number.clone(),
        };

        if self
            .find_by_name_and_phone(&draft.employee_name, &draft.phone_number)
            .await?
            .is_some()
        {
            return Err(duplicate());
        }

        let employee = employees::ActiveModel {
            employee_name: Set(draft.employee_name.clone()),
            department: Set(draft.department.clone()),
            phone_number: Set(draft.phone_number.clone()),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                duplicate()
            } else {
                EmployeeError::Database(e)
            }
        })?;

        info!(employee_id = employee.id, department = %employee.department, "Employee created");
        Ok(employee)
    }

    /// Applies a partial update. The department is stored upper-cased.
    ///
    /// # Errors
    ///
    /// Returns `EmployeeError::NotFound` or `EmployeeError::AlreadyExists`.
    pub async fn update(
        &self,
        id: i32,
        input: UpdateEmployeeInput,
    ) -> Result<employees::Model, EmployeeError> {
        let patch = validate_employee_patch(
            input.employee_name.as_deref(),
            input.department.as_deref(),
            input.phone_number.as_deref(),
        )?;

        let existing = self
            .find_by_id(id)
            .await?
            .ok_or(EmployeeError::NotFound(id))?;

        if patch.is_empty() {
            return Ok(existing);
        }

        let name = patch
            .employee_name
            .clone()
            .unwrap_or_else(|| existing.employee_name.clone());
        let phone = patch
            .phone_number
            .clone()
            .unwrap_or_else(|| existing.phone_number.clone());

        if let Some(other) = self.find_by_name_and_phone(&name, &phone).await?
            && other.id != id
        {
            return Err(EmployeeError::AlreadyExists { name, phone });
        }

        let mut active: employees::ActiveModel = existing.into();
        if let Some(employee_name) = patch.employee_name {
            active.employee_name = Set(employee_name);
        }
        if let Some(department) = patch.department {
            active.department = Set(department);
        }
        if let Some(phone_number) = patch.phone_number {
            active.phone_number = Set(phone_number);
        }

        let updated = active.update(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                EmployeeError::AlreadyExists {
                    name: name.clone(),
                    phone: phone.clone(),
                }
            } else {
                EmployeeError::Database(e)
            }
        })?;

        info!(employee_id = id, "Employee updated");
        Ok(updated)
    }

    /// Deletes an employee with no outgoing transactions.
    ///
    /// # Errors
    ///
    /// Returns `EmployeeError::NotFound` or `EmployeeError::InUse`.
    pub async fn delete(&self, id: i32) -> Result<(), EmployeeError> {
        if self.find_by_id(id).await?.is_none() {
            return Err(EmployeeError::NotFound(id));
        }

        let history = outgoing_transactions::Entity::find()
            .filter(outgoing_transactions::Column::EmployeeId.eq(id))
            .count(&self.db)
            .await?;
        if history > 0 {
            return Err(EmployeeError::InUse(id));
        }

        employees::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    EmployeeError::InUse(id)
                } else {
                    EmployeeError::Database(e)
                }
            })?;

        info!(employee_id = id, "Employee deleted");
        Ok(())
    }
}

//! Product and employee catalog rules.
//!
//! Names and phone numbers are trimmed and must not be blank. Departments are
//! stored upper-cased.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while validating catalog input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// A required field is missing or blank.
    #[error("{0} is required")]
    Required(&'static str),

    /// A field exceeds its maximum length.
    #[error("{field} must be at most {max} characters")]
    TooLong {
        /// Field name.
        field: &'static str,
        /// Maximum allowed length.
        max: usize,
    },
}

/// Maximum length of any catalog text field.
pub const MAX_FIELD_LEN: usize = 255;

/// A validated product definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDraft {
    /// Unique product name.
    pub product_name: String,
}

/// A validated employee definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeDraft {
    /// Employee name.
    pub employee_name: String,
    /// Department, upper-cased.
    pub department: String,
    /// Contact phone.
    pub phone_number: String,
}

/// A validated partial employee update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeePatch {
    /// New name, if changing.
    pub employee_name: Option<String>,
    /// New department (upper-cased), if changing.
    pub department: Option<String>,
    /// New phone, if changing.
    pub phone_number: Option<String>,
}

impl EmployeePatch {
    /// Returns true if the patch changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.employee_name.is_none() && self.department.is_none() && self.phone_number.is_none()
    }
}

fn required(field: &'static str, value: &str) -> Result<String, CatalogError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(CatalogError::Required(field));
    }
    if value.chars().count() > MAX_FIELD_LEN {
        return Err(CatalogError::TooLong {
            field,
            max: MAX_FIELD_LEN,
        });
    }
    Ok(value.to_string())
}

fn optional(field: &'static str, value: Option<&str>) -> Result<Option<String>, CatalogError> {
    value.map(|v| required(field, v)).transpose()
}

/// Validates a product name.
///
/// # Errors
///
/// Returns `CatalogError` if the name is blank or too long.
pub fn validate_product(product_name: &str) -> Result<ProductDraft, CatalogError> {
    Ok(ProductDraft {
        product_name: required("productName", product_name)?,
    })
}

/// Validates a new employee.
///
/// # Errors
///
/// Returns `CatalogError` if any field is blank or too long.
pub fn validate_employee(
    employee_name: &str,
    department: &str,
    phone_number: &str,
) -> Result<EmployeeDraft, CatalogError> {
    Ok(EmployeeDraft {
        employee_name: required("employeeName", employee_name)?,
        department: normalize_department(&required("department", department)?),
        phone_number: required("phoneNumber", phone_number)?,
    })
}

/// Validates a partial employee update. Absent fields are left unchanged.
///
/// # Errors
///
/// Returns `CatalogError` if a present field is blank or too long.
pub fn validate_employee_patch(
    employee_name: Option<&str>,
    department: Option<&str>,
    phone_number: Option<&str>,
) -> Result<EmployeePatch, CatalogError> {
    Ok(EmployeePatch {
        employee_name: optional("employeeName", employee_name)?,
        department: optional("department", department)?.map(|d| normalize_department(&d)),
        phone_number: optional("phoneNumber", phone_number)?,
    })
}

/// Upper-cases a department name.
#[must_use]
pub fn normalize_department(department: &str) -> String {
    department.trim().to_uppercase()
}

//! Employee routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use clinic_ims_db::EmployeeRepository;
use clinic_ims_db::repositories::{CreateEmployeeInput, UpdateEmployeeInput};
use clinic_ims_shared::AppError;
use serde::Deserialize;
use tracing::info;

use crate::error::{app_error_response, internal_error};
use crate::{AppState, middleware::AuthUser};

/// Creates the employee routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/employees", get(list_employees).post(create_employee))
        .route(
            "/employees/{id}",
            get(get_employee).put(update_employee).delete(delete_employee),
        )
}

/// Request body for creating an employee.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmployeeRequest {
    /// Employee name.
    pub employee_name: String,
    /// Department (stored upper-cased).
    pub department: String,
    /// Contact phone.
    pub phone_number: String,
}

/// Request body for updating an employee. Absent fields are unchanged.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmployeeRequest {
    /// Employee name.
    pub employee_name: Option<String>,
    /// Department.
    pub department: Option<String>,
    /// Contact phone.
    pub phone_number: Option<String>,
}

/// GET /employees - List employees.
async fn list_employees(State(state): State<AppState>, _auth: AuthUser) -> impl IntoResponse {
    match EmployeeRepository::new((*state.db).clone()).list().await {
        Ok(employees) => (StatusCode::OK, Json(employees)).into_response(),
        Err(e) => internal_error("Failed to list employees", &e),
    }
}

/// POST /employees - Create an employee.
async fn create_employee(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateEmployeeRequest>,
) -> impl IntoResponse {
    if let Err(response) = auth.require_catalog_admin() {
        return response;
    }

    let input = CreateEmployeeInput {
        employee_name: payload.employee_name,
        department: payload.department,
        phone_number: payload.phone_number,
    };

    match EmployeeRepository::new((*state.db).clone()).create(input).await {
        Ok(employee) => (StatusCode::CREATED, Json(employee)).into_response(),
        Err(e) => app_error_response(&AppError::from(e)),
    }
}

/// GET /employees/{id} - Get an employee.
async fn get_employee(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    match EmployeeRepository::new((*state.db).clone()).find_by_id(id).await {
        Ok(Some(employee)) => (StatusCode::OK, Json(employee)).into_response(),
        Ok(None) => app_error_response(&AppError::NotFound("Employee not found".to_string())),
        Err(e) => internal_error("Failed to get employee", &e),
    }
}

/// PUT /employees/{id} - Update an employee.
async fn update_employee(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateEmployeeRequest>,
) -> impl IntoResponse {
    if let Err(response) = auth.require_catalog_admin() {
        return response;
    }

    let input = UpdateEmployeeInput {
        employee_name: payload.employee_name,
        department: payload.department,
        phone_number: payload.phone_number,
    };

    match EmployeeRepository::new((*state.db).clone())
        .update(id, input)
        .await
    {
        Ok(employee) => (StatusCode::OK, Json(employee)).into_response(),
        Err(e) => app_error_response(&AppError::from(e)),
    }
}

/// DELETE /employees/{id} - Delete an employee without history.
async fn delete_employee(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    if let Err(response) = auth.require_catalog_admin() {
        return response;
    }

    match EmployeeRepository::new((*state.db).clone()).delete(id).await {
        Ok(()) => {
            info!(employee_id = id, user_id = auth.user_id(), "Employee removed");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => app_error_response(&AppError::from(e)),
    }
}

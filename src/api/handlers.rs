//! HTTP request handlers for the Payroll Engine API.
//!
//! This module contains the router and the handler functions for all API
//! endpoints. Every handler stamps a correlation id on its log lines.

use std::fmt::Display;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Json, Router,
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{PayrollError, PayrollResult};
use crate::models::{
    AccountContext, EmployeeFilter, EmployeePatch, NewAccount, NewEmployee, NewSalaryRecord,
    SalaryRecordFilter, SalaryRecordPatch,
};

use super::request::{DashboardStatsQuery, GenerateReportRequest};
use super::response::ApiErrorResponse;
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/accounts", post(register_account))
        .route("/employees", post(create_employee).get(list_employees))
        .route("/employees/stats", get(employee_stats))
        .route("/employees/active", get(active_employees))
        .route(
            "/employees/:id",
            get(get_employee)
                .patch(update_employee)
                .delete(deactivate_employee),
        )
        .route("/employees/:id/restore", post(restore_employee))
        .route(
            "/salary-records",
            post(create_salary_record).get(list_salary_records),
        )
        .route("/salary-records/generate", post(generate_report))
        .route("/salary-records/stats", get(dashboard_stats))
        .route(
            "/salary-records/:id",
            patch(update_salary_record).delete(delete_salary_record),
        )
        .route("/salary-records/:id/approve", post(approve_salary_record))
        .with_state(state)
}

/// Unwraps an extractor result or returns the rejection as a `400` response.
macro_rules! extract_or_reject {
    ($correlation_id:expr, $extracted:expr) => {
        match $extracted {
            Ok(value) => value,
            Err(rejection) => return rejected($correlation_id, rejection),
        }
    };
}

fn rejected<R>(correlation_id: Uuid, rejection: R) -> Response
where
    R: Display + Into<ApiErrorResponse>,
{
    warn!(
        correlation_id = %correlation_id,
        error = %rejection,
        "Request rejected"
    );
    let response: ApiErrorResponse = rejection.into();
    response.into_response()
}

fn respond<T: Serialize>(
    correlation_id: Uuid,
    operation: &'static str,
    status: StatusCode,
    result: PayrollResult<T>,
) -> Response {
    match result {
        Ok(body) => {
            info!(correlation_id = %correlation_id, operation, "Request completed");
            (
                status,
                [(header::CONTENT_TYPE, "application/json")],
                Json(body),
            )
                .into_response()
        }
        Err(err) => fail(correlation_id, operation, err),
    }
}

fn fail(correlation_id: Uuid, operation: &'static str, err: PayrollError) -> Response {
    warn!(
        correlation_id = %correlation_id,
        operation,
        error = %err,
        "Request failed"
    );
    ApiErrorResponse::from(err).into_response()
}

fn start(operation: &'static str) -> Uuid {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, operation, "Processing request");
    correlation_id
}

/// Handler for `POST /accounts`.
async fn register_account(
    State(state): State<AppState>,
    payload: Result<Json<NewAccount>, JsonRejection>,
) -> Response {
    let correlation_id = start("register_account");
    let Json(input) = extract_or_reject!(correlation_id, payload);
    let result = state.accounts().register(input).await;
    respond(correlation_id, "register_account", StatusCode::CREATED, result)
}

/// Handler for `POST /employees`.
async fn create_employee(
    State(state): State<AppState>,
    ctx: AccountContext,
    payload: Result<Json<NewEmployee>, JsonRejection>,
) -> Response {
    let correlation_id = start("create_employee");
    let Json(input) = extract_or_reject!(correlation_id, payload);
    let result = state.employees().create(&ctx, input).await;
    respond(correlation_id, "create_employee", StatusCode::CREATED, result)
}

/// Handler for `GET /employees`.
async fn list_employees(
    State(state): State<AppState>,
    ctx: AccountContext,
    query: Result<Query<EmployeeFilter>, QueryRejection>,
) -> Response {
    let correlation_id = start("list_employees");
    let Query(filter) = extract_or_reject!(correlation_id, query);
    let result = state.employees().list(&ctx, &filter).await;
    respond(correlation_id, "list_employees", StatusCode::OK, result)
}

/// Handler for `GET /employees/stats`.
async fn employee_stats(State(state): State<AppState>, ctx: AccountContext) -> Response {
    let correlation_id = start("employee_stats");
    let result = state.employees().stats(&ctx).await;
    respond(correlation_id, "employee_stats", StatusCode::OK, result)
}

/// Handler for `GET /employees/active`.
async fn active_employees(State(state): State<AppState>, ctx: AccountContext) -> Response {
    let correlation_id = start("active_employees");
    let result = state.employees().active_summaries(&ctx).await;
    respond(correlation_id, "active_employees", StatusCode::OK, result)
}

/// Handler for `GET /employees/:id`.
async fn get_employee(
    State(state): State<AppState>,
    ctx: AccountContext,
    id: Result<Path<Uuid>, PathRejection>,
) -> Response {
    let correlation_id = start("get_employee");
    let Path(id) = extract_or_reject!(correlation_id, id);
    let result = state.employees().get(&ctx, id).await;
    respond(correlation_id, "get_employee", StatusCode::OK, result)
}

/// Handler for `PATCH /employees/:id`.
async fn update_employee(
    State(state): State<AppState>,
    ctx: AccountContext,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<EmployeePatch>, JsonRejection>,
) -> Response {
    let correlation_id = start("update_employee");
    let Path(id) = extract_or_reject!(correlation_id, id);
    let Json(patch) = extract_or_reject!(correlation_id, payload);
    let result = state.employees().update(&ctx, id, patch).await;
    respond(correlation_id, "update_employee", StatusCode::OK, result)
}

/// Handler for `DELETE /employees/:id`. Soft-deletes the employee.
async fn deactivate_employee(
    State(state): State<AppState>,
    ctx: AccountContext,
    id: Result<Path<Uuid>, PathRejection>,
) -> Response {
    let correlation_id = start("deactivate_employee");
    let Path(id) = extract_or_reject!(correlation_id, id);
    let result = state.employees().deactivate(&ctx, id).await;
    respond(correlation_id, "deactivate_employee", StatusCode::OK, result)
}

/// Handler for `POST /employees/:id/restore`.
async fn restore_employee(
    State(state): State<AppState>,
    ctx: AccountContext,
    id: Result<Path<Uuid>, PathRejection>,
) -> Response {
    let correlation_id = start("restore_employee");
    let Path(id) = extract_or_reject!(correlation_id, id);
    let result = state.employees().restore(&ctx, id).await;
    respond(correlation_id, "restore_employee", StatusCode::OK, result)
}

/// Handler for `POST /salary-records`.
async fn create_salary_record(
    State(state): State<AppState>,
    ctx: AccountContext,
    payload: Result<Json<NewSalaryRecord>, JsonRejection>,
) -> Response {
    let correlation_id = start("create_salary_record");
    let Json(input) = extract_or_reject!(correlation_id, payload);
    let result = state.payroll().create_salary_record(&ctx, input).await;
    respond(
        correlation_id,
        "create_salary_record",
        StatusCode::CREATED,
        result,
    )
}

/// Handler for `GET /salary-records`.
async fn list_salary_records(
    State(state): State<AppState>,
    ctx: AccountContext,
    query: Result<Query<SalaryRecordFilter>, QueryRejection>,
) -> Response {
    let correlation_id = start("list_salary_records");
    let Query(filter) = extract_or_reject!(correlation_id, query);
    let result = state.payroll().list_salary_records(&ctx, &filter).await;
    respond(correlation_id, "list_salary_records", StatusCode::OK, result)
}

/// Handler for `PATCH /salary-records/:id`.
async fn update_salary_record(
    State(state): State<AppState>,
    ctx: AccountContext,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<SalaryRecordPatch>, JsonRejection>,
) -> Response {
    let correlation_id = start("update_salary_record");
    let Path(id) = extract_or_reject!(correlation_id, id);
    let Json(patch) = extract_or_reject!(correlation_id, payload);
    let result = state.payroll().update_salary_record(&ctx, id, patch).await;
    respond(correlation_id, "update_salary_record", StatusCode::OK, result)
}

/// Handler for `POST /salary-records/:id/approve`.
async fn approve_salary_record(
    State(state): State<AppState>,
    ctx: AccountContext,
    id: Result<Path<Uuid>, PathRejection>,
) -> Response {
    let correlation_id = start("approve_salary_record");
    let Path(id) = extract_or_reject!(correlation_id, id);
    let result = state.payroll().approve_salary_record(&ctx, id).await;
    respond(correlation_id, "approve_salary_record", StatusCode::OK, result)
}

/// Handler for `DELETE /salary-records/:id`.
async fn delete_salary_record(
    State(state): State<AppState>,
    ctx: AccountContext,
    id: Result<Path<Uuid>, PathRejection>,
) -> Response {
    let correlation_id = start("delete_salary_record");
    let Path(id) = extract_or_reject!(correlation_id, id);
    match state.payroll().delete_salary_record(&ctx, id).await {
        Ok(()) => {
            info!(correlation_id = %correlation_id, operation = "delete_salary_record", "Request completed");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(err) => fail(correlation_id, "delete_salary_record", err),
    }
}

/// Handler for `POST /salary-records/generate`.
async fn generate_report(
    State(state): State<AppState>,
    ctx: AccountContext,
    payload: Result<Json<GenerateReportRequest>, JsonRejection>,
) -> Response {
    let correlation_id = start("generate_report");
    let Json(request) = extract_or_reject!(correlation_id, payload);
    let result = state
        .payroll()
        .generate_monthly_report(&ctx, request.month, request.year)
        .await;
    respond(correlation_id, "generate_report", StatusCode::OK, result)
}

/// Handler for `GET /salary-records/stats`.
async fn dashboard_stats(
    State(state): State<AppState>,
    ctx: AccountContext,
    query: Result<Query<DashboardStatsQuery>, QueryRejection>,
) -> Response {
    let correlation_id = start("dashboard_stats");
    let Query(query) = extract_or_reject!(correlation_id, query);
    let result = state
        .payroll()
        .dashboard_stats(&ctx, query.month, query.year)
        .await;
    respond(correlation_id, "dashboard_stats", StatusCode::OK, result)
}

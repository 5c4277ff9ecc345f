//! HTTP API module for the Payroll Engine.
//!
//! This module exposes the account, employee and salary record operations
//! as JSON endpoints. The acting account is read from the `x-account-id`
//! header.

mod extract;
mod handlers;
mod request;
mod response;
mod state;

pub use extract::ACCOUNT_HEADER;
pub use handlers::create_router;
pub use request::{DashboardStatsQuery, GenerateReportRequest};
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;

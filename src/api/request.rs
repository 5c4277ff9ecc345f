//! Request types for the Payroll Engine API.
//!
//! Bodies for creating and patching resources reuse the model payloads
//! directly; this module only holds the shapes that exist purely at the
//! HTTP boundary.

use serde::{Deserialize, Serialize};

/// Request body for `POST /salary-records/generate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateReportRequest {
    /// Month to generate, 1-12.
    pub month: u32,
    /// Year to generate.
    pub year: i32,
}

/// Query parameters for `GET /salary-records/stats`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStatsQuery {
    /// Month to aggregate; defaults to the current month.
    #[serde(default)]
    pub month: Option<u32>,
    /// Year to aggregate; defaults to the current year.
    #[serde(default)]
    pub year: Option<i32>,
}

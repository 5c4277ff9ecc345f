//! Configuration types for the payroll engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from the YAML configuration file. Every section has
//! defaults, so a partial file only overrides what it names.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address the API listens on.
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:3000".to_string(),
        }
    }
}

/// Bounds applied by input validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationRules {
    /// Earliest accepted payroll year.
    pub min_year: i32,
    /// Latest accepted payroll year.
    pub max_year: i32,
    /// Maximum length of salary record notes, in characters.
    pub max_notes_length: usize,
    /// Maximum basic salary of an employee.
    pub max_basic_salary: Decimal,
    /// Maximum length of an employee code.
    pub max_employee_code_length: usize,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            min_year: 2020,
            max_year: 2030,
            max_notes_length: 500,
            max_basic_salary: Decimal::new(1_000_000, 0),
            max_employee_code_length: 20,
        }
    }
}

/// Paging defaults for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingConfig {
    /// Page size used when the caller does not pass one.
    pub default_page_size: u32,
    /// Largest page size a caller may request.
    pub max_page_size: u32,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            default_page_size: 10,
            max_page_size: 100,
        }
    }
}

/// The complete payroll engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PayrollConfig {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Validation bounds.
    pub validation: ValidationRules,
    /// Listing defaults.
    pub listing: ListingConfig,
}

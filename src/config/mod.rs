//! Configuration loading and management for the Payroll Engine.
//!
//! This module loads the engine configuration from a YAML file, covering
//! the HTTP bind address, validation bounds and listing defaults.
//!
//! # Example
//!
//! ```no_run
//! use payroll_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/payroll.yaml").unwrap();
//! println!("Payroll years: {}-{}", config.validation().min_year, config.validation().max_year);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{ListingConfig, PayrollConfig, ServerConfig, ValidationRules};

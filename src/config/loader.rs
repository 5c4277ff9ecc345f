//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the payroll
//! configuration from a YAML file.

use std::fs;
use std::path::Path;

use crate::error::{PayrollError, PayrollResult};

use super::types::{ListingConfig, PayrollConfig, ValidationRules};

/// Loads and provides access to the payroll configuration.
///
/// # File Structure
///
/// ```text
/// server:
///   bind_address: "127.0.0.1:3000"
/// validation:
///   min_year: 2020
///   max_year: 2030
///   max_notes_length: 500
///   max_basic_salary: "1000000"
///   max_employee_code_length: 20
/// listing:
///   default_page_size: 10
///   max_page_size: 100
/// ```
///
/// # Example
///
/// ```no_run
/// use payroll_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/payroll.yaml")?;
/// println!("Listening on {}", loader.config().server.bind_address);
/// # Ok::<(), payroll_engine::error::PayrollError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    config: PayrollConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified YAML file.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` on success, or an error if:
    /// - The file is missing or unreadable
    /// - The file contains invalid YAML
    /// - The configured bounds are inconsistent
    pub fn load<P: AsRef<Path>>(path: P) -> PayrollResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| PayrollError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        Self::parse(&content, &path_str)
    }

    /// Parses configuration from YAML text. `origin` names the source in errors.
    pub fn parse(content: &str, origin: &str) -> PayrollResult<Self> {
        let config: PayrollConfig =
            serde_yaml::from_str(content).map_err(|e| PayrollError::ConfigParseError {
                path: origin.to_string(),
                message: e.to_string(),
            })?;

        Self::check(&config).map_err(|message| PayrollError::ConfigParseError {
            path: origin.to_string(),
            message,
        })?;

        Ok(Self { config })
    }

    fn check(config: &PayrollConfig) -> Result<(), String> {
        let rules = &config.validation;
        if rules.min_year > rules.max_year {
            return Err(format!(
                "validation.min_year ({}) must not exceed validation.max_year ({})",
                rules.min_year, rules.max_year
            ));
        }
        if rules.max_basic_salary.is_sign_negative() {
            return Err("validation.max_basic_salary must not be negative".to_string());
        }
        let listing = &config.listing;
        if listing.max_page_size == 0 || listing.default_page_size == 0 {
            return Err("listing page sizes must be at least 1".to_string());
        }
        if listing.default_page_size > listing.max_page_size {
            return Err(format!(
                "listing.default_page_size ({}) must not exceed listing.max_page_size ({})",
                listing.default_page_size, listing.max_page_size
            ));
        }
        Ok(())
    }

    /// Returns the loaded configuration.
    pub fn config(&self) -> &PayrollConfig {
        &self.config
    }

    /// Returns the validation bounds.
    pub fn validation(&self) -> &ValidationRules {
        &self.config.validation
    }

    /// Returns the listing defaults.
    pub fn listing(&self) -> ListingConfig {
        self.config.listing
    }

    /// Consumes the loader, returning the configuration.
    pub fn into_config(self) -> PayrollConfig {
        self.config
    }
}

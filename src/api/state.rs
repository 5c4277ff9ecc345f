//! Application state for the Payroll Engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::config::PayrollConfig;
use crate::repository::Repositories;
use crate::services::{AccountService, EmployeeService, PayrollService};

/// Shared application state.
///
/// Holds the services every handler dispatches to. All services share the
/// same repositories and configuration.
#[derive(Clone)]
pub struct AppState {
    accounts: AccountService,
    employees: EmployeeService,
    payroll: PayrollService,
}

impl AppState {
    /// Creates a new application state over the given repositories.
    pub fn new(config: PayrollConfig, repos: Repositories) -> Self {
        let config = Arc::new(config);
        let accounts = AccountService::new(repos.accounts.clone());
        let employees =
            EmployeeService::new(accounts.clone(), repos.employees.clone(), config.clone());
        let payroll = PayrollService::new(repos, config);
        Self {
            accounts,
            employees,
            payroll,
        }
    }

    /// Creates a state backed by a fresh in-memory store.
    pub fn in_memory(config: PayrollConfig) -> Self {
        Self::new(config, Repositories::in_memory())
    }

    /// Returns the account service.
    pub fn accounts(&self) -> &AccountService {
        &self.accounts
    }

    /// Returns the employee service.
    pub fn employees(&self) -> &EmployeeService {
        &self.employees
    }

    /// Returns the payroll service.
    pub fn payroll(&self) -> &PayrollService {
        &self.payroll
    }
}

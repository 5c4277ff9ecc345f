//! Multi-tenant Payroll Engine
//!
//! This crate manages per-account employees and their monthly salary
//! records. It provides a pure salary calculator, a `DRAFT -> APPROVED`
//! record lifecycle with per-period uniqueness, an idempotent monthly report
//! generator, dashboard statistics and a JSON HTTP API over all of it.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;
pub mod validation;

//! Input validation for payroll operations.
//!
//! Every function here checks one input payload against the configured
//! [`ValidationRules`] and collects all failing fields into a single
//! [`PayrollError::Validation`](crate::error::PayrollError::Validation).
//! Validation never touches storage, so it runs before any lookup.

use rust_decimal::Decimal;

use crate::config::{ListingConfig, ValidationRules};
use crate::error::{PayrollResult, ValidationErrors};
use crate::models::{
    EmployeeFilter, EmployeePatch, NewAccount, NewEmployee, NewSalaryRecord, Patch,
    SalaryRecordFilter, SalaryRecordPatch,
};

const MIN_NAME_LENGTH: usize = 2;
const MAX_NAME_LENGTH: usize = 100;
const MAX_LABEL_LENGTH: usize = 50;

/// Validates a payroll period.
///
/// # Example
///
/// ```
/// use payroll_engine::config::ValidationRules;
/// use payroll_engine::validation::validate_period;
///
/// let rules = ValidationRules::default();
/// assert!(validate_period(6, 2024, &rules).is_ok());
/// assert!(validate_period(13, 2024, &rules).is_err());
/// ```
pub fn validate_period(month: u32, year: i32, rules: &ValidationRules) -> PayrollResult<()> {
    let mut errors = ValidationErrors::new();
    check_month(&mut errors, month);
    check_year(&mut errors, year, rules);
    errors.into_result()
}

/// Validates the input of a salary record creation.
pub fn validate_new_salary_record(
    input: &NewSalaryRecord,
    rules: &ValidationRules,
) -> PayrollResult<()> {
    let mut errors = ValidationErrors::new();
    check_month(&mut errors, input.month);
    check_year(&mut errors, input.year, rules);

    let amounts = [
        ("bonus", "Bonus", input.bonus),
        ("deductions", "Deductions", input.deductions),
        ("allowances", "Allowances", input.allowances),
        ("overtime_hours", "Overtime hours", input.overtime_hours),
        ("overtime_rate", "Overtime rate", input.overtime_rate),
    ];
    for (field, label, value) in amounts {
        if let Some(value) = value {
            check_non_negative(&mut errors, field, label, value);
        }
    }
    if let Some(notes) = &input.notes {
        check_notes(&mut errors, notes, rules);
    }

    errors.into_result()
}

/// Validates the set fields of a salary record patch.
pub fn validate_salary_record_patch(
    patch: &SalaryRecordPatch,
    rules: &ValidationRules,
) -> PayrollResult<()> {
    let mut errors = ValidationErrors::new();

    let amounts = [
        ("bonus", "Bonus", &patch.bonus),
        ("deductions", "Deductions", &patch.deductions),
        ("allowances", "Allowances", &patch.allowances),
        ("overtime_hours", "Overtime hours", &patch.overtime_hours),
        ("overtime_rate", "Overtime rate", &patch.overtime_rate),
    ];
    for (field, label, value) in amounts {
        if let Some(value) = value.as_set() {
            check_non_negative(&mut errors, field, label, *value);
        }
    }
    if let Patch::Set(Some(notes)) = &patch.notes {
        check_notes(&mut errors, notes, rules);
    }

    errors.into_result()
}

/// Validates the month and year filters of a salary record listing.
pub fn validate_salary_record_filter(
    filter: &SalaryRecordFilter,
    rules: &ValidationRules,
) -> PayrollResult<()> {
    let mut errors = ValidationErrors::new();
    if let Some(month) = filter.month {
        check_month(&mut errors, month);
    }
    if let Some(year) = filter.year {
        check_year(&mut errors, year, rules);
    }
    errors.into_result()
}

/// Validates the input of an employee creation.
pub fn validate_new_employee(input: &NewEmployee, rules: &ValidationRules) -> PayrollResult<()> {
    let mut errors = ValidationErrors::new();
    check_employee_code(&mut errors, &input.employee_code, rules);
    check_person_name(&mut errors, &input.name);
    if let Some(email) = &input.email {
        check_optional_email(&mut errors, email);
    }
    check_basic_salary(&mut errors, input.basic_salary, rules);
    if let Some(department) = &input.department {
        check_label(&mut errors, "department", "Department", department);
    }
    if let Some(position) = &input.position {
        check_label(&mut errors, "position", "Position", position);
    }
    errors.into_result()
}

/// Validates the set fields of an employee patch.
pub fn validate_employee_patch(patch: &EmployeePatch, rules: &ValidationRules) -> PayrollResult<()> {
    let mut errors = ValidationErrors::new();
    if let Some(code) = patch.employee_code.as_set() {
        check_employee_code(&mut errors, code, rules);
    }
    if let Some(name) = patch.name.as_set() {
        check_person_name(&mut errors, name);
    }
    if let Patch::Set(Some(email)) = &patch.email {
        check_optional_email(&mut errors, email);
    }
    if let Some(salary) = patch.basic_salary.as_set() {
        check_basic_salary(&mut errors, *salary, rules);
    }
    if let Patch::Set(Some(department)) = &patch.department {
        check_label(&mut errors, "department", "Department", department);
    }
    if let Patch::Set(Some(position)) = &patch.position {
        check_label(&mut errors, "position", "Position", position);
    }
    errors.into_result()
}

/// Validates the paging parameters of an employee listing.
pub fn validate_employee_filter(filter: &EmployeeFilter, listing: &ListingConfig) -> PayrollResult<()> {
    let mut errors = ValidationErrors::new();
    if filter.page == Some(0) {
        errors.add("page", "Page must be at least 1");
    }
    if let Some(limit) = filter.limit {
        if limit == 0 || limit > listing.max_page_size {
            errors.add(
                "limit",
                format!("Limit must be between 1 and {}", listing.max_page_size),
            );
        }
    }
    errors.into_result()
}

/// Validates an account registration.
pub fn validate_new_account(input: &NewAccount) -> PayrollResult<()> {
    let mut errors = ValidationErrors::new();
    let name_length = input.name.trim().chars().count();
    if !(MIN_NAME_LENGTH..=MAX_NAME_LENGTH).contains(&name_length) {
        errors.add("name", "Name must be between 2 and 100 characters");
    }
    if !is_valid_email(input.email.trim()) {
        errors.add("email", "Invalid email address");
    }
    errors.into_result()
}

/// Returns true if `email` has the shape `local@domain.tld`.
///
/// ```
/// use payroll_engine::validation::is_valid_email;
///
/// assert!(is_valid_email("jane.doe@example.com"));
/// assert!(!is_valid_email("jane.doe@example"));
/// assert!(!is_valid_email("not an email"));
/// ```
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => {
            !host.is_empty() && !tld.is_empty() && !host.starts_with('.') && !host.ends_with('.')
        }
        None => false,
    }
}

/// Returns true if `code` is non-empty uppercase alphanumeric within `max_length`.
pub fn is_valid_employee_code(code: &str, max_length: usize) -> bool {
    !code.is_empty()
        && code.len() <= max_length
        && code
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
}

fn check_month(errors: &mut ValidationErrors, month: u32) {
    if !(1..=12).contains(&month) {
        errors.add("month", "Month must be between 1 and 12");
    }
}

fn check_year(errors: &mut ValidationErrors, year: i32, rules: &ValidationRules) {
    if !(rules.min_year..=rules.max_year).contains(&year) {
        errors.add(
            "year",
            format!(
                "Year must be between {} and {}",
                rules.min_year, rules.max_year
            ),
        );
    }
}

fn check_non_negative(errors: &mut ValidationErrors, field: &str, label: &str, value: Decimal) {
    if value.is_sign_negative() && !value.is_zero() {
        errors.add(field, format!("{} must not be negative", label));
    }
}

fn check_notes(errors: &mut ValidationErrors, notes: &str, rules: &ValidationRules) {
    if notes.chars().count() > rules.max_notes_length {
        errors.add(
            "notes",
            format!(
                "Notes must be at most {} characters",
                rules.max_notes_length
            ),
        );
    }
}

fn check_employee_code(errors: &mut ValidationErrors, code: &str, rules: &ValidationRules) {
    let code = code.trim();
    if code.is_empty() {
        errors.add("employee_code", "Employee ID is required");
    } else if code.len() > rules.max_employee_code_length {
        errors.add(
            "employee_code",
            format!(
                "Employee ID must be at most {} characters",
                rules.max_employee_code_length
            ),
        );
    } else if !is_valid_employee_code(code, rules.max_employee_code_length) {
        errors.add(
            "employee_code",
            "Employee ID must contain only uppercase letters and numbers",
        );
    }
}

fn check_person_name(errors: &mut ValidationErrors, name: &str) {
    let name = name.trim();
    let length = name.chars().count();
    if !(MIN_NAME_LENGTH..=MAX_NAME_LENGTH).contains(&length) {
        errors.add("name", "Name must be between 2 and 100 characters");
    } else if !name
        .chars()
        .all(|c| c.is_alphabetic() || c == ' ' || c == '-' || c == '\'')
    {
        errors.add(
            "name",
            "Name can only contain letters, spaces, hyphens, and apostrophes",
        );
    }
}

fn check_optional_email(errors: &mut ValidationErrors, email: &str) {
    let email = email.trim();
    if !email.is_empty() && !is_valid_email(email) {
        errors.add("email", "Invalid email address");
    }
}

fn check_basic_salary(errors: &mut ValidationErrors, salary: Decimal, rules: &ValidationRules) {
    if salary.is_sign_negative() && !salary.is_zero() {
        errors.add("basic_salary", "Basic salary must not be negative");
    } else if salary > rules.max_basic_salary {
        errors.add(
            "basic_salary",
            format!("Basic salary must not exceed {}", rules.max_basic_salary),
        );
    }
}

fn check_label(errors: &mut ValidationErrors, field: &str, label: &str, value: &str) {
    if value.trim().chars().count() > MAX_LABEL_LENGTH {
        errors.add(
            field,
            format!("{} must be at most {} characters", label, MAX_LABEL_LENGTH),
        );
    }
}

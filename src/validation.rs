//! Employee form validation
//!
//! Runs before any submission. A form that fails here never reaches the
//! network; the per-field messages are rendered next to the offending input.

use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

use crate::models::{Department, Employee, EmployeeInput};

/// Raw employee form contents, exactly as typed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeForm {
    pub employee_id: String,
    pub full_name: String,
    pub email: String,
    pub department: Option<Department>,
}

impl EmployeeForm {
    /// Prefill from an existing record (edit mode).
    ///
    /// A department the client does not know is left unset so the user has to pick one.
    pub fn from_employee(employee: &Employee) -> Self {
        Self {
            employee_id: employee.employee_id.clone(),
            full_name: employee.full_name.clone(),
            email: employee.email.clone(),
            department: employee.department.parse().ok(),
        }
    }
}

/// Form inputs that can carry an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    EmployeeId,
    FullName,
    Email,
    Department,
}

/// One optional message per field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors {
    pub employee_id: Option<String>,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub department: Option<String>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.employee_id.is_none()
            && self.full_name.is_none()
            && self.email.is_none()
            && self.department.is_none()
    }

    pub fn get(&self, field: FormField) -> Option<&str> {
        match field {
            FormField::EmployeeId => self.employee_id.as_deref(),
            FormField::FullName => self.full_name.as_deref(),
            FormField::Email => self.email.as_deref(),
            FormField::Department => self.department.as_deref(),
        }
    }

    pub fn clear(&mut self, field: FormField) {
        match field {
            FormField::EmployeeId => self.employee_id = None,
            FormField::FullName => self.full_name = None,
            FormField::Email => self.email = None,
            FormField::Department => self.department = None,
        }
    }

    /// (field, message) pairs in form order
    pub fn iter(&self) -> impl Iterator<Item = (FormField, &str)> {
        [
            (FormField::EmployeeId, self.employee_id.as_deref()),
            (FormField::FullName, self.full_name.as_deref()),
            (FormField::Email, self.email.as_deref()),
            (FormField::Department, self.department.as_deref()),
        ]
        .into_iter()
        .filter_map(|(field, msg)| msg.map(|m| (field, m)))
    }
}

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"))
}

/// Check a simple local@domain.tld shape
pub fn is_valid_email(email: &str) -> bool {
    email_pattern().is_match(email)
}

/// Validate the form, producing the request body or every field error at once
pub fn validate_employee(form: &EmployeeForm) -> Result<EmployeeInput, FieldErrors> {
    let mut errors = FieldErrors::default();

    if form.employee_id.trim().is_empty() {
        errors.employee_id = Some("Employee ID is required".to_string());
    }

    if form.full_name.trim().is_empty() {
        errors.full_name = Some("Full name is required".to_string());
    } else if form.full_name.chars().count() < 2 {
        errors.full_name = Some("Name must be at least 2 characters".to_string());
    }

    if form.email.trim().is_empty() {
        errors.email = Some("Email is required".to_string());
    } else if !is_valid_email(&form.email) {
        errors.email = Some("Please enter a valid email address".to_string());
    }

    if form.department.is_none() {
        errors.department = Some("Department is required".to_string());
    }

    match form.department {
        Some(department) if errors.is_empty() => Ok(EmployeeInput {
            employee_id: form.employee_id.clone(),
            full_name: form.full_name.clone(),
            email: form.email.clone(),
            department,
        }),
        _ => Err(errors),
    }
}

//! Employee records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An employee as stored by the backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Employee {
    /// Backend document id
    #[serde(default)]
    pub id: String,
    /// Caller-assigned, externally unique identifier (e.g. "EMP001")
    pub employee_id: String,
    pub full_name: String,
    pub email: String,
    /// Kept as free text so records written by other clients still load
    pub department: String,
    pub created_at: DateTime<Utc>,
}

impl Employee {
    /// Case-insensitive substring match over name and employee id
    pub fn matches(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.full_name.to_lowercase().contains(&term)
            || self.employee_id.to_lowercase().contains(&term)
    }
}

/// Body for creating or fully replacing an employee
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmployeeInput {
    pub employee_id: String,
    pub full_name: String,
    pub email: String,
    pub department: Department,
}

/// Backend envelope for the employee list
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmployeeList {
    #[serde(default)]
    pub employees: Vec<Employee>,
    #[serde(default)]
    pub total: usize,
}

/// Departments an employee can be assigned to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Department {
    Engineering,
    #[serde(rename = "Human Resources")]
    HumanResources,
    Marketing,
    Sales,
    Finance,
    Operations,
    Product,
    Design,
    Legal,
    Other,
}

impl Department {
    /// Every department, in form display order
    pub const ALL: [Department; 10] = [
        Department::Engineering,
        Department::HumanResources,
        Department::Marketing,
        Department::Sales,
        Department::Finance,
        Department::Operations,
        Department::Product,
        Department::Design,
        Department::Legal,
        Department::Other,
    ];

    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Department::Engineering => "Engineering",
            Department::HumanResources => "Human Resources",
            Department::Marketing => "Marketing",
            Department::Sales => "Sales",
            Department::Finance => "Finance",
            Department::Operations => "Operations",
            Department::Product => "Product",
            Department::Design => "Design",
            Department::Legal => "Legal",
            Department::Other => "Other",
        }
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no known department
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown department: {0}")]
pub struct UnknownDepartment(pub String);

impl FromStr for Department {
    type Err = UnknownDepartment;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Department::ALL
            .iter()
            .copied()
            .find(|d| {
                d.as_str().eq_ignore_ascii_case(wanted)
                    || d.as_str().replace(' ', "").eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| UnknownDepartment(s.to_string()))
    }
}

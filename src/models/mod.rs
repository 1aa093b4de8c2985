//! Wire data model
//!
//! Typed shapes for everything the HRMS backend sends and receives:
//! - `Employee` / `EmployeeInput`: employee records and the create/replace body
//! - `AttendanceRecord` / `NewAttendance`: daily attendance marks
//! - `AttendanceSummary` and `Stats`: derived aggregates computed server-side

mod attendance;
mod employee;

pub use attendance::{AttendanceList, AttendanceRecord, AttendanceStatus, AttendanceSummary, NewAttendance};
pub use employee::{Department, Employee, EmployeeInput, EmployeeList, UnknownDepartment};

use serde::{Deserialize, Serialize};

/// Aggregate counts shown on the dashboard
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Stats {
    #[serde(default)]
    pub total_employees: u64,
    #[serde(default)]
    pub total_attendance_records: u64,
    #[serde(default)]
    pub present_count: u64,
    #[serde(default)]
    pub absent_count: u64,
}

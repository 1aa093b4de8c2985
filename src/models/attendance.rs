//! Attendance records and per-employee summaries

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Whether the employee showed up on a given date
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttendanceStatus {
    #[default]
    Present,
    Absent,
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "Present",
            AttendanceStatus::Absent => "Absent",
        }
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttendanceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "present" | "p" => Ok(AttendanceStatus::Present),
            "absent" | "a" => Ok(AttendanceStatus::Absent),
            other => Err(format!("Invalid status: {}. Use: present, absent", other)),
        }
    }
}

/// One attendance mark, as returned by the backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AttendanceRecord {
    /// Backend-assigned record id
    pub id: String,
    /// Soft reference to `Employee::employee_id`
    pub employee_id: String,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub marked_at: DateTime<Utc>,
    /// Joined in by the backend for display; "Unknown" for orphaned records
    #[serde(default)]
    pub employee_name: Option<String>,
}

impl AttendanceRecord {
    /// Case-insensitive substring match over employee name and id
    pub fn matches(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        let name_hit = self
            .employee_name
            .as_deref()
            .map(|n| n.to_lowercase().contains(&term))
            .unwrap_or(false);
        name_hit || self.employee_id.to_lowercase().contains(&term)
    }
}

/// Body for marking attendance
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewAttendance {
    pub employee_id: String,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
}

/// Backend envelope for attendance lists
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttendanceList {
    #[serde(default)]
    pub records: Vec<AttendanceRecord>,
    #[serde(default)]
    pub total: usize,
}

/// Server-computed attendance aggregate for one employee.
///
/// Displayed as supplied; the client never recomputes the percentage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AttendanceSummary {
    pub employee_id: String,
    #[serde(default)]
    pub employee_name: String,
    pub total_days: u32,
    pub present_days: u32,
    pub absent_days: u32,
    pub attendance_percentage: f64,
}

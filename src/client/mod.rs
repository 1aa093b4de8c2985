//! HRMS Backend Client
//!
//! One operation per backend resource, behind the `HrmsApi` trait.
//!
//! ## Endpoints
//!
//! - `GET /employees`, `GET /employees/{id}`, `POST /employees`,
//!   `PUT /employees/{id}`, `DELETE /employees/{id}`
//! - `GET /attendance?date_filter=&employee_id=`, `GET /attendance/employee/{id}`,
//!   `GET /attendance/summary/{id}`, `POST /attendance`, `DELETE /attendance/{id}`
//! - `GET /stats`
//!
//! Every call is a fresh round trip: no retries, no timeout, no caching.

mod error;
mod http;

pub use error::{ApiError, ApiResult, UNREACHABLE_MESSAGE};
pub use http::HttpClient;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::models::{
    AttendanceRecord, AttendanceSummary, Employee, EmployeeInput, NewAttendance, Stats,
};

/// Operations offered by the HRMS backend
#[async_trait]
pub trait HrmsApi: Send + Sync {
    async fn list_employees(&self) -> ApiResult<Vec<Employee>>;

    async fn get_employee(&self, employee_id: &str) -> ApiResult<Employee>;

    async fn create_employee(&self, input: &EmployeeInput) -> ApiResult<Employee>;

    /// Full replace of the employee currently stored under `employee_id`
    async fn update_employee(&self, employee_id: &str, input: &EmployeeInput)
        -> ApiResult<Employee>;

    /// Also removes the employee's attendance records (backend cascade)
    async fn delete_employee(&self, employee_id: &str) -> ApiResult<()>;

    async fn list_attendance(&self, filter: &AttendanceFilter) -> ApiResult<Vec<AttendanceRecord>>;

    async fn employee_attendance(&self, employee_id: &str) -> ApiResult<Vec<AttendanceRecord>>;

    async fn attendance_summary(&self, employee_id: &str) -> ApiResult<AttendanceSummary>;

    async fn mark_attendance(&self, attendance: &NewAttendance) -> ApiResult<AttendanceRecord>;

    async fn delete_attendance(&self, record_id: &str) -> ApiResult<()>;

    async fn stats(&self) -> ApiResult<Stats>;
}

/// Server-side filters for the attendance list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttendanceFilter {
    pub date: Option<NaiveDate>,
    pub employee_id: Option<String>,
}

impl AttendanceFilter {
    /// No filters: the full list
    pub fn none() -> Self {
        Self::default()
    }

    /// Builder method: restrict to one date
    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Builder method: restrict to one employee
    pub fn employee(mut self, employee_id: impl Into<String>) -> Self {
        self.employee_id = Some(employee_id.into());
        self
    }

    /// Employee filter, if set to something other than whitespace
    pub fn employee_id(&self) -> Option<&str> {
        self.employee_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.date.is_none() && self.employee_id().is_none()
    }

    /// Query parameters for the non-empty filters only
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(date) = self.date {
            pairs.push(("date_filter", date.format("%Y-%m-%d").to_string()));
        }
        if let Some(employee_id) = self.employee_id() {
            pairs.push(("employee_id", employee_id.to_string()));
        }
        pairs
    }
}

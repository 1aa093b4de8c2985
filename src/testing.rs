//! In-memory backend for controller and shell tests

use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use crate::client::{ApiError, ApiResult, AttendanceFilter, HrmsApi};
use crate::models::{
    AttendanceRecord, AttendanceStatus, AttendanceSummary, Employee, EmployeeInput, NewAttendance,
    Stats,
};

/// One call received by the fake backend
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    ListEmployees,
    GetEmployee(String),
    CreateEmployee(EmployeeInput),
    UpdateEmployee(String, EmployeeInput),
    DeleteEmployee(String),
    ListAttendance(AttendanceFilter),
    EmployeeAttendance(String),
    Summary(String),
    MarkAttendance(NewAttendance),
    DeleteAttendance(String),
    Stats,
}

impl Call {
    fn op(&self) -> &'static str {
        match self {
            Call::ListEmployees => "list_employees",
            Call::GetEmployee(_) => "get_employee",
            Call::CreateEmployee(_) => "create_employee",
            Call::UpdateEmployee(..) => "update_employee",
            Call::DeleteEmployee(_) => "delete_employee",
            Call::ListAttendance(_) => "list_attendance",
            Call::EmployeeAttendance(_) => "employee_attendance",
            Call::Summary(_) => "attendance_summary",
            Call::MarkAttendance(_) => "mark_attendance",
            Call::DeleteAttendance(_) => "delete_attendance",
            Call::Stats => "stats",
        }
    }
}

/// Scripted backend: fixed data, call log, injectable failures and delays
#[derive(Default)]
pub struct FakeApi {
    pub employees: Mutex<Vec<Employee>>,
    pub records: Mutex<Vec<AttendanceRecord>>,
    pub summaries: Mutex<HashMap<String, AttendanceSummary>>,
    pub stats: Mutex<Stats>,
    calls: Mutex<Vec<Call>>,
    failures: Mutex<HashMap<&'static str, ApiError>>,
    attendance_delays: Mutex<VecDeque<Duration>>,
    summary_delays: Mutex<VecDeque<Duration>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_employees(self, employees: Vec<Employee>) -> Self {
        *self.employees.lock().unwrap() = employees;
        self
    }

    pub fn with_records(self, records: Vec<AttendanceRecord>) -> Self {
        *self.records.lock().unwrap() = records;
        self
    }

    pub fn with_summary(self, summary: AttendanceSummary) -> Self {
        self.summaries
            .lock()
            .unwrap()
            .insert(summary.employee_id.clone(), summary);
        self
    }

    pub fn with_stats(self, stats: Stats) -> Self {
        *self.stats.lock().unwrap() = stats;
        self
    }

    /// Make every call to `op` fail until `recover`
    pub fn fail(&self, op: &'static str, err: ApiError) {
        self.failures.lock().unwrap().insert(op, err);
    }

    pub fn recover(&self, op: &'static str) {
        self.failures.lock().unwrap().remove(op);
    }

    /// Delay the next attendance list responses, in call order
    pub fn delay_attendance(&self, delays: impl IntoIterator<Item = Duration>) {
        self.attendance_delays.lock().unwrap().extend(delays);
    }

    /// Delay the next summary responses, in call order
    pub fn delay_summaries(&self, delays: impl IntoIterator<Item = Duration>) {
        self.summary_delays.lock().unwrap().extend(delays);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, op: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.op() == op)
            .count()
    }

    fn record(&self, call: Call) -> ApiResult<()> {
        let op = call.op();
        self.calls.lock().unwrap().push(call);
        match self.failures.lock().unwrap().get(op) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn not_found(employee_id: &str) -> ApiError {
        ApiError::Status {
            status: 404,
            message: format!("Employee with ID '{}' not found", employee_id),
        }
    }

    fn find(&self, employee_id: &str) -> Option<Employee> {
        self.employees
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.employee_id == employee_id)
            .cloned()
    }
}

#[async_trait]
impl HrmsApi for FakeApi {
    async fn list_employees(&self) -> ApiResult<Vec<Employee>> {
        self.record(Call::ListEmployees)?;
        Ok(self.employees.lock().unwrap().clone())
    }

    async fn get_employee(&self, employee_id: &str) -> ApiResult<Employee> {
        self.record(Call::GetEmployee(employee_id.to_string()))?;
        self.find(employee_id)
            .ok_or_else(|| Self::not_found(employee_id))
    }

    async fn create_employee(&self, input: &EmployeeInput) -> ApiResult<Employee> {
        self.record(Call::CreateEmployee(input.clone()))?;
        if self.find(&input.employee_id).is_some() {
            return Err(ApiError::Status {
                status: 409,
                message: format!("Employee with ID '{}' already exists", input.employee_id),
            });
        }
        let created = employee_from_input(input);
        self.employees.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update_employee(
        &self,
        employee_id: &str,
        input: &EmployeeInput,
    ) -> ApiResult<Employee> {
        self.record(Call::UpdateEmployee(employee_id.to_string(), input.clone()))?;
        let mut employees = self.employees.lock().unwrap();
        let slot = employees
            .iter_mut()
            .find(|e| e.employee_id == employee_id)
            .ok_or_else(|| Self::not_found(employee_id))?;
        let mut updated = employee_from_input(input);
        updated.id = slot.id.clone();
        updated.created_at = slot.created_at;
        *slot = updated.clone();
        Ok(updated)
    }

    async fn delete_employee(&self, employee_id: &str) -> ApiResult<()> {
        self.record(Call::DeleteEmployee(employee_id.to_string()))?;
        let mut employees = self.employees.lock().unwrap();
        let before = employees.len();
        employees.retain(|e| e.employee_id != employee_id);
        if employees.len() == before {
            return Err(Self::not_found(employee_id));
        }
        self.records
            .lock()
            .unwrap()
            .retain(|r| r.employee_id != employee_id);
        Ok(())
    }

    async fn list_attendance(&self, filter: &AttendanceFilter) -> ApiResult<Vec<AttendanceRecord>> {
        let delay = self.attendance_delays.lock().unwrap().pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.record(Call::ListAttendance(filter.clone()))?;
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| filter.date.map_or(true, |d| r.date == d))
            .filter(|r| filter.employee_id().map_or(true, |id| r.employee_id == id))
            .cloned()
            .collect())
    }

    async fn employee_attendance(&self, employee_id: &str) -> ApiResult<Vec<AttendanceRecord>> {
        self.record(Call::EmployeeAttendance(employee_id.to_string()))?;
        if self.find(employee_id).is_none() {
            return Err(Self::not_found(employee_id));
        }
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.employee_id == employee_id)
            .cloned()
            .collect())
    }

    async fn attendance_summary(&self, employee_id: &str) -> ApiResult<AttendanceSummary> {
        let delay = self.summary_delays.lock().unwrap().pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.record(Call::Summary(employee_id.to_string()))?;
        self.summaries
            .lock()
            .unwrap()
            .get(employee_id)
            .cloned()
            .ok_or_else(|| Self::not_found(employee_id))
    }

    async fn mark_attendance(&self, attendance: &NewAttendance) -> ApiResult<AttendanceRecord> {
        self.record(Call::MarkAttendance(attendance.clone()))?;
        let employee = self
            .find(&attendance.employee_id)
            .ok_or_else(|| Self::not_found(&attendance.employee_id))?;

        let mut records = self.records.lock().unwrap();
        if records
            .iter()
            .any(|r| r.employee_id == attendance.employee_id && r.date == attendance.date)
        {
            return Err(ApiError::Status {
                status: 409,
                message: format!(
                    "Attendance already marked for employee '{}' on {}",
                    attendance.employee_id, attendance.date
                ),
            });
        }

        let created = AttendanceRecord {
            id: format!("rec-{}", records.len() + 1),
            employee_id: attendance.employee_id.clone(),
            date: attendance.date,
            status: attendance.status,
            marked_at: Utc::now(),
            employee_name: Some(employee.full_name),
        };
        records.insert(0, created.clone());
        Ok(created)
    }

    async fn delete_attendance(&self, record_id: &str) -> ApiResult<()> {
        self.record(Call::DeleteAttendance(record_id.to_string()))?;
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|r| r.id != record_id);
        if records.len() == before {
            return Err(ApiError::Status {
                status: 404,
                message: "Attendance record not found".to_string(),
            });
        }
        Ok(())
    }

    async fn stats(&self) -> ApiResult<Stats> {
        self.record(Call::Stats)?;
        Ok(self.stats.lock().unwrap().clone())
    }
}

fn employee_from_input(input: &EmployeeInput) -> Employee {
    Employee {
        id: format!("id-{}", input.employee_id),
        employee_id: input.employee_id.clone(),
        full_name: input.full_name.clone(),
        email: input.email.clone(),
        department: input.department.to_string(),
        created_at: Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap(),
    }
}

pub fn employee(employee_id: &str, full_name: &str) -> Employee {
    Employee {
        id: format!("id-{}", employee_id),
        employee_id: employee_id.to_string(),
        full_name: full_name.to_string(),
        email: format!("{}@example.com", employee_id.to_lowercase()),
        department: "Engineering".to_string(),
        created_at: Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap(),
    }
}

pub fn record(id: &str, employee_id: &str, name: &str, date: NaiveDate, status: AttendanceStatus) -> AttendanceRecord {
    AttendanceRecord {
        id: id.to_string(),
        employee_id: employee_id.to_string(),
        date,
        status,
        marked_at: Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap(),
        employee_name: Some(name.to_string()),
    }
}

pub fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
}

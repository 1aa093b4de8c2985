//! Attendance page: filtered list, mark-attendance form and summary panel

use chrono::{Local, NaiveDate};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{RequestSequence, SummaryErrorPolicy};
use crate::client::{ApiError, ApiResult, AttendanceFilter, HrmsApi};
use crate::models::{AttendanceRecord, AttendanceStatus, AttendanceSummary, Employee, NewAttendance};
use crate::notifications::NotificationCenter;

/// Mark-attendance form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarkForm {
    pub employee_id: Option<String>,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
}

impl MarkForm {
    fn new(date: NaiveDate) -> Self {
        Self {
            employee_id: None,
            date,
            status: AttendanceStatus::Present,
        }
    }
}

/// Result of submitting the mark-attendance form
#[derive(Debug, Clone, PartialEq)]
pub enum MarkOutcome {
    Marked(AttendanceRecord),
    /// No employee selected; a warning was emitted and nothing was sent
    MissingEmployee,
    Failed(ApiError),
}

#[derive(Debug, Clone)]
pub struct AttendanceState {
    /// Employees available in the mark form
    pub employees: Vec<Employee>,
    /// Records as returned for the current filters
    pub records: Vec<AttendanceRecord>,
    pub loading: bool,
    /// Set once the initial load has settled; filter changes refetch only after that
    pub loaded: bool,
    pub filter: AttendanceFilter,
    pub search: String,
    pub form: MarkForm,
    pub submitting: bool,
    pub summary_employee: Option<String>,
    pub summary: Option<AttendanceSummary>,
    pub summary_loading: bool,
    pub summary_error: Option<String>,
}

impl AttendanceState {
    fn new(today: NaiveDate) -> Self {
        Self {
            employees: Vec::new(),
            records: Vec::new(),
            loading: false,
            loaded: false,
            filter: AttendanceFilter::none(),
            search: String::new(),
            form: MarkForm::new(today),
            submitting: false,
            summary_employee: None,
            summary: None,
            summary_loading: false,
            summary_error: None,
        }
    }

    /// Server results narrowed by the free-text search box
    pub fn visible_records(&self) -> Vec<&AttendanceRecord> {
        let term = self.search.as_str();
        self.records
            .iter()
            .filter(|r| term.is_empty() || r.matches(term))
            .collect()
    }
}

#[derive(Clone)]
pub struct AttendanceController {
    api: Arc<dyn HrmsApi>,
    notifications: NotificationCenter,
    summary_errors: SummaryErrorPolicy,
    state: Arc<RwLock<AttendanceState>>,
    list_requests: Arc<RequestSequence>,
    summary_requests: Arc<RequestSequence>,
}

impl AttendanceController {
    /// The mark form's date defaults to today's local date
    pub fn new(
        api: Arc<dyn HrmsApi>,
        notifications: NotificationCenter,
        summary_errors: SummaryErrorPolicy,
    ) -> Self {
        Self::with_date(api, notifications, summary_errors, Local::now().date_naive())
    }

    pub fn with_date(
        api: Arc<dyn HrmsApi>,
        notifications: NotificationCenter,
        summary_errors: SummaryErrorPolicy,
        today: NaiveDate,
    ) -> Self {
        Self {
            api,
            notifications,
            summary_errors,
            state: Arc::new(RwLock::new(AttendanceState::new(today))),
            list_requests: Arc::new(RequestSequence::new()),
            summary_requests: Arc::new(RequestSequence::new()),
        }
    }

    pub async fn state(&self) -> AttendanceState {
        self.state.read().await.clone()
    }

    /// Initial load: employees and the attendance list in parallel
    pub async fn load(&self) -> ApiResult<()> {
        let filter = {
            let mut state = self.state.write().await;
            state.loading = true;
            state.filter.clone()
        };
        let ticket = self.list_requests.issue();

        let result = tokio::try_join!(self.api.list_employees(), self.api.list_attendance(&filter));

        let mut state = self.state.write().await;
        state.loading = false;
        state.loaded = true;

        match result {
            Ok((employees, records)) => {
                state.employees = employees;
                if state.filter != filter {
                    // Filters moved while the page was loading
                    tracing::debug!(ticket, "Filter changed during load, refetching");
                    drop(state);
                    return self.refresh_records().await;
                }
                if self.list_requests.is_latest(ticket) {
                    state.records = records;
                } else {
                    tracing::debug!(ticket, "Discarding superseded attendance list");
                }
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Attendance page load failed");
                drop(state);
                self.notifications.error(e.to_string()).await;
                Err(e)
            }
        }
    }

    /// Refetch the list for the current filters
    pub async fn refresh_records(&self) -> ApiResult<()> {
        let filter = self.state.read().await.filter.clone();
        let ticket = self.list_requests.issue();

        let result = self.api.list_attendance(&filter).await;

        if !self.list_requests.is_latest(ticket) {
            tracing::debug!(ticket, "Discarding superseded attendance list");
            return Ok(());
        }

        match result {
            Ok(records) => {
                self.state.write().await.records = records;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Attendance list fetch failed");
                self.notifications.error(e.to_string()).await;
                Err(e)
            }
        }
    }

    /// Apply a filter edit; refetches when it changed and the page has loaded
    async fn update_filter(&self, edit: impl FnOnce(&mut AttendanceFilter)) -> ApiResult<()> {
        let should_fetch = {
            let mut state = self.state.write().await;
            let before = state.filter.clone();
            edit(&mut state.filter);
            state.loaded && state.filter != before
        };

        if should_fetch {
            self.refresh_records().await
        } else {
            Ok(())
        }
    }

    pub async fn set_date_filter(&self, date: Option<NaiveDate>) -> ApiResult<()> {
        self.update_filter(|f| f.date = date).await
    }

    pub async fn set_employee_filter(&self, employee_id: Option<String>) -> ApiResult<()> {
        let employee_id = employee_id.filter(|id| !id.trim().is_empty());
        self.update_filter(|f| f.employee_id = employee_id).await
    }

    pub async fn clear_filters(&self) -> ApiResult<()> {
        self.update_filter(|f| *f = AttendanceFilter::none()).await
    }

    /// Client-side search over employee name and id; never refetches
    pub async fn set_search(&self, term: impl Into<String>) {
        self.state.write().await.search = term.into();
    }

    pub async fn visible_records(&self) -> Vec<AttendanceRecord> {
        let state = self.state.read().await;
        state.visible_records().into_iter().cloned().collect()
    }

    pub async fn select_mark_employee(&self, employee_id: Option<String>) {
        self.state.write().await.form.employee_id = employee_id;
    }

    pub async fn set_mark_date(&self, date: NaiveDate) {
        self.state.write().await.form.date = date;
    }

    pub async fn set_mark_status(&self, status: AttendanceStatus) {
        self.state.write().await.form.status = status;
    }

    /// Mark attendance for the selected employee.
    ///
    /// On success the list is refetched for the current filters, the employee
    /// and status are reset (the date is kept), and the summary panel is
    /// refreshed if it shows the same employee.
    pub async fn submit_mark(&self) -> MarkOutcome {
        let form = self.state.read().await.form.clone();

        let employee_id = match form.employee_id.filter(|id| !id.trim().is_empty()) {
            Some(id) => id,
            None => {
                self.notifications.warning("Please select an employee").await;
                return MarkOutcome::MissingEmployee;
            }
        };

        let request = NewAttendance {
            employee_id: employee_id.clone(),
            date: form.date,
            status: form.status,
        };

        self.state.write().await.submitting = true;
        let result = self.api.mark_attendance(&request).await;
        self.state.write().await.submitting = false;

        match result {
            Ok(record) => {
                tracing::info!(employee_id = %employee_id, date = %request.date, status = %request.status, "Attendance marked");
                self.notifications
                    .success(format!("Attendance marked as {}", request.status))
                    .await;

                {
                    let mut state = self.state.write().await;
                    state.form.employee_id = None;
                    state.form.status = AttendanceStatus::Present;
                }

                let _ = self.refresh_records().await;

                let same_employee =
                    self.state.read().await.summary_employee.as_deref() == Some(employee_id.as_str());
                if same_employee {
                    self.refresh_summary().await;
                }

                MarkOutcome::Marked(record)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Marking attendance failed");
                self.notifications.error(e.to_string()).await;
                MarkOutcome::Failed(e)
            }
        }
    }

    /// Select (or clear) the employee shown in the summary panel
    pub async fn select_summary_employee(&self, employee_id: Option<String>) {
        let employee_id = employee_id.filter(|id| !id.trim().is_empty());
        let selected = employee_id.is_some();

        {
            let mut state = self.state.write().await;
            state.summary_employee = employee_id;
            if !selected {
                state.summary = None;
                state.summary_error = None;
                state.summary_loading = false;
                // Invalidate anything still in flight
                self.summary_requests.issue();
            }
        }

        if selected {
            self.refresh_summary().await;
        }
    }

    /// Fetch the summary for the selected employee
    pub async fn refresh_summary(&self) {
        let (employee_id, ticket) = {
            let mut state = self.state.write().await;
            let employee_id = match state.summary_employee.clone() {
                Some(id) => id,
                None => return,
            };
            state.summary_loading = true;
            (employee_id, self.summary_requests.issue())
        };

        let result = self.api.attendance_summary(&employee_id).await;

        if !self.summary_requests.is_latest(ticket) {
            tracing::debug!(ticket, "Discarding superseded summary");
            return;
        }

        let mut state = self.state.write().await;
        state.summary_loading = false;
        match result {
            Ok(summary) => {
                state.summary = Some(summary);
                state.summary_error = None;
            }
            Err(e) => {
                tracing::debug!(employee_id = %employee_id, error = %e, "Summary unavailable");
                state.summary = None;
                state.summary_error = Some(e.to_string());
                drop(state);
                if self.summary_errors == SummaryErrorPolicy::Notify {
                    self.notifications.error(e.to_string()).await;
                }
            }
        }
    }
}
